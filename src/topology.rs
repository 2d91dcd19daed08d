use itertools::iproduct;

use crate::grid::linear_index;

/// Triangle list connecting an `n`×`n` lattice, two triangles per cell.
///
/// Both triangles of a cell share the `i1`–`i2` diagonal and wind
/// counter-clockwise seen from +Y. Returns an empty list for `n < 2`.
pub fn build_indices(n: usize) -> Vec<u32> {
    if n < 2 {
        return Vec::new();
    }

    let cells = n - 1;
    let mut indices = Vec::with_capacity(cells * cells * 6);

    for (row, col) in iproduct!(0..cells, 0..cells) {
        let i0 = linear_index(row, col, n) as u32;
        let i1 = i0 + 1;
        let i2 = linear_index(row + 1, col, n) as u32;
        let i3 = i2 + 1;

        indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
    }

    indices
}
