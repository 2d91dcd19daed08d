use rayon::prelude::*;

use crate::grid::{Grid, Vertex};

pub const POSITION_COMPONENTS: usize = 3;
pub const NORMAL_COMPONENTS: usize = 3;
pub const UV_COMPONENTS: usize = 2;

/// Per-attribute buffers, index-aligned with the grid.
///
/// `positions.as_flattened()` is the 3-wide flat buffer, so vertex `n`'s height
/// lives at `[3 * n + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedBuffers {
    pub positions: Vec<[f32; POSITION_COMPONENTS]>,
    pub normals: Vec<[f32; NORMAL_COMPONENTS]>,
    pub uvs: Vec<[f32; UV_COMPONENTS]>,
}

impl PackedBuffers {
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            positions: pack_positions(grid),
            normals: pack_normals(grid),
            uvs: pack_uvs(grid),
        }
    }
}

#[inline]
fn pack<const W: usize>(grid: &Grid, attribute: fn(&Vertex) -> [f32; W]) -> Vec<[f32; W]> {
    grid.vertices().par_iter().map(attribute).collect()
}

pub fn pack_positions(grid: &Grid) -> Vec<[f32; POSITION_COMPONENTS]> {
    pack(grid, |v| v.position)
}

pub fn pack_normals(grid: &Grid) -> Vec<[f32; NORMAL_COMPONENTS]> {
    pack(grid, |v| v.normal)
}

pub fn pack_uvs(grid: &Grid) -> Vec<[f32; UV_COMPONENTS]> {
    pack(grid, |v| v.uv)
}
