use bevy::prelude::*;
use rayon::prelude::*;

use crate::{
    error::{TerrainError, TerrainResult},
    grid::grid_cell,
    paint::{IntensityMatrix, PaintSurface},
    terrain::TerrainSurface,
};

/// Height of a vertex painted with full alpha.
pub const MAX_HEIGHT: f32 = 1.0;

/// Rewrites every vertex height from `intensity` and marks the positions dirty.
///
/// The matrix must be `n`×`n` and row-major, the same ordering the grid uses.
/// Nothing is written when it is not.
pub fn sync_heights(intensity: &IntensityMatrix, terrain: &mut TerrainSurface) -> TerrainResult<()> {
    let n = terrain.n();
    let values = intensity.values();

    if intensity.side() != n || values.len() != terrain.vertex_count() {
        return Err(TerrainError::IntensityMismatch {
            expected: n,
            side: intensity.side(),
            len: values.len(),
        });
    }

    terrain
        .positions_mut()
        .par_iter_mut()
        .enumerate()
        .for_each(|(index, position)| {
            let (row, col) = grid_cell(index, n);
            let alpha = intensity.get(row, col).unwrap_or_default();
            position[1] = alpha as f32 / 255.0 * MAX_HEIGHT;
        });

    terrain.mark_dirty();

    Ok(())
}

/// Reads the paint surface once and syncs the terrain heights with it.
pub fn sync_from_surface(surface: &PaintSurface, terrain: &mut TerrainSurface) -> TerrainResult<()> {
    let now = std::time::Instant::now();

    let intensity = surface.intensity_matrix()?;
    sync_heights(&intensity, terrain)?;

    debug!("Height sync duration: {:?}", now.elapsed());

    Ok(())
}
