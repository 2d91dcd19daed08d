use bevy::prelude::*;

use crate::{
    config::GridConfig,
    error::{TerrainError, TerrainResult},
};

/// Row-major offset of `(row, col)` in an `n`-wide square matrix.
///
/// Grid vertices, topology indices and the paint intensity matrix all use this
/// ordering; Height Sync relies on them agreeing.
#[inline]
pub const fn linear_index(row: usize, col: usize, n: usize) -> usize {
    row * n + col
}

/// Inverse of [`linear_index`]: the `(row, col)` stored at `index`.
#[inline]
pub const fn grid_cell(index: usize, n: usize) -> (usize, usize) {
    (index / n, index % n)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// An N×N vertex lattice stored row-major.
#[derive(Debug, Clone)]
pub struct Grid {
    vertices: Vec<Vertex>,
    n: usize,
}

impl Grid {
    pub fn generate(config: &GridConfig) -> TerrainResult<Self> {
        let rows = walk_axis(config.z_max, config.z_min, -config.step, config.precision)?;
        let columns = walk_axis(config.x_min, config.x_max, config.step, config.precision)?;

        if rows.len() != columns.len() {
            return Err(TerrainError::NonSquareGrid {
                columns: columns.len(),
                rows: rows.len(),
            });
        }

        let n = rows.len();
        if n < 2 {
            return Err(TerrainError::DegenerateGrid { n });
        }

        let inv_n_minus_1 = 1.0 / (n - 1) as f32;
        let flat = Vertex {
            position: [0.0; 3],
            normal: [0.0, 1.0, 0.0],
            uv: [0.0; 2],
        };
        let mut vertices = vec![flat; n * n];

        for (row, z) in rows.iter().enumerate() {
            for (col, x) in columns.iter().enumerate() {
                vertices[linear_index(row, col, n)] = Vertex {
                    position: [*x, 0.0, -*z],
                    uv: [col as f32 * inv_n_minus_1, row as f32 * inv_n_minus_1],
                    ..flat
                };
            }
        }

        info!("Generated {n}x{n} terrain grid ({} vertices)", vertices.len());

        Ok(Self { vertices, n })
    }

    /// Side length of the square.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex(&self, row: usize, col: usize) -> Option<&Vertex> {
        if row >= self.n || col >= self.n {
            return None;
        }

        self.vertices.get(linear_index(row, col, self.n))
    }
}

fn snap(value: f64, scale: f64) -> f64 {
    (value * scale).round() / scale
}

/// Walks `from` toward `to` by `step`, snapping every coordinate so the end
/// condition does not depend on accumulated float error.
fn walk_axis(from: f32, to: f32, step: f32, precision: u32) -> TerrainResult<Vec<f32>> {
    let scale = 10f64.powi(precision as i32);
    let step_snapped = snap(step as f64, scale);
    let ascending = step > 0.0;

    // A step finer than `precision` would silently change N.
    let invalid = step_snapped == 0.0
        || (step_snapped - step as f64).abs() > 1e-6
        || !step.is_finite()
        || !from.is_finite()
        || !to.is_finite()
        || (ascending && from > to)
        || (!ascending && from < to);

    if invalid {
        return Err(TerrainError::InvalidStep {
            step,
            min: from.min(to),
            max: from.max(to),
        });
    }

    let from = snap(from as f64, scale);
    let to = snap(to as f64, scale);
    let mut values = Vec::with_capacity(((to - from) / step_snapped).abs() as usize + 1);
    let mut current = from;

    while (ascending && current <= to) || (!ascending && current >= to) {
        values.push(current as f32);
        current = snap(current + step_snapped, scale);
    }

    Ok(values)
}
