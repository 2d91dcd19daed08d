use bevy::prelude::*;

use crate::{
    config::GridConfig,
    error::{TerrainError, TerrainResult},
    grid::Grid,
    packing::PackedBuffers,
    topology::build_indices,
    utils::{create_mesh, get_mut_position_from_mesh},
};

/// Grid, topology and packed attribute buffers of the editable terrain.
///
/// Only the heights in `buffers.positions` change after construction. Writers
/// set the dirty flag once a full rewrite is done; the renderer clears it when
/// it uploads.
#[derive(Debug, Clone, Resource)]
pub struct TerrainSurface {
    grid: Grid,
    indices: Vec<u32>,
    buffers: PackedBuffers,
    dirty: bool,
}

impl TerrainSurface {
    pub fn new(config: &GridConfig) -> TerrainResult<Self> {
        Self::from_grid(Grid::generate(config)?)
    }

    pub fn from_grid(grid: Grid) -> TerrainResult<Self> {
        let indices = build_indices(grid.n());
        if indices.is_empty() {
            return Err(TerrainError::DegenerateGrid { n: grid.n() });
        }

        let buffers = PackedBuffers::from_grid(&grid);

        Ok(Self {
            grid,
            indices,
            buffers,
            dirty: false,
        })
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.grid.n()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.buffers.positions.len()
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn buffers(&self) -> &PackedBuffers {
        &self.buffers
    }

    #[inline]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.buffers.positions
    }

    #[inline]
    pub(crate) fn positions_mut(&mut self) -> &mut [[f32; 3]] {
        &mut self.buffers.positions
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn to_mesh(&self) -> Mesh {
        create_mesh(
            self.buffers.positions.clone(),
            self.buffers.normals.clone(),
            self.buffers.uvs.clone(),
            self.indices.clone(),
        )
    }

    /// Copies the heights into `mesh` if they changed since the last upload.
    /// Returns whether anything was written; the flag stays set when the mesh
    /// does not match.
    pub fn upload_positions(&mut self, mesh: &mut Mesh) -> bool {
        if !self.dirty {
            return false;
        }

        let Some(target) = get_mut_position_from_mesh(mesh) else {
            warn!("Terrain mesh has no Float32x3 position attribute");
            return false;
        };

        if target.len() != self.buffers.positions.len() {
            warn!(
                "Terrain mesh has {} vertices, expected {}",
                target.len(),
                self.buffers.positions.len()
            );
            return false;
        }

        target.copy_from_slice(&self.buffers.positions);
        self.dirty = false;

        true
    }
}
