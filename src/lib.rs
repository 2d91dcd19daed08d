//! Paint a heightmap in 2D and watch a terrain mesh follow it.
//!
//! The pipeline is [`grid::Grid`] → [`packing::PackedBuffers`] →
//! [`terrain::TerrainSurface`], with [`paint::PaintSurface`] strokes pushed
//! into the vertex heights by [`sync::sync_from_surface`].
//! [`editor::HeightmapEditorPlugin`] hooks it all up to Bevy.

pub mod brushes;
pub mod config;
pub mod editor;
pub mod error;
pub mod grid;
pub mod packing;
pub mod paint;
pub mod sync;
pub mod terrain;
pub mod topology;
pub mod utils;

pub mod prelude {
    pub use crate::config::{GridConfig, PaintConfig, ShadingConfig};
    pub use crate::editor::HeightmapEditorPlugin;
    pub use crate::error::{TerrainError, TerrainResult};
    pub use crate::grid::{linear_index, Grid, Vertex};
    pub use crate::paint::{IntensityMatrix, PaintSurface, StrokeState};
    pub use crate::sync::{sync_from_surface, sync_heights};
    pub use crate::terrain::TerrainSurface;
    pub use crate::topology::build_indices;
}
