/// Errors raised while building or synchronizing the terrain.
///
/// Everything except [`TerrainError::IntensityMismatch`] can only happen at
/// setup; the editor refuses to start rather than render a corrupt mesh.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TerrainError {
    #[error("grid is not square: {columns} columns, {rows} rows")]
    NonSquareGrid { columns: usize, rows: usize },

    #[error("grid needs at least 2 vertices per axis, got {n}")]
    DegenerateGrid { n: usize },

    #[error("invalid grid step {step} over [{min}, {max}]")]
    InvalidStep { step: f32, min: f32, max: f32 },

    #[error("intensity matrix does not match the grid: expected side {expected}, got side {side} with {len} values")]
    IntensityMismatch {
        expected: usize,
        side: usize,
        len: usize,
    },

    #[error("paint surface is {width}x{height}, needs at least {required}x{required}")]
    SurfaceTooSmall {
        required: usize,
        width: u32,
        height: u32,
    },
}

pub type TerrainResult<T> = Result<T, TerrainError>;
