use bevy::prelude::*;
use image::RgbaImage;

use crate::{
    brushes::RoundBrush,
    config::PaintConfig,
    error::{TerrainError, TerrainResult},
    grid::linear_index,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeState {
    #[default]
    Idle,
    Stroking,
}

/// Alpha channel of an N×N region, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensityMatrix {
    values: Vec<u8>,
    side: usize,
}

impl IntensityMatrix {
    pub fn from_values(values: Vec<u8>, side: usize) -> Self {
        Self { values, side }
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Flattened row-major values.
    #[inline]
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.side || col >= self.side {
            return None;
        }

        self.values.get(linear_index(row, col, self.side)).copied()
    }
}

fn clamp_radius(radius: f32, (min, max): (f32, f32)) -> f32 {
    if radius.is_nan() {
        return min;
    }

    radius.clamp(min, max)
}

/// The 2D raster painted by the user. Alpha encodes terrain height.
#[derive(Resource)]
pub struct PaintSurface {
    image: RgbaImage,
    side: usize,
    state: StrokeState,
    brush: RoundBrush,
    radius_bounds: (f32, f32),
    revision: u64,
}

impl PaintSurface {
    /// A blank `side`×`side` surface.
    pub fn new(side: usize, config: &PaintConfig) -> Self {
        Self::with_image(RgbaImage::new(side as u32, side as u32), side, config)
    }

    /// Wraps an existing raster; `side` is the intensity region read back.
    pub fn with_image(image: RgbaImage, side: usize, config: &PaintConfig) -> Self {
        let radius_bounds = config.radius_bounds(side as u32);

        Self {
            image,
            side,
            state: StrokeState::Idle,
            brush: RoundBrush {
                radius: clamp_radius(config.radius, radius_bounds),
                color: config.color,
                opacity: config.opacity,
            },
            radius_bounds,
            revision: 0,
        }
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    #[inline]
    pub fn state(&self) -> StrokeState {
        self.state
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.brush.radius
    }

    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Bumped every time a stamp lands.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn begin_stroke(&mut self) {
        self.state = StrokeState::Stroking;
    }

    /// Stamps the brush at `(x, y)` while a stroke is active. Returns whether
    /// the surface changed.
    pub fn stroke_to(&mut self, x: f32, y: f32) -> bool {
        if self.state != StrokeState::Stroking {
            return false;
        }

        let touched = self.brush.stamp(&mut self.image, Vec2::new(x, y));
        if touched == 0 {
            return false;
        }

        self.revision += 1;
        true
    }

    pub fn end_stroke(&mut self) {
        self.state = StrokeState::Idle;
    }

    /// Picks up colour, opacity and radius bounds; the current radius is kept
    /// but re-clamped.
    pub fn apply_config(&mut self, config: &PaintConfig) {
        self.radius_bounds = config.radius_bounds(self.side as u32);
        self.brush.color = config.color;
        self.brush.opacity = config.opacity;
        self.adjust_radius(0.0);
    }

    pub fn adjust_radius(&mut self, delta: f32) -> f32 {
        self.brush.radius = clamp_radius(self.brush.radius + delta, self.radius_bounds);
        self.brush.radius
    }

    /// Reads the alpha channel of the top-left `side`×`side` region.
    pub fn intensity_matrix(&self) -> TerrainResult<IntensityMatrix> {
        let (width, height) = self.image.dimensions();
        if (width as usize) < self.side || (height as usize) < self.side {
            return Err(TerrainError::SurfaceTooSmall {
                required: self.side,
                width,
                height,
            });
        }

        let side = self.side as u32;
        let mut values = vec![0; self.side * self.side];

        // Image rows are matrix rows, image columns are matrix columns.
        for (x, y, pixel) in self.image.enumerate_pixels() {
            if x < side && y < side {
                values[linear_index(y as usize, x as usize, self.side)] = pixel[3];
            }
        }

        Ok(IntensityMatrix::from_values(values, self.side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(side: usize) -> PaintSurface {
        PaintSurface::new(side, &PaintConfig::default())
    }

    #[test]
    fn strokes_follow_pointer_state() {
        let mut surface = surface(16);

        assert_eq!(surface.state(), StrokeState::Idle);
        assert!(!surface.stroke_to(8.0, 8.0));
        assert_eq!(surface.revision(), 0);

        surface.begin_stroke();
        assert_eq!(surface.state(), StrokeState::Stroking);
        assert!(surface.stroke_to(8.0, 8.0));
        assert!(surface.stroke_to(9.0, 8.0));
        assert_eq!(surface.revision(), 2);

        surface.end_stroke();
        assert_eq!(surface.state(), StrokeState::Idle);
        assert!(!surface.stroke_to(8.0, 8.0));
    }

    #[test]
    fn blank_surface_has_zero_intensity() {
        let matrix = surface(7).intensity_matrix().unwrap();

        assert_eq!(matrix.side(), 7);
        assert_eq!(matrix.values().len(), 49);
        assert!(matrix.values().iter().all(|&v| v == 0));
    }

    #[test]
    fn repeated_stamps_increase_alpha() {
        let mut surface = surface(16);
        surface.begin_stroke();

        surface.stroke_to(8.0, 8.0);
        let once = surface.intensity_matrix().unwrap().get(8, 8).unwrap();
        surface.stroke_to(8.0, 8.0);
        let twice = surface.intensity_matrix().unwrap().get(8, 8).unwrap();

        assert!(once > 0);
        assert!(twice > once);
    }

    #[test]
    fn intensity_uses_image_rows_as_matrix_rows() {
        let mut image = RgbaImage::new(4, 4);
        image.get_pixel_mut(3, 1)[3] = 200;
        image.get_pixel_mut(0, 2)[3] = 17;
        let surface = PaintSurface::with_image(image, 4, &PaintConfig::default());

        let matrix = surface.intensity_matrix().unwrap();

        assert_eq!(matrix.get(1, 3), Some(200));
        assert_eq!(matrix.get(2, 0), Some(17));
        assert_eq!(matrix.values()[linear_index(1, 3, 4)], 200);
        assert_eq!(matrix.values().iter().filter(|&&v| v != 0).count(), 2);
    }

    #[test]
    fn larger_image_is_cropped_to_side() {
        let mut image = RgbaImage::new(6, 5);
        image.get_pixel_mut(4, 0)[3] = 255;
        image.get_pixel_mut(1, 1)[3] = 9;
        let surface = PaintSurface::with_image(image, 3, &PaintConfig::default());

        let matrix = surface.intensity_matrix().unwrap();

        assert_eq!(matrix.values(), &[0, 0, 0, 0, 9, 0, 0, 0, 0]);
    }

    #[test]
    fn smaller_image_is_rejected() {
        let surface = PaintSurface::with_image(RgbaImage::new(4, 3), 4, &PaintConfig::default());

        assert_eq!(
            surface.intensity_matrix().unwrap_err(),
            TerrainError::SurfaceTooSmall {
                required: 4,
                width: 4,
                height: 3
            }
        );
    }

    #[test]
    fn radius_is_clamped() {
        let mut surface = surface(40);

        assert_eq!(surface.radius(), 20.0);
        assert_eq!(surface.adjust_radius(-5.0), 15.0);
        assert_eq!(surface.adjust_radius(-100.0), 1.0);
        assert_eq!(surface.adjust_radius(1000.0), 20.0);
    }

    #[test]
    fn nan_radius_settings_fall_back_to_the_minimum() {
        let config = PaintConfig {
            radius: f32::NAN,
            min_radius: f32::NAN,
            ..Default::default()
        };
        let mut surface = PaintSurface::new(40, &config);

        assert_eq!(surface.radius(), 0.0);
        assert_eq!(surface.adjust_radius(f32::NAN), 0.0);
        assert_eq!(surface.adjust_radius(3.0), 3.0);

        surface.apply_config(&PaintConfig::default());
        assert_eq!(surface.radius(), 3.0);
    }

    #[test]
    fn config_changes_keep_radius_within_new_bounds() {
        let mut surface = surface(40);
        let config = PaintConfig {
            max_radius: Some(8.0),
            opacity: 40,
            ..Default::default()
        };

        surface.apply_config(&config);
        assert_eq!(surface.radius(), 8.0);

        surface.begin_stroke();
        surface.stroke_to(20.0, 20.0);
        assert_eq!(surface.intensity_matrix().unwrap().get(20, 20), Some(40));
    }
}
