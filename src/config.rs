use bevy::prelude::*;

/// Spatial extent and sampling of the terrain grid.
///
/// Rows walk Z from `z_max` down to `z_min`, columns walk X from `x_min` up to
/// `x_max`. Both axes must yield the same number of steps. Read once when the
/// terrain is built; editing the resource afterwards has no effect.
#[derive(Debug, Clone, Resource)]
pub struct GridConfig {
    pub x_min: f32,
    pub x_max: f32,
    pub z_min: f32,
    pub z_max: f32,
    pub step: f32,
    /// Decimal places every walked coordinate is snapped to.
    pub precision: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            x_min: -2.0,
            x_max: 2.0,
            z_min: -2.0,
            z_max: 2.0,
            step: 0.01,
            precision: 2,
        }
    }
}

#[derive(Debug, Clone, Resource, Reflect)]
#[reflect(Resource)]
pub struct PaintConfig {
    /// Initial pen radius in surface pixels.
    pub radius: f32,
    pub min_radius: f32,
    /// `None` means half the surface side.
    pub max_radius: Option<f32>,
    pub color: [u8; 3],
    /// Alpha of a single stamp, 0..=255.
    pub opacity: u8,
    pub wheel_line_step: f32,
    pub wheel_pixel_scale: f32,
    /// On-screen size of one surface pixel in the paint panel.
    pub panel_scale: f32,
    pub panel_margin: f32,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            radius: 25.0,
            min_radius: 1.0,
            max_radius: None,
            color: [0x10, 0x10, 0x10],
            opacity: 0x05,
            wheel_line_step: 1.0,
            wheel_pixel_scale: 0.01,
            panel_scale: 1.0,
            panel_margin: 8.0,
        }
    }
}

impl PaintConfig {
    /// `(min, max)` pen radius; always ordered and never NaN.
    pub fn radius_bounds(&self, side: u32) -> (f32, f32) {
        let min = self.min_radius.max(0.0);
        let max = self.max_radius.unwrap_or(side as f32 / 2.0);
        (min, max.max(min))
    }
}

/// Renderer-side shading of the terrain mesh.
#[derive(Debug, Clone, Resource, Reflect)]
#[reflect(Resource)]
pub struct ShadingConfig {
    /// Derive lighting normals from the painted relief on the render mesh.
    pub relief_normals: bool,
    pub interval_secs: f32,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            relief_normals: true,
            interval_secs: 0.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_bounds_default_to_half_the_side() {
        assert_eq!(PaintConfig::default().radius_bounds(40), (1.0, 20.0));
    }

    #[test]
    fn radius_bounds_survive_bad_input() {
        let config = PaintConfig {
            min_radius: f32::NAN,
            max_radius: Some(f32::NAN),
            ..Default::default()
        };
        assert_eq!(config.radius_bounds(40), (0.0, 0.0));

        let config = PaintConfig {
            min_radius: 30.0,
            ..Default::default()
        };
        assert_eq!(config.radius_bounds(40), (30.0, 30.0));
    }
}
