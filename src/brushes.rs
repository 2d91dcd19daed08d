use bevy::prelude::*;
use image::{Rgba, RgbaImage};

/// A filled circle stamped onto the paint surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundBrush {
    pub radius: f32,
    pub color: [u8; 3],
    pub opacity: u8,
}

#[inline]
fn covers(pixel_center: Vec2, center: Vec2, radius_squared: f32) -> bool {
    center.distance_squared(pixel_center) <= radius_squared
}

/// Source-over composite of an unpremultiplied colour onto `dst`.
fn blend_over(dst: &mut Rgba<u8>, color: [u8; 3], opacity: u8) {
    let src_a = opacity as f32 / 255.0;
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    if out_a <= 0.0 {
        return;
    }

    let dst_weight = dst_a * (1.0 - src_a);
    for channel in 0..3 {
        let mixed = (color[channel] as f32 * src_a + dst[channel] as f32 * dst_weight) / out_a;
        dst[channel] = mixed.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

impl RoundBrush {
    /// Stamps the brush centered at `center` (surface pixels). Returns the
    /// number of pixels touched; parts outside the image are clipped.
    pub fn stamp(&self, image: &mut RgbaImage, center: Vec2) -> usize {
        if self.radius <= 0.0 || self.opacity == 0 {
            return 0;
        }

        let (width, height) = image.dimensions();
        let radius_squared = self.radius * self.radius;

        let min_x = (center.x - self.radius).floor().max(0.0) as u32;
        let min_y = (center.y - self.radius).floor().max(0.0) as u32;
        let max_x = (center.x + self.radius).ceil().min(width as f32);
        let max_y = (center.y + self.radius).ceil().min(height as f32);

        if max_x <= 0.0 || max_y <= 0.0 {
            return 0;
        }

        let (max_x, max_y) = (max_x as u32, max_y as u32);
        let mut touched = 0;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let pixel_center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if !covers(pixel_center, center, radius_squared) {
                    continue;
                }

                blend_over(image.get_pixel_mut(x, y), self.color, self.opacity);
                touched += 1;
            }
        }

        touched
    }
}
