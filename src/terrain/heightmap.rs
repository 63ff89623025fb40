use glam::{Vec2, Vec3};

use super::elevation;
use crate::error::{OverlayError, OverlayResult};

/// Decoded heightmap pixels, RGBA8, row 0 at the top of the image.
///
/// Row 0 maps to v = 0, which the lattice reaches at z = -0.5. No vertical
/// flip is applied anywhere between the file and the shader; changing that
/// would have to change the `position.xz + 0.5` mapping along with it.
#[derive(Debug, Clone)]
pub struct HeightmapImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl HeightmapImage {
    pub fn from_rgba(image: image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height, rgba: image.into_raw() }
    }

    /// 1x1 image that decodes to 0 m.
    pub fn sea_level() -> Self {
        let [r, g, b] = elevation::SEA_LEVEL_RGB;
        Self { width: 1, height: 1, rgba: vec![r, g, b, 255] }
    }

    /// Check that the image can become a 2D texture on a device whose
    /// `max_texture_dimension_2d` is `max_dimension`.
    pub fn check_texture_limit(&self, max_dimension: u32) -> OverlayResult<()> {
        let (width, height) = (self.width, self.height);
        if width == 0 || height == 0 {
            return Err(OverlayError::EmptyHeightmap { width, height });
        }
        if width > max_dimension || height > max_dimension {
            return Err(OverlayError::HeightmapTooLarge { width, height, max: max_dimension });
        }
        Ok(())
    }

    pub fn texel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = 4 * (y as usize * self.width as usize + x as usize);
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2]]
    }

    /// Nearest-texel lookup with clamp-to-edge addressing, matching the
    /// heightmap sampler bound in the renderer.
    pub fn sample(&self, uv: Vec2) -> Vec3 {
        let x = Self::texel_coord(uv.x, self.width);
        let y = Self::texel_coord(uv.y, self.height);
        let [r, g, b] = self.texel(x, y);
        Vec3::new(r as f32, g as f32, b as f32) / 255.0
    }

    /// Minimum and maximum mesh-space elevation over all texels.
    pub fn elevation_range(&self, height_scale: f32) -> (f32, f32) {
        self.rgba
            .chunks_exact(4)
            .map(|px| elevation::decode_rgb8([px[0], px[1], px[2]], height_scale))
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), e| (lo.min(e), hi.max(e)))
    }

    fn texel_coord(t: f32, size: u32) -> u32 {
        let max = size.saturating_sub(1);
        ((t.clamp(0.0, 1.0) * size as f32).floor() as u32).min(max)
    }
}
