//! Decoding of RGB-packed elevation samples.
//!
//! Channels form a big-endian base-256 integer `v` in tenths of a meter,
//! offset by -10000 m. Mirrors `decode_elevation` in `overlay.wgsl`.

use glam::Vec3;

pub const OFFSET_METERS: f32 = -10000.0;
pub const METERS_PER_STEP: f32 = 0.1;
/// Meters represented by one unit of mesh-space height at `height_scale == 1`.
pub const METERS_PER_UNIT: f32 = 10000.0;

/// 8-bit RGB encoding of 0 m, used for the placeholder heightmap.
pub const SEA_LEVEL_RGB: [u8; 3] = [1, 134, 160];

/// Packed 24-bit value of a normalized RGB sample.
pub fn packed_value(sample: Vec3) -> f32 {
    let digits = (sample * 255.0).round();
    digits.x * 65536.0 + digits.y * 256.0 + digits.z
}

/// Elevation in meters. Out-of-range samples are not clamped.
pub fn decode_meters(sample: Vec3) -> f32 {
    OFFSET_METERS + packed_value(sample) * METERS_PER_STEP
}

/// Elevation in mesh-space units.
pub fn decode(sample: Vec3, height_scale: f32) -> f32 {
    decode_meters(sample) / METERS_PER_UNIT * height_scale
}

/// Convenience for 8-bit texels as stored in the heightmap image.
pub fn decode_rgb8(rgb: [u8; 3], height_scale: f32) -> f32 {
    let sample = Vec3::new(rgb[0] as f32, rgb[1] as f32, rgb[2] as f32) / 255.0;
    decode(sample, height_scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_decodes_to_negative_height_scale() {
        assert_eq!(decode(Vec3::ZERO, 1.0), -1.0);
        assert_eq!(decode(Vec3::ZERO, 2.5), -2.5);
    }

    #[test]
    fn white_decodes_to_maximum_encodable_elevation() {
        assert_eq!(packed_value(Vec3::ONE), 16_777_215.0);
        let meters = decode_meters(Vec3::ONE);
        assert!((meters - 1_667_721.5).abs() < 0.5, "{meters}");
        assert!((decode(Vec3::ONE, 1.0) - 166.77215).abs() < 1e-3);
    }

    #[test]
    fn sea_level_placeholder_is_zero() {
        assert_eq!(decode_rgb8(SEA_LEVEL_RGB, 1.0), 0.0);
        assert_eq!(decode_rgb8(SEA_LEVEL_RGB, 7.0), 0.0);
    }

    #[test]
    fn one_step_in_blue_is_a_tenth_of_a_meter() {
        let lo = decode_meters(Vec3::new(1.0, 134.0, 160.0) / 255.0);
        let hi = decode_meters(Vec3::new(1.0, 134.0, 161.0) / 255.0);
        assert!((hi - lo - 0.1).abs() < 1e-3);
    }

    #[test]
    fn height_scale_is_linear() {
        let sample = Vec3::new(1.0, 140.0, 0.0) / 255.0;
        let unit = decode(sample, 1.0);
        assert!((decode(sample, 3.0) - 3.0 * unit).abs() < 1e-6);
    }
}
