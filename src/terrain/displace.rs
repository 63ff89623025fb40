//! CPU evaluation of the vertex displacement done by `overlay.wgsl`.

use glam::{Mat4, Vec2, Vec3, Vec4};

use super::heightmap::HeightmapImage;
use super::{elevation, noise};
use crate::params::ParameterSet;

/// Heightmap UV for a lattice position: the centered grid mapped back to [0, 1]².
pub fn heightmap_uv(position: Vec3) -> Vec2 {
    Vec2::new(position.x, position.z) + 0.5
}

/// Elevation term for a vertex. Without a heightmap the overlay sits at 0.
pub fn elevation_at(position: Vec3, heightmap: Option<&HeightmapImage>, params: &ParameterSet) -> f32 {
    heightmap.map_or(0.0, |map| {
        elevation::decode(map.sample(heightmap_uv(position)), params.height_scale)
    })
}

/// Animated noise wobble for a vertex at the current `params.time`.
pub fn noise_offset(position: Vec3, params: &ParameterSet) -> f32 {
    let xz = Vec2::new(position.x, position.z);
    noise::noise(xz * params.frequency + params.time * params.speed) * params.amplitude
}

/// Displaced model-space position.
pub fn displace(position: Vec3, heightmap: Option<&HeightmapImage>, params: &ParameterSet) -> Vec3 {
    let lift = elevation_at(position, heightmap, params) + noise_offset(position, params);
    position + Vec3::Y * lift
}

/// Clip-space position, as the vertex shader outputs it.
pub fn clip_position(
    position: Vec3,
    heightmap: Option<&HeightmapImage>,
    params: &ParameterSet,
    view_projection: Mat4,
) -> Vec4 {
    view_projection * displace(position, heightmap, params).extend(1.0)
}

/// Displace every vertex of a buffer for one frame.
pub fn displace_all(
    positions: &[[f32; 3]],
    heightmap: Option<&HeightmapImage>,
    params: &ParameterSet,
) -> Vec<Vec3> {
    positions
        .iter()
        .map(|&p| displace(Vec3::from(p), heightmap, params))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{GridMesh, GridSpec};

    fn still_params() -> ParameterSet {
        ParameterSet { amplitude: 0.0, ..ParameterSet::default() }
    }

    #[test]
    fn uv_maps_grid_corners_to_texture_corners() {
        assert_eq!(heightmap_uv(Vec3::new(-0.5, 0.0, -0.5)), Vec2::ZERO);
        assert_eq!(heightmap_uv(Vec3::new(0.5, 0.0, 0.5)), Vec2::ONE);
    }

    #[test]
    fn missing_heightmap_degrades_to_zero_elevation() {
        let params = still_params();
        let p = Vec3::new(0.1, 0.0, -0.3);
        assert_eq!(displace(p, None, &params), p);
        assert_eq!(displace(p, Some(&HeightmapImage::sea_level()), &params), p);
    }

    #[test]
    fn only_height_changes() {
        let params = ParameterSet { time: 12.5, ..ParameterSet::default() };
        let mesh = GridMesh::build(GridSpec::new(8, 8).unwrap());
        let out = displace_all(&mesh.positions, None, &params);
        for (base, moved) in mesh.positions.iter().zip(&out) {
            assert_eq!(moved.x, base[0]);
            assert_eq!(moved.z, base[2]);
            assert!(moved.y >= -1e-6 && moved.y <= params.amplitude + 1e-6);
        }
    }

    #[test]
    fn offset_follows_time() {
        let p = Vec3::new(0.2, 0.0, 0.3);
        let mut params = ParameterSet::default();
        let samples: Vec<f32> = (0..20)
            .map(|i| {
                params.time = i as f32 * 3.0;
                noise_offset(p, &params)
            })
            .collect();
        assert!(samples.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn elevation_uses_height_scale() {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 140, 0, 255]));
        let map = HeightmapImage::from_rgba(img);
        let p = Vec3::ZERO;
        let base = ParameterSet { height_scale: 1.0, ..still_params() };
        let doubled = ParameterSet { height_scale: 2.0, ..still_params() };
        let e1 = elevation_at(p, Some(&map), &base);
        let e2 = elevation_at(p, Some(&map), &doubled);
        assert!(e1 > 0.0);
        assert!((e2 - 2.0 * e1).abs() < 1e-6);
    }

    #[test]
    fn clip_position_applies_view_projection() {
        let params = still_params();
        let p = Vec3::new(0.25, 0.0, 0.25);
        assert_eq!(clip_position(p, None, &params, Mat4::IDENTITY), p.extend(1.0));
    }
}
