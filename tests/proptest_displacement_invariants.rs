//! Property-based tests for the per-vertex displacement math.
//!
//! 1. noise is deterministic and bounded to [0, 1].
//! 2. noise is continuous: tiny input steps give tiny output steps.
//! 3. Displacement only moves vertices along Y, within the noise amplitude
//!    when no heightmap is bound.
//! 4. Decoding is monotonic in the packed value.

use glam::{Vec2, Vec3};
use proptest::prelude::*;
use terrawire::params::ParameterSet;
use terrawire::terrain::{displace, elevation, noise};

fn point() -> impl Strategy<Value = Vec2> {
    (-100.0f32..100.0, -100.0f32..100.0).prop_map(|(x, y)| Vec2::new(x, y))
}

proptest! {
    #[test]
    fn noise_is_deterministic_and_bounded(p in point()) {
        let a = noise::noise(p);
        let b = noise::noise(p);
        prop_assert_eq!(a.to_bits(), b.to_bits());
        prop_assert!((-1e-4..=1.0 + 1e-4).contains(&a), "noise({}) = {}", p, a);
    }

    #[test]
    fn noise_is_continuous(p in point(), dx in -1.0f32..1.0, dy in -1.0f32..1.0) {
        let step = Vec2::new(dx, dy) * 1e-3;
        let delta = (noise::noise(p + step) - noise::noise(p)).abs();
        prop_assert!(delta < 0.01, "jump of {} at {}", delta, p);
    }

    #[test]
    fn flat_displacement_stays_within_amplitude(
        x in -0.5f32..=0.5,
        z in -0.5f32..=0.5,
        time in 0.0f32..1000.0,
    ) {
        let params = ParameterSet { time, ..ParameterSet::default() };
        let base = Vec3::new(x, 0.0, z);
        let moved = displace(base, None, &params);
        prop_assert_eq!(moved.x, x);
        prop_assert_eq!(moved.z, z);
        prop_assert!(moved.y >= -1e-6 && moved.y <= params.amplitude + 1e-6);
    }

    #[test]
    fn decode_is_monotonic(a in any::<[u8; 3]>(), b in any::<[u8; 3]>()) {
        let packed = |c: [u8; 3]| (c[0] as u32) << 16 | (c[1] as u32) << 8 | c[2] as u32;
        let (lo, hi) = if packed(a) <= packed(b) { (a, b) } else { (b, a) };
        prop_assert!(elevation::decode_rgb8(lo, 1.0) <= elevation::decode_rgb8(hi, 1.0));
    }
}
