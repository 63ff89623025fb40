//! Value noise used for the animated vertical wobble.
//!
//! The arithmetic mirrors `random`/`noise` in `overlay.wgsl` and is kept in
//! f32 so CPU and GPU agree within floating-point tolerance.

use glam::Vec2;

const HASH_DIRECTION: Vec2 = Vec2::new(12.9898, 78.233);
const HASH_SCALE: f32 = 43758.5453123;

/// GLSL/WGSL `fract`: always in [0, 1), unlike `f32::fract` for negatives.
fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Stateless hash of a lattice point into [0, 1).
pub fn random(cell: Vec2) -> f32 {
    fract(cell.dot(HASH_DIRECTION).sin() * HASH_SCALE)
}

/// Smoothed value noise: hashed corner values blended with a cubic ease.
pub fn noise(point: Vec2) -> f32 {
    let i = point.floor();
    let f = point - i;

    let a = random(i);
    let b = random(i + Vec2::X);
    let c = random(i + Vec2::Y);
    let d = random(i + Vec2::ONE);

    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);

    a + (b - a) * u.x + (c - a) * u.y * (1.0 - u.x) + (d - b) * u.x * u.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_is_in_unit_interval() {
        for x in -20..20 {
            for y in -20..20 {
                let r = random(Vec2::new(x as f32, y as f32));
                assert!((0.0..1.0).contains(&r), "random({x}, {y}) = {r}");
            }
        }
    }

    #[test]
    fn noise_matches_corner_hash_on_lattice_points() {
        for &(x, y) in &[(0.0, 0.0), (3.0, -2.0), (-7.0, 11.0)] {
            let p = Vec2::new(x, y);
            assert!((noise(p) - random(p)).abs() < 1e-6);
        }
    }

    #[test]
    fn noise_is_deterministic() {
        let p = Vec2::new(1.37, -4.21);
        assert_eq!(noise(p).to_bits(), noise(p).to_bits());
    }

    #[test]
    fn noise_is_continuous_across_cell_edges() {
        let eps = 1e-3;
        for &(x, y) in &[(1.0, 0.5), (0.25, 2.0), (-3.0, -3.0)] {
            let below = noise(Vec2::new(x - eps, y - eps));
            let above = noise(Vec2::new(x + eps, y + eps));
            assert!((below - above).abs() < 0.01, "jump at ({x}, {y}): {below} vs {above}");
        }
    }

    #[test]
    fn noise_stays_near_unit_interval() {
        for i in 0..400 {
            let p = Vec2::new(i as f32 * 0.173, i as f32 * -0.091);
            let n = noise(p);
            assert!((-1e-4..=1.0 + 1e-4).contains(&n), "noise({p}) = {n}");
        }
    }
}
