//! Fibonacci Lattice Point Distribution
//!
//! Generates near-uniform unit vectors using the Fibonacci spiral (golden
//! angle) method, optionally jittered for less regular site sets.
//!
//! # Algorithm
//!
//! Points are placed at:
//! - Longitude: `2π * i / φ` (golden angle increments)
//! - Latitude: Evenly spaced in z-coordinate with pole offset
//!
//! Jitter moves each point within its tangent plane by up to a fraction of the
//! average point spacing, then renormalizes.
//!
//! # References
//!
//! - [Fibonacci Lattice Optimization](https://extremelearning.com.au/how-to-evenly-distribute-points-on-a-sphere-more-effectively-than-the-canonical-fibonacci-lattice/)

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::f32::consts::PI;

/// Golden ratio φ = (1 + √5) / 2
const PHI: f32 = 1.618_034;

/// Default jitter as fraction of average point spacing
pub const DEFAULT_JITTER: f32 = 0.5;

/// Get the optimal epsilon offset for a given point count
///
/// The epsilon parameter offsets points away from the poles, improving
/// uniformity by up to 8.3% compared to the canonical Fibonacci lattice.
fn get_epsilon(n: usize) -> f32 {
    match n {
        0..=23 => 0.33,
        24..=176 => 1.33,
        177..=889 => 3.33,
        890..=10999 => 10.0,
        _ => 27.5,
    }
}

/// Generate unit vectors on a Fibonacci lattice with the default jitter
///
/// # Example
///
/// ```rust
/// use spheroid_grid::generation::fibonacci_sphere_points;
///
/// let points = fibonacci_sphere_points(1000, 42);
/// assert_eq!(points.len(), 1000);
/// ```
pub fn fibonacci_sphere_points(count: usize, seed: u64) -> Vec<Vec3> {
    fibonacci_sphere_points_with_jitter(count, seed, DEFAULT_JITTER)
}

/// Generate unit vectors on a Fibonacci lattice
///
/// `jitter` is a fraction of the average point spacing; `0.0` gives the pure
/// lattice, which is the same for every seed.
pub fn fibonacci_sphere_points_with_jitter(count: usize, seed: u64, jitter: f32) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![Vec3::Z];
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let epsilon = get_epsilon(count);
    let n = count as f32;

    let avg_spacing = (4.0 * PI / n).sqrt();
    let jitter_amount = avg_spacing * jitter.max(0.0);

    (0..count)
        .map(|i| {
            let i_f = i as f32;

            let theta = 2.0 * PI * i_f / PHI;

            // Maps i from [0, n-1] to cos(phi) from [1, -1] with offset
            let cos_phi = 1.0 - 2.0 * (i_f + epsilon) / (n - 1.0 + 2.0 * epsilon);
            let sin_phi = (1.0 - cos_phi * cos_phi).sqrt();

            let base = Vec3::new(sin_phi * theta.cos(), sin_phi * theta.sin(), cos_phi);
            if jitter_amount <= 0.0 {
                return base.normalize();
            }

            let jitter_theta: f32 = rng.gen_range(0.0..2.0 * PI);
            let jitter_mag: f32 = rng.gen_range(0.0..jitter_amount);

            let up = if base.z.abs() < 0.9 { Vec3::Z } else { Vec3::X };
            let tangent1 = base.cross(up).normalize();
            let tangent2 = base.cross(tangent1).normalize();

            (base + tangent1 * jitter_mag * jitter_theta.cos() + tangent2 * jitter_mag * jitter_theta.sin())
                .normalize()
        })
        .collect()
}
