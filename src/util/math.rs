//! Math type re-exports and small coordinate helpers.
//!
//! Re-exports the `glam` types used throughout the crate and provides the
//! squared-distance helper shared by the matching strategies.

// Re-export glam types
pub use glam::{Vec2, Vec3};

/// Squared Euclidean distance between two fixed-dimension points.
#[inline]
pub fn dist2<const N: usize>(a: [f32; N], b: [f32; N]) -> f32 {
    let mut acc = 0.0;
    for i in 0..N {
        let d = a[i] - b[i];
        acc += d * d;
    }
    acc
}
