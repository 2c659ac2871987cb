//! Geometry primitives for the simulated indoor coordinate space
//!
//! Positions are expressed in the route's local coordinate space (metres),
//! not geographic coordinates.

/// 3-vector in route-local space.
pub type Vec3 = nalgebra::Vector3<f32>;

/// Tolerance below which a vector is treated as zero-length.
pub const EPSILON: f32 = 1e-6;

/// Normalized vector from `from` to `to`.
///
/// Returns the zero vector when the two points coincide (within tolerance),
/// which callers must treat as "suppress directional rendering".
pub fn unit_direction(from: &Vec3, to: &Vec3) -> Vec3 {
    let delta = to - from;
    let norm = delta.norm();
    if norm < EPSILON {
        Vec3::zeros()
    } else {
        delta / norm
    }
}

/// Euclidean distance between two points.
pub fn euclidean_distance(a: &Vec3, b: &Vec3) -> f32 {
    (b - a).norm()
}
