//! Closed-form ray queries.

use crate::types::{constants, Vec3};

/// Intersect the ray `origin + t * direction` with a sphere.
///
/// Returns both roots `(t1, t2)` with `t1 <= t2`, measured in multiples of
/// `direction` (which need not be unit length). Returns `None` when the ray's
/// line misses the sphere or the direction has zero length.
///
/// Roots may be negative: a negative `t1` with positive `t2` means the origin
/// is inside the sphere.
pub fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f64) -> Option<(f64, f64)> {
    let m = center - origin;
    let a = direction.dot(direction);
    if a <= constants::EPSILON {
        return None;
    }
    let b = m.dot(direction);
    let c = m.dot(m) - radius * radius;

    let discriminant = b * b - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    Some(((b - root) / a, (b + root) / a))
}
