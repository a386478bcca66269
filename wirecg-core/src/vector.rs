/// Vector helpers layered over nalgebra's value types
///
/// nalgebra already supplies the arithmetic (add, subtract, negate,
/// `component_mul`, scalar multiply, `dot`, `cross`, `norm`). This module adds
/// the degenerate-case behaviour the render pipeline relies on.
use nalgebra::{Point3, Vector3, Vector4};

/// Below this |w| the homogeneous divide is skipped
pub const HOMOGENEOUS_EPSILON: f32 = 1e-8;

/// Direction substituted when normalizing a zero-length vector
pub const FALLBACK_DIRECTION: Vector3<f32> = Vector3::new(1.0, 0.0, 0.0);

/// Normalize without ever dividing by zero.
///
/// A vector whose length is at most `f32::EPSILON` normalizes to
/// [`FALLBACK_DIRECTION`].
pub fn normalize_or_fallback(v: &Vector3<f32>) -> Vector3<f32> {
    v.try_normalize(f32::EPSILON).unwrap_or_else(|| {
        tracing::trace!(?v, "normalizing zero-length vector, using fallback direction");
        FALLBACK_DIRECTION
    })
}

/// Lift a point into homogeneous coordinates (w = 1)
pub fn point4(p: &Point3<f32>) -> Vector4<f32> {
    p.to_homogeneous()
}

/// Lift a direction into homogeneous coordinates (w = 0)
pub fn direction4(v: &Vector3<f32>) -> Vector4<f32> {
    v.to_homogeneous()
}

/// Perspective divide.
///
/// Returns (x/w, y/w, z/w), or (x, y, z) unchanged when |w| is below
/// [`HOMOGENEOUS_EPSILON`].
pub fn homogenize(v: &Vector4<f32>) -> Point3<f32> {
    if v.w.abs() < HOMOGENEOUS_EPSILON {
        return Point3::new(v.x, v.y, v.z);
    }
    let inv_w = 1.0 / v.w;
    Point3::new(v.x * inv_w, v.y * inv_w, v.z * inv_w)
}

/// Linear interpolation between two points, exact at t = 0 and t = 1
pub fn lerp_point(a: &Point3<f32>, b: &Point3<f32>, t: f32) -> Point3<f32> {
    Point3::from(a.coords * (1.0 - t) + b.coords * t)
}
