/// Camera and projection utilities
///
/// OpenGL conventions throughout: right-handed view space looking down -Z,
/// NDC z in [-1, 1] with the near plane at -1.
use nalgebra::{Matrix4, Point3, Vector3};

use crate::vector::normalize_or_fallback;

const MIN_FOV_DEGREES: f32 = 1.0;
const MAX_FOV_DEGREES: f32 = 179.0;
const MIN_NEAR: f32 = 1e-3;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Width over height, falling back to 1 for an empty screen
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        return 1.0;
    }
    width as f32 / height as f32
}

/// Right-handed perspective projection.
///
/// The output w equals the negated view-space z; the divide happens downstream.
#[rustfmt::skip]
pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
    let fov = if fov_y_degrees.is_finite() {
        fov_y_degrees.clamp(MIN_FOV_DEGREES, MAX_FOV_DEGREES)
    } else {
        MAX_FOV_DEGREES / 2.0
    };
    if fov != fov_y_degrees {
        tracing::warn!(fov_y_degrees, fov, "field of view out of range, clamped");
    }
    let aspect = sanitize_aspect(aspect);
    let near = if near > 0.0 {
        near
    } else {
        tracing::warn!(near, "near plane must be positive, clamped");
        MIN_NEAR
    };
    let far = separate_planes(near, far);

    let f = 1.0 / (fov.to_radians() / 2.0).tan();
    let depth = near - far;

    Matrix4::new(
        f / aspect, 0.0, 0.0, 0.0,
        0.0, f, 0.0, 0.0,
        0.0, 0.0, (far + near) / depth, 2.0 * far * near / depth,
        0.0, 0.0, -1.0, 0.0,
    )
}

/// Linear remap of an axis-aligned box onto the [-1, 1] cube
#[rustfmt::skip]
pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Matrix4<f32> {
    let right = separate_planes(left, right);
    let top = separate_planes(bottom, top);
    let far = separate_planes(near, far);

    let w = right - left;
    let h = top - bottom;
    let d = far - near;

    Matrix4::new(
        2.0 / w, 0.0, 0.0, -(right + left) / w,
        0.0, 2.0 / h, 0.0, -(top + bottom) / h,
        0.0, 0.0, -2.0 / d, -(far + near) / d,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// World-to-camera matrix for a camera at `eye` looking at `target`.
///
/// When `up` is parallel to the viewing direction the world axis least aligned
/// with it is used as the up hint instead.
#[rustfmt::skip]
pub fn look_at(eye: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) -> Matrix4<f32> {
    let forward = normalize_or_fallback(&(target - eye));

    let mut side = forward.cross(up);
    if side.norm() <= f32::EPSILON {
        let hint = least_aligned_axis(&forward);
        tracing::warn!(?forward, ?up, ?hint, "camera up is parallel to view direction");
        side = forward.cross(&hint);
    }
    let side = normalize_or_fallback(&side);
    let up = side.cross(&forward);
    let eye = eye.coords;

    Matrix4::new(
        side.x, side.y, side.z, -side.dot(&eye),
        up.x, up.y, up.z, -up.dot(&eye),
        -forward.x, -forward.y, -forward.z, forward.dot(&eye),
        0.0, 0.0, 0.0, 1.0,
    )
}

fn least_aligned_axis(v: &Vector3<f32>) -> Vector3<f32> {
    let abs = v.abs();
    if abs.x <= abs.y && abs.x <= abs.z {
        Vector3::x()
    } else if abs.y <= abs.z {
        Vector3::y()
    } else {
        Vector3::z()
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        tracing::warn!(aspect, "invalid aspect ratio, using 1");
        1.0
    }
}

/// Returns `high`, nudged away from `low` when the two coincide
fn separate_planes(low: f32, high: f32) -> f32 {
    if high == low {
        tracing::warn!(low, high, "degenerate projection extent, widened by 1");
        high + 1.0
    } else {
        high
    }
}

/// Camera placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new(eye: Point3<f32>, target: Point3<f32>, up: Vector3<f32>) -> Self {
        Self { eye, target, up }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        look_at(&self.eye, &self.target, &self.up)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Point3::origin(),
            target: Point3::new(0.0, 0.0, 1.0),
            up: Vector3::new(0.0, 1.0, 0.0),
        }
    }
}

/// Projection configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Projection {
    pub mode: ProjectionMode,
    pub fov_y_degrees: f32,
    /// Full height of the orthographic view volume
    pub ortho_height: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    /// Create the projection matrix
    pub fn matrix(&self, aspect: f32) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => perspective(self.fov_y_degrees, aspect, self.near, self.far),
            ProjectionMode::Orthographic => {
                let half_h = self.ortho_height * 0.5;
                let half_w = half_h * sanitize_aspect(aspect);
                ortho(-half_w, half_w, -half_h, half_h, self.near, self.far)
            }
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            mode: ProjectionMode::Perspective,
            fov_y_degrees: 60.0,
            ortho_height: 4.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::homogenize;
    use nalgebra::Vector4;

    fn assert_close(a: &Matrix4<f32>, b: &Matrix4<f32>) {
        assert!((a - b).norm() < 1e-4, "{a} != {b}");
    }

    #[test]
    fn test_aspect_ratio() {
        assert!((aspect_ratio(800, 600) - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(aspect_ratio(800, 0), 1.0);
    }

    #[test]
    fn test_perspective_matches_gl_convention() {
        let m = perspective(60.0, 1.5, 0.1, 100.0);
        let expected = Matrix4::new_perspective(1.5, 60.0f32.to_radians(), 0.1, 100.0);
        assert_close(&m, &expected);
    }

    #[test]
    fn test_perspective_depth_range() {
        let m = perspective(45.0, 1.0, 1.0, 10.0);

        let near = m * Vector4::new(0.0, 0.0, -1.0, 1.0);
        assert!((near.w - 1.0).abs() < 1e-6);
        assert!((homogenize(&near).z + 1.0).abs() < 1e-5);

        let far = m * Vector4::new(0.0, 0.0, -10.0, 1.0);
        assert!((far.w - 10.0).abs() < 1e-6);
        assert!((homogenize(&far).z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_perspective_sanitizes_inputs() {
        let m = perspective(f32::NAN, 0.0, 0.0, 0.0);
        assert!(m.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_ortho_maps_box_to_cube() {
        let m = ortho(-4.0, 2.0, -1.0, 3.0, 0.5, 20.0);
        let expected = Matrix4::new_orthographic(-4.0, 2.0, -1.0, 3.0, 0.5, 20.0);
        assert_close(&m, &expected);

        let corner = m.transform_point(&Point3::new(-4.0, -1.0, -0.5));
        assert!((corner - Point3::new(-1.0, -1.0, -1.0)).norm() < 1e-5);
        let corner = m.transform_point(&Point3::new(2.0, 3.0, -20.0));
        assert!((corner - Point3::new(1.0, 1.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_ortho_degenerate_extent_is_finite() {
        let m = ortho(1.0, 1.0, 2.0, 2.0, 3.0, 3.0);
        assert!(m.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_look_at_matches_nalgebra() {
        let eye = Point3::new(3.0, 4.0, 5.0);
        let target = Point3::new(0.0, 1.0, 0.0);
        let up = Vector3::y();
        assert_close(&look_at(&eye, &target, &up), &Matrix4::look_at_rh(&eye, &target, &up));
    }

    #[test]
    fn test_look_at_moves_target_onto_negative_z() {
        let view = look_at(&Point3::new(0.0, 0.0, 5.0), &Point3::origin(), &Vector3::y());
        let p = view.transform_point(&Point3::origin());
        assert!((p - Point3::new(0.0, 0.0, -5.0)).norm() < 1e-5);
    }

    #[test]
    fn test_look_at_parallel_up_is_guarded() {
        let view = look_at(&Point3::new(0.0, 5.0, 0.0), &Point3::origin(), &Vector3::y());
        assert!(view.iter().all(|v| v.is_finite()));
        // rotation part stays orthonormal
        let r = view.fixed_view::<3, 3>(0, 0).into_owned();
        assert!((r * r.transpose() - nalgebra::Matrix3::identity()).norm() < 1e-5);
        // the target still lands straight ahead
        let p = view.transform_point(&Point3::origin());
        assert!((p - Point3::new(0.0, 0.0, -5.0)).norm() < 1e-5);
    }

    #[test]
    fn test_projection_modes() {
        let mut projection = Projection::default();
        let persp = projection.matrix(2.0);
        assert_eq!(persp[(3, 2)], -1.0);

        projection.mode = ProjectionMode::Orthographic;
        let ortho = projection.matrix(2.0);
        assert_eq!(ortho[(3, 3)], 1.0);
        // half height 2, half width 4
        assert!((ortho[(0, 0)] - 0.25).abs() < 1e-6);
        assert!((ortho[(1, 1)] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::default();
        let view = camera.view_matrix();
        // View matrix should be non-zero
        assert!(view.norm() > 0.0);
    }
}
