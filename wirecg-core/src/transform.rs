/// 3D transformation matrices and rotation state
///
/// All angles are in degrees. Every builder returns a fresh matrix; composition
/// is left to the caller (`a * b` applies `b` first).
use nalgebra::{Matrix4, Point3, Vector3};

use crate::vector::normalize_or_fallback;

/// Rotation state around three axes (in degrees)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in degrees)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// Advance by an angular velocity (degrees per second) over `dt` seconds
    pub fn advance(&mut self, speed: &Vector3<f32>, dt: f32) {
        self.rotate(speed.x * dt, speed.y * dt, speed.z * dt);
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    #[rustfmt::skip]
    pub fn translation(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, x,
            0.0, 1.0, 0.0, y,
            0.0, 0.0, 1.0, z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Create a scale matrix
    #[rustfmt::skip]
    pub fn scaling(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new(
            sx, 0.0, 0.0, 0.0,
            0.0, sy, 0.0, 0.0,
            0.0, 0.0, sz, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    #[rustfmt::skip]
    pub fn rotation_x(degrees: f32) -> Matrix4<f32> {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, cos, -sin, 0.0,
            0.0, sin, cos, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    #[rustfmt::skip]
    pub fn rotation_y(degrees: f32) -> Matrix4<f32> {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Matrix4::new(
            cos, 0.0, sin, 0.0,
            0.0, 1.0, 0.0, 0.0,
            -sin, 0.0, cos, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    #[rustfmt::skip]
    pub fn rotation_z(degrees: f32) -> Matrix4<f32> {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Matrix4::new(
            cos, -sin, 0.0, 0.0,
            sin, cos, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rodrigues rotation about an arbitrary axis through the origin.
    ///
    /// The axis is normalized first; a zero axis falls back to +X.
    #[rustfmt::skip]
    pub fn rotation_axis(axis: &Vector3<f32>, degrees: f32) -> Matrix4<f32> {
        let n = normalize_or_fallback(axis);
        let (sin, cos) = degrees.to_radians().sin_cos();
        let t = 1.0 - cos;
        let (x, y, z) = (n.x, n.y, n.z);

        Matrix4::new(
            cos + x * x * t, x * y * t - z * sin, x * z * t + y * sin, 0.0,
            x * y * t + z * sin, cos + y * y * t, y * z * t - x * sin, 0.0,
            x * z * t - y * sin, y * z * t + x * sin, cos + z * z * t, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rodrigues rotation about an axis passing through `pivot`
    pub fn rotation_axis_around_pivot(
        axis: &Vector3<f32>,
        degrees: f32,
        pivot: &Point3<f32>,
    ) -> Matrix4<f32> {
        Self::translation(pivot.x, pivot.y, pivot.z)
            * Self::rotation_axis(axis, degrees)
            * Self::translation(-pivot.x, -pivot.y, -pivot.z)
    }

    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        // Apply rotations in order: X, then Y, then Z
        Self::rotation_z(rotation.z) * Self::rotation_y(rotation.y) * Self::rotation_x(rotation.x)
    }

    /// Model matrix `T * Rz * Ry * Rx * S`: scale first, translate last
    pub fn model_matrix(
        translate: &Vector3<f32>,
        rotation: &RotationState,
        scale: &Vector3<f32>,
    ) -> Matrix4<f32> {
        Self::translation(translate.x, translate.y, translate.z)
            * Self::rotation_matrix(rotation)
            * Self::scaling(scale.x, scale.y, scale.z)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}
