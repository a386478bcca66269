/// Save/restore stack of an accumulated composite transform
///
/// Every operation right-multiplies the current matrix (`current = current * op`),
/// so calls compose in the order they are made and each one acts in the local
/// frame set up by the calls before it. `translate` followed by `rotate_y`
/// rotates in place and then moves.
use nalgebra::{Matrix4, Point3, Vector3};

use crate::transform::Transform;

#[derive(Debug, Clone)]
pub struct TransformStack {
    current: Matrix4<f32>,
    saved: Vec<Matrix4<f32>>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            current: Matrix4::identity(),
            saved: Vec::new(),
        }
    }

    /// The live composite matrix
    pub fn current(&self) -> &Matrix4<f32> {
        &self.current
    }

    /// Number of saved matrices
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn load_identity(&mut self) {
        self.current = Matrix4::identity();
    }

    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Restore the most recently saved matrix and return it.
    ///
    /// Popping an empty stack leaves `current` alone and returns the identity.
    pub fn pop(&mut self) -> Matrix4<f32> {
        match self.saved.pop() {
            Some(m) => {
                self.current = m;
                m
            }
            None => {
                tracing::warn!("transform stack popped while empty");
                Matrix4::identity()
            }
        }
    }

    /// Right-multiply an arbitrary matrix into the current transform
    pub fn mult(&mut self, m: &Matrix4<f32>) {
        self.current = self.current * m;
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.mult(&Transform::translation(x, y, z));
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.mult(&Transform::scaling(x, y, z));
    }

    pub fn rotate_x(&mut self, degrees: f32) {
        self.mult(&Transform::rotation_x(degrees));
    }

    pub fn rotate_y(&mut self, degrees: f32) {
        self.mult(&Transform::rotation_y(degrees));
    }

    pub fn rotate_z(&mut self, degrees: f32) {
        self.mult(&Transform::rotation_z(degrees));
    }

    pub fn rotate_axis(&mut self, axis: &Vector3<f32>, degrees: f32) {
        self.mult(&Transform::rotation_axis(axis, degrees));
    }

    pub fn rotate_axis_around_pivot(
        &mut self,
        axis: &Vector3<f32>,
        degrees: f32,
        pivot: &Point3<f32>,
    ) {
        self.mult(&Transform::rotation_axis_around_pivot(axis, degrees, pivot));
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}
