/// Frame assembly: scene parameters in, matrices and segment lists out
///
/// A [`Scene`] holds the configuration plus the live model rotation. Every
/// [`Scene::build_frame`] call recomputes all matrices and geometry from that
/// state; nothing carries over between frames.
use nalgebra::{Matrix4, Point2, Point3, Vector3};

use crate::curve::{build_curve, CurveParams};
use crate::geometry::{axes, classify_axis, cube, grid_xz, Axis, Segment};
use crate::lsystem::{parse_rules, LSystem};
use crate::projection::{aspect_ratio, Camera, Projection, ProjectionMode};
use crate::stack::TransformStack;
use crate::transform::{RotationState, Transform};
use crate::viewport::{project_segment, PixelRect, ViewportFraction};

#[cfg(feature = "serde")]
use crate::error::ConfigError;

/// Model placement and auto-spin
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ModelSettings {
    pub translate: Vector3<f32>,
    pub rotate_degrees: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub auto_spin: bool,
    pub spin_degrees_per_sec: Vector3<f32>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            translate: Vector3::new(0.0, 0.0, 6.0),
            rotate_degrees: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            auto_spin: true,
            spin_degrees_per_sec: Vector3::new(0.0, 45.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct CameraSettings {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, 3.0, -2.0),
            target: Point3::new(0.0, 0.0, 6.0),
            up: Vector3::new(0.0, 1.0, 0.0),
        }
    }
}

/// Grid, cube, axes and the ring of cube copies around the model
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct PrimitiveSettings {
    pub show_grid: bool,
    pub grid_extent: f32,
    pub grid_step: f32,
    pub show_cube: bool,
    pub cube_size: f32,
    pub show_axes: bool,
    pub axes_length: f32,
    pub ring_count: usize,
    pub ring_radius: f32,
    pub ring_scale: f32,
}

impl Default for PrimitiveSettings {
    fn default() -> Self {
        Self {
            show_grid: true,
            grid_extent: 8.0,
            grid_step: 1.0,
            show_cube: true,
            cube_size: 2.0,
            show_axes: true,
            axes_length: 2.0,
            ring_count: 4,
            ring_radius: 3.0,
            ring_scale: 0.4,
        }
    }
}

/// Closed curve drawn flat above the ground plane
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct CurveSettings {
    pub show: bool,
    /// Control polygon in the curve's own XY plane
    pub control: Vec<Point3<f32>>,
    pub chaikin_levels: u32,
    pub samples_per_segment: usize,
    pub closed: bool,
    pub height: f32,
}

impl CurveSettings {
    pub fn params(&self) -> CurveParams {
        CurveParams {
            control: self.control.clone(),
            chaikin_levels: self.chaikin_levels,
            samples_per_segment: self.samples_per_segment,
            closed: self.closed,
        }
    }
}

impl Default for CurveSettings {
    fn default() -> Self {
        let square = CurveParams::square(3.0);
        Self {
            show: true,
            control: square.control,
            chaikin_levels: 2,
            samples_per_segment: 6,
            closed: true,
            height: 0.05,
        }
    }
}

/// L-system drawn flat on the ground plane
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct LSystemSettings {
    pub show: bool,
    pub axiom: String,
    /// Rule text, e.g. `"F -> F-F+F+FF-F-F+F"`
    pub rules: String,
    pub iterations: f32,
    pub turn_degrees: f32,
    pub step: f32,
    pub scale: f32,
    pub height: f32,
}

impl LSystemSettings {
    /// Build the grammar, falling back to the Koch island rules when the text is malformed
    pub fn system(&self) -> LSystem {
        let rules = parse_rules(&self.rules).unwrap_or_else(|err| {
            tracing::warn!(%err, "invalid L-system rules, using quadratic Koch island");
            LSystem::quadratic_koch_island().rules
        });
        LSystem {
            axiom: self.axiom.clone(),
            rules,
            turn_degrees: self.turn_degrees,
            step: self.step,
        }
    }
}

impl Default for LSystemSettings {
    fn default() -> Self {
        Self {
            show: false,
            axiom: "F-F-F-F".to_string(),
            rules: "F -> F-F+F+FF-F-F+F".to_string(),
            iterations: 2.0,
            turn_degrees: 90.0,
            step: 1.0,
            scale: 0.2,
            height: 0.0,
        }
    }
}

/// Everything a frame build reads
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct SceneConfig {
    pub projection: Projection,
    pub viewport: ViewportFraction,
    pub model: ModelSettings,
    pub camera: CameraSettings,
    pub primitives: PrimitiveSettings,
    pub curve: CurveSettings,
    pub lsystem: LSystemSettings,
}

#[cfg(feature = "serde")]
impl SceneConfig {
    /// Parse a TOML scene description. Missing fields take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        parse_rules(&config.lsystem.rules)?;
        Ok(config)
    }
}

/// What a group of segments belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Grid,
    /// Cube followed by axes, both under the model matrix
    Model,
    Ring,
    Curve,
    LSystem,
}

/// Object-space segments sharing one model matrix
#[derive(Debug, Clone, PartialEq)]
pub struct FrameObject {
    pub kind: ObjectKind,
    pub model: Matrix4<f32>,
    pub segments: Vec<Segment>,
}

/// A line that survived the trivial reject, in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedLine {
    pub kind: ObjectKind,
    pub axis: Option<Axis>,
    pub a: Point2<f32>,
    pub b: Point2<f32>,
}

/// The output of one frame build
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Model matrix of the main object
    pub model: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub viewport: PixelRect,
    pub objects: Vec<FrameObject>,
}

impl Frame {
    pub fn segment_count(&self) -> usize {
        self.objects.iter().map(|o| o.segments.len()).sum()
    }

    /// Project every object to pixel space, composing `P * V * M` once per object.
    ///
    /// Output follows generation order; rejected segments are dropped.
    pub fn project(&self) -> Vec<ProjectedLine> {
        let mut lines = Vec::with_capacity(self.segment_count());
        for object in &self.objects {
            let mvp = Transform::mvp_matrix(&object.model, &self.view, &self.projection);
            // only the model carries axis segments; turtle paths also start at the origin
            let tag_axes = object.kind == ObjectKind::Model;
            for segment in &object.segments {
                if let Some([a, b]) = project_segment(segment, &mvp, &self.viewport) {
                    lines.push(ProjectedLine {
                        kind: object.kind,
                        axis: tag_axes.then(|| classify_axis(segment)).flatten(),
                        a,
                        b,
                    });
                }
            }
        }
        lines
    }
}

/// Scene parameters plus the live model rotation
#[derive(Debug, Clone)]
pub struct Scene {
    config: SceneConfig,
    rotation: RotationState,
    lsystem: LSystem,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Self {
        let r = config.model.rotate_degrees;
        let lsystem = config.lsystem.system();
        Self {
            rotation: RotationState::new(r.x, r.y, r.z),
            lsystem,
            config,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    /// Advance auto-spin by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if self.config.model.auto_spin {
            self.rotation.advance(&self.config.model.spin_degrees_per_sec, dt);
        }
    }

    /// Manual rotation in degrees
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rotation.rotate(dx, dy, dz);
    }

    pub fn set_perspective(&mut self, perspective: bool) {
        self.config.projection.mode = if perspective {
            ProjectionMode::Perspective
        } else {
            ProjectionMode::Orthographic
        };
    }

    pub fn toggle_projection(&mut self) {
        let perspective = self.config.projection.mode == ProjectionMode::Orthographic;
        self.set_perspective(perspective);
    }

    pub fn toggle_auto_spin(&mut self) {
        self.config.model.auto_spin = !self.config.model.auto_spin;
    }

    pub fn toggle_grid(&mut self) {
        self.config.primitives.show_grid = !self.config.primitives.show_grid;
    }

    pub fn toggle_curve(&mut self) {
        self.config.curve.show = !self.config.curve.show;
    }

    pub fn toggle_lsystem(&mut self) {
        self.config.lsystem.show = !self.config.lsystem.show;
    }

    pub fn camera(&self) -> Camera {
        let c = &self.config.camera;
        Camera::new(c.eye, c.target, c.up)
    }

    /// `T * Rz * Ry * Rx * S` from the current rotation
    pub fn model_matrix(&self) -> Matrix4<f32> {
        let m = &self.config.model;
        Transform::model_matrix(&m.translate, &self.rotation, &m.scale)
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.camera().view_matrix()
    }

    pub fn projection_matrix(&self, screen_width: u32, screen_height: u32) -> Matrix4<f32> {
        self.config
            .projection
            .matrix(aspect_ratio(screen_width, screen_height))
    }

    /// Build matrices and object-space geometry for one frame
    pub fn build_frame(&self, screen_width: u32, screen_height: u32) -> Frame {
        let model = self.model_matrix();
        let prims = &self.config.primitives;
        let mut objects = Vec::new();

        if prims.show_grid {
            objects.push(FrameObject {
                kind: ObjectKind::Grid,
                model: Matrix4::identity(),
                segments: grid_xz(prims.grid_extent, prims.grid_step),
            });
        }

        if prims.show_cube || prims.show_axes {
            let mut segments = Vec::new();
            if prims.show_cube {
                segments.extend(cube(prims.cube_size));
            }
            if prims.show_axes {
                segments.extend(axes(prims.axes_length));
            }
            objects.push(FrameObject {
                kind: ObjectKind::Model,
                model,
                segments,
            });
        }

        objects.extend(self.ring_objects(&model));

        let mut stack = TransformStack::new();
        let curve = &self.config.curve;
        if curve.show {
            stack.load_identity();
            stack.translate(0.0, curve.height, 0.0);
            stack.rotate_x(-90.0);
            objects.push(FrameObject {
                kind: ObjectKind::Curve,
                model: *stack.current(),
                segments: build_curve(&curve.params()),
            });
        }

        let lsystem = &self.config.lsystem;
        if lsystem.show {
            stack.load_identity();
            stack.translate(0.0, lsystem.height, 0.0);
            stack.rotate_x(-90.0);
            stack.scale(lsystem.scale, lsystem.scale, lsystem.scale);
            objects.push(FrameObject {
                kind: ObjectKind::LSystem,
                model: *stack.current(),
                segments: self.lsystem.build(lsystem.iterations).segments,
            });
        }

        let frame = Frame {
            model,
            view: self.view_matrix(),
            projection: self.projection_matrix(screen_width, screen_height),
            viewport: self.config.viewport.to_pixels(screen_width, screen_height),
            objects,
        };
        tracing::debug!(
            objects = frame.objects.len(),
            segments = frame.segment_count(),
            "built frame"
        );
        frame
    }

    /// Smaller cube copies spaced evenly around the model's local Y axis
    fn ring_objects(&self, model: &Matrix4<f32>) -> Vec<FrameObject> {
        let prims = &self.config.primitives;
        if prims.ring_count == 0 || !prims.show_cube {
            return Vec::new();
        }

        let mut stack = TransformStack::new();
        stack.mult(model);
        let step = 360.0 / prims.ring_count as f32;
        let segments = cube(prims.cube_size);

        (0..prims.ring_count)
            .map(|i| {
                stack.push();
                stack.rotate_y(step * i as f32);
                stack.translate(prims.ring_radius, 0.0, 0.0);
                stack.scale(prims.ring_scale, prims.ring_scale, prims.ring_scale);
                let placement = *stack.current();
                stack.pop();
                FrameObject {
                    kind: ObjectKind::Ring,
                    model: placement,
                    segments: segments.clone(),
                }
            })
            .collect()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}
