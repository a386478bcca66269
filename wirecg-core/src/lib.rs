/// wirecg Core Library - Wireframe transformation and projection pipeline
///
/// This library provides the windowing-free core of a wireframe viewer:
/// homogeneous transforms, a matrix stack, camera and projection builders,
/// line-segment primitives, curve and L-system generators, and the per-frame
/// assembly that turns a scene description into pixel-space lines.

pub mod curve;
pub mod error;
pub mod geometry;
pub mod lsystem;
pub mod matrix;
pub mod projection;
pub mod scene;
pub mod stack;
pub mod transform;
pub mod vector;
pub mod viewport;

// Re-export commonly used types
pub use curve::{build_curve, CurveParams};
pub use error::{GrammarError, MathError};
pub use geometry::{Axis, Segment};
pub use lsystem::{LSystem, TurtlePath};
pub use projection::{Camera, Projection, ProjectionMode};
pub use scene::{Frame, FrameObject, ObjectKind, ProjectedLine, Scene, SceneConfig};
pub use stack::TransformStack;
pub use transform::{RotationState, Transform};
pub use viewport::{PixelRect, ViewportFraction};

#[cfg(feature = "serde")]
pub use error::ConfigError;
