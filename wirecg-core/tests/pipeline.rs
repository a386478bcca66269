use nalgebra::{Matrix4, Point2, Point3, Vector3};
use tracing_subscriber::util::SubscriberInitExt;
use wirecg_core::geometry::{cube, grid_xz};
use wirecg_core::vector::{homogenize, point4};
use wirecg_core::viewport::ndc_to_pixel;
use wirecg_core::{
    Frame, FrameObject, LSystem, ObjectKind, PixelRect, ProjectionMode, Scene, SceneConfig,
    Segment, Transform, TransformStack,
};

fn test_logging() -> tracing::subscriber::DefaultGuard {
    tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .finish()
        .set_default()
}

fn assert_close(a: &Matrix4<f32>, b: &Matrix4<f32>) {
    assert!((a - b).norm() < 1e-4, "{a} != {b}");
}

fn rank(kind: ObjectKind) -> u8 {
    match kind {
        ObjectKind::Grid => 0,
        ObjectKind::Model => 1,
        ObjectKind::Ring => 2,
        ObjectKind::Curve => 3,
        ObjectKind::LSystem => 4,
    }
}

fn flat_frame(segments: Vec<Segment>) -> Frame {
    Frame {
        model: Matrix4::identity(),
        view: Matrix4::identity(),
        projection: Matrix4::identity(),
        viewport: PixelRect {
            x: 0.0,
            y: 0.0,
            width: 800.0,
            height: 600.0,
        },
        objects: vec![FrameObject {
            kind: ObjectKind::Model,
            model: Matrix4::identity(),
            segments,
        }],
    }
}

#[test]
fn test_identity_pipeline_maps_ndc_to_pixels() {
    let frame = flat_frame(vec![
        Segment::new(Point3::new(-0.5, 0.0, 0.0), Point3::new(0.5, 0.5, 0.0)),
        // both endpoints beyond +x
        Segment::new(Point3::new(2.0, 0.0, 0.0), Point3::new(3.0, 0.0, 0.0)),
        // opposite sides, kept uncropped
        Segment::new(Point3::new(-2.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)),
    ]);

    let lines = frame.project();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].a, Point2::new(200.0, 300.0));
    assert_eq!(lines[0].b, Point2::new(600.0, 150.0));
    assert_eq!(lines[1].a, Point2::new(-400.0, 300.0));
    assert_eq!(lines[1].b, Point2::new(1200.0, 300.0));
}

#[test]
fn test_model_origin_lands_at_viewport_center() {
    let _guard = test_logging();
    let mut config = SceneConfig::default();
    config.model.auto_spin = false;
    let scene = Scene::new(config);
    let frame = scene.build_frame(800, 600);

    // the default camera looks straight at the model position
    let mvp = Transform::mvp_matrix(&frame.model, &frame.view, &frame.projection);
    let ndc = homogenize(&(mvp * point4(&Point3::origin())));
    let pixel = ndc_to_pixel(&ndc, &frame.viewport);
    assert!((pixel - Point2::new(400.0, 300.0)).norm() < 1e-2, "{pixel}");
    assert!(ndc.z > -1.0 && ndc.z < 1.0);
}

#[test]
fn test_projected_lines_follow_generation_order() {
    let _guard = test_logging();
    let mut scene = Scene::default();
    scene.toggle_lsystem();
    scene.set_perspective(false);
    assert_eq!(scene.config().projection.mode, ProjectionMode::Orthographic);

    let frame = scene.build_frame(120, 80);
    let lines = frame.project();
    assert!(!lines.is_empty());
    assert!(lines.len() <= frame.segment_count());
    assert!(lines.windows(2).all(|w| rank(w[0].kind) <= rank(w[1].kind)));
    assert!(lines
        .iter()
        .all(|l| l.a.x.is_finite() && l.a.y.is_finite() && l.b.x.is_finite() && l.b.y.is_finite()));
}

#[test]
fn test_frames_are_rebuilt_from_state() {
    let mut scene = Scene::default();
    let first = scene.build_frame(800, 600);
    assert_eq!(scene.build_frame(800, 600), first);

    scene.update(1.0);
    let spun = scene.build_frame(800, 600);
    assert_ne!(spun.model, first.model);
    assert_eq!(spun.view, first.view);
    assert_eq!(spun.segment_count(), first.segment_count());
}

#[test]
fn test_stack_placement_matches_explicit_product() {
    let mut stack = TransformStack::new();
    stack.translate(1.0, 2.0, 3.0);
    stack.push();
    stack.rotate_y(90.0);
    stack.scale(2.0, 2.0, 2.0);
    let placed = *stack.current();
    stack.pop();

    let expected = Transform::translation(1.0, 2.0, 3.0)
        * Transform::rotation_y(90.0)
        * Transform::scaling(2.0, 2.0, 2.0);
    assert_close(&placed, &expected);
    assert_close(stack.current(), &Transform::translation(1.0, 2.0, 3.0));
}

#[test]
fn test_empty_pop_recovers() {
    let _guard = test_logging();
    let mut stack = TransformStack::new();
    stack.translate(4.0, 0.0, 0.0);
    assert_eq!(stack.pop(), Matrix4::identity());
    assert_close(stack.current(), &Transform::translation(4.0, 0.0, 0.0));
    assert_eq!(stack.depth(), 0);
}

#[test]
fn test_primitive_counts() {
    assert_eq!(grid_xz(3.0, 1.0).len(), 14);

    let edges = cube(2.0);
    assert_eq!(edges.len(), 12);
    for s in &edges {
        for p in [s.a, s.b] {
            assert_eq!(p.coords.abs(), Vector3::new(1.0, 1.0, 1.0));
        }
    }
}

#[test]
fn test_doubling_lsystem_walk() {
    let system = LSystem::new("F", [('F', "F+F".to_string())].into_iter().collect());
    let derived = system.derive(1.0);
    assert_eq!(derived, "F+F");

    let path = system.interpret(&derived);
    assert_eq!(path.vertices.len(), 3);
    assert_eq!(path.segments.len(), 2);
    let d0 = path.segments[0].b - path.segments[0].a;
    let d1 = path.segments[1].b - path.segments[1].a;
    let angle = d0.angle(&d1).to_degrees();
    assert!((angle - 90.0).abs() < 1e-3);
}
