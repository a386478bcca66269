/// Wireframe primitives as object-space line segments
use nalgebra::Point3;

/// An ordered pair of points. Order matters once segments are chained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Point3<f32>,
    pub b: Point3<f32>,
}

impl Segment {
    pub fn new(a: Point3<f32>, b: Point3<f32>) -> Self {
        Self { a, b }
    }
}

/// Coordinate axis an axis segment runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Cube edges: bottom loop, verticals, top loop
#[rustfmt::skip]
const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 2), (2, 3), (3, 0),
    (0, 4), (1, 5), (2, 6), (3, 7),
    (4, 5), (5, 6), (6, 7), (7, 4),
];

/// Wire cube centered at the origin with edge length `length`
pub fn cube(length: f32) -> Vec<Segment> {
    let s = length * 0.5;
    let v = [
        Point3::new(-s, -s, -s),
        Point3::new(s, -s, -s),
        Point3::new(s, s, -s),
        Point3::new(-s, s, -s),
        Point3::new(-s, -s, s),
        Point3::new(s, -s, s),
        Point3::new(s, s, s),
        Point3::new(-s, s, s),
    ];

    CUBE_EDGES
        .iter()
        .map(|&(i, j)| Segment::new(v[i], v[j]))
        .collect()
}

/// Six segments from the origin along +X, -X, +Y, -Y, +Z, -Z
pub fn axes(length: f32) -> Vec<Segment> {
    let o = Point3::origin();
    vec![
        Segment::new(o, Point3::new(length, 0.0, 0.0)),
        Segment::new(o, Point3::new(-length, 0.0, 0.0)),
        Segment::new(o, Point3::new(0.0, length, 0.0)),
        Segment::new(o, Point3::new(0.0, -length, 0.0)),
        Segment::new(o, Point3::new(0.0, 0.0, length)),
        Segment::new(o, Point3::new(0.0, 0.0, -length)),
    ]
}

/// Grid lines per side of the origin never exceed this
pub const MAX_GRID_STEPS: i32 = 1000;

/// Ground grid on the y = 0 plane.
///
/// A non-positive `step` becomes 1 and `extent` is raised to at least `step`.
/// `N` is capped at [`MAX_GRID_STEPS`].
/// The extent snaps up to a whole number of steps `N`, giving `2 * (2N + 1)`
/// segments: for each `i` in `-N..=N`, one line along X at `z = i * step`
/// followed by one along Z at `x = i * step`.
pub fn grid_xz(extent: f32, step: f32) -> Vec<Segment> {
    let step = if step > 0.0 && step.is_finite() {
        step
    } else {
        tracing::warn!(step, "grid step must be positive, using 1");
        1.0
    };
    let extent = extent.max(step);

    let mut n = (extent / step).ceil() as i32;
    if n > MAX_GRID_STEPS {
        tracing::warn!(extent, step, max = MAX_GRID_STEPS, "grid too dense, truncating extent");
        n = MAX_GRID_STEPS;
    }
    let e = n as f32 * step;

    let mut lines = Vec::with_capacity(4 * n as usize + 2);
    for i in -n..=n {
        let offset = i as f32 * step;
        lines.push(Segment::new(Point3::new(-e, 0.0, offset), Point3::new(e, 0.0, offset)));
        lines.push(Segment::new(Point3::new(offset, 0.0, -e), Point3::new(offset, 0.0, e)));
    }
    lines
}

/// Which axis a segment draws, if it is an axis segment.
///
/// Axis segments start at the origin and end with the other two components
/// exactly zero, the shape [`axes`] produces.
pub fn classify_axis(segment: &Segment) -> Option<Axis> {
    const EPS: f32 = 1e-6;
    let a = segment.a;
    if a.x.abs() >= EPS || a.y.abs() >= EPS || a.z.abs() >= EPS {
        return None;
    }

    let b = segment.b;
    match (b.x == 0.0, b.y == 0.0, b.z == 0.0) {
        (_, true, true) => Some(Axis::X),
        (true, _, true) => Some(Axis::Y),
        (true, true, _) => Some(Axis::Z),
        _ => None,
    }
}

/// Chain consecutive points into segments, optionally closing the loop
pub fn polyline_segments(points: &[Point3<f32>], closed: bool) -> Vec<Segment> {
    let mut segments: Vec<Segment> = points
        .windows(2)
        .map(|pair| Segment::new(pair[0], pair[1]))
        .collect();
    if closed && points.len() > 2 {
        segments.push(Segment::new(points[points.len() - 1], points[0]));
    }
    segments
}
