/// Curve generation over cyclic control polygons
///
/// The pipeline is: Chaikin corner cutting on the control polygon, quadratic
/// Bezier sampling over overlapping triples of the refined polygon, then
/// assembly of the samples into line segments.
use nalgebra::Point3;

use crate::geometry::Segment;
use crate::vector::lerp_point;

/// Refinement stops before the point count would pass this
pub const MAX_REFINED_POINTS: usize = 1 << 16;

/// Samples per quadratic never exceed this
pub const MAX_SAMPLES_PER_SEGMENT: usize = 1024;

/// One round of corner cutting per level.
///
/// Every edge `(p0, p1)`, including the wraparound edge, becomes the two points
/// `0.75 p0 + 0.25 p1` and `0.25 p0 + 0.75 p1`. Each level doubles the point
/// count; levels that would exceed [`MAX_REFINED_POINTS`] are skipped.
pub fn chaikin(points: &[Point3<f32>], levels: u32) -> Vec<Point3<f32>> {
    let mut current = points.to_vec();
    for level in 0..levels {
        let n = current.len();
        if n * 2 > MAX_REFINED_POINTS {
            tracing::warn!(level, levels, points = n, "chaikin refinement too deep, stopping");
            break;
        }
        let mut next = Vec::with_capacity(n * 2);
        for (i, p0) in current.iter().enumerate() {
            let p1 = &current[(i + 1) % n];
            next.push(Point3::from(p0.coords * 0.75 + p1.coords * 0.25));
            next.push(Point3::from(p0.coords * 0.25 + p1.coords * 0.75));
        }
        current = next;
    }
    current
}

/// Quadratic Bezier point by repeated linear interpolation
pub fn quadratic_bezier(
    p0: &Point3<f32>,
    p1: &Point3<f32>,
    p2: &Point3<f32>,
    t: f32,
) -> Point3<f32> {
    let a = lerp_point(p0, p1, t);
    let b = lerp_point(p1, p2, t);
    lerp_point(&a, &b, t)
}

/// Sample one quadratic per control point over the triples
/// `(c[i], c[i + 1], c[i + 2])`, indices wrapping.
///
/// Each triple gets `max(2, samples_per_segment)` evenly spaced samples; the
/// first sample of every triple after the first is skipped.
pub fn sample_cyclic_quadratic(
    control: &[Point3<f32>],
    samples_per_segment: usize,
) -> Vec<Point3<f32>> {
    let n = control.len();
    if n == 0 {
        return Vec::new();
    }
    let samples = samples_per_segment.max(2);
    let last = (samples - 1) as f32;

    let mut points = Vec::with_capacity(samples + (n - 1) * (samples - 1));
    for i in 0..n {
        let (p0, p1, p2) = (&control[i], &control[(i + 1) % n], &control[(i + 2) % n]);
        let first = if i == 0 { 0 } else { 1 };
        for j in first..samples {
            points.push(quadratic_bezier(p0, p1, p2, j as f32 / last));
        }
    }
    points
}

/// Break sampled points into consecutive, non-wrapping segments.
///
/// A segment whose start equals (by value) one of the control points is held
/// back; when `closed` is set it is emitted after the main run as a closing
/// edge from the following sample back to that control point. Open curves drop
/// those segments.
pub fn assemble_polyline(
    samples: &[Point3<f32>],
    control: &[Point3<f32>],
    closed: bool,
) -> Vec<Segment> {
    let mut main = Vec::with_capacity(samples.len());
    let mut closing = Vec::new();

    for pair in samples.windows(2) {
        let (start, next) = (pair[0], pair[1]);
        match control.iter().find(|c| **c == start) {
            Some(c) => closing.push(Segment::new(next, *c)),
            None => main.push(Segment::new(start, next)),
        }
    }

    if closed {
        main.extend(closing);
    }
    main
}

/// Parameters for a complete curve build
#[derive(Debug, Clone, PartialEq)]
pub struct CurveParams {
    pub control: Vec<Point3<f32>>,
    pub chaikin_levels: u32,
    pub samples_per_segment: usize,
    pub closed: bool,
}

impl CurveParams {
    /// Square control polygon of half-size `half` in the XY plane.
    ///
    /// A non-positive or non-finite `half` becomes 1.
    pub fn square(half: f32) -> Self {
        let half = if half > 0.0 && half.is_finite() {
            half
        } else {
            tracing::warn!(half, "square half-size must be positive, using 1");
            1.0
        };
        Self {
            control: vec![
                Point3::new(-half, -half, 0.0),
                Point3::new(half, -half, 0.0),
                Point3::new(half, half, 0.0),
                Point3::new(-half, half, 0.0),
            ],
            ..Self::default()
        }
    }
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            control: Vec::new(),
            chaikin_levels: 0,
            samples_per_segment: 8,
            closed: true,
        }
    }
}

/// Refine, sample and assemble a curve into object-space segments
pub fn build_curve(params: &CurveParams) -> Vec<Segment> {
    if params.control.len() < 3 {
        tracing::warn!(points = params.control.len(), "curve needs at least 3 control points");
        return Vec::new();
    }

    let samples_per_segment = if params.samples_per_segment > MAX_SAMPLES_PER_SEGMENT {
        tracing::warn!(
            samples = params.samples_per_segment,
            max = MAX_SAMPLES_PER_SEGMENT,
            "too many samples per curve segment, clamped"
        );
        MAX_SAMPLES_PER_SEGMENT
    } else {
        params.samples_per_segment
    };

    let refined = chaikin(&params.control, params.chaikin_levels);
    let samples = sample_cyclic_quadratic(&refined, samples_per_segment);
    assemble_polyline(&samples, &refined, params.closed)
}
