/// Clip space -> NDC -> pixel mapping for line segments
use nalgebra::{Matrix4, Point2, Point3};

use crate::geometry::Segment;
use crate::vector::{homogenize, point4};

/// Viewport as fractions of the screen, origin bottom-left
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ViewportFraction {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl ViewportFraction {
    /// Resolve against a screen size. Width and height never drop below one pixel.
    pub fn to_pixels(&self, screen_width: u32, screen_height: u32) -> PixelRect {
        let (sw, sh) = (screen_width as f32, screen_height as f32);
        PixelRect {
            x: self.x * sw,
            y: self.y * sh,
            width: (self.w * sw).max(1.0),
            height: (self.h * sh).max(1.0),
        }
    }
}

impl Default for ViewportFraction {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            w: 1.0,
            h: 1.0,
        }
    }
}

/// Viewport rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// True when both endpoints sit beyond the same face of the NDC cube.
///
/// This is a trivial reject, not clipping: a segment whose endpoints violate
/// different faces is kept and drawn uncropped.
pub fn trivially_rejected(a: &Point3<f32>, b: &Point3<f32>) -> bool {
    (0..3).any(|axis| {
        (a[axis] < -1.0 && b[axis] < -1.0) || (a[axis] > 1.0 && b[axis] > 1.0)
    })
}

/// Map an NDC point into the pixel rectangle, flipping y so +y points down
pub fn ndc_to_pixel(ndc: &Point3<f32>, rect: &PixelRect) -> Point2<f32> {
    let x = (ndc.x * 0.5 + 0.5) * rect.width + rect.x;
    let y_up = (ndc.y * 0.5 + 0.5) * rect.height + rect.y;
    let y = (rect.y + rect.height) - (y_up - rect.y);
    Point2::new(x, y)
}

/// Project one object-space segment through a composite `P * V * M`.
///
/// Returns `None` when the segment is trivially rejected.
pub fn project_segment(
    segment: &Segment,
    mvp: &Matrix4<f32>,
    rect: &PixelRect,
) -> Option<[Point2<f32>; 2]> {
    let a = homogenize(&(mvp * point4(&segment.a)));
    let b = homogenize(&(mvp * point4(&segment.b)));

    if trivially_rejected(&a, &b) {
        return None;
    }

    Some([ndc_to_pixel(&a, rect), ndc_to_pixel(&b, rect)])
}

/// Project a segment list, keeping generation order.
///
/// Rejected segments come back as `None` so positions still line up with the input.
pub fn project_segments(
    segments: &[Segment],
    mvp: &Matrix4<f32>,
    rect: &PixelRect,
) -> Vec<Option<[Point2<f32>; 2]>> {
    segments
        .iter()
        .map(|segment| project_segment(segment, mvp, rect))
        .collect()
}
