/// Character-grid line rasterizer for terminal rendering
///
/// Lines are drawn on a pixel grid twice as tall as the terminal, then packed
/// two pixels per cell with half-block glyphs so cells come out roughly square.
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use wirecg_core::{Axis, ObjectKind, ProjectedLine};

const UPPER: u8 = 0b01;
const LOWER: u8 = 0b10;

/// Pixel rows per terminal row
pub const PIXELS_PER_ROW: u16 = 2;

/// Colour for a projected line: axis segments are red/green/blue, the rest by object kind
pub fn line_color(line: &ProjectedLine) -> Color {
    match line.axis {
        Some(Axis::X) => return Color::Red,
        Some(Axis::Y) => return Color::Green,
        Some(Axis::Z) => return Color::Blue,
        None => {}
    }
    match line.kind {
        ObjectKind::Grid => Color::DarkGrey,
        ObjectKind::Model => Color::White,
        ObjectKind::Ring => Color::Cyan,
        ObjectKind::Curve => Color::Magenta,
        ObjectKind::LSystem => Color::Yellow,
    }
}

/// Terminal renderer that rasterizes pixel-space lines into a character grid
pub struct LineRenderer {
    width: usize,
    height: usize,
    coverage: Vec<u8>,
    colors: Vec<Color>,
}

impl LineRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            coverage: vec![0; size],
            colors: vec![Color::Reset; size],
        }
    }

    /// Grid size in terminal cells
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Pixel size handed to the frame builder
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width as u32, (self.height * PIXELS_PER_ROW as usize) as u32)
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) != (self.width, self.height) {
            *self = Self::new(width, height);
        }
    }

    pub fn clear(&mut self) {
        self.coverage.fill(0);
        self.colors.fill(Color::Reset);
    }

    pub fn render_lines(&mut self, lines: &[ProjectedLine]) {
        for line in lines {
            self.draw_line(line.a.x, line.a.y, line.b.x, line.b.y, line_color(line));
        }
    }

    /// Bresenham between two pixel positions, skipping pixels off the grid
    pub fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Color) {
        let (Some((mut x, mut y)), Some((x1, y1))) = (to_pixel(x0, y0), to_pixel(x1, y1)) else {
            return;
        };

        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        // the walk is bounded by the longest axis
        let max_steps = dx.max(-dy);
        for _ in 0..=max_steps {
            self.plot(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn plot(&mut self, x: i64, y: i64, color: Color) {
        let pixel_rows = (self.height * PIXELS_PER_ROW as usize) as i64;
        if x < 0 || y < 0 || x >= self.width as i64 || y >= pixel_rows {
            return;
        }
        let row = y as usize / PIXELS_PER_ROW as usize;
        let idx = row * self.width + x as usize;
        self.coverage[idx] |= if y % 2 == 0 { UPPER } else { LOWER };
        self.colors[idx] = color;
    }

    /// Glyph for the cell at (col, row)
    pub fn glyph(&self, col: usize, row: usize) -> char {
        match self.coverage[row * self.width + col] {
            0 => ' ',
            UPPER => '▀',
            LOWER => '▄',
            _ => '█',
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = Color::Reset;
        writer.queue(SetForegroundColor(current))?;
        for y in 0..self.height {
            for x in 0..self.width {
                let color = self.colors[y * self.width + x];
                if color != current && self.coverage[y * self.width + x] != 0 {
                    writer.queue(SetForegroundColor(color))?;
                    current = color;
                }
                writer.queue(Print(self.glyph(x, y)))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Round to integer pixels; lines with a far-off or non-finite end are dropped
fn to_pixel(x: f32, y: f32) -> Option<(i64, i64)> {
    const LIMIT: f32 = 1.0e6;
    if !x.is_finite() || !y.is_finite() || x.abs() > LIMIT || y.abs() > LIMIT {
        return None;
    }
    Some((x.round() as i64, y.round() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn line(kind: ObjectKind, axis: Option<Axis>, a: (f32, f32), b: (f32, f32)) -> ProjectedLine {
        ProjectedLine {
            kind,
            axis,
            a: Point2::new(a.0, a.1),
            b: Point2::new(b.0, b.1),
        }
    }

    #[test]
    fn test_pixel_size_doubles_rows() {
        let renderer = LineRenderer::new(80, 24);
        assert_eq!(renderer.pixel_size(), (80, 48));
    }

    #[test]
    fn test_horizontal_line_fills_upper_halves() {
        let mut renderer = LineRenderer::new(10, 4);
        renderer.draw_line(0.0, 0.0, 9.0, 0.0, Color::White);
        for x in 0..10 {
            assert_eq!(renderer.glyph(x, 0), '▀');
        }
        assert_eq!(renderer.glyph(0, 1), ' ');
    }

    #[test]
    fn test_vertical_line_fills_full_cells() {
        let mut renderer = LineRenderer::new(4, 4);
        renderer.draw_line(2.0, 0.0, 2.0, 7.0, Color::White);
        for y in 0..4 {
            assert_eq!(renderer.glyph(2, y), '█');
        }
    }

    #[test]
    fn test_diagonal_reaches_both_ends() {
        let mut renderer = LineRenderer::new(8, 4);
        renderer.draw_line(7.0, 7.0, 0.0, 0.0, Color::White);
        assert_ne!(renderer.glyph(0, 0), ' ');
        assert_ne!(renderer.glyph(7, 3), ' ');
    }

    #[test]
    fn test_offscreen_pixels_are_skipped() {
        let mut renderer = LineRenderer::new(4, 2);
        renderer.draw_line(-100.0, 1.0, 100.0, 1.0, Color::White);
        assert!((0..4).all(|x| renderer.glyph(x, 0) == '▄'));

        renderer.clear();
        renderer.draw_line(f32::NAN, 0.0, 1.0, 1.0, Color::White);
        assert!((0..4).all(|x| renderer.glyph(x, 0) == ' '));
    }

    #[test]
    fn test_axis_colors() {
        assert_eq!(line_color(&line(ObjectKind::Model, Some(Axis::X), (0.0, 0.0), (1.0, 0.0))), Color::Red);
        assert_eq!(line_color(&line(ObjectKind::Model, Some(Axis::Y), (0.0, 0.0), (1.0, 0.0))), Color::Green);
        assert_eq!(line_color(&line(ObjectKind::Model, Some(Axis::Z), (0.0, 0.0), (1.0, 0.0))), Color::Blue);
        assert_eq!(line_color(&line(ObjectKind::Grid, None, (0.0, 0.0), (1.0, 0.0))), Color::DarkGrey);
    }

    #[test]
    fn test_draw_writes_every_cell() {
        let mut renderer = LineRenderer::new(3, 2);
        renderer.render_lines(&[line(ObjectKind::Curve, None, (0.0, 0.0), (2.0, 0.0))]);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches('▀').count(), 3);
    }
}
