/// Half-block rasterizer implementing the core drawing surface
use crossterm::{
    cursor,
    style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use fill3d_core::{Affine, Color, Surface, Vector2};
use std::io::Write;

/// Each terminal cell shows two stacked pixels with this glyph:
/// foreground paints the top pixel, background the bottom one.
const HALF_BLOCK: char = '▀';

/// Terminal-backed [`Surface`].
///
/// The pixel grid is `cols` wide and `rows * 2` tall. Paths are collected
/// as polygons in pixel space and filled with an even-odd scanline.
pub struct TerminalSurface {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
    background: Color,
    transform: Affine,
    subpaths: Vec<Subpath>,
}

#[derive(Debug, Default)]
struct Subpath {
    points: Vec<Vector2>,
    closed: bool,
}

impl TerminalSurface {
    pub fn new(cols: u16, rows: u16) -> Self {
        let width = cols as usize;
        let height = rows as usize * 2;
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width * height],
            background: Color::BLACK,
            transform: Affine::IDENTITY,
            subpaths: Vec::new(),
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self.pixels.fill(background);
        self
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.width = cols as usize;
        self.height = rows as usize * 2;
        self.pixels = vec![self.background; self.width * self.height];
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    fn put(&mut self, x: i64, y: i64, color: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }

    /// Edges of every subpath, each implicitly closed
    fn fill_edges(&self) -> Vec<(Vector2, Vector2)> {
        let mut edges = Vec::new();
        for sub in &self.subpaths {
            let n = sub.points.len();
            if n < 2 {
                continue;
            }
            for i in 0..n {
                let (a, b) = (sub.points[i], sub.points[(i + 1) % n]);
                if [a.x, a.y, b.x, b.y].iter().all(|v| v.is_finite()) {
                    edges.push((a, b));
                }
            }
        }
        edges
    }

    fn current(&mut self) -> &mut Subpath {
        if self.subpaths.is_empty() {
            self.subpaths.push(Subpath::default());
        }
        let last = self.subpaths.len() - 1;
        &mut self.subpaths[last]
    }

    fn draw_line(&mut self, a: Vector2, b: Vector2, color: Color) {
        let bounds = (
            Vector2::new(-1.0, -1.0),
            Vector2::new(self.width as f32 + 1.0, self.height as f32 + 1.0),
        );
        let Some((a, b)) = clip_segment(a, b, bounds) else {
            return;
        };

        let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let p = a + (b - a) * t;
            self.put(p.x.floor() as i64, p.y.floor() as i64, color);
        }
    }

    /// Write the grid to `writer`, one terminal row per two pixel rows.
    pub fn present<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in 0..self.height / 2 {
            writer.queue(cursor::MoveTo(0, row as u16))?;
            let mut last: Option<(Color, Color)> = None;
            for x in 0..self.width {
                let top = self.pixels[(row * 2) * self.width + x];
                let bottom = self.pixels[(row * 2 + 1) * self.width + x];
                if last != Some((top, bottom)) {
                    writer.queue(SetForegroundColor(to_terminal(top)))?;
                    writer.queue(SetBackgroundColor(to_terminal(bottom)))?;
                    last = Some((top, bottom));
                }
                writer.queue(Print(HALF_BLOCK))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn width(&self) -> u32 {
        self.width as u32
    }

    fn height(&self) -> u32 {
        self.height as u32
    }

    fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.transform.apply(Vector2::new(x, y));
        self.subpaths.push(Subpath {
            points: vec![p],
            closed: false,
        });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.transform.apply(Vector2::new(x, y));
        self.current().points.push(p);
    }

    fn close_path(&mut self) {
        if let Some(sub) = self.subpaths.last_mut() {
            sub.closed = true;
        }
    }

    fn fill(&mut self, color: Color) {
        let edges = self.fill_edges();
        if edges.is_empty() {
            return;
        }

        let mut crossings = Vec::new();
        for y in 0..self.height {
            let scan = y as f32 + 0.5;
            crossings.clear();
            for &(a, b) in &edges {
                // Half-open test so shared vertices count once
                if (a.y <= scan) != (b.y <= scan) {
                    crossings.push(a.x + (scan - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
            crossings.sort_by(f32::total_cmp);

            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil().max(0.0);
                let end = (span[1] - 0.5).floor().min(self.width as f32 - 1.0);
                if start > end {
                    continue;
                }
                for x in start as usize..=end as usize {
                    self.pixels[y * self.width + x] = color;
                }
            }
        }
    }

    fn stroke(&mut self, color: Color) {
        let segments: Vec<(Vector2, Vector2)> = self
            .subpaths
            .iter()
            .flat_map(|sub| {
                let mut segs: Vec<_> = sub.points.windows(2).map(|w| (w[0], w[1])).collect();
                if sub.closed && sub.points.len() > 2 {
                    segs.push((sub.points[sub.points.len() - 1], sub.points[0]));
                }
                segs
            })
            .collect();

        for (a, b) in segments {
            self.draw_line(a, b, color);
        }
    }
}

/// Liang-Barsky clip of segment `a`-`b` to the box `bounds`
fn clip_segment(a: Vector2, b: Vector2, bounds: (Vector2, Vector2)) -> Option<(Vector2, Vector2)> {
    if ![a.x, a.y, b.x, b.y].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (min, max) = bounds;
    let d = b - a;
    let (mut t0, mut t1) = (0.0_f32, 1.0_f32);

    for (p, q) in [
        (-d.x, a.x - min.x),
        (d.x, max.x - a.x),
        (-d.y, a.y - min.y),
        (d.y, max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }
    }
    Some((a + d * t0, a + d * t1))
}

fn to_terminal(color: Color) -> style::Color {
    style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(surface: &TerminalSurface, color: Color) -> usize {
        (0..surface.height)
            .flat_map(|y| (0..surface.width).map(move |x| (x, y)))
            .filter(|&(x, y)| surface.pixel(x, y) == Some(color))
            .count()
    }

    fn square(surface: &mut TerminalSurface, x0: f32, y0: f32, x1: f32, y1: f32) {
        surface.begin_path();
        surface.move_to(x0, y0);
        surface.line_to(x1, y0);
        surface.line_to(x1, y1);
        surface.line_to(x0, y1);
        surface.close_path();
    }

    #[test]
    fn test_pixel_grid_is_two_per_cell() {
        let surface = TerminalSurface::new(80, 24);
        assert_eq!(surface.width(), 80);
        assert_eq!(surface.height(), 48);
    }

    #[test]
    fn test_fill_square_covers_pixel_centers() {
        let mut surface = TerminalSurface::new(10, 5);
        square(&mut surface, 2.0, 2.0, 6.0, 5.0);
        surface.fill(Color::RED);

        assert_eq!(filled(&surface, Color::RED), 4 * 3);
        assert_eq!(surface.pixel(2, 2), Some(Color::RED));
        assert_eq!(surface.pixel(5, 4), Some(Color::RED));
        assert_eq!(surface.pixel(6, 4), Some(Color::BLACK));
        assert_eq!(surface.pixel(2, 5), Some(Color::BLACK));
    }

    #[test]
    fn test_fill_triangle() {
        let mut surface = TerminalSurface::new(20, 10);
        surface.begin_path();
        surface.move_to(0.0, 0.0);
        surface.line_to(20.0, 0.0);
        surface.line_to(0.0, 20.0);
        surface.close_path();
        surface.fill(Color::GREEN);

        assert_eq!(surface.pixel(0, 0), Some(Color::GREEN));
        assert_eq!(surface.pixel(19, 19), Some(Color::BLACK));
        let count = filled(&surface, Color::GREEN);
        assert!((190..=210).contains(&count), "{count}");
    }

    #[test]
    fn test_transform_offsets_points() {
        let mut surface = TerminalSurface::new(10, 5);
        surface.set_transform(Affine::centered(10, 10));
        square(&mut surface, -1.0, -1.0, 1.0, 1.0);
        surface.fill(Color::BLUE);

        assert_eq!(filled(&surface, Color::BLUE), 4);
        assert_eq!(surface.pixel(4, 4), Some(Color::BLUE));
        assert_eq!(surface.pixel(5, 5), Some(Color::BLUE));
    }

    #[test]
    fn test_clear_resets_to_background() {
        let mut surface = TerminalSurface::new(4, 2).with_background(Color::WHITE);
        square(&mut surface, 0.0, 0.0, 4.0, 4.0);
        surface.fill(Color::RED);
        surface.clear();
        assert_eq!(filled(&surface, Color::WHITE), 16);
    }

    #[test]
    fn test_huge_and_nan_coordinates_are_bounded() {
        let mut surface = TerminalSurface::new(10, 5);
        surface.begin_path();
        surface.move_to(-1e9, -1e9);
        surface.line_to(1e9, -1e9);
        surface.line_to(0.0, 1e9);
        surface.close_path();
        surface.fill(Color::RED);
        surface.stroke(Color::BLUE);
        assert!(filled(&surface, Color::RED) + filled(&surface, Color::BLUE) > 0);

        surface.begin_path();
        surface.move_to(f32::NAN, 0.0);
        surface.line_to(3.0, 3.0);
        surface.line_to(0.0, 3.0);
        surface.stroke(Color::GREEN);
        surface.fill(Color::GREEN);
    }

    #[test]
    fn test_stroke_closes_path() {
        let mut surface = TerminalSurface::new(10, 5);
        square(&mut surface, 1.0, 1.0, 8.0, 8.0);
        surface.stroke(Color::WHITE);
        // Closing edge runs down the left side
        assert_eq!(surface.pixel(1, 5), Some(Color::WHITE));
        assert_eq!(surface.pixel(4, 4), Some(Color::BLACK));
    }

    #[test]
    fn test_present_writes_every_cell() {
        let mut surface = TerminalSurface::new(3, 2);
        square(&mut surface, 0.0, 0.0, 3.0, 1.0);
        surface.fill(Color::RED);

        let mut out = Vec::new();
        surface.present(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 6);
    }

    #[test]
    fn test_resize() {
        let mut surface = TerminalSurface::new(2, 2);
        surface.resize(8, 3);
        assert_eq!((surface.width(), surface.height()), (8, 6));
        assert_eq!(surface.pixel(7, 5), Some(Color::BLACK));
    }
}
