/// Immediate-mode 2D drawing surfaces
use crate::color::Color;
use crate::math::Vector2;

/// 2D affine transform in canvas order: `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Affine {
    pub const IDENTITY: Self = Self::translate(0.0, 0.0);

    pub const fn translate(x: f32, y: f32) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: x,
            f: y,
        }
    }

    /// Puts the origin at the middle of a `width` × `height` surface
    pub fn centered(width: u32, height: u32) -> Self {
        Self::translate(width as f32 / 2.0, height as f32 / 2.0)
    }

    pub fn apply(&self, p: Vector2) -> Vector2 {
        Vector2::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// The subset of a 2D canvas API the renderer draws with.
///
/// Coordinates passed to `move_to` / `line_to` are transformed by the most
/// recent `set_transform`.
pub trait Surface {
    /// Pixel width
    fn width(&self) -> u32;
    /// Pixel height
    fn height(&self) -> u32;

    fn clear(&mut self);
    fn set_transform(&mut self, transform: Affine);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn close_path(&mut self);

    /// Fill the current path
    fn fill(&mut self, color: Color);
    /// Outline the current path
    fn stroke(&mut self, color: Color);
}

/// A single call recorded by [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    SetTransform(Affine),
    BeginPath,
    MoveTo(Vector2),
    LineTo(Vector2),
    ClosePath,
    Fill(Color),
    Stroke(Color),
}

/// Headless surface that records every call, for tests and offline inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    pub commands: Vec<DrawCommand>,
}

/// A path as it was when it got filled
#[derive(Debug, Clone, PartialEq)]
pub struct FilledPath {
    pub points: Vec<Vector2>,
    pub closed: bool,
    pub color: Color,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Replays the command list and returns each filled path in order.
    ///
    /// Points are reported as passed to `move_to`/`line_to`, before the
    /// surface transform.
    pub fn fills(&self) -> Vec<FilledPath> {
        let mut fills = Vec::new();
        let mut points = Vec::new();
        let mut closed = false;

        for command in &self.commands {
            match command {
                DrawCommand::BeginPath => {
                    points.clear();
                    closed = false;
                }
                DrawCommand::MoveTo(p) | DrawCommand::LineTo(p) => points.push(*p),
                DrawCommand::ClosePath => closed = true,
                DrawCommand::Fill(color) => fills.push(FilledPath {
                    points: points.clone(),
                    closed,
                    color: *color,
                }),
                _ => {}
            }
        }
        fills
    }

    pub fn count(&self, matches: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| matches(c)).count()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn set_transform(&mut self, transform: Affine) {
        self.commands.push(DrawCommand::SetTransform(transform));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::MoveTo(Vector2::new(x, y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::LineTo(Vector2::new(x, y)));
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn fill(&mut self, color: Color) {
        self.commands.push(DrawCommand::Fill(color));
    }

    fn stroke(&mut self, color: Color) {
        self.commands.push(DrawCommand::Stroke(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_affine() {
        let t = Affine::centered(800, 450);
        assert_eq!(t.apply(Vector2::ZERO), Vector2::new(400.0, 225.0));
        assert_eq!(t.apply(Vector2::new(-400.0, -225.0)), Vector2::ZERO);
        assert_eq!(Affine::default().apply(Vector2::ONE), Vector2::ONE);
    }

    #[test]
    fn test_recording_surface_fills() {
        let mut s = RecordingSurface::new(10, 10);
        s.begin_path();
        s.move_to(0.0, 0.0);
        s.line_to(1.0, 0.0);
        s.line_to(0.0, 1.0);
        s.close_path();
        s.fill(Color::RED);
        s.begin_path();
        s.move_to(5.0, 5.0);
        s.stroke(Color::BLUE);

        let fills = s.fills();
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].points.len(), 3);
        assert!(fills[0].closed);
        assert_eq!(fills[0].color, Color::RED);
        assert_eq!(s.count(|c| matches!(c, DrawCommand::Stroke(_))), 1);
    }
}
