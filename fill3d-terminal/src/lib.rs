/// Terminal frontend: drives the update and draw passes over a crossterm surface
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use fill3d_core::clock::Interval;
use fill3d_core::projection::forward;
use fill3d_core::{Renderer, Scene, Transform, Vector3};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod logging;
pub mod surface;

pub use surface::TerminalSurface;

/// Degrees the camera turns per key press
const TURN_STEP: f32 = 5.0;

/// Timing and motion settings for [`App`]
#[derive(Debug, Clone, Copy)]
pub struct AppSettings {
    /// Logic ticks per second
    pub update_hz: f32,
    /// Time between drawn frames
    pub draw_interval: Duration,
    /// Rotation applied to every mesh each tick, in degrees
    pub spin: Vector3,
    /// Distance the camera moves per key press
    pub move_step: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            update_hz: 60.0,
            draw_interval: Duration::from_millis(10),
            spin: Vector3::new(0.6, 0.9, 0.0),
            move_step: 0.25,
        }
    }
}

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Quit,
    Turn(Vector3),
    /// Move along the camera's forward axis
    Advance(f32),
    ToggleSpin,
}

/// Map a key to a command, if it's bound
pub fn command_for(code: KeyCode, move_step: f32) -> Option<Command> {
    let command = match code {
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        KeyCode::Char('w') | KeyCode::Up => Command::Turn(Vector3::new(-TURN_STEP, 0.0, 0.0)),
        KeyCode::Char('s') | KeyCode::Down => Command::Turn(Vector3::new(TURN_STEP, 0.0, 0.0)),
        KeyCode::Char('a') | KeyCode::Left => Command::Turn(Vector3::new(0.0, -TURN_STEP, 0.0)),
        KeyCode::Char('d') | KeyCode::Right => Command::Turn(Vector3::new(0.0, TURN_STEP, 0.0)),
        KeyCode::Char('e') => Command::Turn(Vector3::new(0.0, 0.0, TURN_STEP)),
        KeyCode::Char('r') => Command::Turn(Vector3::new(0.0, 0.0, -TURN_STEP)),
        KeyCode::Char('z') => Command::Advance(move_step),
        KeyCode::Char('x') => Command::Advance(-move_step),
        KeyCode::Char(' ') => Command::ToggleSpin,
        _ => return None,
    };
    Some(command)
}

/// Apply a camera command. Returns false when the app should stop.
pub fn apply_command(camera: &mut Transform, spinning: &mut bool, command: Command) -> bool {
    match command {
        Command::Quit => return false,
        Command::Turn(delta) => camera.rotate(delta),
        Command::Advance(distance) => camera.translate(forward(camera) * distance),
        Command::ToggleSpin => *spinning = !*spinning,
    }
    true
}

/// Main application struct for terminal 3D rendering
pub struct App {
    scene: Scene,
    renderer: Renderer,
    surface: TerminalSurface,
    settings: AppSettings,
    spinning: bool,
    running: bool,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl App {
    pub fn new(scene: Scene, renderer: Renderer, settings: AppSettings) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self::with_surface(
            scene,
            renderer,
            settings,
            TerminalSurface::new(cols, rows),
        ))
    }

    pub fn with_surface(
        scene: Scene,
        renderer: Renderer,
        settings: AppSettings,
        surface: TerminalSurface,
    ) -> Self {
        Self {
            scene,
            renderer,
            surface,
            settings,
            spinning: true,
            running: true,
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn surface(&self) -> &TerminalSurface {
        &self.surface
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let start = Instant::now();
        let mut update = Interval::from_hz(self.settings.update_hz, start);
        let mut draw = Interval::new(self.settings.draw_interval, start);
        let mut out = stdout();

        while self.running {
            let now = Instant::now();

            for _ in 0..update.poll(now) {
                self.update();
            }

            if draw.poll(now) > 0 {
                self.draw_frame(&mut out)?;
            }

            // Sleep until the next pass is due, waking early for input
            let wait = update.remaining(now).min(draw.remaining(now));
            if event::poll(wait)? {
                self.handle_event(event::read()?);
            }
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => {
                if let Some(command) = command_for(code, self.settings.move_step) {
                    self.running =
                        apply_command(&mut self.renderer.camera, &mut self.spinning, command);
                }
            }
            Event::Resize(cols, rows) => {
                log::debug!("terminal resized to {cols}x{rows}");
                self.surface.resize(cols, rows);
            }
            _ => {}
        }
    }

    /// One logic tick: spin every mesh
    pub fn update(&mut self) {
        if !self.spinning {
            return;
        }
        for mesh in &mut self.scene.meshes {
            mesh.transform.rotate(self.settings.spin);
        }
    }

    /// Rasterize the scene into the surface without touching the terminal
    pub fn render(&mut self) {
        self.scene.draw(&self.renderer, &mut self.surface);
    }

    fn draw_frame<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.render();
        self.surface.present(out)?;

        self.frame_count += 1;
        let elapsed = self.last_fps_sample.elapsed();
        if elapsed >= Duration::from_secs(1) {
            self.fps = self.frame_count as f32 / elapsed.as_secs_f32();
            self.frame_count = 0;
            self.last_fps_sample = Instant::now();
        }

        let camera = self.renderer.camera;
        queue!(
            out,
            cursor::MoveTo(0, 0),
            SetForegroundColor(TermColor::Yellow),
            SetBackgroundColor(TermColor::Black),
            Print(format!(
                "fill3d | FPS: {:.1} | cam {} rot {} | WASD/Arrows=Turn E/R=Roll Z/X=Move Space=Spin Q=Quit",
                self.fps,
                camera.position,
                camera.rotation()
            )),
            ResetColor
        )?;

        out.flush()
    }
}
