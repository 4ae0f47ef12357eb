/// fill3d Terminal Demo - Spinning meshes
///
/// Renders a cube (or an OBJ file) with the software projection pipeline.
/// Controls:
///   - WASD / Arrow Keys: Turn the camera
///   - E/R: Roll
///   - Z/X: Move forward / back
///   - Space: Pause the spin
///   - Q/ESC: Quit

use anyhow::{Context, Result};
use clap::Parser;
use fill3d_core::{obj, Color, Mesh, Renderer, RendererConfig, Scene, Vector3};
use fill3d_terminal::logging::{init_logging, LoggingConfig};
use fill3d_terminal::{App, AppSettings};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "fill3d-terminal", about = "Software 3D renderer in your terminal")]
struct Cli {
    /// Wavefront OBJ file to render instead of the default cube
    #[arg(long)]
    obj: Option<PathBuf>,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 90.0)]
    fov: f32,

    /// Near plane distance
    #[arg(long, default_value_t = 0.01)]
    near: f32,

    /// Maximum draw distance
    #[arg(long, default_value_t = 100.0)]
    far: f32,

    /// Logic ticks per second
    #[arg(long, default_value_t = 60.0)]
    update_hz: f32,

    /// Milliseconds between frames
    #[arg(long, default_value_t = 10)]
    draw_ms: u64,

    /// Draw triangles back to front
    #[arg(long)]
    depth_sort: bool,

    /// Outline color for every triangle, e.g. "#000000"
    #[arg(long)]
    outline: Option<Color>,

    /// Fill color for meshes loaded from OBJ files
    #[arg(long, default_value = "#9ad1ff")]
    color: Color,

    /// Write log output here instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .as_ref()
        .map(|path| {
            File::create(path).with_context(|| format!("creating log file {}", path.display()))
        })
        .transpose()?;
    init_logging(LoggingConfig {
        env_filter: None,
        log_file,
    });

    let mesh = match &cli.obj {
        Some(path) => load_obj(path, cli.color)?,
        None => Mesh::cube(2.0),
    };

    let mut renderer = Renderer::new(RendererConfig {
        fov: cli.fov,
        near: cli.near,
        far: cli.far,
        aspect: None,
        depth_sort: cli.depth_sort,
        outline: cli.outline,
    })
    .context("invalid renderer configuration")?;

    // Back off far enough to see the whole mesh
    let radius = mesh
        .vertices
        .iter()
        .map(|v| v.position.magnitude())
        .fold(1.0_f32, f32::max);
    renderer.camera.position = Vector3::new(0.0, 0.0, -radius * 2.5);

    let settings = AppSettings {
        update_hz: cli.update_hz,
        draw_interval: Duration::from_millis(cli.draw_ms),
        ..AppSettings::default()
    };

    let mut app = App::new(Scene::from(vec![mesh]), renderer, settings)
        .context("querying terminal size")?;
    app.run().context("terminal render loop failed")?;

    println!("Thank you for using fill3d!");
    Ok(())
}

fn load_obj(path: &Path, color: Color) -> Result<Mesh> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read OBJ file {}", path.display()))?;
    let mesh = obj::parse_obj(&text)
        .with_context(|| format!("failed to parse OBJ file {}", path.display()))?;
    log::info!(
        "loaded {} triangles from {}",
        mesh.triangle_count(),
        path.display()
    );

    // OBJ carries no colors; tint every vertex so list faces aren't all white
    let mut mesh = mesh.with_color(color);
    for vertex in &mut mesh.vertices {
        vertex.color = color;
    }
    Ok(mesh)
}
