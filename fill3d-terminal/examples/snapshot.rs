/// Example: Render a single frame of an OBJ file (or the default cube) and exit
///
/// Usage: cargo run --example snapshot -- [path/to/file.obj] [yaw-degrees]

use anyhow::{Context, Result};
use fill3d_core::{obj, Mesh, Renderer, Scene, Surface, Vector3};
use fill3d_terminal::TerminalSurface;
use std::env;
use std::fs;
use std::io::{stdout, Write};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut mesh = match args.get(1) {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            obj::parse_obj(&text).with_context(|| format!("parsing {path}"))?
        }
        None => Mesh::cube(2.0),
    };
    let yaw: f32 = match args.get(2) {
        Some(v) => v.parse().with_context(|| format!("yaw must be a number, got {v:?}"))?,
        None => 30.0,
    };
    mesh.transform.rotate(Vector3::new(20.0, yaw, 0.0));
    println!("{} triangles", mesh.triangle_count());

    let mut renderer = Renderer::default();
    renderer.camera.position = Vector3::new(0.0, 0.0, -5.0);

    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut surface = TerminalSurface::new(cols, rows.saturating_sub(2));
    let mut scene = Scene::from(vec![mesh]);
    scene.draw(&renderer, &mut surface);

    let mut out = stdout();
    surface.present(&mut out)?;
    writeln!(out)?;
    println!("{}x{} pixels", surface.width(), surface.height());
    Ok(())
}
