/// fill3d Web - WASM entry point drawing onto an HTML canvas
///
/// The browser owns the timers: call `update()` from a fixed-rate interval
/// and `draw()` from a faster one (or `requestAnimationFrame`).
use fill3d_core::projection::forward;
use fill3d_core::{obj, Affine, Color, Mesh, Renderer, Scene, Surface, Vector3};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// [`Surface`] over a canvas 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.width() as f64, self.height() as f64);
    }

    fn set_transform(&mut self, t: Affine) {
        // Only fails for non-finite input, which Affine never carries here
        let _ = self.ctx.set_transform(
            t.a as f64, t.b as f64, t.c as f64, t.d as f64, t.e as f64, t.f as f64,
        );
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ctx.move_to(x as f64, y as f64);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ctx.line_to(x as f64, y as f64);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self, color: Color) {
        self.ctx.set_fill_style_str(&color.to_string());
        self.ctx.fill();
    }

    fn stroke(&mut self, color: Color) {
        self.ctx.set_stroke_style_str(&color.to_string());
        self.ctx.stroke();
    }
}

fn to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct WebRenderer {
    surface: CanvasSurface,
    scene: Scene,
    renderer: Renderer,
    spin: Vector3,
    tint: Color,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Attach to the canvas with id `canvas_id`, starting with a cube in view
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebRenderer, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id {canvas_id:?}")))?
            .dyn_into::<HtmlCanvasElement>()?;

        let mut renderer = Renderer::default();
        renderer.camera.position = Vector3::new(0.0, 0.0, -5.0);

        Ok(WebRenderer {
            surface: CanvasSurface::new(canvas)?,
            scene: Scene::from(vec![Mesh::cube(2.0)]),
            renderer,
            spin: Vector3::new(0.6, 0.9, 0.0),
            tint: Color::NEUTRAL,
        })
    }

    /// Resize the canvas backing store, in pixels
    pub fn resize(&mut self, width: u32, height: u32) {
        log::debug!("canvas resized to {width}x{height}");
        self.surface.canvas().set_width(width);
        self.surface.canvas().set_height(height);
    }

    /// Color applied to meshes loaded after this call, as `#rrggbb`
    pub fn set_color(&mut self, hex: &str) -> Result<(), JsValue> {
        self.tint = Color::from_hex(hex).map_err(to_js)?;
        Ok(())
    }

    /// Replace the scene with a mesh parsed from OBJ text. Returns the
    /// triangle count.
    pub fn load_obj(&mut self, text: &str) -> Result<usize, JsValue> {
        let mut mesh = obj::parse_obj(text).map_err(to_js)?.with_color(self.tint);
        for vertex in &mut mesh.vertices {
            vertex.color = self.tint;
        }
        let triangles = mesh.triangle_count();
        log::info!("loaded OBJ mesh with {triangles} triangles");
        self.scene = Scene::from(vec![mesh]);
        Ok(triangles)
    }

    pub fn set_fov(&mut self, fov: f32) -> Result<(), JsValue> {
        self.renderer.set_fov(fov).map_err(to_js)
    }

    pub fn set_spin(&mut self, x: f32, y: f32, z: f32) {
        self.spin = Vector3::new(x, y, z);
    }

    /// One logic tick
    pub fn update(&mut self) {
        for mesh in &mut self.scene.meshes {
            mesh.transform.rotate(self.spin);
        }
    }

    /// Render one frame
    pub fn draw(&mut self) {
        self.scene.draw(&self.renderer, &mut self.surface);
    }

    /// Turn the camera (degrees)
    pub fn rotate_camera(&mut self, dx: f32, dy: f32, dz: f32) {
        self.renderer.camera.rotate(Vector3::new(dx, dy, dz));
    }

    /// Move the camera: `dz` along its view axis, `dx` and `dy` in world space
    pub fn move_camera(&mut self, dx: f32, dy: f32, dz: f32) {
        let camera = &mut self.renderer.camera;
        let ahead = forward(camera) * dz;
        camera.translate(ahead + Vector3::new(dx, dy, 0.0));
    }
}
