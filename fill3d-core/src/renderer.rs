/// Projects meshes through world, view and clip space onto a 2D surface
use crate::color::Color;
use crate::error::ConfigError;
use crate::geometry::{Mesh, Topology, Vertex};
use crate::math::{Matrix4x4, Vector2, Vector3};
use crate::projection::{view_matrix, Projection, DEFAULT_FAR, DEFAULT_FOV, DEFAULT_NEAR};
use crate::surface::{Affine, Surface};
use crate::transform::Transform;

/// Renderer settings, checked as a whole by [`RendererConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    /// Maximum draw distance
    pub far: f32,
    /// Fixed width / height ratio. `None` follows the surface size each draw.
    pub aspect: Option<f32>,
    /// Draw list triangles far to near
    pub depth_sort: bool,
    /// Stroke every filled path with this color
    pub outline: Option<Color>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            fov: DEFAULT_FOV,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            aspect: None,
            depth_sort: false,
            outline: None,
        }
    }
}

impl RendererConfig {
    pub fn validate(&self) -> Result<Projection, ConfigError> {
        let projection = Projection::new(self.fov, self.near, self.far)?;
        validate_aspect(self.aspect)?;
        Ok(projection)
    }
}

fn validate_aspect(aspect: Option<f32>) -> Result<(), ConfigError> {
    match aspect {
        Some(a) if !a.is_finite() || a <= 0.0 => Err(ConfigError::AspectRatio(a)),
        _ => Ok(()),
    }
}

/// Software renderer turning meshes into filled 2D paths.
///
/// Holds no scene state besides the global `world_matrix` and the `camera`.
#[derive(Debug, Clone)]
pub struct Renderer {
    pub world_matrix: Matrix4x4,
    pub camera: Transform,
    projection: Projection,
    aspect: Option<f32>,
    depth_sort: bool,
    outline: Option<Color>,
}

/// Matrices shared by every vertex of one draw call
struct FrameMatrices {
    projection: Matrix4x4,
    model_view: Matrix4x4,
    half_size: Vector2,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Result<Self, ConfigError> {
        let projection = config.validate()?;
        log::debug!(
            "renderer configured: fov={} near={} far={} aspect={:?}",
            projection.fov(),
            projection.near(),
            projection.far(),
            config.aspect
        );
        Ok(Self {
            world_matrix: Matrix4x4::IDENTITY,
            camera: Transform::default(),
            projection,
            aspect: config.aspect,
            depth_sort: config.depth_sort,
            outline: config.outline,
        })
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn set_projection(&mut self, projection: Projection) {
        log::debug!("projection changed: {projection:?}");
        self.projection = projection;
    }

    /// Change the field of view, keeping near and far
    pub fn set_fov(&mut self, fov: f32) -> Result<(), ConfigError> {
        let projection = Projection::new(fov, self.projection.near(), self.projection.far())?;
        self.set_projection(projection);
        Ok(())
    }

    pub fn set_aspect(&mut self, aspect: Option<f32>) -> Result<(), ConfigError> {
        validate_aspect(aspect)?;
        self.aspect = aspect;
        Ok(())
    }

    pub fn set_depth_sort(&mut self, enabled: bool) {
        self.depth_sort = enabled;
    }

    pub fn set_outline(&mut self, outline: Option<Color>) {
        self.outline = outline;
    }

    /// Draw every mesh in order
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, meshes: &mut [Mesh]) {
        for mesh in meshes {
            self.draw_mesh(surface, mesh);
        }
    }

    /// Project `mesh` and fill it on `surface`.
    ///
    /// Every vertex's screen position is overwritten. Nothing is drawn on a
    /// zero-sized surface.
    pub fn draw_mesh<S: Surface + ?Sized>(&self, surface: &mut S, mesh: &mut Mesh) {
        let (width, height) = (surface.width(), surface.height());
        let Some(frame) = self.frame_matrices(width, height, &mesh.transform) else {
            log::trace!("skipping draw on zero-sized surface");
            return;
        };

        surface.set_transform(Affine::centered(width, height));

        let mut depths = Vec::with_capacity(mesh.vertices.len());
        for vertex in &mut mesh.vertices {
            let (screen, depth) = self.project(&frame, vertex.position);
            vertex.set_screen_position(screen);
            depths.push(depth);
        }

        match mesh.topology {
            Topology::Strip => {
                if mesh.vertices.len() < 3 {
                    log::trace!("strip with {} vertices has no area", mesh.vertices.len());
                    return;
                }
                self.fill_path(surface, &mesh.vertices, mesh.color);
            }
            Topology::List => {
                let leftover = mesh.vertices.len() % 3;
                if leftover != 0 {
                    log::trace!("dropping {leftover} trailing vertices of incomplete triangle");
                }

                let mut order: Vec<usize> = (0..mesh.vertices.len() / 3).collect();
                if self.depth_sort {
                    let mean = |t: usize| depths[t * 3..t * 3 + 3].iter().sum::<f32>() / 3.0;
                    order.sort_by(|&a, &b| mean(b).total_cmp(&mean(a)));
                }

                for t in order {
                    let triangle = &mesh.vertices[t * 3..t * 3 + 3];
                    self.fill_path(surface, triangle, triangle[0].color);
                }
            }
        }
    }

    /// Screen position of a world-space point on a `width` × `height` surface,
    /// in pixels from the center. `None` for a zero-sized surface.
    pub fn project_point(&self, width: u32, height: u32, point: Vector3) -> Option<Vector2> {
        let frame = self.frame_matrices(width, height, &Transform::default())?;
        Some(self.project(&frame, point).0)
    }

    fn frame_matrices(&self, width: u32, height: u32, model: &Transform) -> Option<FrameMatrices> {
        if width == 0 || height == 0 {
            return None;
        }
        let aspect = self.aspect.unwrap_or(width as f32 / height as f32);
        let model = self.world_matrix * model.to_matrix();
        Some(FrameMatrices {
            projection: self.projection.matrix(aspect),
            model_view: view_matrix(&self.camera) * model,
            half_size: Vector2::new(width as f32 / 2.0, height as f32 / 2.0),
        })
    }

    /// Object space to centered pixels, plus the clamped view depth.
    ///
    /// The projection is applied after the view-space depth is clamped to
    /// `[near, far]`, which keeps w strictly positive.
    fn project(&self, frame: &FrameMatrices, position: Vector3) -> (Vector2, f32) {
        let [x, y, z, _] = Matrix4x4::multiply_to_column(&frame.model_view, position.to_homogeneous());
        let z = self.projection.clamp_depth(z);
        let [cx, cy, _, w] = Matrix4x4::multiply_to_column(&frame.projection, [x, y, z, 1.0]);

        // Screen y grows downward
        let screen = Vector2::new(cx / w * frame.half_size.x, -cy / w * frame.half_size.y);
        (screen, z)
    }

    fn fill_path<S: Surface + ?Sized>(&self, surface: &mut S, vertices: &[Vertex], color: Color) {
        let Some((first, rest)) = vertices.split_first() else {
            return;
        };
        surface.begin_path();
        let start = first.screen_position();
        surface.move_to(start.x, start.y);
        for vertex in rest {
            let p = vertex.screen_position();
            surface.line_to(p.x, p.y);
        }
        surface.close_path();
        surface.fill(color);
        if let Some(outline) = self.outline {
            surface.stroke(outline);
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            world_matrix: Matrix4x4::IDENTITY,
            camera: Transform::default(),
            projection: Projection::default(),
            aspect: None,
            depth_sort: false,
            outline: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn assert_near(a: Vector2, b: Vector2) {
        assert!((a - b).magnitude() < 1e-3, "{a} vs {b}");
    }

    fn triangle_at(z: f32, color: Color) -> Vec<Vertex> {
        vec![
            Vertex::with_color(Vector3::new(-1.0, -1.0, z), color),
            Vertex::with_color(Vector3::new(1.0, -1.0, z), color),
            Vertex::with_color(Vector3::new(0.0, 1.0, z), color),
        ]
    }

    #[test]
    fn test_config_errors_are_eager() {
        let bad = RendererConfig {
            near: 0.0,
            ..Default::default()
        };
        assert_eq!(Renderer::new(bad).unwrap_err(), ConfigError::NearPlane(0.0));

        let bad_aspect = RendererConfig {
            aspect: Some(-1.0),
            ..Default::default()
        };
        assert_eq!(Renderer::new(bad_aspect).unwrap_err(), ConfigError::AspectRatio(-1.0));

        let mut renderer = Renderer::default();
        assert!(renderer.set_fov(0.0).is_err());
        assert!(renderer.set_aspect(Some(0.0)).is_err());
        assert_eq!(renderer.projection().fov(), DEFAULT_FOV);
        assert!(renderer.set_aspect(Some(16.0 / 9.0)).is_ok());
    }

    #[test]
    fn test_forward_axis_projects_to_center() {
        let mut renderer = Renderer::default();
        for d in [0.5, 1.0, 10.0, 99.0] {
            let p = renderer.project_point(1280, 720, Vector3::new(0.0, 0.0, d)).unwrap();
            assert_near(p, Vector2::ZERO);
        }

        renderer.camera = Transform::default()
            .with_position(Vector3::new(3.0, -2.0, 1.0))
            .with_rotation(Vector3::new(25.0, -60.0, 10.0));
        let ahead = renderer.camera.position + crate::projection::forward(&renderer.camera) * 7.0;
        assert_near(renderer.project_point(1280, 720, ahead).unwrap(), Vector2::ZERO);
    }

    #[test]
    fn test_world_y_up_is_screen_y_down() {
        let renderer = Renderer::default();
        let p = renderer.project_point(200, 100, Vector3::new(0.0, 1.0, 2.0)).unwrap();
        assert!(p.y < 0.0);
        assert!(p.x.abs() < 1e-4);

        // fov 90 on a 200x100 surface: y = -(1/2) * 50
        assert!((p.y + 25.0).abs() < 1e-3);
    }

    #[test]
    fn test_unit_cube_scenario() {
        let mut renderer = Renderer::new(RendererConfig {
            fov: 90.0,
            near: 0.01,
            far: 100.0,
            ..Default::default()
        })
        .unwrap();
        renderer.camera.position = Vector3::new(0.0, 0.0, -5.0);

        let mut meshes = vec![Mesh::cube(1.0)];
        let mut surface = RecordingSurface::new(1600, 900);
        renderer.render(&mut surface, &mut meshes);

        let fills = surface.fills();
        assert_eq!(fills.len(), 12);
        for (fill, triangle) in fills.iter().zip(meshes[0].vertices.chunks(3)) {
            assert_eq!(fill.color, triangle[0].color);
            assert_eq!(fill.points.len(), 3);
            assert!(fill.closed);
            assert!(fill.points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        }
    }

    #[test]
    fn test_list_uses_first_vertex_color() {
        let mut vertices = triangle_at(2.0, Color::RED);
        vertices[1].color = Color::GREEN;
        vertices[2].color = Color::BLUE;
        let mut mesh = Mesh::new(Topology::List, vertices, Transform::default()).with_color(Color::BLACK);

        let mut surface = RecordingSurface::new(100, 100);
        Renderer::default().draw_mesh(&mut surface, &mut mesh);
        let fills = surface.fills();
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].color, Color::RED);
    }

    #[test]
    fn test_strip_square_is_one_region() {
        let mut mesh = Mesh::quad(1.0).with_color(Color::GREEN);
        mesh.transform.position = Vector3::new(0.0, 0.0, 1.0);

        let mut surface = RecordingSurface::new(1600, 900);
        Renderer::default().render(&mut surface, std::slice::from_mut(&mut mesh));

        let fills = surface.fills();
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].color, Color::GREEN);
        assert!(fills[0].closed);
        assert_eq!(fills[0].points.len(), 4);
        let expected: Vec<Vector2> = mesh.vertices.iter().map(|v| v.screen_position()).collect();
        assert_eq!(fills[0].points, expected);

        // Half a unit at z = 1 with fov 90: x scaled by 9/16 of half width, y by half height
        assert_near(expected[2], Vector2::new(225.0, -225.0));
    }

    #[test]
    fn test_incomplete_list_group_is_dropped() {
        let mut vertices = triangle_at(3.0, Color::RED);
        vertices.push(Vertex::new(Vector3::new(5.0, 5.0, 3.0)));
        let mut mesh = Mesh::new(Topology::List, vertices, Transform::default());

        let mut surface = RecordingSurface::new(640, 480);
        Renderer::default().draw_mesh(&mut surface, &mut mesh);
        assert_eq!(surface.fills().len(), 1);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::MoveTo(_))), 1);
    }

    #[test]
    fn test_short_strip_draws_nothing() {
        let vertices = triangle_at(2.0, Color::RED)[..2].to_vec();
        let mut mesh = Mesh::new(Topology::Strip, vertices, Transform::default());
        let mut surface = RecordingSurface::new(640, 480);
        Renderer::default().draw_mesh(&mut surface, &mut mesh);
        assert!(surface.fills().is_empty());
    }

    #[test]
    fn test_groups_do_not_cross_meshes() {
        let two = triangle_at(2.0, Color::RED)[..2].to_vec();
        let one = triangle_at(2.0, Color::BLUE)[..1].to_vec();
        let mut meshes = vec![
            Mesh::new(Topology::List, two, Transform::default()),
            Mesh::new(Topology::List, one, Transform::default()),
        ];
        let mut surface = RecordingSurface::new(640, 480);
        Renderer::default().render(&mut surface, &mut meshes);
        assert!(surface.fills().is_empty());
    }

    #[test]
    fn test_screen_positions_cached_and_centered() {
        let mut mesh = Mesh::new(Topology::List, triangle_at(4.0, Color::RED), Transform::default());
        let mut surface = RecordingSurface::new(320, 240);
        Renderer::default().draw_mesh(&mut surface, &mut mesh);

        assert!(mesh.vertices.iter().all(|v| v.screen_position() != Vector2::ZERO));
        assert_eq!(
            surface.commands[0],
            DrawCommand::SetTransform(Affine::centered(320, 240))
        );
    }

    #[test]
    fn test_vertices_behind_camera_stay_finite() {
        let mut mesh = Mesh::new(Topology::List, triangle_at(-3.0, Color::RED), Transform::default());
        let mut surface = RecordingSurface::new(320, 240);
        Renderer::default().draw_mesh(&mut surface, &mut mesh);

        let fills = surface.fills();
        assert_eq!(fills.len(), 1);
        for p in &fills[0].points {
            assert!(p.x.is_finite() && p.y.is_finite());
        }

        // On the camera plane itself w would be zero without the clamp
        let p = Renderer::default().project_point(320, 240, Vector3::new(1.0, 1.0, 0.0)).unwrap();
        assert!(p.x.is_finite() && p.y.is_finite());
    }

    #[test]
    fn test_zero_sized_surface_draws_nothing() {
        let mut mesh = Mesh::cube(1.0);
        let mut surface = RecordingSurface::new(0, 480);
        Renderer::default().draw_mesh(&mut surface, &mut mesh);
        assert!(surface.commands.is_empty());
        assert_eq!(Renderer::default().project_point(10, 0, Vector3::FORWARD), None);
    }

    #[test]
    fn test_world_matrix_applies_to_every_mesh() {
        let mut renderer = Renderer::default();
        renderer.world_matrix = Matrix4x4::translation(Vector3::new(0.0, 0.0, 5.0));

        let mut mesh = Mesh::new(
            Topology::List,
            vec![Vertex::new(Vector3::ZERO); 3],
            Transform::default(),
        );
        let mut surface = RecordingSurface::new(100, 100);
        renderer.draw_mesh(&mut surface, &mut mesh);
        assert_near(mesh.vertices[0].screen_position(), Vector2::ZERO);
    }

    #[test]
    fn test_depth_sort_draws_far_first() {
        let mut vertices = triangle_at(2.0, Color::RED);
        vertices.extend(triangle_at(20.0, Color::BLUE));
        let mut mesh = Mesh::new(Topology::List, vertices, Transform::default());

        let mut unsorted = RecordingSurface::new(100, 100);
        Renderer::default().draw_mesh(&mut unsorted, &mut mesh);
        let colors: Vec<Color> = unsorted.fills().iter().map(|f| f.color).collect();
        assert_eq!(colors, vec![Color::RED, Color::BLUE]);

        let renderer = Renderer::new(RendererConfig {
            depth_sort: true,
            ..Default::default()
        })
        .unwrap();
        let mut sorted = RecordingSurface::new(100, 100);
        renderer.draw_mesh(&mut sorted, &mut mesh);
        let colors: Vec<Color> = sorted.fills().iter().map(|f| f.color).collect();
        assert_eq!(colors, vec![Color::BLUE, Color::RED]);
    }

    #[test]
    fn test_outline_strokes_each_fill() {
        let mut renderer = Renderer::default();
        renderer.set_outline(Some(Color::BLACK));
        let mut meshes = vec![Mesh::cube(1.0)];
        renderer.camera.position = Vector3::new(0.0, 0.0, -4.0);

        let mut surface = RecordingSurface::new(100, 100);
        renderer.render(&mut surface, &mut meshes);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Stroke(Color::BLACK))), 12);
    }

    #[test]
    fn test_fixed_aspect_overrides_surface() {
        let renderer = Renderer::new(RendererConfig {
            aspect: Some(1.0),
            ..Default::default()
        })
        .unwrap();
        let p = renderer.project_point(200, 100, Vector3::new(1.0, 0.0, 2.0)).unwrap();
        // x_ndc = 0.5 with aspect 1, times half width 100
        assert!((p.x - 50.0).abs() < 1e-3);
    }
}
