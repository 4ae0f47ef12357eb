/// Geometry primitives for 3D rendering
use crate::color::Color;
use crate::math::{Vector2, Vector3};
use crate::transform::Transform;

/// How a flat vertex sequence groups into triangles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// One path over every vertex, filled once with the mesh color
    Strip,
    /// Independent triangles of 3 consecutive vertices
    List,
}

/// A vertex with an object-space position and a color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vector3,
    pub color: Color,
    screen_position: Vector2,
}

impl Vertex {
    pub fn new(position: Vector3) -> Self {
        Self::with_color(position, Color::NEUTRAL)
    }

    pub fn with_color(position: Vector3, color: Color) -> Self {
        Self {
            position,
            color,
            screen_position: Vector2::ZERO,
        }
    }

    /// Where the last render pass put this vertex, in pixels from the surface center.
    ///
    /// Zero until the vertex has been drawn once.
    pub fn screen_position(&self) -> Vector2 {
        self.screen_position
    }

    pub(crate) fn set_screen_position(&mut self, position: Vector2) {
        self.screen_position = position;
    }
}

impl From<Vector3> for Vertex {
    fn from(position: Vector3) -> Self {
        Self::new(position)
    }
}

/// A 3D mesh: an ordered vertex list, its topology and its transform
#[derive(Debug, Clone)]
pub struct Mesh {
    pub topology: Topology,
    pub vertices: Vec<Vertex>,
    pub transform: Transform,
    pub color: Color,
}

const CUBE_FACE_COLORS: [Color; 6] = [
    Color::rgb(231, 76, 60),
    Color::rgb(46, 204, 113),
    Color::rgb(52, 152, 219),
    Color::rgb(241, 196, 15),
    Color::rgb(155, 89, 182),
    Color::rgb(236, 240, 241),
];

/// Corner indices for each cube face, as two triangles
const CUBE_FACES: [[usize; 6]; 6] = [
    [4, 5, 6, 4, 6, 7], // front (+z)
    [0, 3, 2, 0, 2, 1], // back (-z)
    [3, 7, 6, 3, 6, 2], // top (+y)
    [0, 1, 5, 0, 5, 4], // bottom (-y)
    [1, 2, 6, 1, 6, 5], // right (+x)
    [0, 4, 7, 0, 7, 3], // left (-x)
];

impl Mesh {
    /// Vertex count is not checked against the topology; a trailing partial
    /// triangle in a list is skipped at draw time.
    pub fn new(topology: Topology, vertices: Vec<Vertex>, transform: Transform) -> Self {
        Self {
            topology,
            vertices,
            transform,
            color: Color::NEUTRAL,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Number of complete triangles the renderer will emit for a list mesh,
    /// or the strip's triangle count (`n - 2`).
    pub fn triangle_count(&self) -> usize {
        match self.topology {
            Topology::List => self.vertices.len() / 3,
            Topology::Strip => self.vertices.len().saturating_sub(2),
        }
    }

    /// Axis-aligned cube centered on the origin: 8 corners expanded into 12
    /// triangles, each face in its own color.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let corners = [
            Vector3::new(-h, -h, -h),
            Vector3::new(h, -h, -h),
            Vector3::new(h, h, -h),
            Vector3::new(-h, h, -h),
            Vector3::new(-h, -h, h),
            Vector3::new(h, -h, h),
            Vector3::new(h, h, h),
            Vector3::new(-h, h, h),
        ];

        let vertices = CUBE_FACES
            .iter()
            .zip(CUBE_FACE_COLORS)
            .flat_map(|(face, color)| {
                face.iter()
                    .map(move |&i| Vertex::with_color(corners[i], color))
            })
            .collect();

        Self::new(Topology::List, vertices, Transform::default())
    }

    /// Flat square in the xy plane, as a 4-vertex strip path
    pub fn quad(size: f32) -> Self {
        let h = size / 2.0;
        let vertices = vec![
            Vertex::new(Vector3::new(-h, -h, 0.0)),
            Vertex::new(Vector3::new(h, -h, 0.0)),
            Vertex::new(Vector3::new(h, h, 0.0)),
            Vertex::new(Vector3::new(-h, h, 0.0)),
        ];
        Self::new(Topology::Strip, vertices, Transform::default())
    }
}
