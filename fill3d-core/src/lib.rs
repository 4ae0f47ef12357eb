//! fill3d Core Library - Vector algebra, scene model and the projection renderer
//!
//! This library turns meshes defined in object space into filled 2D paths on
//! any surface implementing [`Surface`], one frame at a time.

pub mod clock;
pub mod color;
pub mod error;
pub mod geometry;
pub mod math;
pub mod obj;
pub mod projection;
pub mod renderer;
pub mod scene;
pub mod surface;
pub mod transform;

// Re-export commonly used types
pub use color::Color;
pub use error::{ColorError, ConfigError, ObjError};
pub use geometry::{Mesh, Topology, Vertex};
pub use math::{Matrix4x4, Vector2, Vector3};
pub use projection::Projection;
pub use renderer::{Renderer, RendererConfig};
pub use scene::Scene;
pub use surface::{Affine, DrawCommand, RecordingSurface, Surface};
pub use transform::Transform;
