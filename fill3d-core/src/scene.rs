/// Flat list of meshes owned by the frame driver
use crate::geometry::Mesh;
use crate::renderer::Renderer;
use crate::surface::{Affine, Surface};

/// The meshes drawn each frame.
///
/// Owned by whatever drives the update and draw passes; the renderer only
/// borrows it for the duration of a draw.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub meshes: Vec<Mesh>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mesh and return its index
    pub fn add(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Clear the surface and render one frame.
    pub fn draw<S: Surface + ?Sized>(&mut self, renderer: &Renderer, surface: &mut S) {
        surface.set_transform(Affine::IDENTITY);
        surface.clear();
        renderer.render(surface, &mut self.meshes);
    }
}

impl From<Vec<Mesh>> for Scene {
    fn from(meshes: Vec<Mesh>) -> Self {
        Self { meshes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3;
    use crate::surface::{DrawCommand, RecordingSurface};

    #[test]
    fn test_draw_clears_then_renders_each_mesh() {
        let mut scene = Scene::new();
        let cube = scene.add(Mesh::cube(1.0));
        scene.add(Mesh::quad(1.0));
        scene.meshes[cube].transform.position = Vector3::new(0.0, 0.0, 4.0);
        scene.meshes[1].transform.position = Vector3::new(2.0, 0.0, 4.0);
        assert_eq!(scene.len(), 2);

        let mut surface = RecordingSurface::new(320, 180);
        scene.draw(&Renderer::default(), &mut surface);

        assert_eq!(surface.commands[0], DrawCommand::SetTransform(Affine::IDENTITY));
        assert_eq!(surface.commands[1], DrawCommand::Clear);
        assert_eq!(surface.fills().len(), 13);
    }

    #[test]
    fn test_draw_leaves_transforms_untouched() {
        let mut scene = Scene::from(vec![Mesh::cube(2.0)]);
        let before = scene.meshes[0].transform;
        let mut surface = RecordingSurface::new(64, 64);
        scene.draw(&Renderer::default(), &mut surface);
        assert_eq!(scene.meshes[0].transform, before);
        assert!(!scene.is_empty());
    }
}
