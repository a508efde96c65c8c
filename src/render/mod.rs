// src/render/mod.rs

pub mod renderer;
pub mod shader;
pub mod vertex;

pub use renderer::Renderer;
pub use shader::WGSL_SHADER_SOURCE;
pub use vertex::Vertex;

/// The rendering backend seam: anything that accepts an indexed triangle
/// list. Shapes draw through this trait; the wgpu [`Renderer`] implements it
/// by batching into per-frame buffers, and tests implement it with counters.
pub trait DrawTarget {
    fn draw_triangles(&mut self, vertices: &[Vertex], indices: &[u16]);
}

/// An indexed triangle list with per-vertex colors.
#[derive(Clone, Debug, Default)]
pub struct TriangleMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl TriangleMesh {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
