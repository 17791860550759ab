use vulkano::buffer::BufferContents;
use vulkano::pipeline::graphics::vertex_input::Vertex;

/// Per-vertex position, bound to the shader's `vertex` attribute.
#[derive(BufferContents, Vertex)]
#[repr(C)]
pub struct Position {
  #[format(R32G32B32_SFLOAT)]
  pub vertex: [f32; 3],
}

/// Per-vertex flat normal, bound to the shader's `normal` attribute.
#[derive(BufferContents, Vertex)]
#[repr(C)]
pub struct Normal {
  #[format(R32G32B32_SFLOAT)]
  pub normal: [f32; 3],
}
