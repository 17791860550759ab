//! GLSL shader compilation and loading.
//!
//! Both stages are compiled from the GLSL sources under `src/shaders/` at
//! build time by the `vulkano_shaders` macro.

/// Vertex shader module.
///
/// Transforms `vertex` by the per-frame `matrix` uniform and passes the flat
/// `normal` through untouched.
pub mod vs {
  vulkano_shaders::shader! {
    ty: "vertex",
    path: "src/shaders/vert.glsl",
  }
}

/// Fragment shader module.
///
/// Shades `sourceColor` with a fixed model-space light.
pub mod fs {
  vulkano_shaders::shader! {
    ty: "fragment",
    path: "src/shaders/frag.glsl",
  }
}
