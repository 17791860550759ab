//! GPU-side resources for drawing the logo.
//!
//! * [`model`]: the one-time upload of the generated geometry
//! * [`pipeline`]: surface-bound state (swapchain, framebuffers, pipeline)

pub mod model;
pub mod pipeline;

pub use model::{LogoModelBuffers, upload_logo_geometry};
pub use pipeline::{RenderContext, WindowSizeSetupConfig, window_size_dependent_setup};
