pub mod animation;
pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod geometry;
pub mod gui;
pub mod logging;
pub mod render;
pub mod shaders;
pub mod vertex;

// Re-export commonly used items
pub use animation::{FrameCounter, frame_matrix, model_matrix};
pub use app::App;
pub use config::{GeometryConfig, HornConfig, LogoConfig, RenderConfig, SphereConfig};
pub use error::{ConfigError, FrameError, InitError};
pub use geometry::{GeometryBuffer, HornProfile, build_logo, create_geometry};
pub use render::{LogoModelBuffers, RenderContext, WindowSizeSetupConfig, window_size_dependent_setup};
pub use shaders::{fs, vs};
pub use vertex::{Normal, Position};
