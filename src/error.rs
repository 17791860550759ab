use std::fmt::Display;

/// Invalid values in a [`LogoConfig`](crate::config::LogoConfig).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
  #[error("sphere sectors must be even and at least 4, got {0}")]
  SphereSectors(u32),

  #[error("horn detail must be at least 1")]
  HornDetail,

  #[error("{name} must be positive, got {value}")]
  NonPositive { name: &'static str, value: f32 },

  #[error("window size must be non-zero, got {width}x{height}")]
  WindowSize { width: u32, height: u32 },

  #[error("logo needs {0} vertices, more than a single draw can take")]
  TooManyVertices(u128),
}

/// Errors raised while bringing up the window, device and pipeline.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
  #[error("failed to load the Vulkan library: {0}")]
  Library(String),

  #[error("instance error: {0}")]
  Instance(String),

  #[error("no physical device supports graphics and presentation")]
  NoSuitableDevice,

  #[error("device error: {0}")]
  Device(String),

  #[error("window error: {0}")]
  Window(String),

  #[error("surface error: {0}")]
  Surface(String),

  #[error("swapchain error: {0}")]
  Swapchain(String),

  #[error("shader error: {0}")]
  Shader(String),

  #[error("pipeline error: {0}")]
  Pipeline(String),

  #[error("buffer error: {0}")]
  Buffer(String),
}

impl InitError {
  pub(crate) fn device(err: impl Display) -> Self {
    Self::Device(err.to_string())
  }

  pub(crate) fn surface(err: impl Display) -> Self {
    Self::Surface(err.to_string())
  }

  pub(crate) fn swapchain(err: impl Display) -> Self {
    Self::Swapchain(err.to_string())
  }

  pub(crate) fn shader(err: impl Display) -> Self {
    Self::Shader(err.to_string())
  }

  pub(crate) fn pipeline(err: impl Display) -> Self {
    Self::Pipeline(err.to_string())
  }

  pub(crate) fn buffer(err: impl Display) -> Self {
    Self::Buffer(err.to_string())
  }
}

/// Failures that drop a single frame without stopping the loop.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
  #[error("uniform upload failed: {0}")]
  Uniform(String),

  #[error("descriptor set creation failed: {0}")]
  Descriptor(String),

  #[error("failed to acquire swapchain image: {0}")]
  Acquire(String),

  #[error("command recording failed: {0}")]
  Record(String),

  #[error("submission failed: {0}")]
  Submit(String),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn config_error_display() {
    let err = ConfigError::NonPositive {
      name:  "horn shape",
      value: -1.0,
    };
    assert_eq!(err.to_string(), "horn shape must be positive, got -1");
    assert_eq!(
      ConfigError::SphereSectors(7).to_string(),
      "sphere sectors must be even and at least 4, got 7"
    );
  }

  #[test]
  fn init_error_wraps_display_of_source() {
    let err = InitError::pipeline("no subpass 0");
    assert_eq!(err.to_string(), "pipeline error: no subpass 0");
    assert_eq!(
      InitError::NoSuitableDevice.to_string(),
      "no physical device supports graphics and presentation"
    );
  }

  #[test]
  fn frame_error_display() {
    let err = FrameError::Acquire("device lost".to_owned());
    assert_eq!(err.to_string(), "failed to acquire swapchain image: device lost");
  }
}
