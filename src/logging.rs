//! Logger initialisation.
//!
//! Everything in the crate logs through the `log` facade; the binary installs
//! `env_logger` as the backend once at start-up.

use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "horned_logo=debug,vulkano=warn"). When absent, `RUST_LOG` is consulted,
/// then the level defaults to `info`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
  pub env_filter:  Option<String>,
  pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      env_filter:  None,
      write_style: env_logger::WriteStyle::Auto,
    }
  }
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
  INIT.call_once(|| {
    let mut builder = env_logger::Builder::new();

    if let Some(filter) = config.env_filter {
      builder.parse_filters(&filter);
    } else if let Ok(filter) = std::env::var("RUST_LOG") {
      builder.parse_filters(&filter);
    } else {
      builder.filter_level(log::LevelFilter::Info);
    }

    builder.write_style(config.write_style);

    if let Err(err) = builder.try_init() {
      eprintln!("logger already installed: {err}");
    }

    log::debug!("logging initialized");
  });
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn init_is_idempotent() {
    init_logging(LoggingConfig {
      env_filter: Some("debug".to_owned()),
      ..Default::default()
    });
    init_logging(LoggingConfig::default());
    log::info!("still logging");
  }
}
