use std::error::Error;

use horned_logo::{
  App,
  LogoConfig,
  cli,
  logging::{self, LoggingConfig},
};
use winit::event_loop::EventLoop;

fn main() -> Result<(), Box<dyn Error>> {
  let args = cli::parse();
  logging::init_logging(LoggingConfig {
    env_filter: args.log_level.clone(),
    ..Default::default()
  });

  let config = args.apply(LogoConfig::default());
  config.validate()?;

  log::info!("horned-logo v{} starting", env!("CARGO_PKG_VERSION"));

  let event_loop = EventLoop::new()?;
  let mut app = App::new(&event_loop, config)?;
  Ok(event_loop.run_app(&mut app)?)
}
