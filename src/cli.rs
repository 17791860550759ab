use clap::Parser;

use crate::config::LogoConfig;

/// Renders a spinning sphere with two horns.
#[derive(Parser, Debug, Default)]
#[command(name = "horned-logo", version, about)]
pub struct Args {
  /// Longitude sectors of the sphere (latitude bands are half of this).
  #[arg(long)]
  pub sphere_sectors: Option<u32>,

  /// Angular sectors of each horn.
  #[arg(long)]
  pub horn_detail: Option<u32>,

  /// Spin speed in degrees per presented frame.
  #[arg(long, allow_negative_numbers = true)]
  pub degrees_per_frame: Option<f32>,

  /// Draw triangle edges instead of filled faces.
  #[arg(long)]
  pub wireframe: bool,

  /// Show the statistics overlay.
  #[arg(long)]
  pub overlay: bool,

  /// Log filter override (e.g. debug, or horned_logo=debug,vulkano=warn).
  #[arg(long)]
  pub log_level: Option<String>,
}

impl Args {
  /// Applies the command-line overrides on top of `base`.
  pub fn apply(&self, mut base: LogoConfig) -> LogoConfig {
    if let Some(sectors) = self.sphere_sectors {
      base.geometry.sphere.sectors = sectors;
    }
    if let Some(detail) = self.horn_detail {
      base.geometry.horn.detail = detail;
    }
    if let Some(degrees) = self.degrees_per_frame {
      base.render.degrees_per_frame = degrees;
    }
    base.render.wireframe |= self.wireframe;
    base.render.show_overlay |= self.overlay;
    base
  }
}

pub fn parse() -> Args {
  Args::parse()
}
