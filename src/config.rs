//! Tunables for geometry generation and rendering.
//!
//! [`LogoConfig::default`] reproduces the classic logo: a 200-sector sphere
//! of radius 0.3, two 100-sector horns with `a = 7`, everything doubled in
//! size, spinning one degree per frame in red on a dark blue background.

use glam::Vec3;

use crate::{
  error::ConfigError,
  geometry::{HornProfile, VERTICES_PER_QUAD},
};

#[derive(Debug, Clone, PartialEq)]
pub struct SphereConfig {
  pub radius:  f32,
  /// Longitude sectors; latitude bands are half of this.
  pub sectors: u32,
}

impl Default for SphereConfig {
  fn default() -> Self {
    Self {
      radius:  0.30,
      sectors: 200,
    }
  }
}

/// Shape and placement of the two horns.
///
/// The left horn sits at `(-offset.x, offset.y, offset.z)` turned by `yaw`
/// degrees about +y; the right horn mirrors it at `offset` turned by
/// `360 - yaw` degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct HornConfig {
  pub profile: HornProfile,
  /// Angular sectors per horn.
  pub detail:  u32,
  pub offset:  Vec3,
  pub yaw:     f32,
  pub scale:   f32,
}

impl Default for HornConfig {
  fn default() -> Self {
    Self {
      profile: HornProfile::default(),
      detail:  crate::geometry::horn::DEFAULT_DETAIL,
      offset:  Vec3::new(0.3, 0.0, 0.3),
      yaw:     135.0,
      scale:   0.3,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeometryConfig {
  pub sphere:       SphereConfig,
  pub horn:         HornConfig,
  /// Applied to every position once all parts are generated.
  pub global_scale: f32,
}

impl Default for GeometryConfig {
  fn default() -> Self {
    Self {
      sphere:       SphereConfig::default(),
      horn:         HornConfig::default(),
      global_scale: 2.0,
    }
  }
}

impl GeometryConfig {
  /// Vertex count of the assembled logo, computed without overflow so that
  /// oversized settings can be rejected before anything is allocated.
  fn vertex_count_wide(&self) -> u128 {
    let quad = VERTICES_PER_QUAD as u128;
    let sectors = u128::from(self.sphere.sectors);
    let sphere = sectors * (sectors / 2) * quad;
    let rings = self.horn.profile.ring_count() as u128;
    let horn = u128::from(self.horn.detail) * rings * quad;
    sphere + 2 * horn
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
  pub window_title:      String,
  /// Logical window size in pixels.
  pub window_size:       [u32; 2],
  pub background:        [f32; 4],
  pub logo_color:        [f32; 3],
  pub degrees_per_frame: f32,
  pub wireframe:         bool,
  pub line_width:        f32,
  pub show_overlay:      bool,
}

impl Default for RenderConfig {
  fn default() -> Self {
    Self {
      window_title:      "Horned Logo".to_owned(),
      window_size:       [640, 640],
      background:        [0.1, 0.1, 0.2, 1.0],
      logo_color:        [200.0 / 255.0, 0.0, 0.0],
      degrees_per_frame: 1.0,
      wireframe:         false,
      line_width:        1.0,
      show_overlay:      false,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogoConfig {
  pub geometry: GeometryConfig,
  pub render:   RenderConfig,
}

impl LogoConfig {
  /// Rejects values the generators cannot produce a closed mesh from.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let sphere = &self.geometry.sphere;
    if sphere.sectors < 4 || sphere.sectors % 2 != 0 {
      return Err(ConfigError::SphereSectors(sphere.sectors));
    }
    if self.geometry.horn.detail == 0 {
      return Err(ConfigError::HornDetail);
    }

    let profile = &self.geometry.horn.profile;
    positive("sphere radius", sphere.radius)?;
    positive("horn shape", profile.shape)?;
    positive("horn ring step", profile.ring_step)?;
    positive("horn height bound", profile.height_bound)?;
    positive("horn scale", self.geometry.horn.scale)?;
    positive("global scale", self.geometry.global_scale)?;
    positive("line width", self.render.line_width)?;

    let vertices = self.geometry.vertex_count_wide();
    if vertices > u128::from(u32::MAX) {
      return Err(ConfigError::TooManyVertices(vertices));
    }

    let [width, height] = self.render.window_size;
    if width == 0 || height == 0 {
      return Err(ConfigError::WindowSize { width, height });
    }

    Ok(())
  }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
  if value > 0.0 && value.is_finite() {
    Ok(())
  } else {
    Err(ConfigError::NonPositive { name, value })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_config_is_valid() {
    assert_eq!(LogoConfig::default().validate(), Ok(()));
  }

  #[test]
  fn odd_or_tiny_sphere_sectors_are_rejected() {
    let mut config = LogoConfig::default();
    config.geometry.sphere.sectors = 201;
    assert_eq!(config.validate(), Err(ConfigError::SphereSectors(201)));

    config.geometry.sphere.sectors = 2;
    assert_eq!(config.validate(), Err(ConfigError::SphereSectors(2)));
  }

  #[test]
  fn zero_horn_detail_is_rejected() {
    let mut config = LogoConfig::default();
    config.geometry.horn.detail = 0;
    assert_eq!(config.validate(), Err(ConfigError::HornDetail));
  }

  #[test]
  fn non_positive_values_name_the_field() {
    let mut config = LogoConfig::default();
    config.geometry.horn.profile.ring_step = 0.0;
    assert_eq!(
      config.validate(),
      Err(ConfigError::NonPositive {
        name:  "horn ring step",
        value: 0.0,
      })
    );

    let mut config = LogoConfig::default();
    config.geometry.global_scale = f32::NAN;
    assert!(matches!(
      config.validate(),
      Err(ConfigError::NonPositive {
        name: "global scale",
        ..
      })
    ));
  }

  #[test]
  fn undrawable_mesh_is_rejected_before_generation() {
    let mut config = LogoConfig::default();
    config.geometry.sphere.sectors = 40_000;
    // 40000 * 20000 * 6 for the sphere, 100 * 27 * 6 for each horn
    assert_eq!(
      config.validate(),
      Err(ConfigError::TooManyVertices(4_800_032_400))
    );

    let mut config = LogoConfig::default();
    config.geometry.sphere.sectors = u32::MAX - 1;
    assert!(matches!(
      config.validate(),
      Err(ConfigError::TooManyVertices(_))
    ));
  }

  #[test]
  fn wide_vertex_count_matches_the_assembler() {
    let config = GeometryConfig::default();
    assert_eq!(
      config.vertex_count_wide(),
      crate::geometry::logo::logo_vertex_count(&config) as u128
    );
  }

  #[test]
  fn empty_window_is_rejected() {
    let mut config = LogoConfig::default();
    config.render.window_size = [640, 0];
    assert_eq!(
      config.validate(),
      Err(ConfigError::WindowSize {
        width:  640,
        height: 0,
      })
    );
  }
}
