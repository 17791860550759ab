//! Assembles the full logo: one sphere, two mirrored horns, one global scale.

use glam::{Mat4, Vec3};

use super::{GeometryBuffer, create_horn, create_sphere, sphere::sphere_vertex_count};
use crate::config::{GeometryConfig, HornConfig};

/// Placement matrices for the left and right horn, in that order.
///
/// Each horn is scaled down, turned outward about +y and then moved off
/// centre; the right horn mirrors the left one across the yz plane.
pub fn horn_placements(horn: &HornConfig) -> [Mat4; 2] {
  let placement = |offset: Vec3, yaw: f32| {
    Mat4::from_translation(offset)
      * Mat4::from_rotation_y(yaw.to_radians())
      * Mat4::from_scale(Vec3::splat(horn.scale))
  };

  let left = Vec3::new(-horn.offset.x, horn.offset.y, horn.offset.z);
  [
    placement(left, horn.yaw),
    placement(horn.offset, 360.0 - horn.yaw),
  ]
}

/// Vertices [`create_geometry`] produces for `config`.
pub fn logo_vertex_count(config: &GeometryConfig) -> usize {
  sphere_vertex_count(config.sphere.sectors)
    + 2 * config.horn.profile.vertex_count(config.horn.detail)
}

/// Regenerates the logo into `buffer`, discarding whatever it held.
///
/// Parts are generated at native size, horns are placed by their own
/// matrices, and only then is every position multiplied by the global scale.
pub fn create_geometry(buffer: &mut GeometryBuffer, config: &GeometryConfig) {
  buffer.clear();

  create_sphere(buffer, config.sphere.radius, config.sphere.sectors);
  for placement in horn_placements(&config.horn) {
    create_horn(buffer, &config.horn.profile, placement, config.horn.detail);
  }

  buffer.scale_positions(config.global_scale);

  log::debug!(
    "generated logo geometry: {} vertices, {} triangles",
    buffer.vertex_count(),
    buffer.triangle_count()
  );
}

/// Builds a fresh buffer holding the logo described by `config`.
pub fn build_logo(config: &GeometryConfig) -> GeometryBuffer {
  let mut buffer = GeometryBuffer::with_capacity(logo_vertex_count(config));
  create_geometry(&mut buffer, config);
  buffer
}
