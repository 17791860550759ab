//! Paraboloid "horn" surfaces of revolution.
//!
//! The horn profile is `z = a·r²` revolved around the z axis. Rings are
//! emitted outward from the apex until the profile reaches its height bound,
//! so the ring count follows from the shape rather than being fixed.

use std::f32::consts::TAU;

use glam::{Mat4, Vec3};

use super::{GeometryBuffer, VERTICES_PER_QUAD, flat_normal};

/// Angular sectors used for a horn when no other detail is requested.
pub const DEFAULT_DETAIL: u32 = 100;

/// Shape of one horn in its local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HornProfile {
  /// The `a` in `z = a·r²`.
  pub shape:        f32,
  /// Radial distance between consecutive rings.
  pub ring_step:    f32,
  /// Rings are generated while the inner radius stays below this height.
  pub height_bound: f32,
}

impl Default for HornProfile {
  fn default() -> Self {
    Self {
      shape:        7.0,
      ring_step:    0.01,
      height_bound: 0.5,
    }
  }
}

impl HornProfile {
  pub fn height(&self, radius: f32) -> f32 {
    self.shape * radius * radius
  }

  /// Point on the untransformed surface at `radius` and angle `theta`.
  pub fn point(&self, radius: f32, theta: f32) -> Vec3 {
    let (sin_theta, cos_theta) = theta.sin_cos();
    Vec3::new(radius * sin_theta, radius * cos_theta, self.height(radius))
  }

  /// Number of rings per angular sector: the smallest `k` for which
  /// `a·(k·step)² >= bound`.
  ///
  /// A profile that never reaches its bound (non-positive shape or step)
  /// produces no rings.
  pub fn ring_count(&self) -> usize {
    if self.shape <= 0.0 || self.ring_step <= 0.0 {
      return 0;
    }

    (0usize..)
      .take_while(|&ring| self.height(ring as f32 * self.ring_step) < self.height_bound)
      .count()
  }

  /// Number of vertices [`create_horn`] appends with `detail` sectors.
  pub fn vertex_count(&self, detail: u32) -> usize {
    detail as usize * self.ring_count() * VERTICES_PER_QUAD
  }
}

/// Appends one horn, mapped into place by `transform`, with `detail` angular
/// sectors.
pub fn create_horn(
  buffer: &mut GeometryBuffer,
  profile: &HornProfile,
  transform: Mat4,
  detail: u32,
) {
  let rings = profile.ring_count();
  let angle = |step: u32| step as f32 * TAU / detail as f32;

  for i in 0..detail {
    let theta1 = angle(i);
    let theta2 = angle(i + 1);

    for ring in 0..rings {
      let r1 = ring as f32 * profile.ring_step;
      let r2 = (ring + 1) as f32 * profile.ring_step;

      let p1 = transform.transform_point3(profile.point(r1, theta1));
      let p2 = transform.transform_point3(profile.point(r2, theta1));
      let p3 = transform.transform_point3(profile.point(r2, theta2));
      let p4 = transform.transform_point3(profile.point(r1, theta2));

      // The innermost ring starts at the apex, where p1 and p4 coincide.
      let normal = if ring == 0 {
        let d1 = (p1 - p2).normalize_or_zero();
        let d2 = (p3 - p1).normalize_or_zero();
        flat_normal(d1, d2)
      } else {
        flat_normal(p1 - p2, p3 - p2)
      };

      buffer.push_quad([p1, p2, p3, p4], normal);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn horn(detail: u32, transform: Mat4) -> GeometryBuffer {
    let mut buffer = GeometryBuffer::new();
    create_horn(&mut buffer, &HornProfile::default(), transform, detail);
    buffer
  }

  #[test]
  fn default_profile_has_27_rings() {
    // 7 * 0.26^2 = 0.4732 < 0.5 <= 7 * 0.27^2 = 0.5103
    assert_eq!(HornProfile::default().ring_count(), 27);
  }

  #[test]
  fn ring_count_follows_the_shape() {
    let wide = HornProfile {
      shape: 5.0,
      ..HornProfile::default()
    };
    // 5 * 0.31^2 = 0.4805 < 0.5 <= 5 * 0.32^2 = 0.512
    assert_eq!(wide.ring_count(), 32);

    let flat = HornProfile {
      shape: 0.0,
      ..HornProfile::default()
    };
    assert_eq!(flat.ring_count(), 0);
  }

  #[test]
  fn doubling_detail_doubles_sectors_only() {
    let profile = HornProfile::default();
    let coarse = horn(50, Mat4::IDENTITY);
    let fine = horn(100, Mat4::IDENTITY);

    assert_eq!(coarse.vertex_count(), 50 * 27 * 6);
    assert_eq!(fine.vertex_count(), 2 * coarse.vertex_count());
    assert_eq!(fine.vertex_count(), profile.vertex_count(100));
  }

  #[test]
  fn untransformed_points_follow_the_paraboloid() {
    let profile = HornProfile::default();
    let buffer = horn(16, Mat4::IDENTITY);
    for p in buffer.positions() {
      let r2 = p.x * p.x + p.y * p.y;
      assert!((p.z - profile.shape * r2).abs() < 1e-5);
    }
  }

  #[test]
  fn apex_ring_normals_are_finite_and_unit_length() {
    let placement = Mat4::from_translation(Vec3::new(-0.3, 0.0, 0.3))
      * Mat4::from_rotation_y(135f32.to_radians())
      * Mat4::from_scale(Vec3::splat(0.3));
    let buffer = horn(DEFAULT_DETAIL, placement);
    let rings = HornProfile::default().ring_count();

    for sector in 0..DEFAULT_DETAIL as usize {
      let apex = buffer.normals()[sector * rings * VERTICES_PER_QUAD];
      assert!(apex.is_finite());
      assert!((apex.length() - 1.0).abs() < 1e-4, "apex normal {apex}");
    }
  }

  #[test]
  fn transform_is_applied_to_every_vertex() {
    let offset = Vec3::new(1.0, 2.0, 3.0);
    let plain = horn(8, Mat4::IDENTITY);
    let moved = horn(8, Mat4::from_translation(offset));

    for (a, b) in plain.positions().iter().zip(moved.positions()) {
      assert!((*b - *a - offset).length() < 1e-5);
    }
    for (a, b) in plain.normals().iter().zip(moved.normals()) {
      assert!((*a - *b).length() < 1e-3);
    }
  }
}
