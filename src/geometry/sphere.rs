//! Latitude/longitude sphere with flat per-cell normals.

use std::f32::consts::TAU;

use glam::Vec3;

use super::{GeometryBuffer, VERTICES_PER_QUAD, flat_normal};

/// Maps spherical coordinates to cartesian ones.
///
/// `theta` is the longitude angle around the z axis, `phi` the polar angle
/// measured from +z: `(r·cosθ·sinφ, r·sinθ·sinφ, r·cosφ)`.
pub fn sphere_point(radius: f32, theta: f32, phi: f32) -> Vec3 {
  let (sin_theta, cos_theta) = theta.sin_cos();
  let (sin_phi, cos_phi) = phi.sin_cos();
  Vec3::new(
    radius * cos_theta * sin_phi,
    radius * sin_theta * sin_phi,
    radius * cos_phi,
  )
}

/// Number of vertices [`create_sphere`] appends for `sectors` longitude sectors.
pub fn sphere_vertex_count(sectors: u32) -> usize {
  sectors as usize * (sectors / 2) as usize * VERTICES_PER_QUAD
}

/// Appends a sphere of `radius` made of `sectors` longitude sectors and
/// `sectors / 2` latitude bands.
///
/// Both angles advance by `2π / sectors` per step, so the latitude bands
/// sweep the polar angle from the +z pole down to the -z pole.
pub fn create_sphere(buffer: &mut GeometryBuffer, radius: f32, sectors: u32) {
  let bands = sectors / 2;
  let angle = |step: u32| step as f32 * TAU / sectors as f32;

  for i in 0..sectors {
    let theta1 = angle(i);
    let theta2 = angle(i + 1);

    for j in 0..bands {
      let phi1 = angle(j);
      let phi2 = angle(j + 1);

      let p1 = sphere_point(radius, theta1, phi1);
      let p2 = sphere_point(radius, theta1, phi2);
      let p3 = sphere_point(radius, theta2, phi2);
      let p4 = sphere_point(radius, theta2, phi1);

      // p2 and p3 collapse onto the -z pole in the last band.
      let normal = if j + 1 == bands {
        flat_normal(p1 - p4, p1 - p2)
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

  const RADIUS: f32 = 0.3;

  fn sphere(sectors: u32) -> GeometryBuffer {
    let mut buffer = GeometryBuffer::new();
    create_sphere(&mut buffer, RADIUS, sectors);
    buffer
  }

  /// Normal of the cell at longitude `i`, latitude band `j`.
  fn cell_normal(buffer: &GeometryBuffer, sectors: u32, i: u32, j: u32) -> Vec3 {
    let cell = (i * (sectors / 2) + j) as usize;
    buffer.normals()[cell * VERTICES_PER_QUAD]
  }

  #[test]
  fn sphere_point_hits_poles_and_equator() {
    assert_eq!(sphere_point(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0));
    let equator = sphere_point(1.0, 0.0, std::f32::consts::FRAC_PI_2);
    assert!((equator - Vec3::X).length() < 1e-6);
  }

  #[test]
  fn vertex_count_matches_sector_formula() {
    for sectors in [4, 10, 32] {
      let buffer = sphere(sectors);
      assert_eq!(buffer.vertex_count(), sphere_vertex_count(sectors));
      assert_eq!(
        buffer.vertex_count(),
        (sectors * (sectors / 2) * 6) as usize
      );
    }
    assert_eq!(sphere_vertex_count(200), 120_000);
  }

  #[test]
  fn every_vertex_lies_on_the_sphere() {
    let buffer = sphere(24);
    for p in buffer.positions() {
      assert!((p.length() - RADIUS).abs() < 1e-5, "{p} is off the sphere");
    }
  }

  #[test]
  fn all_normals_have_unit_length() {
    let buffer = sphere(40);
    for n in buffer.normals() {
      assert!(n.is_finite());
      assert!((n.length() - 1.0).abs() < 1e-4, "normal {n} is not unit length");
    }
  }

  #[test]
  fn pole_band_normal_keeps_the_neighbouring_orientation() {
    let sectors = 40;
    let buffer = sphere(sectors);
    let last = sectors / 2 - 1;

    for i in 0..sectors {
      let pole = cell_normal(&buffer, sectors, i, last);
      let neighbour = cell_normal(&buffer, sectors, i, last - 1);
      assert!(
        pole.dot(neighbour) > 0.5,
        "sign flip at sector {i}: {pole} vs {neighbour}"
      );
    }
  }

  #[test]
  fn general_formula_degenerates_at_the_pole() {
    let sectors = 40;
    let theta1 = 0.0;
    let theta2 = TAU / sectors as f32;
    let phi = std::f32::consts::PI;

    let p2 = sphere_point(RADIUS, theta1, phi);
    let p3 = sphere_point(RADIUS, theta2, phi);
    assert!((p3 - p2).length() < 1e-6);
  }
}
