//! Procedural geometry for the horned logo.
//!
//! All generators append into a shared [`GeometryBuffer`]: a non-indexed
//! triangle list made of two parallel sequences, positions and normals.
//! Every quad cell is emitted as the two triangles `(p1, p2, p3)` and
//! `(p3, p4, p1)`, with one flat normal repeated on all six vertices.
//!
//! * [`sphere`]: the tessellated sphere forming the logo's body
//! * [`horn`]: a paraboloid of revolution placed by a caller-supplied matrix
//! * [`logo`]: the assembler that combines one sphere and two horns

use glam::Vec3;

pub mod horn;
pub mod logo;
pub mod sphere;

pub use horn::{HornProfile, create_horn};
pub use logo::{build_logo, create_geometry, horn_placements};
pub use sphere::{create_sphere, sphere_point};

/// Vertices written per quad cell: two triangles of three vertices each.
pub const VERTICES_PER_QUAD: usize = 6;

/// Positions and normals of a flat-shaded, non-indexed triangle list.
///
/// Index `i` of [`positions`](Self::positions) pairs with index `i` of
/// [`normals`](Self::normals). Both sequences always have the same length,
/// and that length is a multiple of three.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryBuffer {
  positions: Vec<Vec3>,
  normals:   Vec<Vec3>,
}

impl GeometryBuffer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates an empty buffer with room for `vertices` entries in each sequence.
  pub fn with_capacity(vertices: usize) -> Self {
    Self {
      positions: Vec::with_capacity(vertices),
      normals:   Vec::with_capacity(vertices),
    }
  }

  pub fn clear(&mut self) {
    self.positions.clear();
    self.normals.clear();
  }

  pub fn positions(&self) -> &[Vec3] {
    &self.positions
  }

  pub fn normals(&self) -> &[Vec3] {
    &self.normals
  }

  pub fn vertex_count(&self) -> usize {
    self.positions.len()
  }

  pub fn triangle_count(&self) -> usize {
    self.positions.len() / 3
  }

  pub fn is_empty(&self) -> bool {
    self.positions.is_empty()
  }

  /// Appends the quad `p1 p2 p3 p4` as triangles `(p1, p2, p3)` and
  /// `(p3, p4, p1)`, all six vertices carrying `normal`.
  pub fn push_quad(&mut self, [p1, p2, p3, p4]: [Vec3; 4], normal: Vec3) {
    self.positions.extend_from_slice(&[p1, p2, p3, p3, p4, p1]);
    self
      .normals
      .extend_from_slice(&[normal; VERTICES_PER_QUAD]);
  }

  /// Multiplies every position by `factor`. Normals are left untouched.
  pub fn scale_positions(&mut self, factor: f32) {
    for position in &mut self.positions {
      *position *= factor;
    }
  }

  /// Flattens the buffer into the layout uploaded to the GPU: every position
  /// first, then every normal, three `f32` each.
  pub fn upload_layout(&self) -> Vec<[f32; 3]> {
    self
      .positions
      .iter()
      .chain(self.normals.iter())
      .map(|v| v.to_array())
      .collect()
  }
}

/// Unit-length normal of the plane spanned by `u` and `v` (`u × v`).
///
/// A degenerate cross product (parallel or zero-length inputs) yields the zero
/// vector rather than NaN.
pub fn flat_normal(u: Vec3, v: Vec3) -> Vec3 {
  u.cross(v).normalize_or_zero()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn push_quad_emits_two_triangles_with_shared_normal() {
    let mut buffer = GeometryBuffer::new();
    let quad = [Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y];
    buffer.push_quad(quad, Vec3::Z);

    assert_eq!(buffer.vertex_count(), 6);
    assert_eq!(buffer.triangle_count(), 2);
    assert_eq!(
      buffer.positions(),
      &[quad[0], quad[1], quad[2], quad[2], quad[3], quad[0]]
    );
    assert!(buffer.normals().iter().all(|n| *n == Vec3::Z));
  }

  #[test]
  fn scale_positions_leaves_normals_alone() {
    let mut buffer = GeometryBuffer::new();
    buffer.push_quad([Vec3::X, Vec3::Y, Vec3::Z, Vec3::ONE], Vec3::new(0.0, 0.6, 0.8));
    buffer.scale_positions(2.0);

    assert_eq!(buffer.positions()[0], Vec3::new(2.0, 0.0, 0.0));
    assert_eq!(buffer.positions()[4], Vec3::splat(2.0));
    assert!(buffer.normals().iter().all(|n| *n == Vec3::new(0.0, 0.6, 0.8)));
  }

  #[test]
  fn upload_layout_puts_positions_before_normals() {
    let mut buffer = GeometryBuffer::new();
    buffer.push_quad([Vec3::X, Vec3::Y, Vec3::Z, Vec3::ONE], Vec3::NEG_Z);

    let layout = buffer.upload_layout();
    assert_eq!(layout.len(), 12);
    assert_eq!(layout[0], [1.0, 0.0, 0.0]);
    assert_eq!(layout[5], [1.0, 0.0, 0.0]);
    assert!(layout[6..].iter().all(|n| *n == [0.0, 0.0, -1.0]));
  }

  #[test]
  fn clear_empties_both_sequences() {
    let mut buffer = GeometryBuffer::with_capacity(6);
    buffer.push_quad([Vec3::X, Vec3::Y, Vec3::Z, Vec3::ONE], Vec3::Z);
    buffer.clear();

    assert!(buffer.is_empty());
    assert!(buffer.normals().is_empty());
  }

  #[test]
  fn flat_normal_is_unit_or_zero() {
    assert_eq!(flat_normal(Vec3::X * 3.0, Vec3::Y * 0.5), Vec3::Z);
    assert_eq!(flat_normal(Vec3::X, Vec3::X * 2.0), Vec3::ZERO);
    assert_eq!(flat_normal(Vec3::ZERO, Vec3::Y), Vec3::ZERO);
  }
}
