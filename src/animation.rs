//! Frame counting and the per-frame model transform.
//!
//! The logo is tipped over so its local +z axis points up the screen, then
//! spun about that axis by a fixed number of degrees per presented frame.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};

/// Monotonic count of presented frames.
///
/// The spin angle follows its own count, which stands still while the
/// counter is paused; the presented-frame count never stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCounter {
  frame:  u64,
  spin:   u64,
  paused: bool,
}

impl FrameCounter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn frame(&self) -> u64 {
    self.frame
  }

  pub fn is_paused(&self) -> bool {
    self.paused
  }

  pub fn set_paused(&mut self, paused: bool) {
    self.paused = paused;
  }

  pub fn advance(&mut self) {
    self.frame = self.frame.wrapping_add(1);
    if !self.paused {
      self.spin = self.spin.wrapping_add(1);
    }
  }

  /// Spin angle in degrees for the current frame, reduced into `[0, 360)`.
  pub fn rotation_degrees(&self, degrees_per_frame: f32) -> f32 {
    (self.spin as f64 * f64::from(degrees_per_frame)).rem_euclid(360.0) as f32
  }
}

/// Orientation of the logo after spinning `degrees` about its own axis.
pub fn model_matrix(degrees: f32) -> Mat4 {
  Mat4::from_rotation_x(-FRAC_PI_2) * Mat4::from_rotation_z(degrees.to_radians())
}

/// Maps GL-style clip space onto Vulkan's and keeps a square logo square.
///
/// Vulkan's y axis points down and its depth range is `[0, 1]`, so y is
/// flipped and z is remapped from `[-1, 1]`. `aspect` is width over height.
pub fn clip_correction(aspect: f32) -> Mat4 {
  let (sx, sy) = if aspect >= 1.0 {
    (1.0 / aspect, 1.0)
  } else {
    (1.0, aspect)
  };

  Mat4::from_translation(Vec3::new(0.0, 0.0, 0.5)) * Mat4::from_scale(Vec3::new(sx, -sy, 0.5))
}

/// Complete vertex transform for one frame.
pub fn frame_matrix(degrees: f32, aspect: f32) -> Mat4 {
  clip_correction(aspect) * model_matrix(degrees)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-5
  }

  #[test]
  fn counter_starts_at_zero_and_advances_by_one() {
    let mut frames = FrameCounter::new();
    assert_eq!(frames.frame(), 0);
    frames.advance();
    frames.advance();
    assert_eq!(frames.frame(), 2);
  }

  #[test]
  fn rotation_wraps_at_a_full_turn() {
    let mut frames = FrameCounter::new();
    for _ in 0..370 {
      frames.advance();
    }
    assert_eq!(frames.rotation_degrees(1.0), 10.0);
    assert_eq!(frames.rotation_degrees(0.5), 185.0);
    assert_eq!(FrameCounter::new().rotation_degrees(1.0), 0.0);
  }

  #[test]
  fn rotation_holds_while_paused() {
    let mut frames = FrameCounter::new();
    for _ in 0..30 {
      frames.advance();
    }

    frames.set_paused(true);
    for _ in 0..50 {
      frames.advance();
    }
    assert!(frames.is_paused());
    assert_eq!(frames.frame(), 80);
    assert_eq!(frames.rotation_degrees(1.0), 30.0);

    frames.set_paused(false);
    frames.advance();
    assert_eq!(frames.rotation_degrees(1.0), 31.0);
  }

  #[test]
  fn model_axis_points_up_the_screen() {
    let up = model_matrix(0.0).transform_vector3(Vec3::Z);
    assert!(approx(up, Vec3::Y));

    // Spinning never tilts the axis.
    let up = model_matrix(73.0).transform_vector3(Vec3::Z);
    assert!(approx(up, Vec3::Y));
  }

  #[test]
  fn spin_turns_about_the_model_axis() {
    let a = model_matrix(0.0).transform_vector3(Vec3::X);
    let b = model_matrix(90.0).transform_vector3(Vec3::X);
    assert!(a.dot(b).abs() < 1e-5);
    assert!(approx(model_matrix(360.0).transform_vector3(Vec3::X), a));
  }

  #[test]
  fn clip_correction_flips_y_and_remaps_depth() {
    let m = clip_correction(1.0);
    assert!(approx(m.transform_point3(Vec3::new(0.0, 1.0, -1.0)), Vec3::new(0.0, -1.0, 0.0)));
    assert!(approx(m.transform_point3(Vec3::new(1.0, 0.0, 1.0)), Vec3::new(1.0, 0.0, 1.0)));
  }

  #[test]
  fn clip_correction_squeezes_the_longer_axis() {
    let wide = clip_correction(2.0).transform_point3(Vec3::new(1.0, 1.0, 0.0));
    assert!(approx(wide, Vec3::new(0.5, -1.0, 0.5)));

    let tall = clip_correction(0.5).transform_point3(Vec3::new(1.0, 1.0, 0.0));
    assert!(approx(tall, Vec3::new(1.0, -0.5, 0.5)));
  }

  #[test]
  fn frame_matrix_puts_the_logo_top_at_the_top() {
    let top = frame_matrix(0.0, 1.0).transform_point3(Vec3::Z);
    assert!(approx(top, Vec3::new(0.0, -1.0, 0.5)));
  }
}
