//! Statistics overlay using egui.
//!
//! Shows frame timing, the frame counter, the current spin angle and mesh
//! size, and exposes the pause and wireframe toggles and the logo colour.

use std::time::Instant;

use egui_winit_vulkano::Gui;

/// Overlay state carried between frames.
#[derive(Clone, Copy)]
pub struct GuiState {
  /// Current frames per second
  pub fps:                    f32,
  /// Frames per second averaged over the last second
  pub avg_fps:                f32,
  /// Frames counted towards the running average
  pub frame_count:            u32,
  /// Accumulated frame times for averaging
  pub frame_time_accumulator: f32,
  pub last_frame_time:        Instant,
  pub last_avg_update:        Instant,
  pub wireframe_mode:         bool,
  pub line_width:             f32,
  /// Maximum supported line width by the GPU
  pub max_line_width:         f32,
  pub supports_wide_lines:    bool,
  /// Whether the device can rasterize lines at all
  pub supports_wireframe:     bool,
  pub logo_color:             [f32; 3],
  /// Whether the spin is frozen
  pub paused:                 bool,
}

impl Default for GuiState {
  fn default() -> Self {
    let now = Instant::now();
    Self {
      fps:                    0.0,
      avg_fps:                0.0,
      frame_count:            0,
      frame_time_accumulator: 0.0,
      last_frame_time:        now,
      last_avg_update:        now,
      wireframe_mode:         false,
      line_width:             1.0,
      max_line_width:         1.0,
      supports_wide_lines:    false,
      supports_wireframe:     false,
      logo_color:             [1.0, 0.0, 0.0],
      paused:                 false,
    }
  }
}

impl GuiState {
  /// Folds one frame ending at `now` into the timing statistics and returns
  /// that frame's duration in seconds.
  pub fn record_frame(&mut self, now: Instant) -> f32 {
    let frame_time = now.duration_since(self.last_frame_time).as_secs_f32();
    if frame_time > 0.0 {
      self.fps = 1.0 / frame_time;
    }
    self.frame_time_accumulator += frame_time;
    self.frame_count += 1;

    if now.duration_since(self.last_avg_update).as_secs_f32() >= 1.0 {
      if self.frame_time_accumulator > 0.0 {
        self.avg_fps = self.frame_count as f32 / self.frame_time_accumulator;
      }
      self.frame_count = 0;
      self.frame_time_accumulator = 0.0;
      self.last_avg_update = now;
    }

    self.last_frame_time = now;
    frame_time
  }
}

/// Read-only figures shown in the overlay.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayStats {
  pub frame:          u64,
  pub rotation:       f32,
  pub vertex_count:   u32,
  pub triangle_count: u32,
}

/// Settings changed through the overlay this frame.
#[derive(Debug, Default, PartialEq)]
pub struct GuiStateChanges {
  pub wireframe_mode: Option<bool>,
  pub line_width:     Option<f32>,
  pub logo_color:     Option<[f32; 3]>,
  pub paused:         Option<bool>,
}

/// Lays out the overlay for this frame.
pub fn draw_gui(gui: &mut Gui, state: &mut GuiState, stats: OverlayStats) -> GuiStateChanges {
  let mut changes = GuiStateChanges::default();
  let frame_time = state.record_frame(Instant::now());

  gui.immediate_ui(|gui| {
    let ctx = gui.context();

    egui::Window::new("Logo")
      .default_pos([10.0, 10.0])
      .show(&ctx, |ui| {
        ui.heading("Performance");
        ui.label(format!("FPS: {:.1}", state.fps));
        ui.label(format!("Avg FPS: {:.1}", state.avg_fps));
        ui.label(format!("Frame Time: {:.2}ms", frame_time * 1000.0));

        ui.separator();

        ui.heading("Animation");
        ui.label(format!("Frame: {}", stats.frame));
        ui.label(format!("Rotation: {:.1}°", stats.rotation));
        if ui.checkbox(&mut state.paused, "Pause Rotation").changed() {
          changes.paused = Some(state.paused);
        }

        ui.separator();

        ui.heading("Mesh");
        ui.label(format!("Vertices: {}", stats.vertex_count));
        ui.label(format!("Triangles: {}", stats.triangle_count));

        ui.separator();

        ui.heading("Rendering");
        ui.add_enabled_ui(state.supports_wireframe, |ui| {
          if ui
            .checkbox(&mut state.wireframe_mode, "Wireframe Mode")
            .changed()
          {
            changes.wireframe_mode = Some(state.wireframe_mode);
          }
        });

        if state.wireframe_mode {
          if state.supports_wide_lines {
            if ui
              .add(
                egui::Slider::new(&mut state.line_width, 1.0..=state.max_line_width)
                  .text("Line Width"),
              )
              .changed()
            {
              changes.line_width = Some(state.line_width);
            }
          } else {
            ui.label("Wide lines not supported on this device");
          }
        }

        ui.horizontal(|ui| {
          ui.label("Colour:");
          if ui.color_edit_button_rgb(&mut state.logo_color).changed() {
            changes.logo_color = Some(state.logo_color);
          }
        });
      });
  });

  changes
}
