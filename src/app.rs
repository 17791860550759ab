//! Window handling and the frame loop.
//!
//! The loop is driven by `winit`: while the window is exposed, every
//! `about_to_wait` asks for a redraw, and every `RedrawRequested` draws one
//! frame, presents it and advances the frame counter. There is no
//! self-scheduling; closing the window ends the loop.
//!
//! # Frame sequence
//! 1. Skip the frame if no surface is bound or it has zero size
//! 2. Rebuild the swapchain and pipeline if they went stale
//! 3. Upload this frame's transform and colour
//! 4. Acquire a swapchain image, record and submit the draw
//! 5. Present and advance the frame counter

use std::sync::Arc;

use egui_winit_vulkano::{Gui, GuiConfig};
use vulkano::{
  Validated,
  VulkanError,
  buffer::allocator::SubbufferAllocator,
  command_buffer::{
    AutoCommandBufferBuilder,
    CommandBufferUsage,
    allocator::StandardCommandBufferAllocator,
  },
  descriptor_set::{DescriptorSet, WriteDescriptorSet, allocator::StandardDescriptorSetAllocator},
  device::{Device, Queue},
  format::Format,
  image::ImageUsage,
  instance::Instance,
  memory::allocator::StandardMemoryAllocator,
  pipeline::Pipeline,
  render_pass::Subpass,
  swapchain::{
    PresentMode,
    Surface,
    Swapchain,
    SwapchainCreateInfo,
    SwapchainPresentInfo,
    acquire_next_image,
  },
  sync::{self, GpuFuture},
};
#[cfg(not(target_os = "linux"))]
use winit::dpi::LogicalPosition;
use winit::{
  application::ApplicationHandler,
  dpi::LogicalSize,
  event::WindowEvent,
  event_loop::{ActiveEventLoop, EventLoop},
  window::{Window, WindowId},
};

use crate::{
  animation::{FrameCounter, frame_matrix},
  config::{LogoConfig, RenderConfig},
  core::{command_buffer_builder_ext::AutoCommandBufferBuilderExt, init::initialize_vulkan},
  error::{FrameError, InitError},
  geometry::build_logo,
  gui::{self, GuiState, OverlayStats},
  render::{LogoModelBuffers, RenderContext, WindowSizeSetupConfig, window_size_dependent_setup},
  shaders::{fs, vs},
};

/// Application state: the device, the uploaded logo and, while the window
/// exists, its surface-bound render context.
///
/// # Example Usage
/// ```no_run
/// use horned_logo::{App, LogoConfig};
/// use winit::event_loop::EventLoop;
///
/// let event_loop = EventLoop::new().unwrap();
/// let mut app = App::new(&event_loop, LogoConfig::default()).unwrap();
/// event_loop.run_app(&mut app).unwrap();
/// ```
pub struct App {
  config: LogoConfig,

  // Vulkan resources
  instance:                 Arc<Instance>,
  device:                   Arc<Device>,
  queue:                    Arc<Queue>,
  memory_allocator:         Arc<StandardMemoryAllocator>,
  descriptor_set_allocator: Arc<StandardDescriptorSetAllocator>,
  command_buffer_allocator: Arc<StandardCommandBufferAllocator>,
  uniform_buffer_allocator: SubbufferAllocator,
  model_buffers:            LogoModelBuffers,

  // Surface-bound state and overlay
  rcx:       Option<RenderContext>,
  gui:       Option<Gui>,
  gui_state: GuiState,

  // Animation
  frames:  FrameCounter,
  exposed: bool,

  settings: RenderSettings,
}

/// Draw settings the overlay can change at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RenderSettings {
  pub wireframe_mode:        bool,
  pub line_width:            f32,
  pub logo_color:            [f32; 3],
  /// Set when the pipeline must be rebuilt before the next draw.
  pub needs_pipeline_update: bool,
}

impl RenderSettings {
  /// Starting settings, limited to what the device can rasterize.
  pub fn checked(render: &RenderConfig, supports_wireframe: bool, max_line_width: f32) -> Self {
    Self {
      wireframe_mode:        render.wireframe && supports_wireframe,
      line_width:            render.line_width.min(max_line_width).max(1.0),
      logo_color:            render.logo_color,
      needs_pipeline_update: false,
    }
  }

  /// Folds overlay edits in, flagging a pipeline rebuild when the
  /// rasterization state changed.
  pub fn apply(&mut self, changes: &gui::GuiStateChanges) {
    if let Some(wireframe) = changes.wireframe_mode {
      if wireframe != self.wireframe_mode {
        self.wireframe_mode = wireframe;
        self.needs_pipeline_update = true;
      }
    }
    if let Some(line_width) = changes.line_width {
      if line_width != self.line_width {
        self.line_width = line_width;
        self.needs_pipeline_update = true;
      }
    }
    if let Some(color) = changes.logo_color {
      self.logo_color = color;
    }
  }
}

impl App {
  /// Generates the logo geometry and uploads it to a freshly created device.
  ///
  /// The window itself is created later, on the first `resumed` event.
  pub fn new(event_loop: &EventLoop<()>, config: LogoConfig) -> Result<Self, InitError> {
    let geometry = build_logo(&config.geometry);
    log::info!(
      "logo geometry: {} vertices, {} triangles",
      geometry.vertex_count(),
      geometry.triangle_count()
    );

    let initialized = initialize_vulkan(event_loop, &geometry)?;
    let render = &config.render;
    let settings = RenderSettings::checked(
      render,
      initialized.supports_wireframe,
      initialized.max_line_width,
    );

    Ok(App {
      instance: initialized.instance,
      device: initialized.device,
      queue: initialized.queue,
      memory_allocator: initialized.memory_allocator,
      descriptor_set_allocator: initialized.descriptor_set_allocator,
      command_buffer_allocator: initialized.command_buffer_allocator,
      uniform_buffer_allocator: initialized.uniform_buffer_allocator,
      model_buffers: initialized.model_buffers,
      rcx: None,
      gui: None,
      gui_state: GuiState {
        wireframe_mode: settings.wireframe_mode,
        line_width: settings.line_width,
        max_line_width: initialized.max_line_width,
        supports_wide_lines: initialized.supports_wide_lines,
        supports_wireframe: initialized.supports_wireframe,
        logo_color: settings.logo_color,
        ..GuiState::default()
      },
      frames: FrameCounter::new(),
      exposed: true,
      settings,
      config,
    })
  }

  /// Number of frames presented so far.
  pub fn frame(&self) -> u64 {
    self.frames.frame()
  }

  /// Creates the window and everything bound to its surface.
  fn create_render_context(&mut self, event_loop: &ActiveEventLoop) -> Result<(), InitError> {
    let render = &self.config.render;
    let window_attrs = {
      let [width, height] = render.window_size;
      let base_attrs = Window::default_attributes()
        .with_decorations(true)
        .with_title(render.window_title.clone())
        .with_inner_size(LogicalSize::new(width, height));

      #[cfg(not(target_os = "linux"))]
      {
        base_attrs.with_position(LogicalPosition::new(10, 10))
      }

      #[cfg(target_os = "linux")]
      base_attrs
    };

    let window = Arc::new(
      event_loop
        .create_window(window_attrs)
        .map_err(|e| InitError::Window(e.to_string()))?,
    );

    let surface = Surface::from_window(self.instance.clone(), window.clone()).map_err(InitError::surface)?;
    let window_size = window.inner_size();

    let (swapchain, images) = {
      let physical_device = self.device.physical_device();
      let surface_capabilities = physical_device
        .surface_capabilities(&surface, Default::default())
        .map_err(InitError::surface)?;

      let formats = physical_device
        .surface_formats(&surface, Default::default())
        .map_err(InitError::surface)?;
      let (image_format, _) = formats
        .iter()
        .copied()
        .find(|(format, _)| {
          matches!(
            format,
            Format::B8G8R8A8_UNORM | Format::R8G8B8A8_UNORM | Format::A8B8G8R8_UNORM_PACK32
          )
        })
        .or_else(|| formats.first().copied())
        .ok_or_else(|| InitError::Surface("surface reports no formats".to_owned()))?;

      let composite_alpha = surface_capabilities
        .supported_composite_alpha
        .into_iter()
        .next()
        .ok_or_else(|| InitError::Surface("surface supports no composite alpha mode".to_owned()))?;

      log::info!("selected format: {image_format:?}, present mode: FIFO (vsync)");

      Swapchain::new(self.device.clone(), surface.clone(), SwapchainCreateInfo {
        min_image_count: surface_capabilities.min_image_count.max(2),
        image_format,
        image_extent: window_size.into(),
        image_usage: ImageUsage::COLOR_ATTACHMENT,
        composite_alpha,
        pre_transform: surface_capabilities.current_transform,
        clipped: true,
        present_mode: PresentMode::Fifo,
        ..Default::default()
      })
      .map_err(InitError::swapchain)?
    };

    let render_pass = vulkano::ordered_passes_renderpass!(
      self.device.clone(),
      attachments: {
        msaa_color: {
          format: swapchain.image_format(),
          samples: 4,
          load_op: Clear,
          store_op: DontCare,
        },
        final_color: {
          format: swapchain.image_format(),
          samples: 1,
          load_op: DontCare,
          store_op: Store,
        },
        depth: {
          format: Format::D32_SFLOAT,
          samples: 4,
          load_op: Clear,
          store_op: DontCare,
        }
      },
      passes: [
        {
          color: [msaa_color],
          color_resolve: [final_color],
          depth_stencil: {depth},
          input: []
        },
        {
          color: [final_color],
          depth_stencil: {},
          input: []
        }
      ]
    )
    .map_err(InitError::pipeline)?;

    let vs = vs::load(self.device.clone())
      .map_err(InitError::shader)?
      .entry_point("main")
      .ok_or_else(|| InitError::Shader("vertex shader has no main".to_owned()))?;
    let fs = fs::load(self.device.clone())
      .map_err(InitError::shader)?
      .entry_point("main")
      .ok_or_else(|| InitError::Shader("fragment shader has no main".to_owned()))?;

    let (framebuffers, pipeline) = window_size_dependent_setup(WindowSizeSetupConfig {
      window_size,
      images: &images,
      render_pass: &render_pass,
      memory_allocator: &self.memory_allocator,
      vertex_shader: &vs,
      fragment_shader: &fs,
      wireframe_mode: self.settings.wireframe_mode,
      line_width: self.settings.line_width,
    })?;

    if self.config.render.show_overlay {
      let overlay_subpass = Subpass::from(render_pass.clone(), 1)
        .ok_or_else(|| InitError::Pipeline("render pass has no overlay subpass".to_owned()))?;
      self.gui = Some(Gui::new_with_subpass(
        event_loop,
        surface.clone(),
        self.queue.clone(),
        overlay_subpass,
        swapchain.image_format(),
        GuiConfig::default(),
      ));
    }

    self.rcx = Some(RenderContext {
      window,
      swapchain,
      render_pass,
      framebuffers,
      vs,
      fs,
      pipeline,
      recreate_swapchain: false,
      previous_frame_end: Some(sync::now(self.device.clone()).boxed()),
    });

    Ok(())
  }

  /// Applies settings changed through the overlay.
  fn apply_gui_changes(&mut self, changes: &gui::GuiStateChanges) {
    self.settings.apply(changes);
    if let Some(paused) = changes.paused {
      self.frames.set_paused(paused);
    }
  }

  /// Draws and presents one frame. A no-op while no surface is bound.
  fn draw_frame(&mut self) -> Result<(), FrameError> {
    if !self.exposed {
      return Ok(());
    }
    let Some(window_size) = self.rcx.as_ref().map(|rcx| rcx.window.inner_size()) else {
      return Ok(());
    };
    if window_size.width == 0 || window_size.height == 0 {
      return Ok(());
    }

    // Overlay edits take effect before anything below can drop the frame.
    if let Some(gui) = &mut self.gui {
      let stats = OverlayStats {
        frame: self.frames.frame(),
        rotation: self
          .frames
          .rotation_degrees(self.config.render.degrees_per_frame),
        vertex_count: self.model_buffers.vertex_count,
        triangle_count: self.model_buffers.vertex_count / 3,
      };
      let changes = gui::draw_gui(gui, &mut self.gui_state, stats);
      self.apply_gui_changes(&changes);
    }

    let Some(rcx) = self.rcx.as_mut() else {
      return Ok(());
    };

    if let Some(previous_frame_end) = rcx.previous_frame_end.as_mut() {
      previous_frame_end.cleanup_finished();
    }

    if rcx.recreate_swapchain || self.settings.needs_pipeline_update {
      let (new_swapchain, new_images) = match rcx.swapchain.recreate(SwapchainCreateInfo {
        image_extent: window_size.into(),
        ..rcx.swapchain.create_info()
      }) {
        Ok(r) => r,
        Err(e) => {
          log::warn!("failed to recreate swapchain: {e}");
          return Ok(());
        }
      };

      rcx.swapchain = new_swapchain;
      match window_size_dependent_setup(WindowSizeSetupConfig {
        window_size,
        images: &new_images,
        render_pass: &rcx.render_pass,
        memory_allocator: &self.memory_allocator,
        vertex_shader: &rcx.vs,
        fragment_shader: &rcx.fs,
        wireframe_mode: self.settings.wireframe_mode,
        line_width: self.settings.line_width,
      }) {
        Ok((framebuffers, pipeline)) => {
          rcx.framebuffers = framebuffers;
          rcx.pipeline = pipeline;
        }
        Err(e) => {
          log::warn!("failed to rebuild pipeline: {e}");
          rcx.recreate_swapchain = true;
          return Ok(());
        }
      }

      log::debug!("swapchain rebuilt at {}x{}", window_size.width, window_size.height);
      rcx.recreate_swapchain = false;
      self.settings.needs_pipeline_update = false;
    }

    let rotation = self
      .frames
      .rotation_degrees(self.config.render.degrees_per_frame);

    let [width, height] = rcx.swapchain.image_extent();
    let matrix = frame_matrix(rotation, width as f32 / height as f32);

    let transform = self
      .uniform_buffer_allocator
      .allocate_sized::<vs::Data>()
      .map_err(|e| FrameError::Uniform(e.to_string()))?;
    *transform
      .write()
      .map_err(|e| FrameError::Uniform(e.to_string()))? = vs::Data {
      matrix: matrix.to_cols_array_2d(),
    };

    let [r, g, b] = self.settings.logo_color;
    let material = self
      .uniform_buffer_allocator
      .allocate_sized::<fs::Material>()
      .map_err(|e| FrameError::Uniform(e.to_string()))?;
    *material
      .write()
      .map_err(|e| FrameError::Uniform(e.to_string()))? = fs::Material {
      sourceColor: [r, g, b, 1.0],
    };

    let layout = rcx
      .pipeline
      .layout()
      .set_layouts()
      .first()
      .ok_or_else(|| FrameError::Descriptor("pipeline has no descriptor set layout".to_owned()))?;
    let descriptor_set = DescriptorSet::new(
      self.descriptor_set_allocator.clone(),
      layout.clone(),
      [
        WriteDescriptorSet::buffer(0, transform),
        WriteDescriptorSet::buffer(1, material),
      ],
      [],
    )
    .map_err(|e| FrameError::Descriptor(e.to_string()))?;

    let (image_index, suboptimal, acquire_future) =
      match acquire_next_image(rcx.swapchain.clone(), None).map_err(Validated::unwrap) {
        Ok(r) => r,
        Err(VulkanError::OutOfDate) => {
          rcx.recreate_swapchain = true;
          return Ok(());
        }
        Err(e) => return Err(FrameError::Acquire(e.to_string())),
      };

    if suboptimal {
      rcx.recreate_swapchain = true;
    }

    let mut builder = AutoCommandBufferBuilder::primary(
      self.command_buffer_allocator.clone(),
      self.queue.queue_family_index(),
      CommandBufferUsage::OneTimeSubmit,
    )
    .map_err(|e| FrameError::Record(e.to_string()))?;

    builder
      .build_logo_render_pass(
        rcx,
        &descriptor_set,
        image_index,
        &self.model_buffers,
        self.config.render.background,
        &mut self.gui,
      )
      .map_err(|e| FrameError::Record(e.to_string()))?;

    let command_buffer = builder
      .build()
      .map_err(|e| FrameError::Record(e.to_string()))?;

    let previous_frame_end = rcx
      .previous_frame_end
      .take()
      .unwrap_or_else(|| sync::now(self.device.clone()).boxed());

    let future = previous_frame_end
      .join(acquire_future)
      .then_execute(self.queue.clone(), command_buffer)
      .map_err(|e| FrameError::Submit(e.to_string()))?
      .then_swapchain_present(
        self.queue.clone(),
        SwapchainPresentInfo::swapchain_image_index(rcx.swapchain.clone(), image_index),
      )
      .then_signal_fence_and_flush();

    match future.map_err(Validated::unwrap) {
      Ok(future) => {
        rcx.previous_frame_end = Some(future.boxed());
      }
      Err(VulkanError::OutOfDate) => {
        rcx.recreate_swapchain = true;
        rcx.previous_frame_end = Some(sync::now(self.device.clone()).boxed());
      }
      Err(e) => {
        rcx.previous_frame_end = Some(sync::now(self.device.clone()).boxed());
        return Err(FrameError::Submit(e.to_string()));
      }
    }

    self.frames.advance();

    Ok(())
  }
}

impl ApplicationHandler for App {
  /// Binds the surface the first time the application is resumed.
  fn resumed(&mut self, event_loop: &ActiveEventLoop) {
    if self.rcx.is_some() {
      return;
    }

    if let Err(e) = self.create_render_context(event_loop) {
      log::error!("failed to set up rendering: {e}");
      event_loop.exit();
    }
  }

  fn window_event(
    &mut self,
    event_loop: &ActiveEventLoop,
    _window_id: WindowId,
    event: WindowEvent,
  ) {
    if let Some(gui) = &mut self.gui {
      gui.update(&event);
    }

    match event {
      WindowEvent::CloseRequested => {
        log::info!("closing after {} frames", self.frames.frame());
        event_loop.exit();
      }
      WindowEvent::Resized(_) => {
        if let Some(rcx) = self.rcx.as_mut() {
          rcx.recreate_swapchain = true;
        }
      }
      WindowEvent::Occluded(occluded) => {
        self.exposed = !occluded;
        log::debug!("window {}", if occluded { "occluded" } else { "exposed" });
        if let (true, Some(rcx)) = (self.exposed, self.rcx.as_ref()) {
          rcx.window.request_redraw();
        }
      }
      WindowEvent::RedrawRequested => {
        if let Err(e) = self.draw_frame() {
          log::warn!("dropped frame {}: {e}", self.frames.frame());
        }
      }
      _ => {}
    }
  }

  /// Requests the next frame while the window is visible.
  fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
    if !self.exposed {
      return;
    }
    if let Some(rcx) = self.rcx.as_ref() {
      rcx.window.request_redraw();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::gui::GuiStateChanges;

  #[test]
  fn starting_settings_respect_device_limits() {
    let render = RenderConfig {
      wireframe: true,
      line_width: 8.0,
      ..RenderConfig::default()
    };

    let limited = RenderSettings::checked(&render, false, 4.0);
    assert!(!limited.wireframe_mode);
    assert_eq!(limited.line_width, 4.0);
    assert!(!limited.needs_pipeline_update);

    let capable = RenderSettings::checked(&render, true, 10.0);
    assert!(capable.wireframe_mode);
    assert_eq!(capable.line_width, 8.0);
  }

  #[test]
  fn overlay_edits_flag_a_rebuild_at_once() {
    let mut settings = RenderSettings::checked(&RenderConfig::default(), true, 4.0);

    settings.apply(&GuiStateChanges {
      wireframe_mode: Some(true),
      ..GuiStateChanges::default()
    });
    assert!(settings.wireframe_mode);
    assert!(settings.needs_pipeline_update);

    // Colour edits go through the uniform buffer, not the pipeline.
    let mut settings = RenderSettings::checked(&RenderConfig::default(), true, 4.0);
    settings.apply(&GuiStateChanges {
      logo_color: Some([0.0, 1.0, 0.0]),
      ..GuiStateChanges::default()
    });
    assert_eq!(settings.logo_color, [0.0, 1.0, 0.0]);
    assert!(!settings.needs_pipeline_update);
  }

  #[test]
  fn unchanged_values_do_not_rebuild() {
    let mut settings = RenderSettings::checked(&RenderConfig::default(), true, 4.0);
    settings.apply(&GuiStateChanges {
      wireframe_mode: Some(false),
      line_width: Some(1.0),
      ..GuiStateChanges::default()
    });
    assert!(!settings.needs_pipeline_update);
  }
}
