//! Swapchain-dependent rendering resources.
//!
//! The graphics pipeline is configured with:
//! * Vertex input: `vertex` and `normal`, each from its own binding
//! * Depth testing: enabled, clearing to 1.0
//! * Culling: none, both windings of every triangle are drawn
//! * Multisampling: 4x, resolved into the swapchain image
//!
//! Framebuffers and the pipeline are rebuilt whenever the window is resized
//! or the polygon mode changes.

use std::sync::Arc;

use vulkano::{
  device::DeviceOwned,
  format::Format,
  image::{Image, ImageCreateInfo, ImageType, ImageUsage, SampleCount, view::ImageView},
  memory::allocator::{AllocationCreateInfo, StandardMemoryAllocator},
  pipeline::{
    GraphicsPipeline,
    PipelineLayout,
    PipelineShaderStageCreateInfo,
    graphics::{
      GraphicsPipelineCreateInfo,
      color_blend::{ColorBlendAttachmentState, ColorBlendState},
      depth_stencil::{DepthState, DepthStencilState},
      input_assembly::InputAssemblyState,
      multisample::MultisampleState,
      rasterization::{CullMode, PolygonMode, RasterizationState},
      vertex_input::{Vertex, VertexDefinition},
      viewport::{Viewport, ViewportState},
    },
    layout::PipelineDescriptorSetLayoutCreateInfo,
  },
  render_pass::{Framebuffer, FramebufferCreateInfo, RenderPass, Subpass},
  shader::EntryPoint,
  swapchain::Swapchain,
  sync::GpuFuture,
};
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
  error::InitError,
  vertex::{Normal, Position},
};

/// Everything tied to the presentation surface.
///
/// While a `RenderContext` exists the surface is bound and frames can be
/// drawn; dropping it unbinds the surface.
pub struct RenderContext {
  /// The window being rendered to
  pub window:             Arc<Window>,
  /// Vulkan swapchain for presenting rendered images
  pub swapchain:          Arc<Swapchain>,
  /// Scene subpass followed by the overlay subpass
  pub render_pass:        Arc<RenderPass>,
  /// Framebuffers for each swapchain image
  pub framebuffers:       Vec<Arc<Framebuffer>>,
  pub vs:                 EntryPoint,
  pub fs:                 EntryPoint,
  pub pipeline:           Arc<GraphicsPipeline>,
  /// Set when the swapchain no longer matches the surface
  pub recreate_swapchain: bool,
  pub previous_frame_end: Option<Box<dyn GpuFuture>>,
}

/// Resources needed to rebuild size-dependent state.
#[derive(Clone)]
pub struct WindowSizeSetupConfig<'a> {
  pub window_size:      PhysicalSize<u32>,
  pub images:           &'a [Arc<Image>],
  pub render_pass:      &'a Arc<RenderPass>,
  pub memory_allocator: &'a Arc<StandardMemoryAllocator>,
  pub vertex_shader:    &'a EntryPoint,
  pub fragment_shader:  &'a EntryPoint,
  pub wireframe_mode:   bool,
  pub line_width:       f32,
}

/// Creates framebuffers for every swapchain image and a pipeline whose
/// viewport covers the whole window.
///
/// Called once when the surface is bound, then again whenever the window is
/// resized or the polygon mode changes.
pub fn window_size_dependent_setup(
  config: WindowSizeSetupConfig,
) -> Result<(Vec<Arc<Framebuffer>>, Arc<GraphicsPipeline>), InitError> {
  let device = config.memory_allocator.device();
  let first_image = config
    .images
    .first()
    .ok_or_else(|| InitError::Swapchain("swapchain has no images".to_owned()))?;

  let depth_buffer = ImageView::new_default(
    Image::new(
      config.memory_allocator.clone(),
      ImageCreateInfo {
        image_type: ImageType::Dim2d,
        format: Format::D32_SFLOAT,
        extent: first_image.extent(),
        usage: ImageUsage::DEPTH_STENCIL_ATTACHMENT | ImageUsage::TRANSIENT_ATTACHMENT,
        samples: SampleCount::Sample4,
        ..Default::default()
      },
      AllocationCreateInfo::default(),
    )
    .map_err(InitError::pipeline)?,
  )
  .map_err(InitError::pipeline)?;

  let framebuffers = config
    .images
    .iter()
    .map(|image| {
      let view = ImageView::new_default(image.clone()).map_err(InitError::pipeline)?;

      // Rendered into at 4x and resolved into `view` at the end of the subpass.
      let msaa_color = ImageView::new_default(
        Image::new(
          config.memory_allocator.clone(),
          ImageCreateInfo {
            image_type: ImageType::Dim2d,
            format: image.format(),
            extent: image.extent(),
            usage: ImageUsage::COLOR_ATTACHMENT | ImageUsage::TRANSIENT_ATTACHMENT,
            samples: SampleCount::Sample4,
            ..Default::default()
          },
          AllocationCreateInfo::default(),
        )
        .map_err(InitError::pipeline)?,
      )
      .map_err(InitError::pipeline)?;

      Framebuffer::new(
        config.render_pass.clone(),
        FramebufferCreateInfo {
          attachments: vec![msaa_color, view, depth_buffer.clone()],
          ..Default::default()
        },
      )
      .map_err(InitError::pipeline)
    })
    .collect::<Result<Vec<_>, _>>()?;

  let features = device.enabled_features();
  let polygon_mode = if config.wireframe_mode && features.fill_mode_non_solid {
    PolygonMode::Line
  } else {
    PolygonMode::Fill
  };
  let line_width = if features.wide_lines {
    config.line_width
  } else {
    1.0
  };

  let pipeline = {
    let vertex_input_state = [Position::per_vertex(), Normal::per_vertex()]
      .definition(config.vertex_shader)
      .map_err(InitError::pipeline)?;

    let stages = [
      PipelineShaderStageCreateInfo::new(config.vertex_shader.clone()),
      PipelineShaderStageCreateInfo::new(config.fragment_shader.clone()),
    ];

    let layout = PipelineLayout::new(
      device.clone(),
      PipelineDescriptorSetLayoutCreateInfo::from_stages(&stages)
        .into_pipeline_layout_create_info(device.clone())
        .map_err(InitError::pipeline)?,
    )
    .map_err(InitError::pipeline)?;

    let subpass = Subpass::from(config.render_pass.clone(), 0)
      .ok_or_else(|| InitError::Pipeline("render pass has no scene subpass".to_owned()))?;

    GraphicsPipeline::new(
      device.clone(),
      None,
      GraphicsPipelineCreateInfo {
        stages: stages.into_iter().collect(),
        vertex_input_state: Some(vertex_input_state),
        input_assembly_state: Some(InputAssemblyState::default()),
        viewport_state: Some(ViewportState {
          viewports: [Viewport {
            offset:      [0.0, 0.0],
            extent:      config.window_size.into(),
            depth_range: 0.0..=1.0,
          }]
          .into_iter()
          .collect(),
          ..Default::default()
        }),
        rasterization_state: Some(RasterizationState {
          cull_mode: CullMode::None,
          polygon_mode,
          line_width,
          ..Default::default()
        }),
        depth_stencil_state: Some(DepthStencilState {
          depth: Some(DepthState::simple()),
          ..Default::default()
        }),
        multisample_state: Some(MultisampleState {
          rasterization_samples: SampleCount::Sample4,
          ..Default::default()
        }),
        color_blend_state: Some(ColorBlendState::with_attachment_states(
          subpass.num_color_attachments(),
          ColorBlendAttachmentState::default(),
        )),
        subpass: Some(subpass.into()),
        ..GraphicsPipelineCreateInfo::layout(layout)
      },
    )
    .map_err(InitError::pipeline)?
  };

  Ok((framebuffers, pipeline))
}
