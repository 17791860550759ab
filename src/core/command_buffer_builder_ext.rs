use std::sync::Arc;

use egui_winit_vulkano::Gui;
use vulkano::{
  ValidationError,
  command_buffer::{
    AutoCommandBufferBuilder,
    RenderPassBeginInfo,
    SubpassBeginInfo,
    SubpassContents,
    SubpassEndInfo,
  },
  descriptor_set::DescriptorSet,
  pipeline::{Pipeline, PipelineBindPoint},
};

use crate::render::{LogoModelBuffers, RenderContext};

pub(crate) trait AutoCommandBufferBuilderExt<L> {
  /// Records the whole frame: the logo in the first subpass, the overlay (if
  /// any) in the second.
  fn build_logo_render_pass(
    &mut self,
    rcx: &RenderContext,
    descriptor_set: &Arc<DescriptorSet>,
    image_index: u32,
    model_buffers: &LogoModelBuffers,
    clear_color: [f32; 4],
    gui: &mut Option<Gui>,
  ) -> Result<(), Box<ValidationError>>;
}

impl<L> AutoCommandBufferBuilderExt<L> for AutoCommandBufferBuilder<L> {
  fn build_logo_render_pass(
    &mut self,
    rcx: &RenderContext,
    descriptor_set: &Arc<DescriptorSet>,
    image_index: u32,
    model_buffers: &LogoModelBuffers,
    clear_color: [f32; 4],
    gui: &mut Option<Gui>,
  ) -> Result<(), Box<ValidationError>> {
    let framebuffer = rcx.framebuffers[image_index as usize].clone();

    self.begin_render_pass(
      RenderPassBeginInfo {
        clear_values: vec![
          Some(clear_color.into()), // msaa_color
          None,                     // final_color (DontCare)
          Some(1.0.into()),         // depth
        ],
        ..RenderPassBeginInfo::framebuffer(framebuffer)
      },
      SubpassBeginInfo {
        contents: SubpassContents::Inline,
        ..Default::default()
      },
    )?;

    self
      .bind_pipeline_graphics(rcx.pipeline.clone())?
      .bind_descriptor_sets(
        PipelineBindPoint::Graphics,
        rcx.pipeline.layout().clone(),
        0,
        descriptor_set.clone(),
      )?
      .bind_vertex_buffers(
        0,
        (
          model_buffers.positions.clone(),
          model_buffers.normals.clone(),
        ),
      )?;

    unsafe { self.draw(model_buffers.vertex_count, 1, 0, 0) }?;

    self.next_subpass(
      SubpassEndInfo::default(),
      SubpassBeginInfo {
        contents: SubpassContents::SecondaryCommandBuffers,
        ..Default::default()
      },
    )?;

    if let Some(gui) = gui {
      let extent = rcx.swapchain.image_extent();
      let overlay = gui.draw_on_subpass_image(extent);
      self.execute_commands(overlay)?;
    }

    self.end_render_pass(SubpassEndInfo::default())?;
    Ok(())
  }
}
