use std::sync::Arc;

use vulkano::{
  VulkanLibrary,
  buffer::{
    BufferUsage,
    allocator::{SubbufferAllocator, SubbufferAllocatorCreateInfo},
  },
  command_buffer::allocator::StandardCommandBufferAllocator,
  descriptor_set::allocator::StandardDescriptorSetAllocator,
  device::{
    Device,
    DeviceCreateInfo,
    DeviceExtensions,
    DeviceFeatures,
    Queue,
    QueueCreateInfo,
    QueueFlags,
    physical::PhysicalDeviceType,
  },
  instance::{Instance, InstanceCreateFlags, InstanceCreateInfo},
  memory::allocator::{MemoryTypeFilter, StandardMemoryAllocator},
  swapchain::Surface,
};
use winit::event_loop::EventLoop;

use crate::{
  error::InitError,
  geometry::GeometryBuffer,
  render::model::{LogoModelBuffers, upload_logo_geometry},
};

pub struct InitializedVulkan {
  pub instance:                 Arc<Instance>,
  pub device:                   Arc<Device>,
  pub queue:                    Arc<Queue>,
  pub memory_allocator:         Arc<StandardMemoryAllocator>,
  pub descriptor_set_allocator: Arc<StandardDescriptorSetAllocator>,
  pub command_buffer_allocator: Arc<StandardCommandBufferAllocator>,
  pub model_buffers:            LogoModelBuffers,
  pub uniform_buffer_allocator: SubbufferAllocator,
  pub max_line_width:           f32,
  pub supports_wide_lines:      bool,
  pub supports_wireframe:       bool,
}

/// Creates the instance and device, then uploads `geometry` once.
///
/// Prefers a discrete GPU, then integrated, virtual and software devices, as
/// long as one queue family can both draw and present to `event_loop`.
pub fn initialize_vulkan(
  event_loop: &EventLoop<()>,
  geometry: &GeometryBuffer,
) -> Result<InitializedVulkan, InitError> {
  let library = VulkanLibrary::new().map_err(|e| InitError::Library(e.to_string()))?;
  let required_extensions = Surface::required_extensions(event_loop).map_err(InitError::surface)?;
  let instance = Instance::new(
    library,
    InstanceCreateInfo {
      flags: InstanceCreateFlags::ENUMERATE_PORTABILITY,
      enabled_extensions: required_extensions,
      ..Default::default()
    },
  )
  .map_err(|e| InitError::Instance(e.to_string()))?;

  let device_extensions = DeviceExtensions {
    khr_swapchain: true,
    ..DeviceExtensions::empty()
  };

  let (physical_device, queue_family_index) = instance
    .enumerate_physical_devices()
    .map_err(|e| InitError::Instance(e.to_string()))?
    .filter(|p| p.supported_extensions().contains(&device_extensions))
    .filter_map(|p| {
      p.queue_family_properties()
        .iter()
        .enumerate()
        .position(|(i, q)| {
          q.queue_flags.intersects(QueueFlags::GRAPHICS)
            && p
              .presentation_support(i as u32, event_loop)
              .unwrap_or(false)
        })
        .map(|i| (p, i as u32))
    })
    .min_by_key(|(p, _)| match p.properties().device_type {
      PhysicalDeviceType::DiscreteGpu => 0,
      PhysicalDeviceType::IntegratedGpu => 1,
      PhysicalDeviceType::VirtualGpu => 2,
      PhysicalDeviceType::Cpu => 3,
      PhysicalDeviceType::Other => 4,
      _ => 5,
    })
    .ok_or(InitError::NoSuitableDevice)?;

  log::info!(
    "using device: {} (type: {:?})",
    physical_device.properties().device_name,
    physical_device.properties().device_type,
  );

  let supported = physical_device.supported_features();
  let supports_wide_lines = supported.wide_lines;
  let supports_wireframe = supported.fill_mode_non_solid;

  let (device, mut queues) = Device::new(
    physical_device.clone(),
    DeviceCreateInfo {
      enabled_extensions: device_extensions,
      enabled_features: DeviceFeatures {
        fill_mode_non_solid: supports_wireframe,
        wide_lines: supports_wide_lines,
        #[cfg(target_os = "macos")]
        image_view_format_swizzle: true,
        ..DeviceFeatures::empty()
      },
      queue_create_infos: vec![QueueCreateInfo {
        queue_family_index,
        ..Default::default()
      }],
      ..Default::default()
    },
  )
  .map_err(InitError::device)?;

  let max_line_width = if supports_wide_lines {
    physical_device.properties().line_width_range[1]
  } else {
    1.0
  };

  log::debug!("wireframe support: {supports_wireframe}");
  log::debug!("wide lines support: {supports_wide_lines}, max line width {max_line_width:.1}");

  let queue = queues
    .next()
    .ok_or_else(|| InitError::Device("device was created without a queue".to_owned()))?;

  let memory_allocator = Arc::new(StandardMemoryAllocator::new_default(device.clone()));
  let descriptor_set_allocator = Arc::new(StandardDescriptorSetAllocator::new(
    device.clone(),
    Default::default(),
  ));
  let command_buffer_allocator = Arc::new(StandardCommandBufferAllocator::new(
    device.clone(),
    Default::default(),
  ));

  let model_buffers = upload_logo_geometry(memory_allocator.clone(), geometry)?;

  let uniform_buffer_allocator = SubbufferAllocator::new(
    memory_allocator.clone(),
    SubbufferAllocatorCreateInfo {
      buffer_usage: BufferUsage::UNIFORM_BUFFER,
      memory_type_filter: MemoryTypeFilter::PREFER_DEVICE | MemoryTypeFilter::HOST_SEQUENTIAL_WRITE,
      ..Default::default()
    },
  );

  Ok(InitializedVulkan {
    instance,
    device,
    queue,
    memory_allocator,
    descriptor_set_allocator,
    command_buffer_allocator,
    model_buffers,
    uniform_buffer_allocator,
    max_line_width,
    supports_wide_lines,
    supports_wireframe,
  })
}
