use std::sync::Arc;

use vulkano::{
  DeviceSize,
  buffer::{Buffer, BufferCreateInfo, BufferUsage, Subbuffer},
  memory::allocator::{AllocationCreateInfo, MemoryTypeFilter, StandardMemoryAllocator},
};

use crate::{error::InitError, geometry::GeometryBuffer};

/// GPU copy of the logo geometry.
///
/// Both views point into one vertex buffer laid out as every position
/// followed by every normal, so the normals start `vertex_count` entries in.
///
/// # Memory Layout
/// * positions: `[x, y, z, x, y, z, ...]` - 3 floats per vertex
/// * normals: `[nx, ny, nz, nx, ny, nz, ...]` - 3 floats per vertex, one
///   normal repeated across each triangle
pub struct LogoModelBuffers {
  pub positions:    Subbuffer<[[f32; 3]]>,
  pub normals:      Subbuffer<[[f32; 3]]>,
  pub vertex_count: u32,
}

/// Uploads `geometry` once into device-preferred memory.
///
/// The buffer is never written again; every frame rebinds the same views.
pub fn upload_logo_geometry(
  memory_allocator: Arc<StandardMemoryAllocator>,
  geometry: &GeometryBuffer,
) -> Result<LogoModelBuffers, InitError> {
  let vertex_count = u32::try_from(geometry.vertex_count())
    .map_err(|_| {
      InitError::Buffer(format!(
        "{} vertices do not fit a draw call",
        geometry.vertex_count()
      ))
    })?;
  if vertex_count == 0 {
    return Err(InitError::Buffer("logo geometry is empty".to_owned()));
  }

  let buffer = Buffer::from_iter(
    memory_allocator,
    BufferCreateInfo {
      usage: BufferUsage::VERTEX_BUFFER,
      ..Default::default()
    },
    AllocationCreateInfo {
      memory_type_filter: MemoryTypeFilter::PREFER_DEVICE | MemoryTypeFilter::HOST_SEQUENTIAL_WRITE,
      ..Default::default()
    },
    geometry.upload_layout(),
  )
  .map_err(InitError::buffer)?;

  let (positions, normals) = buffer.split_at(DeviceSize::from(vertex_count));

  log::info!(
    "uploaded logo geometry: {} vertices ({} bytes)",
    vertex_count,
    positions.size() + normals.size()
  );

  Ok(LogoModelBuffers {
    positions,
    normals,
    vertex_count,
  })
}
