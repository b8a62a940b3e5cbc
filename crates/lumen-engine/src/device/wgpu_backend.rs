//! wgpu implementations of the scene-facing device contracts.

use std::num::NonZeroU64;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use wgpu::util::DeviceExt;

use crate::frame::{FrameError, FrameFence};
use crate::scene::{Uniforms, Vertex};

use super::{DeviceError, GraphicsDevice, RenderEncoder};

const UNIFORMS_BINDING_SIZE: NonZeroU64 = match NonZeroU64::new(Uniforms::SIZE) {
    Some(size) => size,
    None => panic!("Uniforms must not be zero-sized"),
};

/// A wgpu buffer as handed out to scene nodes.
///
/// Uniform buffers carry the bind group that exposes them to the vertex shader.
pub struct GpuBuffer {
    raw: wgpu::Buffer,
    bind_group: Option<wgpu::BindGroup>,
}

impl GpuBuffer {
    pub fn raw(&self) -> &wgpu::Buffer {
        &self.raw
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }
}

/// Logical device + queue, plus the bind group layout every node uniform buffer uses.
pub struct WgpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
    uniform_layout: wgpu::BindGroupLayout,
    lost: Arc<AtomicBool>,
}

impl WgpuDevice {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen node uniforms bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(UNIFORMS_BINDING_SIZE),
                },
                count: None,
            }],
        });

        let lost = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&lost);
        device.set_device_lost_callback(move |reason, message| {
            log::error!("graphics device lost ({reason:?}): {message}");
            flag.store(true, Ordering::Release);
        });

        Self {
            device,
            queue,
            uniform_layout,
            lost,
        }
    }

    pub fn raw(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Layout of bind group `UNIFORM_BUFFER_INDEX`, shared with the render pipeline.
    pub fn uniform_layout(&self) -> &wgpu::BindGroupLayout {
        &self.uniform_layout
    }

    /// Creates a completion fence for one in-flight frame slot.
    pub fn create_fence(&self) -> WgpuFence {
        WgpuFence {
            device: self.device.clone(),
            pending: None,
        }
    }

    fn check_allocation(&self, label: &str, size: u64) -> Result<(), DeviceError> {
        if self.is_lost() {
            return Err(DeviceError::Lost);
        }
        let max = self.device.limits().max_buffer_size;
        if size == 0 || size > max {
            return Err(DeviceError::AllocationFailed {
                label: label.to_owned(),
                size,
                max,
            });
        }
        Ok(())
    }
}

impl GraphicsDevice for WgpuDevice {
    type Buffer = GpuBuffer;

    fn create_vertex_buffer(&self, label: &str, vertices: &[Vertex]) -> Result<GpuBuffer, DeviceError> {
        let contents: &[u8] = bytemuck::cast_slice(vertices);
        self.check_allocation(label, contents.len() as u64)?;

        let raw = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::VERTEX,
            });

        Ok(GpuBuffer {
            raw,
            bind_group: None,
        })
    }

    fn create_uniform_buffer(&self, label: &str, size: u64) -> Result<GpuBuffer, DeviceError> {
        self.check_allocation(label, size)?;

        let raw = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: raw.as_entire_binding(),
            }],
        });

        Ok(GpuBuffer {
            raw,
            bind_group: Some(bind_group),
        })
    }

    fn write_uniforms(&self, buffer: &GpuBuffer, uniforms: &Uniforms) {
        self.queue
            .write_buffer(&buffer.raw, 0, bytemuck::bytes_of(uniforms));
    }

    fn is_lost(&self) -> bool {
        self.lost.load(Ordering::Acquire)
    }
}

impl RenderEncoder<GpuBuffer> for wgpu::RenderPass<'_> {
    fn set_vertex_buffer(&mut self, index: u32, buffer: &GpuBuffer) {
        wgpu::RenderPass::set_vertex_buffer(self, index, buffer.raw.slice(..));
    }

    fn set_uniform_buffer(&mut self, index: u32, buffer: &GpuBuffer) {
        match buffer.bind_group.as_ref() {
            Some(bind_group) => self.set_bind_group(index, bind_group, &[]),
            None => log::warn!("buffer bound as uniforms has no bind group; draw will be skipped by validation"),
        }
    }

    fn draw(&mut self, vertex_count: u32) {
        wgpu::RenderPass::draw(self, 0..vertex_count, 0..1);
    }
}

/// Completion fence for one frame slot, backed by a queue submission index.
pub struct WgpuFence {
    device: wgpu::Device,
    pending: Option<wgpu::SubmissionIndex>,
}

impl FrameFence for WgpuFence {
    type Submission = wgpu::SubmissionIndex;

    fn wait(&mut self) -> Result<(), FrameError> {
        let Some(index) = self.pending.take() else {
            return Ok(());
        };

        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: Some(index),
                timeout: None,
            })
            .map(|_| ())
            .map_err(|e| FrameError::DeviceLost(e.to_string()))
    }

    fn arm(&mut self, submission: wgpu::SubmissionIndex) {
        self.pending = Some(submission);
    }
}
