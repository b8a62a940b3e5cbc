//! Recording doubles for the device, encoder and fence contracts.
//!
//! All doubles append to one shared [`Log`] so tests can assert on the interleaving
//! of fence waits, uniform writes and draw calls.

use std::cell::RefCell;
use std::rc::Rc;

use crate::device::{DeviceError, GraphicsDevice, RenderEncoder};
use crate::frame::{FrameError, FrameFence};
use crate::math::Mat4;
use crate::scene::{Uniforms, Vertex};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Wait { slot: usize, retired: Option<u64> },
    Arm { slot: usize, submission: u64 },
    SlotWrite(usize),
    CreateVertexBuffer { label: String, vertices: usize },
    CreateUniformBuffer { label: String, size: u64 },
    WriteUniforms { buffer: String, mvp: Mat4 },
    BindVertex { index: u32, buffer: String },
    BindUniform { index: u32, buffer: String },
    Draw(u32),
}

#[derive(Debug, Clone, Default)]
pub struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    /// Drains everything recorded so far.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    /// Uniform writes as `(buffer label, mvp)`, in order.
    pub fn take_writes(&self) -> Vec<(String, Mat4)> {
        self.take()
            .into_iter()
            .filter_map(|e| match e {
                Event::WriteUniforms { buffer, mvp } => Some((buffer, mvp)),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestBuffer {
    pub label: String,
}

pub struct RecordingDevice {
    log: Log,
    lost: bool,
    max_buffer_size: u64,
}

impl RecordingDevice {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            lost: false,
            max_buffer_size: u64::MAX,
        }
    }

    pub fn lost(mut self) -> Self {
        self.lost = true;
        self
    }

    pub fn with_max_buffer_size(mut self, max: u64) -> Self {
        self.max_buffer_size = max;
        self
    }

    fn allocate(&self, label: &str, size: u64) -> Result<TestBuffer, DeviceError> {
        if self.lost {
            return Err(DeviceError::Lost);
        }
        if size > self.max_buffer_size {
            return Err(DeviceError::AllocationFailed {
                label: label.to_owned(),
                size,
                max: self.max_buffer_size,
            });
        }
        Ok(TestBuffer {
            label: label.to_owned(),
        })
    }
}

impl GraphicsDevice for RecordingDevice {
    type Buffer = TestBuffer;

    fn create_vertex_buffer(&self, label: &str, vertices: &[Vertex]) -> Result<TestBuffer, DeviceError> {
        let buffer = self.allocate(label, std::mem::size_of_val(vertices) as u64)?;
        self.log.push(Event::CreateVertexBuffer {
            label: label.to_owned(),
            vertices: vertices.len(),
        });
        Ok(buffer)
    }

    fn create_uniform_buffer(&self, label: &str, size: u64) -> Result<TestBuffer, DeviceError> {
        let buffer = self.allocate(label, size)?;
        self.log.push(Event::CreateUniformBuffer {
            label: label.to_owned(),
            size,
        });
        Ok(buffer)
    }

    fn write_uniforms(&self, buffer: &TestBuffer, uniforms: &Uniforms) {
        self.log.push(Event::WriteUniforms {
            buffer: buffer.label.clone(),
            mvp: uniforms.modelview_projection(),
        });
    }

    fn is_lost(&self) -> bool {
        self.lost
    }
}

pub struct RecordingEncoder {
    log: Log,
}

impl RecordingEncoder {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl RenderEncoder<TestBuffer> for RecordingEncoder {
    fn set_vertex_buffer(&mut self, index: u32, buffer: &TestBuffer) {
        self.log.push(Event::BindVertex {
            index,
            buffer: buffer.label.clone(),
        });
    }

    fn set_uniform_buffer(&mut self, index: u32, buffer: &TestBuffer) {
        self.log.push(Event::BindUniform {
            index,
            buffer: buffer.label.clone(),
        });
    }

    fn draw(&mut self, vertex_count: u32) {
        self.log.push(Event::Draw(vertex_count));
    }
}

pub struct RecordingFence {
    slot: usize,
    log: Log,
    pending: Option<u64>,
    failure: Option<String>,
}

impl RecordingFence {
    pub fn new(slot: usize, log: Log) -> Self {
        Self {
            slot,
            log,
            pending: None,
            failure: None,
        }
    }

    /// Makes every later `wait` report a lost device.
    pub fn fail_with(&mut self, message: &str) {
        self.failure = Some(message.to_owned());
    }
}

impl FrameFence for RecordingFence {
    type Submission = u64;

    fn wait(&mut self) -> Result<(), FrameError> {
        if let Some(message) = &self.failure {
            return Err(FrameError::DeviceLost(message.clone()));
        }
        self.log.push(Event::Wait {
            slot: self.slot,
            retired: self.pending.take(),
        });
        Ok(())
    }

    fn arm(&mut self, submission: u64) {
        self.log.push(Event::Arm {
            slot: self.slot,
            submission,
        });
        self.pending = Some(submission);
    }
}
