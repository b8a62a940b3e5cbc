use anyhow::{ensure, Result};
use winit::dpi::PhysicalSize;

use crate::core::{AppControl, FrameCtx};
use crate::device::{Gpu, GpuBuffer, SurfaceErrorAction, WgpuFence};
use crate::frame::{FrameCoordinator, FrameSlot};
use crate::math::{self, Mat4};
use crate::scene::{Scene, ViewSource};

use super::pipeline::{create_scene_pipeline, DepthTarget};

/// Renderer settings.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub clear_color: wgpu::Color,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub depth_format: wgpu::TextureFormat,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: wgpu::Color::BLACK,
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 100.0,
            depth_format: wgpu::TextureFormat::Depth32Float,
        }
    }
}

impl RendererConfig {
    /// Perspective projection for a drawable of `size`; `None` while it is zero-sized.
    pub fn projection_for(&self, size: PhysicalSize<u32>) -> Option<Mat4> {
        if size.width == 0 || size.height == 0 {
            return None;
        }
        let aspect = size.width as f32 / size.height as f32;
        Some(math::perspective_fov(self.fov_y_degrees, aspect, self.near, self.far))
    }
}

/// Draws a [`Scene`] once per frame.
///
/// Owns the scene, the pipeline and depth buffer, and the frame ring that paces uniform
/// writes against GPU completion.
pub struct SceneRenderer {
    config: RendererConfig,
    pipeline: wgpu::RenderPipeline,
    depth: DepthTarget,
    scene: Scene<GpuBuffer>,
    frames: FrameCoordinator<WgpuFence>,
}

impl SceneRenderer {
    pub fn new(gpu: &Gpu<'_>, config: RendererConfig) -> Result<Self> {
        ensure!(
            config.fov_y_degrees > 0.0 && config.fov_y_degrees < 180.0,
            "field of view must be within (0, 180) degrees, got {}",
            config.fov_y_degrees
        );
        ensure!(
            config.near > 0.0 && config.far > config.near,
            "depth range must satisfy 0 < near < far, got {}..{}",
            config.near,
            config.far
        );

        let device = gpu.device();
        let pipeline = create_scene_pipeline(device, gpu.surface_format(), config.depth_format);
        let depth = DepthTarget::new(device.raw(), gpu.size(), config.depth_format);
        let frames = FrameCoordinator::from_fn(|_| device.create_fence());

        let mut scene = Scene::new("root");
        if let Some(projection) = config.projection_for(gpu.size()) {
            scene.set_projection(projection)?;
        }

        Ok(Self {
            config,
            pipeline,
            depth,
            scene,
            frames,
        })
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene<GpuBuffer> {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene<GpuBuffer> {
        &mut self.scene
    }

    /// Frames submitted so far.
    pub fn frames_submitted(&self) -> u64 {
        self.frames.frames_submitted()
    }

    /// Rebuilds the projection and depth buffer for a new drawable size.
    ///
    /// The `Gpu` is expected to have reconfigured its surface already.
    pub fn drawable_size_will_change(&mut self, gpu: &Gpu<'_>, size: PhysicalSize<u32>) {
        let Some(projection) = self.config.projection_for(size) else {
            return;
        };
        if let Err(e) = self.scene.set_projection(projection) {
            log::error!("projection for {}x{} not applied: {e}", size.width, size.height);
            return;
        }
        self.depth = DepthTarget::new(gpu.device().raw(), size, self.config.depth_format);
        log::debug!("projection rebuilt for {}x{}", size.width, size.height);
    }

    /// Runs one frame: wait for the slot, update uniforms, record, submit, advance.
    pub fn draw<V>(&mut self, ctx: &mut FrameCtx<'_, '_>, view: &V) -> AppControl
    where
        V: ViewSource + ?Sized,
    {
        let slot = match self.frames.begin_frame() {
            Ok(slot) => slot,
            Err(e) if e.is_fatal() => {
                log::error!("{e}");
                return AppControl::Exit;
            }
            Err(e) => {
                log::warn!("{e}");
                return AppControl::Continue;
            }
        };

        self.scene.update_uniform_buffers(ctx.gpu.device(), &slot, view);

        let mut frame = match ctx.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                if let Err(e) = self.frames.abandon_frame(slot) {
                    log::error!("{e}");
                    return AppControl::Exit;
                }
                return match ctx.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    _ => AppControl::Continue,
                };
            }
        };

        self.encode(&mut frame.encoder, &frame.view, &slot);

        ctx.window.window.pre_present_notify();
        let submission = ctx.gpu.submit(frame);
        if let Err(e) = self.frames.end_frame(slot, submission) {
            log::error!("{e}");
            return AppControl::Exit;
        }

        AppControl::Continue
    }

    fn encode(&self, encoder: &mut wgpu::CommandEncoder, color: &wgpu::TextureView, slot: &FrameSlot) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumen scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.config.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: self.depth.view(),
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        let drawn = self.scene.render(&mut rpass, slot);
        log::trace!("frame {}: {drawn} node(s) drawn from slot {}", slot.frame(), slot.index());
    }
}
