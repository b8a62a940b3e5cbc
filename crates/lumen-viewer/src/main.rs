use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;

use lumen_engine::core::{App, AppControl, FrameCtx};
use lumen_engine::device::{Gpu, GpuInit};
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::math::{Vec3, X_AXIS, Y_AXIS};
use lumen_engine::render::{RendererConfig, SceneRenderer};
use lumen_engine::scene::{Camera, Node, NodeId};
use lumen_engine::window::{Runtime, RuntimeConfig};

/// Degrees per second.
const SPIN_RATE: f32 = 45.0;
const MOON_SPIN_RATE: f32 = 120.0;

struct Stage {
    renderer: SceneRenderer,
    cube: NodeId,
    moon: NodeId,
}

impl Stage {
    fn build(gpu: &Gpu<'_>) -> Result<Self> {
        let mut renderer = SceneRenderer::new(gpu, RendererConfig::default())
            .context("failed to create scene renderer")?;
        let device = gpu.device();
        let scene = renderer.scene_mut();
        let root = scene.root();

        let cube = scene.insert(Node::cube("cube", device)?)?;
        scene.add_child(root, cube)?;

        // Child of the cube, so it orbits as the cube spins.
        let mut moon = Node::cube("moon", device)?;
        moon.set_position(Vec3::new(2.5, 0.0, 0.0));
        moon.set_scale(Vec3::splat(0.3));
        let moon = scene.insert(moon)?;
        scene.add_child(cube, moon)?;

        log::info!("scene ready with {} nodes", scene.len());
        Ok(Self { renderer, cube, moon })
    }

    fn animate(&mut self, dt: f32) -> Result<()> {
        let scene = self.renderer.scene_mut();
        if let Some(cube) = scene.node_mut(self.cube) {
            cube.rotate_by(SPIN_RATE * dt, Y_AXIS)?;
        }
        if let Some(moon) = scene.node_mut(self.moon) {
            moon.rotate_by(MOON_SPIN_RATE * dt, X_AXIS)?;
        }
        Ok(())
    }
}

struct Viewer {
    camera: Camera,
    stage: Option<Stage>,
}

impl App for Viewer {
    fn drawable_size_will_change(&mut self, gpu: &Gpu<'_>, size: PhysicalSize<u32>) {
        if let Some(stage) = &mut self.stage {
            stage.renderer.drawable_size_will_change(gpu, size);
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.stage.is_none() {
            match Stage::build(ctx.gpu) {
                Ok(stage) => self.stage = Some(stage),
                Err(e) => {
                    log::error!("{e:#}");
                    return AppControl::Exit;
                }
            }
        }
        let Some(stage) = self.stage.as_mut() else {
            return AppControl::Exit;
        };

        if let Err(e) = stage.animate(ctx.time_since_last_draw()) {
            log::error!("animation step failed: {e:#}");
            return AppControl::Exit;
        }

        stage.renderer.draw(ctx, &self.camera)
    }

    fn will_pause(&mut self, paused: bool) {
        log::info!("{}", if paused { "paused" } else { "resumed" });
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let camera = Camera::look_at(Vec3::new(0.0, 2.0, -7.0), Vec3::ZERO, Y_AXIS)
        .context("invalid camera placement")?;

    Runtime::run(
        RuntimeConfig {
            title: "lumen viewer".to_string(),
            ..RuntimeConfig::default()
        },
        GpuInit::default(),
        Viewer { camera, stage: None },
    )
}
