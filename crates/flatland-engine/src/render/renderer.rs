use anyhow::Result;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::coords::{Color, Viewport, World};
use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::driver::{DriverState, FrameDriver, SkipReason, StopHandle, TickOutcome};
use crate::scene::{ObjectKind, ObjectRegistry, RenderObject, ReplaceSummary};

use super::plan::{BindingSlot, DrawSink, FramePlan};
use super::upload::{UploadManager, UploadReport};
use super::{DimensionsUniform, Pipelines, RenderCtx, ShaderSet};

/// Renderer construction parameters.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Design-time coordinate space of every object.
    pub world: World,
    pub gpu: GpuInit,
    pub shaders: ShaderSet,
    /// Applied at the start of every frame, before any draw.
    pub clear_color: Color,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            world: World::default(),
            gpu: GpuInit::default(),
            shaders: ShaderSet::builtin(),
            clear_color: Color::black(),
        }
    }
}

/// Owns every GPU resource and the current scene, and drives frames.
///
/// `'w` is the lifetime of the window the surface was created for.
pub struct Renderer<'w> {
    gpu: Gpu<'w>,
    world: World,
    clear_color: Color,

    pipelines: Pipelines,
    uploads: UploadManager,
    registry: ObjectRegistry,

    driver: FrameDriver,
    last_upload: Option<UploadReport>,
}

impl<'w> Renderer<'w> {
    /// Acquires the device, builds both pipelines and starts the frame driver.
    ///
    /// The scene starts empty; ticks clear the target until
    /// [`replace_objects`](Self::replace_objects) is called.
    pub async fn initialize(window: &'w Window, config: RendererConfig) -> Result<Self> {
        let RendererConfig {
            world,
            gpu,
            shaders,
            clear_color,
        } = config;

        anyhow::ensure!(
            world.is_valid(),
            "world size must be positive and finite, got {}x{}",
            world.width,
            world.height
        );

        let gpu = Gpu::new(window, gpu).await?;

        let (pipelines, uploads) = {
            let ctx = RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format());
            let pipelines = Pipelines::build(&ctx, &shaders);
            let uploads = UploadManager::new(&ctx, world);
            uploads.write_viewport(
                ctx.queue,
                &DimensionsUniform::from(Viewport::from(gpu.size())),
            );
            (pipelines, uploads)
        };

        let mut driver = FrameDriver::new();
        driver.start();

        Ok(Self {
            gpu,
            world,
            clear_color,
            pipelines,
            uploads,
            registry: ObjectRegistry::new(),
            driver,
            last_upload: None,
        })
    }

    /// Replaces the whole scene and re-uploads every buffer to match it.
    ///
    /// Textured objects without a drawable image are excluded.
    pub fn replace_objects<I>(&mut self, objects: I) -> ReplaceSummary
    where
        I: IntoIterator<Item = RenderObject>,
    {
        let summary = self.registry.replace_all(objects);

        let ctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
        );
        let report = self.uploads.rebuild(&ctx, &self.pipelines, &self.registry);
        log::debug!(
            "scene replaced: {} primitives, {} textured, {} excluded; {report:?}",
            summary.primitives,
            summary.textured,
            summary.excluded,
        );

        self.last_upload = Some(report);
        summary
    }

    #[inline]
    pub fn count_of(&self, kind: ObjectKind) -> usize {
        self.registry.count_of(kind)
    }

    #[inline]
    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    #[inline]
    pub fn world(&self) -> World {
        self.world
    }

    #[inline]
    pub fn gpu(&self) -> &Gpu<'w> {
        &self.gpu
    }

    /// What the most recent `replace_objects` did to the GPU buffers.
    #[inline]
    pub fn last_upload(&self) -> Option<UploadReport> {
        self.last_upload
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.driver.stop_handle()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    /// Stops the frame driver. Later ticks return `TickOutcome::Stopped`.
    pub fn stop(&mut self) {
        self.driver.stop();
    }

    /// Draws one frame at the window's current drawable `size`.
    pub fn tick(&mut self, size: PhysicalSize<u32>) -> TickOutcome {
        if self.driver.poll() != DriverState::Running {
            return TickOutcome::Stopped;
        }

        if size.width == 0 || size.height == 0 {
            return TickOutcome::Skipped(SkipReason::ZeroSize);
        }
        if self.gpu.resize(size) {
            log::debug!("surface resized to {}x{}", size.width, size.height);
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                let err_text = err.to_string();
                let action = self.gpu.handle_surface_error(err);
                return match action {
                    SurfaceErrorAction::Reconfigured => {
                        log::warn!("surface {err_text}; reconfigured");
                        TickOutcome::Skipped(SkipReason::SurfaceReconfigured)
                    }
                    SurfaceErrorAction::SkipFrame => {
                        log::warn!("surface {err_text}; frame skipped");
                        TickOutcome::Skipped(SkipReason::SurfaceUnavailable)
                    }
                    SurfaceErrorAction::Fatal => {
                        log::error!("surface {err_text}; stopping");
                        self.driver.stop();
                        TickOutcome::Stopped
                    }
                };
            }
        };

        let plan = FramePlan::build(&self.registry, Viewport::from(self.gpu.size()));
        self.uploads.write_viewport(self.gpu.queue(), &plan.viewport);

        // The pass borrows the encoder; it must end before `submit` takes the frame.
        let draw_calls = {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("flatland frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let mut sink = PassSink {
                pass: &mut rpass,
                pipelines: &self.pipelines,
                uploads: &self.uploads,
            };
            plan.record(&mut sink)
        };

        self.gpu.submit(frame);

        let instances = plan.draws.iter().map(|d| d.instance_count).sum();
        let stats = self.driver.finish_tick(draw_calls, instances);
        log::trace!("{stats:?}");

        TickOutcome::Presented(stats)
    }
}

/// Encodes a [`FramePlan`] into a live render pass.
struct PassSink<'a, 'p> {
    pass: &'a mut wgpu::RenderPass<'p>,
    pipelines: &'a Pipelines,
    uploads: &'a UploadManager,
}

impl DrawSink for PassSink<'_, '_> {
    fn set_pipeline(&mut self, kind: ObjectKind) {
        self.pass.set_pipeline(&self.pipelines.get(kind).pipeline);
    }

    fn bind(&mut self, slot: BindingSlot) -> bool {
        let group = match slot {
            BindingSlot::SharedPrimitive => self.uploads.primitive_bind_group(),
            BindingSlot::Textured(i) => self.uploads.textured_bind_group(i),
        };

        match group {
            Some(group) => {
                self.pass.set_bind_group(0, group, &[]);
                true
            }
            None => false,
        }
    }

    fn draw(&mut self, vertex_count: u32, instance_count: u32) {
        self.pass.draw(0..vertex_count, 0..instance_count);
    }
}
