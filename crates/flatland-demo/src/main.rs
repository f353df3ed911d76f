//! Flatland demo: a few solid rectangles and textured quads on an 800×600 World.
//!
//! Usage: `flatland-demo [--no-vsync] [IMAGE...]`
//!
//! Every image path given on the command line becomes one textured quad.
//! Paths that fail to load are logged and left out of the scene.

use std::path::PathBuf;

use anyhow::Result;
use winit::dpi::LogicalSize;

use flatland_engine::assets::{Bitmap, ImageCache};
use flatland_engine::coords::{Color, Rect, World};
use flatland_engine::core::{App, AppControl, FrameCtx};
use flatland_engine::device::GpuInit;
use flatland_engine::logging::{init_logging, LoggingConfig};
use flatland_engine::render::{Renderer, RendererConfig};
use flatland_engine::scene::{ObjectKind, RenderObject, TexturedObject};
use flatland_engine::window::{Runtime, RuntimeConfig};

const WORLD: World = World::new(800.0, 600.0);
const CHECKER: &str = "builtin/checker";

/// Scene rebuilds per second while animating.
const STEPS_PER_SECOND: f32 = 10.0;

struct Demo {
    images: ImageCache,
    paths: Vec<PathBuf>,
    step: u64,
}

impl Demo {
    fn new(paths: Vec<PathBuf>) -> Self {
        let mut images = ImageCache::new();
        images.insert(CHECKER, checkerboard(8, 8));

        // Decode up front so a bad path is reported once, not every rebuild.
        let paths = paths
            .into_iter()
            .filter(|p| match images.get_image(p) {
                Ok(_) => true,
                Err(e) => {
                    log::warn!("skipping image: {e}");
                    false
                }
            })
            .collect();

        Self {
            images,
            paths,
            step: 0,
        }
    }

    /// The whole scene at time `t` (seconds).
    fn scene(&mut self, t: f32) -> Vec<RenderObject> {
        let mut objects = vec![
            RenderObject::primitive(
                "backdrop",
                Rect::new(80.0, 60.0, 500.0, 500.0),
                Color::new(0.8, 0.8, 0.0, 1.0),
            ),
            RenderObject::primitive(
                "bar",
                Rect::new(600.0, 60.0, 120.0, 20.0),
                Color::from_rgba_u8(40, 120, 220, 255),
            ),
        ];

        // A small square sweeping left to right.
        let x = 80.0 + (t * 0.8).sin().abs() * 440.0;
        objects.push(RenderObject::primitive(
            "slider",
            Rect::new(x, 570.0, 60.0, 20.0),
            Color::new(0.9, 0.2, 0.3, 0.85),
        ));

        objects.push(
            TexturedObject::from_cache(
                "checker",
                Rect::new(600.0, 120.0, 160.0, 160.0),
                &mut self.images,
                CHECKER,
            )
            .with_tiling(4.0, 4.0)
            .into(),
        );

        for (i, path) in self.paths.iter().enumerate() {
            let y = 300.0 + i as f32 * 90.0;
            let label = path.display().to_string();
            objects.push(
                TexturedObject::from_cache(label, Rect::new(600.0, y, 160.0, 80.0), &mut self.images, path)
                    .into(),
            );
        }

        objects
    }
}

impl App for Demo {
    fn on_start(&mut self, renderer: &mut Renderer<'_>) -> Result<()> {
        let summary = renderer.replace_objects(self.scene(0.0));
        log::info!(
            "scene: {} primitives, {} textured ({} excluded), {} images cached",
            summary.primitives,
            summary.textured,
            summary.excluded,
            self.images.len(),
        );
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        // Every rebuild re-uploads all textures, so animation is stepped.
        let step = (ctx.time.elapsed * STEPS_PER_SECOND) as u64;
        if step != self.step {
            self.step = step;
            let scene = self.scene(step as f32 / STEPS_PER_SECOND);
            ctx.renderer.replace_objects(scene);
        }

        if ctx.time.frame_index == 0 {
            log::info!(
                "first frame: {} primitives, {} textured",
                ctx.renderer.count_of(ObjectKind::Primitive),
                ctx.renderer.count_of(ObjectKind::Textured),
            );
        }

        AppControl::Continue
    }
}

fn checkerboard(cells: u32, cell_px: u32) -> Bitmap {
    let size = cells * cell_px;
    Bitmap::from_fn(size, size, |x, y| {
        if (x / cell_px + y / cell_px) % 2 == 0 {
            [235, 235, 235, 255]
        } else {
            [30, 30, 30, 255]
        }
    })
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut vsync = true;
    let mut paths = Vec::new();
    for arg in std::env::args_os().skip(1) {
        if arg == "--no-vsync" {
            vsync = false;
        } else {
            paths.push(PathBuf::from(arg));
        }
    }

    let renderer = RendererConfig {
        world: WORLD,
        gpu: GpuInit {
            present_mode: if vsync {
                wgpu::PresentMode::Fifo
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            ..GpuInit::default()
        },
        clear_color: Color::from_rgba_u8(18, 18, 24, 255),
        ..RendererConfig::default()
    };

    let window = RuntimeConfig {
        title: "flatland demo".to_string(),
        initial_size: LogicalSize::new(f64::from(WORLD.width), f64::from(WORLD.height)),
    };

    Runtime::run(window, renderer, Demo::new(paths))
}
