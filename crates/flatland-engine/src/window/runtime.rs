use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx};
use crate::driver::{SkipReason, TickOutcome};
use crate::render::{Renderer, RendererConfig};
use crate::time::FrameClock;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "flatland".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, drives `app` until it exits, the window closes or
    /// the frame driver stops, then returns.
    ///
    /// Initialization failures (window, device, `App::on_start`) are returned.
    pub fn run<A>(config: RuntimeConfig, renderer: RendererConfig, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, renderer, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    renderer: Renderer<'this>,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    renderer_config: RendererConfig,
    app: A,

    entry: Option<WindowEntry>,
    failure: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, renderer_config: RendererConfig, app: A) -> Self {
        Self {
            config,
            renderer_config,
            app,
            entry: None,
            failure: None,
            exit_requested: false,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let renderer_config = self.renderer_config.clone();
        let mut entry = WindowEntryTryBuilder {
            clock: FrameClock::new(),
            window,
            renderer_builder: |w| {
                pollster::block_on(Renderer::initialize(w, renderer_config))
                    .context("renderer initialization failed")
            },
        }
        .try_build()?;

        let app = &mut self.app;
        entry
            .with_renderer_mut(|r| app.on_start(r))
            .context("application start failed")?;

        Ok(entry)
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (app, entry) = (&mut self.app, &mut self.entry);
        let Some(entry) = entry.as_mut() else {
            return;
        };

        let outcome = entry.with_mut(|fields| {
            let time = fields.clock.tick();

            let control = {
                let mut ctx = FrameCtx {
                    window: fields.window,
                    renderer: &mut *fields.renderer,
                    time,
                };
                app.on_frame(&mut ctx)
            };
            if control == AppControl::Exit {
                fields.renderer.stop();
            }

            fields.window.pre_present_notify();
            let outcome = fields.renderer.tick(fields.window.inner_size());

            // Schedules the next tick for the next display refresh.
            match outcome {
                TickOutcome::Stopped | TickOutcome::Skipped(SkipReason::ZeroSize) => {}
                _ => fields.window.request_redraw(),
            }
            outcome
        });

        if let TickOutcome::Presented(stats) = outcome {
            if stats.frame_index % 600 == 0 {
                log::debug!("{stats:?}");
            }
        }

        if outcome.is_stopped() {
            self.exit_requested = true;
            event_loop.exit();
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exit_requested {
            return;
        }

        match self.create_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.entry = Some(entry);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Redraws are requested at the end of each tick.
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(entry) = self.entry.as_ref() else {
            return;
        };
        if entry.with_window(|w| w.id()) != window_id {
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            if let Some(entry) = self.entry.as_mut() {
                entry.with_renderer_mut(|r| r.stop());
            }
            self.exit_requested = true;
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                if let Some(mut entry) = self.entry.take() {
                    entry.with_renderer_mut(|r| r.stop());
                }
                self.exit_requested = true;
                event_loop.exit();
            }

            // The surface itself is resized at the start of the next tick.
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_ref() {
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}
