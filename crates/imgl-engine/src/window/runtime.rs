use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, CleanupCtx, FrameCtx, InitCtx};
use crate::device::{Gpu, GpuInit};
use crate::immediate::{Immediate, ImmediateDesc};
use crate::time::FrameClock;

use super::icon::default_icon;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Initial client size in logical pixels.
    pub width: u32,
    pub height: u32,
    /// Install the built-in window icon.
    pub default_icon: bool,
    pub immediate: ImmediateDesc,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "imgl".to_string(),
            width: 512,
            height: 512,
            default_icon: true,
            immediate: ImmediateDesc::default(),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, runs `A` until the window closes and tears down.
    ///
    /// Errors from window/GPU creation or `A::init` end the loop and are
    /// returned here.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app_config: A::Config) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState::<A>::new(config, gpu_init, app_config);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
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
    gpu: Gpu<'this>,
}

/// Everything that lives between `init` and `cleanup`.
struct Session<A> {
    entry: WindowEntry,
    imm: Immediate,
    app: A,
}

impl<A: App> Session<A> {
    /// Teardown in reverse creation order: app resources, helper, GPU.
    fn shutdown(self) {
        let Session {
            mut entry,
            mut imm,
            app,
        } = self;

        entry.with_gpu_mut(|gpu| {
            app.cleanup(&mut CleanupCtx {
                gpu,
                imm: &mut imm,
            })
        });
        imm.shutdown();
        entry.with_gpu_mut(|gpu| gpu.release_resources());
        drop(entry);

        log::info!("gpu released");
    }
}

struct RuntimeState<A: App> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app_config: Option<A::Config>,

    session: Option<Session<A>>,
    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl<A> RuntimeState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app_config: A::Config) -> Self {
        Self {
            config,
            gpu_init,
            app_config: Some(app_config),
            session: None,
            exit_requested: false,
            fatal: None,
        }
    }

    fn start_session(
        &self,
        event_loop: &ActiveEventLoop,
        app_config: A::Config,
    ) -> Result<Session<A>> {
        let mut attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.width as f64,
                self.config.height as f64,
            ));

        if self.config.default_icon {
            match default_icon() {
                Ok(icon) => attrs = attrs.with_window_icon(Some(icon)),
                Err(e) => log::warn!("{e:#}"),
            }
        }

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let mut entry = WindowEntryTryBuilder {
            clock: FrameClock::new(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init)).context("GPU initialization failed")
            },
        }
        .try_build()?;

        let imm_desc = self.config.immediate;
        let mut imm = entry
            .with_gpu(|gpu| Immediate::new(gpu, imm_desc))
            .context("failed to create immediate-mode helper")?;

        let app = entry
            .with_mut(|fields| {
                let mut ctx = InitCtx {
                    window: fields.window,
                    gpu: fields.gpu,
                    imm: &mut imm,
                };
                A::init(&mut ctx, app_config)
            })
            .context("application init failed")?;

        log::info!("application initialized");
        Ok(Session { entry, imm, app })
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        if let Some(session) = self.session.take() {
            session.shutdown();
        }
        event_loop.exit();
    }
}

impl<A> ApplicationHandler for RuntimeState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }
        let Some(app_config) = self.app_config.take() else {
            return;
        };

        match self.start_session(event_loop, app_config) {
            Ok(session) => {
                session.entry.with_window(|w| w.request_redraw());
                self.session = Some(session);
            }
            Err(e) => {
                log::error!("startup failed: {e:#}");
                self.fatal = Some(e);
                self.request_exit(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: one frame per loop iteration.
        if let Some(session) = &self.session {
            session.entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };

        if session.app.on_window_event(&event) == AppControl::Exit {
            self.request_exit(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                session.entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                session.entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = session.entry.with_window(|w| w.inner_size());
                session.entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                session.entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::RedrawRequested => {
                let Session { entry, imm, app } = session;
                let control = entry.with_mut(|fields| {
                    let time = fields.clock.tick();
                    let mut ctx = FrameCtx {
                        window: fields.window,
                        gpu: fields.gpu,
                        imm,
                        time,
                    };
                    app.on_frame(&mut ctx)
                });

                if control == AppControl::Exit {
                    self.request_exit(event_loop);
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(session) = self.session.take() {
            session.shutdown();
        }
    }
}
