use anyhow::Result;
use imgl_engine::core::{App, AppControl, CleanupCtx, FrameCtx, InitCtx};

use crate::config::DemoConfig;
use crate::frame::{record_frame, Layout};
use crate::scene::SceneDrawer;
use crate::state::AppState;

pub struct DemoApp {
    state: AppState,
    drawer: SceneDrawer,
    layout: Layout,
}

impl App for DemoApp {
    type Config = DemoConfig;

    fn init(ctx: &mut InitCtx<'_, '_>, config: DemoConfig) -> Result<Self> {
        let adapter = ctx.gpu.adapter_info();
        log::info!("adapter: {} ({:?})", adapter.name, adapter.backend);

        let state = AppState::create(ctx.gpu, ctx.imm)?;
        log::info!(
            "demo resources ready: image {}, sampler {}, pipeline {}",
            state.img.raw(),
            state.smp.raw(),
            state.pip_3d.raw()
        );
        Ok(Self {
            state,
            drawer: SceneDrawer::new(),
            layout: config.layout,
        })
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let (width, height) = (ctx.width(), ctx.height());
        let duration = ctx.frame_duration();

        record_frame(
            &mut *ctx.imm,
            &mut self.drawer,
            &self.state,
            self.layout,
            width,
            height,
            duration,
        );

        ctx.render(&self.state.pass_action)
    }

    fn cleanup(self, ctx: &mut CleanupCtx<'_, '_>) {
        self.state.release(ctx.gpu, ctx.imm);
    }
}
