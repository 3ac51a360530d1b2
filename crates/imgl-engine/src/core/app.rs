use anyhow::Result;
use winit::event::WindowEvent;

use super::ctx::{CleanupCtx, FrameCtx, InitCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application lifecycle.
///
/// The runtime calls `init` once the window and GPU exist, `on_frame` once per
/// redraw and `cleanup` exactly once before tearing the GPU down. `cleanup`
/// takes `self` by value, so it can only run on a value `init` produced.
pub trait App: Sized {
    /// Startup parameters handed to `init`.
    type Config;

    fn init(ctx: &mut InitCtx<'_, '_>, config: Self::Config) -> Result<Self>;

    /// Called for every window event before the runtime handles it.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Releases resources created in `init`.
    fn cleanup(self, ctx: &mut CleanupCtx<'_, '_>) {
        let _ = ctx;
    }
}
