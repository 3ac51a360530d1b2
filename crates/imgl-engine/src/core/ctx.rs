use winit::window::Window;

use crate::device::{Gpu, PassAction, SurfaceErrorAction};
use crate::immediate::Immediate;
use crate::time::FrameTime;

use super::app::AppControl;

/// Context for [`App::init`](super::App::init).
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window borrow carried by `Gpu<'w>`
pub struct InitCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
    pub imm: &'a mut Immediate,
}

/// Context for [`App::cleanup`](super::App::cleanup).
pub struct CleanupCtx<'a, 'w> {
    pub gpu: &'a mut Gpu<'w>,
    pub imm: &'a mut Immediate,
}

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
    pub imm: &'a mut Immediate,
    pub time: FrameTime,
}

impl FrameCtx<'_, '_> {
    /// Seconds since the previous frame.
    pub fn frame_duration(&self) -> f64 {
        self.time.dt
    }

    /// Drawable width in physical pixels.
    pub fn width(&self) -> u32 {
        self.gpu.size().width
    }

    /// Drawable height in physical pixels.
    pub fn height(&self) -> u32 {
        self.gpu.size().height
    }

    /// Runs one render pass with `action`, flushes everything recorded into
    /// the immediate-mode helper, then submits and presents.
    ///
    /// Acquisition failures skip the frame (rewinding the recorder) unless
    /// they are fatal, in which case `Exit` is returned.
    pub fn render(&mut self, action: &PassAction) -> AppControl {
        let size = self.gpu.size();
        if size.width == 0 || size.height == 0 {
            self.imm.rewind();
            return AppControl::Continue;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                self.imm.rewind();
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        log::error!("fatal surface error, exiting");
                        AppControl::Exit
                    }
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        AppControl::Continue
                    }
                };
            }
        };

        // The pass borrows the frame encoder; it must end before submit.
        {
            let mut pass = frame.begin_pass(action);
            self.imm.draw(self.gpu, &mut pass);
        }

        self.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}
