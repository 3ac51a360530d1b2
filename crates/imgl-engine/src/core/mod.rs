//! Contract between the runtime loop and applications.
//!
//! An application is created in `init`, driven through `on_frame` and
//! consumed by `cleanup`. Each callback gets a context exposing the window,
//! the GPU and the immediate-mode helper for that phase.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{CleanupCtx, FrameCtx, InitCtx};
