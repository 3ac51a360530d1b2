//! Window + runtime loop.
//!
//! Owns the `winit` event loop and the single application window, and wires
//! them to the GPU layer, the immediate-mode helper and the app lifecycle.

mod icon;
mod runtime;

pub use icon::{default_icon, default_icon_rgba, DEFAULT_ICON_SIZE};
pub use runtime::{Runtime, RuntimeConfig};
