//! imgl engine crate.
//!
//! Owns the platform and GPU runtime pieces plus the immediate-mode drawing
//! helper that applications record into once per frame.

pub mod core;
pub mod device;
pub mod immediate;
pub mod logging;
pub mod paint;
pub mod time;
pub mod window;
