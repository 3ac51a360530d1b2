//! GPU device, swapchain and resource pool.
//!
//! This module is responsible for:
//! - creating the wgpu Adapter/Device/Queue and the window Surface
//! - keeping the MSAA color and depth targets in sync with the surface size
//! - owning images and samplers behind `Copy` handles
//! - acquiring frames and opening render passes with a `PassAction`

mod error;
mod frame;
mod gpu;
mod init;
mod pass;
mod resources;
mod surface;
mod targets;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use pass::{ColorAction, PassAction};
pub use resources::{ImageDesc, ImageId, SamplerDesc, SamplerId};
pub use targets::DEPTH_FORMAT;

pub(crate) use resources::Pool;
