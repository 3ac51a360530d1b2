//! Immediate-mode drawing helper.
//!
//! Applications describe geometry with OpenGL 1.x style calls (`begin_quads`,
//! `v3f_t2f`, `rotate`, ...) between frames. The [`Recorder`] turns those calls
//! into a flat vertex array, a list of per-draw uniforms and a command list,
//! merging consecutive draws that share state. [`Immediate::draw`] uploads the
//! arrays and replays the commands into a render pass exactly once per frame,
//! then rewinds.
//!
//! The recorder is CPU-only so scene code can be exercised without a device.

mod cmd;
mod error;
mod matrix;
mod pipeline;
mod recorder;
mod renderer;
mod replay;

pub use cmd::{Command, DrawArgs, PrimitiveType, Rect, TextureBinding, Uniforms, Vertex};
pub use error::ImmediateError;
pub use matrix::{deg, rad, MatrixMode, MAX_STACK_DEPTH};
pub use pipeline::{DepthState, PipelineDesc, PipelineId};
pub use recorder::{Recorder, RecorderDesc, MAX_PIPELINE_STACK_DEPTH};
pub use renderer::{Immediate, ImmediateDesc};
