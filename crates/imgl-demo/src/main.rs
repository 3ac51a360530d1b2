//! imgl demo: a textured quad drawn through the immediate-mode helper.
//!
//! Usage: `imgl-demo [quad|quadrants]`

mod app;
mod config;
mod frame;
mod pipeline;
mod scene;
mod state;
mod texture;

use imgl_engine::device::GpuInit;
use imgl_engine::logging::{init_logging, LoggingConfig};
use imgl_engine::window::{Runtime, RuntimeConfig};

use app::DemoApp;
use config::DemoConfig;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let demo = DemoConfig::from_args(std::env::args().skip(1))?;
    log::info!("starting imgl demo, layout {:?}", demo.layout);

    Runtime::run::<DemoApp>(
        RuntimeConfig {
            title: "imgl (winit + wgpu)".to_string(),
            ..RuntimeConfig::default()
        },
        GpuInit::default(),
        demo,
    )
}
