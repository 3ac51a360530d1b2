//! Logging utilities.
//!
//! Installs `env_logger` behind the `log` facade. Everything else in the
//! workspace only talks to `log`.

mod init;

pub use init::{init_logging, LoggingConfig};
