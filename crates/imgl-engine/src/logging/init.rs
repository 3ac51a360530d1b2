use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` directive syntax, e.g. `"debug"` or
/// `"imgl_engine=trace,wgpu_core=warn"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Config with an explicit filter, ignoring `RUST_LOG`.
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }
}

/// GPU stack targets that are too chatty at `info`.
const QUIET_TARGETS: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

#[derive(Debug, PartialEq, Eq)]
enum FilterSource {
    Explicit(String),
    Env(String),
    Fallback,
}

fn resolve_filter(explicit: Option<String>, env: Option<String>) -> FilterSource {
    match (explicit, env) {
        (Some(f), _) => FilterSource::Explicit(f),
        (None, Some(f)) if !f.trim().is_empty() => FilterSource::Env(f),
        _ => FilterSource::Fallback,
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Later calls are ignored. Call it first thing in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok()) {
            FilterSource::Explicit(f) | FilterSource::Env(f) => {
                builder.parse_filters(&f);
            }
            FilterSource::Fallback => {
                builder.filter_level(log::LevelFilter::Info);
                for target in QUIET_TARGETS {
                    builder.filter_module(target, log::LevelFilter::Warn);
                }
            }
        }

        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized");
    });
}
