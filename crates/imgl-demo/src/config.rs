use anyhow::{bail, Result};

use crate::frame::Layout;

/// Command-line options for the demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DemoConfig {
    pub layout: Layout,
}

impl DemoConfig {
    /// Parses `[quad|quadrants]`. Program name must already be skipped.
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(arg) = args.next() {
            config.layout = arg.parse()?;
        }
        if let Some(extra) = args.next() {
            bail!("unexpected argument {extra:?}");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn no_arguments_gives_quad_only() {
        let cfg = DemoConfig::from_args(args(&[])).unwrap();
        assert_eq!(cfg.layout, Layout::QuadOnly);
    }

    #[test]
    fn layout_argument_is_parsed() {
        let cfg = DemoConfig::from_args(args(&["quadrants"])).unwrap();
        assert_eq!(cfg.layout, Layout::Quadrants);
    }

    #[test]
    fn rejects_unknown_and_extra_arguments() {
        assert!(DemoConfig::from_args(args(&["cubes"])).is_err());
        assert!(DemoConfig::from_args(args(&["quad", "quad"])).is_err());
    }
}
