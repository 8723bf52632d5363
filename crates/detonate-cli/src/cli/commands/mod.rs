//! Command implementations.

pub mod analyze;
pub mod config;
pub mod rules;

use std::path::{Path, PathBuf};

use detonate_core::AnalyzerConfig;

use crate::output::OutputFormat;

/// Config file used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/detonate/config.toml";

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Explicit config file path
    pub config_path: Option<PathBuf>,

    /// Output format
    pub output_format: OutputFormat,
}

impl Context {
    pub fn config_path(&self) -> &Path {
        self.config_path
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load the config file, or defaults if it does not exist.
    pub fn load_config(&self) -> detonate_core::Result<AnalyzerConfig> {
        AnalyzerConfig::load(self.config_path())
    }
}
