//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration was read from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            match Self::find_config(&cwd) {
                Some((path, config)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        if let Some(path) = &config_path {
            tracing::debug!(path = %path.display(), "loaded config");
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(PathBuf, CliConfig)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    match CliConfig::load(config_path.to_str()?) {
                        Ok(config) => return Some((config_path, config)),
                        Err(err) => {
                            tracing::warn!(path = %config_path.display(), error = %err, "skipping unreadable config")
                        }
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }
}
