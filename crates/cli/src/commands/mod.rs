//! Command implementations.

mod info;
mod replay;
mod simulate;
mod validate;

pub use info::run_info;
pub use replay::run_replay;
pub use simulate::run_simulate;
pub use validate::run_validate;

use anyhow::{Context, Result};
use contracts::SpinConfig;
use std::path::Path;
use tracing::info;

use crate::error::CliError;

/// Load the configuration file if one was given, otherwise use defaults
fn load_config(path: Option<&Path>) -> Result<SpinConfig> {
    if let Some(path) = path {
        info!(config = %path.display(), "Loading configuration");
        if !path.exists() {
            return Err(CliError::config_not_found(path.display().to_string()).into());
        }
    } else {
        info!("No configuration file given, using defaults");
    }

    config_loader::ConfigLoader::load_or_default(path).with_context(|| match path {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Default configuration is invalid".to_string(),
    })
}
