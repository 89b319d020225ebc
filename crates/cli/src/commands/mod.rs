//! Command implementations.

mod info;
mod resolve;
mod route;
mod send;
mod validate;

pub use info::run_info;
pub use resolve::run_resolve;
pub use route::run_route;
pub use send::run_send;
pub use validate::run_validate;

use std::path::Path;

use anyhow::{Context, Result};
use contracts::PipelineBlueprint;

use crate::error::CliError;

/// Load and validate a configuration file
fn load_blueprint(path: &Path) -> Result<PipelineBlueprint> {
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()).into());
    }
    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}
