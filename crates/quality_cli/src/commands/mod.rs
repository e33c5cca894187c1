pub mod check;
pub mod results;
pub mod validate;

use anyhow::{Context, Result};
use quality_context::ContextConfig;
use std::path::PathBuf;

/// Reads the context configuration from the environment, letting an explicit
/// `--store-dir` win over `DQE_STORE_DIR`.
fn load_config(store_dir: Option<PathBuf>) -> Result<ContextConfig> {
    let mut config = ContextConfig::from_env().context("Invalid DQE_* configuration")?;
    if let Some(dir) = store_dir {
        config.store_dir = dir;
    }
    config.validate()?;
    Ok(config)
}
