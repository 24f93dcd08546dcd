//! CLI command implementations

pub mod render;
pub mod schema;
pub mod validate;

use anyhow::{Context, Result};
use atomic_compose::{AtomicConfig, Factory};
use std::path::Path;

/// Load configuration from a file or a directory and build a factory from it
pub fn load_factory(config_path: &str) -> Result<(Factory, AtomicConfig)> {
    let path = Path::new(config_path);
    if !path.exists() {
        anyhow::bail!("Configuration not found: {}", config_path);
    }

    let config = if path.is_dir() {
        AtomicConfig::load_from_directory(path)
    } else {
        AtomicConfig::load_from_file(path)
    }
    .with_context(|| format!("Failed to load configuration from {}", config_path))?;

    let factory = Factory::builder()
        .configure(&config)
        .context("Failed to register configured types")?
        .build();

    log::debug!("Loaded {:?}", factory);
    Ok((factory, config))
}
