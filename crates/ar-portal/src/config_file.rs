//! Reading and writing [`PortalConfig`] as JSON files.

use std::path::Path;

use ar_portal_core::{PortalConfig, Result};

/// Loads and validates a configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<PortalConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let config = PortalConfig::from_json_str(&text)?;
    log::info!("loaded portal config from {}", path.display());
    Ok(config)
}

/// Validates and writes a configuration file, replacing any existing one.
pub fn save_config(path: impl AsRef<Path>, config: &PortalConfig) -> Result<()> {
    config.validate()?;
    let path = path.as_ref();
    std::fs::write(path, config.to_json_string()?)?;
    log::info!("saved portal config to {}", path.display());
    Ok(())
}
