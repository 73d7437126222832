use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Directory where handled parts are materialized on the instance.
pub const DEFAULT_BASE_DIR: &str = "/home/ubuntu/cloudconf";

/// Global configuration loaded from `~/.config/cloudpart/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Base directory for materialized parts.
    pub base_dir: PathBuf,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("cloudpart")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HandlerConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = HandlerConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: HandlerConfig = toml::from_str(&data)?;
    Ok(cfg)
}
