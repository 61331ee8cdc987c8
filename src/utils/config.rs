use crate::models::Config;
use crate::utils::paths::get_config_dir;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.toml"))
}

/// Read the config at `path`, writing the defaults there if it is missing.
pub fn load_config_from(config_path: &Path) -> Result<Config> {
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!(
                "Failed to parse config file: {}. Please check the file format.",
                e
            )
        })?;

        config.validate()?;
        Ok(config)
    } else {
        let default_config = Config::default();
        save_config_to(&default_config, config_path)?;
        Ok(default_config)
    }
}

pub fn save_config_to(config: &Config, config_path: &Path) -> Result<()> {
    config.validate()?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(config_path, contents.trim_end().to_string() + "\n")?;
    log::debug!("Saved config to {:?}", config_path);

    Ok(())
}
