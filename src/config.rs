use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use tracing::warn;

use crate::cli::OutputFormat;

pub const DEFAULT_PRICING_FILE: &str = "pricing_data.json";
pub const PRICING_ENV: &str = "LLMCOST_PRICING";

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct Config {
    pub pricing_file: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub details: Option<bool>,
}

pub fn load_config() -> Config {
    let Some(dirs) = ProjectDirs::from("", "", "llmcost") else {
        return Config::default();
    };
    load_config_from(&dirs.config_dir().join("config.toml"))
}

pub fn load_config_from(path: &Path) -> Config {
    let Ok(data) = fs::read_to_string(path) else {
        return Config::default();
    };

    match toml::from_str(&data) {
        Ok(config) => config,
        Err(e) => {
            warn!("invalid config at {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Catalog path: flag, then config, then `LLMCOST_PRICING`, then
/// `pricing_data.json` in the working directory.
pub fn resolve_pricing_path(
    flag: Option<&Path>,
    config: &Config,
    env: Option<PathBuf>,
) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| config.pricing_file.clone())
        .or(env)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PRICING_FILE))
}

pub fn pricing_from_env() -> Option<PathBuf> {
    std::env::var_os(PRICING_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
