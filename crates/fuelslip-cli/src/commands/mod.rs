//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use fuelslip_core::FuelslipConfig;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fuelslip")
        .join("config.json")
}

/// Load the configuration named by `--config`, or the defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FuelslipConfig> {
    match config_path {
        Some(path) => Ok(FuelslipConfig::from_file(Path::new(path))?),
        None => Ok(FuelslipConfig::default()),
    }
}
