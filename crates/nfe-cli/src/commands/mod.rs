//! Subcommand implementations.

pub mod config;
pub mod inspect;
pub mod process;

use std::path::PathBuf;

use nfe_core::NfeConfig;

/// Config file given on the command line, or the per-user default.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(config::default_config_path)
}

/// Load the config file given on the command line.
///
/// An explicit path must exist; a missing default file means defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<NfeConfig> {
    let path = config_file(config_path);
    if config_path.is_some() || path.exists() {
        Ok(NfeConfig::from_file(&path)?)
    } else {
        Ok(NfeConfig::default())
    }
}
