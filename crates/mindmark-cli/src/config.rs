//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory),
//! and locating the directory that holds the persisted state.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use mindmark::{AppConfig, MindmarkError};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Could not determine a state directory; pass --state-dir")]
    NoStateDir,
}

impl From<ConfigError> for MindmarkError {
    fn from(err: ConfigError) -> Self {
        MindmarkError::Config(err.to_string())
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "mindmark", "mindmark")
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (mindmark/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, MindmarkError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("mindmark/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = project_dirs() {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, MindmarkError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}

/// Directory holding the persisted state.
///
/// Uses `explicit_dir` if given, the platform data directory otherwise.
pub fn state_dir(explicit_dir: Option<impl AsRef<Path>>) -> Result<PathBuf, MindmarkError> {
    if let Some(dir) = explicit_dir {
        return Ok(dir.as_ref().to_path_buf());
    }

    let dir = project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(ConfigError::NoStateDir)?;
    debug!(path = dir.display().to_string(); "Using platform state directory");
    Ok(dir)
}
