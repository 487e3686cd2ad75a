//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use umbra::{UmbraError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for UmbraError {
    fn from(err: ConfigError) -> Self {
        UmbraError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (umbra/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed or holds invalid values
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, UmbraError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("umbra/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "umbra", "umbra") {
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
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, UmbraError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.storage().indent() > 8 {
        return Err(ConfigError::Validation(format!(
            "storage.indent must be at most 8, got {}",
            config.storage().indent()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_explicit_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[storage]\nindent = 4\natomic_save = false\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.storage().indent(), 4);
        assert!(!config.storage().atomic_save());
        assert!(config.storage().ensure_style_sheet());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.storage().indent(), 2);
    }

    #[test]
    fn test_missing_explicit_config() {
        let dir = tempdir().unwrap();
        let err = load_config(Some(dir.path().join("none.toml"))).unwrap_err();
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[storage\nindent = ").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }

    #[test]
    fn test_indent_out_of_range() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[storage]\nindent = 20\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("storage.indent"));
    }
}
