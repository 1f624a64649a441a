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

use topology::{TopologyError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),
}

impl From<ConfigError> for TopologyError {
    fn from(err: ConfigError) -> Self {
        TopologyError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (neoprism-diagrams/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, TopologyError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("neoprism-diagrams/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("org", "neoprism", "neoprism-diagrams") {
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
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing fails
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, TopologyError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    // Icon paths in a config file are relative to that file
    let base = path.parent().unwrap_or(Path::new("."));
    debug!(base = base.display().to_string(); "Resolving icon paths against config directory");
    let icons = config.icons().clone().relative_to(base);

    Ok(config.with_icons(icons))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use topology::{ImageFormat, node::NodeKind};

    use super::*;

    #[test]
    fn test_explicit_path_is_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [render]
            format = "svg"

            [icons]
            custom_directory = "docs/diagrams/resources"
            "#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.render().format(), ImageFormat::Svg);
        assert_eq!(
            config.icons().custom_directory(),
            Some(dir.path().join("docs/diagrams/resources").as_path())
        );
    }

    #[test]
    fn test_icon_paths_resolve_against_config_directory() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join("deploy");
        fs::create_dir_all(&config_dir).unwrap();
        let path = config_dir.join("config.toml");
        let absolute = dir.path().join("shared/icons");
        fs::write(
            &path,
            format!(
                "[icons]\ndirectory = \"{}\"\ncustom_directory = \"resources\"\n\n[icons.overrides]\ndatabase = \"db.png\"\n",
                absolute.display().to_string().replace('\\', "/")
            ),
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(
            config.icons().custom_directory(),
            Some(config_dir.join("resources").as_path())
        );
        assert_eq!(
            config.icons().overrides().get(&NodeKind::Database),
            Some(&config_dir.join("db.png"))
        );
        assert_eq!(config.icons().directory(), Some(absolute.as_path()));
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = load_config(Some(&path)).unwrap_err();

        assert!(matches!(err, TopologyError::Config(message) if message.contains("absent.toml")));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[render]\nformat = \"bmp\"\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();

        assert!(matches!(err, TopologyError::Config(message) if message.starts_with("Failed to parse")));
    }
}
