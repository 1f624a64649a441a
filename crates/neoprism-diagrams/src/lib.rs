//! NeoPRISM deployment diagrams CLI library
//!
//! This module contains the CLI logic that renders the NeoPRISM standalone
//! and high-availability deployment diagrams.

pub mod deployment;
pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::path::PathBuf;

use log::{error, info};

use topology::{
    ImageFormat, RenderOutput, TopologyError,
    config::{AppConfig, RenderConfig},
    export::graphviz::GraphvizRenderer,
};

/// Directory holding the custom icons when the configuration names none.
const DEFAULT_CUSTOM_ICON_DIR: &str = "resources";

/// Run the NeoPRISM diagrams CLI application
///
/// Both topologies are rendered one after the other, each in its own
/// diagram scope. A failure in one does not stop the other.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns every failure of the run:
/// - Configuration loading errors (nothing is rendered)
/// - Declaration errors
/// - Rendering errors (missing icon assets, unwritable output, Graphviz failures)
pub fn run(args: &Args) -> Result<Vec<RenderOutput>, Vec<TopologyError>> {
    let app_config = load_app_config(args).map_err(|err| vec![err])?;
    let renderer = GraphvizRenderer::from_config(&app_config).map_err(|err| vec![err])?;

    info!(
        output_dir = renderer.output_dir().display().to_string(),
        format:% = renderer.format();
        "Rendering deployment diagrams"
    );

    let mut outputs = Vec::new();
    let mut errors = Vec::new();
    for deploy in [deployment::deploy_standalone, deployment::deploy_ha] {
        match deploy(&renderer) {
            Ok(output) => {
                info!(path = output.path().display().to_string(); "Diagram exported successfully");
                outputs.push(output);
            }
            Err(err) => {
                error!(err:% = err; "Diagram failed");
                errors.push(err);
            }
        }
    }

    if errors.is_empty() {
        Ok(outputs)
    } else {
        Err(errors)
    }
}

/// Lists the written diagram files, one path per line.
pub fn written_paths(outputs: &[RenderOutput]) -> String {
    outputs
        .iter()
        .map(|output| format!("{}\n", output.path().display()))
        .collect()
}

/// Loads the configuration and applies the command-line overrides.
fn load_app_config(args: &Args) -> Result<AppConfig, TopologyError> {
    let app_config = config::load_config(args.config.as_ref())?;

    let output_dir = args
        .output_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| app_config.render().output_dir().to_path_buf());
    let format = match &args.format {
        Some(format) => format.parse::<ImageFormat>().map_err(TopologyError::Config)?,
        None => app_config.render().format(),
    };

    let mut icons = app_config.icons().clone();
    if icons.custom_directory().is_none() {
        icons = icons.with_custom_directory(DEFAULT_CUSTOM_ICON_DIR);
    }

    Ok(AppConfig::new(
        RenderConfig::new(Some(output_dir), format),
        app_config.style().clone(),
        icons,
    ))
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use tempfile::tempdir;

    use super::*;

    fn args(config: Option<&Path>, output_dir: Option<&str>, format: Option<&str>) -> Args {
        Args {
            output_dir: output_dir.map(str::to_string),
            format: format.map(str::to_string),
            config: config.map(|path| path.display().to_string()),
            log_level: "off".to_string(),
        }
    }

    #[test]
    fn test_cli_flags_override_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [render]
            output_dir = "from-file"
            format = "svg"
            "#,
        )
        .unwrap();

        let config = load_app_config(&args(Some(&path), Some("from-cli"), Some("dot"))).unwrap();

        assert_eq!(config.render().output_dir(), Path::new("from-cli"));
        assert_eq!(config.render().format(), ImageFormat::Dot);
    }

    #[test]
    fn test_config_file_used_without_flags() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [render]
            output_dir = "from-file"
            format = "svg"

            [icons]
            custom_directory = "assets"

            [icons.overrides]
            database = "db.png"
            "#,
        )
        .unwrap();

        let config = load_app_config(&args(Some(&path), None, None)).unwrap();

        assert_eq!(config.render().output_dir(), Path::new("from-file"));
        assert_eq!(config.render().format(), ImageFormat::Svg);
        assert_eq!(
            config.icons().custom_directory(),
            Some(dir.path().join("assets").as_path())
        );
        assert_eq!(config.icons().overrides().len(), 1);
    }

    #[test]
    fn test_custom_icon_directory_defaults_to_resources() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[icons.overrides]\ndatabase = \"db.png\"\n").unwrap();

        let config = load_app_config(&args(Some(&path), None, None)).unwrap();

        assert_eq!(
            config.icons().custom_directory(),
            Some(Path::new(DEFAULT_CUSTOM_ICON_DIR))
        );
        assert_eq!(config.icons().overrides().len(), 1);
    }

    #[test]
    fn test_written_paths_lists_each_output() {
        let outputs = vec![
            RenderOutput::new("docs/deploy_standalone.png"),
            RenderOutput::new("docs/deploy_ha.png"),
        ];

        assert_eq!(
            written_paths(&outputs),
            "docs/deploy_standalone.png\ndocs/deploy_ha.png\n"
        );
        assert_eq!(written_paths(&[]), "");
    }

    #[test]
    fn test_invalid_format_flag() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "").unwrap();

        let err = load_app_config(&args(Some(&path), None, Some("bmp"))).unwrap_err();

        assert!(matches!(err, TopologyError::Config(message) if message.contains("bmp")));
    }
}
