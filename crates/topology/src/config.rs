//! Configuration types for topology diagram rendering.
//!
//! This module provides configuration structures that control where and how
//! diagrams are rendered. All types implement [`serde::Deserialize`] for
//! flexible loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining render, style and icon settings.
//! - [`RenderConfig`] - Output directory and image format.
//! - [`StyleConfig`] - Visual styling options such as background color and font.
//! - [`IconConfig`] - Where icon assets are looked up.
//!
//! # Example
//!
//! ```
//! # use topology::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.style().background_color().is_ok());
//! assert_eq!(config.style().font_name(), "Sans-Serif");
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use topology_core::{color::Color, node::NodeKind};

use crate::export::ImageFormat;

const DEFAULT_FONT_NAME: &str = "Sans-Serif";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Render configuration section.
    #[serde(default)]
    render: RenderConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Icon configuration section.
    #[serde(default)]
    icons: IconConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(render: RenderConfig, style: StyleConfig, icons: IconConfig) -> Self {
        Self {
            render,
            style,
            icons,
        }
    }

    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn icons(&self) -> &IconConfig {
        &self.icons
    }

    /// Returns this configuration with the render section replaced.
    pub fn with_render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }

    /// Returns this configuration with the icon section replaced.
    pub fn with_icons(mut self, icons: IconConfig) -> Self {
        self.icons = icons;
        self
    }
}

/// Output location and format.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderConfig {
    /// Directory the image files are written to, defaults to the working directory.
    #[serde(default)]
    output_dir: Option<PathBuf>,

    /// Image format of the output files.
    #[serde(default)]
    format: ImageFormat,
}

impl RenderConfig {
    pub fn new(output_dir: Option<PathBuf>, format: ImageFormat) -> Self {
        Self { output_dir, format }
    }

    /// Returns the output directory, `.` when none is configured.
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(Path::new("."))
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }
}

/// Visual styling configuration for rendered diagrams.
///
/// Fields that are not set fall back to renderer defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background [`Color`] for diagrams, as a color string.
    #[serde(default)]
    background_color: Option<String>,

    /// Font used for titles and labels.
    #[serde(default)]
    font_name: Option<String>,
}

impl StyleConfig {
    pub fn new(background_color: Option<String>, font_name: Option<String>) -> Self {
        Self {
            background_color,
            font_name,
        }
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    pub fn font_name(&self) -> &str {
        self.font_name.as_deref().unwrap_or(DEFAULT_FONT_NAME)
    }
}

/// Icon asset lookup configuration.
///
/// Builtin kinds resolve to `<directory>/<asset name>.png`, or to an explicit
/// per-kind override. Without a directory or override a kind is drawn as a
/// plain shape. Relative custom icon paths resolve against `custom_directory`.
///
/// Relative directories and override paths are taken as they are, so they
/// resolve against the working directory unless [`IconConfig::relative_to`]
/// anchors them first, as the CLI does with the config file's directory.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct IconConfig {
    #[serde(default)]
    directory: Option<PathBuf>,

    #[serde(default)]
    custom_directory: Option<PathBuf>,

    #[serde(default)]
    overrides: IndexMap<NodeKind, PathBuf>,
}

impl IconConfig {
    pub fn new(directory: Option<PathBuf>, custom_directory: Option<PathBuf>) -> Self {
        Self {
            directory,
            custom_directory,
            overrides: IndexMap::new(),
        }
    }

    /// Returns this configuration with an explicit asset for `kind`.
    pub fn with_override(mut self, kind: NodeKind, path: impl Into<PathBuf>) -> Self {
        self.overrides.insert(kind, path.into());
        self
    }

    /// Returns this configuration with relative custom icons resolved against `dir`.
    pub fn with_custom_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.custom_directory = Some(dir.into());
        self
    }

    /// Returns this configuration with every relative path joined onto `base`.
    pub fn relative_to(self, base: &Path) -> Self {
        let anchor = |path: PathBuf| {
            if path.is_relative() {
                base.join(path)
            } else {
                path
            }
        };

        Self {
            directory: self.directory.map(anchor),
            custom_directory: self.custom_directory.map(anchor),
            overrides: self
                .overrides
                .into_iter()
                .map(|(kind, path)| (kind, anchor(path)))
                .collect(),
        }
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn custom_directory(&self) -> Option<&Path> {
        self.custom_directory.as_deref()
    }

    pub fn overrides(&self) -> &IndexMap<NodeKind, PathBuf> {
        &self.overrides
    }
}
