//! Rendering finalized topology graphs.
//!
//! The [`Renderer`] trait is the seam between a diagram scope and whatever
//! turns a [`TopologyGraph`] into a file. Layout is never done here; the
//! Graphviz renderer (feature `graphviz`) delegates it to the `dot` engine.

#[cfg(feature = "graphviz")]
pub mod graphviz;
pub mod icons;

use std::{
    fmt, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;
use thiserror::Error;

use topology_core::graph::TopologyGraph;

/// Consumes a finalized graph and produces an output file.
pub trait Renderer {
    /// Renders `graph`, returning where the output was written.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when an icon asset is missing, the output path
    /// cannot be written, or the layout engine fails. Failures are terminal;
    /// callers do not retry.
    fn render(&self, graph: &TopologyGraph) -> Result<RenderOutput, Error>;
}

/// Image format of a rendered diagram.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
    Jpg,
    Pdf,
    /// DOT source, written without running the layout engine.
    Dot,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Pdf => "pdf",
            ImageFormat::Dot => "dot",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "pdf" => Ok(Self::Pdf),
            "dot" | "gv" => Ok(Self::Dot),
            _ => Err(format!(
                "unsupported image format `{s}`, expected one of png, svg, jpg, pdf, dot"
            )),
        }
    }
}

/// Where a renderer wrote a diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    path: PathBuf,
}

impl RenderOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Builds `<output_dir>/<filename>.<extension>` for a graph.
pub fn output_path(output_dir: &Path, graph: &TopologyGraph, format: ImageFormat) -> PathBuf {
    output_dir.join(format!("{}.{}", graph.filename(), format.extension()))
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing icon asset: {}", .0.display())]
    MissingAsset(PathBuf),

    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use topology_core::graph::{Direction, GraphHeader};

    #[test]
    fn test_format_parsing() {
        assert_eq!("PNG".parse::<ImageFormat>(), Ok(ImageFormat::Png));
        assert_eq!("jpeg".parse::<ImageFormat>(), Ok(ImageFormat::Jpg));
        assert_eq!("gv".parse::<ImageFormat>(), Ok(ImageFormat::Dot));
        assert!("bmp".parse::<ImageFormat>().is_err());
        assert_eq!(ImageFormat::default().to_string(), "png");
    }

    #[test]
    fn test_output_path_uses_graph_filename() {
        let graph = TopologyGraph::from_declarations(
            GraphHeader::new("Standalone mode", "deploy_standalone", Direction::TopToBottom),
            vec![],
            vec![],
            vec![],
            &[],
        );

        assert_eq!(
            output_path(Path::new("out"), &graph, ImageFormat::Svg),
            PathBuf::from("out/deploy_standalone.svg")
        );
    }

    #[test]
    fn test_error_messages() {
        let err = Error::MissingAsset(PathBuf::from("resources/cardano.png"));
        assert_eq!(err.to_string(), "Missing icon asset: resources/cardano.png");
    }
}
