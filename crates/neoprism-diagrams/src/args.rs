//! Command-line argument definitions for the NeoPRISM diagram generator.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments override the output location and image format
//! from the configuration file, select that file, and control logging
//! verbosity.

use clap::Parser;

/// Command-line arguments for the NeoPRISM deployment diagram generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory the diagrams are written to
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Image format (png, svg, jpg, pdf, dot)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["neoprism-diagrams"]);

        assert_eq!(args.output_dir, None);
        assert_eq!(args.format, None);
        assert_eq!(args.config, None);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "neoprism-diagrams",
            "--output-dir",
            "docs/diagrams",
            "-f",
            "svg",
            "--log-level",
            "debug",
        ]);

        assert_eq!(args.output_dir.as_deref(), Some("docs/diagrams"));
        assert_eq!(args.format.as_deref(), Some("svg"));
        assert_eq!(args.log_level, "debug");
    }
}
