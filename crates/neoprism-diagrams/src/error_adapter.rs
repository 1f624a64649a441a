//! Error adapter for converting TopologyError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! Each diagram is rendered independently, so a run can fail more than once.
//! [`to_reportables`] adapts every failure so each one is reported on its own.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use topology::{ScopeError, TopologyError, export};

/// Adapter giving a [`TopologyError`] a miette diagnostic code and help text.
pub struct ErrorAdapter<'a>(pub &'a TopologyError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            TopologyError::Io(_) => "neoprism::io",
            TopologyError::Scope(_) => "neoprism::scope",
            TopologyError::Config(_) => "neoprism::config",
            TopologyError::Export(_) => "neoprism::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            TopologyError::Scope(ScopeError::ForeignEndpoint { .. }) => {
                "connect only nodes declared in the same diagram"
            }
            TopologyError::Config(_) => {
                "check the configuration file passed with --config or found in neoprism-diagrams/config.toml"
            }
            err => match err.as_export_error()? {
                export::Error::MissingAsset(_) => {
                    "place the icon there or point `icons.custom_directory` at the directory holding it"
                }
                export::Error::Render(_) => {
                    "make sure Graphviz is installed and `dot` is on PATH, or render with --format dot"
                }
                export::Error::Io(_) => return None,
            },
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Convert the failures of a run into reportable errors, one per failure.
pub fn to_reportables(errors: &[TopologyError]) -> Vec<ErrorAdapter<'_>> {
    errors.iter().map(ErrorAdapter).collect()
}
