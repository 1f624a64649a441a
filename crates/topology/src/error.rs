//! Error types for topology operations.
//!
//! This module provides the main error type [`TopologyError`] which wraps
//! the error conditions that can occur while declaring and rendering a
//! topology diagram.

use std::io;

use thiserror::Error;

use topology_core::ScopeError;

/// The main error type for topology operations.
///
/// # Variants
///
/// `Scope` is a programmer error raised at declaration time. `Export` wraps
/// renderer failures (missing icon assets, unwritable output paths, a failed
/// `dot` invocation); it is fatal to the diagram being rendered only.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Scope error: {0}")]
    Scope(#[from] ScopeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for TopologyError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl TopologyError {
    /// Returns the renderer error, if this is an export failure raised by a renderer.
    pub fn as_export_error(&self) -> Option<&crate::export::Error> {
        match self {
            Self::Export(err) => err.downcast_ref::<crate::export::Error>(),
            _ => None,
        }
    }
}
