//! Topology - Declarative deployment topology diagrams.
//!
//! Diagrams are declared inside a scoped [`Diagram`] context: nodes, nested
//! clusters and connections (including fan-out to several targets) are
//! collected into a [`graph::TopologyGraph`] and handed to a [`Renderer`]
//! exactly once when the scope ends. Layout is left to the renderer; with the
//! `graphviz` feature the bundled [`export::graphviz::GraphvizRenderer`]
//! drives the Graphviz `dot` engine.

pub mod config;
pub mod diagram;
pub mod export;

mod error;

pub use topology_core::{ScopeError, cluster, color, edge, graph, identifier, node};

pub use diagram::Diagram;
pub use error::TopologyError;
pub use export::{ImageFormat, RenderOutput, Renderer};
