//! Topology Core Types and Definitions
//!
//! This crate provides the in-memory graph model behind declarative deployment
//! topology diagrams. It includes:
//!
//! - **Identifiers**: Per-declaration node and cluster identities ([`identifier`] module)
//! - **Colors**: CSS color parsing for edge and background styling ([`color::Color`])
//! - **Nodes**: Typed vertices and their icons ([`node`] module)
//! - **Clusters**: Nested visual grouping ([`cluster`] module)
//! - **Edges**: Declared connection intents and their fan-out expansion ([`edge`] module)
//! - **Graph**: The finalized graph handed to a renderer ([`graph::TopologyGraph`])

pub mod cluster;
pub mod color;
pub mod edge;
pub mod error;
pub mod graph;
pub mod identifier;
pub mod node;

pub use error::ScopeError;
