//! Scope-discipline errors.
//!
//! These are programmer errors raised at declaration time: the declaration
//! that triggers one is rejected and nothing is recorded for it.

use thiserror::Error;

use crate::identifier::{DiagramId, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("endpoint {endpoint} belongs to {found}, not to {expected}")]
    ForeignEndpoint {
        endpoint: NodeId,
        expected: DiagramId,
        found: DiagramId,
    },

    #[error("endpoint {0} was never declared in this diagram")]
    UnknownEndpoint(NodeId),

    #[error("no open cluster to close")]
    NoOpenCluster,
}
