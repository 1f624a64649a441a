//! Identifiers for diagrams and the elements declared inside them.
//!
//! Identity in a topology diagram is per declaration, never per label: two
//! nodes labeled `"NeoPRISM\n(server)"` are two distinct vertices. Node and
//! cluster ids are sequence numbers local to one diagram, and handles pair
//! them with the [`DiagramId`] of the diagram that issued them so that a
//! handle cannot silently be used in a different diagram.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

/// Source of process-unique diagram ids.
static NEXT_DIAGRAM_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one diagram scope.
///
/// # Examples
///
/// ```
/// use topology_core::identifier::DiagramId;
///
/// let first = DiagramId::next();
/// let second = DiagramId::next();
/// assert_ne!(first, second);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiagramId(u64);

impl DiagramId {
    /// Allocates a fresh id that no other diagram in this process carries.
    pub fn next() -> Self {
        Self(NEXT_DIAGRAM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for DiagramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "diagram#{}", self.0)
    }
}

/// Identity of a node within its diagram, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Creates a node id from its declaration index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the declaration index of this node.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Identity of a cluster within its diagram, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(usize);

impl ClusterId {
    /// Creates a cluster id from its declaration index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the declaration index of this cluster.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cluster_{}", self.0)
    }
}

/// A node reference usable as an edge endpoint.
///
/// Handles are `Copy` so a declaration script can pass them around freely;
/// the owning diagram checks [`NodeHandle::diagram`] whenever a handle is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    diagram: DiagramId,
    id: NodeId,
}

impl NodeHandle {
    pub fn new(diagram: DiagramId, id: NodeId) -> Self {
        Self { diagram, id }
    }

    /// Returns the diagram that declared this node.
    pub fn diagram(&self) -> DiagramId {
        self.diagram
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}

/// A cluster reference returned when a cluster is opened or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClusterHandle {
    diagram: DiagramId,
    id: ClusterId,
}

impl ClusterHandle {
    pub fn new(diagram: DiagramId, id: ClusterId) -> Self {
        Self { diagram, id }
    }

    /// Returns the diagram that declared this cluster.
    pub fn diagram(&self) -> DiagramId {
        self.diagram
    }

    pub fn id(&self) -> ClusterId {
        self.id
    }
}
