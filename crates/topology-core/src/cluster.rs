//! Nested visual grouping.
//!
//! A [`Cluster`] records which nodes and child clusters were declared while it
//! was open. Membership is assigned once, at declaration, from the innermost
//! open cluster, so every node and cluster has at most one immediate parent
//! and containment stays a tree. Clusters never affect edge semantics.

use crate::identifier::{ClusterId, NodeId};

/// A direct member of a cluster or of the diagram root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Member {
    Node(NodeId),
    Cluster(ClusterId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    id: ClusterId,
    label: String,
    parent: Option<ClusterId>,
    depth: usize,
    members: Vec<Member>,
}

impl Cluster {
    /// Creates an empty cluster.
    ///
    /// # Arguments
    ///
    /// * `id` - Declaration identity of the cluster
    /// * `label` - Display label
    /// * `parent` - Enclosing cluster, `None` for a top-level cluster
    /// * `depth` - Nesting level, `0` for a top-level cluster
    pub fn new(
        id: ClusterId,
        label: impl Into<String>,
        parent: Option<ClusterId>,
        depth: usize,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            parent,
            depth,
            members: Vec::new(),
        }
    }

    pub fn id(&self) -> ClusterId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn parent(&self) -> Option<ClusterId> {
        self.parent
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the direct members in declaration order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Returns the ids of the nodes that are direct members.
    pub fn node_members(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.members.iter().filter_map(|member| match member {
            Member::Node(id) => Some(*id),
            Member::Cluster(_) => None,
        })
    }

    pub fn add_member(&mut self, member: Member) {
        self.members.push(member);
    }
}
