//! Typed vertices.
//!
//! A [`Node`] is one system actor in a deployment topology. Its [`NodeKind`]
//! is drawn from a fixed set and selects the icon a renderer uses; the one
//! domain-specific actor that has no builtin icon carries an [`Icon::Custom`]
//! asset path instead.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;

use crate::identifier::{ClusterId, NodeId};

/// The fixed set of actor kinds a topology node can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// A human user.
    Person,
    /// A command-line or programmatic API client.
    CliClient,
    /// A compute instance running a service.
    Compute,
    /// A database server.
    Database,
    /// A reverse proxy or load balancer.
    ReverseProxy,
    /// A generic external service.
    External,
}

impl NodeKind {
    /// Every kind, in declaration order.
    pub const ALL: [NodeKind; 6] = [
        NodeKind::Person,
        NodeKind::CliClient,
        NodeKind::Compute,
        NodeKind::Database,
        NodeKind::ReverseProxy,
        NodeKind::External,
    ];

    /// Returns the kebab-case name used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Person => "person",
            NodeKind::CliClient => "cli-client",
            NodeKind::Compute => "compute",
            NodeKind::Database => "database",
            NodeKind::ReverseProxy => "reverse-proxy",
            NodeKind::External => "external",
        }
    }

    /// Returns the file stem of the builtin icon asset for this kind.
    pub fn asset_name(self) -> &'static str {
        match self {
            NodeKind::Person => "user",
            NodeKind::CliClient => "bash",
            NodeKind::Compute => "rust",
            NodeKind::Database => "postgresql",
            NodeKind::ReverseProxy => "nginx",
            NodeKind::External => "internet",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown node kind `{s}`"))
    }
}

/// The visual asset a node is drawn with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Icon {
    /// The registry's icon for a builtin kind.
    Builtin(NodeKind),
    /// A caller-supplied image file.
    Custom(PathBuf),
}

/// A single declared vertex.
///
/// Nodes are immutable once declared.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    label: String,
    kind: NodeKind,
    icon: Icon,
    cluster: Option<ClusterId>,
}

impl Node {
    /// Creates a node drawn with the builtin icon of its kind.
    ///
    /// # Arguments
    ///
    /// * `id` - Declaration identity of the node
    /// * `kind` - Actor kind
    /// * `label` - Display label, may contain newlines
    /// * `cluster` - The cluster that was open when the node was declared
    pub fn new(
        id: NodeId,
        kind: NodeKind,
        label: impl Into<String>,
        cluster: Option<ClusterId>,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            kind,
            icon: Icon::Builtin(kind),
            cluster,
        }
    }

    /// Creates an external-service node drawn with a custom image.
    pub fn custom(
        id: NodeId,
        label: impl Into<String>,
        icon_path: impl Into<PathBuf>,
        cluster: Option<ClusterId>,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            kind: NodeKind::External,
            icon: Icon::Custom(icon_path.into()),
            cluster,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn icon(&self) -> &Icon {
        &self.icon
    }

    /// Returns the custom asset path, if this node has one.
    pub fn custom_icon(&self) -> Option<&Path> {
        match &self.icon {
            Icon::Custom(path) => Some(path),
            Icon::Builtin(_) => None,
        }
    }

    /// Returns the immediate containing cluster.
    pub fn cluster(&self) -> Option<ClusterId> {
        self.cluster
    }
}
