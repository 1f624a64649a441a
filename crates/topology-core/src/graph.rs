//! The finalized topology graph.
//!
//! [`TopologyGraph`] is what a diagram scope hands to its renderer: every
//! declared node in declaration order, the cluster tree, and the edges that
//! result from expanding every declared [`EdgeIntent`]. The graph is backed by
//! a petgraph [`DiGraph`] whose node indices equal the declaration indices of
//! [`NodeId`]s, and whose edge indices follow expansion order.

use std::{fmt, str::FromStr};

use log::{debug, trace};
use petgraph::{
    Direction as EdgeDirection,
    graph::{DiGraph, NodeIndex},
};
use serde::Deserialize;

use crate::{
    cluster::{Cluster, Member},
    edge::{Edge, EdgeIntent},
    identifier::{ClusterId, NodeId},
    node::Node,
};

/// Rank direction hint passed to the layout engine.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "TB")]
    TopToBottom,
    #[serde(rename = "BT")]
    BottomToTop,
    #[serde(rename = "LR")]
    LeftToRight,
    #[serde(rename = "RL")]
    RightToLeft,
}

impl Direction {
    /// Returns the two-letter rank direction code (`TB`, `BT`, `LR`, `RL`).
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::TopToBottom => "TB",
            Direction::BottomToTop => "BT",
            Direction::LeftToRight => "LR",
            Direction::RightToLeft => "RL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TB" => Ok(Self::TopToBottom),
            "BT" => Ok(Self::BottomToTop),
            "LR" => Ok(Self::LeftToRight),
            "RL" => Ok(Self::RightToLeft),
            _ => Err(format!("invalid direction `{s}`, expected one of TB, BT, LR, RL")),
        }
    }
}

/// File stem used when a diagram has neither a title nor an explicit filename.
pub const DEFAULT_FILENAME: &str = "diagrams_image";

/// Derives an output file stem from a diagram title.
///
/// The title is lowercased and every run of whitespace becomes a single `_`.
/// A title with no visible characters yields [`DEFAULT_FILENAME`].
///
/// # Examples
///
/// ```
/// use topology_core::graph::filename_from_title;
///
/// assert_eq!(filename_from_title("High-availability mode"), "high-availability_mode");
/// assert_eq!(filename_from_title("   "), "diagrams_image");
/// ```
pub fn filename_from_title(title: &str) -> String {
    let filename = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();
    if filename.is_empty() {
        return DEFAULT_FILENAME.to_string();
    }
    filename
}

/// Identity and direction of a diagram, carried into its finalized graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphHeader {
    title: String,
    filename: String,
    direction: Direction,
}

impl GraphHeader {
    pub fn new(title: impl Into<String>, filename: impl Into<String>, direction: Direction) -> Self {
        Self {
            title: title.into(),
            filename: filename.into(),
            direction,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// A fully expanded topology graph ready for rendering.
#[derive(Debug, Clone)]
pub struct TopologyGraph {
    header: GraphHeader,
    graph: DiGraph<Node, Edge>,
    clusters: Vec<Cluster>,
    roots: Vec<Member>,
    intents_count: usize,
    fan_outs_count: usize,
}

impl TopologyGraph {
    /// Builds a graph from the declarations collected by a diagram scope.
    ///
    /// `nodes` and `clusters` must be indexed by their declaration ids, and
    /// every id referenced by `roots`, cluster members and `intents` must be
    /// present. Intents are expanded here, in declaration order.
    pub fn from_declarations(
        header: GraphHeader,
        nodes: Vec<Node>,
        clusters: Vec<Cluster>,
        roots: Vec<Member>,
        intents: &[EdgeIntent],
    ) -> Self {
        let edges_count = intents.iter().map(|intent| intent.targets().len()).sum();
        let mut graph = DiGraph::with_capacity(nodes.len(), edges_count);

        for node in nodes {
            let idx = graph.add_node(node);
            trace!(node_index = idx.index(); "Added node to topology graph");
        }

        let mut fan_outs_count = 0;
        for (intent_index, intent) in intents.iter().enumerate() {
            if intent.is_fan_out() {
                fan_outs_count += 1;
            }
            for edge in intent.expand(intent_index) {
                let source = NodeIndex::new(edge.source().index());
                let target = NodeIndex::new(edge.target().index());
                graph.add_edge(source, target, edge);
            }
        }

        debug!(
            title = header.title(),
            nodes_count = graph.node_count(),
            edges_count = graph.edge_count(),
            fan_outs_count;
            "Topology graph finalized"
        );

        Self {
            header,
            graph,
            clusters,
            roots,
            intents_count: intents.len(),
            fan_outs_count,
        }
    }

    pub fn header(&self) -> &GraphHeader {
        &self.header
    }

    pub fn title(&self) -> &str {
        self.header.title()
    }

    /// Returns the output file stem, without extension.
    pub fn filename(&self) -> &str {
        self.header.filename()
    }

    pub fn direction(&self) -> Direction {
        self.header.direction()
    }

    /// Returns all nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.graph.node_weight(NodeIndex::new(id.index()))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns all expanded edges in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_weights()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the targets of `source`'s outgoing edges, in declaration order.
    pub fn targets_of(&self, source: NodeId) -> Vec<NodeId> {
        self.edges()
            .filter(|edge| edge.source() == source)
            .map(Edge::target)
            .collect()
    }

    /// Returns the number of edges pointing at `id`.
    pub fn in_degree(&self, id: NodeId) -> usize {
        self.graph
            .edges_directed(NodeIndex::new(id.index()), EdgeDirection::Incoming)
            .count()
    }

    /// Returns the number of edges leaving `id`.
    pub fn out_degree(&self, id: NodeId) -> usize {
        self.graph
            .edges_directed(NodeIndex::new(id.index()), EdgeDirection::Outgoing)
            .count()
    }

    /// Returns all clusters in declaration order.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(id.index())
    }

    /// Returns the members that are not inside any cluster, in declaration order.
    pub fn roots(&self) -> &[Member] {
        &self.roots
    }

    /// Returns the number of connection declarations, before expansion.
    pub fn intents_count(&self) -> usize {
        self.intents_count
    }

    /// Returns how many connection declarations named more than one target.
    pub fn fan_outs_count(&self) -> usize {
        self.fan_outs_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{edge::EdgeSpec, node::NodeKind};

    fn header() -> GraphHeader {
        GraphHeader::new("Test", "test", Direction::LeftToRight)
    }

    fn nodes(count: usize) -> Vec<Node> {
        (0..count)
            .map(|i| Node::new(NodeId::new(i), NodeKind::Compute, "same label", None))
            .collect()
    }

    fn roots(count: usize) -> Vec<Member> {
        (0..count).map(|i| Member::Node(NodeId::new(i))).collect()
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("TB".parse::<Direction>(), Ok(Direction::TopToBottom));
        assert_eq!("lr".parse::<Direction>(), Ok(Direction::LeftToRight));
        assert!("diagonal".parse::<Direction>().is_err());
        assert_eq!(Direction::default().to_string(), "TB");
    }

    #[test]
    fn test_filename_from_title() {
        assert_eq!(filename_from_title("Standalone mode"), "standalone_mode");
        assert_eq!(filename_from_title("  Many   spaces "), "many_spaces");
        assert_eq!(filename_from_title(""), DEFAULT_FILENAME);
        assert_eq!(filename_from_title("   "), DEFAULT_FILENAME);
        assert_eq!(filename_from_title("\t\n"), "diagrams_image");
    }

    #[test]
    fn test_empty_graph() {
        let graph = TopologyGraph::from_declarations(header(), vec![], vec![], vec![], &[]);

        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.intents_count(), 0);
        assert_eq!(graph.direction(), Direction::LeftToRight);
        assert_eq!(graph.filename(), "test");
    }

    #[test]
    fn test_nodes_keep_declaration_identity() {
        let graph = TopologyGraph::from_declarations(header(), nodes(3), vec![], roots(3), &[]);

        let ids: Vec<NodeId> = graph.nodes().map(Node::id).collect();
        assert_eq!(ids, vec![NodeId::new(0), NodeId::new(1), NodeId::new(2)]);
        assert!(graph.nodes().all(|node| node.label() == "same label"));
        assert_eq!(graph.node(NodeId::new(2)).map(Node::id), Some(NodeId::new(2)));
        assert!(graph.node(NodeId::new(3)).is_none());
    }

    #[test]
    fn test_fan_out_and_fan_in_expansion() {
        let proxy = NodeId::new(0);
        let servers = vec![NodeId::new(1), NodeId::new(2), NodeId::new(3)];
        let database = NodeId::new(4);

        let mut intents = vec![EdgeIntent::new(proxy, servers.clone(), EdgeSpec::new())];
        for &server in &servers {
            intents.push(EdgeIntent::new(server, vec![database], EdgeSpec::new()));
        }

        let graph =
            TopologyGraph::from_declarations(header(), nodes(5), vec![], roots(5), &intents);

        assert_eq!(graph.edge_count(), 6);
        assert_eq!(graph.intents_count(), 4);
        assert_eq!(graph.fan_outs_count(), 1);
        assert_eq!(graph.targets_of(proxy), servers);
        assert_eq!(graph.out_degree(proxy), 3);
        assert_eq!(graph.in_degree(database), 3);
        assert_eq!(graph.in_degree(proxy), 0);
    }

    #[test]
    fn test_edges_follow_declaration_order() {
        let intents = vec![
            EdgeIntent::new(NodeId::new(2), vec![NodeId::new(0)], EdgeSpec::labeled("b")),
            EdgeIntent::new(NodeId::new(0), vec![NodeId::new(1)], EdgeSpec::labeled("a")),
            EdgeIntent::new(NodeId::new(1), vec![], EdgeSpec::labeled("none")),
        ];

        let graph =
            TopologyGraph::from_declarations(header(), nodes(3), vec![], roots(3), &intents);

        let labels: Vec<Option<&str>> = graph.edges().map(Edge::label).collect();
        assert_eq!(labels, vec![Some("b"), Some("a")]);
        let origins: Vec<usize> = graph.edges().map(Edge::intent).collect();
        assert_eq!(origins, vec![0, 1]);
    }

    #[test]
    fn test_clusters_and_roots_are_preserved() {
        let mut internet = Cluster::new(ClusterId::new(0), "Internet", None, 0);
        internet.add_member(Member::Node(NodeId::new(0)));
        let roots = vec![Member::Cluster(ClusterId::new(0)), Member::Node(NodeId::new(1))];

        let graph =
            TopologyGraph::from_declarations(header(), nodes(2), vec![internet], roots, &[]);

        assert_eq!(graph.clusters().len(), 1);
        assert_eq!(
            graph.cluster(ClusterId::new(0)).map(Cluster::label),
            Some("Internet")
        );
        assert_eq!(graph.roots().len(), 2);
    }
}
