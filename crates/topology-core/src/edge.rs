//! Directed connections and fan-out expansion.
//!
//! A connection is declared once as an [`EdgeIntent`]: one source, an ordered
//! list of targets, and the label and style they share. Intents are expanded
//! into single-target [`Edge`] records only when the graph is finalized, by
//! [`EdgeIntent::expand`]. That is the only place the fan-out rule lives:
//!
//! - `N` targets produce exactly `N` edges, in target order, all carrying the
//!   intent's label and style.
//! - An empty target list produces no edges and is not an error.
//! - Nothing is deduplicated; parallel edges stay separate.

use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::{
    color::Color,
    identifier::{NodeHandle, NodeId},
};

/// Line pattern of an edge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Bold,
}

impl LineStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
            LineStyle::Dotted => "dotted",
            LineStyle::Bold => "bold",
        }
    }
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            "bold" => Ok(Self::Bold),
            _ => Err(format!("unknown line style `{s}`")),
        }
    }
}

/// Optional visual attributes of an edge.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct EdgeStyle {
    line: LineStyle,
    color: Option<Color>,
}

impl EdgeStyle {
    pub fn new(line: LineStyle, color: Option<Color>) -> Self {
        Self { line, color }
    }

    pub fn line(&self) -> LineStyle {
        self.line
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Returns `true` when no attribute differs from the renderer default.
    pub fn is_default(&self) -> bool {
        self.line == LineStyle::Solid && self.color.is_none()
    }
}

/// Label and style shared by every edge a connection declaration produces.
///
/// # Examples
///
/// ```
/// use topology_core::edge::{EdgeSpec, LineStyle};
///
/// let spec = EdgeSpec::new()
///     .with_label("Resolver API")
///     .with_style(LineStyle::Dashed);
/// assert_eq!(spec.label(), Some("Resolver API"));
/// assert_eq!(spec.style().line(), LineStyle::Dashed);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct EdgeSpec {
    label: Option<String>,
    style: EdgeStyle,
}

impl EdgeSpec {
    /// Creates an unlabeled, solid spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a spec that only carries a label.
    pub fn labeled(label: impl Into<String>) -> Self {
        Self::new().with_label(label)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_style(mut self, line: LineStyle) -> Self {
        self.style.line = line;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.style.color = Some(color);
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn style(&self) -> &EdgeStyle {
        &self.style
    }
}

impl From<&str> for EdgeSpec {
    fn from(label: &str) -> Self {
        Self::labeled(label)
    }
}

/// The target side of a connection declaration: one node or an ordered sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targets(Vec<NodeHandle>);

impl Targets {
    pub fn as_slice(&self) -> &[NodeHandle] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<NodeHandle> {
        self.0
    }
}

impl From<NodeHandle> for Targets {
    fn from(handle: NodeHandle) -> Self {
        Self(vec![handle])
    }
}

impl From<Vec<NodeHandle>> for Targets {
    fn from(handles: Vec<NodeHandle>) -> Self {
        Self(handles)
    }
}

impl From<&Vec<NodeHandle>> for Targets {
    fn from(handles: &Vec<NodeHandle>) -> Self {
        Self(handles.clone())
    }
}

impl From<&[NodeHandle]> for Targets {
    fn from(handles: &[NodeHandle]) -> Self {
        Self(handles.to_vec())
    }
}

impl<const N: usize> From<[NodeHandle; N]> for Targets {
    fn from(handles: [NodeHandle; N]) -> Self {
        Self(handles.to_vec())
    }
}

impl<const N: usize> From<&[NodeHandle; N]> for Targets {
    fn from(handles: &[NodeHandle; N]) -> Self {
        Self(handles.to_vec())
    }
}

/// One declared connection, before fan-out expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeIntent {
    source: NodeId,
    targets: Vec<NodeId>,
    spec: EdgeSpec,
}

impl EdgeIntent {
    pub fn new(source: NodeId, targets: Vec<NodeId>, spec: EdgeSpec) -> Self {
        Self {
            source,
            targets,
            spec,
        }
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn targets(&self) -> &[NodeId] {
        &self.targets
    }

    pub fn spec(&self) -> &EdgeSpec {
        &self.spec
    }

    /// Returns `true` when this intent names more than one target.
    pub fn is_fan_out(&self) -> bool {
        self.targets.len() > 1
    }

    /// Expands the intent into one edge per target, in target order.
    ///
    /// # Arguments
    ///
    /// * `intent_index` - Position of this intent among the diagram's
    ///   declarations, recorded on each produced edge
    pub fn expand(&self, intent_index: usize) -> impl Iterator<Item = Edge> + '_ {
        self.targets.iter().map(move |&target| Edge {
            source: self.source,
            target,
            label: self.spec.label.clone(),
            style: self.spec.style.clone(),
            intent: intent_index,
        })
    }
}

/// A single directed edge after expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    source: NodeId,
    target: NodeId,
    label: Option<String>,
    style: EdgeStyle,
    intent: usize,
}

impl Edge {
    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn style(&self) -> &EdgeStyle {
        &self.style
    }

    /// Returns the index of the declaration that produced this edge.
    pub fn intent(&self) -> usize {
        self.intent
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn ids(range: std::ops::Range<usize>) -> Vec<NodeId> {
        range.map(NodeId::new).collect()
    }

    #[test]
    fn test_single_target_expands_to_one_edge() {
        let intent = EdgeIntent::new(NodeId::new(0), ids(1..2), EdgeSpec::labeled("WebUI"));
        let edges: Vec<Edge> = intent.expand(0).collect();

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source(), NodeId::new(0));
        assert_eq!(edges[0].target(), NodeId::new(1));
        assert_eq!(edges[0].label(), Some("WebUI"));
        assert!(!intent.is_fan_out());
    }

    #[test]
    fn test_empty_targets_expand_to_nothing() {
        let intent = EdgeIntent::new(NodeId::new(0), Vec::new(), EdgeSpec::labeled("unused"));
        assert_eq!(intent.expand(0).count(), 0);
        assert!(!intent.is_fan_out());
    }

    #[test]
    fn test_parallel_targets_are_not_deduplicated() {
        let target = NodeId::new(1);
        let intent = EdgeIntent::new(NodeId::new(0), vec![target, target], EdgeSpec::new());
        let edges: Vec<Edge> = intent.expand(7).collect();

        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|edge| edge.target() == target));
        assert!(edges.iter().all(|edge| edge.intent() == 7));
    }

    #[test]
    fn test_style_is_shared_by_every_expanded_edge() {
        let spec = EdgeSpec::new()
            .with_style(LineStyle::Dotted)
            .with_color(Color::new("red").unwrap());
        let intent = EdgeIntent::new(NodeId::new(0), ids(1..4), spec);

        for edge in intent.expand(0) {
            assert_eq!(edge.style().line(), LineStyle::Dotted);
            assert_eq!(edge.style().color(), Some(Color::new("#ff0000").unwrap()));
            assert_eq!(edge.label(), None);
        }
    }

    #[test]
    fn test_line_style_parsing() {
        assert_eq!("dashed".parse::<LineStyle>(), Ok(LineStyle::Dashed));
        assert_eq!(LineStyle::Bold.to_string(), "bold");
        assert!("wavy".parse::<LineStyle>().is_err());
        assert!(EdgeStyle::default().is_default());
    }

    #[test]
    fn test_targets_conversions() {
        let diagram = crate::identifier::DiagramId::next();
        let a = NodeHandle::new(diagram, NodeId::new(0));
        let b = NodeHandle::new(diagram, NodeId::new(1));

        assert_eq!(Targets::from(a).len(), 1);
        assert_eq!(Targets::from([a, b]).as_slice(), &[a, b]);
        assert_eq!(Targets::from(&vec![b, a]).into_vec(), vec![b, a]);
        assert!(Targets::from(Vec::<NodeHandle>::new()).is_empty());
    }

    proptest! {
        #[test]
        fn fan_out_produces_one_edge_per_target_in_order(
            targets in prop::collection::vec(0usize..16, 0..24),
            label in "[A-Za-z ]{0,12}",
        ) {
            let target_ids: Vec<NodeId> = targets.iter().copied().map(NodeId::new).collect();
            let intent = EdgeIntent::new(
                NodeId::new(99),
                target_ids.clone(),
                EdgeSpec::labeled(label.clone()),
            );

            let edges: Vec<Edge> = intent.expand(3).collect();

            prop_assert_eq!(edges.len(), target_ids.len());
            for (edge, expected) in edges.iter().zip(&target_ids) {
                prop_assert_eq!(edge.source(), NodeId::new(99));
                prop_assert_eq!(edge.target(), *expected);
                prop_assert_eq!(edge.label(), Some(label.as_str()));
                prop_assert_eq!(edge.intent(), 3);
            }
        }
    }
}
