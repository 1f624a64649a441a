//! Graphviz rendering.
//!
//! Translates a [`TopologyGraph`] into a DOT digraph and hands it to the
//! `dot` layout engine. Clusters become `subgraph cluster_<n>` blocks nested
//! like the cluster tree, nodes are emitted inside their immediate cluster,
//! and edges follow at the top level in declaration order so the output is
//! reproducible.

use std::{fmt, fs, path::PathBuf};

use dot_generator::id;
use dot_structures::{Attribute, EdgeTy, GraphAttributes, Id, NodeId, Stmt, Subgraph, Vertex};
use graphviz_rust::{
    cmd::{CommandArg, Format},
    exec,
    printer::{DotPrinter, PrinterContext},
};
use log::{debug, info};

use topology_core::{
    cluster::{Cluster, Member},
    color::Color,
    edge::{Edge, LineStyle},
    graph::TopologyGraph,
    node::Node,
};

use super::{
    Error, ImageFormat, RenderOutput, Renderer,
    icons::{IconAsset, IconRegistry},
    output_path,
};
use crate::{config::AppConfig, error::TopologyError};

const FONT_COLOR: &str = "#2D3436";
const EDGE_COLOR: &str = "#7B8894";
const CLUSTER_PEN_COLOR: &str = "#AEB6BE";
const CLUSTER_BACKGROUNDS: [&str; 4] = ["#E5F5FD", "#EBF3E7", "#ECE8F6", "#FDF7E3"];

/// Renders topology graphs through the Graphviz `dot` engine.
///
/// # Examples
///
/// ```rust,no_run
/// use topology::export::{ImageFormat, graphviz::GraphvizRenderer};
///
/// let renderer = GraphvizRenderer::new("docs/diagrams").with_format(ImageFormat::Svg);
/// assert_eq!(renderer.format(), ImageFormat::Svg);
/// ```
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    output_dir: PathBuf,
    format: ImageFormat,
    font_name: String,
    background: Option<Color>,
    icons: IconRegistry,
}

impl GraphvizRenderer {
    /// Creates a PNG renderer writing into `output_dir`, with no icon assets configured.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: ImageFormat::default(),
            font_name: "Sans-Serif".to_string(),
            background: None,
            icons: IconRegistry::default(),
        }
    }

    /// Creates a renderer from the render, style and icon sections of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::Config`] if the configured background color is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, TopologyError> {
        let background = config
            .style()
            .background_color()
            .map_err(TopologyError::Config)?;

        Ok(Self::new(config.render().output_dir())
            .with_format(config.render().format())
            .with_font_name(config.style().font_name())
            .with_background(background)
            .with_icons(IconRegistry::from_config(config.icons())))
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_font_name(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = font_name.into();
        self
    }

    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    pub fn with_icons(mut self, icons: IconRegistry) -> Self {
        self.icons = icons;
        self
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn output_dir(&self) -> &std::path::Path {
        &self.output_dir
    }

    /// Translates `graph` into a DOT digraph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAsset`] if a node's icon resolves to a missing file.
    pub fn to_dot(&self, graph: &TopologyGraph) -> Result<dot_structures::Graph, Error> {
        let mut stmts = vec![
            Stmt::GAttribute(GraphAttributes::Graph(self.graph_attributes(graph))),
            Stmt::GAttribute(GraphAttributes::Node(self.node_defaults())),
            Stmt::GAttribute(GraphAttributes::Edge(self.edge_defaults())),
        ];

        for member in graph.roots() {
            stmts.push(self.member_stmt(graph, *member)?);
        }
        stmts.extend(graph.edges().map(|edge| Stmt::Edge(edge_stmt(edge))));

        Ok(dot_structures::Graph::DiGraph {
            id: escaped(graph.filename()),
            strict: false,
            stmts,
        })
    }

    /// Translates `graph` into DOT source text.
    pub fn to_dot_string(&self, graph: &TopologyGraph) -> Result<String, Error> {
        let dot = self.to_dot(graph)?;
        Ok(dot.print(&mut PrinterContext::default()))
    }

    fn graph_attributes(&self, graph: &TopologyGraph) -> Vec<Attribute> {
        let mut attributes = vec![
            attr("label", escaped(graph.title())),
            attr("labelloc", plain("t")),
            attr("rankdir", plain(graph.direction())),
            attr("pad", plain("2.0")),
            attr("splines", plain("ortho")),
            attr("nodesep", plain("0.60")),
            attr("ranksep", plain("0.75")),
            attr("fontname", escaped(&self.font_name)),
            attr("fontsize", plain(15)),
            attr("fontcolor", escaped(FONT_COLOR)),
        ];
        if let Some(background) = self.background {
            attributes.push(attr("bgcolor", escaped(&background.to_hex_string())));
        }
        attributes
    }

    fn node_defaults(&self) -> Vec<Attribute> {
        vec![
            attr("shape", plain("box")),
            attr("style", plain("rounded")),
            attr("fixedsize", plain("true")),
            attr("width", plain("1.4")),
            attr("height", plain("1.4")),
            attr("labelloc", plain("b")),
            attr("imagescale", plain("true")),
            attr("fontname", escaped(&self.font_name)),
            attr("fontsize", plain(13)),
            attr("fontcolor", escaped(FONT_COLOR)),
        ]
    }

    fn edge_defaults(&self) -> Vec<Attribute> {
        vec![
            attr("color", escaped(EDGE_COLOR)),
            attr("fontname", escaped(&self.font_name)),
            attr("fontsize", plain(13)),
            attr("fontcolor", escaped(FONT_COLOR)),
        ]
    }

    fn member_stmt(&self, graph: &TopologyGraph, member: Member) -> Result<Stmt, Error> {
        match member {
            Member::Node(id) => {
                let node = graph
                    .node(id)
                    .ok_or_else(|| Error::Render(format!("node {id} is not in the graph")))?;
                Ok(Stmt::Node(self.node_stmt(node)?))
            }
            Member::Cluster(id) => {
                let cluster = graph
                    .cluster(id)
                    .ok_or_else(|| Error::Render(format!("{id} is not in the graph")))?;
                Ok(Stmt::Subgraph(self.cluster_subgraph(graph, cluster)?))
            }
        }
    }

    fn cluster_subgraph(
        &self,
        graph: &TopologyGraph,
        cluster: &Cluster,
    ) -> Result<Subgraph, Error> {
        let background = CLUSTER_BACKGROUNDS[cluster.depth() % CLUSTER_BACKGROUNDS.len()];
        let mut stmts = vec![
            Stmt::Attribute(attr("label", escaped(cluster.label()))),
            Stmt::Attribute(attr("style", plain("rounded"))),
            Stmt::Attribute(attr("labeljust", plain("l"))),
            Stmt::Attribute(attr("pencolor", escaped(CLUSTER_PEN_COLOR))),
            Stmt::Attribute(attr("bgcolor", escaped(background))),
            Stmt::Attribute(attr("fontname", escaped(&self.font_name))),
            Stmt::Attribute(attr("fontsize", plain(12))),
        ];
        for member in cluster.members() {
            stmts.push(self.member_stmt(graph, *member)?);
        }

        Ok(Subgraph {
            id: plain(cluster.id()),
            stmts,
        })
    }

    fn node_stmt(&self, node: &Node) -> Result<dot_structures::Node, Error> {
        let mut attributes = vec![attr("label", escaped(node.label()))];

        match self.icons.resolve(node.icon())? {
            IconAsset::Image(path) => {
                let extra_lines = node.label().matches('\n').count();
                attributes.push(attr("shape", plain("none")));
                attributes.push(attr("image", escaped(&path.display().to_string())));
                attributes.push(attr(
                    "height",
                    plain(format!("{:.1}", 1.9 + 0.4 * extra_lines as f64)),
                ));
            }
            IconAsset::Shape(shape) => {
                attributes.push(attr("shape", plain(shape)));
                attributes.push(attr("fixedsize", plain("false")));
                attributes.push(attr("labelloc", plain("c")));
            }
        }

        Ok(dot_structures::Node {
            id: NodeId(plain(node.id()), None),
            attributes,
        })
    }
}

impl Renderer for GraphvizRenderer {
    fn render(&self, graph: &TopologyGraph) -> Result<RenderOutput, Error> {
        // Icons are resolved here, before anything touches the output directory.
        let dot = self.to_dot(graph)?;

        fs::create_dir_all(&self.output_dir)?;
        let path = output_path(&self.output_dir, graph, self.format);
        info!(
            title = graph.title(),
            path = path.display().to_string(),
            format:% = self.format;
            "Rendering diagram"
        );

        let mut ctx = PrinterContext::default();
        match self.format {
            ImageFormat::Dot => fs::write(&path, dot.print(&mut ctx))?,
            format => {
                exec(
                    dot,
                    &mut ctx,
                    vec![
                        CommandArg::Format(graphviz_format(format)),
                        CommandArg::Output(path.to_string_lossy().into_owned()),
                    ],
                )
                .map_err(|err| {
                    Error::Render(format!("graphviz failed for {}: {err}", path.display()))
                })?;
            }
        }

        debug!(path = path.display().to_string(); "Diagram written");
        Ok(RenderOutput::new(path))
    }
}

fn graphviz_format(format: ImageFormat) -> Format {
    match format {
        ImageFormat::Png => Format::Png,
        ImageFormat::Svg => Format::Svg,
        ImageFormat::Jpg => Format::Jpg,
        ImageFormat::Pdf => Format::Pdf,
        ImageFormat::Dot => Format::Dot,
    }
}

fn edge_stmt(edge: &Edge) -> dot_structures::Edge {
    let mut attributes = Vec::new();
    if let Some(label) = edge.label() {
        attributes.push(attr("label", escaped(label)));
    }
    if edge.style().line() != LineStyle::Solid {
        attributes.push(attr("style", plain(edge.style().line())));
    }
    if let Some(color) = edge.style().color() {
        attributes.push(attr("color", escaped(&color.to_hex_string())));
    }

    dot_structures::Edge {
        ty: EdgeTy::Pair(
            Vertex::N(NodeId(plain(edge.source()), None)),
            Vertex::N(NodeId(plain(edge.target()), None)),
        ),
        attributes,
    }
}

fn attr(key: &str, value: Id) -> Attribute {
    Attribute(id!(key), value)
}

fn plain(value: impl fmt::Display) -> Id {
    id!(value)
}

/// Quotes `text` as a DOT string, keeping newlines as `\n` line breaks.
fn escaped(text: &str) -> Id {
    let mut quoted = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(ch),
        }
    }
    id!(esc quoted)
}
