//! Scoped diagram declarations.
//!
//! A [`Diagram`] is the drawing context that collects nodes, clusters and
//! connections and hands the finished graph to a [`Renderer`] exactly once.
//!
//! # Builder stack
//!
//! Declarations are routed to the innermost open frame of an explicit stack:
//! the diagram root at the bottom, one frame per open cluster above it. A
//! node or cluster becomes a member of whichever frame is on top when it is
//! declared, which keeps containment a tree.
//!
//! # Lifecycle
//!
//! - [`Diagram::open`] starts a scope.
//! - [`Diagram::close`] consumes the diagram and renders it, so a closed
//!   diagram cannot be declared into again.
//! - A diagram dropped without being closed (early return, `?`, panic) is
//!   rendered by its `Drop` implementation instead. This also happens while
//!   unwinding from a panicking declaration, so a [`Renderer`] that panics
//!   at that point aborts the process. Renderers report failures through
//!   their `Result` instead.
//! - [`Diagram::scope`] runs a declaration closure and closes afterwards,
//!   whatever the closure returned.
//!
//! # Examples
//!
//! ```rust,no_run
//! use topology::{
//!     Diagram,
//!     edge::EdgeSpec,
//!     export::graphviz::GraphvizRenderer,
//!     graph::Direction,
//!     node::NodeKind,
//! };
//!
//! let renderer = GraphvizRenderer::new("out");
//! let output = Diagram::open("Standalone mode", Direction::TopToBottom, &renderer)
//!     .scope(|diagram| {
//!         let server = diagram.cluster("On-prem", |diagram| {
//!             diagram.node(NodeKind::Compute, "NeoPRISM")
//!         });
//!         let user = diagram.node(NodeKind::Person, "Users");
//!         diagram.connect(user, server, EdgeSpec::labeled("WebUI"))?;
//!         Ok(())
//!     })
//!     .expect("render failed");
//! println!("{}", output.path().display());
//! ```

use std::path::PathBuf;

use log::{debug, error, info, trace, warn};

use topology_core::{
    ScopeError,
    cluster::{Cluster, Member},
    edge::{EdgeIntent, EdgeSpec, Targets},
    graph::{Direction, GraphHeader, TopologyGraph, filename_from_title},
    identifier::{ClusterHandle, ClusterId, DiagramId, NodeHandle, NodeId},
    node::{Node, NodeKind},
};

use crate::{
    error::TopologyError,
    export::{self, RenderOutput, Renderer},
};

/// An open diagram scope.
///
/// Rendering happens exactly once: on [`Diagram::close`], or on drop when the
/// diagram was never closed. The drop path runs even while a panic unwinds;
/// a renderer must not panic then, since a second panic aborts.
pub struct Diagram<'r> {
    id: DiagramId,
    header: GraphHeader,
    renderer: &'r dyn Renderer,
    nodes: Vec<Node>,
    clusters: Vec<Cluster>,
    roots: Vec<Member>,
    /// Open clusters above the root frame, innermost last.
    stack: Vec<ClusterId>,
    intents: Vec<EdgeIntent>,
    rendered: bool,
}

impl<'r> Diagram<'r> {
    /// Opens a diagram scope.
    ///
    /// The output filename is derived from `title`; see [`filename_from_title`].
    ///
    /// # Arguments
    ///
    /// * `title` - Title drawn on the diagram
    /// * `direction` - Rank direction hint for the layout engine
    /// * `renderer` - Renderer invoked when the scope ends
    pub fn open(title: &str, direction: Direction, renderer: &'r dyn Renderer) -> Self {
        let id = DiagramId::next();
        let header = GraphHeader::new(title, filename_from_title(title), direction);
        info!(diagram:% = id, title, direction:%; "Opening diagram");

        Self {
            id,
            header,
            renderer,
            nodes: Vec::new(),
            clusters: Vec::new(),
            roots: Vec::new(),
            stack: Vec::new(),
            intents: Vec::new(),
            rendered: false,
        }
    }

    /// Overrides the derived output filename (without extension).
    ///
    /// A blank `filename` keeps the name derived from the title.
    pub fn with_filename(mut self, filename: &str) -> Self {
        let filename = match filename.trim() {
            "" => filename_from_title(self.title()),
            name => name.to_string(),
        };
        self.header = GraphHeader::new(self.header.title(), filename, self.header.direction());
        self
    }

    pub fn id(&self) -> DiagramId {
        self.id
    }

    pub fn title(&self) -> &str {
        self.header.title()
    }

    pub fn filename(&self) -> &str {
        self.header.filename()
    }

    pub fn direction(&self) -> Direction {
        self.header.direction()
    }

    /// Returns the number of currently open clusters.
    pub fn open_clusters(&self) -> usize {
        self.stack.len()
    }

    /// Declares a node drawn with the builtin icon of `kind`.
    ///
    /// Every call creates a new vertex, even when the label repeats.
    pub fn node(&mut self, kind: NodeKind, label: &str) -> NodeHandle {
        let id = NodeId::new(self.nodes.len());
        let cluster = self.current_cluster();
        self.nodes.push(Node::new(id, kind, label, cluster));
        self.attach(Member::Node(id));
        trace!(node:% = id, kind:%, label; "Declared node");

        NodeHandle::new(self.id, id)
    }

    /// Declares an external-service node drawn with a custom image asset.
    pub fn custom(&mut self, label: &str, icon_path: impl Into<PathBuf>) -> NodeHandle {
        let id = NodeId::new(self.nodes.len());
        let cluster = self.current_cluster();
        self.nodes.push(Node::custom(id, label, icon_path, cluster));
        self.attach(Member::Node(id));
        trace!(node:% = id, label; "Declared custom node");

        NodeHandle::new(self.id, id)
    }

    /// Opens a cluster nested in the innermost open frame.
    ///
    /// Nodes and clusters declared until the matching [`Diagram::exit_cluster`]
    /// become its members.
    pub fn enter_cluster(&mut self, label: &str) -> ClusterHandle {
        let id = ClusterId::new(self.clusters.len());
        let parent = self.current_cluster();
        let depth = self.stack.len();
        self.clusters.push(Cluster::new(id, label, parent, depth));
        self.attach(Member::Cluster(id));
        self.stack.push(id);
        debug!(cluster:% = id, label, depth = self.stack.len(); "Entered cluster");

        ClusterHandle::new(self.id, id)
    }

    /// Closes the innermost open cluster.
    ///
    /// Closing a cluster never renders anything.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::NoOpenCluster`] when only the diagram root is open.
    pub fn exit_cluster(&mut self) -> Result<ClusterHandle, ScopeError> {
        let id = self.stack.pop().ok_or(ScopeError::NoOpenCluster)?;
        debug!(cluster:% = id; "Exited cluster");
        Ok(ClusterHandle::new(self.id, id))
    }

    /// Runs `f` inside a new cluster, closing it on every exit path of `f`.
    ///
    /// Clusters that `f` opened and left open are closed along with it.
    pub fn cluster<R>(&mut self, label: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.enter_cluster(label);
        let depth = self.stack.len();
        let result = f(self);
        self.stack.truncate(depth - 1);
        result
    }

    /// Declares a connection from `source` to each of `targets`, in order.
    ///
    /// A sequence of `N` targets produces `N` edges sharing `spec`; an empty
    /// sequence produces none. Parallel edges are allowed.
    ///
    /// # Errors
    ///
    /// Returns a [`ScopeError`] if any endpoint was not declared in this
    /// diagram. Nothing is recorded in that case.
    pub fn connect(
        &mut self,
        source: NodeHandle,
        targets: impl Into<Targets>,
        spec: EdgeSpec,
    ) -> Result<(), ScopeError> {
        let targets = targets.into();
        let source = self.resolve(source)?;
        let targets = targets
            .as_slice()
            .iter()
            .map(|&target| self.resolve(target))
            .collect::<Result<Vec<_>, _>>()?;

        if targets.is_empty() {
            debug!(source:% = source; "Connection declared with no targets");
        }
        trace!(source:% = source, targets_count = targets.len(), label:? = spec.label(); "Declared connection");
        self.intents.push(EdgeIntent::new(source, targets, spec));
        Ok(())
    }

    /// Declares a connection from each of `sources` to `target`, in order.
    ///
    /// Equivalent to one [`Diagram::connect`] per source with the same spec.
    ///
    /// # Errors
    ///
    /// Returns a [`ScopeError`] if any endpoint was not declared in this
    /// diagram. Nothing is recorded in that case.
    pub fn connect_from(
        &mut self,
        sources: impl Into<Targets>,
        target: NodeHandle,
        spec: EdgeSpec,
    ) -> Result<(), ScopeError> {
        let sources = sources.into();
        let target = self.resolve(target)?;
        let sources = sources
            .as_slice()
            .iter()
            .map(|&source| self.resolve(source))
            .collect::<Result<Vec<_>, _>>()?;

        for source in sources {
            self.intents
                .push(EdgeIntent::new(source, vec![target], spec.clone()));
        }
        Ok(())
    }

    /// Snapshots the graph declared so far, without rendering it.
    pub fn graph(&self) -> TopologyGraph {
        TopologyGraph::from_declarations(
            self.header.clone(),
            self.nodes.clone(),
            self.clusters.clone(),
            self.roots.clone(),
            &self.intents,
        )
    }

    /// Finalizes the diagram and renders it.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::Export`] when the renderer fails.
    pub fn close(mut self) -> Result<RenderOutput, TopologyError> {
        Ok(self.finish()?)
    }

    /// Runs `declare` against this diagram, then closes it.
    ///
    /// The diagram is rendered even when `declare` fails; the declaration
    /// error is returned in preference to a render error.
    pub fn scope<F>(mut self, declare: F) -> Result<RenderOutput, TopologyError>
    where
        F: FnOnce(&mut Self) -> Result<(), TopologyError>,
    {
        let declared = declare(&mut self);
        if let Err(err) = &declared {
            warn!(title = self.title(), err:% = err; "Declaration failed, rendering partial diagram");
        }
        let rendered = self.close();
        if let Err(declare_err) = declared {
            if let Err(err) = &rendered {
                error!(err:% = err; "Rendering partial diagram failed");
            }
            return Err(declare_err);
        }
        rendered
    }

    fn finish(&mut self) -> Result<RenderOutput, export::Error> {
        self.rendered = true;
        if !self.stack.is_empty() {
            debug!(open_clusters = self.stack.len(); "Closing clusters left open");
            self.stack.clear();
        }

        let graph = self.graph();
        let output = self.renderer.render(&graph)?;
        info!(
            title = self.title(),
            path = output.path().display().to_string();
            "Diagram rendered"
        );
        Ok(output)
    }

    fn current_cluster(&self) -> Option<ClusterId> {
        self.stack.last().copied()
    }

    fn attach(&mut self, member: Member) {
        match self.current_cluster() {
            Some(id) => self.clusters[id.index()].add_member(member),
            None => self.roots.push(member),
        }
    }

    fn resolve(&self, handle: NodeHandle) -> Result<NodeId, ScopeError> {
        if handle.diagram() != self.id {
            return Err(ScopeError::ForeignEndpoint {
                endpoint: handle.id(),
                expected: self.id,
                found: handle.diagram(),
            });
        }
        if handle.id().index() >= self.nodes.len() {
            return Err(ScopeError::UnknownEndpoint(handle.id()));
        }
        Ok(handle.id())
    }
}

impl Drop for Diagram<'_> {
    fn drop(&mut self) {
        if self.rendered {
            return;
        }

        warn!(title = self.title(); "Diagram dropped without close, rendering now");
        if let Err(err) = self.finish() {
            error!(title = self.title(), err:err; "Rendering dropped diagram failed");
        }
    }
}
