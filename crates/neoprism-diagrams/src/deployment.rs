//! The NeoPRISM deployment topologies.
//!
//! Each topology is a plain sequence of declarations against its own
//! [`Diagram`]. The `declare_*` functions only declare, so they can be
//! inspected through [`Diagram::graph`]; the `deploy_*` functions open the
//! diagram, declare, and render it.

use log::info;

use topology::{
    Diagram, RenderOutput, Renderer, TopologyError,
    edge::EdgeSpec,
    graph::Direction,
    node::NodeKind,
};

/// Custom icon of the Cardano node, relative to the custom icon directory.
pub const CARDANO_ICON: &str = "cardano.png";

pub const STANDALONE_TITLE: &str = "Standalone mode";
pub const STANDALONE_FILENAME: &str = "deploy_standalone";

pub const HA_TITLE: &str = "High-availability mode";
pub const HA_FILENAME: &str = "deploy_ha";

/// Declares the standalone topology: a single NeoPRISM instance with its
/// own database, reaching the Cardano node directly.
pub fn declare_standalone(diagram: &mut Diagram<'_>) -> Result<(), TopologyError> {
    let cardano = diagram.cluster("Internet", |diagram| {
        diagram.custom("Cardano node", CARDANO_ICON)
    });

    let (neoprism, database) = diagram.cluster("On-prem", |diagram| {
        (
            diagram.node(NodeKind::Compute, "NeoPRISM\n(standalone)"),
            diagram.node(NodeKind::Database, ""),
        )
    });

    let user = diagram.node(NodeKind::Person, "Users");
    let client = diagram.node(NodeKind::CliClient, "API clients");

    diagram.connect(user, neoprism, EdgeSpec::labeled("WebUI"))?;
    diagram.connect(client, neoprism, EdgeSpec::labeled("Resolver API"))?;
    diagram.connect(neoprism, cardano, EdgeSpec::new())?;
    diagram.connect(neoprism, database, EdgeSpec::new())?;

    Ok(())
}

/// Declares the high-availability topology: three NeoPRISM servers behind a
/// reverse proxy and a separate worker syncing from the Cardano node, all
/// sharing one database.
pub fn declare_ha(diagram: &mut Diagram<'_>) -> Result<(), TopologyError> {
    let cardano = diagram.cluster("Internet", |diagram| {
        diagram.custom("Cardano node", CARDANO_ICON)
    });

    let (reverse_proxy, servers, worker, database) = diagram.cluster("On-prem", |diagram| {
        let reverse_proxy = diagram.node(NodeKind::ReverseProxy, "");
        let servers = [
            diagram.node(NodeKind::Compute, "NeoPRISM\n(server)"),
            diagram.node(NodeKind::Compute, "NeoPRISM\n(server)"),
            diagram.node(NodeKind::Compute, "NeoPRISM\n(server)"),
        ];
        let worker = diagram.node(NodeKind::Compute, "NeoPRISM\n(worker)");
        let database = diagram.node(NodeKind::Database, "");
        (reverse_proxy, servers, worker, database)
    });

    let user = diagram.node(NodeKind::Person, "Users");
    let client = diagram.node(NodeKind::CliClient, "API clients");

    diagram.connect(user, reverse_proxy, EdgeSpec::labeled("WebUI"))?;
    diagram.connect(client, reverse_proxy, EdgeSpec::labeled("Resolver API"))?;
    diagram.connect(reverse_proxy, servers, EdgeSpec::new())?;
    diagram.connect(worker, cardano, EdgeSpec::new())?;
    diagram.connect(worker, database, EdgeSpec::new())?;
    diagram.connect_from(servers, database, EdgeSpec::new())?;

    Ok(())
}

/// Renders the standalone topology.
///
/// # Errors
///
/// Returns the first declaration error, or the render error if rendering failed.
pub fn deploy_standalone(renderer: &dyn Renderer) -> Result<RenderOutput, TopologyError> {
    info!(title = STANDALONE_TITLE; "Building deployment diagram");
    Diagram::open(STANDALONE_TITLE, Direction::TopToBottom, renderer)
        .with_filename(STANDALONE_FILENAME)
        .scope(declare_standalone)
}

/// Renders the high-availability topology.
///
/// # Errors
///
/// Returns the first declaration error, or the render error if rendering failed.
pub fn deploy_ha(renderer: &dyn Renderer) -> Result<RenderOutput, TopologyError> {
    info!(title = HA_TITLE; "Building deployment diagram");
    Diagram::open(HA_TITLE, Direction::TopToBottom, renderer)
        .with_filename(HA_FILENAME)
        .scope(declare_ha)
}
