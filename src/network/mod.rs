//! Water network topology.
//!
//! The network is read from an EPANET `.inp` file and turned into an
//! undirected [`NetworkGraph`] carrying the attributes shown for each node
//! (type, elevation, demand, adjacency) and a 2-D display position.
//!
//! ```text
//! <network dir>/<network>.inp ──▶ inp::parse ──▶ NetworkDescription
//!                                                      │
//! <network dir>/metadata.yml ──▶ layout_offset ────────┤
//!                                                      ▼
//!                                        NetworkGraph::from_description
//! ```

pub mod graph;
pub mod inp;
pub mod metadata;

pub use graph::{Edge, LayoutBounds, NetworkGraph, Node, NodeKind, NODE_SCALING};
pub use inp::NetworkDescription;

use std::path::Path;

use tracing::info;

use crate::catalog;
use crate::error::Result;

impl NetworkGraph {
    /// Load a named network from a data root, applying its layout offset.
    pub fn load(data_root: &Path, network: &str) -> Result<Self> {
        let dir = catalog::existing_network_dir(data_root, network)?;
        let description = inp::load(&inp::inp_path(&dir, network))?;
        let offset = metadata::layout_offset(&dir)?;
        let graph = Self::from_description(description, offset)?;
        info!(
            "Loaded network {} ({} nodes, {} edges)",
            network,
            graph.nodes().len(),
            graph.edges().len()
        );
        Ok(graph)
    }
}
