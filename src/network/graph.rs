//! Undirected graph of a water distribution network.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::warn;

use super::inp::NetworkDescription;
use crate::error::{KeyKind, PlumeError, Result};
use crate::pollution::NodeSeries;

/// Scale applied to normalised demand when sizing nodes.
pub const NODE_SCALING: f64 = 15.0;

/// Fraction of the layout extent added as padding on each side.
const LAYOUT_PADDING: f64 = 1.0 / 20.0;

/// Type of a network node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Junction,
    Reservoir,
    Tank,
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Junction => "Junction",
            NodeKind::Reservoir => "Reservoir",
            NodeKind::Tank => "Tank",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "junction" => Ok(NodeKind::Junction),
            "reservoir" => Ok(NodeKind::Reservoir),
            "tank" => Ok(NodeKind::Tank),
            other => Err(format!("unknown node type: {}", other)),
        }
    }
}

/// A node with the attributes shown when inspecting it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    /// `None` for reservoirs, which are defined by head instead.
    pub elevation: Option<f64>,
    /// Mean base demand; `None` for nodes that have no demand.
    pub demand: Option<f64>,
    pub position: (f64, f64),
}

/// A pipe, pump or valve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub name: String,
    pub from: String,
    pub to: String,
}

/// Axis-aligned bounds of the node layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutBounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

/// Network topology with per-node attributes and display positions.
#[derive(Debug, Clone)]
pub struct NetworkGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_lookup: HashMap<String, usize>,
    /// Edge indices touching each node, in edge order.
    incidence: Vec<Vec<usize>>,
}

impl NetworkGraph {
    /// Build the graph from a parsed description, shifting every position
    /// by `offset`.
    pub fn from_description(description: NetworkDescription, offset: (f64, f64)) -> Result<Self> {
        let NetworkDescription {
            nodes: raw_nodes,
            links,
            demands,
            coordinates,
        } = description;

        let mut nodes = Vec::with_capacity(raw_nodes.len());
        let mut node_lookup = HashMap::with_capacity(raw_nodes.len());
        for raw in raw_nodes {
            if node_lookup.contains_key(&raw.name) {
                return Err(invalid(format!("duplicate node {}", raw.name)));
            }
            let demand = match (raw.kind, demands.get(&raw.name)) {
                (NodeKind::Junction, Some(list)) if !list.is_empty() => {
                    Some(list.iter().sum::<f64>() / list.len() as f64)
                }
                (NodeKind::Junction, _) => raw.base_demand,
                _ => None,
            };
            let (x, y) = coordinates.get(&raw.name).copied().unwrap_or_else(|| {
                warn!("Node {} has no coordinates, placing at origin", raw.name);
                (0.0, 0.0)
            });
            node_lookup.insert(raw.name.clone(), nodes.len());
            nodes.push(Node {
                name: raw.name,
                kind: raw.kind,
                elevation: raw.elevation,
                demand,
                position: (x + offset.0, y + offset.1),
            });
        }

        let mut incidence = vec![Vec::new(); nodes.len()];
        let mut edges = Vec::with_capacity(links.len());
        for link in links {
            let from = *node_lookup
                .get(&link.from)
                .ok_or_else(|| invalid(format!("link {} starts at unknown node {}", link.name, link.from)))?;
            let to = *node_lookup
                .get(&link.to)
                .ok_or_else(|| invalid(format!("link {} ends at unknown node {}", link.name, link.to)))?;
            incidence[from].push(edges.len());
            if to != from {
                incidence[to].push(edges.len());
            }
            edges.push(Edge {
                name: link.name,
                from: link.from,
                to: link.to,
            });
        }

        Ok(Self {
            nodes,
            edges,
            node_lookup,
            incidence,
        })
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn contains(&self, name: &str) -> bool {
        self.node_lookup.contains_key(name)
    }

    pub fn node(&self, name: &str) -> Result<&Node> {
        self.node_lookup
            .get(name)
            .map(|i| &self.nodes[*i])
            .ok_or_else(|| PlumeError::key_not_found(KeyKind::Node, name))
    }

    /// Adjacent nodes with the links connecting them, in first-seen order.
    pub fn neighbours(&self, name: &str) -> Result<Vec<(&str, Vec<&str>)>> {
        let index = *self
            .node_lookup
            .get(name)
            .ok_or_else(|| PlumeError::key_not_found(KeyKind::Node, name))?;

        let mut result: Vec<(&str, Vec<&str>)> = Vec::new();
        for edge in self.incidence[index].iter().map(|e| &self.edges[*e]) {
            let other = if edge.from == name { &edge.to } else { &edge.from };
            match result.iter_mut().find(|(n, _)| *n == other.as_str()) {
                Some((_, links)) => links.push(edge.name.as_str()),
                None => result.push((other.as_str(), vec![edge.name.as_str()])),
            }
        }
        Ok(result)
    }

    /// Adjacency as a single line, e.g. `"J-2: P-2 | R-1: P-1"`.
    pub fn connected_description(&self, name: &str) -> Result<String> {
        let parts: Vec<String> = self
            .neighbours(name)?
            .into_iter()
            .map(|(node, links)| format!("{}: {}", node, links.join(" ")))
            .collect();
        Ok(parts.join(" | "))
    }

    /// Each node's demand divided by the largest demand, in node order.
    ///
    /// Nodes without demand count as zero.
    pub fn normalised_demands(&self) -> Vec<f64> {
        let demands: Vec<f64> = self.nodes.iter().map(|n| n.demand.unwrap_or(0.0)).collect();
        let max = demands.iter().copied().fold(0.0, f64::max);
        if max == 0.0 {
            return vec![0.0; demands.len()];
        }
        demands.into_iter().map(|d| d / max).collect()
    }

    /// Display size of each node: a base size grown by relative demand.
    pub fn node_sizes(&self, base: f64) -> Vec<f64> {
        self.normalised_demands()
            .into_iter()
            .map(|d| base + d * NODE_SCALING)
            .collect()
    }

    /// Bounding box of all positions, padded on every side.
    ///
    /// Returns `None` for a graph with no nodes.
    pub fn layout_bounds(&self) -> Option<LayoutBounds> {
        let first = self.nodes.first()?.position;
        let (mut x_min, mut x_max, mut y_min, mut y_max) = (first.0, first.0, first.1, first.1);
        for (x, y) in self.nodes.iter().map(|n| n.position) {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        let x_pad = (x_max - x_min) * LAYOUT_PADDING;
        let y_pad = (y_max - y_min) * LAYOUT_PADDING;
        Some(LayoutBounds {
            x: (x_min - x_pad, x_max + x_pad),
            y: (y_min - y_pad, y_max + y_pad),
        })
    }

    /// Concentration along each edge: the mean of its two endpoints.
    ///
    /// Endpoints absent from the series count as zero.
    pub fn edge_concentrations(&self, series: &NodeSeries<'_>) -> Vec<f64> {
        self.edges
            .iter()
            .map(|edge| {
                let a = series.get(&edge.from).unwrap_or(0.0);
                let b = series.get(&edge.to).unwrap_or(0.0);
                (a + b) / 2.0
            })
            .collect()
    }
}

fn invalid(reason: String) -> PlumeError {
    PlumeError::InvalidNetwork {
        path: Default::default(),
        line: 0,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::inp;
    use crate::pollution::ScenarioTable;
    use std::path::Path;

    const SAMPLE: &str = "\
[JUNCTIONS]
 J-1  100  4.0
 J-2  90   0
[RESERVOIRS]
 R-1  150
[TANKS]
 T-1  120  10  0  20  50
[PIPES]
 P-1  R-1  J-1  1000  12  100  0  Open
 P-2  J-1  J-2  500   8   100  0  Open
 P-3  J-1  J-2  500   8   100  0  Open
[VALVES]
 V-1  J-2  T-1  8  PRV  50  0
[DEMANDS]
 J-2  1.0
 J-2  3.0
[COORDINATES]
 J-1  0.0  0.0
 J-2  10.0 0.0
 R-1  0.0  20.0
 T-1  10.0 20.0
";

    fn sample_graph() -> NetworkGraph {
        let desc = inp::parse(Path::new("sample.inp"), SAMPLE).unwrap();
        NetworkGraph::from_description(desc, (0.0, 0.0)).unwrap()
    }

    #[test]
    fn test_node_attributes() {
        let graph = sample_graph();
        assert_eq!(graph.nodes().len(), 4);
        assert_eq!(graph.edges().len(), 4);

        let j2 = graph.node("J-2").unwrap();
        assert_eq!(j2.kind, NodeKind::Junction);
        assert_eq!(j2.demand, Some(2.0));

        let r1 = graph.node("R-1").unwrap();
        assert_eq!(r1.elevation, None);
        assert_eq!(r1.demand, None);

        assert!(graph.node("X").unwrap_err().is_key_not_found(KeyKind::Node));
    }

    #[test]
    fn test_connected_description() {
        let graph = sample_graph();
        assert_eq!(
            graph.connected_description("J-1").unwrap(),
            "R-1: P-1 | J-2: P-2 P-3"
        );
        assert_eq!(graph.connected_description("T-1").unwrap(), "J-2: V-1");
    }

    #[test]
    fn test_normalised_demands_and_sizes() {
        let graph = sample_graph();
        assert_eq!(graph.normalised_demands(), vec![1.0, 0.5, 0.0, 0.0]);
        assert_eq!(graph.node_sizes(8.0), vec![23.0, 15.5, 8.0, 8.0]);
    }

    #[test]
    fn test_layout_bounds_padded() {
        let graph = sample_graph();
        let bounds = graph.layout_bounds().unwrap();
        assert_eq!(bounds.x, (-0.5, 10.5));
        assert_eq!(bounds.y, (-1.0, 21.0));
    }

    #[test]
    fn test_offset_applied() {
        let desc = inp::parse(Path::new("sample.inp"), SAMPLE).unwrap();
        let graph = NetworkGraph::from_description(desc, (5.0, -5.0)).unwrap();
        assert_eq!(graph.node("T-1").unwrap().position, (15.0, 15.0));
    }

    #[test]
    fn test_edge_concentrations() {
        let graph = sample_graph();
        let table = ScenarioTable::new(
            Path::new("t.json"),
            vec!["J-1".into(), "J-2".into(), "R-1".into()],
            vec![0, 30],
            vec![vec![0.0, 0.0, 0.0], vec![4.0, 2.0, 0.0]],
        )
        .unwrap();
        let edges = graph.edge_concentrations(&table.series_at(30));
        // T-1 is not a column, so V-1 averages J-2 with zero.
        assert_eq!(edges, vec![2.0, 3.0, 3.0, 1.0]);
    }

    #[test]
    fn test_link_to_unknown_node() {
        let content = "[JUNCTIONS]\n J-1 0\n[PIPES]\n P-1 J-1 J-9 1 1 1\n";
        let desc = inp::parse(Path::new("bad.inp"), content).unwrap();
        let err = NetworkGraph::from_description(desc, (0.0, 0.0)).unwrap_err();
        assert!(err.to_string().contains("unknown node J-9"));
    }

    #[test]
    fn test_node_kind_from_str() {
        assert_eq!("tank".parse::<NodeKind>(), Ok(NodeKind::Tank));
        assert!("pump".parse::<NodeKind>().is_err());
    }
}
