//! Parser for the subset of the EPANET `.inp` format needed to draw a network.
//!
//! Only node, link, demand and coordinate sections are read; hydraulic
//! options, patterns, curves and controls are skipped.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PlumeError, Result};

use super::graph::NodeKind;

/// A node as declared in a node section.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNode {
    pub name: String,
    pub kind: NodeKind,
    pub elevation: Option<f64>,
    /// Base demand from the `[JUNCTIONS]` line, junctions only.
    pub base_demand: Option<f64>,
}

/// A pipe, pump or valve connecting two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLink {
    pub name: String,
    pub from: String,
    pub to: String,
}

/// Everything read from an `.inp` file.
#[derive(Debug, Clone, Default)]
pub struct NetworkDescription {
    pub nodes: Vec<RawNode>,
    pub links: Vec<RawLink>,
    /// Entries from `[DEMANDS]`; these replace the junction line demand.
    pub demands: HashMap<String, Vec<f64>>,
    pub coordinates: HashMap<String, (f64, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Junctions,
    Reservoirs,
    Tanks,
    Pipes,
    Pumps,
    Valves,
    Demands,
    Coordinates,
    Ignored,
}

impl Section {
    fn from_header(header: &str) -> Self {
        match header.to_ascii_uppercase().as_str() {
            "JUNCTIONS" => Section::Junctions,
            "RESERVOIRS" => Section::Reservoirs,
            "TANKS" => Section::Tanks,
            "PIPES" => Section::Pipes,
            "PUMPS" => Section::Pumps,
            "VALVES" => Section::Valves,
            "DEMANDS" => Section::Demands,
            "COORDINATES" => Section::Coordinates,
            _ => Section::Ignored,
        }
    }
}

struct LineParser<'a> {
    path: &'a Path,
    line: usize,
}

impl LineParser<'_> {
    fn error(&self, reason: impl Into<String>) -> PlumeError {
        PlumeError::InvalidNetwork {
            path: self.path.to_path_buf(),
            line: self.line,
            reason: reason.into(),
        }
    }

    fn field<'f>(&self, fields: &[&'f str], i: usize, what: &str) -> Result<&'f str> {
        fields
            .get(i)
            .copied()
            .ok_or_else(|| self.error(format!("missing {}", what)))
    }

    fn number(&self, fields: &[&str], i: usize, what: &str) -> Result<f64> {
        let raw = self.field(fields, i, what)?;
        raw.parse()
            .map_err(|_| self.error(format!("invalid {} '{}'", what, raw)))
    }

    fn optional_number(&self, fields: &[&str], i: usize, what: &str) -> Result<Option<f64>> {
        if fields.len() > i {
            self.number(fields, i, what).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Read and parse an `.inp` file.
pub fn load(path: &Path) -> Result<NetworkDescription> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PlumeError::DataNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PlumeError::io(path, e)
        }
    })?;
    parse(path, &content)
}

/// Parse `.inp` content. `path` is only used to label errors.
pub fn parse(path: &Path, content: &str) -> Result<NetworkDescription> {
    let mut description = NetworkDescription::default();
    let mut section = Section::Ignored;

    for (i, raw_line) in content.lines().enumerate() {
        let parser = LineParser { path, line: i + 1 };
        let line = raw_line.split(';').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('[') {
            let header = header
                .strip_suffix(']')
                .ok_or_else(|| parser.error("unterminated section header"))?;
            section = Section::from_header(header.trim());
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        match section {
            Section::Junctions => {
                let name = parser.field(&fields, 0, "junction id")?;
                description.nodes.push(RawNode {
                    name: name.to_string(),
                    kind: NodeKind::Junction,
                    elevation: Some(parser.number(&fields, 1, "elevation")?),
                    base_demand: Some(parser.optional_number(&fields, 2, "demand")?.unwrap_or(0.0)),
                });
            }
            Section::Reservoirs => {
                let name = parser.field(&fields, 0, "reservoir id")?;
                parser.number(&fields, 1, "head")?;
                description.nodes.push(RawNode {
                    name: name.to_string(),
                    kind: NodeKind::Reservoir,
                    elevation: None,
                    base_demand: None,
                });
            }
            Section::Tanks => {
                let name = parser.field(&fields, 0, "tank id")?;
                description.nodes.push(RawNode {
                    name: name.to_string(),
                    kind: NodeKind::Tank,
                    elevation: Some(parser.number(&fields, 1, "elevation")?),
                    base_demand: None,
                });
            }
            Section::Pipes | Section::Pumps | Section::Valves => {
                description.links.push(RawLink {
                    name: parser.field(&fields, 0, "link id")?.to_string(),
                    from: parser.field(&fields, 1, "start node")?.to_string(),
                    to: parser.field(&fields, 2, "end node")?.to_string(),
                });
            }
            Section::Demands => {
                let name = parser.field(&fields, 0, "junction id")?;
                let demand = parser.number(&fields, 1, "demand")?;
                description
                    .demands
                    .entry(name.to_string())
                    .or_default()
                    .push(demand);
            }
            Section::Coordinates => {
                let name = parser.field(&fields, 0, "node id")?;
                let x = parser.number(&fields, 1, "x coordinate")?;
                let y = parser.number(&fields, 2, "y coordinate")?;
                description.coordinates.insert(name.to_string(), (x, y));
            }
            Section::Ignored => {}
        }
    }

    Ok(description)
}

/// Path of the `.inp` file inside a network directory.
pub fn inp_path(network_dir: &Path, network: &str) -> PathBuf {
    network_dir.join(format!("{}.inp", network))
}
