//! The collection of all scenarios loaded for one network.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::table::{ScenarioTable, TimeAxis};
use crate::catalog;
use crate::error::{KeyKind, PlumeError, Result};
use crate::network::NetworkGraph;

/// Lower bound used for a logarithmic colour scale when no scenario has any
/// positive concentration.
pub const LOG_SCALE_FLOOR: f64 = 1e-6;

/// File extension of persisted scenario tables.
const TABLE_EXTENSION: &str = "json";

/// Global concentration extremes across every scenario and timestep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConcentrationRange {
    /// Largest concentration seen.
    pub max: f64,
    /// Smallest strictly positive concentration seen, ignoring scenarios
    /// that are zero everywhere. `None` if every scenario is all-zero.
    pub min_positive: Option<f64>,
}

impl ConcentrationRange {
    /// Bounds suitable for a logarithmic scale; the lower bound is always
    /// strictly positive and never above the upper bound.
    pub fn log_bounds(&self) -> (f64, f64) {
        let lo = self.min_positive.unwrap_or(LOG_SCALE_FLOOR);
        (lo, self.max.max(lo))
    }
}

/// Every pollution scenario of a network, keyed by injection node.
///
/// Built once and never mutated, so it can be shared freely between
/// readers.
#[derive(Debug, Clone)]
pub struct PollutionStore {
    scenarios: BTreeMap<String, ScenarioTable>,
    injection_nodes: Vec<String>,
    time_axis: TimeAxis,
    range: ConcentrationRange,
}

impl PollutionStore {
    /// Load every `*.json` scenario table in `dir`.
    ///
    /// Each file's stem is the injection node it describes. Fails with
    /// `DataNotFound` if the directory is missing or holds no tables, and
    /// with `TimeAxisMismatch` if any scenario's timesteps differ from the
    /// default scenario's.
    pub fn load(dir: &Path) -> Result<Self> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PlumeError::DataNotFound {
                    path: dir.to_path_buf(),
                })
            }
            Err(e) => return Err(PlumeError::io(dir, e)),
        };

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| PlumeError::io(dir, e))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == TABLE_EXTENSION) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut scenarios = BTreeMap::new();
        for path in paths {
            let Some(node) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let table = ScenarioTable::load(&path)?;
            debug!(
                "Loaded scenario {} ({} timesteps x {} nodes)",
                node,
                table.index().len(),
                table.columns().len()
            );
            scenarios.insert(node.to_string(), table);
        }

        let store = Self::from_scenarios(scenarios).map_err(|e| match e {
            PlumeError::DataNotFound { .. } => PlumeError::DataNotFound {
                path: dir.to_path_buf(),
            },
            other => other,
        })?;
        info!(
            "Loaded {} pollution scenarios from {} (time axis {})",
            store.len(),
            dir.display(),
            store.time_axis
        );
        Ok(store)
    }

    /// Load the scenarios for a named network under a data root.
    ///
    /// Tables live in `<network dir>/<network>/`.
    pub fn load_network(data_root: &Path, network: &str) -> Result<Self> {
        let dir = catalog::existing_network_dir(data_root, network)?;
        Self::load(&dir.join(network))
    }

    /// Build a store from already-loaded tables.
    pub fn from_scenarios(scenarios: BTreeMap<String, ScenarioTable>) -> Result<Self> {
        let injection_nodes: Vec<String> = scenarios.keys().cloned().collect();
        let Some(default) = injection_nodes.first() else {
            return Err(PlumeError::DataNotFound {
                path: PathBuf::new(),
            });
        };

        let time_axis = scenarios[default].time_axis();
        for (node, table) in &scenarios {
            let found = table.time_axis();
            if found != time_axis {
                return Err(PlumeError::TimeAxisMismatch {
                    scenario: node.clone(),
                    expected: time_axis,
                    found,
                });
            }
        }

        let max = scenarios
            .values()
            .map(ScenarioTable::max_value)
            .fold(0.0, f64::max);
        let mut all_zero = 0;
        let mut min_positive: Option<f64> = None;
        for table in scenarios.values() {
            match table.min_positive() {
                Some(v) => min_positive = Some(min_positive.map_or(v, |m| m.min(v))),
                None => all_zero += 1,
            }
        }
        if all_zero > 0 {
            warn!(
                "{} of {} scenarios are zero everywhere and were excluded from the minimum",
                all_zero,
                scenarios.len()
            );
        }

        Ok(Self {
            scenarios,
            injection_nodes,
            time_axis,
            range: ConcentrationRange { max, min_positive },
        })
    }

    /// Look up the scenario for an injection node.
    pub fn scenario(&self, injection: &str) -> Result<&ScenarioTable> {
        self.scenarios
            .get(injection)
            .ok_or_else(|| PlumeError::key_not_found(KeyKind::Scenario, injection))
    }

    /// Injection node identifiers, sorted.
    pub fn injection_nodes(&self) -> &[String] {
        &self.injection_nodes
    }

    /// The lexicographically first injection node.
    pub fn default_injection(&self) -> &str {
        &self.injection_nodes[0]
    }

    /// Time axis shared by every scenario.
    pub fn time_axis(&self) -> TimeAxis {
        self.time_axis
    }

    pub fn range(&self) -> ConcentrationRange {
        self.range
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Check that every scenario's columns are exactly the network's nodes.
    pub fn validate_columns(&self, graph: &NetworkGraph) -> Result<()> {
        let expected: BTreeSet<&str> = graph.nodes().iter().map(|n| n.name.as_str()).collect();
        for (node, table) in &self.scenarios {
            let found: BTreeSet<&str> = table.columns().iter().map(String::as_str).collect();
            if found != expected {
                return Err(PlumeError::ColumnMismatch {
                    scenario: node.clone(),
                    missing: expected.difference(&found).map(|s| s.to_string()).collect(),
                    unexpected: found.difference(&expected).map(|s| s.to_string()).collect(),
                });
            }
        }
        Ok(())
    }
}
