//! A single pollution scenario: concentration per node per timestep.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::series::{NodeHistory, NodeSeries};
use crate::error::{KeyKind, PlumeError, Result};

/// Simulated time, in seconds since the start of the scenario.
pub type Timestep = i64;

/// On-disk layout of a scenario table.
///
/// This matches the "split" orientation written by pandas'
/// `DataFrame.to_json(orient="split")`: column labels, the row index, and
/// a row-major matrix of values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedTable {
    /// Node identifiers, one per column.
    pub columns: Vec<String>,
    /// Timestep of each row.
    pub index: Vec<Timestep>,
    /// Concentration values, `data[row][column]`.
    pub data: Vec<Vec<f64>>,
}

/// Bounds of a uniformly spaced time index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeAxis {
    pub start: Timestep,
    pub end: Timestep,
    pub step: Timestep,
}

impl TimeAxis {
    /// Number of timesteps covered by the axis; zero for a malformed axis.
    pub fn len(&self) -> usize {
        if self.step <= 0 || self.end < self.start {
            return 0;
        }
        let span = i128::from(self.end) - i128::from(self.start);
        usize::try_from(span / i128::from(self.step) + 1).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `t` lies on the axis grid.
    pub fn contains(&self, t: Timestep) -> bool {
        self.step > 0
            && t >= self.start
            && t <= self.end
            && (i128::from(t) - i128::from(self.start)) % i128::from(self.step) == 0
    }
}

impl fmt::Display for TimeAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={} step {}", self.start, self.end, self.step)
    }
}

/// Concentration of contaminant at every node for a range of timesteps.
///
/// Rows are timesteps in ascending order with a constant step; columns are
/// node identifiers in the order they were loaded. Both are fixed at
/// construction and never reordered by queries.
#[derive(Debug, Clone)]
pub struct ScenarioTable {
    columns: Vec<String>,
    column_lookup: HashMap<String, usize>,
    index: Vec<Timestep>,
    /// Row-major, `index.len() * columns.len()` values.
    values: Vec<f64>,
}

impl ScenarioTable {
    /// Build a table, validating its shape and contents.
    ///
    /// `source` is only used to label errors.
    pub fn new(
        source: &Path,
        columns: Vec<String>,
        index: Vec<Timestep>,
        data: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let invalid = |reason: String| PlumeError::InvalidTable {
            path: source.to_path_buf(),
            reason,
        };

        if data.len() != index.len() {
            return Err(invalid(format!(
                "{} index entries but {} data rows",
                index.len(),
                data.len()
            )));
        }
        if index.len() < 2 {
            return Err(invalid(format!(
                "need at least 2 timesteps to define a step, found {}",
                index.len()
            )));
        }

        let step = index[1].checked_sub(index[0]).ok_or_else(|| {
            invalid(format!(
                "step out of range between {} and {}",
                index[0], index[1]
            ))
        })?;
        if step <= 0 {
            return Err(invalid(format!(
                "index must be strictly increasing, found {} then {}",
                index[0], index[1]
            )));
        }
        if let Some(pair) = index.windows(2).find(|w| w[1].checked_sub(w[0]) != Some(step)) {
            return Err(invalid(format!(
                "non-uniform step between {} and {} (expected {})",
                pair[0], pair[1], step
            )));
        }
        if index[index.len() - 1].checked_sub(index[0]).is_none() {
            return Err(invalid(format!(
                "step out of range: index spans {} to {}",
                index[0],
                index[index.len() - 1]
            )));
        }

        let mut column_lookup = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if column_lookup.insert(name.clone(), i).is_some() {
                return Err(invalid(format!("duplicate column {}", name)));
            }
        }

        let mut values = Vec::with_capacity(index.len() * columns.len());
        for (row, t) in data.into_iter().zip(&index) {
            if row.len() != columns.len() {
                return Err(invalid(format!(
                    "row {} has {} values, expected {}",
                    t,
                    row.len(),
                    columns.len()
                )));
            }
            if let Some(v) = row.iter().find(|v| !v.is_finite() || **v < 0.0) {
                return Err(invalid(format!("row {} has invalid concentration {}", t, v)));
            }
            values.extend(row);
        }

        Ok(Self {
            columns,
            column_lookup,
            index,
            values,
        })
    }

    /// Load a table from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| PlumeError::io(path, e))?;
        Self::parse(path, &content)
    }

    /// Parse a table from a JSON string.
    pub fn parse(source: &Path, content: &str) -> Result<Self> {
        let raw: SerializedTable =
            serde_json::from_str(content).map_err(|e| PlumeError::Json {
                path: source.to_path_buf(),
                source: e,
            })?;
        Self::new(source, raw.columns, raw.index, raw.data)
    }

    /// Node identifiers in column order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Timesteps in ascending order.
    pub fn index(&self) -> &[Timestep] {
        &self.index
    }

    /// Returns true if `node` is a column of this table.
    pub fn has_column(&self, node: &str) -> bool {
        self.column_lookup.contains_key(node)
    }

    pub fn time_axis(&self) -> TimeAxis {
        TimeAxis {
            start: self.index[0],
            end: self.index[self.index.len() - 1],
            step: self.index[1] - self.index[0],
        }
    }

    /// Largest concentration anywhere in the table.
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Smallest strictly positive concentration, or `None` if every value is zero.
    pub fn min_positive(&self) -> Option<f64> {
        self.values
            .iter()
            .copied()
            .filter(|v| *v > 0.0)
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.min(v))))
    }

    fn row(&self, position: usize) -> &[f64] {
        let width = self.columns.len();
        &self.values[position * width..(position + 1) * width]
    }

    /// Concentration at every node for the given timestep.
    ///
    /// A timestep with no row (before the start, after the end, or between
    /// steps) means no contaminant has arrived: every value is `0.0`.
    pub fn series_at(&self, timestep: Timestep) -> NodeSeries<'_> {
        let values = match self.index.binary_search(&timestep) {
            Ok(position) => self.row(position).to_vec(),
            Err(_) => vec![0.0; self.columns.len()],
        };
        NodeSeries::new(&self.columns, &self.column_lookup, values)
    }

    /// Concentration over time at one node.
    ///
    /// `None` means no node is selected and yields an empty history. A node
    /// that is not a column is an error: the scenario does not match the
    /// network being displayed.
    pub fn history(&self, node: Option<&str>) -> Result<NodeHistory> {
        let Some(node) = node else {
            return Ok(NodeHistory::default());
        };
        let column = *self
            .column_lookup
            .get(node)
            .ok_or_else(|| PlumeError::key_not_found(KeyKind::Node, node))?;

        let width = self.columns.len();
        let points = self
            .index
            .iter()
            .enumerate()
            .map(|(row, t)| (*t, self.values[row * width + column]))
            .collect();
        Ok(NodeHistory::new(points))
    }
}
