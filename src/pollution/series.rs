//! Query results: per-node snapshots and per-node histories.

use std::collections::HashMap;

use serde::Serialize;

use super::table::Timestep;

/// Concentration at every node of a scenario for one timestep.
///
/// Values are in the table's column order.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSeries<'a> {
    nodes: &'a [String],
    lookup: &'a HashMap<String, usize>,
    values: Vec<f64>,
}

impl<'a> NodeSeries<'a> {
    /// `lookup` maps each entry of `nodes` to its position.
    pub(crate) fn new(
        nodes: &'a [String],
        lookup: &'a HashMap<String, usize>,
        values: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(nodes.len(), values.len());
        debug_assert_eq!(nodes.len(), lookup.len());
        Self {
            nodes,
            lookup,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in column order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value of the first column.
    pub fn first(&self) -> Option<f64> {
        self.values.first().copied()
    }

    /// Concentration at `node`, if it is a column of the scenario.
    pub fn get(&self, node: &str) -> Option<f64> {
        self.lookup.get(node).map(|&i| self.values[i])
    }

    /// `(node, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, f64)> + '_ {
        self.nodes
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Highest concentration in the snapshot.
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

/// Chart extents for a history plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartRange {
    pub x: (Timestep, Timestep),
    pub y: (f64, f64),
}

/// Concentration over time at one node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeHistory {
    points: Vec<(Timestep, f64)>,
}

impl NodeHistory {
    pub(crate) fn new(points: Vec<(Timestep, f64)>) -> Self {
        Self { points }
    }

    /// `(timestep, value)` pairs in ascending timestep order.
    pub fn points(&self) -> &[(Timestep, f64)] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn last(&self) -> Option<(Timestep, f64)> {
        self.points.last().copied()
    }

    /// Axis extents for plotting the history from the origin.
    ///
    /// A history that never rises above zero gets a y extent of `1.0` so
    /// the plot still has height. An empty history collapses to the origin.
    pub fn chart_range(&self) -> ChartRange {
        let Some((last_t, _)) = self.last() else {
            return ChartRange {
                x: (0, 0),
                y: (0.0, 0.0),
            };
        };
        let y_max = self.points.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        ChartRange {
            x: (0, last_t),
            y: (0.0, if y_max == 0.0 { 1.0 } else { y_max }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_lookup_and_max() {
        let nodes = vec!["A".to_string(), "B".to_string()];
        let lookup: HashMap<String, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        let series = NodeSeries::new(&nodes, &lookup, vec![0.5, 2.0]);
        assert_eq!(series.get("B"), Some(2.0));
        assert_eq!(series.get("C"), None);
        assert_eq!(series.first(), Some(0.5));
        assert_eq!(series.max(), 2.0);
    }

    #[test]
    fn test_chart_range() {
        let history = NodeHistory::new(vec![(0, 0.0), (30, 4.0), (60, 2.0)]);
        let range = history.chart_range();
        assert_eq!(range.x, (0, 60));
        assert_eq!(range.y, (0.0, 4.0));
    }

    #[test]
    fn test_chart_range_all_zero() {
        let history = NodeHistory::new(vec![(0, 0.0), (30, 0.0)]);
        assert_eq!(history.chart_range().y, (0.0, 1.0));
    }

    #[test]
    fn test_chart_range_empty() {
        let range = NodeHistory::default().chart_range();
        assert_eq!(range.x, (0, 0));
        assert_eq!(range.y, (0.0, 0.0));
    }
}
