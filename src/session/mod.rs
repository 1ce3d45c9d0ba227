//! Per-viewer state: which scenario, timestep and node are selected.
//!
//! A [`Session`] borrows an immutable [`PollutionStore`] and holds the only
//! state that changes in response to user input. Every query goes through
//! it, so several sessions can share one store.

pub mod playback;

pub use playback::{format_clock, Playback, Speed};

use crate::error::{KeyKind, PlumeError, Result};
use crate::pollution::{NodeHistory, NodeSeries, PollutionStore, ScenarioTable, Timestep};

/// Selection state for one viewer of a [`PollutionStore`].
#[derive(Debug, Clone)]
pub struct Session<'a> {
    store: &'a PollutionStore,
    injection: String,
    scenario: &'a ScenarioTable,
    timestep: Timestep,
    history_node: Option<String>,
    pub playback: Playback,
}

impl<'a> Session<'a> {
    /// Start at the store's default injection node and first timestep.
    pub fn new(store: &'a PollutionStore) -> Result<Self> {
        let injection = store.default_injection().to_string();
        let scenario = store.scenario(&injection)?;
        Ok(Self {
            store,
            injection,
            scenario,
            timestep: store.time_axis().start,
            history_node: None,
            playback: Playback::default(),
        })
    }

    pub fn store(&self) -> &'a PollutionStore {
        self.store
    }

    /// The active injection node.
    pub fn injection(&self) -> &str {
        &self.injection
    }

    /// The scenario for the active injection node.
    pub fn scenario(&self) -> &'a ScenarioTable {
        self.scenario
    }

    pub fn timestep(&self) -> Timestep {
        self.timestep
    }

    pub fn history_node(&self) -> Option<&str> {
        self.history_node.as_deref()
    }

    /// Switch to another injection node.
    ///
    /// On failure the session keeps its previous selection.
    pub fn select_injection(&mut self, injection: &str) -> Result<()> {
        let scenario = self.store.scenario(injection)?;
        self.injection = injection.to_string();
        self.scenario = scenario;
        Ok(())
    }

    /// Move to a timestep. Timesteps with no data are allowed and read as
    /// zero concentration.
    pub fn set_timestep(&mut self, timestep: Timestep) {
        self.timestep = timestep;
    }

    /// Choose the node whose history is shown, or `None` to clear it.
    pub fn select_history_node(&mut self, node: Option<&str>) -> Result<()> {
        if let Some(node) = node {
            if !self.scenario.has_column(node) {
                return Err(PlumeError::key_not_found(KeyKind::Node, node));
            }
        }
        self.history_node = node.map(str::to_string);
        Ok(())
    }

    /// Concentration at every node at the current timestep.
    pub fn series(&self) -> NodeSeries<'a> {
        self.scenario.series_at(self.timestep)
    }

    /// History of the selected node; empty when nothing is selected.
    pub fn history(&self) -> Result<NodeHistory> {
        self.scenario.history(self.history_node())
    }

    /// Advance one frame if playing. Returns the current timestep.
    pub fn tick(&mut self) -> Timestep {
        if self.playback.playing {
            self.timestep = Playback::next_timestep(self.timestep, self.store.time_axis());
        }
        self.timestep
    }
}
