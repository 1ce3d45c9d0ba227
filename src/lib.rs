//! # plumewatch
//!
//! Load and query precomputed contaminant propagation scenarios for a water
//! distribution network.
//!
//! For every candidate injection node a scenario table records the
//! concentration of contaminant at every network node at every timestep.
//! This crate loads those tables once, then answers the questions a viewer
//! asks repeatedly: what does the network look like at time `t` for
//! injection site `n`, and how did the concentration at one node evolve.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  catalog ──▶ <data root>/examples/<network>/                 │
//! │                 │                      │                      │
//! │                 ▼                      ▼                      │
//! │          ┌─────────────┐        ┌────────────────┐            │
//! │          │   network   │        │   pollution    │            │
//! │          │ NetworkGraph│        │ PollutionStore │            │
//! │          └─────────────┘        └───────┬────────┘            │
//! │                                         │ &store              │
//! │                                         ▼                     │
//! │                                  ┌─────────────┐              │
//! │                                  │   session   │──▶ queries   │
//! │                                  └─────────────┘              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`catalog`]**: which networks exist under a data root and where
//!   their files live
//! - **[`network`]**: EPANET `.inp` parsing into a [`NetworkGraph`] with node
//!   attributes, adjacency and display positions
//! - **[`pollution`]**: scenario tables ([`ScenarioTable`]), the
//!   [`PollutionStore`] and the timestep and history queries
//! - **[`session`]**: per-viewer selection state and playback
//! - **[`settings`]**: configuration for the command-line tool
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use plumewatch::{PollutionStore, Session};
//!
//! # fn main() -> plumewatch::Result<()> {
//! let store = PollutionStore::load_network(Path::new("data"), "ky2")?;
//!
//! let mut session = Session::new(&store)?;
//! session.select_injection("J-1")?;
//! session.set_timestep(42330);
//! for (node, value) in session.series().iter() {
//!     println!("{node}: {value}");
//! }
//!
//! session.select_history_node(Some("J-1"))?;
//! let history = session.history()?;
//! println!("{} points", history.len());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod error;
pub mod network;
pub mod pollution;
pub mod session;
pub mod settings;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{KeyKind, PlumeError, Result};
pub use network::{NetworkGraph, Node, NodeKind};
pub use pollution::{
    ConcentrationRange, NodeHistory, NodeSeries, PollutionStore, ScenarioTable, TimeAxis, Timestep,
};
pub use session::{Playback, Session, Speed};
pub use settings::Settings;
