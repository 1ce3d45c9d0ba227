//! Pollution scenarios and the queries run against them.
//!
//! ## Submodules
//!
//! - [`table`]: a single scenario ([`ScenarioTable`]) with the timestep and
//!   history queries
//! - [`store`]: every scenario of a network ([`PollutionStore`]) and
//!   scenario selection
//! - [`series`]: query results ([`NodeSeries`], [`NodeHistory`])
//!
//! ## Data Flow
//!
//! ```text
//! <injection>.json (one per injection node)
//!        │
//!        ▼
//! PollutionStore::load()  ── time axis + concentration range, once
//!        │
//!        ▼
//! store.scenario(id) ──▶ ScenarioTable
//!                            ├──▶ series_at(t)     ──▶ NodeSeries
//!                            └──▶ history(node)    ──▶ NodeHistory
//! ```

pub mod series;
pub mod store;
pub mod table;

pub use series::{ChartRange, NodeHistory, NodeSeries};
pub use store::{ConcentrationRange, PollutionStore, LOG_SCALE_FLOOR};
pub use table::{ScenarioTable, SerializedTable, TimeAxis, Timestep};
