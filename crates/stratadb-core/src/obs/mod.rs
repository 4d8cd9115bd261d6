//! Observability: in-memory counters for SQL generation activity.
//!
//! This module never inspects metadata or SQL text; generation code reports
//! events and surfaces read snapshots here.

pub(crate) mod metrics;

// re-exports
pub use metrics::{ClassCounters, EventOps, EventState, metrics_report, metrics_reset_all};
