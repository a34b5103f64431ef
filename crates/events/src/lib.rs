//! `appgate-events` — authorization decision events.
//!
//! Optional audit/analytics feed. Authorization never depends on a sink
//! succeeding: `record` is infallible at the boundary and write failures
//! are logged, not propagated.

pub mod event;
pub mod sink;

pub use event::DecisionEvent;
pub use sink::{EventSink, JsonlSink, NullSink};
