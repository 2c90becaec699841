//! Intent & extraction pipeline
//!
//! The per-turn decision machine: topicality classification, the off-topic
//! escalation gate, place-search and route extraction, feasibility checks,
//! and bounded re-entry after a tool call completes.

mod engine;
mod extract;

pub use engine::TurnEngine;
pub use extract::{Classification, Intent, PlaceExtraction, RouteExtraction};
