//! The session store: single owner of all cross-turn state

use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::request::FunctionRequest;
use crate::trip::TripState;
use crate::turn::{ConversationTurn, Role};

/// All durable state for one user session
///
/// The transcript, the trip facts, the tool-request log, and the off-topic
/// counter live here and nowhere else. Turns are processed strictly
/// sequentially, so plain owned state is sufficient; callers hold a mutable
/// borrow for the duration of one turn.
#[derive(Debug, Default)]
pub struct SessionStore {
    turns: Vec<ConversationTurn>,
    trip: TripState,
    requests: Vec<FunctionRequest>,
    off_topic_count: u32,
}

impl SessionStore {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    // === Transcript ===

    /// Append one transcript entry
    pub fn append_turn(&mut self, role: Role, text: impl Into<String>) {
        self.turns.push(ConversationTurn::new(role, text));
    }

    /// The full transcript, oldest first
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// The most recent `limit` turns, oldest first, as role-tagged blocks
    ///
    /// Pure read. Returns the empty string when the transcript is empty; a
    /// window larger than the transcript returns everything.
    pub fn recent_history(&self, limit: usize) -> String {
        let skip = self.turns.len().saturating_sub(limit);
        self.turns[skip..]
            .iter()
            .map(|turn| format!("{}: {}", turn.role.as_str(), turn.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    // === Trip state ===

    /// The accumulated trip facts
    pub fn trip(&self) -> &TripState {
        &self.trip
    }

    /// Merge a partial trip state, field by field (see [`TripState::merge`])
    pub fn merge_trip_state(&mut self, partial: &TripState) {
        self.trip.merge(partial);
        debug!(trip = ?self.trip, "merged trip state");
    }

    /// Replace the trip state wholesale
    ///
    /// Used by the turn controller to restore a pre-turn snapshot after an
    /// unexpected failure; everything else goes through `merge_trip_state`.
    pub fn restore_trip_state(&mut self, snapshot: TripState) {
        self.trip = snapshot;
    }

    // === Function request log ===

    /// Append a request to the log
    pub fn log_function_request(&mut self, request: FunctionRequest) {
        debug!(request_id = %request.request_id, name = %request.name, "logged function request");
        self.requests.push(request);
    }

    /// Attach a result to a previously-logged request
    ///
    /// Resolving an id that was never logged is a no-op, reported at warn
    /// level rather than treated as fatal.
    pub fn resolve_function_request(&mut self, request_id: Uuid, result: Value, result_short: impl Into<String>) {
        match self.requests.iter_mut().find(|r| r.request_id == request_id) {
            Some(request) => {
                request.result = Some(result);
                request.result_short = Some(result_short.into());
            }
            None => {
                warn!(%request_id, "resolve_function_request: unknown request id, ignoring");
            }
        }
    }

    /// The full request log, oldest first
    pub fn function_requests(&self) -> &[FunctionRequest] {
        &self.requests
    }

    // === Off-topic counter ===

    /// Current consecutive off-topic count
    pub fn off_topic_count(&self) -> u32 {
        self.off_topic_count
    }

    /// Record one more off-topic message and return the new count
    pub fn increment_off_topic(&mut self) -> u32 {
        self.off_topic_count += 1;
        self.off_topic_count
    }

    /// Reset the counter (on any on-topic classification)
    pub fn reset_off_topic(&mut self) {
        self.off_topic_count = 0;
    }
}
