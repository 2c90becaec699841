//! SessionStore - durable per-session conversation state
//!
//! Owns everything a trip-planning session accumulates across turns: the
//! conversation transcript, the trip facts gathered so far, the append-only
//! log of tool invocations, and the off-topic counter. One instance per user
//! session; mutated only by the single active turn.
//!
//! # Example
//!
//! ```
//! use sessionstore::{Role, SessionStore, TripState};
//!
//! let mut session = SessionStore::new();
//! session.append_turn(Role::User, "Plan a trip from Austin to Santa Fe");
//!
//! let mut partial = TripState::default();
//! partial.max_driving_hours_per_day = Some(6.0);
//! session.merge_trip_state(&partial);
//!
//! assert_eq!(session.trip().max_driving_hours_per_day, Some(6.0));
//! ```

mod request;
mod session;
mod trip;
mod turn;

pub use request::{FunctionName, FunctionParams, FunctionRequest, PlaceType, RouteParams, RoutePoint, SearchPlaceParams};
pub use session::SessionStore;
pub use trip::{NamedPlace, TripState};
pub use turn::{ConversationTurn, Role};

/// Default number of recent turns included when building prompt history
pub const DEFAULT_HISTORY_WINDOW: usize = 50;
