//! Typed per-stage extraction results
//!
//! Raw model output is parsed into one of these tagged shapes immediately
//! after JSON recovery; downstream stages only ever see validated structures.

use serde_json::Value;

use sessionstore::{NamedPlace, PlaceType, TripState};

use crate::llm::flexible_f64;

/// Topicality of the current message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    OnTopic,
    OffTopic,
}

/// Stage-1 result: classification plus the model's rationale
#[derive(Debug, Clone)]
pub struct Classification {
    pub intent: Intent,
    pub thought: String,
}

/// Stage-3 result: a place search, or the reason there isn't one
#[derive(Debug, Clone)]
pub enum PlaceExtraction {
    /// Location and place type both resolved to concrete values
    Resolved { lat: f64, lon: f64, place_type: PlaceType },
    /// A well-formed thought-only answer: not a place search after all
    Unresolved { thought: String },
    /// Partially-formed output: something is missing or out of range
    Invalid { problem: String },
}

/// Stage-4 result: a trip-state patch, or nothing usable
#[derive(Debug, Clone)]
pub enum RouteExtraction {
    Extracted(TripState),
    Unusable { thought: String },
}

/// Read a field, treating explicit `null` the same as absent
fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| !v.is_null())
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    field(value, key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Parse a classification object; `None` on a missing or unknown intent
pub fn parse_classification(value: &Value) -> Option<Classification> {
    let intent = match string_field(value, "intent")?.to_ascii_uppercase().as_str() {
        "ONTOPIC" => Intent::OnTopic,
        "OFFTOPIC" => Intent::OffTopic,
        _ => return None,
    };
    let thought = string_field(value, "thought").unwrap_or_else(|| "(no reasoning given)".to_string());
    Some(Classification { intent, thought })
}

/// Parse a place-search extraction into its tagged shape
pub fn parse_place_extraction(value: &Value) -> PlaceExtraction {
    let location = field(value, "location");
    let place_type_raw = string_field(value, "place_type");

    match (location, place_type_raw) {
        (None, None) => PlaceExtraction::Unresolved {
            thought: string_field(value, "thought").unwrap_or_default(),
        },
        (Some(location), Some(raw)) => {
            let lat = field(location, "lat").and_then(flexible_f64);
            let lon = field(location, "lon").and_then(flexible_f64);
            let place_type = PlaceType::parse(&raw);
            match (lat, lon, place_type) {
                (Some(lat), Some(lon), Some(place_type)) => PlaceExtraction::Resolved { lat, lon, place_type },
                (_, _, None) => PlaceExtraction::Invalid {
                    problem: format!("'{raw}' is not a searchable place type (restaurant, rest_area, or hotel)"),
                },
                _ => PlaceExtraction::Invalid {
                    problem: "the search location is missing usable coordinates".to_string(),
                },
            }
        }
        (Some(_), None) => PlaceExtraction::Invalid {
            problem: "the type of place to search for is missing".to_string(),
        },
        (None, Some(_)) => PlaceExtraction::Invalid {
            problem: "the search location is missing".to_string(),
        },
    }
}

/// Parse a route extraction into a trip-state patch
///
/// Every field is optional; an answer carrying no route fact at all (the
/// thought-only failure shape) is `Unusable`.
pub fn parse_route_extraction(value: &Value) -> RouteExtraction {
    let patch = TripState {
        start: field(value, "start").and_then(parse_named_place),
        end: field(value, "end").and_then(parse_named_place),
        end_at_start: field(value, "endAtStart").and_then(Value::as_bool),
        waypoints: field(value, "waypoints")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(parse_named_place).collect())
            .unwrap_or_default(),
        time_constraint: string_field(value, "userTimeConstraintDescription"),
        max_driving_hours_per_day: field(value, "maxDrivingHoursPerDay").and_then(flexible_f64),
        max_walking_time: field(value, "maxWalkingTime").and_then(flexible_f64),
        depart_at: string_field(value, "departAt"),
        reach_by: string_field(value, "reachBy"),
    };

    if patch.is_empty() {
        RouteExtraction::Unusable {
            thought: string_field(value, "thought").unwrap_or_default(),
        }
    } else {
        RouteExtraction::Extracted(patch)
    }
}

/// Parse the respond-stage output into the user-facing reply text
pub fn parse_response_text(value: &Value) -> Option<String> {
    string_field(value, "response")
}

fn parse_named_place(value: &Value) -> Option<NamedPlace> {
    let name = string_field(value, "name");
    let lat = field(value, "lat").and_then(flexible_f64);
    let lon = field(value, "lon").and_then(flexible_f64);
    if name.is_none() && lat.is_none() && lon.is_none() {
        return None;
    }
    Some(NamedPlace { name, lat, lon })
}
