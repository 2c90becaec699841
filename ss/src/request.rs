//! Append-only log entries for external tool invocations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// The two functions the agent can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionName {
    SearchPlace,
    Route,
}

impl FunctionName {
    /// Wire name of the function
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionName::SearchPlace => "search_place",
            FunctionName::Route => "route",
        }
    }
}

impl std::fmt::Display for FunctionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of place the user is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceType {
    Restaurant,
    RestArea,
    Hotel,
}

impl PlaceType {
    /// Parse the LLM's value, tolerating case differences
    ///
    /// Anything outside the three allowed values is a validation failure and
    /// returns `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "restaurant" => Some(PlaceType::Restaurant),
            "rest_area" => Some(PlaceType::RestArea),
            "hotel" => Some(PlaceType::Hotel),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceType::Restaurant => "restaurant",
            PlaceType::RestArea => "rest_area",
            PlaceType::Hotel => "hotel",
        }
    }
}

impl std::fmt::Display for PlaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for a `search_place` invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPlaceParams {
    pub lat: f64,
    pub lon: f64,
    /// Search radius in meters (default 8047 m, five miles)
    #[serde(rename = "radius")]
    pub radius_meters: f64,
    #[serde(rename = "type")]
    pub place_type: PlaceType,
}

/// A fully-resolved point on a route: coordinates are mandatory here
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// Parameters for a `route` invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteParams {
    pub start: RoutePoint,
    pub end: RoutePoint,
    #[serde(default)]
    pub waypoints: Vec<RoutePoint>,
    #[serde(rename = "departAt", default, skip_serializing_if = "Option::is_none")]
    pub depart_at: Option<String>,
}

/// Typed parameter payload, one variant per function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FunctionParams {
    SearchPlace(SearchPlaceParams),
    Route(RouteParams),
}

/// One logged tool invocation and, eventually, its result
///
/// `request_id` is the sole correlation key between a request and its result.
/// Entries are never removed; the log doubles as the session's audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionRequest {
    #[serde(rename = "requestId")]
    pub request_id: Uuid,
    pub name: FunctionName,
    pub params: FunctionParams,
    /// Raw service response, attached once when the invocation completes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Condensed summary suitable for the transcript and follow-up prompts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_short: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FunctionRequest {
    /// Create a `search_place` request with a fresh id
    pub fn search_place(params: SearchPlaceParams) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            name: FunctionName::SearchPlace,
            params: FunctionParams::SearchPlace(params),
            result: None,
            result_short: None,
            created_at: Utc::now(),
        }
    }

    /// Create a `route` request with a fresh id
    pub fn route(params: RouteParams) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            name: FunctionName::Route,
            params: FunctionParams::Route(params),
            result: None,
            result_short: None,
            created_at: Utc::now(),
        }
    }

    /// Whether a result has been attached yet
    pub fn is_resolved(&self) -> bool {
        self.result.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_type_parse_accepts_known_values() {
        assert_eq!(PlaceType::parse("restaurant"), Some(PlaceType::Restaurant));
        assert_eq!(PlaceType::parse("REST_AREA"), Some(PlaceType::RestArea));
        assert_eq!(PlaceType::parse(" hotel "), Some(PlaceType::Hotel));
    }

    #[test]
    fn test_place_type_parse_rejects_unknown_values() {
        assert_eq!(PlaceType::parse("gas_station"), None);
        assert_eq!(PlaceType::parse(""), None);
        assert_eq!(PlaceType::parse("Eat"), None);
    }

    #[test]
    fn test_request_ids_are_unique() {
        let params = SearchPlaceParams {
            lat: 48.8566,
            lon: 2.3522,
            radius_meters: 8047.0,
            place_type: PlaceType::Restaurant,
        };
        let a = FunctionRequest::search_place(params.clone());
        let b = FunctionRequest::search_place(params);
        assert_ne!(a.request_id, b.request_id);
        assert!(!a.is_resolved());
    }

    #[test]
    fn test_function_name_wire_format() {
        assert_eq!(FunctionName::SearchPlace.to_string(), "search_place");
        assert_eq!(FunctionName::Route.to_string(), "route");
        let json = serde_json::to_string(&FunctionName::SearchPlace).unwrap();
        assert_eq!(json, "\"search_place\"");
    }

    #[test]
    fn test_route_params_serialization() {
        let params = RouteParams {
            start: RoutePoint {
                name: Some("New York City".to_string()),
                lat: 40.7128,
                lon: -74.006,
            },
            end: RoutePoint {
                name: Some("Delaware".to_string()),
                lat: 39.3186,
                lon: -75.5071,
            },
            waypoints: vec![],
            depart_at: Some("2025-05-02T10:00:00Z".to_string()),
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["departAt"], "2025-05-02T10:00:00Z");
        assert_eq!(json["start"]["name"], "New York City");
    }
}
