//! Route service client
//!
//! Calculates driving routes between coordinates via a TomTom-style routing
//! endpoint. The response contract is fixed: a `routes` list whose entries
//! carry a distance/duration summary and grouped turn-by-turn guidance; an
//! empty list signals "no route found".

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use sessionstore::RouteParams;

use super::ServiceError;
use crate::config::ServiceEndpoint;

/// Route calculation response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteResponse {
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl RouteResponse {
    /// The empty sentinel: "no route found"
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// One calculated route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub summary: RouteSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidance: Option<Guidance>,
}

/// Distance and duration totals for a route
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Total length in meters
    #[serde(default)]
    pub distance: f64,
    /// Total travel time in seconds
    #[serde(default)]
    pub duration: f64,
}

/// Grouped turn-by-turn guidance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Guidance {
    #[serde(rename = "instructionGroups", default)]
    pub instruction_groups: Vec<InstructionGroup>,
}

/// One leg-level guidance group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionGroup {
    #[serde(rename = "groupMessage")]
    pub group_message: String,
    #[serde(rename = "groupLengthInMeters", default)]
    pub group_length_in_meters: f64,
}

/// Route calculation capability
#[async_trait]
pub trait RouteService: Send + Sync {
    /// Calculate a route through the given points
    async fn calculate_route(&self, params: &RouteParams) -> Result<RouteResponse, ServiceError>;
}

/// HTTP client for a TomTom-style routing API
pub struct HttpRouteService {
    http: Client,
    base_url: String,
    api_key: String,
}

impl HttpRouteService {
    /// Create a client from a service endpoint config
    ///
    /// The API key is read from the environment variable named in the config.
    pub fn from_config(config: &ServiceEndpoint) -> Result<Self, ServiceError> {
        let api_key =
            std::env::var(&config.api_key_env).map_err(|_| ServiceError::MissingApiKey(config.api_key_env.clone()))?;

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(ServiceError::Network)?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl RouteService for HttpRouteService {
    async fn calculate_route(&self, params: &RouteParams) -> Result<RouteResponse, ServiceError> {
        let locations = format!(
            "{},{}:{},{}",
            params.start.lat, params.start.lon, params.end.lat, params.end.lon
        );
        let url = format!("{}/routing/1/calculateRoute/{}/json", self.base_url, locations);
        debug!(%url, waypoints = params.waypoints.len(), "calculate_route: called");

        let mut query: Vec<(&str, String)> = vec![
            ("instructionsType", "text".to_string()),
            ("routeType", "fastest".to_string()),
            ("traffic", "true".to_string()),
            ("key", self.api_key.clone()),
        ];
        if let Some(depart_at) = &params.depart_at {
            query.push(("departAt", depart_at.clone()));
        }

        // Waypoints ride along as supporting points in the POST body
        let mut request = self.http.post(&url).query(&query);
        if !params.waypoints.is_empty() {
            let supporting_points: Vec<_> = params
                .waypoints
                .iter()
                .map(|w| serde_json::json!({"latitude": w.lat, "longitude": w.lon}))
                .collect();
            request = request.json(&serde_json::json!({"supportingPoints": supporting_points}));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: RouteResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;
        debug!(routes = parsed.routes.len(), "calculate_route: response parsed");
        Ok(parsed)
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Mock route service returning a fixed response or error
    pub struct MockRouteService {
        response: Result<RouteResponse, String>,
    }

    impl MockRouteService {
        pub fn returning(response: RouteResponse) -> Self {
            Self { response: Ok(response) }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
            }
        }

        /// A plausible single-route response for tests
        pub fn sample_response() -> RouteResponse {
            RouteResponse {
                routes: vec![Route {
                    summary: RouteSummary {
                        distance: 362_000.0,
                        duration: 12_600.0,
                    },
                    guidance: Some(Guidance {
                        instruction_groups: vec![
                            InstructionGroup {
                                group_message: "Head west on I-10".to_string(),
                                group_length_in_meters: 180_000.0,
                            },
                            InstructionGroup {
                                group_message: "Continue on US-285 North".to_string(),
                                group_length_in_meters: 182_000.0,
                            },
                        ],
                    }),
                }],
            }
        }
    }

    #[async_trait]
    impl RouteService for MockRouteService {
        async fn calculate_route(&self, _params: &RouteParams) -> Result<RouteResponse, ServiceError> {
            match &self.response {
                Ok(response) => Ok(response.clone()),
                Err(message) => Err(ServiceError::InvalidResponse(message.clone())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_contract_deserialization() {
        let raw = serde_json::json!({
            "routes": [{
                "summary": {"distance": 1500.0, "duration": 120.0},
                "guidance": {"instructionGroups": [
                    {"groupMessage": "Head north", "groupLengthInMeters": 1500.0}
                ]}
            }]
        });
        let parsed: RouteResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.routes.len(), 1);
        assert_eq!(parsed.routes[0].summary.distance, 1500.0);
        let guidance = parsed.routes[0].guidance.as_ref().unwrap();
        assert_eq!(guidance.instruction_groups[0].group_message, "Head north");
    }

    #[test]
    fn test_empty_routes_signals_no_route() {
        let parsed: RouteResponse = serde_json::from_value(serde_json::json!({"routes": []})).unwrap();
        assert!(parsed.is_empty());
        assert!(RouteResponse::empty().is_empty());
    }

    #[test]
    fn test_missing_guidance_is_tolerated() {
        let raw = serde_json::json!({"routes": [{"summary": {"distance": 10.0, "duration": 1.0}}]});
        let parsed: RouteResponse = serde_json::from_value(raw).unwrap();
        assert!(parsed.routes[0].guidance.is_none());
    }
}
