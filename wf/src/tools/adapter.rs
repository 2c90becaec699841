//! ToolAdapter - maps validated extractions onto the external services
//!
//! The adapter is the only component that talks to the route and places
//! services. It is deliberately infallible: a service error or malformed
//! response is logged and normalized to the empty-result sentinel, so the
//! pipeline's formatting only ever asks "is the result list non-empty".

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use sessionstore::{FunctionParams, RouteParams, SearchPlaceParams};

use super::places::{PlacesResponse, PlacesService};
use super::route::{RouteResponse, RouteService};

/// Outcome of one tool invocation
#[derive(Debug, Clone)]
pub struct ToolOutcome {
    /// Raw service response as JSON, for the request log
    pub result: Value,
    /// Condensed summary for the transcript and follow-up prompts
    pub result_short: String,
    /// Whether the service returned anything at all
    pub found: bool,
}

/// Dispatches tool invocations to the two external services
pub struct ToolAdapter {
    route: Arc<dyn RouteService>,
    places: Arc<dyn PlacesService>,
}

impl ToolAdapter {
    pub fn new(route: Arc<dyn RouteService>, places: Arc<dyn PlacesService>) -> Self {
        Self { route, places }
    }

    /// Invoke the tool named by the params variant
    pub async fn invoke(&self, params: &FunctionParams) -> ToolOutcome {
        match params {
            FunctionParams::SearchPlace(p) => self.invoke_search_place(p).await,
            FunctionParams::Route(p) => self.invoke_route(p).await,
        }
    }

    async fn invoke_search_place(&self, params: &SearchPlaceParams) -> ToolOutcome {
        let response = match self.places.search_places(params).await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "search_place failed, returning empty result");
                PlacesResponse::empty()
            }
        };

        let found = !response.is_empty();
        let result_short = format_places(&response, params);
        let result = serde_json::to_value(&response).unwrap_or_else(|_| serde_json::json!({"items": []}));
        debug!(found, items = response.items.len(), "search_place completed");

        ToolOutcome {
            result,
            result_short,
            found,
        }
    }

    async fn invoke_route(&self, params: &RouteParams) -> ToolOutcome {
        let response = match self.route.calculate_route(params).await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "route calculation failed, returning empty result");
                RouteResponse::empty()
            }
        };

        let found = !response.is_empty();
        let result_short = format_route(&response, params);
        let result = serde_json::to_value(&response).unwrap_or_else(|_| serde_json::json!({"routes": []}));
        debug!(found, routes = response.routes.len(), "route completed");

        ToolOutcome {
            result,
            result_short,
            found,
        }
    }
}

/// Summarize a places response as a numbered pin list
fn format_places(response: &PlacesResponse, params: &SearchPlaceParams) -> String {
    if response.is_empty() {
        return format!(
            "No {} places found within {:.0} m of {:.4}, {:.4}.",
            params.place_type, params.radius_meters, params.lat, params.lon
        );
    }

    let mut out = format!("Found {} {} places:\n", response.items.len(), params.place_type);
    for (idx, item) in response.items.iter().enumerate() {
        let category = item
            .categories
            .first()
            .map(|c| c.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("not specified");
        out.push_str(&format!(
            "Pin {}: {} - {} ({})\n",
            idx + 1,
            item.title,
            item.address.label,
            category
        ));
    }
    out.trim_end().to_string()
}

/// Summarize a route response: totals plus per-group guidance lines
fn format_route(response: &RouteResponse, params: &RouteParams) -> String {
    let Some(route) = response.routes.first() else {
        return format!(
            "No route found from {} to {}.",
            params.start.name.as_deref().unwrap_or("start"),
            params.end.name.as_deref().unwrap_or("destination")
        );
    };

    let mut out = format!(
        "Route from {} to {}: {:.1} km, about {}.",
        params.start.name.as_deref().unwrap_or("start"),
        params.end.name.as_deref().unwrap_or("destination"),
        route.summary.distance / 1000.0,
        format_duration(route.summary.duration),
    );

    if let Some(guidance) = &route.guidance {
        for group in &guidance.instruction_groups {
            out.push_str(&format!(
                "\n- {} ({:.1} km)",
                group.group_message,
                group.group_length_in_meters / 1000.0
            ));
        }
    }
    out
}

/// Render seconds as "N h M min" / "M min"
fn format_duration(seconds: f64) -> String {
    let total_minutes = (seconds / 60.0).round() as u64;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{} h {} min", hours, minutes)
    } else {
        format!("{} min", minutes)
    }
}
