//! Places search service client
//!
//! Searches for restaurants, rest areas, and hotels around a coordinate via
//! a HERE-style browse endpoint. The response contract is fixed: an `items`
//! list of place records; an empty list signals "no places found".

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use sessionstore::{PlaceType, SearchPlaceParams};

use super::ServiceError;
use crate::config::ServiceEndpoint;

/// Maximum number of places returned per search
const RESULT_LIMIT: u32 = 20;

/// Provider category-ID groups for places to eat
const MEAL_CATEGORIES: &[&str] = &[
    "100",
    "100-1000-0000",
    "100-1000-0001",
    "100-1000-0002",
    "100-1000-0003",
    "100-1000-0004",
    "100-1000-0005",
    "100-1000-0006",
    "100-1000-0007",
    "100-1000-0008",
    "100-1000-0009",
    "100-1000-0050",
    "100-1100-0000",
    "100-1100-0010",
    "100-1100-0331",
];

/// Provider category-ID groups for places to rest
const REST_CATEGORIES: &[&str] = &[
    "400-4300",
    "550",
    "800-8500",
    "800-8300",
    "700-7600",
    "600-6000",
    "600-6100",
    "600-6200",
    "600-6300-0066",
    "600-6400",
    "600-6600",
    "600-6900-0247",
    "700-7460",
    "700-7850",
    "700-7900",
    "900-9200",
];

/// Provider category-ID groups for lodging
const HOTEL_CATEGORIES: &[&str] = &[
    "550",
    "500-5000-0000",
    "500-5000-0053",
    "500-5000-0054",
    "500-5100-0000",
    "500-5100-0055",
    "500-5100-0056",
    "500-5100-0057",
    "500-5100-0058",
    "500-5100-0059",
    "500-5100-0060",
    "500-5100-0061",
    "550-5510-0000",
    "550-5510-0202",
    "550-5510-0203",
    "550-5510-0204",
    "550-5510-0205",
    "550-5510-0206",
    "550-5510-0227",
    "550-5510-0242",
    "550-5520-0000",
    "550-5520-0207",
    "550-5520-0208",
    "550-5520-0209",
    "550-5520-0210",
    "550-5520-0211",
    "550-5520-0212",
];

/// Category IDs the provider expects for a place type
pub fn categories_for(place_type: PlaceType) -> &'static [&'static str] {
    match place_type {
        PlaceType::Restaurant => MEAL_CATEGORIES,
        PlaceType::RestArea => REST_CATEGORIES,
        PlaceType::Hotel => HOTEL_CATEGORIES,
    }
}

/// Places search response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlacesResponse {
    #[serde(default)]
    pub items: Vec<PlaceItem>,
}

impl PlacesResponse {
    /// The empty sentinel: "no places found"
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One place record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub name: String,
}

/// Places search capability
#[async_trait]
pub trait PlacesService: Send + Sync {
    /// Search for places of a type around a coordinate
    async fn search_places(&self, params: &SearchPlaceParams) -> Result<PlacesResponse, ServiceError>;
}

/// HTTP client for a HERE-style browse API
pub struct HttpPlacesService {
    http: Client,
    base_url: String,
    api_key: String,
}

impl HttpPlacesService {
    /// Create a client from a service endpoint config
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
impl PlacesService for HttpPlacesService {
    async fn search_places(&self, params: &SearchPlaceParams) -> Result<PlacesResponse, ServiceError> {
        let url = format!("{}/browse", self.base_url);
        let circle = format!("circle:{},{};r={}", params.lat, params.lon, params.radius_meters.round());
        debug!(%url, place_type = %params.place_type, radius = params.radius_meters, "search_places: called");

        let query: Vec<(&str, String)> = vec![
            ("at", format!("{},{}", params.lat, params.lon)),
            ("in", circle),
            ("categories", categories_for(params.place_type).join(",")),
            ("limit", RESULT_LIMIT.to_string()),
            ("apiKey", self.api_key.clone()),
        ];

        let response = self.http.get(&url).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: PlacesResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;
        debug!(items = parsed.items.len(), "search_places: response parsed");
        Ok(parsed)
    }
}
