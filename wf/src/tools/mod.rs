//! External tool invocation
//!
//! Service clients for the route and places providers plus the adapter the
//! pipeline calls. The adapter owns failure normalization: the pipeline never
//! sees a service error, only an empty result.

mod adapter;
mod error;
pub mod places;
pub mod route;

pub use adapter::{ToolAdapter, ToolOutcome};
pub use error::ServiceError;
pub use places::{HttpPlacesService, PlacesResponse, PlacesService};
pub use route::{HttpRouteService, RouteResponse, RouteService};
