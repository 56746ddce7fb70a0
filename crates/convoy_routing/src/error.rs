use thiserror::Error;

use crate::route_resolver::TripLength;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RouteError {
    #[error("Unresolvable coordinates ({lat}, {lng})")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("Coordinates unavailable for location {location_id}: {reason}")]
    CoordinatesUnavailable { location_id: String, reason: String },

    #[error("No road route found for {0}")]
    NoRouteFound(TripLength),

    #[error("Resolution {token} superseded by {latest}")]
    StaleResult { token: u64, latest: u64 },

    #[error("Route index {index} out of range, {count} routes available")]
    SelectionOutOfRange { index: usize, count: usize },

    #[error("No resolved route to select from")]
    NoActiveRoute,
}

impl RouteError {
    /// Stale results are dropped silently instead of being shown.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, RouteError::StaleResult { .. })
    }
}
