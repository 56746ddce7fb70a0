use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
    coordinate::Coordinate, directions_error::DirectionsError, route::RouteCandidate,
    vehicle_profile::VehicleProfile,
};

/// Optimization target for a directions request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    #[default]
    Fastest,
    Shortest,
}

impl Preference {
    pub fn complement(&self) -> Preference {
        match self {
            Preference::Fastest => Preference::Shortest,
            Preference::Shortest => Preference::Fastest,
        }
    }
}

/// Tuning for the service's alternative-routes search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlternativeRoutes {
    /// Maximum number of routes returned, primary included
    pub target_count: u32,

    /// How much an alternative may share with the primary route (0..1)
    pub share_factor: f64,

    /// How much more expensive than the primary an alternative may be
    pub weight_factor: f64,
}

impl Default for AlternativeRoutes {
    fn default() -> Self {
        Self {
            target_count: 3,
            share_factor: 0.5,
            weight_factor: 1.9,
        }
    }
}

impl std::hash::Hash for AlternativeRoutes {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u32(self.target_count);
        state.write_u64(self.share_factor.to_bits());
        state.write_u64(self.weight_factor.to_bits());
    }
}

/// A single call to the directions service.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsRequest {
    pub profile: VehicleProfile,

    /// Ordered through-points, origin first and destination last
    pub coordinates: Vec<Coordinate>,

    pub alternative_routes: Option<AlternativeRoutes>,

    pub preference: Option<Preference>,
}

impl DirectionsRequest {
    pub fn new(profile: VehicleProfile, coordinates: Vec<Coordinate>) -> Self {
        Self {
            profile,
            coordinates,
            alternative_routes: None,
            preference: None,
        }
    }

    pub fn with_alternative_routes(mut self, alternative_routes: AlternativeRoutes) -> Self {
        self.alternative_routes = Some(alternative_routes);
        self
    }

    pub fn with_preference(mut self, preference: Preference) -> Self {
        self.preference = Some(preference);
        self
    }
}

impl std::hash::Hash for DirectionsRequest {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.profile.hash(state);
        self.coordinates.len().hash(state);
        for coordinate in &self.coordinates {
            state.write_u64(coordinate.lat().to_bits());
            state.write_u64(coordinate.lng().to_bits());
        }
        self.alternative_routes.hash(state);
        self.preference.hash(state);
    }
}

/// Anything that can turn a [`DirectionsRequest`] into route candidates.
///
/// An `Ok` with an empty list means the service answered but had no route.
pub trait DirectionsService {
    fn directions(
        &self,
        request: &DirectionsRequest,
    ) -> impl Future<Output = Result<Vec<RouteCandidate>, DirectionsError>> + Send;
}
