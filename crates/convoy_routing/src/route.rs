use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{coordinate::Coordinate, vehicle_profile::VehicleProfile};

/// One drivable route returned by the directions service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRouteCandidate")]
pub struct RouteCandidate {
    geometry: Vec<Coordinate>,
    distance_meters: Option<f64>,
    duration_seconds: Option<f64>,
}

impl RouteCandidate {
    /// Returns `None` when the geometry has fewer than two points. Negative or
    /// non-finite distances and durations are treated as unknown.
    pub fn new(
        geometry: Vec<Coordinate>,
        distance_meters: Option<f64>,
        duration_seconds: Option<f64>,
    ) -> Option<Self> {
        if geometry.len() < 2 {
            return None;
        }

        Some(Self {
            geometry,
            distance_meters: distance_meters.filter(|d| d.is_finite() && *d >= 0.0),
            duration_seconds: duration_seconds.filter(|d| d.is_finite() && *d >= 0.0),
        })
    }

    pub fn geometry(&self) -> &[Coordinate] {
        &self.geometry
    }

    pub fn distance_meters(&self) -> Option<f64> {
        self.distance_meters
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        self.duration_seconds
    }

    pub fn line_string(&self) -> geo_types::LineString<f64> {
        self.geometry
            .iter()
            .map(geo_types::Coord::from)
            .collect::<Vec<_>>()
            .into()
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("A route needs at least 2 geometry points, got {0}")]
pub struct DegenerateGeometry(pub usize);

#[derive(Deserialize)]
struct RawRouteCandidate {
    geometry: Vec<Coordinate>,

    #[serde(default)]
    distance_meters: Option<f64>,

    #[serde(default)]
    duration_seconds: Option<f64>,
}

impl TryFrom<RawRouteCandidate> for RouteCandidate {
    type Error = DegenerateGeometry;

    fn try_from(raw: RawRouteCandidate) -> Result<Self, Self::Error> {
        let points = raw.geometry.len();

        RouteCandidate::new(raw.geometry, raw.distance_meters, raw.duration_seconds)
            .ok_or(DegenerateGeometry(points))
    }
}

/// The request shape that produced a [`RouteResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStrategy {
    Alternatives,
    Simple,
    MultiWaypoint,
}

impl Display for RouteStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RouteStrategy::Alternatives => "alternatives",
                RouteStrategy::Simple => "simple",
                RouteStrategy::MultiWaypoint => "multi_waypoint",
            }
        )
    }
}

/// Outcome of a successful resolution. Never mutated, the next resolution
/// replaces it as a whole.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    candidates: Vec<RouteCandidate>,
    strategy: RouteStrategy,
    profile: VehicleProfile,
}

impl RouteResult {
    /// Returns `None` for an empty candidate list.
    pub fn new(
        candidates: Vec<RouteCandidate>,
        strategy: RouteStrategy,
        profile: VehicleProfile,
    ) -> Option<Self> {
        if candidates.is_empty() {
            return None;
        }

        Some(Self {
            candidates,
            strategy,
            profile,
        })
    }

    pub fn candidates(&self) -> &[RouteCandidate] {
        &self.candidates
    }

    pub fn candidate(&self, index: usize) -> Option<&RouteCandidate> {
        self.candidates.get(index)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn strategy(&self) -> RouteStrategy {
        self.strategy
    }

    pub fn profile(&self) -> VehicleProfile {
        self.profile
    }

    pub fn has_alternatives(&self) -> bool {
        self.candidates.len() > 1
    }
}
