use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A raw `(lat, lng)` pair as handed over by a caller, not validated yet.
pub type LatLng = (f64, f64);

/// A validated WGS84 coordinate.
///
/// Both components are finite and within range. The only way to build one is
/// through [`Coordinate::new`] or the normalization helpers, so a `Coordinate`
/// can always be sent to the directions service. Deserialization goes through
/// the same checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        if is_valid_lat_lng(lat, lng) {
            Some(Self { lat, lng })
        } else {
            None
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// The `[lng, lat]` ordering used by GeoJSON and the directions API.
    pub fn to_lng_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    pub fn from_lng_lat(pair: [f64; 2]) -> Option<Self> {
        Self::new(pair[1], pair[0])
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("Coordinate ({lat}, {lng}) is out of range")]
pub struct OutOfRangeCoordinate {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = OutOfRangeCoordinate;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lng).ok_or(OutOfRangeCoordinate {
            lat: raw.lat,
            lng: raw.lng,
        })
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

impl From<&Coordinate> for geo_types::Point<f64> {
    fn from(coordinate: &Coordinate) -> Self {
        geo_types::Point::new(coordinate.lng, coordinate.lat)
    }
}

impl From<&Coordinate> for geo_types::Coord<f64> {
    fn from(coordinate: &Coordinate) -> Self {
        geo_types::Coord {
            x: coordinate.lng,
            y: coordinate.lat,
        }
    }
}

/// Axis-aligned area the application operates in, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

/// Mainland Argentina and Tierra del Fuego.
pub const ARGENTINA: BoundingBox = BoundingBox {
    min_lat: -55.5,
    min_lng: -73.6,
    max_lat: -21.7,
    max_lng: -53.5,
};

impl BoundingBox {
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }
}

fn is_valid_lat_lng(lat: f64, lng: f64) -> bool {
    lat.is_finite()
        && lng.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lng)
}

/// Validates a raw pair, swapping lat and lng when only the swapped pair is in
/// range. Returns `None` when neither ordering is a valid coordinate.
pub fn normalize_coordinate(lat: f64, lng: f64) -> Option<Coordinate> {
    Coordinate::new(lat, lng).or_else(|| Coordinate::new(lng, lat))
}

/// Same as [`normalize_coordinate`], but when a service area is known a pair
/// that only lands inside the area once swapped is treated as transposed,
/// even if both orderings are individually in range.
pub fn normalize_coordinate_within(
    lat: f64,
    lng: f64,
    service_area: Option<&BoundingBox>,
) -> Option<Coordinate> {
    let Some(area) = service_area else {
        return normalize_coordinate(lat, lng);
    };

    match (Coordinate::new(lat, lng), Coordinate::new(lng, lat)) {
        (Some(direct), _) if area.contains(direct.lat, direct.lng) => Some(direct),
        (_, Some(swapped)) if area.contains(swapped.lat, swapped.lng) => Some(swapped),
        _ => normalize_coordinate(lat, lng),
    }
}
