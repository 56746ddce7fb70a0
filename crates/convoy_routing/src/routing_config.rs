use std::{str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    coordinate::{ARGENTINA, BoundingBox},
    directions_service::{AlternativeRoutes, Preference},
    ors_api::{ORS_DEFAULT_BASE_URL, OrsClientParams},
    vehicle_profile::VehicleProfile,
};

pub const ORS_API_KEY_ENV_VAR: &str = "ORS_API_KEY";
pub const ORS_BASE_URL_ENV_VAR: &str = "ORS_BASE_URL";
pub const ALT_MAX_KM_ENV_VAR: &str = "ROUTE_ALT_MAX_KM";
pub const LEG_MAX_KM_ENV_VAR: &str = "ROUTE_LEG_MAX_KM";
pub const NEAR_DUPLICATE_TOLERANCE_ENV_VAR: &str = "ROUTE_NEAR_DUPLICATE_TOLERANCE";
pub const REQUEST_TIMEOUT_ENV_VAR: &str = "ROUTE_REQUEST_TIMEOUT_SECS";
pub const SERVICE_AREA_ENV_VAR: &str = "ROUTE_SERVICE_AREA";

/// Shortest leg accepted when segmenting into waypoints.
pub const MIN_LEG_MAX_KM: f64 = 1.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
}

/// Policy constants of the route resolver. Distances are straight-line
/// kilometers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub profile: VehicleProfile,

    /// Up to this straight-line distance alternatives are requested
    pub alt_max_km: f64,

    /// Maximum straight-line length of a leg when segmenting into waypoints
    pub leg_max_km: f64,

    /// Relative distance difference under which the complementary-preference
    /// route is considered a duplicate of the primary
    pub near_duplicate_tolerance: f64,

    pub alternative_routes: AlternativeRoutes,

    pub primary_preference: Preference,

    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,

    /// When set, lat/lng transpositions are detected against this area.
    /// Defaults to Argentina, `ROUTE_SERVICE_AREA=none` turns it off.
    pub service_area: Option<BoundingBox>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            profile: VehicleProfile::DrivingHgv,
            alt_max_km: 100.0,
            leg_max_km: 90.0,
            near_duplicate_tolerance: 0.03,
            alternative_routes: AlternativeRoutes::default(),
            primary_preference: Preference::Fastest,
            request_timeout: Duration::from_secs(15),
            service_area: Some(ARGENTINA),
        }
    }
}

impl RoutingConfig {
    /// Reads the overrides from the environment, keeping defaults for the
    /// variables that are not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = parse_var::<f64, _>(&lookup, ALT_MAX_KM_ENV_VAR)? {
            config.alt_max_km = value;
        }
        if let Some(value) = parse_var::<f64, _>(&lookup, LEG_MAX_KM_ENV_VAR)? {
            config.leg_max_km = value;
        }
        if let Some(value) = parse_var::<f64, _>(&lookup, NEAR_DUPLICATE_TOLERANCE_ENV_VAR)? {
            config.near_duplicate_tolerance = value;
        }
        if let Some(value) = parse_var::<u64, _>(&lookup, REQUEST_TIMEOUT_ENV_VAR)? {
            config.request_timeout = Duration::from_secs(value);
        }
        if let Some(value) = lookup(SERVICE_AREA_ENV_VAR) {
            config.service_area = if value.trim().eq_ignore_ascii_case("none") {
                None
            } else {
                Some(parse_bounding_box(&value).ok_or(ConfigError::Invalid {
                    name: SERVICE_AREA_ENV_VAR,
                    value,
                })?)
            };
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |name: &'static str, value: String| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { name, value })
        };

        if !(self.alt_max_km.is_finite() && self.alt_max_km >= 0.0) {
            return invalid(ALT_MAX_KM_ENV_VAR, self.alt_max_km.to_string());
        }
        if !(self.leg_max_km.is_finite() && self.leg_max_km >= MIN_LEG_MAX_KM) {
            return invalid(LEG_MAX_KM_ENV_VAR, self.leg_max_km.to_string());
        }
        if !(0.0..1.0).contains(&self.near_duplicate_tolerance) {
            return invalid(
                NEAR_DUPLICATE_TOLERANCE_ENV_VAR,
                self.near_duplicate_tolerance.to_string(),
            );
        }
        if self.request_timeout.is_zero() {
            return invalid(REQUEST_TIMEOUT_ENV_VAR, "0".to_string());
        }

        Ok(())
    }

    /// Connection parameters for the hosted ORS API.
    pub fn ors_params_from_env(&self) -> Result<OrsClientParams, ConfigError> {
        self.ors_params_from_lookup(|name| std::env::var(name).ok())
    }

    pub fn ors_params_from_lookup<F>(&self, lookup: F) -> Result<OrsClientParams, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ORS_API_KEY_ENV_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::Missing(ORS_API_KEY_ENV_VAR))?;

        Ok(OrsClientParams {
            api_key,
            base_url: lookup(ORS_BASE_URL_ENV_VAR)
                .unwrap_or_else(|| ORS_DEFAULT_BASE_URL.to_string()),
            timeout: self.request_timeout,
        })
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

/// `min_lat,min_lng,max_lat,max_lng`
fn parse_bounding_box(value: &str) -> Option<BoundingBox> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()?;

    match parts.as_slice() {
        [min_lat, min_lng, max_lat, max_lng] if min_lat <= max_lat && min_lng <= max_lng => {
            Some(BoundingBox {
                min_lat: *min_lat,
                min_lng: *min_lng,
                max_lat: *max_lat,
                max_lng: *max_lng,
            })
        }
        _ => None,
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}
