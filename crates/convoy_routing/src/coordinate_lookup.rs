use std::{future::Future, time::Duration};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::coordinate::LatLng;

pub const LOCATION_COORDS_URL_ENV_VAR: &str = "LOCATION_COORDS_URL";
pub const LOCATION_COORDS_PARAM_ENV_VAR: &str = "LOCATION_COORDS_PARAM";

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Lookup answered with status {0}")]
    Status(u16),

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Lookup returned no usable coordinates")]
    MissingCoordinates,
}

/// Resolves an opaque location identifier (e.g. a locality picked in a form)
/// to the raw pair stored for it.
///
/// The pair is returned as stored; normalization is up to the resolver.
pub trait CoordinateLookup {
    fn coordinates(
        &self,
        location_id: &str,
    ) -> impl Future<Output = Result<LatLng, LookupError>> + Send;
}

#[derive(Deserialize)]
struct LocationCoordinates {
    lat: Option<f64>,
    lng: Option<f64>,
}

/// Reads `{ "lat": .., "lng": .. }` for a location, failing on missing or
/// non-finite values.
pub fn parse_lookup_response(body: &str) -> Result<LatLng, LookupError> {
    let coordinates: LocationCoordinates = serde_json::from_str(body)?;

    match (coordinates.lat, coordinates.lng) {
        (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Ok((lat, lng)),
        _ => Err(LookupError::MissingCoordinates),
    }
}

pub struct HttpCoordinateLookupParams {
    pub url: String,

    /// Query parameter carrying the location identifier
    pub param: String,

    pub timeout: Duration,
}

impl HttpCoordinateLookupParams {
    pub fn from_env(timeout: Duration) -> Option<Self> {
        let url = std::env::var(LOCATION_COORDS_URL_ENV_VAR).ok()?;
        let param = std::env::var(LOCATION_COORDS_PARAM_ENV_VAR)
            .unwrap_or_else(|_| "location".to_string());

        Some(Self {
            url,
            param,
            timeout,
        })
    }
}

pub struct HttpCoordinateLookup {
    params: HttpCoordinateLookupParams,
    client: reqwest::Client,
}

impl HttpCoordinateLookup {
    pub fn new(params: HttpCoordinateLookupParams) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder().timeout(params.timeout).build()?;

        Ok(Self { params, client })
    }
}

impl CoordinateLookup for HttpCoordinateLookup {
    async fn coordinates(&self, location_id: &str) -> Result<LatLng, LookupError> {
        debug!("CoordinateLookup: fetching coordinates for {}", location_id);

        let response = self
            .client
            .get(&self.params.url)
            .query(&[(self.params.param.as_str(), location_id)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!(
                "CoordinateLookup: {} answered {} for location {}",
                self.params.url, status, location_id
            );
            return Err(LookupError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        parse_lookup_response(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinates() {
        let pair = parse_lookup_response(r#"{"lat": -34.6037, "lng": -58.3816}"#).unwrap();
        assert_eq!(pair, (-34.6037, -58.3816));
    }

    #[test]
    fn test_parse_missing_coordinates() {
        assert!(matches!(
            parse_lookup_response(r#"{"lat": null, "lng": -58.3816}"#),
            Err(LookupError::MissingCoordinates)
        ));
        assert!(matches!(
            parse_lookup_response(r#"{"lng": -58.3816}"#),
            Err(LookupError::MissingCoordinates)
        ));
    }

    #[test]
    fn test_parse_non_numeric_coordinates() {
        assert!(matches!(
            parse_lookup_response(r#"{"lat": "-34.6", "lng": -58.3816}"#),
            Err(LookupError::Deserialize(_))
        ));
    }
}
