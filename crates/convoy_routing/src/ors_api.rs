use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::{
    coordinate::Coordinate,
    directions_error::DirectionsError,
    directions_service::{AlternativeRoutes, DirectionsRequest, DirectionsService, Preference},
    route::RouteCandidate,
};

pub type OrsPoint = [f64; 2];

pub const ORS_DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";

#[derive(Debug, Clone, Serialize)]
pub struct DirectionsRequestBody {
    /// Through-points as `[lng, lat]`
    pub coordinates: Vec<OrsPoint>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_routes: Option<AlternativeRoutes>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub preference: Option<Preference>,

    /// Turn-by-turn instructions are never displayed
    pub instructions: bool,
}

impl From<&DirectionsRequest> for DirectionsRequestBody {
    fn from(request: &DirectionsRequest) -> Self {
        Self {
            coordinates: request
                .coordinates
                .iter()
                .map(Coordinate::to_lng_lat)
                .collect(),
            alternative_routes: request.alternative_routes,
            preference: request.preference,
            instructions: false,
        }
    }
}

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: LineStringGeometry,

    #[serde(default)]
    properties: FeatureProperties,
}

#[derive(Deserialize)]
struct LineStringGeometry {
    #[serde(default)]
    coordinates: Vec<Vec<f64>>,
}

#[derive(Deserialize, Default)]
struct FeatureProperties {
    summary: Option<Measurements>,
    segments: Option<Vec<Measurements>>,
}

/// Distance in meters and duration in seconds. ORS leaves out zero values.
#[derive(Deserialize, Default, Clone, Copy)]
struct Measurements {
    distance: Option<f64>,
    duration: Option<f64>,
}

impl FeatureProperties {
    fn distance_and_duration(&self) -> (Option<f64>, Option<f64>) {
        if let Some(summary) = self.summary {
            if summary.distance.is_some() || summary.duration.is_some() {
                return (summary.distance, summary.duration);
            }
        }

        match &self.segments {
            Some(segments) if !segments.is_empty() => {
                let distance = segments.iter().filter_map(|s| s.distance).sum();
                let duration = segments.iter().filter_map(|s| s.duration).sum();
                (Some(distance), Some(duration))
            }
            _ => (None, None),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OrsErrorDetail {
    Coded { code: u32, message: String },
    Message(String),
}

#[derive(Deserialize)]
struct OrsErrorPayload {
    error: OrsErrorDetail,
}

/// Parses a successful GeoJSON directions answer. Features whose geometry is
/// not a usable line are skipped.
pub fn parse_directions_response(body: &str) -> Result<Vec<RouteCandidate>, DirectionsError> {
    let collection: FeatureCollection = serde_json::from_str(body)?;

    let candidates = collection
        .features
        .into_iter()
        .enumerate()
        .filter_map(|(index, feature)| {
            let geometry: Vec<Coordinate> = feature
                .geometry
                .coordinates
                .iter()
                .filter(|pair| pair.len() >= 2)
                .filter_map(|pair| Coordinate::from_lng_lat([pair[0], pair[1]]))
                .collect();

            let (distance, duration) = feature.properties.distance_and_duration();

            let candidate = RouteCandidate::new(geometry, distance, duration);
            if candidate.is_none() {
                debug!("OrsApi: skipping feature {} without a usable geometry", index);
            }
            candidate
        })
        .collect();

    Ok(candidates)
}

/// Builds the error for a non-2xx answer, keeping the ORS error code when the
/// body carries one.
pub fn parse_error_response(status: u16, body: &str) -> DirectionsError {
    match serde_json::from_str::<OrsErrorPayload>(body) {
        Ok(OrsErrorPayload {
            error: OrsErrorDetail::Coded { code, message },
        }) => DirectionsError::Api {
            status,
            code: Some(code),
            message,
        },
        Ok(OrsErrorPayload {
            error: OrsErrorDetail::Message(message),
        }) => DirectionsError::Api {
            status,
            code: None,
            message,
        },
        Err(_) => DirectionsError::Api {
            status,
            code: None,
            message: body.to_string(),
        },
    }
}

pub struct OrsClientParams {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

pub struct OrsDirectionsClient {
    params: OrsClientParams,
    client: reqwest::Client,
}

impl OrsDirectionsClient {
    pub fn new(params: OrsClientParams) -> Result<Self, DirectionsError> {
        let client = reqwest::Client::builder().timeout(params.timeout).build()?;

        Ok(Self { params, client })
    }

    fn directions_url(&self, request: &DirectionsRequest) -> String {
        format!(
            "{}/v2/directions/{}/geojson",
            self.params.base_url.trim_end_matches('/'),
            request.profile
        )
    }
}

impl DirectionsService for OrsDirectionsClient {
    async fn directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<Vec<RouteCandidate>, DirectionsError> {
        let url = self.directions_url(request);
        let body = DirectionsRequestBody::from(request);

        debug!(
            "OrsApi: POST {} with {} coordinates, alternatives={}, preference={:?}",
            url,
            body.coordinates.len(),
            body.alternative_routes.is_some(),
            body.preference
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.params.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DirectionsError::Timeout(self.params.timeout)
                } else {
                    DirectionsError::Request(e)
                }
            })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let error = parse_error_response(status.as_u16(), &text);
            error!("OrsApi: directions request failed: {}", error);
            return Err(error);
        }

        parse_directions_response(&text).inspect_err(|e| {
            error!("OrsApi: failed to parse directions response: {}", e);
        })
    }
}
