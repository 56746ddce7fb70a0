#![allow(dead_code)]

use std::{collections::VecDeque, time::Duration};

use convoy_routing::{
    coordinate::{Coordinate, LatLng},
    coordinate_lookup::{CoordinateLookup, LookupError},
    directions_error::{DirectionsError, ORS_REQUEST_EXCEEDS_LIMITS},
    directions_service::{DirectionsRequest, DirectionsService},
    route::RouteCandidate,
};
use fxhash::FxHashMap;
use parking_lot::Mutex;

pub struct MockResponse {
    outcome: Result<Vec<RouteCandidate>, DirectionsError>,
    delay: Option<Duration>,
}

impl MockResponse {
    pub fn routes(candidates: Vec<RouteCandidate>) -> Self {
        Self {
            outcome: Ok(candidates),
            delay: None,
        }
    }

    pub fn limit_exceeded() -> Self {
        Self::error(DirectionsError::Api {
            status: 400,
            code: Some(ORS_REQUEST_EXCEEDS_LIMITS),
            message: "Request parameters exceed the server configuration limits.".to_string(),
        })
    }

    pub fn unavailable() -> Self {
        Self::error(DirectionsError::Api {
            status: 503,
            code: None,
            message: "Service Unavailable".to_string(),
        })
    }

    pub fn error(error: DirectionsError) -> Self {
        Self {
            outcome: Err(error),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Directions service answering from a script, in call order, and recording
/// every request it receives. Calls past the end of the script fail.
#[derive(Default)]
pub struct MockDirections {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<DirectionsRequest>>,
}

impl MockDirections {
    pub fn new(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<DirectionsRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().len()
    }
}

impl DirectionsService for MockDirections {
    async fn directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<Vec<RouteCandidate>, DirectionsError> {
        self.requests.lock().push(request.clone());
        let response = self.responses.lock().pop_front();

        match response {
            Some(response) => {
                if let Some(delay) = response.delay {
                    tokio::time::sleep(delay).await;
                }
                response.outcome
            }
            None => Err(DirectionsError::InvalidRequest(
                "unexpected directions call".to_string(),
            )),
        }
    }
}

/// Coordinate lookup backed by a map; unknown identifiers fail.
#[derive(Default)]
pub struct MockLookup {
    locations: FxHashMap<String, LatLng>,
}

impl MockLookup {
    pub fn with(mut self, location_id: &str, pair: LatLng) -> Self {
        self.locations.insert(location_id.to_string(), pair);
        self
    }
}

impl CoordinateLookup for MockLookup {
    async fn coordinates(&self, location_id: &str) -> Result<LatLng, LookupError> {
        self.locations
            .get(location_id)
            .copied()
            .ok_or(LookupError::Status(404))
    }
}

pub fn coordinate(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).unwrap()
}

/// A two-point candidate with the given distance in meters and duration in
/// seconds.
pub fn candidate(distance: f64, duration: f64) -> RouteCandidate {
    RouteCandidate::new(
        vec![coordinate(0.0, 0.0), coordinate(0.0, 0.45)],
        Some(distance),
        Some(duration),
    )
    .unwrap()
}
