use std::fmt::Display;

use tracing::{debug, info, warn};

use crate::{
    coordinate::{Coordinate, LatLng, normalize_coordinate_within},
    directions_error::{DirectionsError, classify},
    directions_service::DirectionsService,
    error::RouteError,
    geo_math::{haversine_meters, segment_by_distance},
    route::{RouteCandidate, RouteResult, RouteStrategy},
    route_strategies,
    routing_config::RoutingConfig,
};

/// Strategies tried, in order, when alternatives are within the service limit.
pub const SHORT_TRIP_PLAN: &[RouteStrategy] = &[
    RouteStrategy::Alternatives,
    RouteStrategy::Simple,
    RouteStrategy::MultiWaypoint,
];

/// Strategies tried, in order, beyond the alternatives distance.
pub const LONG_TRIP_PLAN: &[RouteStrategy] = &[RouteStrategy::Simple, RouteStrategy::MultiWaypoint];

/// Which strategy plan a resolution went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripLength {
    Short,
    Long,
}

impl Display for TripLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TripLength::Short => "short trip",
                TripLength::Long => "long trip",
            }
        )
    }
}

impl TripLength {
    pub fn classify(approx_km: f64, alt_max_km: f64) -> Self {
        if approx_km <= alt_max_km {
            TripLength::Short
        } else {
            TripLength::Long
        }
    }

    pub fn plan(&self) -> &'static [RouteStrategy] {
        match self {
            TripLength::Short => SHORT_TRIP_PLAN,
            TripLength::Long => LONG_TRIP_PLAN,
        }
    }
}

/// Origin and destination as handed over by the caller, normalized by the
/// resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionRequest {
    pub origin: LatLng,
    pub destination: LatLng,
}

impl ResolutionRequest {
    pub fn new(origin: LatLng, destination: LatLng) -> Self {
        Self {
            origin,
            destination,
        }
    }
}

pub struct RouteResolver<D> {
    service: D,
    config: RoutingConfig,
}

impl<D> RouteResolver<D>
where
    D: DirectionsService,
{
    pub fn new(service: D, config: RoutingConfig) -> Self {
        Self { service, config }
    }

    pub fn service(&self) -> &D {
        &self.service
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    pub fn normalize(&self, (lat, lng): LatLng) -> Result<Coordinate, RouteError> {
        normalize_coordinate_within(lat, lng, self.config.service_area.as_ref())
            .ok_or(RouteError::InvalidCoordinate { lat, lng })
    }

    /// Walks the strategy plan for the trip length and returns the first
    /// non-empty answer. Never approximates with a straight line.
    pub async fn resolve(&self, request: &ResolutionRequest) -> Result<RouteResult, RouteError> {
        let origin = self.normalize(request.origin)?;
        let destination = self.normalize(request.destination)?;

        let approx_km = haversine_meters(&origin, &destination) / 1000.0;
        let trip = TripLength::classify(approx_km, self.config.alt_max_km);

        info!(
            "Resolver: {} -> {} is a {} ({:.1} km as the crow flies)",
            origin, destination, trip, approx_km
        );

        for &strategy in trip.plan() {
            match self.attempt(strategy, &origin, &destination).await {
                Ok(candidates) if !candidates.is_empty() => {
                    debug!(
                        "Resolver: {} strategy returned {} routes",
                        strategy,
                        candidates.len()
                    );

                    if let Some(result) =
                        RouteResult::new(candidates, strategy, self.config.profile)
                    {
                        return Ok(result);
                    }
                }
                Ok(_) => {
                    debug!("Resolver: {} strategy returned no route", strategy);
                }
                Err(error) => {
                    warn!(
                        "Resolver: {} strategy failed ({:?}): {}",
                        strategy,
                        classify(&error),
                        error
                    );
                }
            }
        }

        warn!("Resolver: every strategy failed for the {}", trip);
        Err(RouteError::NoRouteFound(trip))
    }

    async fn attempt(
        &self,
        strategy: RouteStrategy,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> Result<Vec<RouteCandidate>, DirectionsError> {
        match strategy {
            RouteStrategy::Alternatives => {
                route_strategies::alternatives(&self.service, &self.config, origin, destination)
                    .await
            }
            RouteStrategy::Simple => {
                route_strategies::simple(&self.service, &self.config, origin, destination).await
            }
            RouteStrategy::MultiWaypoint => {
                let waypoints = segment_by_distance(origin, destination, self.config.leg_max_km);
                debug!(
                    "Resolver: segmented into {} waypoints of at most {} km",
                    waypoints.len(),
                    self.config.leg_max_km
                );

                route_strategies::multi_waypoint(&self.service, &self.config, &waypoints).await
            }
        }
    }
}
