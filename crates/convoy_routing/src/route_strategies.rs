//! The three request shapes tried by the resolver, from the richest to the
//! most conservative.

use std::time::Duration;

use tracing::{debug, warn};

use crate::{
    coordinate::Coordinate,
    directions_error::DirectionsError,
    directions_service::{DirectionsRequest, DirectionsService},
    route::RouteCandidate,
    routing_config::RoutingConfig,
};

/// Runs a single directions call, turning an elapsed `timeout` into
/// [`DirectionsError::Timeout`].
pub async fn request_with_timeout<D>(
    service: &D,
    request: &DirectionsRequest,
    timeout: Duration,
) -> Result<Vec<RouteCandidate>, DirectionsError>
where
    D: DirectionsService,
{
    match tokio::time::timeout(timeout, service.directions(request)).await {
        Ok(result) => result,
        Err(_) => Err(DirectionsError::Timeout(timeout)),
    }
}

/// Requests up to `target_count` alternatives. When the service returns fewer
/// than two routes, the complementary preference is asked for as well and its
/// route is appended unless it is a near-duplicate of the first one.
pub async fn alternatives<D>(
    service: &D,
    config: &RoutingConfig,
    origin: &Coordinate,
    destination: &Coordinate,
) -> Result<Vec<RouteCandidate>, DirectionsError>
where
    D: DirectionsService,
{
    let primary = DirectionsRequest::new(config.profile, vec![*origin, *destination])
        .with_alternative_routes(config.alternative_routes)
        .with_preference(config.primary_preference);

    let mut candidates = request_with_timeout(service, &primary, config.request_timeout).await?;
    debug!(
        "Strategies: {:?} request returned {} routes",
        config.primary_preference,
        candidates.len()
    );

    if candidates.len() >= 2 {
        return Ok(candidates);
    }

    let complementary = config.primary_preference.complement();
    let secondary = primary.with_preference(complementary);

    match request_with_timeout(service, &secondary, config.request_timeout).await {
        Ok(secondary_candidates) => {
            if let Some(alternative) = secondary_candidates.into_iter().next() {
                if is_distinct_alternative(
                    candidates.first(),
                    &alternative,
                    config.near_duplicate_tolerance,
                ) {
                    debug!("Strategies: added {:?} route as alternative", complementary);
                    candidates.push(alternative);
                } else {
                    debug!(
                        "Strategies: {:?} route is a near-duplicate, not added",
                        complementary
                    );
                }
            }
        }
        Err(error) => {
            warn!(
                "Strategies: {:?} request failed, keeping primary routes: {}",
                complementary, error
            );
        }
    }

    Ok(candidates)
}

/// A route without alternatives.
pub async fn simple<D>(
    service: &D,
    config: &RoutingConfig,
    origin: &Coordinate,
    destination: &Coordinate,
) -> Result<Vec<RouteCandidate>, DirectionsError>
where
    D: DirectionsService,
{
    let request = DirectionsRequest::new(config.profile, vec![*origin, *destination])
        .with_preference(config.primary_preference);

    request_with_timeout(service, &request, config.request_timeout).await
}

/// A single route forced through `waypoints` in order.
pub async fn multi_waypoint<D>(
    service: &D,
    config: &RoutingConfig,
    waypoints: &[Coordinate],
) -> Result<Vec<RouteCandidate>, DirectionsError>
where
    D: DirectionsService,
{
    if waypoints.len() < 2 {
        return Err(DirectionsError::InvalidRequest(format!(
            "a multi-waypoint route needs at least 2 coordinates, got {}",
            waypoints.len()
        )));
    }

    let request = DirectionsRequest::new(config.profile, waypoints.to_vec())
        .with_preference(config.primary_preference);

    request_with_timeout(service, &request, config.request_timeout).await
}

/// Whether `alternative` differs enough from `primary` to be shown. Unknown or
/// zero distances count as different.
pub fn is_distinct_alternative(
    primary: Option<&RouteCandidate>,
    alternative: &RouteCandidate,
    tolerance: f64,
) -> bool {
    let primary_distance = primary.and_then(RouteCandidate::distance_meters);

    match (primary_distance, alternative.distance_meters()) {
        (Some(primary), Some(other)) if primary > 0.0 && other > 0.0 => {
            (primary - other).abs() / primary > tolerance
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(distance: Option<f64>) -> RouteCandidate {
        RouteCandidate::new(
            vec![
                Coordinate::new(0.0, 0.0).unwrap(),
                Coordinate::new(0.0, 0.1).unwrap(),
            ],
            distance,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_within_tolerance_is_duplicate() {
        let primary = candidate(Some(10_000.0));

        assert!(!is_distinct_alternative(Some(&primary), &candidate(Some(10_300.0)), 0.03));
        assert!(!is_distinct_alternative(Some(&primary), &candidate(Some(9_750.0)), 0.03));
    }

    #[test]
    fn test_beyond_tolerance_is_distinct() {
        let primary = candidate(Some(10_000.0));

        assert!(is_distinct_alternative(Some(&primary), &candidate(Some(10_301.0)), 0.03));
        assert!(is_distinct_alternative(Some(&primary), &candidate(Some(9_600.0)), 0.03));
    }

    #[test]
    fn test_unknown_distance_is_distinct() {
        let primary = candidate(Some(10_000.0));

        assert!(is_distinct_alternative(Some(&primary), &candidate(None), 0.03));
        assert!(is_distinct_alternative(Some(&candidate(None)), &primary, 0.03));
        assert!(is_distinct_alternative(None, &primary, 0.03));
        assert!(is_distinct_alternative(Some(&candidate(Some(0.0))), &primary, 0.03));
    }
}
