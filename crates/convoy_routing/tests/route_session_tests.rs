mod test_utils;

use std::time::Duration;

use convoy_routing::{
    RouteError, RouteStrategy,
    route_presenter::SelectionKind,
    route_resolver::{ResolutionRequest, RouteResolver},
    route_session::{RouteSession, SessionState},
    routing_config::RoutingConfig,
};

use crate::test_utils::{MockDirections, MockLookup, MockResponse, candidate};

fn session(responses: Vec<MockResponse>) -> RouteSession<MockDirections> {
    RouteSession::new(RouteResolver::new(
        MockDirections::new(responses),
        RoutingConfig::default(),
    ))
}

fn short_trip() -> ResolutionRequest {
    ResolutionRequest::new((0.0, 0.0), (0.0, 0.45))
}

#[tokio::test]
async fn test_resolve_publishes_primary_selection() {
    let session = session(vec![MockResponse::routes(vec![
        candidate(61_234.0, 3_629.0),
        candidate(58_000.0, 4_100.0),
    ])]);

    let selection = session.resolve(short_trip()).await.unwrap();

    assert_eq!(selection.index, 0);
    assert_eq!(selection.candidate_count, 2);
    assert_eq!(
        selection.summary.to_string(),
        "Main route (HGV) → 61.23 km · 60 min"
    );

    let result = session.current_result().unwrap();
    assert_eq!(result.strategy(), RouteStrategy::Alternatives);
    assert!(matches!(session.state(), SessionState::Resolved { .. }));
}

#[tokio::test]
async fn test_select_switches_active_candidate() {
    let session = session(vec![MockResponse::routes(vec![
        candidate(61_234.0, 3_629.0),
        candidate(58_005.0, 4_110.0),
    ])]);
    session.resolve(short_trip()).await.unwrap();

    let selection = session.select(1).unwrap();
    assert_eq!(selection.summary.kind, SelectionKind::Selected);
    assert_eq!(selection.summary.distance_field().as_deref(), Some("58.01"));

    match session.state() {
        SessionState::Resolved { selection, .. } => assert_eq!(selection.index, 1),
        state => panic!("unexpected state {:?}", state),
    }

    assert_eq!(
        session.select(2),
        Err(RouteError::SelectionOutOfRange { index: 2, count: 2 })
    );
}

#[tokio::test]
async fn test_select_without_route() {
    let session = session(vec![]);

    assert_eq!(session.select(0), Err(RouteError::NoActiveRoute));
}

#[tokio::test]
async fn test_failure_is_recorded() {
    let session = session(vec![
        MockResponse::unavailable(),
        MockResponse::unavailable(),
        MockResponse::unavailable(),
    ]);

    let error = session.resolve(short_trip()).await.unwrap_err();

    assert!(matches!(error, RouteError::NoRouteFound(_)));
    assert!(matches!(session.state(), SessionState::Failed { .. }));
    assert!(session.current_result().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_stale_resolution_is_discarded() {
    let session = session(vec![
        MockResponse::routes(vec![
            candidate(70_000.0, 4_000.0),
            candidate(75_000.0, 4_400.0),
        ])
        .delayed(Duration::from_millis(200)),
        MockResponse::routes(vec![
            candidate(50_000.0, 3_000.0),
            candidate(55_000.0, 3_300.0),
        ])
        .delayed(Duration::from_millis(10)),
    ]);

    let (first, second) = tokio::join!(
        session.resolve(short_trip()),
        session.resolve(ResolutionRequest::new((0.0, 0.0), (0.0, 0.4)))
    );

    let first = first.unwrap_err();
    assert_eq!(first, RouteError::StaleResult { token: 1, latest: 2 });
    assert!(!first.is_user_visible());

    let second = second.unwrap();
    assert_eq!(second.summary.distance_km, Some(50.0));

    let result = session.current_result().unwrap();
    assert_eq!(result.candidate(0).unwrap().distance_meters(), Some(50_000.0));
    assert_eq!(session.latest_token().get(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_previous_route_stays_active_while_resolving() {
    let session = session(vec![
        MockResponse::routes(vec![
            candidate(70_000.0, 4_000.0),
            candidate(75_000.0, 4_400.0),
        ]),
        MockResponse::routes(vec![
            candidate(50_000.0, 3_000.0),
            candidate(55_000.0, 3_300.0),
        ])
        .delayed(Duration::from_secs(5)),
    ]);
    session.resolve(short_trip()).await.unwrap();

    let (second, (in_flight, during, selected)) = tokio::join!(
        session.resolve(ResolutionRequest::new((0.0, 0.0), (0.0, 0.4))),
        async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            (session.in_flight(), session.current_result(), session.select(1))
        }
    );

    assert_eq!(in_flight.map(|token| token.get()), Some(2));
    let during = during.unwrap();
    assert_eq!(during.candidate(0).unwrap().distance_meters(), Some(70_000.0));
    assert_eq!(selected.unwrap().summary.distance_km, Some(75.0));

    assert_eq!(second.unwrap().summary.distance_km, Some(50.0));
    assert_eq!(session.in_flight(), None);
    assert_eq!(
        session.current_result().unwrap().candidate(0).unwrap().distance_meters(),
        Some(50_000.0)
    );
}

#[tokio::test]
async fn test_reset_supersedes_pending_token() {
    let session = session(vec![]);

    let token = session.issue_token();
    session.reset();

    assert!(!session.is_current(token));
    assert_eq!(session.state(), SessionState::Idle);

    let outcome = session.complete(token, Err(RouteError::NoActiveRoute));
    assert!(matches!(outcome, Err(RouteError::StaleResult { .. })));
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_resolve_locations() {
    let session = session(vec![MockResponse::routes(vec![
        candidate(50_000.0, 3_000.0),
        candidate(55_000.0, 3_300.0),
    ])]);
    let lookup = MockLookup::default()
        .with("buenos-aires", (0.0, 0.0))
        .with("la-plata", (0.0, 0.45));

    let selection = session
        .resolve_locations(&lookup, "buenos-aires", "la-plata")
        .await
        .unwrap();

    assert_eq!(selection.candidate_count, 2);
    assert_eq!(session.resolver().service().call_count(), 1);
}

#[tokio::test]
async fn test_resolve_locations_unknown_location() {
    let session = session(vec![]);
    let lookup = MockLookup::default().with("buenos-aires", (0.0, 0.0));

    let error = session
        .resolve_locations(&lookup, "buenos-aires", "atlantis")
        .await
        .unwrap_err();

    match error {
        RouteError::CoordinatesUnavailable { location_id, .. } => {
            assert_eq!(location_id, "atlantis")
        }
        error => panic!("unexpected error {:?}", error),
    }
    assert_eq!(session.resolver().service().call_count(), 0);
    assert!(matches!(session.state(), SessionState::Failed { .. }));
}
