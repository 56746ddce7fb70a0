use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::{
    coordinate_lookup::CoordinateLookup,
    directions_service::DirectionsService,
    error::RouteError,
    route::RouteResult,
    route_presenter::{self, ActiveSelection},
    route_resolver::{ResolutionRequest, RouteResolver},
};

/// Generation number of a resolution. Only the most recently issued token may
/// publish its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Last published outcome of a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Resolved {
        token: RequestToken,
        result: RouteResult,
        selection: ActiveSelection,
    },
    Failed {
        token: RequestToken,
        error: RouteError,
    },
}

struct SessionInner {
    in_flight: Option<RequestToken>,
    published: SessionState,
}

/// Owns the active [`RouteResult`] of a view and makes sure that a slow
/// resolution never overwrites the outcome of a newer one.
///
/// The published state only changes when the latest resolution completes, so
/// the previous route stays selectable while a new one is in flight.
pub struct RouteSession<D> {
    resolver: RouteResolver<D>,
    latest: AtomicU64,
    inner: RwLock<SessionInner>,
}

impl<D> RouteSession<D>
where
    D: DirectionsService,
{
    pub fn new(resolver: RouteResolver<D>) -> Self {
        Self {
            resolver,
            latest: AtomicU64::new(0),
            inner: RwLock::new(SessionInner {
                in_flight: None,
                published: SessionState::Idle,
            }),
        }
    }

    pub fn resolver(&self) -> &RouteResolver<D> {
        &self.resolver
    }

    pub fn state(&self) -> SessionState {
        self.inner.read().published.clone()
    }

    /// Token of the resolution still running, if any.
    pub fn in_flight(&self) -> Option<RequestToken> {
        self.inner.read().in_flight
    }

    pub fn current_result(&self) -> Option<RouteResult> {
        match &self.inner.read().published {
            SessionState::Resolved { result, .. } => Some(result.clone()),
            _ => None,
        }
    }

    pub fn latest_token(&self) -> RequestToken {
        RequestToken(self.latest.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest_token() == token
    }

    /// Starts a new generation, superseding anything still in flight.
    pub fn issue_token(&self) -> RequestToken {
        let mut inner = self.inner.write();
        let token = RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1);
        inner.in_flight = Some(token);
        token
    }

    /// Drops the current route and supersedes in-flight resolutions, e.g. when
    /// one of the location selectors is cleared.
    pub fn reset(&self) {
        let mut inner = self.inner.write();
        self.latest.fetch_add(1, Ordering::SeqCst);
        inner.in_flight = None;
        inner.published = SessionState::Idle;
    }

    pub async fn resolve(&self, request: ResolutionRequest) -> Result<ActiveSelection, RouteError> {
        let token = self.issue_token();
        let outcome = self.resolver.resolve(&request).await;

        self.complete(token, outcome)
    }

    /// Looks both locations up concurrently, then resolves between them. The
    /// lookups belong to the same generation as the resolution.
    pub async fn resolve_locations<L>(
        &self,
        lookup: &L,
        origin_id: &str,
        destination_id: &str,
    ) -> Result<ActiveSelection, RouteError>
    where
        L: CoordinateLookup,
    {
        let token = self.issue_token();
        let outcome = self
            .lookup_and_resolve(lookup, origin_id, destination_id)
            .await;

        self.complete(token, outcome)
    }

    async fn lookup_and_resolve<L>(
        &self,
        lookup: &L,
        origin_id: &str,
        destination_id: &str,
    ) -> Result<RouteResult, RouteError>
    where
        L: CoordinateLookup,
    {
        let (origin, destination) = tokio::join!(
            lookup.coordinates(origin_id),
            lookup.coordinates(destination_id)
        );

        let origin = origin.map_err(|e| RouteError::CoordinatesUnavailable {
            location_id: origin_id.to_string(),
            reason: e.to_string(),
        })?;
        let destination = destination.map_err(|e| RouteError::CoordinatesUnavailable {
            location_id: destination_id.to_string(),
            reason: e.to_string(),
        })?;

        self.resolver
            .resolve(&ResolutionRequest::new(origin, destination))
            .await
    }

    /// Publishes the outcome of the resolution issued with `token`, unless a
    /// newer one was issued meanwhile.
    pub fn complete(
        &self,
        token: RequestToken,
        outcome: Result<RouteResult, RouteError>,
    ) -> Result<ActiveSelection, RouteError> {
        let mut inner = self.inner.write();

        let latest = self.latest.load(Ordering::SeqCst);
        if token.0 != latest {
            debug!(
                "Session: discarding resolution {} superseded by {}",
                token.0, latest
            );
            return Err(RouteError::StaleResult {
                token: token.0,
                latest,
            });
        }

        inner.in_flight = None;

        match outcome {
            Ok(result) => {
                let selection = route_presenter::present(&result);
                info!("Session: {}", selection.summary);

                inner.published = SessionState::Resolved {
                    token,
                    result,
                    selection: selection.clone(),
                };
                Ok(selection)
            }
            Err(error) => {
                info!("Session: resolution {} failed: {}", token.0, error);

                inner.published = SessionState::Failed {
                    token,
                    error: error.clone(),
                };
                Err(error)
            }
        }
    }

    /// Switches the active candidate of the current result.
    pub fn select(&self, index: usize) -> Result<ActiveSelection, RouteError> {
        let mut inner = self.inner.write();

        match &mut inner.published {
            SessionState::Resolved {
                result, selection, ..
            } => {
                let selected = route_presenter::select(result, index)?;
                *selection = selected.clone();
                Ok(selected)
            }
            _ => Err(RouteError::NoActiveRoute),
        }
    }
}
