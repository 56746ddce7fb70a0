pub mod cache;
pub mod coordinate;
pub mod coordinate_lookup;
pub mod directions_error;
pub mod directions_service;
pub mod error;
pub mod geo_math;
pub mod ors_api;
pub mod route;
pub mod route_presenter;
pub mod route_resolver;
pub mod route_session;
pub mod route_strategies;
pub mod routing_config;
pub mod vehicle_profile;

pub use coordinate::{Coordinate, LatLng};
pub use error::RouteError;
pub use route::{RouteCandidate, RouteResult, RouteStrategy};
pub use route_resolver::{ResolutionRequest, RouteResolver};
pub use route_session::RouteSession;
