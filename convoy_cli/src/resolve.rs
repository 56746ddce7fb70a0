use std::path::PathBuf;

use clap::Args;
use convoy_routing::{
    LatLng, ResolutionRequest, RouteResolver, RouteSession,
    cache::{CachedDirections, FileCache},
    coordinate_lookup::{
        HttpCoordinateLookup, HttpCoordinateLookupParams, LOCATION_COORDS_URL_ENV_VAR,
    },
    directions_service::DirectionsService,
    ors_api::OrsDirectionsClient,
    route_presenter::ActiveSelection,
    routing_config::RoutingConfig,
};
use tracing::{debug, info};

use crate::{output, parsers};

#[derive(Args)]
pub struct ResolveOptions {
    /// Index of the route to make active once resolved
    #[arg(short, long)]
    select: Option<usize>,

    /// Write the candidates as a GeoJSON FeatureCollection
    #[arg(short, long)]
    geojson: Option<PathBuf>,

    /// Timeout of each directions request (e.g., "15s", "PT1M")
    #[arg(short, long, value_parser = parsers::parse_timeout)]
    timeout: Option<std::time::Duration>,

    /// Bypass the directions cache
    #[arg(long)]
    no_cache: bool,
}

#[derive(Args)]
pub struct RouteArgs {
    /// Origin as LAT,LNG
    #[arg(short, long, allow_hyphen_values = true, value_parser = parsers::parse_lat_lng)]
    from: LatLng,

    /// Destination as LAT,LNG
    #[arg(long, allow_hyphen_values = true, value_parser = parsers::parse_lat_lng)]
    to: LatLng,

    #[command(flatten)]
    options: ResolveOptions,
}

#[derive(Args)]
pub struct LocateArgs {
    /// Origin location identifier
    #[arg(short, long)]
    origin: String,

    /// Destination location identifier
    #[arg(long)]
    destination: String,

    #[command(flatten)]
    options: ResolveOptions,
}

enum Target {
    Coordinates(ResolutionRequest),
    Locations { origin: String, destination: String },
}

pub async fn run_route(args: RouteArgs) -> Result<(), anyhow::Error> {
    let target = Target::Coordinates(ResolutionRequest::new(args.from, args.to));
    run(target, args.options).await
}

pub async fn run_locate(args: LocateArgs) -> Result<(), anyhow::Error> {
    let target = Target::Locations {
        origin: args.origin,
        destination: args.destination,
    };
    run(target, args.options).await
}

fn routing_config(options: &ResolveOptions) -> Result<RoutingConfig, anyhow::Error> {
    let mut config = RoutingConfig::from_env()?;

    if let Some(timeout) = options.timeout {
        config.request_timeout = timeout;
        config.validate()?;
    }

    Ok(config)
}

async fn run(target: Target, options: ResolveOptions) -> Result<(), anyhow::Error> {
    let config = routing_config(&options)?;
    let client = OrsDirectionsClient::new(config.ors_params_from_env()?)?;

    if options.no_cache {
        return resolve(RouteResolver::new(client, config), &target, &options).await;
    }

    match FileCache::from_env() {
        Ok(cache) => {
            info!("Caching directions in {}", cache.folder().display());
            let service = CachedDirections::new(client, cache);
            resolve(RouteResolver::new(service, config), &target, &options).await
        }
        Err(e) => {
            debug!("Directions cache disabled: {}", e);
            resolve(RouteResolver::new(client, config), &target, &options).await
        }
    }
}

async fn resolve<D>(
    resolver: RouteResolver<D>,
    target: &Target,
    options: &ResolveOptions,
) -> Result<(), anyhow::Error>
where
    D: DirectionsService,
{
    let session = RouteSession::new(resolver);

    let mut selection: ActiveSelection = match target {
        Target::Coordinates(request) => session.resolve(*request).await?,
        Target::Locations {
            origin,
            destination,
        } => {
            let params =
                HttpCoordinateLookupParams::from_env(session.resolver().config().request_timeout)
                    .ok_or_else(|| {
                        anyhow::anyhow!("{} is not set", LOCATION_COORDS_URL_ENV_VAR)
                    })?;
            let lookup = HttpCoordinateLookup::new(params)?;

            session
                .resolve_locations(&lookup, origin, destination)
                .await?
        }
    };

    if let Some(index) = options.select {
        selection = session.select(index)?;
    }

    let result = session
        .current_result()
        .ok_or_else(|| anyhow::anyhow!("No route resolved"))?;

    println!("{}", output::candidates_table(&result, selection.index));
    println!("{}", selection.summary);

    if let Some(distance) = selection.summary.distance_field() {
        info!("Distance field: {} km", distance);
    }

    if let Some(path) = &options.geojson {
        output::write_geojson(&result, selection.index, path)?;
        info!("Wrote {} routes to {}", result.len(), path.display());
    }

    Ok(())
}
