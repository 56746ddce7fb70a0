use std::time::Duration;

use convoy_routing::LatLng;
use jiff::SpanRelativeTo;

/// Parses a request timeout given as a friendly span ("15s", "1m 30s"), an
/// ISO 8601 duration ("PT1M") or plain seconds. Zero and negative values are
/// rejected.
pub fn parse_timeout(input: &str) -> Result<Duration, String> {
    let duration = input
        .parse::<jiff::SignedDuration>()
        .or_else(|_| {
            input
                .parse::<jiff::Span>()
                .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
        })
        .ok()
        .or_else(|| input.parse::<i64>().ok().map(jiff::SignedDuration::from_secs))
        .ok_or_else(|| format!("Invalid timeout {}", input))?;

    if duration.is_negative() || duration.is_zero() {
        return Err(format!("Timeout must be positive, got {}", input));
    }

    Duration::try_from(duration).map_err(|e| e.to_string())
}

/// Parses `"lat,lng"`. Range checks are left to the resolver, which also
/// fixes transposed pairs.
pub fn parse_lat_lng(input: &str) -> Result<LatLng, String> {
    let (lat, lng) = input
        .split_once(',')
        .ok_or_else(|| String::from("Expected LAT,LNG"))?;

    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid latitude {}", lat.trim()))?;
    let lng = lng
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid longitude {}", lng.trim()))?;

    Ok((lat, lng))
}
