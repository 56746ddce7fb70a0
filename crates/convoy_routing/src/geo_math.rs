use crate::coordinate::Coordinate;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Most through-points the directions service accepts in one request.
pub const MAX_WAYPOINTS: usize = 50;

/// Great-circle distance between two coordinates, in meters.
pub fn haversine_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    let lat1_rad = from.lat().to_radians();
    let lat2_rad = to.lat().to_radians();

    let delta_lat = (to.lat() - from.lat()).to_radians();
    let delta_lng = (to.lng() - from.lng()).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);

    // a can drift slightly above 1 for antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_METERS * c
}

/// Splits the straight line `start -> end` into legs of at most `max_leg_km`
/// (as the crow flies) and returns the leg boundaries, endpoints included.
///
/// Interpolation is linear on latitude and longitude, not geodesic. At most
/// [`MAX_WAYPOINTS`] points are returned; past that, legs get longer than
/// `max_leg_km`.
pub fn segment_by_distance(start: &Coordinate, end: &Coordinate, max_leg_km: f64) -> Vec<Coordinate> {
    let segments = segment_count(start, end, max_leg_km);

    if segments == 1 {
        return vec![*start, *end];
    }

    let mut points = Vec::with_capacity(segments + 1);
    points.push(*start);

    for i in 1..segments {
        let t = i as f64 / segments as f64;
        let lat = start.lat() + (end.lat() - start.lat()) * t;
        let lng = start.lng() + (end.lng() - start.lng()) * t;

        // Interpolating between two valid coordinates always stays in range
        if let Some(point) = Coordinate::new(lat, lng) {
            points.push(point);
        }
    }

    points.push(*end);
    points
}

fn segment_count(start: &Coordinate, end: &Coordinate, max_leg_km: f64) -> usize {
    if !(max_leg_km.is_finite() && max_leg_km > 0.0) {
        return 1;
    }

    let total_meters = haversine_meters(start, end);
    let segments = (total_meters / (max_leg_km * 1000.0)).ceil();

    (segments as usize).clamp(1, MAX_WAYPOINTS - 1)
}
