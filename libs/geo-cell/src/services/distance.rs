use crate::models::GeoCoordinates;

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Great-circle distance between two points, in miles.
pub fn haversine_miles(a: &GeoCoordinates, b: &GeoCoordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Distance where an unresolved endpoint is infinitely far away.
pub fn distance(a: Option<&GeoCoordinates>, b: Option<&GeoCoordinates>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => haversine_miles(a, b),
        _ => f64::INFINITY,
    }
}

/// Unresolved endpoints never pass, whatever the radius.
pub fn within_radius(a: Option<&GeoCoordinates>, b: Option<&GeoCoordinates>, radius_miles: f64) -> bool {
    let d = distance(a, b);
    d.is_finite() && d <= radius_miles
}
