// ==========================================
// FleetFlow - Great-circle distance
// ==========================================

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two WGS84 points, in kilometres
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Distance from an optional home location; `None` when the location is unknown
pub fn distance_from(home: (Option<f64>, Option<f64>), lat: f64, lon: f64) -> Option<f64> {
    match home {
        (Some(home_lat), Some(home_lon)) => Some(haversine_km(home_lat, home_lon, lat, lon)),
        _ => None,
    }
}
