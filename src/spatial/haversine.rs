use crate::models::GeoPoint;
use crate::utils::constants::EARTH_RADIUS_KM;

/// Great-circle distance on the unit sphere between two `[lat, lon]` pairs
/// given in radians. The result is the central angle in radians.
pub fn haversine(p: [f64; 2], q: [f64; 2]) -> f64 {
    let delta_lat = q[0] - p[0];
    let delta_lon = q[1] - p[1];

    let a = (delta_lat / 2.0).sin().powi(2)
        + p[0].cos() * q[0].cos() * (delta_lon / 2.0).sin().powi(2);

    2.0 * a.clamp(0.0, 1.0).sqrt().asin()
}

/// Haversine distance between two degree coordinates, in kilometres.
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    EARTH_RADIUS_KM * haversine(a.to_radians(), b.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn point(latitude: f64, longitude: f64) -> GeoPoint {
        GeoPoint::new(latitude, longitude).unwrap()
    }

    #[test]
    fn test_haversine_distance() {
        // London to Edinburgh
        let distance = distance_km(&point(51.5074, -0.1278), &point(55.9533, -3.1883));
        assert!((distance - 534.0).abs() < 10.0);
    }

    #[test]
    fn test_zero_distance() {
        let pune = point(18.52, 73.85).to_radians();
        assert_eq!(haversine(pune, pune), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            (point(18.52, 73.85), point(19.0, 74.0)),
            (point(-33.86, 151.21), point(40.71, -74.0)),
            (point(89.9, 0.0), point(-89.9, 179.9)),
        ];
        for (p, q) in pairs {
            let forward = haversine(p.to_radians(), q.to_radians());
            let backward = haversine(q.to_radians(), p.to_radians());
            assert!((forward - backward).abs() <= f64::EPSILON);
        }
    }

    #[test]
    fn test_antipodes_and_dateline() {
        let antipodal = haversine(point(0.0, 0.0).to_radians(), point(0.0, 180.0).to_radians());
        assert!((antipodal - PI).abs() < 1e-9);

        // Crossing the antimeridian is a short hop, not most of the globe
        let hop = distance_km(&point(0.0, 179.9), &point(0.0, -179.9));
        assert!((hop - 22.24).abs() < 0.1);
    }

    #[test]
    fn test_triangle_inequality() {
        let a = point(18.52, 73.85).to_radians();
        let b = point(28.61, 77.21).to_radians();
        let c = point(13.08, 80.27).to_radians();
        assert!(haversine(a, c) <= haversine(a, b) + haversine(b, c));
    }
}
