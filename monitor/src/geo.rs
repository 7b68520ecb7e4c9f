//! Great-circle geometry for the nearby filter, and the coordinate keys the
//! fan-out screens correlate on.
//!
//! Distance uses the haversine formula on a spherical Earth:
//! <https://www.movable-type.co.uk/scripts/latlong.html>
//! Good to a few meters at city scale, which is far tighter than the
//! 20 km filter needs.

use floodnet::models::Coordinate;

/// Mean Earth radius, in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two positions, in kilometers.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Keeps the items within `radius_km` of `center`, order preserved. Items
/// exactly at the radius stay in.
pub fn nearby<T>(
    center: Coordinate,
    radius_km: f64,
    items: Vec<T>,
    position: impl Fn(&T) -> Coordinate,
) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| haversine_km(center, position(item)) <= radius_km)
        .collect()
}

/// Collapses a position to a microdegree grid cell, for joining responses
/// that echo the coordinates they were queried with. Microdegrees are about
/// 0.1 m of latitude, fine enough that distinct hotspots never collide and
/// coarse enough to absorb float round-trip noise.
pub fn coordinate_key(c: Coordinate) -> (i64, i64) {
    (
        (c.latitude * 1e6).round() as i64,
        (c.longitude * 1e6).round() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relative_error(actual: f64, expected: f64) -> f64 {
        ((actual - expected) / expected).abs()
    }

    #[test]
    fn distance_to_self_is_zero() {
        let here = Coordinate::new(20.5937, 78.9629);
        assert_eq!(haversine_km(here, here), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(20.5937, 78.9629);
        let b = Coordinate::new(28.6139, 77.2090);
        let there = haversine_km(a, b);
        let back = haversine_km(b, a);
        assert!(relative_error(there, back) < 1e-12);
    }

    #[test]
    fn one_degree_of_longitude_along_the_equator() {
        let a = Coordinate::new(0.0, 10.0);
        let b = Coordinate::new(0.0, 11.0);
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        assert!(relative_error(haversine_km(a, b), expected) < 1e-6);
    }

    #[test]
    fn neighboring_city_points_fall_inside_the_filter() {
        let center = Coordinate::new(20.5937, 78.9629);
        let neighbor = Coordinate::new(20.7, 78.97);
        let d = haversine_km(center, neighbor);
        assert!(d > 11.0 && d < 13.0, "got {d} km");
        assert!(d < 20.0);
    }

    #[test]
    fn nearby_keeps_order_and_includes_the_boundary() {
        let center = Coordinate::new(20.5937, 78.9629);
        let close = Coordinate::new(20.7, 78.97);
        let far = Coordinate::new(21.6, 80.0);
        let kept = nearby(center, 20.0, vec![center, close, far], |c| *c);
        assert_eq!(kept, vec![center, close]);

        // A point exactly at the radius stays in.
        let radius = haversine_km(center, close);
        let kept = nearby(center, radius, vec![close], |c| *c);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn coordinate_keys_absorb_float_noise_but_not_real_offsets() {
        let a = Coordinate::new(20.5937, 78.9629);
        let jittered = Coordinate::new(20.5937 + 1e-9, 78.9629 - 1e-9);
        let shifted = Coordinate::new(20.5947, 78.9629);
        assert_eq!(coordinate_key(a), coordinate_key(jittered));
        assert_ne!(coordinate_key(a), coordinate_key(shifted));
    }
}
