//! Spatial query utilities for distance calculations.
//!
//! Uses the Haversine formula on a spherical Earth of mean radius 6371 km.
//! Accuracy near antipodal points is not a goal.

use std::collections::HashSet;

use crate::identifiers::StationIdentifier;
use crate::models::query::validate_radius;
use crate::models::traits::Located;
use crate::models::types::{AnnotatedStation, GeoPoint, Result, StationRecord};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers spanned by one degree of latitude (or of longitude at the equator).
pub const KM_PER_DEGREE: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

/// Great-circle distance between two points in kilometers.
///
/// Symmetric, and exactly zero for identical points.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat() - a.lat()).to_radians();
    let d_lng = (b.lng() - a.lng()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat().to_radians().cos() * b.lat().to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Convert kilometers to degrees of latitude
pub fn km_to_degrees(km: f64) -> f64 {
    km / KM_PER_DEGREE
}

/// Keep the stations within `radius_km` of `center` (inclusive), annotated
/// with their distance. Input order is preserved.
pub fn filter_within_radius(
    center: GeoPoint,
    radius_km: f64,
    stations: &[StationRecord],
) -> Result<Vec<AnnotatedStation>> {
    validate_radius(radius_km)?;

    let within: Vec<AnnotatedStation> = stations
        .iter()
        .filter_map(|station| annotate_within(center, radius_km, station))
        .collect();

    tracing::debug!(
        candidates = stations.len(),
        within = within.len(),
        radius_km,
        "radius filter"
    );

    Ok(within)
}

pub(crate) fn annotate_within(
    center: GeoPoint,
    radius_km: f64,
    station: &StationRecord,
) -> Option<AnnotatedStation> {
    let distance_km = haversine_km(center, station.position());

    (distance_km <= radius_km).then(|| AnnotatedStation {
        station: station.clone(),
        distance_km,
    })
}

/// Items paired with their distance from `target`, nearest first.
/// Equal distances keep input order.
pub(crate) fn by_distance<T: Located>(target: GeoPoint, items: &[T]) -> Vec<(f64, &T)> {
    let mut scored: Vec<(f64, &T)> = items
        .iter()
        .map(|item| (haversine_km(target, item.position()), item))
        .collect();

    scored.sort_by(|a, b| a.0.total_cmp(&b.0));
    scored
}

/// The `k` stations nearest to `target`, nearest first, regardless of radius.
pub fn nearest_stations(
    target: GeoPoint,
    stations: &[StationRecord],
    k: usize,
) -> Vec<AnnotatedStation> {
    by_distance(target, stations)
        .into_iter()
        .take(k)
        .map(|(distance_km, station)| AnnotatedStation {
            station: station.clone(),
            distance_km,
        })
        .collect()
}

/// Identifiers of the `k` items nearest to `target`.
///
/// Meant for renderers that show a handful of markers and hide the rest.
pub fn top_k_by_distance<T: Located>(
    target: GeoPoint,
    items: &[T],
    k: usize,
) -> HashSet<StationIdentifier> {
    by_distance(target, items)
        .into_iter()
        .take(k)
        .map(|(_, item)| item.id().clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::ProximityError;
    use approx::assert_abs_diff_eq;

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    fn station(name: &str, lat: f64, lng: f64) -> StationRecord {
        StationRecord::new(name, name, point(lat, lng))
    }

    fn delhi() -> GeoPoint {
        point(28.6139, 77.2090)
    }

    fn sample_points() -> Vec<GeoPoint> {
        vec![
            point(0.0, 0.0),
            delhi(),
            point(19.0760, 72.8777),
            point(-33.8688, 151.2093),
            point(51.5074, -0.1278),
            point(64.1466, -21.9426),
            point(-89.9, 179.9),
            point(89.9, -179.9),
        ]
    }

    #[test]
    fn test_haversine_known_distance() {
        // Delhi to Mumbai is roughly 1150 km
        let mumbai = point(19.0760, 72.8777);
        let dist = haversine_km(delhi(), mumbai);
        assert!((dist - 1150.0).abs() < 20.0, "got {dist}");
    }

    #[test]
    fn test_haversine_quarter_meridian() {
        let dist = haversine_km(point(0.0, 0.0), point(90.0, 0.0));
        assert_abs_diff_eq!(dist, EARTH_RADIUS_KM * std::f64::consts::FRAC_PI_2, epsilon = 1e-6);
    }

    #[test]
    fn test_haversine_symmetric_and_zero() {
        let points = sample_points();
        for &a in &points {
            assert_eq!(haversine_km(a, a), 0.0);
            for &b in &points {
                assert_abs_diff_eq!(haversine_km(a, b), haversine_km(b, a), epsilon = 1e-9);
                assert!(haversine_km(a, b) >= 0.0);
            }
        }
    }

    #[test]
    fn test_km_to_degrees() {
        assert_abs_diff_eq!(km_to_degrees(KM_PER_DEGREE), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(km_to_degrees(5.0), 0.04497, epsilon = 1e-4);
    }

    #[test]
    fn test_haversine_uses_6371_km_sphere() {
        // One degree of arc on a 6371 km sphere.
        let dist = haversine_km(point(0.0, 0.0), point(0.0, 1.0));
        assert_abs_diff_eq!(dist, KM_PER_DEGREE, epsilon = 1e-9);
        assert_abs_diff_eq!(dist, 111.19492664455873, epsilon = 1e-9);
    }

    #[test]
    fn test_filter_delhi_scenario() {
        let stations = vec![
            station("A", 28.6229, 77.2100),
            station("B", 28.7041, 77.1025),
        ];

        let within = filter_within_radius(delhi(), 5.0, &stations).unwrap();
        assert_eq!(within.len(), 1);
        assert_eq!(within[0].station.name(), "A");
        assert!(within[0].distance_km > 0.9 && within[0].distance_km < 1.2);

        let b_distance = haversine_km(delhi(), stations[1].position());
        assert!(b_distance > 12.0);
    }

    #[test]
    fn test_filter_boundary_is_inclusive() {
        let target = station("edge", 28.65, 77.25);
        let radius = haversine_km(delhi(), target.position());

        let within = filter_within_radius(delhi(), radius, &[target]).unwrap();
        assert_eq!(within.len(), 1);
        assert_eq!(within[0].distance_km, radius);
    }

    #[test]
    fn test_filter_every_result_within_radius() {
        let stations: Vec<StationRecord> = (0..40)
            .map(|i| {
                let offset = i as f64 * 0.01;
                station(&format!("s{i}"), 28.6139 + offset, 77.2090 - offset / 2.0)
            })
            .collect();

        for radius in [0.5, 1.0, 3.0, 10.0, 50.0] {
            for within in filter_within_radius(delhi(), radius, &stations).unwrap() {
                assert!(haversine_km(delhi(), within.station.position()) <= radius);
                assert_eq!(within.distance_km, haversine_km(delhi(), within.station.position()));
            }
        }
    }

    #[test]
    fn test_filter_is_idempotent() {
        let stations: Vec<StationRecord> = (0..20)
            .map(|i| station(&format!("s{i}"), 28.60 + i as f64 * 0.005, 77.20))
            .collect();

        let once: Vec<StationRecord> = filter_within_radius(delhi(), 3.0, &stations)
            .unwrap()
            .into_iter()
            .map(|a| a.station)
            .collect();
        let twice: Vec<StationRecord> = filter_within_radius(delhi(), 3.0, &once)
            .unwrap()
            .into_iter()
            .map(|a| a.station)
            .collect();

        assert!(!once.is_empty());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_keeps_colocated_stations_in_order() {
        let stations = vec![
            station("first", 28.62, 77.21),
            station("second", 28.62, 77.21),
        ];

        let within = filter_within_radius(delhi(), 5.0, &stations).unwrap();
        let names: Vec<&str> = within.iter().map(|a| a.station.name()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn test_filter_validation() {
        assert!(filter_within_radius(delhi(), 5.0, &[]).unwrap().is_empty());

        for radius in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                filter_within_radius(delhi(), radius, &[]),
                Err(ProximityError::InvalidRadius(_))
            ));
        }
    }

    #[test]
    fn test_nearest_and_top_k() {
        let stations = vec![
            station("far", 28.80, 77.20),
            station("near", 28.615, 77.209),
            station("mid", 28.65, 77.21),
            station("twin", 28.65, 77.21),
        ];

        let nearest = nearest_stations(delhi(), &stations, 3);
        let names: Vec<&str> = nearest.iter().map(|a| a.station.name()).collect();
        assert_eq!(names, ["near", "mid", "twin"]);

        let top = top_k_by_distance(delhi(), &stations, 2);
        assert_eq!(top.len(), 2);
        assert!(top.contains(&StationIdentifier::new("near")));
        assert!(top.contains(&StationIdentifier::new("mid")));

        assert!(top_k_by_distance(delhi(), &stations, 0).is_empty());
        assert_eq!(top_k_by_distance(delhi(), &stations, 10).len(), 4);
    }
}
