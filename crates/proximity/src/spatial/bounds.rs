//! Rectangular view queries.
//!
//! A route view asks for every station inside a padded box around the
//! route; when the box holds none, the nearest stations to its center are
//! returned instead so the view is never empty.
//!
//! Boxes do not wrap the antimeridian.

use geo::{coord, Rect};

use crate::models::traits::Located;
use crate::models::types::{GeoPoint, ProximityError, Result};
use crate::spatial::queries::by_distance;

/// Padding added around route points, roughly 5 km.
pub const DEFAULT_ROUTE_PADDING_DEG: f64 = 0.045;

/// Nearest stations returned when a view contains none.
pub const DEFAULT_VIEW_FALLBACK: usize = 25;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    rect: Rect,
}

impl BoundingBox {
    /// Box spanned by two opposite corners, in any order.
    pub fn new(a: GeoPoint, b: GeoPoint) -> Self {
        Self {
            rect: Rect::new(
                coord! { x: a.lng(), y: a.lat() },
                coord! { x: b.lng(), y: b.lat() },
            ),
        }
    }

    /// Smallest box holding every point, grown by `padding_deg` on each
    /// side and clamped to valid coordinates.
    pub fn around(points: impl IntoIterator<Item = GeoPoint>, padding_deg: f64) -> Result<Self> {
        if !padding_deg.is_finite() || padding_deg < 0.0 {
            return Err(ProximityError::InvalidData(format!(
                "padding must be a non-negative number of degrees, got {padding_deg}"
            )));
        }

        let mut points = points.into_iter();
        let first = points
            .next()
            .ok_or_else(|| ProximityError::InvalidData("cannot bound an empty point set".into()))?;

        let (mut min_lat, mut max_lat) = (first.lat(), first.lat());
        let (mut min_lng, mut max_lng) = (first.lng(), first.lng());
        for point in points {
            min_lat = min_lat.min(point.lat());
            max_lat = max_lat.max(point.lat());
            min_lng = min_lng.min(point.lng());
            max_lng = max_lng.max(point.lng());
        }

        let south_west = GeoPoint::new(
            (min_lat - padding_deg).max(-90.0),
            (min_lng - padding_deg).max(-180.0),
        )?;
        let north_east = GeoPoint::new(
            (max_lat + padding_deg).min(90.0),
            (max_lng + padding_deg).min(180.0),
        )?;

        Ok(Self::new(south_west, north_east))
    }

    pub fn south_west(&self) -> (f64, f64) {
        (self.rect.min().y, self.rect.min().x)
    }

    pub fn north_east(&self) -> (f64, f64) {
        (self.rect.max().y, self.rect.max().x)
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: GeoPoint) -> bool {
        let (min, max) = (self.rect.min(), self.rect.max());
        (min.y..=max.y).contains(&point.lat()) && (min.x..=max.x).contains(&point.lng())
    }

    pub fn center(&self) -> Result<GeoPoint> {
        let center = self.rect.center();
        GeoPoint::new(center.y, center.x)
    }
}

/// Items inside `bbox` in input order, or the `fallback` items nearest to
/// its center when none are inside.
pub fn stations_in_view<'a, T: Located>(
    bbox: &BoundingBox,
    items: &'a [T],
    fallback: usize,
) -> Result<Vec<&'a T>> {
    let inside: Vec<&T> = items.iter().filter(|item| bbox.contains(item.position())).collect();
    if !inside.is_empty() {
        return Ok(inside);
    }

    let center = bbox.center()?;
    tracing::debug!(fallback, "no stations in view, using nearest to center");

    Ok(by_distance(center, items)
        .into_iter()
        .take(fallback)
        .map(|(_, item)| item)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::StationRecord;
    use approx::assert_abs_diff_eq;

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    #[test]
    fn test_around_route() {
        let route = [point(28.61, 77.20), point(28.45, 77.03), point(28.98, 77.70)];
        let bbox = BoundingBox::around(route, DEFAULT_ROUTE_PADDING_DEG).unwrap();

        let (south, west) = bbox.south_west();
        let (north, east) = bbox.north_east();
        assert_abs_diff_eq!(south, 28.405, epsilon = 1e-9);
        assert_abs_diff_eq!(west, 76.985, epsilon = 1e-9);
        assert_abs_diff_eq!(north, 29.025, epsilon = 1e-9);
        assert_abs_diff_eq!(east, 77.745, epsilon = 1e-9);

        for p in route {
            assert!(bbox.contains(p));
        }
        assert!(!bbox.contains(point(28.0, 77.2)));
    }

    #[test]
    fn test_around_clamps_and_validates() {
        let bbox = BoundingBox::around([point(89.99, 179.99)], 1.0).unwrap();
        assert_eq!(bbox.north_east(), (90.0, 180.0));

        assert!(BoundingBox::around(std::iter::empty(), 0.1).is_err());
        assert!(BoundingBox::around([point(0.0, 0.0)], -0.1).is_err());
    }

    #[test]
    fn test_corner_order_does_not_matter() {
        let a = BoundingBox::new(point(10.0, 20.0), point(12.0, 22.0));
        let b = BoundingBox::new(point(12.0, 22.0), point(10.0, 20.0));
        assert_eq!(a, b);
        assert_eq!(a.center().unwrap(), point(11.0, 21.0));
        assert!(a.contains(point(10.0, 22.0)));
    }

    #[test]
    fn test_stations_in_view_and_fallback() {
        let stations = vec![
            StationRecord::new("in", "In", point(28.60, 77.20)),
            StationRecord::new("far", "Far", point(19.07, 72.87)),
            StationRecord::new("near", "Near", point(28.70, 77.10)),
        ];

        let view = BoundingBox::new(point(28.5, 77.1), point(28.65, 77.3));
        let inside = stations_in_view(&view, &stations, DEFAULT_VIEW_FALLBACK).unwrap();
        let ids: Vec<&str> = inside.iter().map(|s| s.id().as_str()).collect();
        assert_eq!(ids, ["in"]);

        let empty = BoundingBox::new(point(27.0, 76.0), point(27.1, 76.1));
        let nearest = stations_in_view(&empty, &stations, 2).unwrap();
        let ids: Vec<&str> = nearest.iter().map(|s| s.id().as_str()).collect();
        assert_eq!(ids, ["in", "near"]);
    }
}
