//! R-tree backed station index for repeated radius queries.
//!
//! ## Two-Stage Filtering
//!
//! 1. **R-tree filter**: a Euclidean circle in degree space that is
//!    guaranteed to cover the geodesic search circle
//! 2. **Haversine filter**: the exact inclusive distance check used by
//!    [`filter_within_radius`](crate::spatial::queries::filter_within_radius)
//!
//! The second stage is the same predicate as the linear filter, so both
//! paths return the same stations. Queries whose circle reaches a pole fall
//! back to a linear scan; circles crossing the antimeridian query the tree
//! once more with the center shifted by 360°.

use std::f64::consts::FRAC_PI_2;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::models::query::{validate_radius, QueryParameters};
use crate::models::types::{AnnotatedStation, GeoPoint, RankedResult, Result, StationRecord};
use crate::ranking::refine_and_rank;
use crate::spatial::queries::{annotate_within, km_to_degrees, EARTH_RADIUS_KM};

/// Relative slack applied to the covering circle against rounding.
const COVER_SLACK: f64 = 1e-9;

// ============================================================================
// Station Spatial Node
// ============================================================================

/// Position of one station in `[lng, lat]` degree space.
#[derive(Clone, Debug)]
struct StationNode {
    slot: usize,
    point: [f64; 2],
}

impl StationNode {
    fn new(slot: usize, position: GeoPoint) -> Self {
        Self {
            slot,
            point: [position.lng(), position.lat()],
        }
    }
}

impl RTreeObject for StationNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StationNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ============================================================================
// Covering circle
// ============================================================================

/// Where the R-tree has to look for a given geodesic circle.
#[derive(Debug, PartialEq)]
enum Coverage {
    /// Query each center with the squared degree radius.
    Circles { centers: Vec<[f64; 2]>, radius_2: f64 },
    /// The circle reaches a pole or spans every longitude.
    Everything,
}

fn coverage(center: GeoPoint, radius_km: f64) -> Coverage {
    let angle = radius_km / EARTH_RADIUS_KM;
    let d_lat = km_to_degrees(radius_km);

    if center.lat().abs() + d_lat >= 90.0 || angle >= FRAC_PI_2 {
        return Coverage::Everything;
    }

    // Largest longitude offset reachable within `angle` from this latitude.
    let d_lng = (angle.sin() / center.lat().to_radians().cos())
        .clamp(-1.0, 1.0)
        .asin()
        .to_degrees();

    if d_lng >= 180.0 {
        return Coverage::Everything;
    }

    let d_lat = d_lat * (1.0 + COVER_SLACK) + COVER_SLACK;
    let d_lng = d_lng * (1.0 + COVER_SLACK) + COVER_SLACK;

    let origin = [center.lng(), center.lat()];
    let mut centers = vec![origin];
    if origin[0] - d_lng < -180.0 {
        centers.push([origin[0] + 360.0, origin[1]]);
    }
    if origin[0] + d_lng > 180.0 {
        centers.push([origin[0] - 360.0, origin[1]]);
    }

    Coverage::Circles {
        centers,
        radius_2: d_lat * d_lat + d_lng * d_lng,
    }
}

// ============================================================================
// Station Index
// ============================================================================

/// An immutable station snapshot with a spatial index.
///
/// Build once per snapshot, then query any number of times. The index is
/// `Send + Sync`; share it behind an `Arc` for concurrent queries.
#[derive(Clone)]
pub struct StationIndex {
    stations: Vec<StationRecord>,
    tree: RTree<StationNode>,
}

impl StationIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self {
            stations: Vec::new(),
            tree: RTree::new(),
        }
    }

    pub fn from_stations(stations: Vec<StationRecord>) -> Self {
        let tree = RTree::bulk_load(
            stations
                .iter()
                .enumerate()
                .map(|(slot, station)| StationNode::new(slot, station.position()))
                .collect(),
        );

        tracing::trace!(stations = stations.len(), "built station index");

        Self { stations, tree }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Stations in insertion order.
    pub fn stations(&self) -> &[StationRecord] {
        &self.stations
    }

    /// Stations within `radius_km` of `center` (inclusive), in insertion order.
    pub fn within_radius(&self, center: GeoPoint, radius_km: f64) -> Result<Vec<AnnotatedStation>> {
        validate_radius(radius_km)?;

        let slots: Vec<usize> = match coverage(center, radius_km) {
            Coverage::Everything => (0..self.stations.len()).collect(),
            Coverage::Circles { centers, radius_2 } => {
                let mut slots: Vec<usize> = centers
                    .into_iter()
                    .flat_map(|c| self.tree.locate_within_distance(c, radius_2))
                    .map(|node| node.slot)
                    .collect();
                slots.sort_unstable();
                slots.dedup();
                slots
            }
        };

        let candidates = slots.len();
        let within: Vec<AnnotatedStation> = slots
            .into_iter()
            .filter_map(|slot| annotate_within(center, radius_km, &self.stations[slot]))
            .collect();

        tracing::debug!(candidates, within = within.len(), radius_km, "indexed radius query");

        Ok(within)
    }

    /// Run a full query against the index: radius, rating floor, ranking.
    pub fn search(&self, query: &QueryParameters) -> Result<Vec<RankedResult>> {
        query.validate()?;
        let within = self.within_radius(query.center, query.radius_km)?;
        Ok(refine_and_rank(query, within))
    }
}

impl Default for StationIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<StationRecord> for StationIndex {
    fn from_iter<I: IntoIterator<Item = StationRecord>>(iter: I) -> Self {
        Self::from_stations(iter.into_iter().collect())
    }
}
