//! Core data types and enums for station proximity queries.

use std::sync::Arc;

use geo::Point;

use crate::identifiers::StationIdentifier;

/// Highest rating a station can carry.
pub const MAX_RATING: f64 = 5.0;

// ============================================================================
// Coordinates
// ============================================================================

/// A validated latitude/longitude pair in degrees.
///
/// Latitude lies in `-90..=90`, longitude in `-180..=180`, and both are
/// finite. The only way to obtain a `GeoPoint` is through [`GeoPoint::new`]
/// (or a conversion that calls it), so every distance computation downstream
/// can assume valid input.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "LatLng", into = "LatLng"))]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
        let lng_ok = lng.is_finite() && (-180.0..=180.0).contains(&lng);

        if !(lat_ok && lng_ok) {
            return Err(ProximityError::InvalidCoordinate { lat, lng });
        }

        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

/// Wire shape of a [`GeoPoint`]: `{"lat": .., "lng": ..}`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatLng {
    pub lat: f64,
    #[cfg_attr(feature = "serde", serde(alias = "lon", alias = "long", alias = "longitude"))]
    pub lng: f64,
}

impl TryFrom<LatLng> for GeoPoint {
    type Error = ProximityError;

    fn try_from(value: LatLng) -> Result<Self> {
        Self::new(value.lat, value.lng)
    }
}

impl From<GeoPoint> for LatLng {
    fn from(point: GeoPoint) -> Self {
        Self {
            lat: point.lat,
            lng: point.lng,
        }
    }
}

/// `geo` points are `(x, y)` = `(lng, lat)`.
impl From<GeoPoint> for Point {
    fn from(point: GeoPoint) -> Self {
        Point::new(point.lng, point.lat)
    }
}

impl TryFrom<Point> for GeoPoint {
    type Error = ProximityError;

    fn try_from(point: Point) -> Result<Self> {
        Self::new(point.y(), point.x())
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Ordering applied by the ranker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SortKey {
    /// Nearest first.
    #[default]
    Distance,
    /// Shortest predicted wait first; stations without a prediction last.
    WaitTime,
    /// Highest rating first; unrated stations last.
    Rating,
}

impl SortKey {
    /// Parse a sort key name (`distance`, `wait-time` or `rating`).
    pub fn parse(name: &str) -> Result<Self> {
        name.parse()
            .map_err(|_| ProximityError::InvalidSortKey(name.to_owned()))
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// A read-only snapshot of a fuel station.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StationRecord {
    id: StationIdentifier,
    name: Arc<str>,
    position: GeoPoint,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    predicted_wait_min: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    rating: Option<f64>,
}

impl StationRecord {
    pub fn new(id: impl Into<StationIdentifier>, name: impl AsRef<str>, position: GeoPoint) -> Self {
        Self {
            id: id.into(),
            name: name.as_ref().into(),
            position,
            predicted_wait_min: None,
            rating: None,
        }
    }

    /// Attach a predicted wait in minutes. Must be finite and non-negative.
    pub fn with_predicted_wait(mut self, minutes: f64) -> Result<Self> {
        if !minutes.is_finite() || minutes < 0.0 {
            return Err(ProximityError::InvalidWaitTime(minutes));
        }
        self.predicted_wait_min = Some(minutes);
        Ok(self)
    }

    /// Attach a rating in `0..=5`.
    pub fn with_rating(mut self, rating: f64) -> Result<Self> {
        if !rating.is_finite() || !(0.0..=MAX_RATING).contains(&rating) {
            return Err(ProximityError::InvalidRating(rating));
        }
        self.rating = Some(rating);
        Ok(self)
    }

    pub fn id(&self) -> &StationIdentifier {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> GeoPoint {
        self.position
    }

    pub fn predicted_wait_min(&self) -> Option<f64> {
        self.predicted_wait_min
    }

    pub fn rating(&self) -> Option<f64> {
        self.rating
    }

    /// Copy wait and rating from `other` where this record has none.
    pub(crate) fn fill_missing_from(&mut self, other: &StationRecord) {
        if self.predicted_wait_min.is_none() {
            self.predicted_wait_min = other.predicted_wait_min;
        }
        if self.rating.is_none() {
            self.rating = other.rating;
        }
    }
}

/// A station paired with its distance from a query center.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnnotatedStation {
    pub station: StationRecord,
    pub distance_km: f64,
}

/// One row of ranker output.
///
/// `rank` is the 0-based position in the output sequence.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RankedResult {
    pub rank: usize,
    pub station: StationRecord,
    pub distance_km: f64,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProximityError {
    #[error("Invalid coordinate: lat={lat}, lng={lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("Invalid radius: {0} (expected a positive number of kilometers)")]
    InvalidRadius(f64),

    #[error("Invalid sort key: {0:?} (expected distance, wait-time or rating)")]
    InvalidSortKey(String),

    #[error("Invalid wait time: {0} (expected a non-negative number of minutes)")]
    InvalidWaitTime(f64),

    #[error("Invalid rating: {0} (expected 0 to 5)")]
    InvalidRating(f64),

    #[error("Invalid speed: {0} (expected a positive number of km/h)")]
    InvalidSpeed(f64),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, ProximityError>;
