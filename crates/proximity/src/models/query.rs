//! Query parameters for a proximity search.

use std::num::NonZeroUsize;

use crate::models::types::{GeoPoint, ProximityError, Result, SortKey, MAX_RATING};

/// Search radius used when a query does not name one.
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

#[cfg(feature = "serde")]
fn default_radius_km() -> f64 {
    DEFAULT_RADIUS_KM
}

/// Everything a caller specifies for one proximity search.
///
/// Deserializes from JSON such as
/// `{"center": {"lat": 28.61, "lng": 77.20}, "radius_km": 10, "sort_key": "rating", "limit": 3}`.
/// Omitted fields take their defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct QueryParameters {
    pub center: GeoPoint,

    #[cfg_attr(feature = "serde", serde(default = "default_radius_km", alias = "radius"))]
    pub radius_km: f64,

    #[cfg_attr(feature = "serde", serde(default, alias = "sort", alias = "sortBy"))]
    pub sort_key: SortKey,

    #[cfg_attr(feature = "serde", serde(default))]
    pub limit: Option<NonZeroUsize>,

    /// Drop stations rated below this; unrated stations are dropped too.
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_rating: Option<f64>,
}

impl QueryParameters {
    pub fn new(center: GeoPoint) -> Self {
        Self {
            center,
            radius_km: DEFAULT_RADIUS_KM,
            sort_key: SortKey::default(),
            limit: None,
            min_rating: None,
        }
    }

    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub fn with_sort_key(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    /// A limit of zero means "no limit".
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = NonZeroUsize::new(limit);
        self
    }

    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_radius(self.radius_km)?;

        if let Some(min) = self.min_rating {
            if !min.is_finite() || !(0.0..=MAX_RATING).contains(&min) {
                return Err(ProximityError::InvalidRating(min));
            }
        }

        Ok(())
    }
}

/// Radii must be positive and finite.
pub(crate) fn validate_radius(radius_km: f64) -> Result<()> {
    if radius_km.is_finite() && radius_km > 0.0 {
        Ok(())
    } else {
        Err(ProximityError::InvalidRadius(radius_km))
    }
}
