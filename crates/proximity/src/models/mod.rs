//! Station data models, query parameters, and traits.

pub mod query;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use query::{QueryParameters, DEFAULT_RADIUS_KM};
pub use traits::Located;
pub use types::{
    AnnotatedStation, GeoPoint, LatLng, ProximityError, RankedResult, Result, SortKey,
    StationRecord, MAX_RATING,
};
