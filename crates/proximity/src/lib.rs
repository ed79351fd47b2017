//! # station-proximity
//!
//! Geodesic radius filtering and proximity ranking for fuel stations.
//!
//! ## Features
//!
//! - **Haversine distance**: great-circle kilometers on a 6371 km sphere
//! - **Radius filter**: inclusive `distance <= radius` selection
//! - **Ranking**: by distance, predicted wait or rating, with stable ties
//! - **Spatial index**: R-tree backed index for repeated queries over one snapshot
//! - **Ingestion**: tolerant JSON payload parsing that skips malformed records (optional)
//!
//! Everything here is pure computation over immutable inputs; every call is
//! independent and safe to run concurrently.
//!
//! ## Example
//!
//! ```
//! use station_proximity::prelude::*;
//!
//! let delhi = GeoPoint::new(28.6139, 77.2090)?;
//!
//! let stations = vec![
//!     StationRecord::new("a", "IGL Janpath", GeoPoint::new(28.6229, 77.2100)?),
//!     StationRecord::new("b", "IGL Azadpur", GeoPoint::new(28.7041, 77.1025)?),
//! ];
//!
//! let within = filter_within_radius(delhi, 5.0, &stations)?;
//! let ranked = rank_stations(within, SortKey::Distance, None);
//!
//! assert_eq!(ranked.len(), 1);
//! assert_eq!(ranked[0].station.name(), "IGL Janpath");
//! assert!(ranked[0].distance_km < 1.2);
//! # Ok::<(), ProximityError>(())
//! ```

pub mod estimate;
pub mod identifiers;
#[cfg(feature = "ingest")]
pub mod ingest;
pub mod models;
pub mod ranking;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::estimate::{TravelEstimate, DEFAULT_AVG_SPEED_KMH};
    pub use crate::identifiers::*;
    pub use crate::models::{query::*, traits::*, types::*};
    pub use crate::ranking::{rank_stations, search};
    pub use crate::spatial::{
        bounds::{stations_in_view, BoundingBox, DEFAULT_ROUTE_PADDING_DEG, DEFAULT_VIEW_FALLBACK},
        dedup::{deduplicate, DEFAULT_DEDUP_THRESHOLD_KM},
        index::StationIndex,
        queries::{filter_within_radius, haversine_km, nearest_stations, top_k_by_distance},
    };
}

pub use prelude::*;
