//! Spatial indexing and query utilities.

pub mod bounds;
pub mod dedup;
pub mod index;
pub mod queries;

pub use bounds::{stations_in_view, BoundingBox};
pub use dedup::deduplicate;
pub use index::StationIndex;
pub use queries::{
    filter_within_radius, haversine_km, nearest_stations, top_k_by_distance, EARTH_RADIUS_KM,
};
