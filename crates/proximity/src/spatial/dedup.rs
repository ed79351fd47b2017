//! Merging of station records that describe the same physical station.
//!
//! Station lists assembled from several sources tend to list one pump
//! several times with slightly different coordinates. Records closer than a
//! threshold are folded into the first one seen, which inherits any wait
//! prediction or rating it was missing.

use crate::models::query::validate_radius;
use crate::models::types::{Result, StationRecord};
use crate::spatial::queries::haversine_km;

/// Records closer than this are treated as one station.
pub const DEFAULT_DEDUP_THRESHOLD_KM: f64 = 0.1;

/// Fold records closer than `threshold_km` (exclusive) into the first one
/// seen. Survivors keep input order.
pub fn deduplicate(
    stations: impl IntoIterator<Item = StationRecord>,
    threshold_km: f64,
) -> Result<Vec<StationRecord>> {
    validate_radius(threshold_km)?;

    let mut unique: Vec<StationRecord> = Vec::new();
    let mut merged = 0usize;

    for station in stations {
        let duplicate_of = unique
            .iter_mut()
            .find(|kept| haversine_km(kept.position(), station.position()) < threshold_km);

        match duplicate_of {
            Some(kept) => {
                kept.fill_missing_from(&station);
                merged += 1;
            }
            None => unique.push(station),
        }
    }

    tracing::debug!(kept = unique.len(), merged, threshold_km, "deduplicated stations");

    Ok(unique)
}
