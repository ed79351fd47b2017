//! Ordering and truncation of radius-filtered stations.

use std::cmp::Ordering;
use std::num::NonZeroUsize;

use crate::models::query::QueryParameters;
use crate::models::types::{AnnotatedStation, RankedResult, Result, SortKey, StationRecord};
use crate::spatial::queries::filter_within_radius;

/// Order stations by `sort_key` and keep the first `limit`.
///
/// - `Distance`: ascending; equal distances keep input order.
/// - `WaitTime`: ascending wait, stations without a prediction last, then by distance.
/// - `Rating`: descending rating, unrated stations last, then by distance.
///
/// The sort is stable, so identical input always yields identical output.
pub fn rank_stations(
    mut stations: Vec<AnnotatedStation>,
    sort_key: SortKey,
    limit: Option<NonZeroUsize>,
) -> Vec<RankedResult> {
    stations.sort_by(|a, b| compare(sort_key, a, b));

    if let Some(limit) = limit {
        stations.truncate(limit.get());
    }

    stations
        .into_iter()
        .enumerate()
        .map(|(rank, annotated)| RankedResult {
            rank,
            station: annotated.station,
            distance_km: annotated.distance_km,
        })
        .collect()
}

fn compare(sort_key: SortKey, a: &AnnotatedStation, b: &AnnotatedStation) -> Ordering {
    let by_distance = a.distance_km.total_cmp(&b.distance_km);

    match sort_key {
        SortKey::Distance => by_distance,
        SortKey::WaitTime => present_first(
            a.station.predicted_wait_min(),
            b.station.predicted_wait_min(),
            |x, y| x.total_cmp(&y),
        )
        .then(by_distance),
        SortKey::Rating => present_first(a.station.rating(), b.station.rating(), |x, y| {
            y.total_cmp(&x)
        })
        .then(by_distance),
    }
}

/// Compare two optional keys, sorting missing values after present ones.
fn present_first(
    a: Option<f64>,
    b: Option<f64>,
    cmp: impl FnOnce(f64, f64) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Radius filter, rating floor and ranking in one call.
pub fn search(query: &QueryParameters, stations: &[StationRecord]) -> Result<Vec<RankedResult>> {
    query.validate()?;
    let within = filter_within_radius(query.center, query.radius_km, stations)?;
    Ok(refine_and_rank(query, within))
}

/// Everything after the radius stage, shared by the linear and indexed paths.
pub(crate) fn refine_and_rank(
    query: &QueryParameters,
    mut within: Vec<AnnotatedStation>,
) -> Vec<RankedResult> {
    if let Some(min_rating) = query.min_rating {
        within.retain(|a| a.station.rating().is_some_and(|rating| rating >= min_rating));
    }

    let ranked = rank_stations(within, query.sort_key, query.limit);

    tracing::debug!(
        results = ranked.len(),
        sort_key = %query.sort_key,
        "ranked stations"
    );

    ranked
}
