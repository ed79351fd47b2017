//! Travel-time estimates for ranked stations.
//!
//! Driving time assumes a constant average speed; total time adds the
//! station's predicted wait when one is known. Minutes are rounded to the
//! nearest whole minute, as displayed.

use crate::models::types::{ProximityError, RankedResult, Result};

/// Average urban driving speed used when the caller has no better figure.
pub const DEFAULT_AVG_SPEED_KMH: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TravelEstimate {
    pub travel_min: u32,
    pub wait_min: Option<u32>,
    pub total_min: u32,
}

impl TravelEstimate {
    pub fn new(distance_km: f64, predicted_wait_min: Option<f64>, avg_speed_kmh: f64) -> Result<Self> {
        if !avg_speed_kmh.is_finite() || avg_speed_kmh <= 0.0 {
            return Err(ProximityError::InvalidSpeed(avg_speed_kmh));
        }

        let travel_min = whole_minutes(distance_km / avg_speed_kmh * 60.0);
        let wait_min = predicted_wait_min.map(whole_minutes);
        let total_min = travel_min.saturating_add(wait_min.unwrap_or(0));

        Ok(Self {
            travel_min,
            wait_min,
            total_min,
        })
    }

    pub fn for_result(result: &RankedResult, avg_speed_kmh: f64) -> Result<Self> {
        Self::new(
            result.distance_km,
            result.station.predicted_wait_min(),
            avg_speed_kmh,
        )
    }
}

fn whole_minutes(minutes: f64) -> u32 {
    // `as` saturates; negative and NaN inputs become 0
    minutes.round() as u32
}
