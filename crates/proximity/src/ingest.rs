//! Parsing of station payloads served by the station-data backend.
//!
//! Accepts either `{"stations": [...]}` or a bare array. Each entry needs a
//! position, nested (`"position": {"lat": .., "lng": ..}`) or flat
//! (`"lat"`, `"lng"`). Entries that fail to parse or validate are skipped and
//! counted rather than failing the whole payload.

use std::io::Read;

use serde::Deserialize;
use serde_json::Value;

use crate::identifiers::StationIdentifier;
use crate::models::types::{GeoPoint, LatLng, ProximityError, Result, StationRecord};

/// Name given to stations that arrive without one.
pub const DEFAULT_STATION_NAME: &str = "CNG Station";

/// Parsed payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ingested {
    pub stations: Vec<StationRecord>,
    /// Entries dropped because they were malformed.
    pub skipped: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Deserialize)]
struct RawStation {
    #[serde(default)]
    id: Option<RawId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    position: Option<LatLng>,
    #[serde(default, alias = "latitude")]
    lat: Option<f64>,
    #[serde(default, alias = "lon", alias = "longitude")]
    lng: Option<f64>,
    #[serde(
        default,
        alias = "predicted_wait",
        alias = "wait_time",
        alias = "waitTime",
        alias = "avg_wait_time_minutes"
    )]
    predicted_wait_min: Option<f64>,
    #[serde(default)]
    rating: Option<f64>,
}

impl RawStation {
    fn into_record(self, index: usize) -> Result<StationRecord> {
        let position = match (self.position, self.lat, self.lng) {
            (Some(position), _, _) => GeoPoint::try_from(position)?,
            (None, Some(lat), Some(lng)) => GeoPoint::new(lat, lng)?,
            _ => return Err(ProximityError::InvalidData("missing position".into())),
        };

        let id = match self.id {
            Some(RawId::Text(text)) if !text.trim().is_empty() => StationIdentifier::new(text),
            Some(RawId::Number(number)) => StationIdentifier::new(number.to_string()),
            _ => StationIdentifier::positional(index),
        };

        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STATION_NAME.to_owned());

        let mut record = StationRecord::new(id, name, position);
        if let Some(wait) = self.predicted_wait_min {
            record = record.with_predicted_wait(wait)?;
        }
        if let Some(rating) = self.rating {
            record = record.with_rating(rating)?;
        }

        Ok(record)
    }
}

/// Parse an already-decoded JSON payload.
pub fn from_value(payload: Value) -> Result<Ingested> {
    let entries = match payload {
        Value::Array(entries) => entries,
        Value::Object(mut map) => {
            if let Some(error) = map.get("error").filter(|e| !e.is_null()) {
                return Err(ProximityError::InvalidData(format!(
                    "payload reported an error: {error}"
                )));
            }
            match map.remove("stations") {
                Some(Value::Array(entries)) => entries,
                _ => {
                    return Err(ProximityError::InvalidData(
                        "payload has no `stations` array".into(),
                    ))
                }
            }
        }
        other => {
            return Err(ProximityError::InvalidData(format!(
                "expected an object or array, got {other}"
            )))
        }
    };

    let mut ingested = Ingested {
        stations: Vec::with_capacity(entries.len()),
        skipped: 0,
    };

    for (index, entry) in entries.into_iter().enumerate() {
        let record = serde_json::from_value::<RawStation>(entry)
            .map_err(|e| ProximityError::InvalidData(e.to_string()))
            .and_then(|raw| raw.into_record(index));

        match record {
            Ok(station) => ingested.stations.push(station),
            Err(error) => {
                ingested.skipped += 1;
                tracing::debug!(index, %error, "skipping malformed station record");
            }
        }
    }

    tracing::debug!(
        stations = ingested.stations.len(),
        skipped = ingested.skipped,
        "ingested station payload"
    );

    Ok(ingested)
}

pub fn from_json_str(json: &str) -> Result<Ingested> {
    from_value(serde_json::from_str(json).map_err(not_json)?)
}

pub fn from_json_slice(json: &[u8]) -> Result<Ingested> {
    from_value(serde_json::from_slice(json).map_err(not_json)?)
}

pub fn from_reader<R: Read>(reader: R) -> Result<Ingested> {
    from_value(serde_json::from_reader(reader).map_err(not_json)?)
}

fn not_json(error: serde_json::Error) -> ProximityError {
    ProximityError::InvalidData(format!("not valid JSON: {error}"))
}
