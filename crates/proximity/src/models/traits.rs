//! Core traits for positioned entities.
//!
//! Nearest-K selection and view queries only need an identifier and a
//! position, so they accept anything implementing [`Located`]: plain
//! records, distance-annotated records, or a caller's own marker type.

use crate::identifiers::StationIdentifier;
use crate::models::types::{AnnotatedStation, GeoPoint, RankedResult, StationRecord};

/// Something with a stable identity and a position on the globe.
pub trait Located {
    fn id(&self) -> &StationIdentifier;
    fn position(&self) -> GeoPoint;
}

impl Located for StationRecord {
    fn id(&self) -> &StationIdentifier {
        StationRecord::id(self)
    }

    fn position(&self) -> GeoPoint {
        StationRecord::position(self)
    }
}

impl Located for AnnotatedStation {
    fn id(&self) -> &StationIdentifier {
        self.station.id()
    }

    fn position(&self) -> GeoPoint {
        self.station.position()
    }
}

impl Located for RankedResult {
    fn id(&self) -> &StationIdentifier {
        self.station.id()
    }

    fn position(&self) -> GeoPoint {
        self.station.position()
    }
}

impl<T: Located + ?Sized> Located for &T {
    fn id(&self) -> &StationIdentifier {
        (**self).id()
    }

    fn position(&self) -> GeoPoint {
        (**self).position()
    }
}
