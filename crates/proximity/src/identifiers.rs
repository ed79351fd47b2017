//! Station identifiers.
//!
//! Backed by `Arc<str>` so ranked results and index nodes can share them
//! without copying the underlying string.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct StationIdentifier(Arc<str>);

impl StationIdentifier {
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(s.as_ref().into())
    }

    /// Identifier assigned to a record that arrived without one.
    pub fn positional(index: usize) -> Self {
        Self::new(format!("station-{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for StationIdentifier {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for StationIdentifier {}

impl Hash for StationIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Display for StationIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StationIdentifier {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for StationIdentifier {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_equality() {
        let id1 = StationIdentifier::new("igl_rajouri");
        let id2 = StationIdentifier::new("igl_rajouri");
        let id3 = id1.clone();

        assert_eq!(id1, id2);
        assert_eq!(id1, id3);
        assert!(Arc::ptr_eq(&id1.0, &id3.0));
    }

    #[test]
    fn test_identifier_hash() {
        use std::collections::HashSet;

        let set = HashSet::from([StationIdentifier::new("a"), StationIdentifier::new("b")]);
        assert!(set.contains(&StationIdentifier::new("a")));
        assert!(!set.contains(&StationIdentifier::new("c")));
    }

    #[test]
    fn test_identifier_from_str() {
        let id: StationIdentifier = "mgl_andheri".into();
        assert_eq!(id, StationIdentifier::new("mgl_andheri"));
        assert_eq!(id.as_str(), "mgl_andheri");
    }

    #[test]
    fn test_positional_identifier() {
        assert_eq!(StationIdentifier::positional(7).as_str(), "station-7");
        assert_eq!(format!("{}", StationIdentifier::positional(0)), "station-0");
    }
}
