//! Normalized provider results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of a forward lookup.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Result of a reverse lookup: the provider's human-readable label.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressLabel(String);

impl AddressLabel {
    /// Wraps a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AddressLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of either kind of lookup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeoResult {
    /// Coordinates for a forward query
    Forward(Coordinates),
    /// Address label for a reverse query
    Reverse(AddressLabel),
}

impl GeoResult {
    /// Returns the coordinates if this is a forward result.
    pub fn as_coordinates(&self) -> Option<Coordinates> {
        match self {
            GeoResult::Forward(coordinates) => Some(*coordinates),
            GeoResult::Reverse(_) => None,
        }
    }

    /// Returns the label if this is a reverse result.
    pub fn as_label(&self) -> Option<&AddressLabel> {
        match self {
            GeoResult::Forward(_) => None,
            GeoResult::Reverse(label) => Some(label),
        }
    }
}

impl From<Coordinates> for GeoResult {
    fn from(coordinates: Coordinates) -> Self {
        GeoResult::Forward(coordinates)
    }
}

impl From<AddressLabel> for GeoResult {
    fn from(label: AddressLabel) -> Self {
        GeoResult::Reverse(label)
    }
}
