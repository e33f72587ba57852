use std::fmt;

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair picked on the map.
///
/// Either coordinate may be missing while the business has not been geotagged.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl GeoPoint {
    pub fn new(
        lat: f64,
        lng: f64,
    ) -> Self {
        Self {
            lat: Some(lat),
            lng: Some(lng),
        }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let coord = |c: Option<f64>| c.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));
        write!(f, "({}, {})", coord(self.lat), coord(self.lng))
    }
}

/// The value held by one form field.
///
/// Numeric inputs are kept as [`FieldValue::Text`], exactly as typed; rules
/// that care about numbers parse the text when they run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    Ids(Vec<String>),
    Geo(GeoPoint),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Ids(ids.into_iter().map(Into::into).collect())
    }

    /// Returns `true` when the field counts as "not provided".
    ///
    /// Text is empty after trimming, a list has no entries, a flag is unset,
    /// or a geotag has neither coordinate.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Ids(ids) => ids.is_empty(),
            Self::Flag(b) => !b,
            Self::Geo(p) => p.lat.is_none() && p.lng.is_none(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<GeoPoint> for FieldValue {
    fn from(value: GeoPoint) -> Self {
        Self::Geo(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::Ids(value)
    }
}
