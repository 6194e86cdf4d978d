//! GeoIP record shape.
//!
//! The attribute groups are copied from the City database verbatim. Missing
//! values decode to their defaults so every serialized record carries the same
//! set of fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Localized names keyed by language code (`en`, `de`, `pt-BR`, ...).
pub type Names = BTreeMap<String, String>;

/// One network of the City database, as written to the NDJSON output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoRecord {
    pub city: GeoCity,
    pub continent: GeoContinent,
    pub country: GeoCountry,
    pub location: GeoLocation,
    pub postal: GeoPostal,
    /// CIDR notation of the network; set by the record filter, never by the decoder.
    #[serde(skip_deserializing)]
    pub network: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoCity {
    pub names: Names,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoContinent {
    pub code: String,
    pub names: Names,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoCountry {
    pub iso_code: String,
    pub is_in_european_union: bool,
    pub names: Names,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_radius: u16,
    pub time_zone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoPostal {
    pub code: String,
}

/// A decoded network prefix and its attributes, before filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkEntry {
    pub network: String,
    pub record: GeoRecord,
}

impl NetworkEntry {
    pub fn new(network: impl Into<String>, record: GeoRecord) -> Self {
        Self {
            network: network.into(),
            record,
        }
    }
}
