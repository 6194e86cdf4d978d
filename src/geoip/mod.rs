//! GeoLite2 City database access.
//!
//! This module turns a MaxMind distribution archive into a stream of
//! [`NetworkEntry`] values:
//! - archive acquisition (local file or download) and `.mmdb` extraction
//! - the serialized record shape
//! - the lazy network iterator over the decoded database

mod acquire;
mod extract;
mod record;
mod source;

// Re-export public API
pub use acquire::acquire_database;
pub use record::{
    GeoCity, GeoContinent, GeoCountry, GeoLocation, GeoPostal, GeoRecord, Names, NetworkEntry,
};
pub use source::{open_database, MmdbNetworks};
