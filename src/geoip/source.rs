//! Network record source backed by a MaxMind database.
//!
//! The decoder is a forward-only cursor over the search tree, so iteration is
//! strictly sequential and cannot be restarted.

use maxminddb::{Reader, Within, WithinOptions};

use crate::error_handling::DecodeError;
use crate::geoip::record::{GeoRecord, NetworkEntry};

/// Parses the database bytes and logs its metadata.
///
/// # Errors
///
/// Returns `DecodeError::Database` if the metadata section or the search tree
/// header is malformed.
pub fn open_database(bytes: Vec<u8>) -> Result<Reader<Vec<u8>>, DecodeError> {
    let reader = Reader::from_source(bytes)?;
    let metadata = &reader.metadata;
    log::info!(
        "Opened {} database (build epoch {}, IPv{} tree, {} nodes)",
        metadata.database_type,
        metadata.build_epoch,
        metadata.ip_version,
        metadata.node_count
    );
    Ok(reader)
}

/// Lazy iterator over every network of a City database.
///
/// Uses the decoder's default traversal options: aliased networks (the IPv4
/// subtree mirrored into `::ffff:0:0/96`, `2002::/16` and friends) and
/// networks without data are never yielded.
pub struct MmdbNetworks<'a> {
    inner: Within<'a, Vec<u8>>,
}

impl<'a> MmdbNetworks<'a> {
    pub fn new(reader: &'a Reader<Vec<u8>>) -> Result<Self, DecodeError> {
        let inner = reader.networks(WithinOptions::default())?;
        Ok(Self { inner })
    }
}

impl Iterator for MmdbNetworks<'_> {
    type Item = Result<NetworkEntry, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let lookup = match self.inner.next()? {
                Ok(lookup) => lookup,
                Err(e) => return Some(Err(e.into())),
            };
            let network = match lookup.network() {
                Ok(network) => network,
                Err(e) => return Some(Err(e.into())),
            };
            match lookup.decode::<GeoRecord>() {
                Ok(Some(record)) => {
                    return Some(Ok(NetworkEntry::new(network.to_string(), record)));
                }
                Ok(None) => continue,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
