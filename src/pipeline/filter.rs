//! Address-family filter.

use std::net::IpAddr;

use crate::error_handling::DecodeError;
use crate::geoip::{GeoRecord, NetworkEntry};

/// Address family of a network prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// Classifies a CIDR string.
    ///
    /// An IPv6 address with a 4-byte representation (`::ffff:a.b.c.d`) counts
    /// as IPv4.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::InvalidNetwork` for anything that is not
    /// `<address>/<prefix length>` with a prefix length valid for the address.
    pub fn of_network(network: &str) -> Result<Self, DecodeError> {
        let invalid = || DecodeError::InvalidNetwork(network.to_string());

        let (address, prefix_len) = network.split_once('/').ok_or_else(invalid)?;
        let address: IpAddr = address.parse().map_err(|_| invalid())?;
        let prefix_len: u8 = prefix_len.parse().map_err(|_| invalid())?;

        let max_prefix_len = match address {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        if prefix_len > max_prefix_len {
            return Err(invalid());
        }

        Ok(match address {
            IpAddr::V4(_) => AddressFamily::V4,
            IpAddr::V6(v6) if v6.to_ipv4_mapped().is_some() => AddressFamily::V4,
            IpAddr::V6(_) => AddressFamily::V6,
        })
    }
}

/// Drops IPv6 networks when configured to, and tags kept records with their network.
#[derive(Debug, Clone, Copy)]
pub struct RecordFilter {
    skip_ipv6: bool,
}

impl RecordFilter {
    pub fn new(skip_ipv6: bool) -> Self {
        Self { skip_ipv6 }
    }

    /// Returns the tagged record, or `None` if the entry is dropped.
    ///
    /// The prefix is validated even when no family is suppressed: a malformed
    /// network from the decoder is a fatal error either way.
    pub fn apply(&self, entry: NetworkEntry) -> Result<Option<GeoRecord>, DecodeError> {
        let family = AddressFamily::of_network(&entry.network)?;
        if self.skip_ipv6 && family == AddressFamily::V6 {
            return Ok(None);
        }

        let NetworkEntry {
            network,
            mut record,
        } = entry;
        record.network = network;
        Ok(Some(record))
    }
}
