// Shared test helpers for pipeline runs.
//
// This module provides recording sinks and synthetic entry streams used
// across multiple test files.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use geoip_export::{DecodeError, DeliveryError, GeoRecord, NetworkEntry, Sink};

/// Builds a decoded entry stream for the given networks.
#[allow(dead_code)] // Used by other test files
pub fn entries(networks: &[&str]) -> Vec<Result<NetworkEntry, DecodeError>> {
    networks
        .iter()
        .map(|network| Ok(NetworkEntry::new(*network, sample_record())))
        .collect()
}

/// `count` distinct IPv4 /24 networks starting at 1.0.0.0/24.
#[allow(dead_code)] // Used by other test files
pub fn ipv4_networks(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("1.{}.{}.0/24", i / 256, i % 256))
        .collect()
}

/// A record with a few attributes set, so serialized lines are not all equal.
pub fn sample_record() -> GeoRecord {
    let mut record = GeoRecord::default();
    record.country.iso_code = "DE".to_string();
    record.country.is_in_european_union = true;
    record
        .country
        .names
        .insert("en".to_string(), "Germany".to_string());
    record.location.latitude = 51.2993;
    record.location.longitude = 9.491;
    record.location.accuracy_radius = 100;
    record.location.time_zone = "Europe/Berlin".to_string();
    record
}

/// Sink that records every payload in delivery order.
#[derive(Default)]
pub struct RecordingSink {
    pub payloads: Mutex<Vec<String>>,
}

#[allow(dead_code)] // Used by other test files
impl RecordingSink {
    pub fn payloads(&self) -> Vec<String> {
        self.payloads.lock().unwrap().clone()
    }

    /// Every delivered record, in delivery order.
    pub fn lines(&self) -> Vec<String> {
        self.payloads()
            .iter()
            .flat_map(|payload| payload.lines().map(str::to_string).collect::<Vec<_>>())
            .collect()
    }
}

#[async_trait]
impl Sink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn deliver(&self, payload: &str) -> Result<(), DeliveryError> {
        self.payloads.lock().unwrap().push(payload.to_string());
        Ok(())
    }
}

/// Sink that accepts `succeed_first` deliveries and fails every later one.
#[allow(dead_code)] // Used by other test files
pub struct FailingSink {
    pub succeed_first: usize,
    pub calls: AtomicUsize,
}

#[allow(dead_code)] // Used by other test files
impl FailingSink {
    pub fn new(succeed_first: usize) -> Self {
        Self {
            succeed_first,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Sink for FailingSink {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn deliver(&self, _payload: &str) -> Result<(), DeliveryError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.succeed_first {
            Ok(())
        } else {
            Err(DeliveryError::Status {
                status: "503 Service Unavailable".to_string(),
            })
        }
    }
}
