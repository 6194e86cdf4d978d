//! Object storage output.

use std::sync::Arc;

use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use rand::Rng;

use super::Sink;
use crate::config::{OBJECT_KEY_PREFIX, OBJECT_KEY_RANDOM_LEN, OBJECT_KEY_SUFFIX};
use crate::error_handling::DeliveryError;

/// Uploads each payload as a new object with a random key.
///
/// Keys are random so concurrent workers never overwrite each other's batches.
pub struct ObjectStoreSink {
    store: Arc<dyn ObjectStore>,
    /// Human-readable location prefix for log lines, e.g. `s3://bucket`
    location: String,
}

impl ObjectStoreSink {
    pub fn new(store: Arc<dyn ObjectStore>, location: impl Into<String>) -> Self {
        Self {
            store,
            location: location.into(),
        }
    }

    /// Builds an S3 store with static credentials.
    pub fn from_credentials(
        bucket: &str,
        access_key: &str,
        secret_key: &str,
        region: &str,
    ) -> Result<Self, DeliveryError> {
        let store = AmazonS3Builder::new()
            .with_bucket_name(bucket)
            .with_access_key_id(access_key)
            .with_secret_access_key(secret_key)
            .with_region(region)
            .build()?;

        Ok(Self::new(Arc::new(store), format!("s3://{}", bucket)))
    }
}

#[async_trait]
impl Sink for ObjectStoreSink {
    fn name(&self) -> &'static str {
        "object-storage"
    }

    async fn deliver(&self, payload: &str) -> Result<(), DeliveryError> {
        let key = generate_object_key();
        self.store
            .put(
                &Path::from(key.as_str()),
                PutPayload::from(payload.as_bytes().to_vec()),
            )
            .await?;

        log::info!("File uploaded to location: {}/{}", self.location, key);
        Ok(())
    }
}

/// Generates `networks-<10 lowercase hex chars>.ndjson`.
pub fn generate_object_key() -> String {
    let mut bytes = [0u8; OBJECT_KEY_RANDOM_LEN / 2];
    rand::rng().fill(&mut bytes);
    let suffix: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{}{}{}", OBJECT_KEY_PREFIX, suffix, OBJECT_KEY_SUFFIX)
}
