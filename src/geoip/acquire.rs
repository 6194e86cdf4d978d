//! GeoIP archive acquisition from local files and the MaxMind download API.

use crate::config::{DatabaseSource, DOWNLOAD_TIMEOUT, MAX_DATABASE_DOWNLOAD_SIZE};
use crate::error_handling::AcquisitionError;
use crate::geoip::extract::extract_mmdb_from_tar_gz;
use crate::initialization::init_http_client;

/// Reads or downloads the database archive and returns the embedded `.mmdb` bytes.
///
/// # Errors
///
/// Returns `AcquisitionError` when the archive cannot be read or fetched, is
/// not a valid tar.gz stream, or contains no `.mmdb` file. There is no retry.
pub async fn acquire_database(source: &DatabaseSource) -> Result<Vec<u8>, AcquisitionError> {
    let archive = match source {
        DatabaseSource::File(path) => {
            log::info!("Reading GeoIP database archive from: {}", path.display());
            tokio::fs::read(path)
                .await
                .map_err(|source| AcquisitionError::Read {
                    path: path.display().to_string(),
                    source,
                })?
        }
        DatabaseSource::Download { license_key, url } => {
            log::info!(
                "Fetching GeoIP database: {}",
                redact_license_key(url, license_key)
            );
            download_with_size_limit(url).await?
        }
    };

    // gunzip + untar of a ~70MB archive is CPU bound
    tokio::task::spawn_blocking(move || extract_mmdb_from_tar_gz(&archive))
        .await
        .map_err(|e| AcquisitionError::Unpack(std::io::Error::other(e)))?
}

/// Downloads the archive with size limit enforcement
async fn download_with_size_limit(url: &str) -> Result<Vec<u8>, AcquisitionError> {
    let client = init_http_client(DOWNLOAD_TIMEOUT)?;

    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        let status = response.status().to_string();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "No error details".to_string());
        return Err(AcquisitionError::DownloadStatus { status, body });
    }

    if let Some(content_length) = response.content_length() {
        if content_length > MAX_DATABASE_DOWNLOAD_SIZE as u64 {
            return Err(AcquisitionError::TooLarge {
                size: content_length,
                max: MAX_DATABASE_DOWNLOAD_SIZE,
            });
        }
    }

    let bytes = response.bytes().await?.to_vec();

    // content-length may be missing or wrong
    if bytes.len() > MAX_DATABASE_DOWNLOAD_SIZE {
        return Err(AcquisitionError::TooLarge {
            size: bytes.len() as u64,
            max: MAX_DATABASE_DOWNLOAD_SIZE,
        });
    }

    log::info!("Downloaded GeoIP database archive ({} bytes)", bytes.len());
    Ok(bytes)
}

fn redact_license_key(url: &str, license_key: &str) -> String {
    if license_key.is_empty() {
        return url.to_string();
    }
    url.replace(license_key, "REDACTED")
}
