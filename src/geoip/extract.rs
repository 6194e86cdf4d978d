//! Archive extraction.
//!
//! MaxMind distributes databases as a gzip-compressed tar stream with a dated
//! top-level directory (`GeoLite2-City_20240101/GeoLite2-City.mmdb`) next to
//! license and readme files.

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::{Archive, EntryType};

use crate::error_handling::AcquisitionError;

/// Extracts the first regular `.mmdb` file from a tar.gz archive.
///
/// Directories and links are skipped; the match is on the file extension only,
/// so the dated directory prefix and the edition name do not matter.
pub(crate) fn extract_mmdb_from_tar_gz(tar_gz_bytes: &[u8]) -> Result<Vec<u8>, AcquisitionError> {
    log::debug!("Extracting .mmdb file from tar.gz archive");

    let mut tar_archive = Archive::new(GzDecoder::new(tar_gz_bytes));
    let entries = tar_archive.entries().map_err(AcquisitionError::Unpack)?;

    for entry_result in entries {
        let mut entry = entry_result.map_err(AcquisitionError::Unpack)?;
        if entry.header().entry_type() != EntryType::Regular {
            continue;
        }

        let path = entry.path().map_err(AcquisitionError::Unpack)?.into_owned();
        if !is_mmdb(&path) {
            continue;
        }

        let mut mmdb_bytes = Vec::new();
        entry
            .read_to_end(&mut mmdb_bytes)
            .map_err(AcquisitionError::Unpack)?;
        log::info!(
            "Extracted {} from tar.gz ({} bytes)",
            path.display(),
            mmdb_bytes.len()
        );
        return Ok(mmdb_bytes);
    }

    Err(AcquisitionError::DatabaseNotFound)
}

fn is_mmdb(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("mmdb")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tar::Builder;

    /// Creates a test tar.gz archive with the specified files.
    pub(crate) fn create_test_tar_gz(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut tar_builder = Builder::new(Vec::new());
        for (name, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_path(name).unwrap();
            header.set_size(content.len() as u64);
            header.set_cksum();
            tar_builder.append(&header, *content).unwrap();
        }
        let tar_bytes = tar_builder.into_inner().unwrap();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&tar_bytes).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_extract_mmdb_success() {
        let mmdb_content = b"fake mmdb content";
        let tar_gz = create_test_tar_gz(&[("GeoLite2-City.mmdb", mmdb_content)]);

        let result = extract_mmdb_from_tar_gz(&tar_gz).unwrap();
        assert_eq!(result, mmdb_content);
    }

    #[test]
    fn test_extract_mmdb_dated_directory_with_other_files() {
        let mmdb_content = b"fake mmdb content";
        let tar_gz = create_test_tar_gz(&[
            ("GeoLite2-City_20240101/COPYRIGHT.txt", b"copyright"),
            ("GeoLite2-City_20240101/LICENSE.txt", b"license"),
            ("GeoLite2-City_20240101/GeoLite2-City.mmdb", mmdb_content),
        ]);

        let result = extract_mmdb_from_tar_gz(&tar_gz).unwrap();
        assert_eq!(result, mmdb_content);
    }

    #[test]
    fn test_extract_mmdb_matches_any_edition_name() {
        let tar_gz = create_test_tar_gz(&[("GeoIP2-City-Test.mmdb", b"test db")]);

        let result = extract_mmdb_from_tar_gz(&tar_gz).unwrap();
        assert_eq!(result, b"test db");
    }

    #[test]
    fn test_extract_mmdb_first_match_wins() {
        let tar_gz = create_test_tar_gz(&[
            ("dir1/GeoLite2-City.mmdb", b"first mmdb"),
            ("dir2/GeoLite2-City.mmdb", b"second mmdb"),
        ]);

        let result = extract_mmdb_from_tar_gz(&tar_gz).unwrap();
        assert_eq!(result, b"first mmdb");
    }

    #[test]
    fn test_extract_mmdb_not_found() {
        let tar_gz = create_test_tar_gz(&[("README.txt", b"readme content")]);

        let result = extract_mmdb_from_tar_gz(&tar_gz);
        assert!(matches!(result, Err(AcquisitionError::DatabaseNotFound)));
    }

    #[test]
    fn test_extract_mmdb_extension_is_exact() {
        let tar_gz = create_test_tar_gz(&[
            ("GeoLite2-City.mmdb.sha256", b"checksum"),
            ("GeoLite2-City.MMDB", b"upper case"),
        ]);

        let result = extract_mmdb_from_tar_gz(&tar_gz);
        assert!(matches!(result, Err(AcquisitionError::DatabaseNotFound)));
    }

    #[test]
    fn test_extract_mmdb_skips_directories() {
        let mut tar_builder = Builder::new(Vec::new());
        let mut dir_header = tar::Header::new_gnu();
        dir_header.set_path("weird.mmdb/").unwrap();
        dir_header.set_entry_type(EntryType::Directory);
        dir_header.set_size(0);
        dir_header.set_cksum();
        tar_builder.append(&dir_header, &[][..]).unwrap();

        let content = b"real db";
        let mut file_header = tar::Header::new_gnu();
        file_header.set_path("weird.mmdb/GeoLite2-City.mmdb").unwrap();
        file_header.set_size(content.len() as u64);
        file_header.set_cksum();
        tar_builder.append(&file_header, &content[..]).unwrap();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&tar_builder.into_inner().unwrap())
            .unwrap();
        let tar_gz = encoder.finish().unwrap();

        let result = extract_mmdb_from_tar_gz(&tar_gz).unwrap();
        assert_eq!(result, content);
    }

    #[test]
    fn test_extract_mmdb_empty_archive() {
        let tar_gz = create_test_tar_gz(&[]);

        let result = extract_mmdb_from_tar_gz(&tar_gz);
        assert!(matches!(result, Err(AcquisitionError::DatabaseNotFound)));
    }

    #[test]
    fn test_extract_mmdb_invalid_gzip() {
        let result = extract_mmdb_from_tar_gz(b"not a valid tar.gz file");
        assert!(matches!(result, Err(AcquisitionError::Unpack(_))));
    }

    #[test]
    fn test_extract_mmdb_corrupted_tar() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"not a valid tar file").unwrap();
        let corrupted_gz = encoder.finish().unwrap();

        let result = extract_mmdb_from_tar_gz(&corrupted_gz);
        assert!(result.is_err());
    }
}
