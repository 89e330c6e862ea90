//! High-level public API for one-off extractions.
//!
//! Applications that extract more than once should build a
//! [`ReqwestClient`] and an [`ExtractorConfig`] at startup and reuse them
//! through [`ArchiveImageExtractor`]; these helpers build fresh ones per call.

use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use crate::ArchiveImageExtractor;
use crate::ExtractedImage;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::ExtractorConfig;
use crate::ReqwestClient;
use crate::Result;
use crate::extractor;
use crate::types::ArchiveEntry;

/// Fetches the ZIP archive at `url` and returns its images sorted by name.
///
/// Uses the default configuration and a new [`ReqwestClient`].
///
/// # Errors
///
/// See [`ArchiveImageExtractor::extract_images`]. A client that cannot be
/// constructed is reported as [`ExtractionError::Network`].
///
/// # Examples
///
/// ```no_run
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let images = imgpack_core::extract_images("https://example.com/training.zip").await?;
/// println!("Extracted {} images", images.len());
/// # Ok(())
/// # }
/// ```
pub async fn extract_images(url: &str) -> Result<Vec<ExtractedImage>> {
    let client = ReqwestClient::new().map_err(|e| ExtractionError::Network {
        url: url.to_string(),
        reason: format!("failed to build HTTP client: {e}"),
    })?;
    let config = ExtractorConfig::default();
    ArchiveImageExtractor::new(&client, &config)
        .extract_images(url)
        .await
}

/// Extracts images from archive bytes that are already in memory.
///
/// # Errors
///
/// Returns an error if the payload is empty, is an HTML page, or is not a
/// ZIP archive with at least one entry.
///
/// # Examples
///
/// ```
/// use imgpack_core::ExtractorConfig;
/// use imgpack_core::extract_images_from_bytes;
/// use imgpack_core::test_utils::create_test_zip;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let zip_data = create_test_zip(vec![("album/photo.jpg", &b"jpeg"[..]), ("readme.txt", &b"hi"[..])]);
/// let report = extract_images_from_bytes(zip_data, &ExtractorConfig::default()).await?;
/// assert_eq!(report.images.len(), 1);
/// assert_eq!(report.images[0].name, "photo.jpg");
/// # Ok(())
/// # }
/// ```
pub async fn extract_images_from_bytes(
    payload: impl Into<Bytes>,
    config: &ExtractorConfig,
) -> Result<ExtractionReport> {
    extractor::extract_from_payload(payload.into(), config).await
}

/// Reads a local archive into memory.
///
/// No content checks happen here; pass the bytes to
/// [`extract_images_from_bytes`] or [`list_entries`].
///
/// # Errors
///
/// Returns [`ExtractionError::Io`] if the file cannot be read.
pub fn read_archive_file(path: impl AsRef<Path>) -> Result<Bytes> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    debug!(path = %path.display(), bytes = data.len(), "read local archive");
    Ok(Bytes::from(data))
}

/// Lists every entry of an in-memory archive, synthesized parent
/// directories included, without decoding anything.
///
/// # Errors
///
/// Same checks as [`extract_images_from_bytes`].
pub fn list_entries(payload: impl Into<Bytes>, config: &ExtractorConfig) -> Result<Vec<ArchiveEntry>> {
    extractor::list_payload_entries(payload.into(), config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::ZipTestBuilder;

    #[tokio::test]
    async fn test_extract_images_from_bytes() {
        let data = ZipTestBuilder::new()
            .add_file("photo.jpg", b"jpeg")
            .add_file("readme.txt", b"text")
            .add_directory("docs/")
            .build();
        let report = extract_images_from_bytes(data, &ExtractorConfig::default())
            .await
            .unwrap();
        assert_eq!(report.images.len(), 1);
        assert_eq!(report.images[0].name, "photo.jpg");
        assert_eq!(report.images[0].mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_extract_images_invalid_url() {
        let err = extract_images("::not a url::").await.unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidUrl { .. }));
    }

    #[test]
    fn test_list_entries() {
        let data = ZipTestBuilder::new()
            .add_file("a/b/c.png", b"c")
            .build();
        let entries = list_entries(data, &ExtractorConfig::default()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a/", "a/b/", "a/b/c.png"]);
    }

    #[test]
    fn test_read_archive_file() {
        let dir = std::env::temp_dir().join(format!("imgpack-read-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("photos.zip");
        std::fs::write(&path, b"PK\x03\x04").unwrap();

        let data = read_archive_file(&path).unwrap();
        assert_eq!(&data[..], b"PK\x03\x04");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_read_missing_archive_is_io_error() {
        let err = read_archive_file("/nonexistent/imgpack/photos.zip").unwrap_err();
        assert!(matches!(err, ExtractionError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
        assert_eq!(err.category(), crate::ErrorCategory::Io);
    }

    #[test]
    fn test_list_entries_rejects_html() {
        let err = list_entries(
            Bytes::from_static(b"<html><head></head></html>"),
            &ExtractorConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ExtractionError::UnexpectedHtml));
    }
}
