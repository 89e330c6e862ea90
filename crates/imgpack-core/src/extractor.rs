//! The extraction pipeline.
//!
//! ```text
//! normalize URL -> fetch -> empty check -> sniff -> parse -> fan out decode -> sort
//! ```
//!
//! Every stage up to and including the parse fails the whole call. Decoding
//! runs one blocking task per image entry; a failing entry is logged and
//! recorded in the report, and the others carry on.

use std::io;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use bytes::Bytes;
use tokio::task::JoinSet;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::ExtractedImage;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::ExtractorConfig;
use crate::Result;
use crate::archive::MemoryArchive;
use crate::fetch::HttpClient;
use crate::fetch::fetch_archive;
use crate::sniff;
use crate::source::normalize_url;
use crate::types::ArchiveEntry;
use crate::types::image::compare_names;
use crate::types::image_kind::mime_type_for;

/// Fetches remote ZIP archives and extracts their images.
///
/// Holds references to a client and a configuration that the application
/// builds once at startup. The extractor itself is stateless between calls.
///
/// # Examples
///
/// ```no_run
/// use imgpack_core::ArchiveImageExtractor;
/// use imgpack_core::ExtractorConfig;
/// use imgpack_core::ReqwestClient;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new()?;
/// let config = ExtractorConfig::default();
/// let extractor = ArchiveImageExtractor::new(&client, &config);
///
/// let images = extractor
///     .extract_images("https://link.storjshare.io/s/abc/photos.zip")
///     .await?;
/// for image in &images {
///     println!("{} ({}, ~{} bytes)", image.name, image.mime_type, image.approximate_size_bytes);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ArchiveImageExtractor<'a, C> {
    client: &'a C,
    config: &'a ExtractorConfig,
}

impl<'a, C: HttpClient> ArchiveImageExtractor<'a, C> {
    /// Creates an extractor over an existing client and configuration.
    #[must_use]
    pub const fn new(client: &'a C, config: &'a ExtractorConfig) -> Self {
        Self { client, config }
    }

    /// Returns the configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ExtractorConfig {
        self.config
    }

    /// Fetches the archive at `url` and returns its images sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the download fails, the
    /// payload is empty or an HTML page, or the archive cannot be parsed or
    /// has no entries. Entries that fail to decode are skipped, not reported
    /// as errors.
    pub async fn extract_images(&self, url: &str) -> Result<Vec<ExtractedImage>> {
        self.extract_images_with_report(url)
            .await
            .map(ExtractionReport::into_images)
    }

    /// Like [`extract_images`](Self::extract_images), returning the full
    /// report.
    ///
    /// # Errors
    ///
    /// See [`extract_images`](Self::extract_images).
    pub async fn extract_images_with_report(&self, url: &str) -> Result<ExtractionReport> {
        let start = Instant::now();
        let (normalized, payload) = self.fetch(url).await?;

        let mut report = extract_from_payload(payload, self.config).await?;
        report.source_url = Some(normalized);
        report.duration = start.elapsed();
        Ok(report)
    }

    /// Fetches the archive at `url` and lists its entries without decoding
    /// any of them.
    ///
    /// # Errors
    ///
    /// Same as [`extract_images`](Self::extract_images).
    pub async fn list_entries(&self, url: &str) -> Result<Vec<ArchiveEntry>> {
        let (_, payload) = self.fetch(url).await?;
        list_payload_entries(payload, self.config)
    }

    async fn fetch(&self, url: &str) -> Result<(String, Bytes)> {
        let normalized = normalize_url(url, self.config)?;
        if normalized != url {
            debug!(original = url, normalized = %normalized, "rewrote sharing link");
        }

        info!(url = %normalized, "fetching archive");
        let payload = fetch_archive(self.client, &normalized, self.config).await?;
        Ok((normalized, payload))
    }
}

/// Checks and parses a payload, returning the archive and its entry list.
fn open_payload(payload: Bytes, config: &ExtractorConfig) -> Result<(MemoryArchive, Vec<ArchiveEntry>)> {
    if payload.is_empty() {
        return Err(ExtractionError::EmptyPayload);
    }

    if sniff::looks_like_markup(&payload, config.sniff_len) {
        warn!(
            preview = %sniff::preview(&payload, config.sniff_len),
            "payload is a markup document, not an archive"
        );
        return Err(ExtractionError::UnexpectedHtml);
    }

    debug!(bytes = payload.len(), "parsing archive");
    let mut archive = MemoryArchive::parse(payload).inspect_err(|e| {
        warn!(error = %e, "archive parse failed");
    })?;

    let entries = archive.entries()?;
    if entries.is_empty() {
        return Err(ExtractionError::InvalidArchive(
            "archive contains no entries".to_string(),
        ));
    }

    info!(entries = entries.len(), "archive parsed");
    Ok((archive, entries))
}

/// Lists the entries of an archive payload without decoding any of them.
///
/// Runs the empty, markup and parse checks of the full pipeline.
///
/// # Errors
///
/// Returns [`ExtractionError::EmptyPayload`],
/// [`ExtractionError::UnexpectedHtml`] or
/// [`ExtractionError::InvalidArchive`].
pub fn list_payload_entries(payload: Bytes, config: &ExtractorConfig) -> Result<Vec<ArchiveEntry>> {
    open_payload(payload, config).map(|(_, entries)| entries)
}

/// Extracts images from an archive that is already in memory.
///
/// This is the pipeline after the download: empty check, markup sniffing,
/// parse, parallel decode, sort. `source_url` and `duration` of the returned
/// report describe this call only.
///
/// # Errors
///
/// Returns [`ExtractionError::EmptyPayload`],
/// [`ExtractionError::UnexpectedHtml`] or
/// [`ExtractionError::InvalidArchive`].
pub async fn extract_from_payload(payload: Bytes, config: &ExtractorConfig) -> Result<ExtractionReport> {
    let start = Instant::now();
    let bytes_fetched = payload.len() as u64;
    let (archive, entries) = open_payload(payload, config)?;

    let candidates: Vec<(usize, String)> = entries
        .iter()
        .filter(|entry| entry.is_image_candidate())
        .filter_map(|entry| entry.index.map(|index| (index, entry.name.clone())))
        .collect();

    let mut report = ExtractionReport {
        bytes_fetched,
        entries_total: entries.len(),
        image_candidates: candidates.len(),
        ..ExtractionReport::default()
    };

    let mut tasks = JoinSet::new();
    for (order, (index, path)) in candidates.into_iter().enumerate() {
        let mut archive = archive.clone();
        tasks.spawn_blocking(move || {
            let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| {
                decode_entry(&mut archive, index, &path)
            }))
            .unwrap_or_else(|_| Err(io::Error::other("decoder panicked")));
            (order, path, outcome)
        });
    }

    let mut decoded: Vec<(usize, ExtractedImage)> = Vec::with_capacity(report.image_candidates);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((order, _, Ok(image))) => decoded.push((order, image)),
            Ok((_, path, Err(e))) => {
                warn!(entry = %path, error = %e, "skipping entry that failed to decode");
                report.add_skipped(path, e.to_string());
            }
            Err(e) => {
                warn!(error = %e, "entry decode task did not complete");
                report.add_skipped("<unknown>", e.to_string());
            }
        }
    }

    decoded.sort_by(|(order_a, a), (order_b, b)| {
        compare_names(&a.name, &b.name).then(order_a.cmp(order_b))
    });
    report.images = decoded.into_iter().map(|(_, image)| image).collect();
    report.skipped.sort_by(|a, b| a.path.cmp(&b.path));
    report.duration = start.elapsed();

    info!(
        images = report.images.len(),
        skipped = report.skipped.len(),
        "extraction finished"
    );
    Ok(report)
}

fn decode_entry(archive: &mut MemoryArchive, index: usize, path: &str) -> io::Result<ExtractedImage> {
    let bytes = archive.read_entry(index)?;
    let mime_type = mime_type_for(path);
    debug!(entry = path, mime_type, bytes = bytes.len(), "decoded image");
    Ok(ExtractedImage::from_bytes(path, mime_type, &bytes))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fetch::FetchFailure;
    use crate::test_utils::StaticClient;
    use crate::test_utils::ZipTestBuilder;
    use crate::test_utils::corrupt_deflate_stream;

    fn sample_zip() -> Vec<u8> {
        ZipTestBuilder::new()
            .add_file("set/b.png", b"second")
            .add_file("set/a.jpg", b"first")
            .add_file("set/notes.txt", b"ignored")
            .build()
    }

    #[tokio::test]
    async fn test_extract_from_payload_filters_and_sorts() {
        let config = ExtractorConfig::default();
        let report = extract_from_payload(Bytes::from(sample_zip()), &config)
            .await
            .unwrap();

        let names: Vec<&str> = report.images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
        assert_eq!(report.images[0].mime_type, "image/jpeg");
        assert_eq!(report.image_candidates, 2);
        // set/ is synthesized
        assert_eq!(report.entries_total, 4);
        assert!(report.source_url.is_none());
    }

    #[tokio::test]
    async fn test_empty_payload() {
        let config = ExtractorConfig::default();
        let err = extract_from_payload(Bytes::new(), &config).await.unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyPayload));
    }

    #[tokio::test]
    async fn test_html_payload() {
        let config = ExtractorConfig::default();
        let err = extract_from_payload(
            Bytes::from_static(b"<!DOCTYPE html><html><body>Share</body></html>"),
            &config,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ExtractionError::UnexpectedHtml));
    }

    #[tokio::test]
    async fn test_zero_entry_archive_is_invalid() {
        let config = ExtractorConfig::default();
        let err = extract_from_payload(Bytes::from(ZipTestBuilder::new().build()), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidArchive(ref m) if m.contains("no entries")));
    }

    #[tokio::test]
    async fn test_garbage_payload_is_invalid() {
        let config = ExtractorConfig::default();
        let err = extract_from_payload(Bytes::from_static(b"\x00\x01\x02binary junk"), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidArchive(_)));
    }

    #[tokio::test]
    async fn test_broken_entry_is_skipped() {
        let data = ZipTestBuilder::new()
            .deflated()
            .add_file("good.png", &[1_u8; 2048])
            .add_file("bad.png", &[2_u8; 2048])
            .build();
        let data = corrupt_deflate_stream(data, "bad.png");

        let config = ExtractorConfig::default();
        let report = extract_from_payload(Bytes::from(data), &config).await.unwrap();

        assert_eq!(report.images.len(), 1);
        assert_eq!(report.images[0].name, "good.png");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, "bad.png");
    }

    #[tokio::test]
    async fn test_no_images_is_empty_success() {
        let data = ZipTestBuilder::new().add_file("readme.md", b"# hi").build();
        let config = ExtractorConfig::default();
        let report = extract_from_payload(Bytes::from(data), &config).await.unwrap();
        assert!(report.images.is_empty());
        assert!(!report.has_skipped());
    }

    #[tokio::test]
    async fn test_mixed_case_names_sort_case_insensitively() {
        let data = ZipTestBuilder::new()
            .add_file("cherry.png", b"c")
            .add_file("Banana.png", b"b")
            .add_file("apple.png", b"a")
            .build();
        let config = ExtractorConfig::default();
        let report = extract_from_payload(Bytes::from(data), &config).await.unwrap();

        let names: Vec<&str> = report.images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["apple.png", "Banana.png", "cherry.png"]);
    }

    #[tokio::test]
    async fn test_duplicate_basenames_keep_archive_order() {
        let data = ZipTestBuilder::new()
            .add_file("b/face.png", b"from b")
            .add_file("a/face.png", b"from a")
            .build();
        let config = ExtractorConfig::default();
        let report = extract_from_payload(Bytes::from(data), &config).await.unwrap();

        assert_eq!(report.images.len(), 2);
        assert_eq!(report.images[0].decode().unwrap(), b"from b");
        assert_eq!(report.images[1].decode().unwrap(), b"from a");
    }

    #[test]
    fn test_list_payload_entries() {
        let config = ExtractorConfig::default();
        let entries = list_payload_entries(Bytes::from(sample_zip()), &config).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].name, "set/");
        assert!(entries[0].is_synthesized());
    }

    #[tokio::test]
    async fn test_extractor_normalizes_before_fetch() {
        let client = StaticClient::ok(sample_zip());
        let config = ExtractorConfig::default();
        let extractor = ArchiveImageExtractor::new(&client, &config);

        let report = extractor
            .extract_images_with_report("https://link.storjshare.io/s/key/photos.zip")
            .await
            .unwrap();

        let expected = "https://link.storjshare.io/s/key/photos.zip?download=1";
        assert_eq!(report.source_url.as_deref(), Some(expected));
        assert_eq!(client.requests()[0].0, expected);
        assert_eq!(report.images.len(), 2);
    }

    #[tokio::test]
    async fn test_extractor_list_entries() {
        let client = StaticClient::ok(sample_zip());
        let config = ExtractorConfig::default();
        let extractor = ArchiveImageExtractor::new(&client, &config);

        let entries = extractor
            .list_entries("https://example.com/photos.zip")
            .await
            .unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["set/", "set/b.png", "set/a.jpg", "set/notes.txt"]);
    }

    #[tokio::test]
    async fn test_extractor_invalid_url_makes_no_request() {
        let client = StaticClient::ok(sample_zip());
        let config = ExtractorConfig::default();
        let extractor = ArchiveImageExtractor::new(&client, &config);

        let err = extractor.extract_images("not a url").await.unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidUrl { .. }));
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_extractor_network_error() {
        let client = StaticClient::failing(FetchFailure::Transport("connection reset".to_string()));
        let config = ExtractorConfig::default();
        let extractor = ArchiveImageExtractor::new(&client, &config);

        let err = extractor
            .extract_images("https://example.com/a.zip")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Network { .. }));
    }
}
