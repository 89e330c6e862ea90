//! Extraction reporting.

use std::time::Duration;

use crate::ExtractedImage;

/// An image entry that could not be decoded.
///
/// Skipped entries never fail the extraction; they are collected here so the
/// caller can show what was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Full path of the entry inside the archive.
    pub path: String,
    /// Why it was skipped.
    pub reason: String,
}

/// Outcome of an extraction, with the images and diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Extracted images, sorted by name.
    pub images: Vec<ExtractedImage>,

    /// URL actually requested, after normalization. `None` when the payload
    /// did not come from the network.
    pub source_url: Option<String>,

    /// Size of the archive payload in bytes.
    pub bytes_fetched: u64,

    /// Number of archive entries, synthesized directories included.
    pub entries_total: usize,

    /// Number of entries that matched the image filter.
    pub image_candidates: usize,

    /// Image entries that failed to decode.
    pub skipped: Vec<SkippedEntry>,

    /// Wall-clock time of the whole operation.
    pub duration: Duration,
}

impl ExtractionReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry that failed to decode.
    pub fn add_skipped(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push(SkippedEntry {
            path: path.into(),
            reason: reason.into(),
        });
    }

    /// Returns whether any entry was skipped.
    #[must_use]
    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// Sum of the approximate sizes of all images.
    #[must_use]
    pub fn approximate_total_size(&self) -> f64 {
        self.images.iter().map(|i| i.approximate_size_bytes).sum()
    }

    /// Consumes the report, keeping only the images.
    #[must_use]
    pub fn into_images(self) -> Vec<ExtractedImage> {
        self.images
    }
}
