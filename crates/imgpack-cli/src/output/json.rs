//! JSON output formatter for machine-readable results.

use super::formatter::ExtractionOutcome;
use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use imgpack_core::ArchiveEntry;
use imgpack_core::ExtractedImage;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

#[derive(Serialize)]
struct ImageOutput<'a> {
    name: &'a str,
    mime_type: &'a str,
    approximate_size_bytes: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a str>,
}

impl<'a> ImageOutput<'a> {
    fn new(image: &'a ExtractedImage, include_data: bool) -> Self {
        Self {
            name: &image.name,
            mime_type: &image.mime_type,
            approximate_size_bytes: image.approximate_size_bytes,
            data: include_data.then_some(image.data.as_str()),
        }
    }
}

#[derive(Serialize)]
struct SkippedOutput<'a> {
    path: &'a str,
    reason: &'a str,
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_extraction_result(&self, outcome: &ExtractionOutcome<'_>) -> Result<()> {
        #[derive(Serialize)]
        struct ExtractionOutput<'a> {
            source: &'a str,
            source_url: Option<&'a str>,
            bytes_fetched: u64,
            entries_total: usize,
            image_candidates: usize,
            images: Vec<ImageOutput<'a>>,
            skipped: Vec<SkippedOutput<'a>>,
            written: Vec<String>,
            duration_ms: u128,
        }

        let report = outcome.report;
        let data = ExtractionOutput {
            source: outcome.source,
            source_url: report.source_url.as_deref(),
            bytes_fetched: report.bytes_fetched,
            entries_total: report.entries_total,
            image_candidates: report.image_candidates,
            images: report
                .images
                .iter()
                .map(|image| ImageOutput::new(image, outcome.include_data))
                .collect(),
            skipped: report
                .skipped
                .iter()
                .map(|s| SkippedOutput {
                    path: &s.path,
                    reason: &s.reason,
                })
                .collect(),
            written: outcome
                .written
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            duration_ms: report.duration.as_millis(),
        };

        Self::output(&JsonOutput::success("extract", data))
    }

    fn format_entries(&self, source: &str, entries: &[ArchiveEntry]) -> Result<()> {
        #[derive(Serialize)]
        struct EntryOutput<'a> {
            name: &'a str,
            is_dir: bool,
            synthesized: bool,
            size: u64,
            image: bool,
        }

        #[derive(Serialize)]
        struct ListOutput<'a> {
            source: &'a str,
            total_entries: usize,
            entries: Vec<EntryOutput<'a>>,
        }

        let data = ListOutput {
            source,
            total_entries: entries.len(),
            entries: entries
                .iter()
                .map(|e| EntryOutput {
                    name: &e.name,
                    is_dir: e.is_dir,
                    synthesized: e.is_synthesized(),
                    size: e.size,
                    image: e.is_image_candidate(),
                })
                .collect(),
        };

        Self::output(&JsonOutput::success("list", data))
    }

    fn format_normalized_url(&self, original: &str, normalized: &str) -> Result<()> {
        #[derive(Serialize)]
        struct NormalizeOutput<'a> {
            original: &'a str,
            normalized: &'a str,
            changed: bool,
        }

        let data = NormalizeOutput {
            original,
            normalized,
            changed: original != normalized,
        };

        Self::output(&JsonOutput::success("normalize", data))
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::error(operation, format!("{error:#}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        // Warnings go to stderr so stdout stays a single JSON document
        if let Ok(json) = serde_json::to_string(&JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        )) {
            let _ = writeln!(io::stderr(), "{json}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_image_output_omits_data_by_default() {
        let image = ExtractedImage::from_bytes("a/b.png", "image/png", b"png");

        let json = serde_json::to_value(ImageOutput::new(&image, false)).unwrap();
        assert_eq!(json["name"], "b.png");
        assert_eq!(json["mime_type"], "image/png");
        assert!(json.get("data").is_none());

        let json = serde_json::to_value(ImageOutput::new(&image, true)).unwrap();
        assert_eq!(json["data"], "data:image/png;base64,cG5n");
    }
}
