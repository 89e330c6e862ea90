//! Output formatter trait for CLI results.

use anyhow::Result;
use imgpack_core::ArchiveEntry;
use imgpack_core::ExtractionReport;
use serde::Serialize;
use std::path::PathBuf;

/// Everything the extract command has to show.
pub struct ExtractionOutcome<'a> {
    /// Source as given on the command line.
    pub source: &'a str,
    pub report: &'a ExtractionReport,
    /// Files written to the output directory, if any.
    pub written: &'a [PathBuf],
    pub include_data: bool,
}

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format extraction result
    fn format_extraction_result(&self, outcome: &ExtractionOutcome<'_>) -> Result<()>;

    /// Format the entry listing of an archive
    fn format_entries(&self, source: &str, entries: &[ArchiveEntry]) -> Result<()>;

    /// Format a normalized URL
    fn format_normalized_url(&self, original: &str, normalized: &str) -> Result<()>;

    /// Format error message
    fn format_error(&self, operation: &str, error: &anyhow::Error);

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let json = serde_json::to_value(JsonOutput::success("normalize", 42)).unwrap();
        assert_eq!(json["operation"], "normalize");
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"], 42);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_error_envelope() {
        let json = serde_json::to_value(JsonOutput::error("extract", "boom")).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "boom");
        assert!(json.get("data").is_none());
    }
}
