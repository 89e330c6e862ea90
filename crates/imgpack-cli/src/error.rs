//! Error conversion utilities for CLI.
//!
//! Converts imgpack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use imgpack_core::ExtractionError;

/// Converts `ExtractionError` to user-friendly anyhow error with context
pub fn convert_extraction_error(err: ExtractionError, source: &str) -> anyhow::Error {
    let message = match &err {
        ExtractionError::InvalidUrl { url, reason } => {
            return anyhow!(
                "Invalid source URL '{url}': {reason}\n\
                 HINT: Pass an absolute http(s) URL or the path of a local ZIP file."
            );
        }
        ExtractionError::Network { reason, .. } => {
            format!("Could not download '{source}': {reason}")
        }
        ExtractionError::Cors { reason, .. } => {
            format!("Download of '{source}' was refused by the server: {reason}")
        }
        ExtractionError::Http { status, excerpt } => {
            format!("Failed to fetch '{source}': HTTP {status}\n  {excerpt}")
        }
        ExtractionError::EmptyPayload => {
            format!("'{source}' returned empty file data")
        }
        ExtractionError::UnexpectedHtml => {
            format!("'{source}' returned a web page instead of a ZIP file")
        }
        ExtractionError::InvalidArchive(reason) => {
            format!("Invalid ZIP archive '{source}': {reason}")
        }
        ExtractionError::Io(io_err) => {
            format!("Failed to read archive '{source}': {io_err}")
        }
    };

    match err.hint() {
        Some(hint) => anyhow!("{message}\nHINT: {hint}"),
        None => anyhow!("{message}"),
    }
}

/// Adds context to a library result about the archive source
pub fn add_source_context<T>(
    result: Result<T, ExtractionError>,
    source: &str,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_extraction_error(e, source))
}
