//! Error types for archive image extraction.

use thiserror::Error;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// User-facing category of an extraction failure.
///
/// Several variants of [`ExtractionError`] collapse into the same category
/// when shown to an end user; the category decides which guidance to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The source URL itself is malformed.
    InvalidUrl,
    /// The archive host could not be reached.
    Network,
    /// The host refused a cross-origin request.
    Cors,
    /// The host answered with a non-success status.
    Http,
    /// The host answered with an empty body.
    EmptyPayload,
    /// The host answered with a web page instead of an archive.
    UnexpectedHtml,
    /// The payload is not a usable ZIP archive.
    InvalidArchive,
    /// Local I/O failed.
    Io,
}

/// Errors that abort an extraction call.
///
/// Failures to decode a single archive entry are not represented here:
/// those are recorded as [`SkippedEntry`](crate::SkippedEntry) values and
/// the call carries on.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The source URL could not be parsed or uses an unsupported scheme.
    #[error("invalid source URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL as given by the caller.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The request could not be completed (DNS, connect, TLS, reset).
    #[error("network error fetching '{url}': {reason}")]
    Network {
        /// The URL that was requested.
        url: String,
        /// Transport-level failure description.
        reason: String,
    },

    /// The request was rejected by a cross-origin policy.
    #[error("cross-origin request to '{url}' was rejected: {reason}")]
    Cors {
        /// The URL that was requested.
        url: String,
        /// Rejection description reported by the client.
        reason: String,
    },

    /// The server answered with a non-success status.
    #[error("failed to fetch archive: HTTP {status} - {excerpt}")]
    Http {
        /// Numeric HTTP status code.
        status: u16,
        /// Leading part of the response body.
        excerpt: String,
    },

    /// The server answered with a zero-length body.
    #[error("received empty file data")]
    EmptyPayload,

    /// The payload starts with markup rather than archive bytes.
    #[error("received HTML instead of a ZIP file")]
    UnexpectedHtml,

    /// The payload is not a valid archive, or the archive has no entries.
    #[error("invalid ZIP archive: {0}")]
    InvalidArchive(String),

    /// Local I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractionError {
    /// Returns the user-facing category of this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use imgpack_core::ErrorCategory;
    /// use imgpack_core::ExtractionError;
    ///
    /// let err = ExtractionError::InvalidArchive("no end of central directory".to_string());
    /// assert_eq!(err.category(), ErrorCategory::InvalidArchive);
    /// ```
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidUrl { .. } => ErrorCategory::InvalidUrl,
            Self::Network { .. } => ErrorCategory::Network,
            Self::Cors { .. } => ErrorCategory::Cors,
            Self::Http { .. } => ErrorCategory::Http,
            Self::EmptyPayload => ErrorCategory::EmptyPayload,
            Self::UnexpectedHtml => ErrorCategory::UnexpectedHtml,
            Self::InvalidArchive(_) => ErrorCategory::InvalidArchive,
            Self::Io(_) => ErrorCategory::Io,
        }
    }

    /// Returns guidance for the end user, if there is any to give.
    ///
    /// # Examples
    ///
    /// ```
    /// use imgpack_core::ExtractionError;
    ///
    /// let hint = ExtractionError::UnexpectedHtml.hint().unwrap();
    /// assert!(hint.contains("download=1"));
    /// assert!(ExtractionError::EmptyPayload.hint().is_none());
    /// ```
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Network { .. } => Some(
                "Could not access the ZIP file. Check that the URL is correct and accessible.",
            ),
            Self::Cors { .. } => Some(
                "The server doesn't allow accessing the ZIP file. Try a URL from a service that allows cross-origin access.",
            ),
            Self::InvalidArchive(_) => Some(
                "The URL may not point to a valid ZIP file or the file might be corrupted.",
            ),
            Self::UnexpectedHtml => Some(
                "The link points to a webpage instead of a ZIP file. Use a direct download link (for Storj, add '?download=1').",
            ),
            Self::InvalidUrl { .. }
            | Self::Http { .. }
            | Self::EmptyPayload
            | Self::Io(_) => None,
        }
    }

    /// Returns `true` if the failure lies with the remote source rather
    /// than with the local machine.
    ///
    /// Such errors will not go away by retrying the same URL; the user has to
    /// supply a different link or fix the hosted file.
    #[must_use]
    pub const fn is_source_problem(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl { .. }
                | Self::Http { .. }
                | Self::EmptyPayload
                | Self::UnexpectedHtml
                | Self::InvalidArchive(_)
        )
    }

    /// Returns a context string for this error, if available.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::InvalidArchive(msg) => Some(msg),
            Self::InvalidUrl { reason, .. }
            | Self::Network { reason, .. }
            | Self::Cors { reason, .. } => Some(reason),
            Self::Http { excerpt, .. } => Some(excerpt),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ExtractionError::EmptyPayload.to_string(),
            "received empty file data"
        );
        assert_eq!(
            ExtractionError::UnexpectedHtml.to_string(),
            "received HTML instead of a ZIP file"
        );
    }

    #[test]
    fn test_http_error_display() {
        let err = ExtractionError::Http {
            status: 404,
            excerpt: "Not Found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to fetch archive: HTTP 404 - Not Found"
        );
        assert_eq!(err.context(), Some("Not Found"));
    }

    #[test]
    fn test_categories() {
        let network = ExtractionError::Network {
            url: "https://example.com/a.zip".to_string(),
            reason: "connection refused".to_string(),
        };
        assert_eq!(network.category(), ErrorCategory::Network);

        let cors = ExtractionError::Cors {
            url: "https://example.com/a.zip".to_string(),
            reason: "blocked".to_string(),
        };
        assert_eq!(cors.category(), ErrorCategory::Cors);

        assert_eq!(
            ExtractionError::UnexpectedHtml.category(),
            ErrorCategory::UnexpectedHtml
        );
        assert_eq!(
            ExtractionError::EmptyPayload.category(),
            ErrorCategory::EmptyPayload
        );
    }

    #[test]
    fn test_hints_cover_user_facing_categories() {
        let network = ExtractionError::Network {
            url: String::new(),
            reason: String::new(),
        };
        let cors = ExtractionError::Cors {
            url: String::new(),
            reason: String::new(),
        };
        assert!(network.hint().is_some());
        assert!(cors.hint().is_some());
        assert!(ExtractionError::InvalidArchive(String::new()).hint().is_some());
        assert!(ExtractionError::UnexpectedHtml.hint().is_some());
    }

    #[test]
    fn test_is_source_problem() {
        assert!(ExtractionError::UnexpectedHtml.is_source_problem());
        assert!(ExtractionError::EmptyPayload.is_source_problem());

        let network = ExtractionError::Network {
            url: String::new(),
            reason: String::new(),
        };
        assert!(!network.is_source_problem());

        let io = ExtractionError::Io(std::io::Error::other("disk"));
        assert!(!io.is_source_problem());
    }

    #[test]
    fn test_io_error_from() {
        let err: ExtractionError = std::io::Error::other("boom").into();
        assert_eq!(err.category(), ErrorCategory::Io);
        assert!(err.to_string().contains("boom"));
    }
}
