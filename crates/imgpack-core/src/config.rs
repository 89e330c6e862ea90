//! Extractor configuration.

/// `Accept` header value sent when fetching an archive.
pub const ARCHIVE_ACCEPT: &str =
    "application/zip, application/octet-stream, application/x-zip-compressed";

/// Configuration for [`ArchiveImageExtractor`](crate::ArchiveImageExtractor).
///
/// Build one at startup and pass it by reference to the extractor; nothing
/// in this crate keeps global client or configuration state.
///
/// # Examples
///
/// ```
/// use imgpack_core::ExtractorConfig;
///
/// let config = ExtractorConfig::default().with_direct_download_host("files.example.com");
/// assert!(config.is_direct_download_host("files.example.com"));
/// assert!(config.is_direct_download_host("link.storjshare.io"));
/// ```
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Hosts that serve a landing page unless asked for a direct download.
    ///
    /// Subdomains of a listed host match as well.
    pub direct_download_hosts: Vec<String>,

    /// Query parameter (name, value) that forces a direct download.
    pub download_param: (String, String),

    /// `Accept` header sent with the archive request.
    pub accept: String,

    /// Maximum number of characters of an error response body to keep.
    pub error_excerpt_len: usize,

    /// Number of leading payload bytes inspected for markup.
    pub sniff_len: usize,
}

impl Default for ExtractorConfig {
    /// Default values:
    /// - `direct_download_hosts`: `["link.storjshare.io"]`
    /// - `download_param`: `("download", "1")`
    /// - `accept`: [`ARCHIVE_ACCEPT`]
    /// - `error_excerpt_len`: 100
    /// - `sniff_len`: 30
    fn default() -> Self {
        Self {
            direct_download_hosts: vec!["link.storjshare.io".to_string()],
            download_param: ("download".to_string(), "1".to_string()),
            accept: ARCHIVE_ACCEPT.to_string(),
            error_excerpt_len: 100,
            sniff_len: 30,
        }
    }
}

impl ExtractorConfig {
    /// Adds a host to the direct-download list.
    pub fn with_direct_download_host(mut self, host: impl Into<String>) -> Self {
        let host = host.into();
        if !self.is_direct_download_host(&host) {
            self.direct_download_hosts.push(host);
        }
        self
    }

    /// Returns whether `host` is a listed direct-download host or one of
    /// its subdomains. Comparison is case-insensitive.
    #[must_use]
    pub fn is_direct_download_host(&self, host: &str) -> bool {
        self.direct_download_hosts.iter().any(|listed| {
            if host.eq_ignore_ascii_case(listed) {
                return true;
            }
            // Subdomain: "<anything>.<listed>"
            let (host, listed) = (host.as_bytes(), listed.as_bytes());
            host.len() > listed.len()
                && host[host.len() - listed.len() - 1] == b'.'
                && host[host.len() - listed.len()..].eq_ignore_ascii_case(listed)
        })
    }
}
