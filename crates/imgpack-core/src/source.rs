//! Source URL normalization.

use url::Url;

use crate::ExtractionError;
use crate::ExtractorConfig;
use crate::Result;

/// Rewrites a sharing link into its direct-download form.
///
/// When the URL's host is one of `config.direct_download_hosts`, the
/// configured download parameter is appended unless a parameter with the same
/// name is already present. Any other URL is returned exactly as given. The
/// transform is idempotent and performs no network access.
///
/// # Errors
///
/// Returns [`ExtractionError::InvalidUrl`] if `url` is not an absolute
/// `http` or `https` URL.
///
/// # Examples
///
/// ```
/// use imgpack_core::ExtractorConfig;
/// use imgpack_core::normalize_url;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ExtractorConfig::default();
/// let url = normalize_url("https://link.storjshare.io/s/abc/photos.zip", &config)?;
/// assert_eq!(url, "https://link.storjshare.io/s/abc/photos.zip?download=1");
///
/// // Already normalized: unchanged
/// assert_eq!(normalize_url(&url, &config)?, url);
/// # Ok(())
/// # }
/// ```
pub fn normalize_url(url: &str, config: &ExtractorConfig) -> Result<String> {
    let mut parsed = Url::parse(url).map_err(|e| ExtractionError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ExtractionError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    let is_sharing_host = parsed
        .host_str()
        .is_some_and(|host| config.is_direct_download_host(host));
    if !is_sharing_host {
        return Ok(url.to_string());
    }

    let (name, value) = &config.download_param;
    if parsed.query_pairs().any(|(key, _)| key == name.as_str()) {
        return Ok(url.to_string());
    }

    parsed.query_pairs_mut().append_pair(name, value);
    Ok(parsed.into())
}
