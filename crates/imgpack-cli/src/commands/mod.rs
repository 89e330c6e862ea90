//! Command implementations.

pub mod completion;
pub mod extract;
pub mod list;
pub mod normalize;

use crate::cli::SourceArgs;
use anyhow::Result;
use anyhow::bail;
use imgpack_core::ExtractorConfig;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

/// Where an archive comes from.
#[derive(Debug, PartialEq, Eq)]
pub enum Source<'a> {
    Url(&'a str),
    File(&'a Path),
}

impl<'a> Source<'a> {
    /// Anything with an `http://` or `https://` prefix is a URL; everything
    /// else is a local path.
    pub fn parse(source: &'a str) -> Self {
        let lower = source.get(..8).unwrap_or(source).to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(source)
        } else {
            Self::File(Path::new(source))
        }
    }
}

/// Builds the extractor configuration from command-line flags.
pub fn build_config(direct_hosts: &[String]) -> ExtractorConfig {
    direct_hosts
        .iter()
        .fold(ExtractorConfig::default(), |config, host| {
            config.with_direct_download_host(host.as_str())
        })
}

/// Runs `operation`, failing if it does not finish within the timeout.
pub async fn with_timeout<F: Future>(args: &SourceArgs, operation: F) -> Result<F::Output> {
    let Some(secs) = args.timeout else {
        return Ok(operation.await);
    };

    match tokio::time::timeout(Duration::from_secs(secs), operation).await {
        Ok(output) => Ok(output),
        Err(_) => bail!(
            "Timed out after {secs}s while processing '{}'\n\
             HINT: Use --timeout to allow more time for large archives.",
            args.source
        ),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_source_parse() {
        assert_eq!(
            Source::parse("https://example.com/a.zip"),
            Source::Url("https://example.com/a.zip")
        );
        assert_eq!(Source::parse("HTTP://x"), Source::Url("HTTP://x"));
        assert_eq!(
            Source::parse("photos.zip"),
            Source::File(Path::new("photos.zip"))
        );
        assert_eq!(
            Source::parse("./http-dump.zip"),
            Source::File(Path::new("./http-dump.zip"))
        );
        assert_eq!(Source::parse("ftp://x"), Source::File(Path::new("ftp://x")));
    }

    #[test]
    fn test_build_config() {
        let config = build_config(&["files.example.org".to_string()]);
        assert!(config.is_direct_download_host("files.example.org"));
        assert!(config.is_direct_download_host("link.storjshare.io"));
    }

    fn source_args(timeout: Option<u64>) -> SourceArgs {
        SourceArgs {
            source: "https://example.com/a.zip".to_string(),
            timeout,
            direct_hosts: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_with_timeout_elapsed() {
        let args = source_args(Some(1));
        let err = with_timeout(&args, std::future::pending::<()>())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Timed out after 1s"));
    }

    #[tokio::test]
    async fn test_with_timeout_completes() {
        let args = source_args(None);
        assert_eq!(with_timeout(&args, async { 7 }).await.unwrap(), 7);
    }
}
