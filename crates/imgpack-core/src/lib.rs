//! Pull training images out of remotely hosted ZIP archives.
//!
//! `imgpack-core` downloads a ZIP archive from a URL, checks that the payload
//! really is an archive (sharing links often return an HTML page instead),
//! decompresses it in memory, keeps the entries with an image extension, and
//! returns each one as a `data:` URI together with its name, MIME type and an
//! approximate size.
//!
//! # Examples
//!
//! ```no_run
//! use imgpack_core::ArchiveImageExtractor;
//! use imgpack_core::ExtractorConfig;
//! use imgpack_core::ReqwestClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ReqwestClient::new()?;
//! let config = ExtractorConfig::default();
//! let extractor = ArchiveImageExtractor::new(&client, &config);
//!
//! let images = extractor.extract_images("https://example.com/photos.zip").await?;
//! println!("Extracted {} images", images.len());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod archive;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod report;
pub mod sniff;
pub mod source;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;

// Re-export main API types
pub use api::extract_images;
pub use api::extract_images_from_bytes;
pub use api::list_entries;
pub use api::read_archive_file;
pub use config::ExtractorConfig;
pub use error::ErrorCategory;
pub use error::ExtractionError;
pub use error::Result;
pub use extractor::ArchiveImageExtractor;
pub use fetch::FetchFailure;
pub use fetch::FetchedPayload;
pub use fetch::HttpClient;
pub use fetch::ReqwestClient;
pub use report::ExtractionReport;
pub use report::SkippedEntry;
pub use source::normalize_url;

// Re-export types module for easier access
pub use types::ArchiveEntry;
pub use types::ExtractedImage;
pub use types::ImageKind;
