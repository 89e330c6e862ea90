//! Value types produced by the extraction pipeline.
//!
//! - [`ArchiveEntry`]: what the archive contains, as listed
//! - [`ImageKind`]: extension-based image classification
//! - [`ExtractedImage`]: the output record, with its embedded payload

pub mod entry;
pub mod image;
pub mod image_kind;

pub use entry::ArchiveEntry;
pub use image::ExtractedImage;
pub use image_kind::ImageKind;
