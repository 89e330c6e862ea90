//! Extracted image record.

use std::cmp::Ordering;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Ratio between decoded bytes and base64 characters.
const BASE64_DECODED_RATIO: f64 = 0.75;

/// One image pulled out of an archive.
///
/// `data` is a `data:` URI carrying both the MIME type and the base64 payload,
/// so it can be used as an image source without any other lookup.
///
/// # Examples
///
/// ```
/// use imgpack_core::ExtractedImage;
///
/// let image = ExtractedImage::from_bytes("shoots/day1/face.png", "image/png", b"\x89PNG");
/// assert_eq!(image.name, "face.png");
/// assert_eq!(image.data, "data:image/png;base64,iVBORw==");
/// assert_eq!(image.approximate_size_bytes, 6.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedImage {
    /// File name without any directory components.
    pub name: String,

    /// MIME type inferred from the file extension.
    pub mime_type: String,

    /// Estimated decoded size: base64 length × 0.75.
    ///
    /// This is an approximation and can exceed the true size by up to two
    /// bytes because of padding.
    pub approximate_size_bytes: f64,

    /// `data:<mime>;base64,<payload>` URI.
    pub data: String,
}

impl ExtractedImage {
    /// Builds a record from an archive entry path and its raw bytes.
    #[must_use]
    pub fn from_bytes(entry_path: &str, mime_type: &str, bytes: &[u8]) -> Self {
        let encoded = STANDARD.encode(bytes);
        let approximate_size_bytes = approximate_size(encoded.len());

        Self {
            name: basename(entry_path).to_string(),
            mime_type: mime_type.to_string(),
            approximate_size_bytes,
            data: format!("data:{mime_type};base64,{encoded}"),
        }
    }

    /// Returns the base64 payload part of [`data`](Self::data).
    #[must_use]
    pub fn base64_payload(&self) -> &str {
        self.data
            .split_once(";base64,")
            .map_or("", |(_, payload)| payload)
    }

    /// Decodes the embedded payload back to raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not valid base64, which can only
    /// happen for records built by hand.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.base64_payload())
    }
}

/// Estimated decoded size for a base64 string of `encoded_len` characters.
#[must_use]
pub fn approximate_size(encoded_len: usize) -> f64 {
    encoded_len as f64 * BASE64_DECODED_RATIO
}

/// Returns the last `/`-separated component of an archive path.
///
/// Falls back to the whole path when the last component is empty.
#[must_use]
pub fn basename(entry_path: &str) -> &str {
    match entry_path.rsplit('/').next() {
        Some(last) if !last.is_empty() => last,
        _ => entry_path,
    }
}

/// Orders image names the way a human-facing collation does.
///
/// Names are compared case-insensitively first; names that differ only in
/// case put the lowercase form first.
///
/// # Examples
///
/// ```
/// use imgpack_core::types::image::compare_names;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_names("apple.png", "Banana.png"), Ordering::Less);
/// assert_eq!(compare_names("img_001.jpg", "IMG_001.jpg"), Ordering::Less);
/// ```
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    fn folded(name: &str) -> impl Iterator<Item = char> + '_ {
        name.chars().flat_map(char::to_lowercase)
    }

    folded(a)
        .cmp(folded(b))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}
