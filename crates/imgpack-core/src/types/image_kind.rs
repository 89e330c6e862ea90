//! Recognized image formats and their MIME types.

/// MIME type used when an extension has no known image mapping.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Image format recognized by file extension.
///
/// # Examples
///
/// ```
/// use imgpack_core::types::ImageKind;
///
/// assert_eq!(ImageKind::from_name("shots/Portrait.JPEG"), Some(ImageKind::Jpeg));
/// assert_eq!(ImageKind::Jpeg.mime_type(), "image/jpeg");
/// assert_eq!(ImageKind::from_name("notes.txt"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    /// `.jpg`, `.jpeg`
    Jpeg,
    /// `.png`
    Png,
    /// `.gif`
    Gif,
    /// `.bmp`
    Bmp,
    /// `.webp`
    Webp,
    /// `.svg`
    Svg,
    /// `.tiff`, `.tif`
    Tiff,
}

/// Extension table, dot included, lowercase.
const EXTENSIONS: [(&str, ImageKind); 9] = [
    (".jpg", ImageKind::Jpeg),
    (".jpeg", ImageKind::Jpeg),
    (".png", ImageKind::Png),
    (".gif", ImageKind::Gif),
    (".bmp", ImageKind::Bmp),
    (".webp", ImageKind::Webp),
    (".svg", ImageKind::Svg),
    (".tiff", ImageKind::Tiff),
    (".tif", ImageKind::Tiff),
];

impl ImageKind {
    /// Classifies an entry name by its (case-insensitive) extension.
    ///
    /// The whole name is matched, so directory components are irrelevant.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.as_bytes();
        EXTENSIONS.iter().find_map(|(ext, kind)| {
            let ext = ext.as_bytes();
            (name.len() >= ext.len() && name[name.len() - ext.len()..].eq_ignore_ascii_case(ext))
                .then_some(*kind)
        })
    }

    /// Returns the MIME type for this format.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Webp => "image/webp",
            Self::Svg => "image/svg+xml",
            Self::Tiff => "image/tiff",
        }
    }
}

/// Returns `true` if `name` ends with a recognized image extension.
#[must_use]
pub fn is_image_name(name: &str) -> bool {
    ImageKind::from_name(name).is_some()
}

/// Returns the MIME type for `name`, or [`FALLBACK_MIME_TYPE`].
#[must_use]
pub fn mime_type_for(name: &str) -> &'static str {
    ImageKind::from_name(name).map_or(FALLBACK_MIME_TYPE, ImageKind::mime_type)
}
