//! Archive entry metadata.

/// A logical member of a parsed archive.
///
/// Directories that are only implied by file paths (for example `a/` for
/// `a/b.png` when the archive stores no `a/` record) are synthesized and
/// flagged as such; they carry no archive index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Relative path inside the archive, `/`-separated. Directory names end
    /// with `/`.
    pub name: String,

    /// Whether the entry is a directory.
    pub is_dir: bool,

    /// Uncompressed size in bytes as recorded in the archive.
    pub size: u64,

    /// Position in the archive's central directory, if stored there.
    pub index: Option<usize>,
}

impl ArchiveEntry {
    /// Returns `true` if the entry was inferred from a child path rather than
    /// read from the archive.
    #[must_use]
    pub const fn is_synthesized(&self) -> bool {
        self.index.is_none()
    }

    /// Returns `true` for a file whose name carries an image extension.
    #[must_use]
    pub fn is_image_candidate(&self) -> bool {
        !self.is_dir && super::image_kind::is_image_name(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_candidate() {
        let file = ArchiveEntry {
            name: "a/photo.PNG".to_string(),
            is_dir: false,
            size: 10,
            index: Some(0),
        };
        assert!(file.is_image_candidate());
        assert!(!file.is_synthesized());
    }

    #[test]
    fn test_directory_is_never_candidate() {
        let dir = ArchiveEntry {
            name: "album.png/".to_string(),
            is_dir: true,
            size: 0,
            index: None,
        };
        assert!(!dir.is_image_candidate());
        assert!(dir.is_synthesized());
    }
}
