//! In-memory ZIP archive access.
//!
//! The archive is parsed straight from the fetched buffer; nothing touches
//! the filesystem. Reads are tolerant: stored and deflated entries are read
//! raw and inflated without CRC32 verification, so an archive with a bad
//! checksum still yields its data.

use std::collections::HashMap;
use std::io;
use std::io::Cursor;
use std::io::Read;

use bytes::Bytes;
use flate2::read::DeflateDecoder;
use zip::CompressionMethod;
use zip::ZipArchive;

use crate::ExtractionError;
use crate::Result;
use crate::types::ArchiveEntry;

/// Upper bound for buffer preallocation based on the size an entry claims.
const MAX_PREALLOC: usize = 64 * 1024 * 1024;

/// A parsed ZIP archive backed by an in-memory buffer.
///
/// Cloning is cheap: the buffer and the parsed central directory are shared,
/// only the read cursor is copied. Each clone can read entries
/// independently, which is how entries are decoded in parallel.
#[derive(Clone, Debug)]
pub struct MemoryArchive {
    inner: ZipArchive<Cursor<Bytes>>,
}

impl MemoryArchive {
    /// Parses `payload` as a ZIP archive.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::InvalidArchive`] if the central directory
    /// cannot be located or read.
    pub fn parse(payload: Bytes) -> Result<Self> {
        let inner = ZipArchive::new(Cursor::new(payload)).map_err(|e| {
            ExtractionError::InvalidArchive(format!("failed to open ZIP archive: {e}"))
        })?;
        Ok(Self { inner })
    }

    /// Number of entries stored in the central directory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the central directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    /// Lists all entries, synthesizing parent directories that the archive
    /// does not store explicitly.
    ///
    /// Synthesized directories are placed right before the first entry that
    /// implies them. A stored directory record replaces a synthesized one of
    /// the same name.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::InvalidArchive`] if a central directory
    /// record cannot be read.
    pub fn entries(&mut self) -> Result<Vec<ArchiveEntry>> {
        let mut entries: Vec<ArchiveEntry> = Vec::with_capacity(self.inner.len());
        let mut dir_positions: HashMap<String, usize> = HashMap::new();

        for index in 0..self.inner.len() {
            let (name, is_dir, size) = {
                let file = self.inner.by_index_raw(index).map_err(|e| {
                    ExtractionError::InvalidArchive(format!("failed to read ZIP entry {index}: {e}"))
                })?;
                (file.name().to_string(), file.is_dir(), file.size())
            };

            for parent in parent_dirs(&name) {
                if !dir_positions.contains_key(parent) {
                    dir_positions.insert(parent.to_string(), entries.len());
                    entries.push(ArchiveEntry {
                        name: parent.to_string(),
                        is_dir: true,
                        size: 0,
                        index: None,
                    });
                }
            }

            if is_dir {
                if let Some(&position) = dir_positions.get(&name) {
                    entries[position].index = Some(index);
                    continue;
                }
                dir_positions.insert(name.clone(), entries.len());
            }

            entries.push(ArchiveEntry {
                name,
                is_dir,
                size,
                index: Some(index),
            });
        }

        Ok(entries)
    }

    /// Reads the uncompressed bytes of the entry at `index`.
    ///
    /// Stored and deflated entries skip checksum verification; other
    /// compression methods go through the checked reader.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the entry is missing, encrypted, or its data
    /// cannot be decompressed.
    pub fn read_entry(&mut self, index: usize) -> io::Result<Vec<u8>> {
        let (method, encrypted, claimed) = {
            let file = self.inner.by_index_raw(index).map_err(io::Error::other)?;
            (file.compression(), file.encrypted(), file.size())
        };

        if encrypted {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "entry is encrypted",
            ));
        }

        let capacity = usize::try_from(claimed).map_or(MAX_PREALLOC, |n| n.min(MAX_PREALLOC));
        let mut out = Vec::with_capacity(capacity);

        match method {
            CompressionMethod::Stored => {
                let mut raw = self.inner.by_index_raw(index).map_err(io::Error::other)?;
                raw.read_to_end(&mut out)?;
            }
            CompressionMethod::Deflated => {
                let raw = self.inner.by_index_raw(index).map_err(io::Error::other)?;
                DeflateDecoder::new(raw).read_to_end(&mut out)?;
            }
            _ => {
                let mut checked = self.inner.by_index(index).map_err(io::Error::other)?;
                checked.read_to_end(&mut out)?;
            }
        }

        Ok(out)
    }
}

/// Yields every directory prefix of `name`, outermost first, excluding
/// `name` itself.
fn parent_dirs(name: &str) -> impl Iterator<Item = &str> {
    name.match_indices('/')
        .map(|(pos, _)| &name[..=pos])
        .filter(move |prefix| prefix.len() < name.len() && *prefix != "/")
}
