//! Test utilities for building archives and faking HTTP responses.
//!
//! Everything here is for tests, benches and doc examples: archives are built
//! in memory and [`StaticClient`] answers every request with a canned
//! response, so the whole pipeline runs offline.
//!
//! # Panics
//!
//! Functions in this module panic on I/O errors; they are only meant for
//! test code.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;
use std::sync::Mutex;

use bytes::Bytes;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;
use zip::write::ZipWriter;

use crate::fetch::FetchFailure;
use crate::fetch::FetchedPayload;
use crate::fetch::HttpClient;

const LOCAL_HEADER_SIG: &[u8; 4] = b"PK\x03\x04";
const CENTRAL_HEADER_SIG: &[u8; 4] = b"PK\x01\x02";

/// Creates an in-memory ZIP archive from a list of (path, content) entries,
/// stored uncompressed.
///
/// # Examples
///
/// ```
/// use imgpack_core::test_utils::create_test_zip;
///
/// let zip_data = create_test_zip(vec![("photo.jpg", &b"jpeg"[..]), ("notes/readme.txt", &b"hi"[..])]);
/// assert!(zip_data.starts_with(b"PK"));
/// ```
#[must_use]
pub fn create_test_zip(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    entries
        .into_iter()
        .fold(ZipTestBuilder::new(), |builder, (path, data)| {
            builder.add_file(path, data)
        })
        .build()
}

/// Builder for ZIP test archives with files and directories.
///
/// Files are stored uncompressed until [`deflated`](Self::deflated) is
/// called; the setting applies to files added afterwards.
///
/// # Examples
///
/// ```
/// use imgpack_core::test_utils::ZipTestBuilder;
///
/// let zip_data = ZipTestBuilder::new()
///     .add_file("photo.jpg", b"jpeg")
///     .add_directory("docs/")
///     .deflated()
///     .add_file("big.png", &[0_u8; 4096])
///     .build();
/// ```
pub struct ZipTestBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl ZipTestBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default()
                .compression_method(CompressionMethod::Stored)
                .unix_permissions(0o644),
        }
    }

    /// Compresses files added from now on with Deflate.
    #[must_use]
    pub fn deflated(mut self) -> Self {
        self.options = self
            .options
            .compression_method(CompressionMethod::Deflated);
        self
    }

    /// Adds a regular file.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        self.writer.start_file(path, self.options).unwrap();
        self.writer.write_all(data).unwrap();
        self
    }

    /// Adds an explicit directory record.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        self.writer.add_directory(path, self.options).unwrap();
        self
    }

    /// Finishes the archive and returns its bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.writer.finish().unwrap().into_inner()
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Flips every CRC32 field (local and central headers) in `data`.
///
/// Contents must not contain ZIP header signatures.
#[must_use]
pub fn corrupt_crc(mut data: Vec<u8>) -> Vec<u8> {
    for (signature, crc_offset) in [(LOCAL_HEADER_SIG, 14), (CENTRAL_HEADER_SIG, 16)] {
        for pos in find_all(&data, signature) {
            for byte in &mut data[pos + crc_offset..pos + crc_offset + 4] {
                *byte ^= 0xFF;
            }
        }
    }
    data
}

/// Overwrites the first data byte of the entry named `name` so that its
/// Deflate stream starts with a reserved block type.
///
/// Only meaningful for deflated entries.
#[must_use]
pub fn corrupt_deflate_stream(mut data: Vec<u8>, name: &str) -> Vec<u8> {
    let header = find_all(&data, LOCAL_HEADER_SIG)
        .into_iter()
        .find(|&pos| {
            let name_len = u16::from_le_bytes([data[pos + 26], data[pos + 27]]) as usize;
            &data[pos + 30..pos + 30 + name_len] == name.as_bytes()
        })
        .unwrap();

    let name_len = u16::from_le_bytes([data[header + 26], data[header + 27]]) as usize;
    let extra_len = u16::from_le_bytes([data[header + 28], data[header + 29]]) as usize;
    // BFINAL=1, BTYPE=11 (reserved)
    data[header + 30 + name_len + extra_len] = 0xFF;
    data
}

fn find_all(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    haystack
        .windows(needle.len())
        .enumerate()
        .filter(|(_, window)| *window == needle)
        .map(|(pos, _)| pos)
        .collect()
}

/// HTTP client stub that answers every request with the same response and
/// records what was asked.
#[derive(Debug)]
pub struct StaticClient {
    response: Result<FetchedPayload, FetchFailure>,
    requests: Mutex<Vec<(String, String)>>,
}

impl StaticClient {
    /// Answers `200 OK` with `body`, declared as `application/zip`.
    #[must_use]
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::with_response(Ok(FetchedPayload {
            status: 200,
            content_type: Some("application/zip".to_string()),
            body: body.into(),
        }))
    }

    /// Answers with `status` and a text body.
    #[must_use]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::with_response(Ok(FetchedPayload {
            status,
            content_type: Some("text/plain".to_string()),
            body: Bytes::from(body.into()),
        }))
    }

    /// Fails every request without a response.
    #[must_use]
    pub fn failing(failure: FetchFailure) -> Self {
        Self::with_response(Err(failure))
    }

    /// Answers with an arbitrary outcome.
    #[must_use]
    pub fn with_response(response: Result<FetchedPayload, FetchFailure>) -> Self {
        Self {
            response,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns the (url, accept) pairs received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for StaticClient {
    async fn get(&self, url: &str, accept: &str) -> Result<FetchedPayload, FetchFailure> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), accept.to_string()));
        self.response.clone()
    }
}
