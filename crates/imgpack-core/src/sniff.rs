//! Payload content sniffing.

/// Lowercase markers that identify a markup document.
const MARKUP_SIGNATURES: [&str; 4] = ["<!doctype", "<html", "<?xml", "<head"];

/// Returns `true` if the first `window` bytes of `payload` look like an
/// HTML or XML document.
///
/// Sharing services commonly answer a non-direct link with a landing page;
/// this catches that before the payload reaches the ZIP parser. The declared
/// content type is not consulted.
///
/// # Examples
///
/// ```
/// use imgpack_core::sniff::looks_like_markup;
///
/// assert!(looks_like_markup(b"<!DOCTYPE html><html>", 30));
/// assert!(!looks_like_markup(b"PK\x03\x04\x14\x00", 30));
/// ```
#[must_use]
pub fn looks_like_markup(payload: &[u8], window: usize) -> bool {
    let head = &payload[..payload.len().min(window)];
    let text = String::from_utf8_lossy(head).to_lowercase();
    let text = text.trim();
    MARKUP_SIGNATURES.iter().any(|sig| text.contains(sig))
}

/// Returns a short printable preview of the start of `payload` for logs.
#[must_use]
pub fn preview(payload: &[u8], window: usize) -> String {
    String::from_utf8_lossy(&payload[..payload.len().min(window)])
        .chars()
        .map(|c| if c.is_control() { '.' } else { c })
        .collect()
}
