//! Raw-blob scanning for buffer records.
//!
//! Atom persists unsaved buffers through IndexedDB on top of LevelDB. This
//! module scans the raw bytes of the store's `.ldb`/`.log` files directly,
//! without going through a LevelDB read path.
//!
//! ## Algorithm Overview
//!
//! 1. Find every `id"<whitespace><32-hex>"` marker and collect the ids
//! 2. For each id, take a bounded window after its first marker occurrence
//! 3. Find the `text"` marker inside the window
//! 4. Decode the 1-or-2-byte length prefix that follows it
//! 5. Slice exactly that many bytes, decode and normalize them
//!
//! Every step that fails yields an empty payload for that id with a reason
//! attached; nothing here aborts a scan. The format is reverse-engineered
//! and loosely structured, so truncated records, missing markers and bogus
//! lengths are expected inputs, not errors.

pub mod grammar;
mod varint;

use crate::text;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace, warn};

pub use varint::decode_varint_length;

/// Marker preceding a buffer's text payload
const TEXT_MARKER: &[u8] = b"text\"";

/// Matches a buffer id marker: `id"`, whitespace, 32 lowercase hex chars,
/// closing quote. `(?-u)` so `\s` stays byte-oriented over non-UTF-8 blobs.
static ID_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?-u)id"\s+([a-f0-9]{32})""#).expect("id marker pattern is valid")
});

/// Why an identifier yielded no text.
///
/// Preserves the distinction between "no text found" and "text found but
/// empty" — callers that only want strings can flatten with
/// [`Payload::into_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    /// No `text"` marker inside the search window
    MissingTextMarker,
    /// The length prefix could not be decoded
    UndecodableLength,
    /// Decoded length was zero or above the payload ceiling
    LengthOutOfRange(usize),
    /// The declared payload would run past the end of the window
    TruncatedPayload,
}

/// Outcome of extracting one identifier's payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Normalized text content (may itself be empty after cleanup)
    Text(String),
    /// No content recovered, with the reason
    Empty(EmptyReason),
}

impl Payload {
    /// Flattens the outcome into a string; empty outcomes become `""`
    pub fn into_text(self) -> String {
        match self {
            Payload::Text(text) => text,
            Payload::Empty(_) => String::new(),
        }
    }

    /// Returns true if any text was recovered
    pub fn is_text(&self) -> bool {
        matches!(self, Payload::Text(_))
    }
}

/// Configuration for the extractor
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Bytes searched after an id marker for its text payload.
    /// Buffers and their content are stored contiguously in practice;
    /// bounding the search avoids matching a later record's `text"` marker.
    pub search_window: usize,
    /// Hard ceiling on a declared payload length. Larger declared lengths
    /// are treated as decode failures, never partially extracted.
    pub max_text_len: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            // Both constants tuned empirically against the observed format;
            // do not re-derive.
            search_window: 2000,
            max_text_len: 10_000,
        }
    }
}

impl ExtractorConfig {
    /// Creates a new extractor config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the payload search window size
    pub fn search_window(mut self, bytes: usize) -> Self {
        self.search_window = bytes;
        self
    }

    /// Sets the maximum payload length
    pub fn max_text_len(mut self, bytes: usize) -> Self {
        self.max_text_len = bytes;
        self
    }
}

/// Scanner for buffer ids and their text payloads in raw storage bytes
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    /// Creates a new extractor with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new extractor with custom configuration
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Returns the distinct buffer ids appearing in `data`.
    ///
    /// Duplicate occurrences collapse; the result is sorted by id.
    pub fn buffer_ids(&self, data: &[u8]) -> BTreeSet<String> {
        ID_MARKER_RE
            .captures_iter(data)
            .filter_map(|caps| caps.get(1))
            .map(|id| String::from_utf8_lossy(id.as_bytes()).into_owned())
            .collect()
    }

    /// Extracts the text payload for every buffer id in `data`.
    ///
    /// Only the first marker occurrence per id is consulted; the regex pass
    /// runs left to right, so the first capture for an id is its first
    /// occurrence. Ids whose payload cannot be recovered map to
    /// [`Payload::Empty`] with the reason.
    pub fn extract_texts(&self, data: &[u8]) -> BTreeMap<String, Payload> {
        let mut payloads = BTreeMap::new();

        debug!("scanning {} bytes for buffer records", data.len());

        for caps in ID_MARKER_RE.captures_iter(data) {
            let (Some(whole), Some(id_match)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let id = String::from_utf8_lossy(id_match.as_bytes()).into_owned();

            // First occurrence wins
            if payloads.contains_key(&id) {
                continue;
            }

            let payload = self.extract_payload_at(data, whole.start(), &id);
            trace!(id = %id, found = payload.is_text(), "extracted buffer payload");
            payloads.insert(id, payload);
        }

        debug!("scan complete: {} distinct buffer(s)", payloads.len());
        payloads
    }

    /// Extracts the payload for one id whose marker starts at `marker_start`
    fn extract_payload_at(&self, data: &[u8], marker_start: usize, id: &str) -> Payload {
        let window_end = data.len().min(marker_start + self.config.search_window);
        let window = &data[marker_start..window_end];

        let Some(text_pos) = find_subsequence(window, TEXT_MARKER) else {
            return Payload::Empty(EmptyReason::MissingTextMarker);
        };

        let length_offset = text_pos + TEXT_MARKER.len();
        let (length, consumed) = decode_varint_length(window, length_offset);
        if consumed == 0 {
            return Payload::Empty(EmptyReason::UndecodableLength);
        }
        if length == 0 || length > self.config.max_text_len {
            return Payload::Empty(EmptyReason::LengthOutOfRange(length));
        }

        let content_start = length_offset + consumed;
        let content_end = content_start + length;
        if content_end > window.len() {
            return Payload::Empty(EmptyReason::TruncatedPayload);
        }

        let (decoded, dropped) = text::decode_ignoring_invalid(&window[content_start..content_end]);
        if dropped {
            warn!(id = %id, "dropped invalid UTF-8 sequences from buffer text");
        }

        Payload::Text(text::clean_text(&decoded))
    }
}

/// Find a subsequence within a byte slice
fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
