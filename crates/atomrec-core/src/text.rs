//! Text normalization and internal-buffer classification.
//!
//! Payloads sliced out of LevelDB blobs arrive as raw bytes with arbitrary
//! framing noise around them. Normalization decodes them best-effort and
//! strips everything that isn't printable text, so downstream consumers only
//! ever see clean strings.

/// Substrings that mark a buffer as Atom's own serialized state rather than
/// user content. Checked against the first line only.
const INTERNAL_MARKERS: &[&str] = &[
    "deserializer",
    "Workspace",
    "packagesWithActiveGrammars",
    "destroyedItemURIs",
];

/// Buffers shorter than this are never classified as internal.
const MIN_CLASSIFIABLE_LEN: usize = 10;

/// Decode raw bytes to text and remove control characters.
///
/// Invalid UTF-8 sequences are replaced, then every character that is not
/// printable and not one of `\n`, `\t`, `\r` is dropped. The result is
/// trimmed of leading and trailing whitespace. Never fails; normalizing
/// already-normalized text is a no-op.
pub fn normalize_text(blob: &[u8]) -> String {
    clean_text(&String::from_utf8_lossy(blob))
}

/// Decode raw bytes to text, dropping invalid byte sequences outright.
///
/// Used by the payload extractor, where a replacement character would leak
/// framing garbage into recovered notes.
pub(crate) fn decode_ignoring_invalid(blob: &[u8]) -> (String, bool) {
    let mut out = String::with_capacity(blob.len());
    let mut rest = blob;
    let mut dropped = false;

    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                break;
            }
            Err(err) => {
                let valid_up_to = err.valid_up_to();
                out.push_str(&String::from_utf8_lossy(&rest[..valid_up_to]));
                dropped = true;
                match err.error_len() {
                    Some(invalid) => rest = &rest[valid_up_to + invalid..],
                    None => break,
                }
            }
        }
    }

    (out, dropped)
}

/// Strip non-printable characters (keeping `\n`, `\t`, `\r`) and trim.
pub(crate) fn clean_text(text: &str) -> String {
    text.chars()
        .filter(|&c| matches!(c, '\n' | '\t' | '\r') || !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Check whether buffer content is Atom's own internal state.
///
/// Returns true only for texts of at least 10 characters whose first line
/// (first 200 characters of it) contains a known internal marker. Shorter
/// texts are too short to judge and default to "keep".
pub fn is_internal_buffer(text: &str) -> bool {
    if text.chars().count() < MIN_CLASSIFIABLE_LEN {
        return false;
    }

    let first_line = text.split('\n').next().unwrap_or("");
    let head: String = first_line.chars().take(200).collect();

    INTERNAL_MARKERS.iter().any(|marker| head.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_plain_text() {
        assert_eq!(normalize_text(b"Hello, world!"), "Hello, world!");
    }

    #[test]
    fn test_normalize_strips_control_bytes() {
        assert_eq!(normalize_text(b"\x00\x01Hello\x02"), "Hello");
    }

    #[test]
    fn test_normalize_keeps_newline_tab_cr() {
        assert_eq!(normalize_text(b"a\n\tb\rc"), "a\n\tb\rc");
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(normalize_text(b"  hello  \n"), "hello");
    }

    #[test]
    fn test_normalize_invalid_utf8_never_fails() {
        let result = normalize_text(&[0xFF, 0xFE, b'o', b'k']);
        assert!(result.contains("ok"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_text(b"  \x00mixed\tcontent\x1f\n");
        let twice = normalize_text(once.as_bytes());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_output_is_clean() {
        let out = normalize_text(&[0x07, b'a', 0x1B, b'b', 0x0A, 0x09, 0x0D, b'c', 0x7F]);
        for c in out.chars() {
            assert!(matches!(c, '\n' | '\t' | '\r') || !c.is_control());
        }
        assert_eq!(out, out.trim());
    }

    #[test]
    fn test_decode_ignoring_invalid_drops_bad_sequences() {
        let (text, dropped) = decode_ignoring_invalid(&[b'a', 0xFF, b'b']);
        assert_eq!(text, "ab");
        assert!(dropped);
    }

    #[test]
    fn test_decode_ignoring_invalid_clean_input() {
        let (text, dropped) = decode_ignoring_invalid("caf\u{e9}".as_bytes());
        assert_eq!(text, "caf\u{e9}");
        assert!(!dropped);
    }

    #[test]
    fn test_decode_ignoring_invalid_truncated_tail() {
        // 0xC3 starts a two-byte sequence that never completes
        let (text, dropped) = decode_ignoring_invalid(&[b'o', b'k', 0xC3]);
        assert_eq!(text, "ok");
        assert!(dropped);
    }

    #[test]
    fn test_internal_workspace_state() {
        assert!(is_internal_buffer(r#"{"deserializer":"Workspace","packagesWithActiveGrammars":[]}"#));
    }

    #[test]
    fn test_internal_marker_in_first_line_only() {
        assert!(!is_internal_buffer("my shopping list\ndeserializer notes for later"));
    }

    #[test]
    fn test_user_content_is_not_internal() {
        assert!(!is_internal_buffer("SELECT * FROM users;"));
    }

    #[test]
    fn test_short_text_is_never_internal() {
        assert!(!is_internal_buffer("short"));
        assert!(!is_internal_buffer(""));
    }

    #[test]
    fn test_marker_past_200_chars_is_ignored() {
        let padding = "x".repeat(200);
        let text = format!("{padding}deserializer");
        assert!(!is_internal_buffer(&text));
    }
}
