//! Length-prefix decoding for the storage format.
//!
//! String payloads in the scraped LevelDB blobs are prefixed with a
//! 1-or-2-byte variable-length integer:
//!
//! - high bit clear: the byte itself is the length
//! - high bit set: low 7 bits of byte 1, byte 2 shifted left 7 bits
//!
//! The encoding tops out at 16383. Lengths that would need a third byte are
//! not representable and get misread as a smaller value; that is a known
//! limitation of the reverse-engineered format, and the payload ceiling in
//! the extractor rejects the resulting nonsense lengths anyway.

/// Decode a 1-or-2-byte length prefix at `offset`.
///
/// Returns `(length, bytes_consumed)`. `(0, 0)` means nothing decodable at
/// that position: the offset is out of bounds, or the high bit demanded a
/// second byte that isn't there. Never reads past the end of `data` and
/// never consumes more than 2 bytes.
pub fn decode_varint_length(data: &[u8], offset: usize) -> (usize, usize) {
    let Some(&first) = data.get(offset) else {
        return (0, 0);
    };

    if first < 0x80 {
        return (first as usize, 1);
    }

    let Some(&second) = data.get(offset + 1) else {
        return (0, 0);
    };

    let length = ((first & 0x7F) as usize) | ((second as usize) << 7);
    (length, 2)
}
