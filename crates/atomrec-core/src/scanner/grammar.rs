//! Grammar-tag extraction.
//!
//! When a user assigns a syntax grammar to an unsaved buffer, the tag ends
//! up stored near the buffer id: the 32-hex id, a quote, a handful of
//! control/whitespace framing bytes, then a dotted identifier like
//! `source.python` or `text.html.basic`. One global regex pass recovers the
//! id→grammar pairs; unlike the text payload search this is not windowed,
//! since the tag sits right next to its id and there is no length field to
//! misread.

use once_cell::sync::Lazy;
use regex::bytes::Regex;
use std::collections::BTreeMap;
use tracing::debug;

static GRAMMAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?-u)([a-f0-9]{32})"[\s\x00-\x1f]{1,5}((?:text|source)\.[a-z0-9.\-]+)"#)
        .expect("grammar marker pattern is valid")
});

/// Extract grammar/syntax tags for buffers from raw storage bytes.
///
/// Returns a mapping of buffer id to grammar tag. If an id appears with
/// more than one tag in the same blob, the last match wins.
pub fn extract_grammars(data: &[u8]) -> BTreeMap<String, String> {
    let mut grammars = BTreeMap::new();

    for caps in GRAMMAR_RE.captures_iter(data) {
        let (Some(id), Some(tag)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        grammars.insert(
            String::from_utf8_lossy(id.as_bytes()).into_owned(),
            String::from_utf8_lossy(tag.as_bytes()).into_owned(),
        );
    }

    if !grammars.is_empty() {
        debug!("found {} buffer(s) with an explicit grammar", grammars.len());
    }

    grammars
}
