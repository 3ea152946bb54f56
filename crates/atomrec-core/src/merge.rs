//! Cross-file aggregation of recovered buffers.
//!
//! The same buffer id routinely shows up in several storage files (the live
//! write-ahead log plus older sorted tables), often with the payload intact
//! in only one of them. [`RecoveredBuffers`] folds per-file scan results
//! into one view with two merge rules:
//!
//! - **text**: non-empty wins — a later empty extraction never clobbers
//!   text that was already recovered, but a later non-empty one replaces it
//! - **grammar**: last write wins, plain map-update semantics
//!
//! The asymmetry is deliberate and load-bearing: regressing recovered text
//! loses user data, while a grammar tag is only ever a hint.

use crate::scanner::Payload;
use std::collections::BTreeMap;

/// One recovered buffer, as presented to consumers after aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferRecord {
    /// 32-character lowercase hex buffer id
    pub id: String,
    /// Normalized text content, possibly empty
    pub text: String,
    /// Grammar tag, if one was found for this id in any file
    pub grammar: Option<String>,
}

/// Aggregate of all buffers recovered across a set of storage files
#[derive(Debug, Clone, Default)]
pub struct RecoveredBuffers {
    texts: BTreeMap<String, String>,
    grammars: BTreeMap<String, String>,
}

impl RecoveredBuffers {
    /// Creates an empty aggregate
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one file's scan results into the aggregate.
    ///
    /// Files must be fed in the intended processing order (most recent
    /// first); the order only affects which grammar tag survives a tie.
    pub fn merge_file(
        &mut self,
        payloads: BTreeMap<String, Payload>,
        grammars: BTreeMap<String, String>,
    ) {
        for (id, payload) in payloads {
            let text = payload.into_text();
            match self.texts.get(&id) {
                Some(existing) if !existing.is_empty() && text.is_empty() => {}
                _ => {
                    self.texts.insert(id, text);
                }
            }
        }

        self.grammars.extend(grammars);
    }

    /// Number of distinct buffer ids seen so far
    pub fn buffer_count(&self) -> usize {
        self.texts.len()
    }

    /// Number of buffers with an explicit grammar tag
    pub fn grammar_count(&self) -> usize {
        self.grammars.len()
    }

    /// Returns the recovered buffers, ordered by id
    pub fn records(&self) -> impl Iterator<Item = BufferRecord> + '_ {
        self.texts.iter().map(|(id, text)| BufferRecord {
            id: id.clone(),
            text: text.clone(),
            grammar: self.grammars.get(id).cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::EmptyReason;
    use pretty_assertions::assert_eq;

    const ID_X: &str = "0123456789abcdef0123456789abcdef";
    const ID_Y: &str = "fedcba9876543210fedcba9876543210";

    fn payloads(entries: &[(&str, Payload)]) -> BTreeMap<String, Payload> {
        entries
            .iter()
            .map(|(id, p)| (id.to_string(), p.clone()))
            .collect()
    }

    fn grammars(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(id, g)| (id.to_string(), g.to_string()))
            .collect()
    }

    #[test]
    fn test_nonempty_text_wins_over_earlier_empty() {
        let mut agg = RecoveredBuffers::new();
        agg.merge_file(
            payloads(&[(ID_X, Payload::Empty(EmptyReason::MissingTextMarker))]),
            BTreeMap::new(),
        );
        agg.merge_file(payloads(&[(ID_X, Payload::Text("hello".into()))]), BTreeMap::new());

        let records: Vec<_> = agg.records().collect();
        assert_eq!(records[0].text, "hello");
    }

    #[test]
    fn test_nonempty_text_survives_later_empty() {
        let mut agg = RecoveredBuffers::new();
        agg.merge_file(payloads(&[(ID_X, Payload::Text("hello".into()))]), BTreeMap::new());
        agg.merge_file(
            payloads(&[(ID_X, Payload::Empty(EmptyReason::TruncatedPayload))]),
            BTreeMap::new(),
        );

        let records: Vec<_> = agg.records().collect();
        assert_eq!(records[0].text, "hello");
    }

    #[test]
    fn test_later_nonempty_text_replaces_nonempty() {
        let mut agg = RecoveredBuffers::new();
        agg.merge_file(payloads(&[(ID_X, Payload::Text("old".into()))]), BTreeMap::new());
        agg.merge_file(payloads(&[(ID_X, Payload::Text("new".into()))]), BTreeMap::new());

        let records: Vec<_> = agg.records().collect();
        assert_eq!(records[0].text, "new");
    }

    #[test]
    fn test_grammar_last_write_wins() {
        let mut agg = RecoveredBuffers::new();
        agg.merge_file(BTreeMap::new(), grammars(&[(ID_Y, "source.python")]));
        agg.merge_file(BTreeMap::new(), grammars(&[(ID_Y, "source.ruby")]));

        assert_eq!(agg.grammar_count(), 1);
        // Records only surface ids with a text entry, so give it one
        agg.merge_file(payloads(&[(ID_Y, Payload::Text("x".into()))]), BTreeMap::new());
        let records: Vec<_> = agg.records().collect();
        assert_eq!(records[0].grammar.as_deref(), Some("source.ruby"));
    }

    #[test]
    fn test_records_ordered_by_id() {
        let mut agg = RecoveredBuffers::new();
        agg.merge_file(
            payloads(&[
                (ID_Y, Payload::Text("second".into())),
                (ID_X, Payload::Text("first".into())),
            ]),
            BTreeMap::new(),
        );

        let ids: Vec<_> = agg.records().map(|r| r.id).collect();
        assert_eq!(ids, vec![ID_X.to_string(), ID_Y.to_string()]);
    }

    #[test]
    fn test_counts() {
        let mut agg = RecoveredBuffers::new();
        agg.merge_file(
            payloads(&[(ID_X, Payload::Text("a".into()))]),
            grammars(&[(ID_X, "source.rust")]),
        );
        agg.merge_file(payloads(&[(ID_Y, Payload::Text("b".into()))]), BTreeMap::new());

        assert_eq!(agg.buffer_count(), 2);
        assert_eq!(agg.grammar_count(), 1);
    }
}
