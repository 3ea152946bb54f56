//! # atomrec-core
//!
//! A library for recovering unsaved Atom editor buffers from the raw files
//! of Atom's IndexedDB LevelDB store.
//!
//! This crate provides the core functionality for:
//! - Scanning raw `.ldb`/`.log` bytes for buffer-id markers and their
//!   length-prefixed text payloads
//! - Recovering grammar/syntax tags associated with each buffer
//! - Merging per-file results across a whole store
//!
//! The storage layout is undocumented and reverse-engineered; everything
//! here is best-effort pattern matching, not a LevelDB table parser.
//! Truncated records, missing markers and bogus lengths degrade to empty
//! payloads for the affected buffer and never abort a scan.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`scanner`]: Byte-level buffer and grammar extraction
//! - [`merge`]: Cross-file aggregation with the text/grammar merge rules
//! - [`text`]: Normalization and internal-buffer classification
//! - [`grammars`]: Grammar-tag to file-extension mapping
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use atomrec_core::{Extractor, RecoveredBuffers, scanner::grammar};
//! use std::fs;
//!
//! let extractor = Extractor::new();
//! let mut recovered = RecoveredBuffers::new();
//!
//! // Feed each storage file, most recently modified first
//! for path in ["000005.ldb", "000006.log"] {
//!     let data = fs::read(path)?;
//!     recovered.merge_file(extractor.extract_texts(&data), grammar::extract_grammars(&data));
//! }
//!
//! for record in recovered.records() {
//!     println!("{} ({:?}): {} chars", record.id, record.grammar, record.text.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod error;
pub mod grammars;
pub mod merge;
pub mod scanner;
pub mod text;

// Re-export primary types for convenience
pub use error::{Error, Result};
pub use merge::{BufferRecord, RecoveredBuffers};
pub use scanner::{decode_varint_length, EmptyReason, Extractor, ExtractorConfig, Payload};
pub use text::{is_internal_buffer, normalize_text};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
