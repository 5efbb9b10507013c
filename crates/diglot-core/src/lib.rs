//! # diglot-core
//!
//! Deterministic validation of LLM-generated diglot sentence blocks.
//!
//! Each block describes one sentence of a book in a line-oriented
//! micro-format of `::`-terminated section markers (`AdvS::`, `SimS::`,
//! `SimE::`, `SimS_Segments::`, `PHRASE_ALIGN::`, `SimSL::`, `AdvSL::`,
//! `DIGLOT_MAP::` and the optional `LOCKED_PHRASE::`). The validator decides
//! whether a block is accepted and, if not, lists every structural problem
//! in plain language so the caller can feed it back to the model.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: same block, same diagnostics, same order
//! 2. **Pure**: no I/O, no LLM calls, no shared mutable state
//! 3. **Exhaustive**: once markers are in place, every section is checked
//!    and all findings are reported in one pass
//!
//! ## Example
//!
//! ```rust,ignore
//! use diglot_core::{parse_block, validate_block};
//!
//! let errors = validate_block(&llm_response);
//! if errors.is_empty() {
//!     let block = parse_block(&llm_response)?;
//!     println!("{} segments", block.segments.len());
//! } else {
//!     for error in &errors {
//!         eprintln!("{}", error);
//!     }
//! }
//! ```

pub mod document;
pub mod extract;
pub mod grammar;
pub mod parser;
pub mod patterns;
pub mod report;
pub mod types;
pub mod validator;

// Re-export main types at crate root
pub use document::{
    split_entries, strip_echoed_terminators, Directive, DocumentError, DocumentValidator, Entry,
    END_SENTENCE,
};
pub use extract::{extract_section, split_block_lines, SectionContent};
pub use grammar::{
    markers, validate_grammar_schema, Grammar, GrammarError, GrammarFormat, SchemaError,
};
pub use parser::{parse_block, BlockParser, DocumentItem, ParseError, ParsedDocument};
pub use report::{BlockReport, Diagnostics, DocumentReport};
pub use types::{
    DiglotEntry, DiglotSegmentMap, PhraseAlignment, Segment, SegmentLemmas, SentenceBlock,
    ViabilityFlag,
};
pub use validator::{validate_block, BlockValidator};

use thiserror::Error;

/// Any failure surfaced by this crate.
///
/// Validation findings are not errors: they are the `Vec<String>` returned
/// by [`validate_block`].
#[derive(Error, Debug)]
pub enum DiglotError {
    #[error("Grammar error: {0}")]
    Grammar(#[from] GrammarError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}
