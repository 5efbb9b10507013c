//! Stage output files.
//!
//! The orchestration writes one `.llm.txt` file per book. Entries are
//! separated by lines reading `END_SENTENCE`, and each entry is one of:
//!
//! - a sentence block produced by the LLM
//! - a chapter marker, `CHAPTER_MARKER_DIRECT:: <title>`
//! - a `//` directive (completion and resume markers, failure placeholders)
//!
//! Only sentence blocks are validated.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};

use crate::grammar::Grammar;
use crate::report::{BlockReport, DocumentReport};
use crate::validator::BlockValidator;

/// Terminator appended after every entry. Never part of a block itself.
pub const END_SENTENCE: &str = "END_SENTENCE";

pub const CHAPTER_MARKER_PREFIX: &str = "CHAPTER_MARKER_DIRECT::";
pub const DIRECTIVE_PREFIX: &str = "//";

const COMPLETION_DIRECTIVE: &str = "// --- BOOK_FULLY_PROCESSED --- //";
const RESUME_PREFIX: &str = "// --- PARTIAL_FILE_RESUME_NEXT_ITEM_INDEX:";
const FAILURE_PREFIX: &str = "// LLM_";

/// Errors raised when turning a stage file into typed blocks.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Entry {index} is not a valid block: {}", errors.join("; "))]
    InvalidBlock { index: usize, errors: Vec<String> },
}

/// One entry of a stage file. `index` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Sentence { index: usize, text: String },
    ChapterMarker { index: usize, title: String },
    Directive { index: usize, directive: Directive },
}

impl Entry {
    pub fn index(&self) -> usize {
        match self {
            Entry::Sentence { index, .. }
            | Entry::ChapterMarker { index, .. }
            | Entry::Directive { index, .. } => *index,
        }
    }

    fn classify(index: usize, text: &str) -> Self {
        if let Some(title) = text.strip_prefix(CHAPTER_MARKER_PREFIX) {
            Entry::ChapterMarker {
                index,
                title: title.trim().to_string(),
            }
        } else if text.starts_with(DIRECTIVE_PREFIX) {
            Entry::Directive {
                index,
                directive: Directive::new(text),
            }
        } else {
            Entry::Sentence {
                index,
                text: text.to_string(),
            }
        }
    }
}

/// A `//` line written by the orchestration rather than the LLM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub text: String,
}

impl Directive {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The book has been fully processed.
    pub fn is_completion(&self) -> bool {
        self.text.trim() == COMPLETION_DIRECTIVE
    }

    /// Next item index for a partially written file.
    pub fn resume_index(&self) -> Option<usize> {
        self.text
            .trim()
            .strip_prefix(RESUME_PREFIX)?
            .strip_suffix("--- //")?
            .trim()
            .parse()
            .ok()
    }

    /// Placeholder left where the LLM failed to produce a usable block.
    pub fn is_failure_placeholder(&self) -> bool {
        self.text.starts_with(FAILURE_PREFIX)
    }
}

/// Split a stage file into classified entries.
///
/// Pieces are separated by lines whose trimmed text is `END_SENTENCE`; each
/// piece is trimmed and empty pieces are dropped before numbering.
pub fn split_entries(text: &str) -> Vec<Entry> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.trim() == END_SENTENCE {
            pieces.push(std::mem::take(&mut current));
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    pieces.push(current);

    pieces
        .iter()
        .map(|piece| piece.trim())
        .filter(|piece| !piece.is_empty())
        .enumerate()
        .map(|(i, piece)| Entry::classify(i + 1, piece))
        .collect()
}

/// Remove echoed `END_SENTENCE` lines from a raw LLM response.
pub fn strip_echoed_terminators(raw: &str) -> String {
    raw.lines()
        .filter(|line| line.trim() != END_SENTENCE)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Validates every sentence block of a stage file.
#[derive(Debug, Clone, Default)]
pub struct DocumentValidator {
    validator: BlockValidator,
}

impl DocumentValidator {
    pub fn new(grammar: Grammar) -> Self {
        Self {
            validator: BlockValidator::new(grammar),
        }
    }

    pub fn validate(&self, text: &str, source: impl Into<String>) -> DocumentReport {
        let source = source.into();
        let entries = split_entries(text);

        let mut report = DocumentReport {
            source,
            validated_at: Utc::now(),
            blocks: Vec::new(),
            sentence_count: 0,
            chapter_marker_count: 0,
            directive_count: 0,
            complete: false,
        };

        for entry in &entries {
            match entry {
                Entry::Sentence { index, text } => {
                    report.sentence_count += 1;
                    let errors = self.validator.validate(text);
                    if !errors.is_empty() {
                        debug!(index, errors = errors.len(), "Invalid block");
                    }
                    report.blocks.push(BlockReport::new(Some(*index), errors));
                }
                Entry::ChapterMarker { .. } => report.chapter_marker_count += 1,
                Entry::Directive { directive, .. } => {
                    report.directive_count += 1;
                    report.complete |= directive.is_completion();
                }
            }
        }

        info!(
            source = %report.source,
            entries = entries.len(),
            errors = report.error_count(),
            "Validated document"
        );
        report
    }
}
