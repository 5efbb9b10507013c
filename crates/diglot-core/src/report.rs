//! Diagnostics collection and validation reports.
//!
//! Every anomaly in a block becomes one human-readable line. Checks append
//! to a shared [`Diagnostics`] collector; nothing is ever removed or
//! reordered, so the final list follows discovery order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Append-only collector of diagnostic strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    errors: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one diagnostic.
    pub fn push(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.errors
    }
}

/// Validation outcome for one block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockReport {
    /// 1-based position of the block in its document, if it came from one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,

    /// Diagnostics in discovery order; empty means accepted
    pub errors: Vec<String>,
}

impl BlockReport {
    pub fn new(index: Option<usize>, errors: Vec<String>) -> Self {
        Self { index, errors }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validation outcome for a whole stage output file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Where the document came from (usually a file path)
    pub source: String,

    /// When the document was validated
    pub validated_at: DateTime<Utc>,

    /// One report per sentence block, in file order
    pub blocks: Vec<BlockReport>,

    pub sentence_count: usize,
    pub chapter_marker_count: usize,
    pub directive_count: usize,

    /// Whether the file carries the completion directive
    pub complete: bool,
}

impl DocumentReport {
    /// Whether every sentence block was accepted.
    pub fn is_valid(&self) -> bool {
        self.blocks.iter().all(BlockReport::is_valid)
    }

    /// Reports for the rejected blocks only.
    pub fn invalid_blocks(&self) -> impl Iterator<Item = &BlockReport> {
        self.blocks.iter().filter(|b| !b.is_valid())
    }

    /// Total number of diagnostics across all blocks.
    pub fn error_count(&self) -> usize {
        self.blocks.iter().map(|b| b.errors.len()).sum()
    }
}
