//! Turns validated blocks into [`SentenceBlock`]s.
//!
//! Parsing never guesses: a block is validated first and any diagnostic
//! rejects it outright. After that every line is known to match its pattern.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::document::{split_entries, DocumentError, Entry};
use crate::extract::{extract_section, split_block_lines};
use crate::grammar::{markers as m, Grammar};
use crate::patterns::{DIGLOT_ENTRY, PHRASE_ALIGN_LINE, SEGMENT_HEADER_LINE, SEGMENT_LINE};
use crate::types::{
    DiglotEntry, DiglotSegmentMap, PhraseAlignment, Segment, SegmentLemmas, SentenceBlock,
    ViabilityFlag,
};
use crate::validator::BlockValidator;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Block failed validation with {} error(s): {}", .0.len(), .0.join("; "))]
    Invalid(Vec<String>),
}

impl ParseError {
    pub fn errors(&self) -> &[String] {
        match self {
            ParseError::Invalid(errors) => errors,
        }
    }
}

/// Parse one block with the standard grammar.
pub fn parse_block(text: &str) -> Result<SentenceBlock, ParseError> {
    BlockParser::default().parse(text)
}

/// A stage file read into typed items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub source: String,
    pub items: Vec<DocumentItem>,
    pub complete: bool,
}

impl ParsedDocument {
    pub fn sentences(&self) -> impl Iterator<Item = &SentenceBlock> {
        self.items.iter().filter_map(|item| match item {
            DocumentItem::Sentence(block) => Some(block),
            DocumentItem::Chapter { .. } => None,
        })
    }

    pub fn chapters(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            DocumentItem::Chapter { title } => Some(title.as_str()),
            DocumentItem::Sentence(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentItem {
    Chapter { title: String },
    Sentence(SentenceBlock),
}

#[derive(Debug, Clone, Default)]
pub struct BlockParser {
    validator: BlockValidator,
}

impl BlockParser {
    pub fn new(grammar: Grammar) -> Self {
        Self {
            validator: BlockValidator::new(grammar),
        }
    }

    pub fn parse(&self, text: &str) -> Result<SentenceBlock, ParseError> {
        let errors = self.validator.validate(text);
        if !errors.is_empty() {
            return Err(ParseError::Invalid(errors));
        }

        let lines = split_block_lines(text);
        let all_markers = self.validator.grammar().all_markers();
        let section = |marker: &str| -> Vec<String> {
            extract_section(&lines, marker, &all_markers)
                .map(|s| s.lines)
                .unwrap_or_default()
        };

        let locked: Vec<String> = section(m::LOCKED_PHRASE)
            .first()
            .map(|line| line.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        Ok(SentenceBlock {
            adv_s: section(m::ADV_S).join(" "),
            sim_s: section(m::SIM_S).join(" "),
            sim_e: section(m::SIM_E).join(" "),
            segments: section(m::SIM_S_SEGMENTS)
                .iter()
                .filter_map(|line| parse_segment(line))
                .collect(),
            phrase_alignments: section(m::PHRASE_ALIGN)
                .iter()
                .filter_map(|line| parse_alignment(line))
                .collect(),
            segment_lemmas: section(m::SIM_SL)
                .iter()
                .filter_map(|line| parse_segment_lemmas(line))
                .collect(),
            adv_s_lemmas: section(m::ADV_SL)
                .iter()
                .flat_map(|line| line.split_whitespace())
                .map(str::to_string)
                .collect(),
            diglot_map: section(m::DIGLOT_MAP)
                .iter()
                .filter_map(|line| parse_diglot_line(line))
                .collect(),
            locked_phrase: (!locked.is_empty()).then_some(locked),
        })
    }

    /// Parse every sentence block of a stage file.
    ///
    /// Directives are skipped. The first invalid block aborts the parse.
    pub fn parse_document(
        &self,
        text: &str,
        source: impl Into<String>,
    ) -> Result<ParsedDocument, DocumentError> {
        let mut items = Vec::new();
        let mut complete = false;

        for entry in split_entries(text) {
            match entry {
                Entry::Sentence { index, text } => {
                    let block = self
                        .parse(&text)
                        .map_err(|ParseError::Invalid(errors)| DocumentError::InvalidBlock {
                            index,
                            errors,
                        })?;
                    items.push(DocumentItem::Sentence(block));
                }
                Entry::ChapterMarker { title, .. } => items.push(DocumentItem::Chapter { title }),
                Entry::Directive { directive, .. } => complete |= directive.is_completion(),
            }
        }

        debug!(items = items.len(), complete, "Parsed document");
        Ok(ParsedDocument {
            source: source.into(),
            items,
            complete,
        })
    }
}

fn parse_segment(line: &str) -> Option<Segment> {
    let caps = SEGMENT_LINE.captures(line)?;
    Some(Segment {
        id: caps[1].to_string(),
        text: caps[2].to_string(),
    })
}

fn parse_alignment(line: &str) -> Option<PhraseAlignment> {
    let caps = PHRASE_ALIGN_LINE.captures(line)?;
    Some(PhraseAlignment {
        segment_id: caps[1].to_string(),
        adv_s_span: caps[2].trim().to_string(),
        sim_e_span: caps[3].trim().to_string(),
    })
}

fn parse_segment_lemmas(line: &str) -> Option<SegmentLemmas> {
    let caps = SEGMENT_HEADER_LINE.captures(line)?;
    Some(SegmentLemmas {
        segment_id: caps[1].to_string(),
        lemmas: caps[2].split_whitespace().map(str::to_string).collect(),
    })
}

fn parse_diglot_line(line: &str) -> Option<DiglotSegmentMap> {
    let caps = SEGMENT_HEADER_LINE.captures(line)?;
    let entries = &caps[2];

    let entries = if entries.trim().is_empty() {
        Vec::new()
    } else {
        entries.split('|').filter_map(|part| parse_diglot_entry(part.trim())).collect()
    };

    Some(DiglotSegmentMap {
        segment_id: caps[1].to_string(),
        entries,
    })
}

fn parse_diglot_entry(part: &str) -> Option<DiglotEntry> {
    let caps = DIGLOT_ENTRY.captures(part)?;
    let viability = caps[4].chars().next().and_then(ViabilityFlag::from_char)?;
    Some(DiglotEntry {
        eng_word: caps[1].trim().to_string(),
        spa_lemma: caps[2].trim().to_string(),
        exact_spa_form: caps[3].trim().to_string(),
        viability,
    })
}
