//! Typed model of a validated sentence block.
//!
//! Produced by [`crate::parser::BlockParser`]; only blocks that pass
//! validation are ever turned into these types.

use serde::{Deserialize, Serialize};

/// One sentence of a book in every representation the LLM produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SentenceBlock {
    /// Source (advanced) Spanish sentence
    pub adv_s: String,

    /// Simplified Spanish rendering
    pub sim_s: String,

    /// English rendering of the simplified sentence
    pub sim_e: String,

    pub segments: Vec<Segment>,
    pub phrase_alignments: Vec<PhraseAlignment>,
    pub segment_lemmas: Vec<SegmentLemmas>,

    /// Lemmas of the advanced sentence as a whole
    pub adv_s_lemmas: Vec<String>,

    pub diglot_map: Vec<DiglotSegmentMap>,

    /// Segment IDs whose phrasing must not be altered downstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_phrase: Option<Vec<String>>,
}

impl SentenceBlock {
    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn diglot_for(&self, id: &str) -> Option<&DiglotSegmentMap> {
        self.diglot_map.iter().find(|d| d.segment_id == id)
    }

    pub fn is_locked(&self, id: &str) -> bool {
        self.locked_phrase
            .as_ref()
            .is_some_and(|ids| ids.iter().any(|locked| locked == id))
    }
}

/// A numbered piece of the simplified sentence, e.g. `S1(El gato saltó.)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseAlignment {
    pub segment_id: String,
    pub adv_s_span: String,
    pub sim_e_span: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentLemmas {
    pub segment_id: String,
    pub lemmas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiglotSegmentMap {
    pub segment_id: String,
    pub entries: Vec<DiglotEntry>,
}

impl DiglotSegmentMap {
    /// Entries that may be swapped into the other language.
    pub fn viable(&self) -> impl Iterator<Item = &DiglotEntry> {
        self.entries.iter().filter(|e| e.viability.is_viable())
    }
}

/// `EngWord->SpaLemma(ExactSpaForm)(Y|N)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiglotEntry {
    pub eng_word: String,
    pub spa_lemma: String,
    pub exact_spa_form: String,
    pub viability: ViabilityFlag,
}

/// Whether a word substitution reads naturally in context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViabilityFlag {
    Viable,
    NotViable,
}

impl ViabilityFlag {
    /// Only uppercase `Y` and `N` are accepted.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'Y' => Some(Self::Viable),
            'N' => Some(Self::NotViable),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Self::Viable => 'Y',
            Self::NotViable => 'N',
        }
    }

    pub fn is_viable(&self) -> bool {
        matches!(self, Self::Viable)
    }
}

impl std::fmt::Display for ViabilityFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
