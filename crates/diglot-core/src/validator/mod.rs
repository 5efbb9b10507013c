//! Structural validation of sentence blocks.
//!
//! Validation runs in a fixed sequence of phases:
//!
//! 0. Blank input and echoed `END_SENTENCE` terminators
//! 1. Marker presence, uniqueness and order
//! 2. `SimS_Segments::` (establishes the segment IDs every later phase joins on)
//! 3. `PHRASE_ALIGN::`
//! 4. `SimSL::`
//! 5. `AdvSL::`
//! 6. `DIGLOT_MAP::`
//! 7. `LOCKED_PHRASE::` (only when present)
//!
//! Blank input stops after phase 0. Any diagnostic recorded by the end of the
//! presence scan stops validation there, and order violations stop it before
//! phase 2: section positions are meaningless without a complete, ordered
//! marker set. Phases 2-7 always all run, so one pass reports as much as
//! possible.

mod alignment;
mod diglot;
mod locked;
mod markers;
mod segments;

use std::collections::HashSet;

use lazy_static::lazy_static;
use tracing::debug;

use crate::extract::{extract_section, split_block_lines, SectionContent};
use crate::grammar::{markers as m, Grammar};
use crate::report::{BlockReport, Diagnostics};

use markers::MarkerPositions;

lazy_static! {
    static ref STANDARD_VALIDATOR: BlockValidator = BlockValidator::default();
}

/// Validate one block against the standard grammar.
///
/// Returns the diagnostics in discovery order; an empty list means the
/// block is well-formed.
pub fn validate_block(block_text: &str) -> Vec<String> {
    STANDARD_VALIDATOR.validate(block_text)
}

/// Validates blocks against a grammar.
///
/// Holds no per-call state; one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct BlockValidator {
    grammar: Grammar,
    all_markers: Vec<String>,
}

impl Default for BlockValidator {
    fn default() -> Self {
        Self::new(Grammar::standard())
    }
}

impl BlockValidator {
    pub fn new(grammar: Grammar) -> Self {
        let all_markers = grammar.all_markers();
        Self {
            grammar,
            all_markers,
        }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Validate a block, returning its diagnostics.
    pub fn validate(&self, block_text: &str) -> Vec<String> {
        let lines = split_block_lines(block_text);
        let mut diagnostics = Diagnostics::new();

        self.run(&lines, &mut diagnostics);

        debug!(
            lines = lines.len(),
            errors = diagnostics.len(),
            "Validated block"
        );
        diagnostics.into_vec()
    }

    /// Validate a block and wrap the outcome in a report.
    pub fn report(&self, block_text: &str) -> BlockReport {
        BlockReport::new(None, self.validate(block_text))
    }

    fn run(&self, lines: &[&str], diagnostics: &mut Diagnostics) {
        if !markers::check_not_blank(lines, diagnostics) {
            return;
        }
        markers::check_premature_terminator(lines, diagnostics);

        let positions = markers::locate_markers(&self.grammar, lines, diagnostics);
        if !diagnostics.is_empty() {
            return;
        }

        markers::check_order(&self.grammar, &positions, diagnostics);
        if !diagnostics.is_empty() {
            return;
        }

        let sections = Sections {
            lines,
            all_markers: &self.all_markers,
        };

        let segments = if self.should_check(m::SIM_S_SEGMENTS, &positions) {
            segments::check_segments(&sections, diagnostics)
        } else {
            SegmentIds::default()
        };

        if self.should_check(m::PHRASE_ALIGN, &positions) {
            alignment::check_phrase_align(&sections, &segments, diagnostics);
        }
        if self.should_check(m::SIM_SL, &positions) {
            alignment::check_segment_lemmas(&sections, &segments, diagnostics);
        }
        if self.should_check(m::ADV_SL, &positions) {
            alignment::check_sentence_lemmas(&sections, diagnostics);
        }
        if self.should_check(m::DIGLOT_MAP, &positions) {
            diglot::check_diglot_map(&sections, &segments, diagnostics);
        }
        if self.should_check(m::LOCKED_PHRASE, &positions) {
            locked::check_locked_phrase(&sections, &segments, diagnostics);
        }
    }

    /// Required sections are always checked; optional ones only when found.
    fn should_check(&self, marker: &str, positions: &MarkerPositions) -> bool {
        self.grammar.is_required(marker) || positions.contains(marker)
    }
}

/// Section lookup over one block's lines.
pub(crate) struct Sections<'a> {
    lines: &'a [&'a str],
    all_markers: &'a [String],
}

impl Sections<'_> {
    fn extract(&self, marker: &str) -> Option<SectionContent> {
        extract_section(self.lines, marker, self.all_markers)
    }
}

/// Segment IDs declared in `SimS_Segments::`.
#[derive(Debug, Clone, Default)]
pub(crate) struct SegmentIds {
    /// Every ID as encountered, duplicates included
    ordered: Vec<String>,
    set: HashSet<String>,
}

impl SegmentIds {
    fn record(&mut self, id: &str) {
        self.ordered.push(id.to_string());
        self.set.insert(id.to_string());
    }

    fn contains(&self, id: &str) -> bool {
        self.set.contains(id)
    }

    fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Number of distinct IDs.
    fn count(&self) -> usize {
        self.set.len()
    }

    /// Distinct IDs in first-seen order.
    fn unique(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.ordered
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Block fixtures shared by the validator and parser tests.

    pub const GOOD_MINIMAL: &str = "
AdvS:: Oración avanzada.
SimS:: Oración simple.
SimE:: Simple sentence.
SimS_Segments::
S1(Oración simple.)
PHRASE_ALIGN::
S1 ~ Oración avanzada. ~ Simple sentence.
SimSL::
S1 :: oración simple
AdvSL:: oración avanzado
DIGLOT_MAP::
S1 :: Simple->simple(simple)(Y) | sentence->oración(oración)(Y)
";

    pub const GOOD_MULTI_SEGMENT_WITH_LOCKED: &str = "
AdvS:: El gato rápido y marrón saltó sobre el perro perezoso.
SimS:: El gato rápido saltó. El gato marrón también saltó. El perro era flojo.
SimE:: The quick cat jumped. The brown cat also jumped. The dog was lazy.
SimS_Segments::
S1(El gato rápido saltó.)
S2(El gato marrón también saltó.)
S3(El perro era flojo.)
PHRASE_ALIGN::
S1 ~ El gato rápido ~ The quick cat jumped.
S2 ~ y marrón saltó ~ The brown cat also jumped.
S3 ~ sobre el perro perezoso. ~ The dog was lazy.
SimSL::
S1 :: el gato rápido saltar
S2 :: el gato marrón también saltar
S3 :: el perro ser flojo
AdvSL:: el gato rápido y marrón saltar sobre el perro perezoso
DIGLOT_MAP::
S1 :: The->el(El)(Y) | quick->rápido(rápido)(Y) | cat->gato(gato)(Y) | jumped->saltar(saltó)(Y)
S2 :: The->el(El)(Y) | brown->marrón(marrón)(Y) | cat->gato(gato)(Y) | also->también(también)(Y) | jumped->saltar(saltó)(Y)
S3 :: The->el(El)(Y) | dog->perro(perro)(Y) | was->ser(era)(Y) | lazy->flojo(flojo)(Y)
LOCKED_PHRASE:: S1 S2
";

    pub const GOOD_EMPTY_SECTIONS: &str = "
AdvS:: Ok.
SimS:: Ok.
SimE:: Ok.
SimS_Segments::
S1(Ok.)
PHRASE_ALIGN::
S1 ~ Ok. ~ Ok.
SimSL::
S1 :: ok
AdvSL::
DIGLOT_MAP::
S1 ::
";

    pub const COMPACT: &str = "AdvS:: a\nSimS:: s\nSimE:: e\nSimS_Segments::\nS1(x)\nPHRASE_ALIGN::\nS1 ~ a ~ b\nSimSL::\nS1 :: l\nAdvSL:: la\nDIGLOT_MAP::\nS1 :: E->S(F)(Y)\n";

    /// A single-segment block with `segments` and `diglot` spliced in.
    pub fn single_segment_block(segments: &str, diglot: &str) -> String {
        format!(
            "AdvS:: a\nSimS:: s\nSimE:: e\nSimS_Segments::\n{}\nPHRASE_ALIGN::\nS1 ~ span1 ~ span2\nSimSL::\nS1 :: l1\nAdvSL:: la\nDIGLOT_MAP::\n{}\n",
            segments, diglot
        )
    }
}
