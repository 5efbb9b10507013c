//! Phases 0 and 1: blank input, echoed terminators, marker presence and order.

use std::collections::HashMap;

use crate::document::END_SENTENCE;
use crate::grammar::Grammar;
use crate::report::Diagnostics;

/// First-occurrence line index of each marker found in a block.
#[derive(Debug, Default)]
pub(super) struct MarkerPositions {
    first_line: HashMap<String, usize>,
}

impl MarkerPositions {
    pub(super) fn contains(&self, marker: &str) -> bool {
        self.first_line.contains_key(marker)
    }

    fn get(&self, marker: &str) -> Option<usize> {
        self.first_line.get(marker).copied()
    }
}

/// Record the blank-block error. Returns `false` when nothing else should run.
pub(super) fn check_not_blank(lines: &[&str], diagnostics: &mut Diagnostics) -> bool {
    if lines.iter().all(|line| line.trim().is_empty()) {
        diagnostics.push("Block is empty or contains only whitespace.");
        return false;
    }
    true
}

/// The LLM must not emit the block terminator itself.
pub(super) fn check_premature_terminator(lines: &[&str], diagnostics: &mut Diagnostics) {
    let echoed = lines
        .iter()
        .map(|line| line.trim())
        .any(|line| !line.is_empty() && line.contains(END_SENTENCE));

    if echoed {
        diagnostics.push("Block contains premature END_SENTENCE marker(s).");
    }
}

/// Find every declared marker, reporting duplicates and missing required ones.
pub(super) fn locate_markers(
    grammar: &Grammar,
    lines: &[&str],
    diagnostics: &mut Diagnostics,
) -> MarkerPositions {
    let mut positions = MarkerPositions::default();

    for marker in &grammar.required_markers {
        scan_marker(marker, "required", lines, &mut positions, diagnostics);
        if !positions.contains(marker) {
            diagnostics.push(format!("Missing required section marker: {}", marker));
        }
    }

    for marker in &grammar.optional_markers {
        scan_marker(marker, "optional", lines, &mut positions, diagnostics);
    }

    positions
}

fn scan_marker(
    marker: &str,
    kind: &str,
    lines: &[&str],
    positions: &mut MarkerPositions,
    diagnostics: &mut Diagnostics,
) {
    for (i, line) in lines.iter().enumerate() {
        if !line.trim().starts_with(marker) {
            continue;
        }

        match positions.get(marker) {
            Some(first) => diagnostics.push(format!(
                "Duplicate {} section marker: {} (first at line {}, new at {}).",
                kind,
                marker,
                first + 1,
                i + 1
            )),
            None => {
                positions.first_line.insert(marker.to_string(), i);
            }
        }
    }
}

/// Required markers must appear in catalog order.
///
/// Assumes every required marker was located.
pub(super) fn check_order(grammar: &Grammar, positions: &MarkerPositions, diagnostics: &mut Diagnostics) {
    let mut last: Option<usize> = None;

    for (i, marker) in grammar.required_markers.iter().enumerate() {
        let Some(current) = positions.get(marker) else {
            continue;
        };

        if last.is_some_and(|last| current < last) {
            diagnostics.push(format!(
                "Section {} (at line {}) appears out of expected order relative to {}.",
                marker,
                current + 1,
                grammar.required_markers[i - 1]
            ));
        }
        last = Some(current);
    }
}

#[cfg(test)]
mod tests {
    use crate::validator::validate_block;

    const MISSING_ADVS: &str = "
SimS:: SimS content.
SimE:: SimE content.
SimS_Segments::
S1(segment)
PHRASE_ALIGN::
S1 ~ a ~ b
SimSL::
S1 :: l
AdvSL:: la
DIGLOT_MAP::
S1 :: E->S(F)(Y)
";

    const DUPLICATE_SIMS: &str = "
AdvS:: AdvS content.
SimS:: SimS content 1.
SimE:: SimE content.
SimS:: SimS content 2.
SimS_Segments::
S1(segment)
PHRASE_ALIGN::
S1 ~ a ~ b
SimSL::
S1 :: l
AdvSL:: la
DIGLOT_MAP::
S1 :: E->S(F)(Y)
";

    const SIMS_BEFORE_ADVS: &str = "
SimS:: SimS content.
AdvS:: AdvS content.
SimE:: SimE content.
SimS_Segments::
S1(segment)
PHRASE_ALIGN::
S1 ~ a ~ b
SimSL::
S1 :: l
AdvSL:: la
DIGLOT_MAP::
S1 :: E->S(F)(Y)
";

    #[test]
    fn test_missing_required_marker_short_circuits() {
        assert_eq!(
            validate_block(MISSING_ADVS),
            vec!["Missing required section marker: AdvS::"]
        );
    }

    #[test]
    fn test_duplicate_required_marker_short_circuits() {
        assert_eq!(
            validate_block(DUPLICATE_SIMS),
            vec!["Duplicate required section marker: SimS:: (first at line 3, new at 5)."]
        );
    }

    #[test]
    fn test_duplicate_optional_marker() {
        let block = format!(
            "{}LOCKED_PHRASE:: S1\nLOCKED_PHRASE:: S1\n",
            crate::validator::fixtures::COMPACT
        );
        assert_eq!(
            validate_block(&block),
            vec!["Duplicate optional section marker: LOCKED_PHRASE:: (first at line 13, new at 14)."]
        );
    }

    #[test]
    fn test_out_of_order_marker_short_circuits() {
        assert_eq!(
            validate_block(SIMS_BEFORE_ADVS),
            vec!["Section SimS:: (at line 2) appears out of expected order relative to AdvS::."]
        );
    }

    #[test]
    fn test_end_sentence_needs_no_line_anchor() {
        let errors = validate_block("AdvS:: text END_SENTENCE more");
        assert_eq!(errors[0], "Block contains premature END_SENTENCE marker(s).");
    }

    #[test]
    fn test_similar_markers_are_distinct() {
        // AdvSL:: and SimSL:: must not count as AdvS:: / SimS:: duplicates.
        assert!(validate_block(crate::validator::fixtures::COMPACT).is_empty());
    }
}
