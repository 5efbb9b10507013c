//! Phase 2: `SimS_Segments::`, the segment ID universe.

use crate::patterns::{preview, SEGMENT_LINE};
use crate::report::Diagnostics;

use super::{m, SegmentIds, Sections};

pub(super) fn check_segments(sections: &Sections<'_>, diagnostics: &mut Diagnostics) -> SegmentIds {
    let mut ids = SegmentIds::default();

    let section = match sections.extract(m::SIM_S_SEGMENTS) {
        Some(section) => section,
        None => {
            diagnostics.push(
                "SimS_Segments:: marker found but content extraction failed (internal helper error).",
            );
            return ids;
        }
    };

    if section.is_empty() {
        diagnostics.push("SimS_Segments:: section is present but has no segment definition lines.");
        return ids;
    }

    for (i, line) in section.lines.iter().enumerate() {
        let caps = match SEGMENT_LINE.captures(line) {
            Some(caps) => caps,
            None => {
                diagnostics.push(format!(
                    "SimS_Segments:: Line {} ('{}...') invalid format (expected S<n>(content)).",
                    i + 1,
                    preview(line, 40)
                ));
                continue;
            }
        };

        let id = &caps[1];
        if caps[2].is_empty() {
            diagnostics.push(format!(
                "SimS_Segments:: Segment {} has no content in parentheses.",
                id
            ));
        }
        if ids.contains(id) {
            diagnostics.push(format!("SimS_Segments:: Duplicate segment ID: {}", id));
        }
        // Duplicates are still recorded: they lengthen the expected sequence.
        ids.record(id);
    }

    let expected: Vec<String> = (1..=ids.ordered.len()).map(|n| format!("S{}", n)).collect();
    if ids.ordered != expected {
        diagnostics.push(format!(
            "SimS_Segments:: IDs not sequential. Found: {:?}, Expected: {:?}",
            ids.ordered, expected
        ));
    }

    ids
}

#[cfg(test)]
mod tests {
    use crate::validator::fixtures::single_segment_block;
    use crate::validator::validate_block;

    const EMPTY_SEGMENTS: &str = "
AdvS:: a
SimS:: s
SimE:: e
SimS_Segments::
PHRASE_ALIGN::
S1 ~ a ~ b
SimSL::
S1 :: l
AdvSL:: la
DIGLOT_MAP::
S1 :: E->S(F)(Y)
";

    #[test]
    fn test_empty_segments_section() {
        let errors = validate_block(EMPTY_SEGMENTS);
        assert_eq!(
            errors[0],
            "SimS_Segments:: section is present but has no segment definition lines."
        );
        // With no segments, every S1 reference elsewhere is unknown.
        assert!(errors.contains(&"PHRASE_ALIGN:: Line count (1) differs from SimS_Segments count (0).".to_string()));
        assert!(errors.contains(&"PHRASE_ALIGN:: Line 1 uses unknown segment ID: S1".to_string()));
        assert!(errors.contains(&"SimSL:: Line 1 uses unknown segment ID: S1".to_string()));
        assert!(errors.iter().all(|e| !e.contains("IDs not sequential")));
    }

    #[test]
    fn test_malformed_segment_line() {
        let block = "
AdvS:: a
SimS:: s
SimE:: e
SimS_Segments::
S1(segment one)
S2 segment two)
PHRASE_ALIGN::
S1 ~ a ~ b
S2 ~ c ~ d
SimSL::
S1 :: l1
S2 :: l2
AdvSL:: la
DIGLOT_MAP::
S1 :: E1->S1(F1)(Y)
S2 :: E2->S2(F2)(Y)
";
        let errors = validate_block(block);
        assert_eq!(
            errors[0],
            "SimS_Segments:: Line 2 ('S2 segment two)...') invalid format (expected S<n>(content))."
        );
        assert!(errors.contains(&"PHRASE_ALIGN:: Line 2 uses unknown segment ID: S2".to_string()));
    }

    #[test]
    fn test_empty_parentheses() {
        let errors = validate_block(&single_segment_block("S1() ", "S1 :: E1->S1(F1)(Y)"));
        assert_eq!(
            errors,
            vec!["SimS_Segments:: Segment S1 has no content in parentheses."]
        );
    }

    #[test]
    fn test_non_sequential_ids() {
        let errors = validate_block(&single_segment_block(
            "S1(segment one)\nS3(segment three)",
            "S1 :: E1->S1(F1)(Y)\nS3 :: E3->S3(F3)(Y)",
        ));
        assert!(errors.contains(
            &r#"SimS_Segments:: IDs not sequential. Found: ["S1", "S3"], Expected: ["S1", "S2"]"#
                .to_string()
        ));
    }

    #[test]
    fn test_numbering_must_start_at_one() {
        let errors = validate_block(&single_segment_block("S0(cero)", "S0 ::"));
        assert!(errors.contains(
            &r#"SimS_Segments:: IDs not sequential. Found: ["S0"], Expected: ["S1"]"#.to_string()
        ));
    }

    #[test]
    fn test_long_line_preview_is_truncated() {
        let long = format!("S1 {}", "x".repeat(60));
        let errors = validate_block(&single_segment_block(&long, "S1 ::"));
        let expected = format!(
            "SimS_Segments:: Line 1 ('S1 {}...') invalid format (expected S<n>(content)).",
            "x".repeat(37)
        );
        assert_eq!(errors[0], expected);
    }
}
