//! Phases 3-5: `PHRASE_ALIGN::`, `SimSL::` and `AdvSL::`.
//!
//! PHRASE_ALIGN and SimSL carry one line per segment. AdvSL is a flat lemma
//! list for the whole sentence and may legitimately be empty.

use std::collections::HashSet;

use crate::patterns::{preview, PHRASE_ALIGN_LINE, SEGMENT_HEADER_LINE};
use crate::report::Diagnostics;

use super::{m, SegmentIds, Sections};

pub(super) fn check_phrase_align(
    sections: &Sections<'_>,
    segments: &SegmentIds,
    diagnostics: &mut Diagnostics,
) {
    let section = match sections.extract(m::PHRASE_ALIGN) {
        Some(section) => section,
        None => {
            diagnostics.push("PHRASE_ALIGN:: marker found but content extraction failed.");
            return;
        }
    };

    if section.is_empty() {
        if !segments.is_empty() {
            diagnostics.push("PHRASE_ALIGN:: section empty but SimS_Segments exist.");
        }
        return;
    }

    if section.len() != segments.count() {
        diagnostics.push(format!(
            "PHRASE_ALIGN:: Line count ({}) differs from SimS_Segments count ({}).",
            section.len(),
            segments.count()
        ));
    }

    for (i, line) in section.lines.iter().enumerate() {
        let caps = match PHRASE_ALIGN_LINE.captures(line) {
            Some(caps) => caps,
            None => {
                diagnostics.push(format!(
                    "PHRASE_ALIGN:: Line {} ('{}...') invalid format (expected S<n> ~ span ~ span).",
                    i + 1,
                    preview(line, 40)
                ));
                continue;
            }
        };

        let id = &caps[1];
        if !segments.contains(id) {
            diagnostics.push(format!(
                "PHRASE_ALIGN:: Line {} uses unknown segment ID: {}",
                i + 1,
                id
            ));
        }
        if caps[2].trim().is_empty() {
            diagnostics.push(format!(
                "PHRASE_ALIGN:: Line {} (ID {}) has empty first span.",
                i + 1,
                id
            ));
        }
        if caps[3].trim().is_empty() {
            diagnostics.push(format!(
                "PHRASE_ALIGN:: Line {} (ID {}) has empty second span.",
                i + 1,
                id
            ));
        }
    }
}

pub(super) fn check_segment_lemmas(
    sections: &Sections<'_>,
    segments: &SegmentIds,
    diagnostics: &mut Diagnostics,
) {
    let section = match sections.extract(m::SIM_SL) {
        Some(section) => section,
        None => {
            diagnostics.push("SimSL:: marker found but content extraction failed.");
            return;
        }
    };

    if section.is_empty() {
        if !segments.is_empty() {
            diagnostics.push("SimSL:: section empty but SimS_Segments exist.");
        }
        return;
    }

    if section.len() != segments.count() {
        diagnostics.push(format!(
            "SimSL:: Line count ({}) differs from SimS_Segments count ({}).",
            section.len(),
            segments.count()
        ));
    }

    let mut seen = HashSet::new();
    for (i, line) in section.lines.iter().enumerate() {
        // An empty lemma list is allowed.
        let caps = match SEGMENT_HEADER_LINE.captures(line) {
            Some(caps) => caps,
            None => {
                diagnostics.push(format!(
                    "SimSL:: Line {} ('{}...') invalid format (expected S<n> :: lemmas).",
                    i + 1,
                    preview(line, 40)
                ));
                continue;
            }
        };

        let id = caps[1].to_string();
        if !segments.contains(&id) {
            diagnostics.push(format!("SimSL:: Line {} uses unknown segment ID: {}", i + 1, id));
        }
        if seen.contains(&id) {
            diagnostics.push(format!("SimSL:: Duplicate S-ID line for segment: {}", id));
        }
        seen.insert(id);
    }

    for expected in segments.unique() {
        if !seen.contains(expected) {
            diagnostics.push(format!("SimSL:: Missing S-ID line for segment: {}", expected));
        }
    }
}

pub(super) fn check_sentence_lemmas(sections: &Sections<'_>, diagnostics: &mut Diagnostics) {
    match sections.extract(m::ADV_SL) {
        None => diagnostics.push("AdvSL:: marker found but content extraction failed."),
        Some(section) if section.len() > 1 => diagnostics.push(
            "AdvSL:: section has multiple content lines; expected one logical line of lemmas.",
        ),
        Some(_) => {}
    }
}
