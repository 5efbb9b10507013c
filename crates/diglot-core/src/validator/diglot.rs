//! Phase 6: `DIGLOT_MAP::`.
//!
//! Each line is `S<n> :: entry | entry | ...`, where an entry reads
//! `EngWord->SpaLemma(ExactSpaForm)(Y|N)`. A header with no entries is valid.

use std::collections::HashSet;

use crate::patterns::{preview, DIGLOT_ENTRY, SEGMENT_HEADER_LINE};
use crate::report::Diagnostics;

use super::{m, SegmentIds, Sections};

pub(super) fn check_diglot_map(
    sections: &Sections<'_>,
    segments: &SegmentIds,
    diagnostics: &mut Diagnostics,
) {
    let section = match sections.extract(m::DIGLOT_MAP) {
        Some(section) => section,
        None => {
            diagnostics.push("DIGLOT_MAP:: marker found but content extraction failed.");
            return;
        }
    };

    if section.is_empty() {
        if !segments.is_empty() {
            diagnostics.push(
                "DIGLOT_MAP:: section empty but SimS_Segments exist (expected S-ID lines for DIGLOT_MAP).",
            );
        }
        return;
    }

    let mut seen = HashSet::new();
    for (i, line) in section.lines.iter().enumerate() {
        let caps = match SEGMENT_HEADER_LINE.captures(line) {
            Some(caps) => caps,
            None => {
                diagnostics.push(format!(
                    "DIGLOT_MAP:: Line {} ('{}...') invalid S-ID header format (expected S<n> :: entries).",
                    i + 1,
                    preview(line, 40)
                ));
                continue;
            }
        };

        let id = caps[1].to_string();
        let entries = &caps[2];

        if !segments.contains(&id) {
            diagnostics.push(format!(
                "DIGLOT_MAP:: Line {} (S-ID header '{}') uses unknown segment ID not defined in SimS_Segments.",
                i + 1,
                id
            ));
        }
        if seen.contains(&id) {
            diagnostics.push(format!("DIGLOT_MAP:: Duplicate S-ID line for segment: {}", id));
        }

        if !entries.trim().is_empty() {
            check_entries(&id, entries, diagnostics);
        }
        seen.insert(id);
    }

    for expected in segments.unique() {
        if !seen.contains(expected) {
            diagnostics.push(format!(
                "DIGLOT_MAP:: Missing S-ID line for segment defined in SimS_Segments: {}",
                expected
            ));
        }
    }
}

/// Check the `|`-separated entries of one segment line.
fn check_entries(id: &str, entries: &str, diagnostics: &mut Diagnostics) {
    for part in entries.split('|').map(str::trim) {
        if part.is_empty() {
            diagnostics.push(format!(
                "DIGLOT_MAP:: S-ID {}, found empty entry part (likely due to '||' or trailing/leading '|'). Full entry string: '{}'",
                id, entries
            ));
            continue;
        }

        let shown = preview(part, 30);
        let caps = match DIGLOT_ENTRY.captures(part) {
            Some(caps) => caps,
            None => {
                diagnostics.push(format!(
                    "DIGLOT_MAP:: S-ID {}, entry '{}...' malformed (failed basic regex).",
                    id, shown
                ));
                continue;
            }
        };

        for (group, field) in [(1, "EngWord"), (2, "SpaLemma"), (3, "ExactSpaForm")] {
            if caps[group].trim().is_empty() {
                diagnostics.push(format!(
                    "DIGLOT_MAP:: S-ID {}, entry '{}...' has empty {}.",
                    id, shown, field
                ));
            }
        }

        let flag = &caps[4];
        if flag != "Y" && flag != "N" {
            diagnostics.push(format!(
                "DIGLOT_MAP:: S-ID {}, entry '{}...' has invalid ViabilityFlag character: '{}'. Expected Y or N.",
                id, shown, flag
            ));
        }
    }
}
