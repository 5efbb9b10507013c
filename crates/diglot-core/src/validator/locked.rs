//! Phase 7: `LOCKED_PHRASE::`, a whitespace-separated list of segment IDs
//! on the marker line.

use crate::patterns::is_segment_id;
use crate::report::Diagnostics;

use super::{m, SegmentIds, Sections};

pub(super) fn check_locked_phrase(
    sections: &Sections<'_>,
    segments: &SegmentIds,
    diagnostics: &mut Diagnostics,
) {
    let section = match sections.extract(m::LOCKED_PHRASE) {
        Some(section) => section,
        None => {
            diagnostics.push("LOCKED_PHRASE:: marker found but content extraction failed.");
            return;
        }
    };

    if section.len() > 1 {
        diagnostics.push("LOCKED_PHRASE:: section has multiple content lines; expected one.");
        return;
    }

    let Some(first) = section.lines.first() else {
        return;
    };

    for token in first.split_whitespace() {
        if !is_segment_id(token) {
            diagnostics.push(format!(
                "LOCKED_PHRASE:: Contains non-S<n> formatted ID: '{}'",
                token
            ));
        } else if !segments.contains(token) {
            diagnostics.push(format!("LOCKED_PHRASE:: Uses unknown segment ID: {}", token));
        }
    }
}
