//! Shared line patterns for the sentence block format.
//!
//! The validator and the parser both match section content against these,
//! so the two can never disagree about what a well-formed line looks like.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // =========================================================================
    // SEGMENT-KEYED LINE PATTERNS
    // =========================================================================

    /// `S<n>(<text>)` in SimS_Segments
    pub static ref SEGMENT_LINE: Regex = Regex::new(
        r"^(S\d+)\((.*)\)$"
    ).unwrap();

    /// `S<n> ~ <span> ~ <span>` in PHRASE_ALIGN
    pub static ref PHRASE_ALIGN_LINE: Regex = Regex::new(
        r"^(S\d+)\s*~\s*(.*?)\s*~\s*(.*)$"
    ).unwrap();

    /// `S<n> :: <rest>` header shared by SimSL and DIGLOT_MAP
    pub static ref SEGMENT_HEADER_LINE: Regex = Regex::new(
        r"^(S\d+)\s*::\s*(.*)$"
    ).unwrap();

    // =========================================================================
    // ENTRY / TOKEN PATTERNS
    // =========================================================================

    /// `EngWord->SpaLemma(ExactSpaForm)(V)` inside a DIGLOT_MAP line
    pub static ref DIGLOT_ENTRY: Regex = Regex::new(
        r"^(.*?)->(.*?)\((.*?)\)\s*\(([A-Za-z])\)$"
    ).unwrap();

    /// A bare segment ID token, as listed in LOCKED_PHRASE
    pub static ref SEGMENT_ID: Regex = Regex::new(
        r"^S\d+$"
    ).unwrap();
}

/// Check if a token is a well-formed segment ID (`S<n>`).
pub fn is_segment_id(token: &str) -> bool {
    SEGMENT_ID.is_match(token)
}

/// First `max_chars` characters of `text`, for diagnostics.
pub fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
