//! Section content extraction.
//!
//! A section runs from its marker line up to the next line that starts with
//! any known marker, or to the end of the block. The extractor knows nothing
//! about what a section means; every check reuses it.

/// Content lines of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionContent {
    /// Trimmed, non-empty content lines in block order. Text trailing the
    /// marker on its own line comes first.
    pub lines: Vec<String>,

    /// 0-based index of the marker line within the block.
    pub marker_line: usize,
}

impl SectionContent {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

/// Split a block into lines using universal-newline rules.
///
/// `\n`, `\r\n`, `\r` and the Unicode line boundaries all end a line. A
/// terminator at the very end does not produce a trailing empty line.
pub fn split_block_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        let is_break = matches!(
            c,
            '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
        );
        if !is_break {
            continue;
        }

        lines.push(&text[start..idx]);
        let mut next_start = idx + c.len_utf8();
        if c == '\r' {
            if let Some(&(lf_idx, '\n')) = chars.peek() {
                chars.next();
                next_start = lf_idx + 1;
            }
        }
        start = next_start;
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }

    lines
}

/// Whether the trimmed line opens any of `markers`.
pub(crate) fn starts_with_any(line: &str, markers: &[String]) -> bool {
    let trimmed = line.trim();
    markers.iter().any(|m| trimmed.starts_with(m.as_str()))
}

/// Extract the content of the first section opened by `marker`.
///
/// Returns `None` when no line starts with `marker`.
pub fn extract_section(lines: &[&str], marker: &str, all_markers: &[String]) -> Option<SectionContent> {
    let marker_line = lines.iter().position(|line| line.trim().starts_with(marker))?;

    let end = lines
        .iter()
        .enumerate()
        .skip(marker_line + 1)
        .find(|(_, line)| starts_with_any(line, all_markers))
        .map(|(i, _)| i)
        .unwrap_or(lines.len());

    let mut content = Vec::new();

    let inline = lines[marker_line].trim()[marker.len()..].trim();
    if !inline.is_empty() {
        content.push(inline.to_string());
    }

    content.extend(
        lines[marker_line + 1..end]
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(str::to_string),
    );

    Some(SectionContent {
        lines: content,
        marker_line,
    })
}
