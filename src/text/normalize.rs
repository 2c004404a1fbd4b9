//! Whitespace normalization for captured text

/// Horizontal whitespace that should collapse to a single space.
fn is_inline_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0C' | '\x0B')
}

/// Collapse arbitrary line-wrapped text into a single clean line.
///
/// Text copied from documents or PDFs commonly carries hard line wraps that
/// would otherwise become spoken pauses. All line-break variants (`\n`,
/// `\r\n`, `\r`) are treated as line separators; each line is trimmed, empty
/// lines are dropped, and the remaining lines are joined with single spaces.
/// Runs of horizontal whitespace inside a line collapse to one space.
///
/// Any input yields a (possibly empty) string; empty output means there is
/// nothing to speak.
pub fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());

    for line in raw.split(['\r', '\n']) {
        let line = line.trim_matches(is_inline_space);
        if line.is_empty() {
            continue;
        }

        if !out.is_empty() {
            out.push(' ');
        }

        let mut pending_space = false;
        for c in line.chars() {
            if is_inline_space(c) {
                pending_space = true;
            } else {
                if pending_space {
                    out.push(' ');
                    pending_space = false;
                }
                out.push(c);
            }
        }
    }

    out
}
