//! Logical line lexer (RFC 5545 §3.1).
//!
//! Splits raw text into logical lines, merging folded continuations. No
//! escaping is interpreted at this stage.

/// Splits input into logical lines, merging folded continuations.
///
/// Handles both CRLF and bare LF line endings. A physical line starting with
/// SP/HTAB is a continuation: the single leading whitespace character is
/// stripped and the remainder appended to the previous logical line
/// (RFC 5545 §3.1 unfolding, no space inserted).
#[must_use]
pub fn logical_lines(input: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for raw_line in input.lines() {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        if line.is_empty() {
            continue;
        }

        if line.starts_with([' ', '\t'])
            && let Some(prev) = lines.last_mut()
        {
            // Continuation: drop exactly one whitespace character.
            prev.push_str(&line[1..]);
        } else {
            // A continuation with nothing before it keeps its whitespace;
            // the line then parses under a space-prefixed name or is
            // skipped downstream.
            lines.push(line.to_string());
        }
    }

    lines
}
