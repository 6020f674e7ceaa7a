//! Line-break normalization.
//!
//! Records may wrap across physical lines in the source; collapsing every
//! line break to a space lets the extraction pattern ignore line structure.

/// Replaces each `\r\n`, `\n` or `\r` with a single space.
pub fn normalize_line_breaks(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push(' ');
            }
            '\n' => out.push(' '),
            other => out.push(other),
        }
    }
    out
}
