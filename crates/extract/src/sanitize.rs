//! Text sanitization for the serialization boundary.
//!
//! The contract, applied both to raw extraction input and to every file body
//! after parsing:
//!
//! - `\r\n` and bare `\r` normalize to `\n`
//! - BOM (U+FEFF) and zero-width space (U+200B) are removed
//! - NBSP (U+00A0) and narrow NBSP (U+202F) become plain spaces
//! - remaining C0 control characters other than `\n` and `\t` become spaces
//! - every other character passes through unchanged
//!
//! Nothing here re-escapes quotes or backslashes: serde_json owns JSON
//! escaping, and double-escaping is exactly the corruption this boundary
//! exists to prevent.

/// Apply the sanitization contract to a string.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\u{FEFF}' | '\u{200B}' => {}
            '\u{00A0}' | '\u{202F}' => out.push(' '),
            '\n' | '\t' => out.push(c),
            c if c.is_control() && (c as u32) < 0x20 => out.push(' '),
            _ => out.push(c),
        }
    }

    out
}
