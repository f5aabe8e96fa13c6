//! Backslash escaping for quoted strings and opaque payloads.
//!
//! The recognized escape set is fixed: `\n`, `\\`, `\r`, `\"`, `\b`, `\t`,
//! and `\f`. Anything else after a backslash is a syntax error when
//! unescaping.

use crate::{Error, Result};

/// Converts raw text to its escaped form, ready to sit between quotes.
///
/// # Examples
///
/// ```rust
/// use collex::text::escape;
///
/// assert_eq!(escape("line\nbreak"), "line\\nbreak");
/// assert_eq!(escape(r#"say "hi""#), r#"say \"hi\""#);
/// ```
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '"' => out.push_str("\\\""),
            '\u{0008}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\u{000C}' => out.push_str("\\f"),
            _ => out.push(c),
        }
    }
    out
}

/// Converts escaped text back to its raw form.
///
/// # Errors
///
/// Returns a syntax error if a backslash ends the input or introduces a
/// character outside the recognized escape set.
///
/// # Examples
///
/// ```rust
/// use collex::text::unescape;
///
/// assert_eq!(unescape("line\\nbreak").unwrap(), "line\nbreak");
/// assert!(unescape("dangling\\").is_err());
/// assert!(unescape("\\q").is_err());
/// ```
pub fn unescape(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('b') => out.push('\u{0008}'),
            Some('t') => out.push('\t'),
            Some('f') => out.push('\u{000C}'),
            Some(other) => {
                return Err(Error::syntax(format!(
                    "invalid backslash escape '\\{other}' in {text:?}"
                )))
            }
            None => {
                return Err(Error::syntax(format!(
                    "invalid backslash escape: {text:?} ends with a bare backslash"
                )))
            }
        }
    }
    Ok(out)
}
