//! Lexical scanning: locating the bracketed body and top-level splitting.
//!
//! Both routines share one scan discipline: a backslash skips the next
//! character, an unescaped `"` toggles quote state, and `<` / `>` adjust
//! nesting depth only outside quotes. Nothing inside quotes or nested
//! brackets is ever structurally significant.

use crate::{Error, Result};

/// Extracts the outermost `<`…`>` region of `text`, brackets included.
///
/// Text before the opening bracket and after its matching closing bracket
/// is discarded. Newlines, tabs, and carriage returns are removed from the
/// extracted region wholesale; escaped forms (`\n`, `\t`, `\r`) inside
/// quoted strings are two-character sequences and pass through untouched.
///
/// # Errors
///
/// Returns a syntax error when the input contains no balanced bracket pair.
///
/// # Examples
///
/// ```rust
/// use collex::lex::locate_body;
///
/// let body = locate_body("garbage <a: 1;> trailing").unwrap();
/// assert_eq!(body, "<a: 1;>");
/// assert!(locate_body("no brackets").is_err());
/// ```
pub fn locate_body(text: &str) -> Result<String> {
    let mut depth: i64 = 0;
    let mut quote = false;
    let mut start = None;
    let mut end = None;
    let mut chars = text.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' => quote = !quote,
            '<' if !quote => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '>' if !quote => {
                depth -= 1;
                if depth == 0 && start.is_some() {
                    end = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }
    match (start, end) {
        (Some(f), Some(t)) => Ok(text[f..=t]
            .chars()
            .filter(|c| !matches!(c, '\n' | '\t' | '\r'))
            .collect()),
        _ => Err(Error::syntax(
            "missing collection: a document must start with '<' and end with '>'",
        )),
    }
}

/// Splits `text` at every unescaped `delimiter` outside quotes and nested
/// brackets.
///
/// Segments keep their original order and are returned un-trimmed.
/// Trailing empty segments are dropped, so a trailing delimiter is
/// tolerated; empty segments in the interior are preserved and left for
/// the caller to reject.
///
/// # Examples
///
/// ```rust
/// use collex::lex::split_top;
///
/// let parts = split_top(r#"a, <b, c>, "d, e""#, ',');
/// assert_eq!(parts, vec!["a", " <b, c>", r#" "d, e""#]);
/// ```
pub fn split_top(text: &str, delimiter: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: i64 = 0;
    let mut quote = false;
    let mut seg_start = 0;
    let mut chars = text.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == '"' {
            quote = !quote;
        } else if c == '<' && !quote {
            depth += 1;
        } else if c == '>' && !quote {
            depth -= 1;
        } else if c == delimiter && !quote && depth == 0 {
            parts.push(&text[seg_start..i]);
            seg_start = i + c.len_utf8();
        }
    }
    parts.push(&text[seg_start..]);
    while parts.last().is_some_and(|s| s.is_empty()) {
        parts.pop();
    }
    parts
}

/// Whether `key` is a valid item-set key: non-empty, letters, underscores,
/// hyphens, and spaces only.
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphabetic() || matches!(c, '_' | '-' | ' '))
}
