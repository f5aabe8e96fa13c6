//! The value codec: one lexical segment to one typed [`Value`] and back.
//!
//! Decoding dispatches in a strict priority order: quoted text, numeric
//! literal, boolean, opaque object, timestamp, nested collection. A segment
//! matching none of these is a syntax error naming the segment, key, and
//! element index. The order matters at the tail: timestamp-shaped text is
//! never reinterpreted as a nested document, and anything that is neither a
//! valid timestamp nor a parseable document fails outright.

use crate::number::{classify, NumericKind};
use crate::opaque::OpaqueCodec;
use crate::{text, Document, Error, Result, Value};
use chrono::DateTime;
use std::sync::Arc;

/// The fixed timestamp pattern, equivalent to `yyyy-MM-ddTHH:mm:ssZ`
/// (ISO-8601 with an RFC 822 numeric zone, e.g. `2024-01-15T10:30:00+0000`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

pub(crate) type SharedCodec = Arc<dyn OpaqueCodec>;

/// Attaches key/index context to errors raised below the item-set level.
fn at(err: Error, key: &str, index: usize) -> Error {
    match err {
        Error::Syntax { msg, key: None, .. } => Error::syntax_at(msg, key, index),
        other => other,
    }
}

/// Materializes one trimmed lexical segment into a typed value.
pub(crate) fn decode(segment: &str, key: &str, index: usize, codec: &SharedCodec) -> Result<Value> {
    let segment = segment.trim();

    if segment.len() >= 2 && segment.starts_with('"') && segment.ends_with('"') {
        let inner = &segment[1..segment.len() - 1];
        return Ok(Value::Text(
            text::unescape(inner).map_err(|e| at(e, key, index))?,
        ));
    }
    if let Some(num) = classify(segment) {
        return Ok(match num {
            NumericKind::Int32(i) => Value::Int32(i),
            NumericKind::Int64(i) => Value::Int64(i),
            NumericKind::Float64(f) => Value::Float64(f),
            NumericKind::Decimal(d) => Value::Decimal(d),
        });
    }
    if segment.eq_ignore_ascii_case("true") {
        return Ok(Value::Bool(true));
    }
    if segment.eq_ignore_ascii_case("false") {
        return Ok(Value::Bool(false));
    }
    if let Some(inner) = segment
        .strip_prefix("i[\"")
        .and_then(|rest| rest.strip_suffix("\"]"))
    {
        let encoded = text::unescape(inner).map_err(|e| at(e, key, index))?;
        let bytes = codec
            .from_text(&encoded)
            .map_err(|e| Error::object(format!("cannot decode object: {e}"), key))?;
        return Ok(Value::Opaque(bytes));
    }
    if let Ok(ts) = DateTime::parse_from_str(segment, TIMESTAMP_FORMAT) {
        return Ok(Value::Timestamp(ts));
    }
    if let Ok(doc) = Document::parse_with_codec(segment, Arc::clone(codec)) {
        return Ok(Value::Collection(doc));
    }
    Err(Error::syntax_at(
        format!("unrecognized value: {segment:?} cannot be interpreted"),
        key,
        index,
    ))
}

/// Renders a value back to its lexical form.
///
/// Takes `&mut` because rendering a nested collection materializes its raw
/// entries. `indent` is the per-level indentation width used for nested
/// collections; 0 renders fully inline.
pub(crate) fn encode(
    value: &mut Value,
    key: &str,
    indent: usize,
    depth: usize,
    codec: &SharedCodec,
) -> Result<String> {
    match value {
        Value::Text(s) => Ok(format!("\"{}\"", text::escape(s))),
        Value::Int32(i) => Ok(i.to_string()),
        Value::Int64(i) => Ok(i.to_string()),
        Value::Float64(f) => Ok(encode_f64(*f)),
        Value::Decimal(d) => Ok(d.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Timestamp(t) => Ok(t.format(TIMESTAMP_FORMAT).to_string()),
        Value::Collection(doc) => {
            let rendered = doc.render_at(indent, depth + 1)?;
            if indent > 0 {
                // Shift the nested block right by one level so its closing
                // bracket lines up with the parent entry.
                let pad = format!("\n{}", " ".repeat(indent));
                Ok(rendered.replace('\n', &pad))
            } else {
                Ok(rendered)
            }
        }
        Value::Opaque(bytes) => {
            let encoded = codec
                .to_text(bytes)
                .map_err(|e| Error::object(format!("cannot encode object: {e}"), key))?;
            Ok(format!("i[\"{}\"]", text::escape(&encoded)))
        }
    }
}

/// Shortest round-trip rendering; whole values keep a trailing `.0` so the
/// kind survives re-parsing.
fn encode_f64(f: f64) -> String {
    let s = f.to_string();
    if !f.is_finite() || s.contains('.') || s.contains('e') || s.contains('E') {
        s
    } else {
        format!("{s}.0")
    }
}
