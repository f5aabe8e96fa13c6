//! # collex
//!
//! A parser and serializer for the Collex collection notation: a compact
//! textual data-interchange format built around named, unordered,
//! multi-valued keys with typed values.
//!
//! ## The notation
//!
//! A document is a `<`…`>` region containing `;`-terminated statements of
//! the form `key: v1, v2, …`. Text outside the brackets is ignored, as are
//! newlines and tabs outside quoted strings:
//!
//! ```text
//! <
//!   name: "Ann";
//!   age: 30;
//!   tags: "reader", "writer";
//!   profile: <joined: 2024-01-15T10:30:00+0000;>;
//! >
//! ```
//!
//! Value kinds and their literal forms:
//!
//! | Kind | Literal |
//! |------|---------|
//! | Text | `"quoted"` with backslash escapes |
//! | Int32 / Int64 | decimal digits, narrowest lossless width |
//! | Float64 | decimal fraction, only when the double is exact |
//! | Decimal | any numeral too precise or too large for the above |
//! | Boolean | `true` / `false` (case-insensitive on input) |
//! | Timestamp | `2024-01-15T10:30:00+0000` |
//! | Collection | a nested `<`…`>` document |
//! | Opaque | `i["…"]`, payload text produced by a pluggable codec |
//!
//! ## Key Features
//!
//! - **Lazy materialization**: parsing stores raw value-list text per key;
//!   the typed values are decoded and cached on first access
//! - **Precision-aware numbers**: integers narrow to 32 bits when they fit,
//!   fractions become doubles only when the conversion is lossless, and
//!   everything else is an arbitrary-precision decimal
//! - **Pluggable opaque codec**: host-serialized blobs pass through an
//!   injected [`OpaqueCodec`], base64 by default
//! - **Serde interop**: [`Document`] and [`Value`] implement `Serialize`
//!   and `Deserialize` for conversion to and from other formats
//! - **No unsafe code**
//!
//! ## Quick Start
//!
//! ```rust
//! use collex::{from_str, Value};
//!
//! let mut doc = from_str(r#"<name: "Ann"; age: 30; tags: "x", "y";>"#).unwrap();
//!
//! assert_eq!(doc.strings("name").unwrap(), vec!["Ann"]);
//! assert_eq!(doc.ints("age").unwrap(), vec![30]);
//! assert_eq!(doc.strings("tags").unwrap(), vec!["x", "y"]);
//!
//! doc.put_one("active", Value::from(true)).unwrap();
//! let inline = doc.render(0).unwrap();
//! let pretty = doc.render(2).unwrap();
//! assert!(pretty.contains('\n') && !inline.contains('\n'));
//! ```
//!
//! ## Building documents programmatically
//!
//! ```rust
//! use collex::collection;
//!
//! let mut doc = collection! {
//!     "name" => "Ann",
//!     "scores" => [90, 85, 99],
//! };
//! assert_eq!(doc.ints("scores").unwrap(), vec![90, 85, 99]);
//! ```

#![forbid(unsafe_code)]

pub mod codec;
pub mod document;
pub mod error;
pub mod lex;
pub mod macros;
pub mod number;
pub mod opaque;
pub mod text;
pub mod value;

pub use codec::TIMESTAMP_FORMAT;
pub use document::{Document, MAX_NESTING_DEPTH};
pub use error::{Error, Result};
pub use opaque::{Base64Codec, CodecError, OpaqueCodec};
pub use value::Value;

use std::io;
use std::sync::Arc;

/// Parses a document from a string of collection notation.
///
/// Equivalent to [`Document::parse`]; use
/// [`Document::parse_with_codec`] to inject an opaque codec.
///
/// # Errors
///
/// Returns a syntax error when the text holds no balanced `<`…`>` pair or
/// a statement has a missing, invalid, or duplicate key. Value-level
/// errors are deferred to first access of the affected key.
///
/// # Examples
///
/// ```rust
/// use collex::from_str;
///
/// let mut doc = from_str("<count: 3;>").unwrap();
/// assert_eq!(doc.ints("count").unwrap(), vec![3]);
/// ```
pub fn from_str(text: &str) -> Result<Document> {
    Document::parse(text)
}

/// Parses a document from any [`io::Read`] source.
///
/// # Errors
///
/// Returns [`Error::Io`] when reading fails, otherwise as [`from_str`].
///
/// # Examples
///
/// ```rust
/// use collex::from_reader;
/// use std::io::Cursor;
///
/// let mut doc = from_reader(Cursor::new(b"<a: 1;>")).unwrap();
/// assert_eq!(doc.ints("a").unwrap(), vec![1]);
/// ```
pub fn from_reader<R: io::Read>(mut reader: R) -> Result<Document> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| Error::io(e.to_string()))?;
    from_str(&text)
}

/// Parses a document from any [`io::Read`] source with an injected opaque
/// codec.
pub fn from_reader_with_codec<R: io::Read>(
    mut reader: R,
    codec: Arc<dyn OpaqueCodec>,
) -> Result<Document> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| Error::io(e.to_string()))?;
    Document::parse_with_codec(&text, codec)
}
