//! The collection store: a key-to-multivalue document with lazy
//! materialization.
//!
//! A [`Document`] maps validated keys to item sets. Each key is in one of
//! three states: absent, raw (the unparsed value-list text captured at
//! parse time), or materialized (a cached `Vec<Value>`). The first read of
//! a key splits its raw text, decodes every segment, caches the result,
//! and discards the raw entry; materialized entries are never re-parsed.
//!
//! ## Examples
//!
//! ```rust
//! use collex::{from_str, Value};
//!
//! let mut doc = from_str(r#"<name: "Ann"; age: 30; tags: "x", "y";>"#).unwrap();
//! assert_eq!(doc.values("name").unwrap(), &[Value::Text("Ann".into())]);
//! assert_eq!(doc.ints("age").unwrap(), vec![30]);
//! assert_eq!(doc.strings("tags").unwrap(), vec!["x", "y"]);
//! assert!(doc.values("missing").unwrap().is_empty());
//!
//! doc.put_one("active", Value::from(true)).unwrap();
//! let text = doc.render(0).unwrap();
//! assert!(text.starts_with('<') && text.ends_with('>'));
//! ```

use crate::codec::{self, SharedCodec};
use crate::opaque::{Base64Codec, OpaqueCodec};
use crate::{lex, Error, Result, Value};
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Maximum collection nesting depth accepted when rendering or walking a
/// document tree. Deeper trees fail with a syntax error instead of
/// overflowing the stack.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Per-key storage state: raw value-list text until first access, then a
/// materialized value array. Absence of a key is absence from the map.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Entry {
    Raw(String),
    Parsed(Vec<Value>),
}

/// A parsed or programmatically built collection document.
///
/// Keys are unique and case-sensitive; each maps to an ordered, non-empty
/// item set. Operations that may materialize a raw entry take `&mut self`,
/// which also rules out concurrent mutation at compile time.
#[derive(Clone)]
pub struct Document {
    entries: IndexMap<String, Entry>,
    codec: SharedCodec,
}

impl Document {
    /// Creates an empty document with the default base64 opaque codec.
    #[must_use]
    pub fn new() -> Self {
        Self::with_codec(Arc::new(Base64Codec))
    }

    /// Creates an empty document using `codec` for opaque values.
    #[must_use]
    pub fn with_codec(codec: Arc<dyn OpaqueCodec>) -> Self {
        Document {
            entries: IndexMap::new(),
            codec,
        }
    }

    /// Parses a document from text using the default base64 opaque codec.
    ///
    /// The scanner locates the outermost `<`…`>` region; everything around
    /// it is ignored. Statements are split on `;`, keys validated, and
    /// value lists stored raw until first access.
    ///
    /// # Errors
    ///
    /// Syntax error when no balanced bracket pair exists, a statement lacks
    /// a `:` separator, or a key is invalid or duplicated. Value-level
    /// errors surface later, on first access of the affected key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collex::{Document, Error};
    ///
    /// let doc = Document::parse("<a: 1; b: 2;>").unwrap();
    /// assert_eq!(doc.len(), 2);
    ///
    /// let dup = Document::parse("<a: 1; a: 2;>");
    /// assert!(matches!(dup, Err(Error::Syntax { .. })));
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with_codec(text, Arc::new(Base64Codec))
    }

    /// Parses a document from text with an injected opaque codec.
    ///
    /// Nested documents parsed out of this one inherit the codec.
    pub fn parse_with_codec(text: &str, codec: Arc<dyn OpaqueCodec>) -> Result<Self> {
        let body = lex::locate_body(text)?;
        let inner = &body[1..body.len() - 1];
        let mut entries = IndexMap::new();
        for statement in lex::split_top(inner, ';') {
            if statement.trim().is_empty() {
                continue;
            }
            let Some((raw_key, raw_values)) = statement.split_once(':') else {
                return Err(Error::syntax(format!(
                    "missing ':' separator in statement {statement:?}"
                )));
            };
            let key = raw_key.trim();
            if !lex::is_valid_key(key) {
                return Err(Error::syntax_for("invalid key", key));
            }
            if entries.contains_key(key) {
                return Err(Error::syntax_for(
                    "an item set with this key already exists",
                    key,
                ));
            }
            entries.insert(key.to_string(), Entry::Raw(raw_values.trim().to_string()));
        }
        Ok(Document { entries, codec })
    }

    /// Whether the document contains an item set with the given key, in
    /// either tier.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over all keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The number of item sets in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the document holds no item sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the item set for `key`, materializing it on first access.
    ///
    /// An absent key yields an empty slice, not an error. Repeated calls
    /// return the cached values without re-parsing.
    ///
    /// # Errors
    ///
    /// Propagates decode errors from a raw entry: unrecognized literals,
    /// malformed escapes, empty value lists, or opaque codec failures.
    pub fn values(&mut self, key: &str) -> Result<&[Value]> {
        if !self.entries.contains_key(key) {
            return Ok(&[]);
        }
        self.promote(key)?;
        match self.entries.get(key) {
            Some(Entry::Parsed(values)) => Ok(values),
            _ => Ok(&[]),
        }
    }

    /// Returns the first value of the item set for `key`, or `None` when
    /// the key is absent.
    pub fn first(&mut self, key: &str) -> Result<Option<&Value>> {
        Ok(self.values(key)?.first())
    }

    /// Adds or overwrites the item set for `key`.
    ///
    /// The write lands directly in the materialized tier, discarding any
    /// raw entry for the key.
    ///
    /// # Errors
    ///
    /// Syntax error when the key is invalid or `values` is empty.
    pub fn put(&mut self, key: &str, values: Vec<Value>) -> Result<&mut Self> {
        check_key(key)?;
        if values.is_empty() {
            return Err(Error::syntax_for("an item set cannot be empty", key));
        }
        self.entries.insert(key.to_string(), Entry::Parsed(values));
        Ok(self)
    }

    /// Adds or overwrites the item set for `key` with a single value.
    pub fn put_one(&mut self, key: &str, value: Value) -> Result<&mut Self> {
        self.put(key, vec![value])
    }

    /// Appends a value to the item set for `key`, creating the set when the
    /// key is new. An existing raw entry is materialized first.
    pub fn append(&mut self, key: &str, value: Value) -> Result<&mut Self> {
        if self.entries.contains_key(key) {
            self.promote(key)?;
            if let Some(Entry::Parsed(values)) = self.entries.get_mut(key) {
                values.push(value);
            }
        } else {
            check_key(key)?;
            self.entries.insert(key.to_string(), Entry::Parsed(vec![value]));
        }
        Ok(self)
    }

    /// Removes the item set for `key` from either tier. Absent keys are
    /// ignored.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.entries.shift_remove(key);
        self
    }

    /// Removes one value from the item set for `key`, collapsing the key to
    /// absent when the set would become empty. Absent keys are ignored.
    ///
    /// # Errors
    ///
    /// [`Error::Bounds`] when `index` is past the end of the set; decode
    /// errors when materializing a raw entry.
    pub fn remove_at(&mut self, key: &str, index: usize) -> Result<&mut Self> {
        if !self.entries.contains_key(key) {
            return Ok(self);
        }
        self.promote(key)?;
        let Some(Entry::Parsed(values)) = self.entries.get_mut(key) else {
            return Ok(self);
        };
        if index >= values.len() {
            return Err(Error::bounds(key, index, values.len()));
        }
        values.remove(index);
        if values.is_empty() {
            self.entries.shift_remove(key);
        }
        Ok(self)
    }

    /// Force-materializes every raw entry, recursing into nested
    /// collections.
    ///
    /// Useful before comparing documents or handing one to the serde layer,
    /// which cannot materialize through `&self`.
    ///
    /// # Errors
    ///
    /// Decode errors from any entry, or a syntax error when nesting exceeds
    /// [`MAX_NESTING_DEPTH`].
    pub fn materialize(&mut self) -> Result<()> {
        self.materialize_at(0)
    }

    fn materialize_at(&mut self, depth: usize) -> Result<()> {
        if depth > MAX_NESTING_DEPTH {
            return Err(Error::syntax(format!(
                "collection nesting deeper than {MAX_NESTING_DEPTH} levels"
            )));
        }
        let raw_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| matches!(entry, Entry::Raw(_)))
            .map(|(key, _)| key.clone())
            .collect();
        for key in raw_keys {
            self.promote(&key)?;
        }
        for entry in self.entries.values_mut() {
            if let Entry::Parsed(values) = entry {
                for value in values.iter_mut() {
                    if let Value::Collection(doc) = value {
                        doc.materialize_at(depth + 1)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Renders the document to text.
    ///
    /// `indent == 0` yields a fully inline form; `indent > 0` pretty-prints
    /// with that many spaces per nesting level, re-indenting nested
    /// collections recursively. Rendering materializes every entry first.
    ///
    /// # Errors
    ///
    /// Decode errors from materialization, opaque codec failures, or a
    /// syntax error when nesting exceeds [`MAX_NESTING_DEPTH`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collex::Document;
    ///
    /// let mut doc = Document::parse("<a: 1; b: 2;>").unwrap();
    /// assert_eq!(doc.render(0).unwrap(), "<a: 1; b: 2;>");
    /// assert_eq!(doc.render(2).unwrap(), "<\n  a: 1;\n  b: 2;\n>");
    /// ```
    pub fn render(&mut self, indent: usize) -> Result<String> {
        self.render_at(indent, 0)
    }

    pub(crate) fn render_at(&mut self, indent: usize, depth: usize) -> Result<String> {
        if depth > MAX_NESTING_DEPTH {
            return Err(Error::syntax(format!(
                "collection nesting deeper than {MAX_NESTING_DEPTH} levels"
            )));
        }
        self.materialize_at(depth)?;
        let shared = Arc::clone(&self.codec);
        let mut statements = Vec::with_capacity(self.entries.len());
        for (key, entry) in self.entries.iter_mut() {
            if let Entry::Parsed(values) = entry {
                let mut parts = Vec::with_capacity(values.len());
                for value in values.iter_mut() {
                    parts.push(codec::encode(value, key, indent, depth, &shared)?);
                }
                statements.push(format!("{key}: {};", parts.join(", ")));
            }
        }
        if indent == 0 {
            return Ok(format!("<{}>", statements.join(" ")));
        }
        let sep = format!("\n{}", " ".repeat(indent));
        if statements.is_empty() {
            return Ok(format!("<{sep}>"));
        }
        // The closing bracket drops back to the parent level.
        Ok(format!("<{sep}{}\n>", statements.join(&sep)))
    }

    /// Materializes a single raw entry in place. No-op for materialized or
    /// absent keys.
    fn promote(&mut self, key: &str) -> Result<()> {
        let Some(Entry::Raw(raw)) = self.entries.get(key) else {
            return Ok(());
        };
        let raw = raw.clone();
        let segments = lex::split_top(&raw, ',');
        if segments.is_empty() {
            return Err(Error::syntax_for("an item set cannot be empty", key));
        }
        let mut values = Vec::with_capacity(segments.len());
        for (index, segment) in segments.iter().enumerate() {
            values.push(codec::decode(segment, key, index, &self.codec)?);
        }
        self.entries.insert(key.to_string(), Entry::Parsed(values));
        Ok(())
    }

    /// Kind-checked accessor core: maps every value of the set through
    /// `extract`, failing fast on the first kind mismatch.
    fn typed<T>(
        &mut self,
        key: &str,
        expected: &'static str,
        extract: impl Fn(&Value) -> Option<T>,
    ) -> Result<Vec<T>> {
        let values = self.values(key)?;
        values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                extract(value).ok_or_else(|| {
                    Error::kind_mismatch(key, index, expected, value.kind())
                })
            })
            .collect()
    }

    /// The item set for `key` as strings. Empty on an absent key.
    pub fn strings(&mut self, key: &str) -> Result<Vec<String>> {
        self.typed(key, "text", |v| v.as_str().map(str::to_string))
    }

    /// The item set for `key` as 32-bit integers.
    pub fn ints(&mut self, key: &str) -> Result<Vec<i32>> {
        self.typed(key, "int32", Value::as_i32)
    }

    /// The item set for `key` as 64-bit integers. `Int32` values widen
    /// losslessly.
    pub fn longs(&mut self, key: &str) -> Result<Vec<i64>> {
        self.typed(key, "int64", Value::as_i64)
    }

    /// The item set for `key` as doubles.
    pub fn floats(&mut self, key: &str) -> Result<Vec<f64>> {
        self.typed(key, "float64", Value::as_f64)
    }

    /// The item set for `key` as arbitrary-precision decimals.
    pub fn decimals(&mut self, key: &str) -> Result<Vec<BigDecimal>> {
        self.typed(key, "decimal", |v| v.as_decimal().cloned())
    }

    /// The item set for `key` as booleans.
    pub fn booleans(&mut self, key: &str) -> Result<Vec<bool>> {
        self.typed(key, "boolean", Value::as_bool)
    }

    /// The item set for `key` as timestamps.
    pub fn timestamps(&mut self, key: &str) -> Result<Vec<DateTime<FixedOffset>>> {
        self.typed(key, "timestamp", |v| v.as_timestamp().copied())
    }

    /// The item set for `key` as nested documents.
    pub fn collections(&mut self, key: &str) -> Result<Vec<Document>> {
        self.typed(key, "collection", |v| v.as_collection().cloned())
    }

    /// The item set for `key` as opaque byte payloads.
    pub fn opaques(&mut self, key: &str) -> Result<Vec<Vec<u8>>> {
        self.typed(key, "opaque", |v| v.as_opaque().map(<[u8]>::to_vec))
    }
}

fn check_key(key: &str) -> Result<()> {
    if lex::is_valid_key(key) {
        Ok(())
    } else {
        Err(Error::syntax_for("invalid key", key))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("entries", &self.entries)
            .finish()
    }
}

/// Equality compares entries only; the injected codec is not part of a
/// document's value. Raw and materialized entries for the same content
/// compare unequal — call [`Document::materialize`] on both sides first
/// when comparing across the lazy boundary.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            match entry {
                Entry::Parsed(values) if values.len() == 1 => {
                    map.serialize_entry(key, &values[0])?;
                }
                Entry::Parsed(values) => map.serialize_entry(key, values)?,
                Entry::Raw(_) => {
                    return Err(serde::ser::Error::custom(format!(
                        "key \"{key}\" is not materialized; call materialize() before serializing"
                    )))
                }
            }
        }
        map.end()
    }
}

/// One item set on the serde side: a sequence maps to a multi-valued set,
/// anything else to a single-valued one.
struct SetOrValue(Vec<Value>);

impl<'de> Deserialize<'de> for SetOrValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = SetOrValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a value or a non-empty sequence of values")
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<SetOrValue, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut values = Vec::new();
                while let Some(value) = seq.next_element::<Value>()? {
                    values.push(value);
                }
                if values.is_empty() {
                    return Err(de::Error::custom("an item set cannot be empty"));
                }
                Ok(SetOrValue(values))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<SetOrValue, E> {
                crate::value::ValueVisitor.visit_bool(v).map(single)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<SetOrValue, E> {
                crate::value::ValueVisitor.visit_i64(v).map(single)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<SetOrValue, E> {
                crate::value::ValueVisitor.visit_u64(v).map(single)
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<SetOrValue, E> {
                crate::value::ValueVisitor.visit_f64(v).map(single)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<SetOrValue, E> {
                crate::value::ValueVisitor.visit_str(v).map(single)
            }

            fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<SetOrValue, E> {
                crate::value::ValueVisitor.visit_string(v).map(single)
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> std::result::Result<SetOrValue, E> {
                crate::value::ValueVisitor.visit_bytes(v).map(single)
            }

            fn visit_map<A>(self, map: A) -> std::result::Result<SetOrValue, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                crate::value::ValueVisitor.visit_map(map).map(single)
            }
        }

        fn single(value: Value) -> SetOrValue {
            SetOrValue(vec![value])
        }

        deserializer.deserialize_any(SetVisitor)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = Document;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of keys to values or value sequences")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Document, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut doc = Document::new();
                while let Some((key, SetOrValue(values))) =
                    access.next_entry::<String, SetOrValue>()?
                {
                    if !lex::is_valid_key(&key) {
                        return Err(de::Error::custom(format!("invalid key: \"{key}\"")));
                    }
                    if doc.entries.contains_key(&key) {
                        return Err(de::Error::custom(format!("duplicate key: \"{key}\"")));
                    }
                    doc.entries.insert(key, Entry::Parsed(values));
                }
                Ok(doc)
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}
