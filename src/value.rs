//! Typed values held by a document's item sets.
//!
//! [`Value`] is a tagged union over every kind the notation can express.
//! Values are immutable once materialized; mutation happens at the item-set
//! level through [`Document`](crate::Document) operations.
//!
//! ## Creating Values
//!
//! ```rust
//! use collex::Value;
//!
//! let text = Value::from("hello");
//! let count = Value::from(42);
//! let price = Value::from(19.99);
//! let flag = Value::from(true);
//!
//! assert!(text.is_text());
//! assert_eq!(count.as_i32(), Some(42));
//! assert_eq!(price.as_f64(), Some(19.99));
//! assert_eq!(flag.as_bool(), Some(true));
//! ```
//!
//! ## Serde interop
//!
//! `Value` implements `Serialize` and `Deserialize`, so a document tree can
//! be converted to and from other serde formats. Decimals and timestamps
//! serialize as strings, opaque payloads as bytes. A serde sequence never
//! deserializes into a single `Value` — sequences belong to item sets, and
//! a list of lists is not expressible in the notation.

use crate::codec::TIMESTAMP_FORMAT;
use crate::Document;
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single typed value inside an item set.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Quoted, escape-aware text.
    Text(String),
    /// Integer within 32-bit signed range.
    Int32(i32),
    /// Integer beyond 32-bit but within 64-bit signed range.
    Int64(i64),
    /// Double-precision float; chosen only when lossless.
    Float64(f64),
    /// Arbitrary-precision decimal.
    Decimal(BigDecimal),
    /// `true` or `false`.
    Bool(bool),
    /// Timestamp in the fixed `yyyy-MM-ddTHH:mm:ssZ` pattern.
    Timestamp(DateTime<FixedOffset>),
    /// A nested document.
    Collection(Document),
    /// Host-serialized bytes, rendered through the opaque codec.
    Opaque(Vec<u8>),
}

impl Value {
    /// The name of this value's kind, as used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Float64(_) => "float64",
            Value::Decimal(_) => "decimal",
            Value::Bool(_) => "boolean",
            Value::Timestamp(_) => "timestamp",
            Value::Collection(_) => "collection",
            Value::Opaque(_) => "opaque",
        }
    }

    /// Returns `true` if the value is text.
    #[inline]
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Returns `true` if the value is any numeric kind.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(
            self,
            Value::Int32(_) | Value::Int64(_) | Value::Float64(_) | Value::Decimal(_)
        )
    }

    /// Returns `true` if the value is a nested collection.
    #[inline]
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Value::Collection(_))
    }

    /// If the value is text, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an `Int32`, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(i) => Some(*i),
            _ => None,
        }
    }

    /// If the value is an integer of either width, returns it widened to
    /// `i64`. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int32(i) => Some(i64::from(*i)),
            Value::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// If the value is a `Float64`, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(f) => Some(*f),
            _ => None,
        }
    }

    /// If the value is a `Decimal`, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_decimal(&self) -> Option<&BigDecimal> {
        match self {
            Value::Decimal(d) => Some(d),
            _ => None,
        }
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a timestamp, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_timestamp(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::Timestamp(t) => Some(t),
            _ => None,
        }
    }

    /// If the value is a nested collection, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_collection(&self) -> Option<&Document> {
        match self {
            Value::Collection(doc) => Some(doc),
            _ => None,
        }
    }

    /// If the value is an opaque payload, returns its bytes.
    #[inline]
    #[must_use]
    pub fn as_opaque(&self) -> Option<&[u8]> {
        match self {
            Value::Opaque(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float64(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<BigDecimal> for Value {
    fn from(value: BigDecimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Value::Collection(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Opaque(value)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Text(s) => serializer.serialize_str(s),
            Value::Int32(i) => serializer.serialize_i32(*i),
            Value::Int64(i) => serializer.serialize_i64(*i),
            Value::Float64(f) => serializer.serialize_f64(*f),
            Value::Decimal(d) => serializer.serialize_str(&d.to_string()),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Timestamp(t) => {
                serializer.serialize_str(&t.format(TIMESTAMP_FORMAT).to_string())
            }
            Value::Collection(doc) => doc.serialize(serializer),
            Value::Opaque(bytes) => serializer.serialize_bytes(bytes),
        }
    }
}

pub(crate) struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a scalar, map, or byte value")
    }

    fn visit_bool<E>(self, value: bool) -> Result<Value, E> {
        Ok(Value::Bool(value))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Value, E> {
        Ok(match i32::try_from(value) {
            Ok(i) => Value::Int32(i),
            Err(_) => Value::Int64(value),
        })
    }

    fn visit_u64<E>(self, value: u64) -> Result<Value, E>
    where
        E: de::Error,
    {
        match i64::try_from(value) {
            Ok(i) => self.visit_i64(i),
            Err(_) => Ok(Value::Decimal(BigDecimal::from(value))),
        }
    }

    fn visit_f64<E>(self, value: f64) -> Result<Value, E> {
        Ok(Value::Float64(value))
    }

    fn visit_str<E>(self, value: &str) -> Result<Value, E> {
        Ok(Value::Text(value.to_string()))
    }

    fn visit_string<E>(self, value: String) -> Result<Value, E> {
        Ok(Value::Text(value))
    }

    fn visit_bytes<E>(self, value: &[u8]) -> Result<Value, E> {
        Ok(Value::Opaque(value.to_vec()))
    }

    fn visit_byte_buf<E>(self, value: Vec<u8>) -> Result<Value, E> {
        Ok(Value::Opaque(value))
    }

    fn visit_map<A>(self, map: A) -> Result<Value, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        let doc = Document::deserialize(de::value::MapAccessDeserializer::new(map))?;
        Ok(Value::Collection(doc))
    }

    fn visit_seq<A>(self, _seq: A) -> Result<Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        Err(de::Error::custom(
            "a single value cannot be a sequence; only item sets are sequences",
        ))
    }

    fn visit_unit<E>(self) -> Result<Value, E>
    where
        E: de::Error,
    {
        Err(de::Error::custom("collection notation has no null value"))
    }

    fn visit_none<E>(self) -> Result<Value, E>
    where
        E: de::Error,
    {
        self.visit_unit()
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Deserialize::deserialize(deserializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}
