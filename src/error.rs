//! Error types for Collex parsing, access, and serialization.
//!
//! Every error is fatal and surfaced immediately; nothing is retried
//! internally. Errors that arise while working with a particular item set
//! carry the offending key, and element-level errors carry the index too.
//!
//! ## Error Categories
//!
//! - [`Error::Syntax`]: malformed notation — missing brackets, bad keys,
//!   bad escapes, unrecognizable literals, empty value lists
//! - [`Error::Object`]: the opaque-object codec could not encode or decode
//!   a payload
//! - [`Error::KindMismatch`]: a typed accessor met a value of a different
//!   materialized kind
//! - [`Error::Bounds`]: indexed removal past the end of an item set
//! - [`Error::Io`]: reading from an external source failed (only produced
//!   by [`crate::from_reader`])
//!
//! ## Examples
//!
//! ```rust
//! use collex::{from_str, Error};
//!
//! let result = from_str("no brackets here");
//! assert!(matches!(result, Err(Error::Syntax { .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors produced by this crate.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// IO error while reading document text
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed notation
    #[error("Syntax error{}: {msg}", format_location(.key, .index))]
    Syntax {
        msg: String,
        key: Option<String>,
        index: Option<usize>,
    },

    /// Opaque-object codec failure
    #[error("Object error (key: \"{key}\"): {msg}")]
    Object { msg: String, key: String },

    /// Typed accessor against a value of a different kind
    #[error("Kind mismatch (key: \"{key}\", index: {index}): expected {expected}, found {found}")]
    KindMismatch {
        key: String,
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// Out-of-range indexed removal
    #[error("Index {index} out of bounds (key: \"{key}\", length: {len})")]
    Bounds {
        key: String,
        index: usize,
        len: usize,
    },
}

fn format_location(key: &Option<String>, index: &Option<usize>) -> String {
    match (key, index) {
        (Some(k), Some(i)) => format!(" (key: \"{k}\", index: {i})"),
        (Some(k), None) => format!(" (key: \"{k}\")"),
        _ => String::new(),
    }
}

impl Error {
    /// Creates a syntax error with no key context.
    ///
    /// Use [`Error::syntax_for`] or [`Error::syntax_at`] when the offending
    /// key (and element index) are known.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collex::Error;
    ///
    /// let err = Error::syntax("missing collection");
    /// assert!(err.to_string().contains("missing collection"));
    /// ```
    pub fn syntax<T: fmt::Display>(msg: T) -> Self {
        Error::Syntax {
            msg: msg.to_string(),
            key: None,
            index: None,
        }
    }

    /// Creates a syntax error attached to a key.
    pub fn syntax_for<T: fmt::Display>(msg: T, key: &str) -> Self {
        Error::Syntax {
            msg: msg.to_string(),
            key: Some(key.to_string()),
            index: None,
        }
    }

    /// Creates a syntax error attached to a key and an element index.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use collex::Error;
    ///
    /// let err = Error::syntax_at("unrecognized value", "tags", 2);
    /// assert!(err.to_string().contains("tags"));
    /// assert!(err.to_string().contains("index: 2"));
    /// ```
    pub fn syntax_at<T: fmt::Display>(msg: T, key: &str, index: usize) -> Self {
        Error::Syntax {
            msg: msg.to_string(),
            key: Some(key.to_string()),
            index: Some(index),
        }
    }

    /// Creates an object error for an opaque codec failure on `key`.
    pub fn object<T: fmt::Display>(msg: T, key: &str) -> Self {
        Error::Object {
            msg: msg.to_string(),
            key: key.to_string(),
        }
    }

    /// Creates a kind-mismatch error for a typed accessor.
    pub fn kind_mismatch(key: &str, index: usize, expected: &'static str, found: &'static str) -> Self {
        Error::KindMismatch {
            key: key.to_string(),
            index,
            expected,
            found,
        }
    }

    /// Creates a bounds error for an out-of-range indexed removal.
    pub fn bounds(key: &str, index: usize, len: usize) -> Self {
        Error::Bounds {
            key: key.to_string(),
            index,
            len,
        }
    }

    /// Creates an I/O error from a display message.
    pub fn io<T: fmt::Display>(msg: T) -> Self {
        Error::Io(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
