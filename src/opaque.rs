//! The opaque-object codec boundary.
//!
//! Opaque values carry host-serialized bytes the core never interprets.
//! Their textual form inside a document, `i["…"]`, holds a text encoding
//! of those bytes supplied by an [`OpaqueCodec`]. The codec is an injected
//! capability: a [`Document`](crate::Document) holds one and hands it down
//! to every nested document it parses. [`Base64Codec`] is the default.
//!
//! ## Examples
//!
//! ```rust
//! use collex::opaque::{Base64Codec, OpaqueCodec};
//!
//! let codec = Base64Codec;
//! let text = codec.to_text(b"blob").unwrap();
//! assert_eq!(codec.from_text(&text).unwrap(), b"blob");
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Error type produced by codec implementations.
pub type CodecError = Box<dyn std::error::Error + Send + Sync>;

/// Converts opaque byte payloads to and from their textual form.
///
/// Implementations must be pure with respect to the payload: `from_text`
/// applied to the output of `to_text` returns the original bytes. The core
/// wraps any codec failure in [`Error::Object`](crate::Error::Object),
/// attaching the offending key.
pub trait OpaqueCodec: Send + Sync {
    /// Encodes payload bytes as text suitable for an `i["…"]` literal.
    fn to_text(&self, bytes: &[u8]) -> Result<String, CodecError>;

    /// Decodes the text of an `i["…"]` literal back to payload bytes.
    fn from_text(&self, text: &str) -> Result<Vec<u8>, CodecError>;
}

/// Standard-alphabet base64 codec, the default for new documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Codec;

impl OpaqueCodec for Base64Codec {
    fn to_text(&self, bytes: &[u8]) -> Result<String, CodecError> {
        Ok(STANDARD.encode(bytes))
    }

    fn from_text(&self, text: &str) -> Result<Vec<u8>, CodecError> {
        STANDARD.decode(text).map_err(Into::into)
    }
}
