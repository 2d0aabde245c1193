//! Error types for wire-format decoding.

use thiserror::Error;

/// Error type for wire-format decoding operations.
///
/// The reader's cursor is left at the failing position, so `offset` in every
/// variant is also where decoding stopped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Unexpected end of input. Raised when the buffer ends mid-varint,
    /// mid-fixed-width value, inside a length-delimited payload, or before
    /// a group's matching end tag.
    #[error("unexpected end of input at offset {offset}")]
    Truncated {
        /// Byte offset where input ran out.
        offset: usize,
    },

    /// A varint ran past the ten-byte maximum.
    #[error("malformed varint at offset {offset}: exceeds 10 bytes")]
    MalformedVarint {
        /// Byte offset where the varint started.
        offset: usize,
    },

    /// A tag carried a reserved or out-of-place wire type.
    #[error("invalid wire type {wire_type} at offset {offset}")]
    InvalidWireType {
        /// The offending wire type value.
        wire_type: u32,
        /// Byte offset of the tag.
        offset: usize,
    },

    /// A `string` field held bytes that are not valid UTF-8.
    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 {
        /// Byte offset where the string payload started.
        offset: usize,
    },
}

/// Result type alias for decoding operations.
pub type Result<T> = std::result::Result<T, DecodeError>;
