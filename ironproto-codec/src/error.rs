//! Error types for plan building and decoding.

use ironproto_core::{DecodeError, MessageValue};
use thiserror::Error;

/// Error type for codec operations.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A wire-level decode failure.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A field marked `required` was absent after the decode loop finished.
    /// The partially-decoded instance is retained for diagnosis.
    #[error("missing required '{field}'")]
    MissingRequired {
        /// Fully-qualified name of the message type.
        type_name: String,
        /// Name of the missing field.
        field: String,
        /// Everything decoded before the check failed.
        partial: MessageValue,
    },

    /// Message/group nesting ran past the configured depth limit.
    #[error("message nesting exceeds depth limit {limit}")]
    DepthLimitExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// A plan was requested for a type whose fields were never resolved.
    #[error("type '{type_name}' is not resolved (field '{field}')")]
    Unresolved {
        /// Fully-qualified message name.
        type_name: String,
        /// The unresolved field.
        field: String,
    },

    /// A map field declared a key type that cannot key a map.
    #[error("field '{field}' of '{type_name}' has an invalid map key type")]
    InvalidMapKey {
        /// Fully-qualified message name.
        type_name: String,
        /// The offending field.
        field: String,
    },

    /// A decode was requested for a type name the codec does not know.
    #[error("unknown message type '{type_name}'")]
    UnknownType {
        /// The requested name.
        type_name: String,
    },
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
