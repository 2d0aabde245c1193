//! Error types for schema construction and resolution.

use thiserror::Error;

/// An extension field whose target type was never loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedExtension {
    /// The `extend` target name as declared.
    pub target: String,
    /// Fully-qualified name of the namespace or type declaring the extension.
    pub declared_in: String,
}

/// Error type for schema operations.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Two siblings of a namespace would share a name.
    #[error("duplicate name '{name}' in '{namespace}'")]
    DuplicateName {
        /// The colliding name.
        name: String,
        /// Fully-qualified name of the containing namespace.
        namespace: String,
    },

    /// A field id is outside `1..=2^29-1` or repeated within its type.
    #[error("invalid or duplicate field id {id} in message '{message}'")]
    InvalidFieldId {
        /// Fully-qualified message name.
        message: String,
        /// The offending id.
        id: u32,
    },

    /// A symbolic type name did not resolve anywhere on the scope chain.
    #[error("unresolved reference '{name}' from '{scope}'")]
    UnresolvedReference {
        /// The name as declared.
        name: String,
        /// Fully-qualified name of the scope the lookup started from.
        scope: String,
    },

    /// `resolve_all` finished with extensions still waiting for their target.
    #[error("unresolvable extensions: {}", .extensions.iter()
        .map(|e| format!("'{}' declared in '{}'", e.target, e.declared_in))
        .collect::<Vec<_>>()
        .join(", "))]
    UnresolvableExtensions {
        /// One entry per deferred extension field.
        extensions: Vec<UnresolvedExtension>,
    },

    /// A JSON descriptor was structurally invalid.
    #[error("invalid descriptor: {message}")]
    InvalidDescriptor {
        /// What was wrong.
        message: String,
    },

    /// JSON syntax error in a descriptor source.
    #[error("descriptor is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchemaError {
    /// Creates an invalid-descriptor error.
    pub fn invalid_descriptor(message: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            message: message.into(),
        }
    }
}
