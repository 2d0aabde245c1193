//! Field declarations and their resolved form.

use std::collections::BTreeMap;

use ironproto_core::ScalarType;

use crate::node::{NodeId, TypeIndex};

/// Field cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rule {
    /// Plain singular field.
    #[default]
    Singular,
    /// Explicitly optional singular field.
    Optional,
    /// Presence-checked field; a decode without it fails.
    Required,
    /// Repeated field.
    Repeated,
}

impl Rule {
    /// Parses a cardinality keyword as it appears in descriptors.
    #[must_use]
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "optional" => Some(Self::Optional),
            "required" => Some(Self::Required),
            "repeated" => Some(Self::Repeated),
            _ => None,
        }
    }

    /// Returns true for `repeated`.
    #[must_use]
    pub const fn is_repeated(&self) -> bool {
        matches!(self, Self::Repeated)
    }
}

/// What a field's declared type name resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedType {
    /// A primitive; carries its wire behaviour directly.
    Scalar(ScalarType),
    /// A message type, referenced through the type registry.
    Message(TypeIndex),
    /// An enum, decoded as `int32` with unknown values preserved.
    Enum(NodeId),
}

/// A field declaration.
///
/// Created from a descriptor, mutated only during the load/resolve phase
/// (`resolved` and the extension cross-links), immutable thereafter.
#[derive(Debug, Clone)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Field id, unique within the declaring type.
    pub id: u32,
    /// Declared type: a scalar name or a symbolic reference.
    pub type_name: String,
    /// Cardinality.
    pub rule: Rule,
    /// Declared packing preference. Decoders accept both forms regardless.
    pub packed: Option<bool>,
    /// Map key type; present exactly for map fields.
    pub key_type: Option<ScalarType>,
    /// True if the field is group-encoded (wire types 3/4).
    pub group: bool,
    /// Extension target name, for fields declared via `extend`.
    pub extend: Option<String>,
    /// Field options as declared.
    pub options: BTreeMap<String, serde_json::Value>,
    /// Resolution result, filled in by `Root::resolve_all`.
    pub resolved: Option<ResolvedType>,
    /// For an extension declaration: the sister field constructed inside the
    /// target type, as `(target node, field index)`.
    pub extension_field: Option<(NodeId, usize)>,
    /// For a sister field: the declaring extension, as
    /// `(declaring container node, extension index)`.
    pub declaring_field: Option<(NodeId, usize)>,
}

impl Field {
    /// Creates a plain field declaration.
    #[must_use]
    pub fn new(name: impl Into<String>, id: u32, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id,
            type_name: type_name.into(),
            rule: Rule::Singular,
            packed: None,
            key_type: None,
            group: false,
            extend: None,
            options: BTreeMap::new(),
            resolved: None,
            extension_field: None,
            declaring_field: None,
        }
    }

    /// Returns true for map fields.
    #[must_use]
    pub const fn is_map(&self) -> bool {
        self.key_type.is_some()
    }
}

/// A oneof group: a named subset of a message's fields of which at most one
/// is set at a time.
#[derive(Debug, Clone)]
pub struct OneOf {
    /// Oneof name.
    pub name: String,
    /// Names of the member fields.
    pub fields: Vec<String>,
}
