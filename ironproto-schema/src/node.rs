//! Schema tree nodes.
//!
//! The schema graph is an arena of [`Node`]s owned by the
//! [`Root`](crate::Root); references between nodes are [`NodeId`] indices, so
//! cyclic type references need no forward declarations.

use std::collections::BTreeMap;

use crate::field::{Field, OneOf};

/// Index of a node in the root's arena. Node 0 is the root namespace.
pub type NodeId = usize;

/// Index of a resolved message type in the root's type registry.
pub type TypeIndex = usize;

/// A message type: an ordered aggregate of fields plus oneof groups.
#[derive(Debug, Clone, Default)]
pub struct MessageType {
    /// Fields in declaration order, including attached extension sisters.
    pub fields: Vec<Field>,
    /// Oneof groups partitioning a subset of the fields.
    pub oneofs: Vec<OneOf>,
    /// True if this type is group-encoded (delimited by start/end-group tags).
    pub group: bool,
    /// Registry index, assigned during `resolve_all`.
    pub index: Option<TypeIndex>,
}

impl MessageType {
    /// Looks up a field by id.
    #[must_use]
    pub fn field_by_id(&self, id: u32) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the oneof a field belongs to, if any.
    #[must_use]
    pub fn oneof_of(&self, field_name: &str) -> Option<&OneOf> {
        self.oneofs
            .iter()
            .find(|o| o.fields.iter().any(|f| f == field_name))
    }
}

/// An enum type: a name to number mapping. Aliases (two names sharing a
/// number) are allowed; on the wire values decode as `int32`.
#[derive(Debug, Clone, Default)]
pub struct EnumType {
    /// Declared values in name order.
    pub values: BTreeMap<String, i32>,
}

impl EnumType {
    /// Returns the first name declared for a number, if any.
    #[must_use]
    pub fn name_of(&self, number: i32) -> Option<&str> {
        self.values
            .iter()
            .find(|&(_, &n)| n == number)
            .map(|(name, _)| name.as_str())
    }
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A plain namespace (package segment or file scope).
    Namespace,
    /// A message type.
    Message(MessageType),
    /// An enum type.
    Enum(EnumType),
}

/// One node of the schema tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Simple name; empty for the root namespace.
    pub name: String,
    /// Parent node; `None` only for the root namespace.
    pub parent: Option<NodeId>,
    /// Children by name. Sibling names are unique.
    pub children: BTreeMap<String, NodeId>,
    /// Extension fields declared in this scope, awaiting or holding their
    /// attachment cross-links.
    pub extensions: Vec<Field>,
    /// Payload.
    pub kind: NodeKind,
}

impl Node {
    /// Creates a namespace node.
    #[must_use]
    pub fn namespace(name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            parent,
            children: BTreeMap::new(),
            extensions: Vec::new(),
            kind: NodeKind::Namespace,
        }
    }

    /// Returns the message payload, if this node is a message.
    #[must_use]
    pub fn as_message(&self) -> Option<&MessageType> {
        match &self.kind {
            NodeKind::Message(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the enum payload, if this node is an enum.
    #[must_use]
    pub fn as_enum(&self) -> Option<&EnumType> {
        match &self.kind {
            NodeKind::Enum(e) => Some(e),
            _ => None,
        }
    }
}
