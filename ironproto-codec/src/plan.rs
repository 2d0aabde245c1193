//! Per-type dispatch plans.
//!
//! A [`MessagePlan`] is the compiled form of one resolved message type: a
//! table from accepted wire tag to [`FieldAction`], plus the bookkeeping the
//! decode loop needs (required fields, oneof membership, group framing).
//! Plans reference nested types by registry index, so mutually and
//! self-referential types compile without forward declarations.

use std::collections::HashMap;

use ironproto_core::{ScalarType, WireType, tag};
use ironproto_schema::{ResolvedType, Root, Rule, TypeIndex};

use crate::error::CodecError;

/// How a map value is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapValue {
    /// A primitive (enums arrive here as `int32`).
    Scalar(ScalarType),
    /// A nested message, always length-delimited.
    Message(TypeIndex),
}

/// The decode action behind one accepted tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAction {
    /// Read one primitive at its basic wire type.
    Scalar(ScalarType),
    /// Read a length-delimited run of packed primitives.
    Packed(ScalarType),
    /// Read a length varint, then a nested message bounded by it.
    Message(TypeIndex),
    /// Enter a nested group; it consumes its own end-group tag.
    Group(TypeIndex),
    /// Read one length-delimited map entry (virtual fields 1 and 2).
    Map {
        /// Key primitive.
        key: ScalarType,
        /// Value action.
        value: MapValue,
    },
}

/// One tag-table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    /// Target field name (the message value slot).
    pub field: String,
    /// Append instead of assign.
    pub repeated: bool,
    /// The decode action.
    pub action: FieldAction,
}

/// Compiled dispatch plan for one message type.
#[derive(Debug, Clone)]
pub struct MessagePlan {
    /// Fully-qualified type name, without the leading dot.
    pub type_name: String,
    /// True for group-encoded types: the decode loop ends on an end-group
    /// tag instead of a byte limit.
    pub group: bool,
    /// Accepted tags.
    pub entries: HashMap<u32, TagEntry>,
    /// Names of fields whose presence is checked after decoding.
    pub required: Vec<String>,
    /// For each oneof member, the sibling slots to clear when it is set.
    pub oneof_clears: HashMap<String, Vec<String>>,
}

impl MessagePlan {
    /// Compiles the plan for one registered type.
    pub(crate) fn compile(root: &Root, index: TypeIndex) -> Result<Self, CodecError> {
        let node = root.type_node(index);
        let type_name = root.full_name(node).trim_start_matches('.').to_string();
        let Some(message) = root.message(node) else {
            return Err(CodecError::UnknownType { type_name });
        };

        let mut plan = Self {
            type_name,
            group: message.group,
            entries: HashMap::new(),
            required: Vec::new(),
            oneof_clears: HashMap::new(),
        };

        for field in &message.fields {
            let Some(resolved) = field.resolved else {
                return Err(CodecError::Unresolved {
                    type_name: plan.type_name.clone(),
                    field: field.name.clone(),
                });
            };
            let repeated = field.rule.is_repeated();

            if let Some(key) = field.key_type {
                if !key.is_map_key() {
                    return Err(CodecError::InvalidMapKey {
                        type_name: plan.type_name.clone(),
                        field: field.name.clone(),
                    });
                }
                let value = match resolved {
                    ResolvedType::Scalar(s) => MapValue::Scalar(s),
                    ResolvedType::Enum(_) => MapValue::Scalar(ScalarType::Int32),
                    ResolvedType::Message(idx) => MapValue::Message(idx),
                };
                plan.entries.insert(
                    tag(field.id, WireType::LengthDelimited),
                    TagEntry {
                        field: field.name.clone(),
                        repeated: false,
                        action: FieldAction::Map { key, value },
                    },
                );
            } else {
                match resolved {
                    ResolvedType::Scalar(s) => plan.add_scalar(field.id, &field.name, s, repeated),
                    // Enums decode exactly as int32; unknown values are kept.
                    ResolvedType::Enum(_) => {
                        plan.add_scalar(field.id, &field.name, ScalarType::Int32, repeated);
                    }
                    ResolvedType::Message(idx) => {
                        let (wire, action) = if field.group {
                            (WireType::StartGroup, FieldAction::Group(idx))
                        } else {
                            (WireType::LengthDelimited, FieldAction::Message(idx))
                        };
                        plan.entries.insert(
                            tag(field.id, wire),
                            TagEntry {
                                field: field.name.clone(),
                                repeated,
                                action,
                            },
                        );
                    }
                }
            }

            if field.rule == Rule::Required {
                plan.required.push(field.name.clone());
            }
        }

        for oneof in &message.oneofs {
            for member in &oneof.fields {
                let siblings = oneof
                    .fields
                    .iter()
                    .filter(|f| *f != member)
                    .cloned()
                    .collect();
                plan.oneof_clears.insert(member.clone(), siblings);
            }
        }

        Ok(plan)
    }

    fn add_scalar(&mut self, id: u32, name: &str, scalar: ScalarType, repeated: bool) {
        self.entries.insert(
            tag(id, scalar.basic_wire_type()),
            TagEntry {
                field: name.to_string(),
                repeated,
                action: FieldAction::Scalar(scalar),
            },
        );
        // Packed-capable repeated primitives accept the length-delimited
        // form regardless of the declared packing preference.
        if repeated && scalar.is_packable() {
            self.entries.insert(
                tag(id, WireType::LengthDelimited),
                TagEntry {
                    field: name.to_string(),
                    repeated: true,
                    action: FieldAction::Packed(scalar),
                },
            );
        }
    }
}
