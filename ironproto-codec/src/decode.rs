//! The generic decode loop.
//!
//! One interpreter drives every message type: it walks a [`MessagePlan`]'s
//! tag table, reads primitives through the [`Reader`], and recurses into
//! nested plans by registry index.

use std::collections::HashMap;

use ironproto_core::{DecodeError, MapKey, MessageValue, Reader, ScalarType, Value};
use ironproto_schema::{Root, TypeIndex};
use tracing::trace;

use crate::error::{CodecError, Result};
use crate::plan::{FieldAction, MapValue, MessagePlan, TagEntry};

/// Decode-time options.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Maximum message/group nesting depth before decoding is aborted.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}

/// Compiled decoders for every registered type of a resolved [`Root`].
///
/// A codec holds no reference to the root it was compiled from; it may
/// outlive it and be shared freely across threads.
#[derive(Debug, Clone)]
pub struct Codec {
    plans: Vec<MessagePlan>,
    names: HashMap<String, TypeIndex>,
    options: DecodeOptions,
}

impl Codec {
    /// Compiles a plan for every type in the root's registry.
    ///
    /// The root must be fully resolved.
    pub fn compile(root: &Root) -> Result<Self> {
        Self::compile_with(root, DecodeOptions::default())
    }

    /// Compiles with explicit decode options.
    pub fn compile_with(root: &Root, options: DecodeOptions) -> Result<Self> {
        let mut plans = Vec::with_capacity(root.registry().len());
        let mut names = HashMap::new();
        for index in 0..root.registry().len() {
            let plan = MessagePlan::compile(root, index)?;
            names.insert(plan.type_name.clone(), index);
            plans.push(plan);
        }
        Ok(Self {
            plans,
            names,
            options,
        })
    }

    /// Resolves a type name (leading dot optional) to its registry index.
    #[must_use]
    pub fn index_of(&self, type_name: &str) -> Option<TypeIndex> {
        self.names.get(type_name.trim_start_matches('.')).copied()
    }

    /// The compiled plan for a registry index.
    #[must_use]
    pub fn plan(&self, index: TypeIndex) -> &MessagePlan {
        &self.plans[index]
    }

    /// Decodes one message of the named type from a buffer.
    pub fn decode(&self, type_name: &str, buf: &[u8]) -> Result<MessageValue> {
        let index = self
            .index_of(type_name)
            .ok_or_else(|| CodecError::UnknownType {
                type_name: type_name.to_string(),
            })?;
        self.decode_index(index, buf)
    }

    /// Decodes one message by registry index from a buffer.
    pub fn decode_index(&self, index: TypeIndex, buf: &[u8]) -> Result<MessageValue> {
        let mut reader = Reader::new(buf);
        self.decode_message(&mut reader, index, None, self.options.max_depth)
    }

    /// Decodes one message from an existing reader. With `limit` the decoder
    /// reads `limit` bytes from the current position; without it, to the end
    /// of the buffer (or, for group types, to the end-group tag).
    pub fn decode_from(
        &self,
        reader: &mut Reader<'_>,
        index: TypeIndex,
        limit: Option<usize>,
    ) -> Result<MessageValue> {
        self.decode_message(reader, index, limit, self.options.max_depth)
    }

    fn decode_message(
        &self,
        reader: &mut Reader<'_>,
        index: TypeIndex,
        limit: Option<usize>,
        depth: usize,
    ) -> Result<MessageValue> {
        if depth == 0 {
            return Err(CodecError::DepthLimitExceeded {
                limit: self.options.max_depth,
            });
        }
        let plan = &self.plans[index];
        let end = match limit {
            Some(limit) => reader.pos() + limit,
            None => reader.len(),
        };
        let mut message = MessageValue::new(plan.type_name.clone());

        while reader.pos() < end {
            let tag = reader.uint32()?;
            if plan.group && tag & 7 == 4 {
                // End-group observed and consumed; the group is complete.
                return self.finish(plan, message);
            }
            trace!(type_name = %plan.type_name, tag, "field dispatch");
            match plan.entries.get(&tag) {
                Some(entry) => self.apply(plan, entry, reader, &mut message, end, depth)?,
                None => {
                    let wire_type = tag & 7;
                    if wire_type == 3 {
                        reader.skip_group(tag >> 3)?;
                    } else {
                        reader.skip_type(wire_type)?;
                    }
                }
            }
            if reader.pos() > end {
                return Err(DecodeError::Truncated { offset: end }.into());
            }
        }

        if plan.group {
            // The byte limit ran out before the end-group tag.
            return Err(DecodeError::Truncated {
                offset: reader.pos(),
            }
            .into());
        }
        self.finish(plan, message)
    }

    /// Required-field presence check, run at every successful exit.
    fn finish(&self, plan: &MessagePlan, message: MessageValue) -> Result<MessageValue> {
        for name in &plan.required {
            if message.get(name).is_none() {
                return Err(CodecError::MissingRequired {
                    type_name: plan.type_name.clone(),
                    field: name.clone(),
                    partial: message,
                });
            }
        }
        Ok(message)
    }

    fn apply(
        &self,
        plan: &MessagePlan,
        entry: &TagEntry,
        reader: &mut Reader<'_>,
        message: &mut MessageValue,
        end: usize,
        depth: usize,
    ) -> Result<()> {
        match &entry.action {
            FieldAction::Scalar(scalar) => {
                let value = read_scalar(reader, *scalar)?;
                store(plan, entry, message, value);
            }
            FieldAction::Packed(scalar) => {
                let len = reader.uint32()? as usize;
                let stop = reader.pos() + len;
                if stop > end {
                    return Err(DecodeError::Truncated {
                        offset: reader.pos(),
                    }
                    .into());
                }
                while reader.pos() < stop {
                    let value = read_scalar(reader, *scalar)?;
                    message.push(&entry.field, value);
                }
                if reader.pos() != stop {
                    return Err(DecodeError::Truncated { offset: stop }.into());
                }
            }
            FieldAction::Message(index) => {
                let len = reader.uint32()? as usize;
                if reader.pos() + len > end {
                    return Err(DecodeError::Truncated {
                        offset: reader.pos(),
                    }
                    .into());
                }
                let nested = self.decode_message(reader, *index, Some(len), depth - 1)?;
                store(plan, entry, message, Value::Message(Box::new(nested)));
            }
            FieldAction::Group(index) => {
                let nested = self.decode_message(reader, *index, None, depth - 1)?;
                store(plan, entry, message, Value::Message(Box::new(nested)));
            }
            FieldAction::Map { key, value } => {
                self.apply_map(plan, entry, reader, message, end, depth, *key, *value)?;
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_map(
        &self,
        plan: &MessagePlan,
        entry: &TagEntry,
        reader: &mut Reader<'_>,
        message: &mut MessageValue,
        end: usize,
        depth: usize,
        key_type: ScalarType,
        value_type: MapValue,
    ) -> Result<()> {
        let len = reader.uint32()? as usize;
        let stop = reader.pos() + len;
        if stop > end {
            return Err(DecodeError::Truncated {
                offset: reader.pos(),
            }
            .into());
        }

        // A map entry is a sub-message with virtual fields 1 (key) and
        // 2 (value); either half may be absent and falls back to its
        // type-specific default.
        let mut key = None;
        let mut value = None;
        while reader.pos() < stop {
            let tag = reader.uint32()?;
            match tag >> 3 {
                1 => key = Some(read_map_key(reader, key_type, plan, entry)?),
                2 => {
                    value = Some(match value_type {
                        MapValue::Scalar(scalar) => read_scalar(reader, scalar)?,
                        MapValue::Message(index) => {
                            let nested_len = reader.uint32()? as usize;
                            if reader.pos() + nested_len > stop {
                                return Err(DecodeError::Truncated {
                                    offset: reader.pos(),
                                }
                                .into());
                            }
                            let nested =
                                self.decode_message(reader, index, Some(nested_len), depth - 1)?;
                            Value::Message(Box::new(nested))
                        }
                    });
                }
                _ => {
                    let wire_type = tag & 7;
                    if wire_type == 3 {
                        reader.skip_group(tag >> 3)?;
                    } else {
                        reader.skip_type(wire_type)?;
                    }
                }
            }
        }
        if reader.pos() != stop {
            return Err(DecodeError::Truncated { offset: stop }.into());
        }

        let key = match key {
            Some(key) => key,
            None => zero_map_key(key_type),
        };
        let value = value.unwrap_or_else(|| match value_type {
            MapValue::Scalar(scalar) => scalar.zero_value(),
            MapValue::Message(_) => Value::Null,
        });
        message.insert_map_entry(&entry.field, key, value);
        Ok(())
    }
}

/// Assigns or appends a decoded value; assigning a oneof member clears its
/// siblings so at most one member of the group survives.
fn store(plan: &MessagePlan, entry: &TagEntry, message: &mut MessageValue, value: Value) {
    if entry.repeated {
        message.push(&entry.field, value);
        return;
    }
    if let Some(siblings) = plan.oneof_clears.get(&entry.field) {
        for sibling in siblings {
            message.fields.remove(sibling);
        }
    }
    message.set(entry.field.clone(), value);
}

fn read_scalar(reader: &mut Reader<'_>, scalar: ScalarType) -> std::result::Result<Value, DecodeError> {
    Ok(match scalar {
        ScalarType::Double => Value::F64(reader.double()?),
        ScalarType::Float => Value::F32(reader.float()?),
        ScalarType::Int32 => Value::I32(reader.int32()?),
        ScalarType::Uint32 => Value::U32(reader.uint32()?),
        ScalarType::Sint32 => Value::I32(reader.sint32()?),
        ScalarType::Fixed32 => Value::U32(reader.fixed32()?),
        ScalarType::Sfixed32 => Value::I32(reader.sfixed32()?),
        ScalarType::Int64 => Value::I64(reader.int64()?),
        ScalarType::Uint64 => Value::U64(reader.uint64()?),
        ScalarType::Sint64 => Value::I64(reader.sint64()?),
        ScalarType::Fixed64 => Value::U64(reader.fixed64()?),
        ScalarType::Sfixed64 => Value::I64(reader.sfixed64()?),
        ScalarType::Bool => Value::Bool(reader.bool()?),
        ScalarType::String => Value::String(reader.string()?),
        ScalarType::Bytes => Value::Bytes(reader.bytes()?),
    })
}

fn read_map_key(
    reader: &mut Reader<'_>,
    scalar: ScalarType,
    plan: &MessagePlan,
    entry: &TagEntry,
) -> Result<MapKey> {
    let value = read_scalar(reader, scalar)?;
    MapKey::from_value(value).ok_or_else(|| CodecError::InvalidMapKey {
        type_name: plan.type_name.clone(),
        field: entry.field.clone(),
    })
}

fn zero_map_key(scalar: ScalarType) -> MapKey {
    match scalar {
        ScalarType::Int32 | ScalarType::Sint32 | ScalarType::Sfixed32 => MapKey::I32(0),
        ScalarType::Uint32 | ScalarType::Fixed32 => MapKey::U32(0),
        ScalarType::Int64 | ScalarType::Sint64 | ScalarType::Sfixed64 => MapKey::I64(0),
        ScalarType::Uint64 | ScalarType::Fixed64 => MapKey::U64(0),
        ScalarType::Bool => MapKey::Bool(false),
        _ => MapKey::String(String::new()),
    }
}
