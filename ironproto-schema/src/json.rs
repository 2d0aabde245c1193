//! JSON descriptor ingestion.
//!
//! Descriptors are plain JSON objects mirroring the reflection tree: a
//! declaration with a `fields` key is a message, `values` is an enum, an
//! `id` is an extension field, and anything else is a namespace. Unknown
//! keys are tolerated so descriptors from newer producers still load.
//!
//! ```json
//! {
//!   "nested": {
//!     "pkg": {
//!       "nested": {
//!         "M": { "fields": { "a": { "type": "int32", "id": 1 } } },
//!         "Color": { "values": { "RED": 0, "BLUE": 1 } }
//!       }
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use ironproto_core::ScalarType;
use serde_json::Value as Json;

use crate::error::SchemaError;
use crate::field::{Field, OneOf, Rule};
use crate::node::{EnumType, MessageType, NodeId};
use crate::root::Root;

impl Root {
    /// Merges a JSON descriptor into the root namespace.
    ///
    /// # Errors
    /// `Json` for syntax errors, `InvalidDescriptor` for structural
    /// problems, `DuplicateName` for sibling collisions.
    pub fn add_json(&mut self, source: &str) -> Result<(), SchemaError> {
        let value: Json = serde_json::from_str(source)?;
        let obj = value
            .as_object()
            .ok_or_else(|| SchemaError::invalid_descriptor("top level must be an object"))?;
        if let Some(nested) = obj.get("nested") {
            merge_nested(self, self.root_id(), nested)?;
        }
        Ok(())
    }
}

fn merge_nested(root: &mut Root, parent: NodeId, nested: &Json) -> Result<(), SchemaError> {
    let map = nested
        .as_object()
        .ok_or_else(|| SchemaError::invalid_descriptor("'nested' must be an object"))?;
    for (name, decl) in map {
        add_declaration(root, parent, name, decl)?;
    }
    Ok(())
}

fn add_declaration(
    root: &mut Root,
    parent: NodeId,
    name: &str,
    decl: &Json,
) -> Result<(), SchemaError> {
    let obj = decl.as_object().ok_or_else(|| {
        SchemaError::invalid_descriptor(format!("declaration '{name}' must be an object"))
    })?;

    if obj.contains_key("fields") || obj.contains_key("oneofs") {
        let message = parse_message(name, obj)?;
        let id = root.add_message(parent, name, message)?;
        if let Some(nested) = obj.get("nested") {
            merge_nested(root, id, nested)?;
        }
    } else if obj.contains_key("values") {
        let value = parse_enum(name, decl)?;
        root.add_enum(parent, name, value)?;
    } else if obj.contains_key("id") {
        let field = parse_field(name, decl)?;
        if field.extend.is_none() {
            return Err(SchemaError::invalid_descriptor(format!(
                "field '{name}' outside a message must carry 'extend'"
            )));
        }
        root.add_extension(parent, field);
    } else {
        let id = root.define_child(parent, name)?;
        if let Some(nested) = obj.get("nested") {
            merge_nested(root, id, nested)?;
        }
    }
    Ok(())
}

fn parse_message(
    name: &str,
    obj: &serde_json::Map<String, Json>,
) -> Result<MessageType, SchemaError> {
    let mut message = MessageType {
        group: obj.get("group").and_then(Json::as_bool).unwrap_or(false),
        ..MessageType::default()
    };

    if let Some(fields) = obj.get("fields") {
        let fields = fields.as_object().ok_or_else(|| {
            SchemaError::invalid_descriptor(format!("'fields' of '{name}' must be an object"))
        })?;
        for (field_name, field_decl) in fields {
            message.fields.push(parse_field(field_name, field_decl)?);
        }
    }

    if let Some(oneofs) = obj.get("oneofs") {
        let oneofs = oneofs.as_object().ok_or_else(|| {
            SchemaError::invalid_descriptor(format!("'oneofs' of '{name}' must be an object"))
        })?;
        for (oneof_name, oneof_decl) in oneofs {
            let members = oneof_decl
                .get("oneof")
                .and_then(Json::as_array)
                .ok_or_else(|| {
                    SchemaError::invalid_descriptor(format!(
                        "oneof '{oneof_name}' must carry a 'oneof' member list"
                    ))
                })?;
            message.oneofs.push(OneOf {
                name: oneof_name.clone(),
                fields: members
                    .iter()
                    .filter_map(Json::as_str)
                    .map(str::to_string)
                    .collect(),
            });
        }
    }

    Ok(message)
}

fn parse_enum(name: &str, decl: &Json) -> Result<EnumType, SchemaError> {
    let values = decl
        .get("values")
        .and_then(Json::as_object)
        .ok_or_else(|| {
            SchemaError::invalid_descriptor(format!("'values' of '{name}' must be an object"))
        })?;
    let mut value = EnumType::default();
    for (value_name, number) in values {
        let number = number.as_i64().ok_or_else(|| {
            SchemaError::invalid_descriptor(format!(
                "enum value '{name}.{value_name}' must be an integer"
            ))
        })?;
        value.values.insert(value_name.clone(), number as i32);
    }
    Ok(value)
}

fn parse_field(name: &str, decl: &Json) -> Result<Field, SchemaError> {
    let obj = decl.as_object().ok_or_else(|| {
        SchemaError::invalid_descriptor(format!("field '{name}' must be an object"))
    })?;

    let type_name = obj.get("type").and_then(Json::as_str).ok_or_else(|| {
        SchemaError::invalid_descriptor(format!("field '{name}' is missing 'type'"))
    })?;
    let id = obj.get("id").and_then(Json::as_u64).ok_or_else(|| {
        SchemaError::invalid_descriptor(format!("field '{name}' is missing a numeric 'id'"))
    })?;

    let mut field = Field::new(name, id as u32, type_name);

    if let Some(rule) = obj.get("rule").and_then(Json::as_str) {
        field.rule = Rule::from_keyword(rule).ok_or_else(|| {
            SchemaError::invalid_descriptor(format!("field '{name}' has unknown rule '{rule}'"))
        })?;
    }

    if let Some(key_type) = obj.get("keyType").and_then(Json::as_str) {
        let scalar = ScalarType::from_name(key_type)
            .filter(ScalarType::is_map_key)
            .ok_or_else(|| {
                SchemaError::invalid_descriptor(format!(
                    "field '{name}' has invalid map key type '{key_type}'"
                ))
            })?;
        field.key_type = Some(scalar);
    }

    if let Some(options) = obj.get("options").and_then(Json::as_object) {
        field.options = options
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<BTreeMap<_, _>>();
        field.packed = options.get("packed").and_then(Json::as_bool);
    }

    if let Some(extend) = obj.get("extend").and_then(Json::as_str) {
        field.extend = Some(extend.to_string());
    }

    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ResolvedType;

    #[test]
    fn test_message_and_enum_ingestion() {
        let mut root = Root::new();
        root.add_json(
            r#"{
                "nested": {
                    "pkg": {
                        "nested": {
                            "M": {
                                "fields": {
                                    "a": { "type": "int32", "id": 1 },
                                    "b": { "type": "string", "id": 2 },
                                    "c": { "type": "Color", "id": 3 }
                                }
                            },
                            "Color": { "values": { "RED": 0, "BLUE": 1 } }
                        }
                    }
                }
            }"#,
        )
        .unwrap();
        root.resolve_all().unwrap();

        let m = root.lookup_type("pkg.M").unwrap();
        let message = root.message(m).unwrap();
        assert_eq!(message.fields.len(), 3);
        assert_eq!(message.fields[0].name, "a");
        assert_eq!(message.fields[1].name, "b");
        let color = root.lookup_enum("pkg.Color").unwrap();
        assert_eq!(
            message.field_by_name("c").unwrap().resolved,
            Some(ResolvedType::Enum(color))
        );
    }

    #[test]
    fn test_map_field_and_packed_option() {
        let mut root = Root::new();
        root.add_json(
            r#"{
                "nested": {
                    "M": {
                        "fields": {
                            "m": { "type": "int32", "id": 1, "keyType": "string" },
                            "v": { "type": "int32", "id": 2, "rule": "repeated",
                                   "options": { "packed": true } }
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        let m = root.lookup_type("M").unwrap();
        let message = root.message(m).unwrap();
        assert!(message.field_by_name("m").unwrap().is_map());
        assert_eq!(message.field_by_name("v").unwrap().packed, Some(true));
        assert_eq!(message.field_by_name("v").unwrap().rule, Rule::Repeated);
    }

    #[test]
    fn test_oneof_membership() {
        let mut root = Root::new();
        root.add_json(
            r#"{
                "nested": {
                    "M": {
                        "oneofs": { "kind": { "oneof": ["a", "b"] } },
                        "fields": {
                            "a": { "type": "int32", "id": 1 },
                            "b": { "type": "string", "id": 2 }
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        let m = root.lookup_type("M").unwrap();
        let message = root.message(m).unwrap();
        assert_eq!(message.oneof_of("a").unwrap().name, "kind");
        assert_eq!(message.oneof_of("b").unwrap().name, "kind");
        assert!(message.oneof_of("c").is_none());
    }

    #[test]
    fn test_extension_field_in_namespace() {
        let mut root = Root::new();
        root.add_json(
            r#"{
                "nested": {
                    "pkg": {
                        "nested": {
                            "x": { "type": "int32", "id": 100, "extend": "M" },
                            "M": { "fields": {} }
                        }
                    }
                }
            }"#,
        )
        .unwrap();
        root.resolve_all().unwrap();

        let m = root.lookup_type("pkg.M").unwrap();
        let sister = root.message(m).unwrap().field_by_id(100).unwrap();
        assert_eq!(sister.name, ".pkg.x");
    }

    #[test]
    fn test_group_flag_carries_to_type() {
        let mut root = Root::new();
        root.add_json(
            r#"{
                "nested": {
                    "M": {
                        "fields": { "g": { "type": "Sub", "id": 1 } },
                        "nested": {
                            "Sub": { "group": true, "fields": { "x": { "type": "int32", "id": 2 } } }
                        }
                    }
                }
            }"#,
        )
        .unwrap();
        root.resolve_all().unwrap();

        let m = root.lookup_type("M").unwrap();
        assert!(root.message(m).unwrap().field_by_name("g").unwrap().group);
    }

    #[test]
    fn test_field_without_extend_rejected_at_namespace_level() {
        let mut root = Root::new();
        let err = root
            .add_json(r#"{ "nested": { "x": { "type": "int32", "id": 1 } } }"#)
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDescriptor { .. }));
    }
}
