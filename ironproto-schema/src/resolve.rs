//! Post-load resolution pass.
//!
//! Converts symbolic field type names into direct references, assigns every
//! message type its registry index, validates field ids, and settles the
//! deferred extension list.

use ironproto_core::{MAX_FIELD_ID, ScalarType};
use tracing::debug;

use crate::error::{SchemaError, UnresolvedExtension};
use crate::field::ResolvedType;
use crate::node::{NodeId, NodeKind};
use crate::root::Root;

impl Root {
    /// Resolves the whole tree.
    ///
    /// After a successful return the deferred extension list is empty, every
    /// field carries its [`ResolvedType`], and every message type has a
    /// registry index; the root is then treated as immutable.
    ///
    /// # Errors
    /// `UnresolvedReference` for a symbolic name with no match on its scope
    /// chain, `InvalidFieldId` for out-of-range or duplicate ids, and
    /// `UnresolvableExtensions` when extensions are still deferred after the
    /// full tree has been processed.
    pub fn resolve_all(&mut self) -> Result<(), SchemaError> {
        self.retry_deferred();

        // Registry indices first, so that resolution (and later the decoder
        // builder) can reference nested types by index even across cycles.
        for id in 0..self.node_count() {
            if self.node(id).as_message().is_some() {
                self.register_type(id);
            }
        }

        for id in 0..self.node_count() {
            self.validate_field_ids(id)?;
            self.resolve_fields(id)?;
            self.resolve_extension_declarations(id)?;
        }

        if !self.deferred.is_empty() {
            let extensions = self
                .deferred
                .iter()
                .map(|&(container, index)| UnresolvedExtension {
                    target: self.node(container).extensions[index]
                        .extend
                        .clone()
                        .unwrap_or_default(),
                    declared_in: self.full_name(container),
                })
                .collect();
            return Err(SchemaError::UnresolvableExtensions { extensions });
        }

        debug!(types = self.registry().len(), "schema resolved");
        Ok(())
    }

    fn validate_field_ids(&self, id: NodeId) -> Result<(), SchemaError> {
        let Some(message) = self.node(id).as_message() else {
            return Ok(());
        };
        let mut seen = std::collections::HashSet::new();
        for field in &message.fields {
            if field.id == 0 || field.id > MAX_FIELD_ID || !seen.insert(field.id) {
                return Err(SchemaError::InvalidFieldId {
                    message: self.full_name(id),
                    id: field.id,
                });
            }
        }
        Ok(())
    }

    fn resolve_fields(&mut self, id: NodeId) -> Result<(), SchemaError> {
        let Some(message) = self.node(id).as_message() else {
            return Ok(());
        };
        let field_count = message.fields.len();
        for index in 0..field_count {
            let Some(message) = self.message(id) else { break };
            let field = &message.fields[index];
            if field.resolved.is_some() {
                continue;
            }
            // Sister fields resolve in the scope of their declaring
            // extension, not in the extended type.
            let scope = match field.declaring_field {
                Some((container, _)) => container,
                None => id,
            };
            let type_name = field.type_name.clone();
            let resolved = self.resolve_type_name(scope, &type_name)?;
            // Group encoding is a property of the target type; mirror it
            // onto the field so the decoder builder sees it directly.
            let group = match resolved {
                ResolvedType::Message(type_index) => self
                    .message(self.type_node(type_index))
                    .is_some_and(|m| m.group),
                _ => false,
            };
            if let Some(m) = self.message_mut(id) {
                m.fields[index].resolved = Some(resolved);
                if group {
                    m.fields[index].group = true;
                }
            }
        }
        Ok(())
    }

    fn resolve_extension_declarations(&mut self, id: NodeId) -> Result<(), SchemaError> {
        let count = self.node(id).extensions.len();
        for index in 0..count {
            if self.node(id).extensions[index].resolved.is_some() {
                continue;
            }
            let type_name = self.node(id).extensions[index].type_name.clone();
            let resolved = self.resolve_type_name(id, &type_name)?;
            self.node_mut(id).extensions[index].resolved = Some(resolved);
        }
        Ok(())
    }

    /// Resolves one declared type name from a scope: scalar names
    /// short-circuit, anything else walks the lexical scope chain.
    fn resolve_type_name(
        &self,
        scope: NodeId,
        type_name: &str,
    ) -> Result<ResolvedType, SchemaError> {
        if let Some(scalar) = ScalarType::from_name(type_name) {
            return Ok(ResolvedType::Scalar(scalar));
        }
        let Some(found) = self.lookup(scope, type_name) else {
            return Err(SchemaError::UnresolvedReference {
                name: type_name.to_string(),
                scope: self.full_name(scope),
            });
        };
        match &self.node(found).kind {
            NodeKind::Message(m) => {
                let index = m.index.ok_or_else(|| SchemaError::UnresolvedReference {
                    name: type_name.to_string(),
                    scope: self.full_name(scope),
                })?;
                Ok(ResolvedType::Message(index))
            }
            NodeKind::Enum(_) => Ok(ResolvedType::Enum(found)),
            NodeKind::Namespace => Err(SchemaError::UnresolvedReference {
                name: type_name.to_string(),
                scope: self.full_name(scope),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, Rule};
    use crate::node::{EnumType, MessageType};

    fn message_with(fields: Vec<Field>) -> MessageType {
        MessageType {
            fields,
            ..MessageType::default()
        }
    }

    #[test]
    fn test_scalar_fields_resolve_without_lookup() {
        let mut root = Root::new();
        let ns = root.define("pkg");
        root.add_message(ns, "M", message_with(vec![Field::new("a", 1, "int32")]))
            .unwrap();
        root.resolve_all().unwrap();

        let m = root.lookup_type("pkg.M").unwrap();
        let field = root.message(m).unwrap().field_by_id(1).unwrap();
        assert_eq!(
            field.resolved,
            Some(ResolvedType::Scalar(ironproto_core::ScalarType::Int32))
        );
    }

    #[test]
    fn test_cyclic_reference_resolves_by_index() {
        let mut root = Root::new();
        let ns = root.define("pkg");
        root.add_message(ns, "Node", message_with(vec![Field::new("next", 1, "Node")]))
            .unwrap();
        root.resolve_all().unwrap();

        let n = root.lookup_type("pkg.Node").unwrap();
        let message = root.message(n).unwrap();
        let own_index = message.index.unwrap();
        assert_eq!(
            message.field_by_id(1).unwrap().resolved,
            Some(ResolvedType::Message(own_index))
        );
    }

    #[test]
    fn test_enum_reference_resolves() {
        let mut root = Root::new();
        let ns = root.define("pkg");
        let mut e = EnumType::default();
        e.values.insert("RED".into(), 0);
        e.values.insert("BLUE".into(), 1);
        let color = root.add_enum(ns, "Color", e).unwrap();
        root.add_message(ns, "M", message_with(vec![Field::new("c", 1, "Color")]))
            .unwrap();
        root.resolve_all().unwrap();

        let m = root.lookup_type("pkg.M").unwrap();
        assert_eq!(
            root.message(m).unwrap().field_by_id(1).unwrap().resolved,
            Some(ResolvedType::Enum(color))
        );
    }

    #[test]
    fn test_unresolved_reference_reports_scope() {
        let mut root = Root::new();
        let ns = root.define("pkg");
        root.add_message(ns, "M", message_with(vec![Field::new("x", 1, "Missing")]))
            .unwrap();
        let err = root.resolve_all().unwrap_err();
        match err {
            SchemaError::UnresolvedReference { name, scope } => {
                assert_eq!(name, "Missing");
                assert_eq!(scope, ".pkg.M");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_dangling_extension_fails_resolve_all() {
        let mut root = Root::new();
        let ns = root.define("pkg");
        let mut ext = Field::new("x", 100, "int32");
        ext.extend = Some("Nowhere".to_string());
        root.add_extension(ns, ext);

        let err = root.resolve_all().unwrap_err();
        match err {
            SchemaError::UnresolvableExtensions { extensions } => {
                assert_eq!(extensions.len(), 1);
                assert_eq!(extensions[0].target, "Nowhere");
                assert_eq!(extensions[0].declared_in, ".pkg");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_field_id_rejected() {
        let mut root = Root::new();
        let ns = root.define("pkg");
        root.add_message(
            ns,
            "M",
            message_with(vec![Field::new("a", 1, "int32"), Field::new("b", 1, "int32")]),
        )
        .unwrap();
        let err = root.resolve_all().unwrap_err();
        assert!(matches!(err, SchemaError::InvalidFieldId { id: 1, .. }));
    }

    #[test]
    fn test_required_rule_survives_resolution() {
        let mut root = Root::new();
        let ns = root.define("pkg");
        let mut f = Field::new("a", 1, "int32");
        f.rule = Rule::Required;
        root.add_message(ns, "M", message_with(vec![f])).unwrap();
        root.resolve_all().unwrap();
        let m = root.lookup_type("pkg.M").unwrap();
        assert_eq!(
            root.message(m).unwrap().field_by_id(1).unwrap().rule,
            Rule::Required
        );
    }
}
