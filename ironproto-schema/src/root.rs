//! The schema root: arena, namespace tree, type registry, deferred extensions.

use std::collections::HashSet;

use crate::error::SchemaError;
use crate::field::Field;
use crate::node::{EnumType, MessageType, Node, NodeId, NodeKind, TypeIndex};

/// Owner of a schema graph.
///
/// A `Root` is built up by the loader (file by file), then frozen by
/// [`resolve_all`](Root::resolve_all); afterwards it is treated as immutable
/// and may be shared freely across decoding threads.
#[derive(Debug, Clone)]
pub struct Root {
    nodes: Vec<Node>,
    registry: Vec<NodeId>,
    pub(crate) deferred: Vec<(NodeId, usize)>,
    files: HashSet<String>,
}

/// View of an uppercase-named namespace child, mirroring the statics that
/// generated code would expose. For an enum the view is its value mapping,
/// not the enum object.
#[derive(Debug)]
pub enum Exposed<'a> {
    /// A nested message type.
    Type(&'a MessageType),
    /// A nested enum's name → number mapping.
    Values(&'a std::collections::BTreeMap<String, i32>),
    /// A nested namespace.
    Namespace(NodeId),
}

impl Root {
    /// Creates an empty root namespace.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::namespace("", None)],
            registry: Vec::new(),
            deferred: Vec::new(),
            files: HashSet::new(),
        }
    }

    /// The root namespace node.
    #[must_use]
    pub const fn root_id(&self) -> NodeId {
        0
    }

    /// Borrows a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    /// Borrows a node's message payload.
    #[must_use]
    pub fn message(&self, id: NodeId) -> Option<&MessageType> {
        self.node(id).as_message()
    }

    pub(crate) fn message_mut(&mut self, id: NodeId) -> Option<&mut MessageType> {
        match &mut self.node_mut(id).kind {
            NodeKind::Message(m) => Some(m),
            _ => None,
        }
    }

    /// Fully-qualified dotted name of a node, with a leading dot
    /// (e.g. `.google.protobuf.Timestamp`). The root itself is `""`.
    #[must_use]
    pub fn full_name(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        let mut cur = Some(id);
        while let Some(n) = cur {
            parts.push(self.nodes[n].name.clone());
            cur = self.nodes[n].parent;
        }
        parts.reverse();
        parts.join(".")
    }

    /// Gets a direct child of a namespace by name.
    #[must_use]
    pub fn get(&self, ns: NodeId, name: &str) -> Option<NodeId> {
        self.node(ns).children.get(name).copied()
    }

    /// Iterates a namespace's children in name order.
    pub fn children(&self, ns: NodeId) -> impl Iterator<Item = (&str, NodeId)> {
        self.node(ns)
            .children
            .iter()
            .map(|(name, &id)| (name.as_str(), id))
    }

    /// Total number of nodes in the arena.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Gets or creates the namespace chain for a dotted path such as a
    /// package name. A leading dot is accepted and ignored.
    pub fn define(&mut self, path: &str) -> NodeId {
        let mut cur = self.root_id();
        for part in path.trim_start_matches('.').split('.') {
            if part.is_empty() {
                continue;
            }
            cur = match self.nodes[cur].children.get(part) {
                Some(&id) => id,
                None => {
                    let id = self.nodes.len();
                    self.nodes.push(Node::namespace(part, Some(cur)));
                    self.nodes[cur].children.insert(part.to_string(), id);
                    id
                }
            };
        }
        cur
    }

    /// Gets or creates a single namespace child under `parent`.
    ///
    /// # Errors
    /// `DuplicateName` if a non-namespace child already uses the name.
    pub fn define_child(&mut self, parent: NodeId, name: &str) -> Result<NodeId, SchemaError> {
        self.add_node(parent, name, NodeKind::Namespace)
    }

    fn add_node(&mut self, parent: NodeId, name: &str, kind: NodeKind) -> Result<NodeId, SchemaError> {
        if let Some(&existing) = self.nodes[parent].children.get(name) {
            // Two namespaces with one name merge; anything else collides.
            if matches!(self.nodes[existing].kind, NodeKind::Namespace)
                && matches!(kind, NodeKind::Namespace)
            {
                return Ok(existing);
            }
            return Err(SchemaError::DuplicateName {
                name: name.to_string(),
                namespace: self.full_name(parent),
            });
        }
        let id = self.nodes.len();
        self.nodes.push(Node {
            name: name.to_string(),
            parent: Some(parent),
            children: std::collections::BTreeMap::new(),
            extensions: Vec::new(),
            kind,
        });
        self.nodes[parent].children.insert(name.to_string(), id);
        Ok(id)
    }

    /// Adds a message type under a namespace or enclosing message.
    ///
    /// Adding a type retries every deferred extension, so load order between
    /// extending files and extended types does not matter.
    pub fn add_message(
        &mut self,
        parent: NodeId,
        name: &str,
        message: MessageType,
    ) -> Result<NodeId, SchemaError> {
        let id = self.add_node(parent, name, NodeKind::Message(message))?;
        self.retry_deferred();
        Ok(id)
    }

    /// Adds an enum type under a namespace or enclosing message.
    pub fn add_enum(
        &mut self,
        parent: NodeId,
        name: &str,
        value: EnumType,
    ) -> Result<NodeId, SchemaError> {
        self.add_node(parent, name, NodeKind::Enum(value))
    }

    /// Declares an extension field in `container`'s scope.
    ///
    /// If the target type is already present the sister field is attached
    /// immediately; otherwise the extension is deferred until the target
    /// arrives (or `resolve_all` reports it unresolvable).
    pub fn add_extension(&mut self, container: NodeId, field: Field) {
        self.node_mut(container).extensions.push(field);
        let index = self.node(container).extensions.len() - 1;
        if !self.try_attach_extension(container, index) {
            self.deferred.push((container, index));
        }
    }

    /// Attempts to attach one declared extension to its target type.
    ///
    /// Returns false when the target is not loaded yet. Attaching is
    /// idempotent: a target that already carries a field with the sister's
    /// name is left untouched.
    pub(crate) fn try_attach_extension(&mut self, container: NodeId, index: usize) -> bool {
        let decl = &self.node(container).extensions[index];
        let Some(target_name) = decl.extend.clone() else {
            return true;
        };
        let Some(target) = self.lookup(container, &target_name) else {
            return false;
        };
        if self.node(target).as_message().is_none() {
            return false;
        }

        let sister_name = format!("{}.{}", self.full_name(container), decl.name);
        let mut sister = Field::new(&sister_name, decl.id, decl.type_name.clone());
        sister.rule = decl.rule;
        sister.packed = decl.packed;
        sister.group = decl.group;
        sister.options = decl.options.clone();
        sister.declaring_field = Some((container, index));

        let message = match &mut self.node_mut(target).kind {
            NodeKind::Message(m) => m,
            _ => return false,
        };
        let field_index = match message.fields.iter().position(|f| f.name == sister_name) {
            Some(existing) => existing,
            None => {
                message.fields.push(sister);
                message.fields.len() - 1
            }
        };
        self.node_mut(container).extensions[index].extension_field = Some((target, field_index));
        true
    }

    pub(crate) fn retry_deferred(&mut self) {
        let pending = std::mem::take(&mut self.deferred);
        for (container, index) in pending {
            if !self.try_attach_extension(container, index) {
                self.deferred.push((container, index));
            }
        }
    }

    /// Resolves a symbolic name from a scope, walking the lexical chain
    /// inner-to-outer up to the root. A leading dot makes the name fully
    /// qualified.
    #[must_use]
    pub fn lookup(&self, from: NodeId, name: &str) -> Option<NodeId> {
        if let Some(rest) = name.strip_prefix('.') {
            return self.descend(self.root_id(), rest);
        }
        let mut scope = Some(from);
        while let Some(s) = scope {
            if let Some(found) = self.descend(s, name) {
                return Some(found);
            }
            scope = self.node(s).parent;
        }
        None
    }

    fn descend(&self, base: NodeId, dotted: &str) -> Option<NodeId> {
        let mut cur = base;
        for part in dotted.split('.') {
            cur = *self.node(cur).children.get(part)?;
        }
        Some(cur)
    }

    /// Looks up a message type by (possibly fully-qualified) name from the
    /// root scope.
    #[must_use]
    pub fn lookup_type(&self, name: &str) -> Option<NodeId> {
        self.lookup(self.root_id(), name)
            .filter(|&id| self.node(id).as_message().is_some())
    }

    /// Looks up an enum by name from the root scope.
    #[must_use]
    pub fn lookup_enum(&self, name: &str) -> Option<NodeId> {
        self.lookup(self.root_id(), name)
            .filter(|&id| self.node(id).as_enum().is_some())
    }

    /// Reflection view of an uppercase-named child (a code-generated-statics
    /// convenience). Lowercase names return `None`.
    #[must_use]
    pub fn exposed(&self, ns: NodeId, name: &str) -> Option<Exposed<'_>> {
        if !name.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
            return None;
        }
        let id = self.get(ns, name)?;
        match &self.node(id).kind {
            NodeKind::Message(m) => Some(Exposed::Type(m)),
            NodeKind::Enum(e) => Some(Exposed::Values(&e.values)),
            NodeKind::Namespace => Some(Exposed::Namespace(id)),
        }
    }

    /// Marks a resolved filename as processed. Returns false if it already
    /// was, in which case the caller skips the file.
    pub fn mark_file(&mut self, resolved: &str) -> bool {
        self.files.insert(resolved.to_string())
    }

    /// Returns true if a resolved filename has been processed.
    #[must_use]
    pub fn has_file(&self, resolved: &str) -> bool {
        self.files.contains(resolved)
    }

    pub(crate) fn register_type(&mut self, id: NodeId) -> TypeIndex {
        if let Some(index) = self.node(id).as_message().and_then(|m| m.index) {
            return index;
        }
        let index = self.registry.len();
        self.registry.push(id);
        if let Some(m) = self.message_mut(id) {
            m.index = Some(index);
        }
        index
    }

    /// The node behind a registry index.
    #[must_use]
    pub fn type_node(&self, index: TypeIndex) -> NodeId {
        self.registry[index]
    }

    /// Resolved message types in registry order.
    #[must_use]
    pub fn registry(&self) -> &[NodeId] {
        &self.registry
    }
}

impl Default for Root {
    fn default() -> Self {
        Self::new()
    }
}
