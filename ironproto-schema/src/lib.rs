//! # IronProto Schema
//!
//! Schema model and resolver for the IronProto runtime.
//!
//! This crate provides:
//! - The reflection tree: [`Root`], namespaces, message types, enums, oneofs
//! - [`Field`] declarations with cardinality, map/group markers, and options
//! - JSON descriptor ingestion ([`Root::add_json`])
//! - The resolution pass ([`Root::resolve_all`]): symbolic name resolution,
//!   type registry indices, deferred extension attachment

pub mod error;
pub mod field;
mod json;
pub mod node;
mod resolve;
pub mod root;

pub use error::{SchemaError, UnresolvedExtension};
pub use field::{Field, OneOf, ResolvedType, Rule};
pub use node::{EnumType, MessageType, Node, NodeId, NodeKind, TypeIndex};
pub use root::{Exposed, Root};
