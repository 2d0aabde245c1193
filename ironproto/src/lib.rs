//! # IronProto
//!
//! Reflection-based Protocol Buffers runtime for Rust.
//!
//! IronProto loads message schemas at runtime (from JSON descriptors, a
//! bundled set of well-known types, or `.proto` text through a pluggable
//! parser) and decodes binary wire-format payloads against them without
//! generated code.
//!
//! ## Features
//!
//! - **Schema-driven decoding** - Per-type dispatch plans interpreted by one
//!   generic decode loop; scalars, enums, nested messages, groups, packed
//!   and unpacked repeated fields, and maps
//! - **Hostile-input hardening** - Truncation, malformed varints, reserved
//!   wire types, and nesting depth are all hard errors, never panics
//! - **Import graph loading** - Synchronous and asynchronous traversal with
//!   at-most-once fetching, weak imports, and deferred extensions
//! - **Well-known types built in** - `google/protobuf/*` descriptors resolve
//!   without touching the fetcher
//!
//! ## Quick Start
//!
//! ```ignore
//! use ironproto::prelude::*;
//!
//! let loader = Loader::new(FsFetcher::new("proto"));
//! let mut root = loader.load(&["app.json"]).await?;
//! root.resolve_all()?;
//!
//! let codec = Codec::compile(&root)?;
//! let message = codec.decode("app.Envelope", &payload)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Reader cursor, wire primitives, decoded value representation
//! - [`schema`] - Reflection tree, JSON descriptors, resolution pass
//! - [`codec`] - Dispatch plans and the decode loop
//! - [`loader`] - Fetch/parse collaborators and import graph traversal

pub mod prelude;

/// Wire-format primitives and the decoded value representation.
pub mod core {
    pub use ironproto_core::*;
}

/// Schema model and resolver.
pub mod schema {
    pub use ironproto_schema::*;
}

/// Schema-driven decoding.
pub mod codec {
    pub use ironproto_codec::*;
}

/// Root loading and collaborator traits.
pub mod loader {
    pub use ironproto_loader::*;
}

// Re-export commonly used items at the crate root
pub use ironproto_core::{
    reader::Reader,
    value::{MapKey, MessageValue, Value},
};

pub use ironproto_schema::{Root, SchemaError};

pub use ironproto_codec::{Codec, CodecError, DecodeOptions};

pub use ironproto_loader::{Fetch, FsFetcher, LoadError, Loader, MemoryFetcher, Parse};
