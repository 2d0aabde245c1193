//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use ironproto::prelude::*;
//! ```

// Core types
pub use ironproto_core::error::{DecodeError, Result as DecodeResult};
pub use ironproto_core::reader::Reader;
pub use ironproto_core::types::ScalarType;
pub use ironproto_core::value::{MapKey, MessageValue, Value};
pub use ironproto_core::wire::WireType;

// Schema types
pub use ironproto_schema::{
    EnumType, Exposed, Field, MessageType, OneOf, ResolvedType, Root, Rule, SchemaError,
};

// Codec types
pub use ironproto_codec::{Codec, CodecError, DecodeOptions};

// Loader types
pub use ironproto_loader::{
    Fetch, FetchError, FsFetcher, LoadError, LoadOptions, Loader, MemoryFetcher, Parse,
    ParseError, ParsedFile,
};
