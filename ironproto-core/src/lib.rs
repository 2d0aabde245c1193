//! # IronProto Core
//!
//! Wire-format primitives for the IronProto runtime.
//!
//! This crate provides:
//! - [`Reader`] cursor for decoding base wire primitives (varint, fixed, length-delimited)
//! - [`WireType`] and tag helpers for the five standard wire types
//! - [`ScalarType`] definitions mapping protobuf scalar names to wire behaviour
//! - [`Value`] / [`MessageValue`] intermediate representation for decoded messages
//! - Error types for decoding operations

pub mod error;
pub mod reader;
pub mod types;
pub mod value;
pub mod wire;

pub use error::{DecodeError, Result};
pub use reader::Reader;
pub use types::ScalarType;
pub use value::{MapKey, MessageValue, Value};
pub use wire::{MAX_FIELD_ID, WireType, tag, tag_field_id, tag_wire_type};
