//! # IronProto Codec
//!
//! Schema-driven message decoding for the IronProto runtime.
//!
//! This crate provides:
//! - [`Codec::compile`]: one dispatch plan per resolved message type
//! - [`Codec::decode`]: the generic decode loop interpreting those plans
//! - [`DecodeOptions`] for decode-time limits
//! - Error types preserving the partially-decoded instance on contract
//!   violations

pub mod decode;
pub mod error;
pub mod plan;

pub use decode::{Codec, DecodeOptions};
pub use error::{CodecError, Result};
pub use plan::{FieldAction, MapValue, MessagePlan, TagEntry};
