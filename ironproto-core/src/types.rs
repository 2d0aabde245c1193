//! Protobuf scalar type definitions.
//!
//! This module maps the scalar type names that appear in schemas to their
//! wire behaviour: basic wire type, packability, and default values.

use crate::value::Value;
use crate::wire::WireType;

/// Protobuf scalar type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// 64-bit IEEE 754, fixed64 on the wire.
    Double,
    /// 32-bit IEEE 754, fixed32 on the wire.
    Float,
    /// Signed varint, no ZigZag.
    Int32,
    /// Unsigned varint.
    Uint32,
    /// ZigZag-encoded signed varint.
    Sint32,
    /// Unsigned 32-bit fixed width.
    Fixed32,
    /// Signed 32-bit fixed width.
    Sfixed32,
    /// Signed varint, no ZigZag.
    Int64,
    /// Unsigned varint.
    Uint64,
    /// ZigZag-encoded signed varint.
    Sint64,
    /// Unsigned 64-bit fixed width.
    Fixed64,
    /// Signed 64-bit fixed width.
    Sfixed64,
    /// Single-byte varint.
    Bool,
    /// Length-delimited UTF-8.
    String,
    /// Length-delimited raw bytes.
    Bytes,
}

impl ScalarType {
    /// Parses a scalar type from its schema name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "double" => Some(Self::Double),
            "float" => Some(Self::Float),
            "int32" => Some(Self::Int32),
            "uint32" => Some(Self::Uint32),
            "sint32" => Some(Self::Sint32),
            "fixed32" => Some(Self::Fixed32),
            "sfixed32" => Some(Self::Sfixed32),
            "int64" => Some(Self::Int64),
            "uint64" => Some(Self::Uint64),
            "sint64" => Some(Self::Sint64),
            "fixed64" => Some(Self::Fixed64),
            "sfixed64" => Some(Self::Sfixed64),
            "bool" => Some(Self::Bool),
            "string" => Some(Self::String),
            "bytes" => Some(Self::Bytes),
            _ => None,
        }
    }

    /// Returns the schema name of this scalar type.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Float => "float",
            Self::Int32 => "int32",
            Self::Uint32 => "uint32",
            Self::Sint32 => "sint32",
            Self::Fixed32 => "fixed32",
            Self::Sfixed32 => "sfixed32",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Sint64 => "sint64",
            Self::Fixed64 => "fixed64",
            Self::Sfixed64 => "sfixed64",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Bytes => "bytes",
        }
    }

    /// Returns the basic wire type used for a single value of this scalar.
    #[must_use]
    pub const fn basic_wire_type(&self) -> WireType {
        match self {
            Self::Int32
            | Self::Uint32
            | Self::Sint32
            | Self::Int64
            | Self::Uint64
            | Self::Sint64
            | Self::Bool => WireType::Varint,
            Self::Fixed64 | Self::Sfixed64 | Self::Double => WireType::Fixed64,
            Self::Fixed32 | Self::Sfixed32 | Self::Float => WireType::Fixed32,
            Self::String | Self::Bytes => WireType::LengthDelimited,
        }
    }

    /// Returns true if repeated values of this scalar may be packed into a
    /// single length-delimited payload.
    #[must_use]
    pub const fn is_packable(&self) -> bool {
        !matches!(self, Self::String | Self::Bytes)
    }

    /// Returns true if this scalar may be used as a map key type
    /// (any integral type, bool, or string).
    #[must_use]
    pub const fn is_map_key(&self) -> bool {
        matches!(
            self,
            Self::Int32
                | Self::Uint32
                | Self::Sint32
                | Self::Fixed32
                | Self::Sfixed32
                | Self::Int64
                | Self::Uint64
                | Self::Sint64
                | Self::Fixed64
                | Self::Sfixed64
                | Self::Bool
                | Self::String
        )
    }

    /// Returns the zero value of this scalar, used for absent map sub-fields.
    #[must_use]
    pub fn zero_value(&self) -> Value {
        match self {
            Self::Double => Value::F64(0.0),
            Self::Float => Value::F32(0.0),
            Self::Int32 | Self::Sint32 | Self::Sfixed32 => Value::I32(0),
            Self::Uint32 | Self::Fixed32 => Value::U32(0),
            Self::Int64 | Self::Sint64 | Self::Sfixed64 => Value::I64(0),
            Self::Uint64 | Self::Fixed64 => Value::U64(0),
            Self::Bool => Value::Bool(false),
            Self::String => Value::String(String::new()),
            Self::Bytes => Value::Bytes(bytes::Bytes::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for name in [
            "double", "float", "int32", "uint32", "sint32", "fixed32", "sfixed32", "int64",
            "uint64", "sint64", "fixed64", "sfixed64", "bool", "string", "bytes",
        ] {
            let t = ScalarType::from_name(name).expect(name);
            assert_eq!(t.name(), name);
        }
        assert!(ScalarType::from_name("group").is_none());
    }

    #[test]
    fn test_basic_wire_types() {
        assert_eq!(ScalarType::Int32.basic_wire_type(), WireType::Varint);
        assert_eq!(ScalarType::Double.basic_wire_type(), WireType::Fixed64);
        assert_eq!(ScalarType::Float.basic_wire_type(), WireType::Fixed32);
        assert_eq!(
            ScalarType::String.basic_wire_type(),
            WireType::LengthDelimited
        );
    }

    #[test]
    fn test_packability() {
        assert!(ScalarType::Sint64.is_packable());
        assert!(ScalarType::Bool.is_packable());
        assert!(!ScalarType::String.is_packable());
        assert!(!ScalarType::Bytes.is_packable());
    }
}
