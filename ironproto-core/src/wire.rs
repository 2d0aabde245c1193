//! Wire-type and tag helpers.
//!
//! Every field on the wire is preceded by a varint tag packing the field id
//! and one of the five standard wire types: `tag = (field_id << 3) | wire_type`.

use crate::error::DecodeError;

/// Maximum protobuf field id, `2^29 - 1`.
pub const MAX_FIELD_ID: u32 = (1 << 29) - 1;

/// The five standard protobuf wire types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    /// Base-128 varint (wire type 0).
    Varint,
    /// 64-bit little-endian fixed width (wire type 1).
    Fixed64,
    /// Length-delimited payload (wire type 2).
    LengthDelimited,
    /// Group start marker (wire type 3).
    StartGroup,
    /// Group end marker (wire type 4).
    EndGroup,
    /// 32-bit little-endian fixed width (wire type 5).
    Fixed32,
}

impl WireType {
    /// Returns the numeric wire type value (0..=5).
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        match self {
            Self::Varint => 0,
            Self::Fixed64 => 1,
            Self::LengthDelimited => 2,
            Self::StartGroup => 3,
            Self::EndGroup => 4,
            Self::Fixed32 => 5,
        }
    }

    /// Parses a wire type from the low three bits of a tag.
    ///
    /// # Errors
    /// Returns `InvalidWireType` for the reserved values 6 and 7.
    pub const fn from_tag(tag: u32, offset: usize) -> Result<Self, DecodeError> {
        match tag & 7 {
            0 => Ok(Self::Varint),
            1 => Ok(Self::Fixed64),
            2 => Ok(Self::LengthDelimited),
            3 => Ok(Self::StartGroup),
            4 => Ok(Self::EndGroup),
            5 => Ok(Self::Fixed32),
            wt => Err(DecodeError::InvalidWireType {
                wire_type: wt,
                offset,
            }),
        }
    }
}

/// Packs a field id and wire type into a tag.
///
/// Arithmetic is unsigned 32-bit, so every id up to [`MAX_FIELD_ID`] packs
/// without overflow.
#[inline(always)]
#[must_use]
pub const fn tag(field_id: u32, wire_type: WireType) -> u32 {
    (field_id << 3) | wire_type.as_u32()
}

/// Extracts the field id from a tag.
#[inline(always)]
#[must_use]
pub const fn tag_field_id(tag: u32) -> u32 {
    tag >> 3
}

/// Extracts the raw wire type bits from a tag.
#[inline(always)]
#[must_use]
pub const fn tag_wire_type(tag: u32) -> u32 {
    tag & 7
}
