//! Wire-format classification.
//!
//! https://protobuf.dev/programming-guides/encoding/
use crate::schema::ScalarKind;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// The four live wire types. Discriminants are the on-wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    /// fixed64, sfixed64, double
    I64 = 1,
    /// string, bytes, embedded messages, packed repeated fields
    Len = 2,
    /// fixed32, sfixed32, float
    I32 = 5,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

/// Wire type of a scalar kind. Total over the closed kind set.
pub fn wire_type(kind: ScalarKind) -> WireType {
    match kind {
        ScalarKind::Bool
        | ScalarKind::Int32
        | ScalarKind::Int64
        | ScalarKind::Uint32
        | ScalarKind::Uint64
        | ScalarKind::Sint32
        | ScalarKind::Sint64
        | ScalarKind::Enum => WireType::Varint,
        ScalarKind::Fixed32 | ScalarKind::Sfixed32 | ScalarKind::Float => WireType::I32,
        ScalarKind::Fixed64 | ScalarKind::Sfixed64 | ScalarKind::Double => WireType::I64,
        ScalarKind::String | ScalarKind::Bytes => WireType::Len,
    }
}

/// The varint key a field's tag and wire type serialize to.
pub fn field_key(tag: u32, wire: WireType) -> u32 {
    (tag << 3) | wire as u32
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classifier_matches_encoding_spec() {
        assert_eq!(wire_type(ScalarKind::Bool), WireType::Varint);
        assert_eq!(wire_type(ScalarKind::Int32), WireType::Varint);
        assert_eq!(wire_type(ScalarKind::Sint64), WireType::Varint);
        assert_eq!(wire_type(ScalarKind::Enum), WireType::Varint);
        assert_eq!(wire_type(ScalarKind::Fixed32), WireType::I32);
        assert_eq!(wire_type(ScalarKind::Sfixed32), WireType::I32);
        assert_eq!(wire_type(ScalarKind::Float), WireType::I32);
        assert_eq!(wire_type(ScalarKind::Fixed64), WireType::I64);
        assert_eq!(wire_type(ScalarKind::Sfixed64), WireType::I64);
        assert_eq!(wire_type(ScalarKind::Double), WireType::I64);
        assert_eq!(wire_type(ScalarKind::String), WireType::Len);
        assert_eq!(wire_type(ScalarKind::Bytes), WireType::Len);
    }

    #[test]
    fn field_key_packs_tag_and_wire() {
        assert_eq!(field_key(1, WireType::Varint), 0x08);
        assert_eq!(field_key(2, WireType::Len), 0x12);
        assert_eq!(field_key(3, WireType::Len), 0x1a);
        assert_eq!(field_key(7, WireType::I32), 0x3d);
        assert_eq!(field_key(16, WireType::Varint), 0x80);
    }
}
