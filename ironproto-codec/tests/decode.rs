//! Decode-loop integration tests over JSON-declared schemas.

use hex_literal::hex;
use ironproto_codec::{Codec, CodecError, DecodeOptions};
use ironproto_core::{DecodeError, MapKey, Value};
use ironproto_schema::Root;

fn codec_for(descriptor: &str) -> Codec {
    let mut root = Root::new();
    root.add_json(descriptor).expect("descriptor");
    root.resolve_all().expect("resolve");
    Codec::compile(&root).expect("compile")
}

#[test]
fn scalar_fields() {
    let codec = codec_for(
        r#"{ "nested": { "M": { "fields": {
            "a": { "type": "int32", "id": 1 },
            "b": { "type": "string", "id": 2 }
        } } } }"#,
    );
    let m = codec.decode("M", &hex!("08 96 01 12 02 68 69")).unwrap();
    assert_eq!(m.get("a"), Some(&Value::I32(150)));
    assert_eq!(m.get("b"), Some(&Value::String("hi".into())));
}

#[test]
fn packed_and_unpacked_forms_agree() {
    let codec = codec_for(
        r#"{ "nested": { "M": { "fields": {
            "v": { "type": "int32", "id": 1, "rule": "repeated", "options": { "packed": true } }
        } } } }"#,
    );
    let packed = codec.decode("M", &hex!("0A 03 01 02 03")).unwrap();
    let unpacked = codec.decode("M", &hex!("08 01 08 02 08 03")).unwrap();
    let expected = Value::List(vec![Value::I32(1), Value::I32(2), Value::I32(3)]);
    assert_eq!(packed.get("v"), Some(&expected));
    assert_eq!(packed, unpacked);
}

#[test]
fn string_keyed_map() {
    let codec = codec_for(
        r#"{ "nested": { "M": { "fields": {
            "m": { "type": "int32", "id": 1, "keyType": "string" }
        } } } }"#,
    );
    let m = codec
        .decode(
            "M",
            &hex!("0A 07 0A 03 66 6F 6F 10 2A 0A 07 0A 03 62 61 72 10 0B"),
        )
        .unwrap();
    let map = m.get("m").unwrap().as_map().unwrap();
    assert_eq!(map.get(&MapKey::String("foo".into())), Some(&Value::I32(42)));
    assert_eq!(map.get(&MapKey::String("bar".into())), Some(&Value::I32(11)));
    assert_eq!(map.len(), 2);
}

#[test]
fn missing_required_keeps_partial_instance() {
    let codec = codec_for(
        r#"{ "nested": { "M": { "fields": {
            "a": { "type": "int32", "id": 1, "rule": "required" },
            "b": { "type": "int32", "id": 2, "rule": "required" }
        } } } }"#,
    );
    let err = codec.decode("M", &hex!("08 05")).unwrap_err();
    match err {
        CodecError::MissingRequired { field, partial, .. } => {
            assert_eq!(field, "b");
            assert_eq!(partial.get("a").and_then(Value::as_i32), Some(5));
        }
        other => panic!("expected missing-required, got {other}"),
    }
}

#[test]
fn missing_required_error_message() {
    let codec = codec_for(
        r#"{ "nested": { "M": { "fields": {
            "a": { "type": "int32", "id": 1, "rule": "required" },
            "b": { "type": "int32", "id": 2, "rule": "required" }
        } } } }"#,
    );
    let err = codec.decode("M", &hex!("08 05")).unwrap_err();
    assert_eq!(err.to_string(), "missing required 'b'");
}

#[test]
fn unknown_fields_are_skipped() {
    let codec = codec_for(
        r#"{ "nested": { "M": { "fields": {
            "a": { "type": "int32", "id": 1 }
        } } } }"#,
    );
    let with_unknown = codec.decode("M", &hex!("08 05 1A 03 66 6F 6F")).unwrap();
    let without = codec.decode("M", &hex!("08 05")).unwrap();
    assert_eq!(with_unknown, without);
    assert_eq!(with_unknown.get("a"), Some(&Value::I32(5)));
}

#[test]
fn unknown_group_is_skipped_with_id_check() {
    let codec = codec_for(
        r#"{ "nested": { "M": { "fields": {
            "a": { "type": "int32", "id": 1 }
        } } } }"#,
    );
    // Unknown field 3 as a group: start 0x1B ... end 0x1C.
    let m = codec.decode("M", &hex!("1B 08 07 1C 08 05")).unwrap();
    assert_eq!(m.get("a"), Some(&Value::I32(5)));

    // Same group terminated by the wrong id never matches.
    let err = codec.decode("M", &hex!("1B 08 07 24 08 05")).unwrap_err();
    assert!(matches!(
        err,
        CodecError::Decode(DecodeError::Truncated { .. })
    ));
}

#[test]
fn nested_message_decodes_with_limit() {
    let codec = codec_for(
        r#"{ "nested": { "Outer": { "fields": {
            "inner": { "type": "Inner", "id": 1 },
            "tail": { "type": "int32", "id": 2 }
        }, "nested": { "Inner": { "fields": {
            "x": { "type": "int32", "id": 1 }
        } } } } } }"#,
    );
    let m = codec.decode("Outer", &hex!("0A 02 08 07 10 09")).unwrap();
    let inner = m.get("inner").unwrap().as_message().unwrap();
    assert_eq!(inner.get("x"), Some(&Value::I32(7)));
    assert_eq!(m.get("tail"), Some(&Value::I32(9)));
}

#[test]
fn nested_length_beyond_parent_limit_is_truncated() {
    let codec = codec_for(
        r#"{ "nested": { "Outer": { "fields": {
            "inner": { "type": "Inner", "id": 1 }
        }, "nested": { "Inner": { "fields": {
            "x": { "type": "int32", "id": 1 }
        } } } } } }"#,
    );
    let err = codec.decode("Outer", &hex!("0A 05 08 07")).unwrap_err();
    assert!(matches!(
        err,
        CodecError::Decode(DecodeError::Truncated { .. })
    ));
}

#[test]
fn group_field_round_trip() {
    let codec = codec_for(
        r#"{ "nested": { "M": {
            "fields": { "g": { "type": "G", "id": 1 } },
            "nested": { "G": { "group": true, "fields": {
                "x": { "type": "int32", "id": 2 }
            } } }
        } } }"#,
    );
    // start-group(1) x=5 end-group(1), then nothing else.
    let m = codec.decode("M", &hex!("0B 10 05 0C")).unwrap();
    let g = m.get("g").unwrap().as_message().unwrap();
    assert_eq!(g.get("x"), Some(&Value::I32(5)));
}

#[test]
fn group_without_end_tag_is_truncated() {
    let codec = codec_for(
        r#"{ "nested": { "M": {
            "fields": { "g": { "type": "G", "id": 1 } },
            "nested": { "G": { "group": true, "fields": {
                "x": { "type": "int32", "id": 2 }
            } } }
        } } }"#,
    );
    let err = codec.decode("M", &hex!("0B 10 05")).unwrap_err();
    assert!(matches!(
        err,
        CodecError::Decode(DecodeError::Truncated { .. })
    ));
}

#[test]
fn truncated_prefixes_fail_cleanly() {
    let codec = codec_for(
        r#"{ "nested": { "M": { "fields": {
            "a": { "type": "int32", "id": 1 },
            "b": { "type": "string", "id": 2 }
        } } } }"#,
    );
    let full = hex!("08 96 01 12 02 68 69");
    // Every prefix that ends mid-field fails with Truncated.
    for cut in [1, 2, 4, 5, 6] {
        let err = codec.decode("M", &full[..cut]).unwrap_err();
        assert!(
            matches!(err, CodecError::Decode(DecodeError::Truncated { .. })),
            "prefix of {cut} bytes: {err}"
        );
    }
    // Prefixes on a field boundary decode what they contain.
    let partial = codec.decode("M", &full[..3]).unwrap();
    assert_eq!(partial.get("a"), Some(&Value::I32(150)));
    assert_eq!(partial.get("b"), None);
}

#[test]
fn unknown_enum_values_are_preserved() {
    let codec = codec_for(
        r#"{ "nested": {
            "Color": { "values": { "RED": 0, "BLUE": 1 } },
            "M": { "fields": { "c": { "type": "Color", "id": 1 } } }
        } }"#,
    );
    let m = codec.decode("M", &hex!("08 2A")).unwrap();
    assert_eq!(m.get("c"), Some(&Value::I32(42)));
}

#[test]
fn oneof_members_clear_each_other() {
    let codec = codec_for(
        r#"{ "nested": { "M": {
            "oneofs": { "kind": { "oneof": ["a", "b"] } },
            "fields": {
                "a": { "type": "int32", "id": 1 },
                "b": { "type": "string", "id": 2 }
            }
        } } }"#,
    );
    // a=5 then b="hi": only the later member survives.
    let m = codec.decode("M", &hex!("08 05 12 02 68 69")).unwrap();
    assert_eq!(m.get("a"), None);
    assert_eq!(m.get("b"), Some(&Value::String("hi".into())));
}

#[test]
fn sixty_four_bit_map_keys_stay_native() {
    let codec = codec_for(
        r#"{ "nested": { "M": { "fields": {
            "m": { "type": "string", "id": 1, "keyType": "int64" }
        } } } }"#,
    );
    // key = 2^40, value = "x".
    let m = codec
        .decode("M", &hex!("0A 0A 08 80 80 80 80 80 20 12 01 78"))
        .unwrap();
    let map = m.get("m").unwrap().as_map().unwrap();
    assert_eq!(
        map.get(&MapKey::I64(1 << 40)),
        Some(&Value::String("x".into()))
    );
}

#[test]
fn map_entry_halves_default_when_absent() {
    let codec = codec_for(
        r#"{ "nested": { "M": { "fields": {
            "m": { "type": "int32", "id": 1, "keyType": "string" }
        } } } }"#,
    );
    // Entry with only a value: key defaults to "".
    let only_value = codec.decode("M", &hex!("0A 02 10 2A")).unwrap();
    let map = only_value.get("m").unwrap().as_map().unwrap();
    assert_eq!(map.get(&MapKey::String(String::new())), Some(&Value::I32(42)));

    // Entry with only a key: value defaults to zero.
    let only_key = codec.decode("M", &hex!("0A 05 0A 03 66 6F 6F")).unwrap();
    let map = only_key.get("m").unwrap().as_map().unwrap();
    assert_eq!(map.get(&MapKey::String("foo".into())), Some(&Value::I32(0)));
}

#[test]
fn recursion_depth_is_bounded() {
    let mut root = Root::new();
    root.add_json(
        r#"{ "nested": { "Node": { "fields": {
            "next": { "type": "Node", "id": 1 }
        } } } }"#,
    )
    .unwrap();
    root.resolve_all().unwrap();

    let shallow = Codec::compile_with(&root, DecodeOptions { max_depth: 2 }).unwrap();
    let err = shallow.decode("Node", &hex!("0A 02 0A 00")).unwrap_err();
    assert!(matches!(err, CodecError::DepthLimitExceeded { limit: 2 }));

    let deep = Codec::compile(&root).unwrap();
    assert!(deep.decode("Node", &hex!("0A 02 0A 00")).is_ok());
}

#[test]
fn fixed_width_scalars() {
    let codec = codec_for(
        r#"{ "nested": { "M": { "fields": {
            "f": { "type": "fixed32", "id": 1 },
            "d": { "type": "double", "id": 2 },
            "s": { "type": "sint32", "id": 3 }
        } } } }"#,
    );
    let mut buf = Vec::new();
    buf.extend_from_slice(&hex!("0D"));
    buf.extend_from_slice(&7u32.to_le_bytes());
    buf.extend_from_slice(&hex!("11"));
    buf.extend_from_slice(&(-2.5f64).to_le_bytes());
    buf.extend_from_slice(&hex!("18 03"));
    let m = codec.decode("M", &buf).unwrap();
    assert_eq!(m.get("f"), Some(&Value::U32(7)));
    assert_eq!(m.get("d"), Some(&Value::F64(-2.5)));
    assert_eq!(m.get("s"), Some(&Value::I32(-2)));
}
