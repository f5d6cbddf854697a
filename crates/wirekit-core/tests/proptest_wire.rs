//! Property-based tests for wire primitives and descriptor blobs
//!
//! Every value written by a per-kind helper must read back unchanged and
//! occupy exactly the number of bytes its `encoded_len` reports.

use proptest::prelude::*;
use wirekit_core::wire::{self, Tag};
use wirekit_core::{FieldDescriptor, MessageDescriptor, WireKind};

fn read_tag(input: &mut &[u8]) -> Tag {
    wire::decode_tag(input).expect("tag written by encode should decode")
}

// Strategy: kinds that can appear in a descriptor
fn arb_kind() -> impl Strategy<Value = WireKind> {
    prop_oneof![
        Just(WireKind::Int32),
        Just(WireKind::Int64),
        Just(WireKind::UInt32),
        Just(WireKind::UInt64),
        Just(WireKind::Float),
        Just(WireKind::Double),
        Just(WireKind::Bool),
        Just(WireKind::String),
        Just(WireKind::Message),
    ]
}

proptest! {
    /// Property: varints roundtrip and report their length
    #[test]
    fn proptest_varint_roundtrip(value in any::<u64>()) {
        let mut buf = Vec::new();
        wire::encode_varint(value, &mut buf);

        prop_assert_eq!(buf.len(), wire::encoded_len_varint(value));

        let mut input = &buf[..];
        prop_assert_eq!(wire::decode_varint(&mut input), Ok(value));
        prop_assert!(input.is_empty());
    }

    /// Property: signed 32-bit fields roundtrip through sign extension
    #[test]
    fn proptest_int32_field_roundtrip(number in 1u32..=wire::MAX_FIELD_NUMBER, value in any::<i32>()) {
        let mut buf = Vec::new();
        wire::int32::encode(number, &value, &mut buf);
        prop_assert_eq!(buf.len(), wire::int32::encoded_len(number, &value));

        let mut input = &buf[..];
        let tag = read_tag(&mut input);
        prop_assert_eq!(tag.field_number(), number);

        let mut decoded = 0;
        wire::int32::merge(tag, &mut decoded, &mut input).unwrap();
        prop_assert_eq!(decoded, value);
    }

    /// Property: doubles roundtrip bit for bit, NaN payloads included
    #[test]
    fn proptest_double_field_roundtrip(bits in any::<u64>()) {
        let value = f64::from_bits(bits);
        let mut buf = Vec::new();
        wire::double::encode(1, &value, &mut buf);

        let mut input = &buf[..];
        let tag = read_tag(&mut input);
        let mut decoded = 0.0;
        wire::double::merge(tag, &mut decoded, &mut input).unwrap();

        prop_assert_eq!(decoded.to_bits(), bits);
    }

    /// Property: strings roundtrip and report their length
    #[test]
    fn proptest_string_field_roundtrip(value in ".*") {
        let mut buf = Vec::new();
        wire::string::encode(2, &value, &mut buf);
        prop_assert_eq!(buf.len(), wire::string::encoded_len(2, &value));

        let mut input = &buf[..];
        let tag = read_tag(&mut input);
        let mut decoded = String::new();
        wire::string::merge(tag, &mut decoded, &mut input).unwrap();

        prop_assert_eq!(decoded, value);
    }

    /// Property: any valid descriptor survives the blob encoding
    #[test]
    fn proptest_descriptor_blob_roundtrip(
        schema_name in "[A-Z][A-Za-z0-9]{0,20}",
        kinds in prop::collection::vec((arb_kind(), any::<bool>()), 0..12)
    ) {
        let fields = kinds
            .into_iter()
            .enumerate()
            .map(|(i, (kind, nullable))| {
                let field = FieldDescriptor::new(format!("field_{i}"), i as u32 + 1, kind)
                    .nullable(nullable);
                if kind == WireKind::Message {
                    field.with_type_name("Nested")
                } else {
                    field
                }
            })
            .collect();
        let descriptor = MessageDescriptor::new(schema_name, fields).unwrap();

        let decoded = MessageDescriptor::decode(&descriptor.encode_to_vec()).unwrap();

        prop_assert_eq!(decoded, descriptor);
    }

    /// Property: skipping never reads past the value it skips
    #[test]
    fn proptest_skip_field_consumes_only_the_field(value in ".*", trailer in any::<u8>()) {
        let mut buf = Vec::new();
        wire::string::encode(9, &value, &mut buf);
        buf.push(trailer);

        let mut input = &buf[..];
        let tag = read_tag(&mut input);
        wire::skip_field(tag, &mut input).unwrap();

        prop_assert_eq!(input, &[trailer][..]);
    }
}
