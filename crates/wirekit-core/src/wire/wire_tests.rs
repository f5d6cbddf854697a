#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// ============================================================================
// Varints
// ============================================================================

#[test_case(0, &[0x00] ; "zero")]
#[test_case(1, &[0x01] ; "one")]
#[test_case(127, &[0x7f] ; "largest single byte")]
#[test_case(128, &[0x80, 0x01] ; "smallest two byte")]
#[test_case(300, &[0xac, 0x02] ; "three hundred")]
#[test_case(u64::MAX, &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01] ; "u64 max")]
fn encode_varint___value___produces_expected_bytes(value: u64, expected: &[u8]) {
    let mut buf = Vec::new();

    encode_varint(value, &mut buf);

    assert_eq!(buf, expected);
    assert_eq!(encoded_len_varint(value), expected.len());
}

#[test]
fn decode_varint___advances_past_value() {
    let bytes = [0xac, 0x02, 0x07];
    let mut buf = &bytes[..];

    let value = decode_varint(&mut buf).unwrap();

    assert_eq!(value, 300);
    assert_eq!(buf, &[0x07]);
}

#[test]
fn decode_varint___empty_input___is_eof() {
    let mut buf: &[u8] = &[];

    assert_eq!(decode_varint(&mut buf), Err(WireError::UnexpectedEof));
}

#[test]
fn decode_varint___unterminated___is_eof() {
    let mut buf: &[u8] = &[0x80, 0x80];

    assert_eq!(decode_varint(&mut buf), Err(WireError::UnexpectedEof));
}

#[test]
fn decode_varint___eleven_bytes___overflows() {
    let bytes = [0xff; 11];
    let mut buf = &bytes[..];

    assert_eq!(decode_varint(&mut buf), Err(WireError::VarintOverflow));
}

#[test]
fn decode_varint___tenth_byte_above_one___overflows() {
    let bytes = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x02];
    let mut buf = &bytes[..];

    assert_eq!(decode_varint(&mut buf), Err(WireError::VarintOverflow));
}

// ============================================================================
// Tags
// ============================================================================

#[test_case(1, WireType::Varint, &[0x08] ; "field 1 varint")]
#[test_case(2, WireType::LengthDelimited, &[0x12] ; "field 2 length delimited")]
#[test_case(15, WireType::Fixed32, &[0x7d] ; "last single byte tag")]
#[test_case(16, WireType::Varint, &[0x80, 0x01] ; "first two byte tag")]
fn encode_tag___number_and_type___produces_expected_bytes(
    number: u32,
    wire_type: WireType,
    expected: &[u8],
) {
    let mut buf = Vec::new();

    encode_tag(number, wire_type, &mut buf);

    assert_eq!(buf, expected);
    assert_eq!(tag_len(number), expected.len());
}

#[test]
fn decode_tag___splits_number_and_wire_type() {
    let mut buf: &[u8] = &[0x12];

    let tag = decode_tag(&mut buf).unwrap();

    assert_eq!(tag.field_number(), 2);
    assert_eq!(tag.wire_type(), WireType::LengthDelimited);
}

#[test]
fn decode_tag___field_zero___is_invalid() {
    let mut buf: &[u8] = &[0x00];

    assert_eq!(decode_tag(&mut buf), Err(WireError::InvalidTag(0)));
}

#[test]
fn decode_tag___reserved_wire_type___is_invalid() {
    let mut buf: &[u8] = &[0x0e];

    assert_eq!(decode_tag(&mut buf), Err(WireError::InvalidWireType(6)));
}

#[test]
fn Tag___to_raw___combines_number_and_type() {
    let tag = Tag::new(3, WireType::Fixed64);

    assert_eq!(tag.to_raw(), 0x19);
}

// ============================================================================
// Skipping unknown fields
// ============================================================================

#[test_case(&[0x08, 0x96, 0x01] ; "varint")]
#[test_case(&[0x09, 1, 2, 3, 4, 5, 6, 7, 8] ; "fixed64")]
#[test_case(&[0x0d, 1, 2, 3, 4] ; "fixed32")]
#[test_case(&[0x0a, 0x03, b'a', b'b', b'c'] ; "length delimited")]
#[test_case(&[0x0b, 0x10, 0x01, 0x0c] ; "group")]
fn skip_field___each_wire_type___consumes_exactly_the_value(field: &[u8]) {
    let mut bytes = field.to_vec();
    bytes.push(0xaa);
    let mut buf = &bytes[..];
    let tag = decode_tag(&mut buf).unwrap();

    skip_field(tag, &mut buf).unwrap();

    assert_eq!(buf, &[0xaa]);
}

#[test]
fn skip_field___mismatched_end_group___is_rejected() {
    // start group 1, end group 2
    let mut buf: &[u8] = &[0x0b, 0x14];
    let tag = decode_tag(&mut buf).unwrap();

    let err = skip_field(tag, &mut buf).unwrap_err();

    assert_eq!(
        err,
        WireError::UnmatchedEndGroup {
            expected: 1,
            actual: 2
        }
    );
}

#[test]
fn skip_field___deeply_nested_groups___hit_the_limit() {
    let bytes = vec![0x0b; MAX_GROUP_DEPTH + 2];
    let mut buf = &bytes[..];
    let tag = decode_tag(&mut buf).unwrap();

    let err = skip_field(tag, &mut buf).unwrap_err();

    assert_eq!(err, WireError::RecursionLimit(MAX_GROUP_DEPTH));
}

#[test]
fn skip_field___length_past_end___is_eof() {
    let mut buf: &[u8] = &[0x0a, 0x05, b'a'];
    let tag = decode_tag(&mut buf).unwrap();

    assert_eq!(skip_field(tag, &mut buf), Err(WireError::UnexpectedEof));
}

// ============================================================================
// Per-kind helpers
// ============================================================================

#[test]
fn int32___negative___uses_ten_byte_varint() {
    let mut buf = Vec::new();

    int32::encode(1, &-1, &mut buf);

    assert_eq!(buf.len(), 11);
    assert_eq!(int32::encoded_len(1, &-1), 11);
}

#[test]
fn int32___negative___roundtrips() {
    let mut buf = Vec::new();
    int32::encode(1, &i32::MIN, &mut buf);
    let mut input = &buf[..];
    let tag = decode_tag(&mut input).unwrap();
    let mut value = 0;

    int32::merge(tag, &mut value, &mut input).unwrap();

    assert_eq!(value, i32::MIN);
    assert!(input.is_empty());
}

#[test]
fn uint64___max___roundtrips() {
    let mut buf = Vec::new();
    uint64::encode(7, &u64::MAX, &mut buf);
    let mut input = &buf[..];
    let tag = decode_tag(&mut input).unwrap();
    let mut value = 0;

    uint64::merge(tag, &mut value, &mut input).unwrap();

    assert_eq!(value, u64::MAX);
}

#[test]
fn float___encodes_little_endian() {
    let mut buf = Vec::new();

    float::encode(1, &1.0, &mut buf);

    assert_eq!(buf, [0x0d, 0x00, 0x00, 0x80, 0x3f]);
}

#[test]
fn double___encodes_little_endian() {
    let mut buf = Vec::new();

    double::encode(2, &-2.0, &mut buf);

    assert_eq!(buf, [0x11, 0, 0, 0, 0, 0, 0, 0, 0xc0]);
    assert_eq!(double::encoded_len(2, &-2.0), 9);
}

#[test_case(0.0, true ; "positive zero is default")]
#[test_case(-0.0, false ; "negative zero is written")]
#[test_case(f64::NAN, false ; "nan is written")]
fn double___is_default___uses_bit_pattern(value: f64, expected: bool) {
    assert_eq!(double::is_default(&value), expected);
}

#[test]
fn double___value_eq___nan_equals_itself() {
    assert!(double::value_eq(&f64::NAN, &f64::NAN));
    assert!(!double::value_eq(&0.0, &-0.0));
}

#[test]
fn boolean___true___encodes_as_one() {
    let mut buf = Vec::new();

    boolean::encode(3, &true, &mut buf);

    assert_eq!(buf, [0x18, 0x01]);
    assert!(boolean::is_default(&false));
}

#[test]
fn string___encodes_length_prefixed_utf8() {
    let mut buf = Vec::new();

    string::encode(1, &"héllo".to_string(), &mut buf);

    assert_eq!(buf[..2], [0x0a, 0x06]);
    assert_eq!(&buf[2..], "héllo".as_bytes());
    assert_eq!(string::encoded_len(1, &"héllo".to_string()), 8);
}

#[test]
fn string___invalid_utf8___is_rejected() {
    let mut input: &[u8] = &[0x0a, 0x02, 0xc3, 0x28];
    let tag = decode_tag(&mut input).unwrap();
    let mut value = String::new();

    let err = string::merge(tag, &mut value, &mut input).unwrap_err();

    assert_eq!(err, WireError::InvalidUtf8);
}

#[test]
fn string___merge___replaces_previous_value() {
    let mut input: &[u8] = &[0x0a, 0x01, b'b'];
    let tag = decode_tag(&mut input).unwrap();
    let mut value = String::from("aaaa");

    string::merge(tag, &mut value, &mut input).unwrap();

    assert_eq!(value, "b");
}

#[test]
fn merge_value___default_source___leaves_target() {
    let mut number = 5i64;
    let mut text = String::from("keep");

    int64::merge_value(&mut number, &0);
    string::merge_value(&mut text, &String::new());

    assert_eq!(number, 5);
    assert_eq!(text, "keep");
}

#[test]
fn merge_option___some_default_scalar___leaves_target() {
    let mut count = Some(9u32);
    let mut login = Some(42i64);
    let mut ratio = Some(0.5f64);

    uint32::merge_option(&mut count, &Some(0));
    int64::merge_option(&mut login, &Some(0));
    double::merge_option(&mut ratio, &Some(0.0));

    assert_eq!(count, Some(9));
    assert_eq!(login, Some(42));
    assert_eq!(ratio, Some(0.5));
}

#[test]
fn merge_option___some_empty_string___leaves_target() {
    let mut target = Some(String::from("a@b"));

    string::merge_option(&mut target, &Some(String::new()));

    assert_eq!(target.as_deref(), Some("a@b"));
}

#[test]
fn merge_option___some_default_into_none___stays_none() {
    let mut target: Option<i32> = None;

    int32::merge_option(&mut target, &Some(0));

    assert_eq!(target, None);
}

#[test]
fn merge_option___some_value___overwrites() {
    let mut target = Some(9u32);

    uint32::merge_option(&mut target, &Some(3));

    assert_eq!(target, Some(3));
}

#[test]
fn merge_option___negative_zero___is_not_default() {
    let mut target = Some(1.0f32);

    float::merge_option(&mut target, &Some(-0.0));

    assert_eq!(target.map(f32::to_bits), Some((-0.0f32).to_bits()));
}

#[test]
fn merge_option___none___leaves_target() {
    let mut target = Some(String::from("keep"));

    string::merge_option(&mut target, &None);

    assert_eq!(target.as_deref(), Some("keep"));
}
