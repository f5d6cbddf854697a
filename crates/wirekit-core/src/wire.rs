//! Protocol Buffers wire primitives
//!
//! Every encoded field is a tag followed by a value:
//!
//! ```text
//! +---------------------------+-----------------------------+
//! | tag (varint)              | value                       |
//! | (number << 3) | wire_type | varint / fixed / len+bytes  |
//! +---------------------------+-----------------------------+
//! ```
//!
//! The per-kind modules ([`int32`], [`boolean`], [`string`], [`message`], ...) expose the
//! same six functions so generated code can treat every field uniformly:
//!
//! - `is_default` - whether the value is elided on the wire
//! - `value_eq` - value equality (bitwise for floats)
//! - `merge_value` / `merge_option` - message-level merge of one field
//! - `encoded_len` - tag plus value length
//! - `encode` - write tag and value
//! - `merge` - read one value after its tag has been consumed

use crate::error::{WireError, WireResult};
use crate::message::Message;
use std::fmt;

/// Smallest valid field number
pub const MIN_FIELD_NUMBER: u32 = 1;

/// Largest valid field number (29 bits)
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// Maximum bytes in an encoded 64-bit varint
pub const MAX_VARINT_LEN: usize = 10;

/// Maximum group nesting accepted while skipping unknown fields
pub const MAX_GROUP_DEPTH: usize = 64;

/// Wire type marker stored in the low three bits of a tag
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    StartGroup = 3,
    EndGroup = 4,
    Fixed32 = 5,
}

impl WireType {
    pub fn from_u8(value: u8) -> WireResult<Self> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            3 => Ok(WireType::StartGroup),
            4 => Ok(WireType::EndGroup),
            5 => Ok(WireType::Fixed32),
            other => Err(WireError::InvalidWireType(other)),
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireType::Varint => write!(f, "varint"),
            WireType::Fixed64 => write!(f, "fixed64"),
            WireType::LengthDelimited => write!(f, "length-delimited"),
            WireType::StartGroup => write!(f, "start-group"),
            WireType::EndGroup => write!(f, "end-group"),
            WireType::Fixed32 => write!(f, "fixed32"),
        }
    }
}

/// A decoded field tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    field_number: u32,
    wire_type: WireType,
}

impl Tag {
    pub const fn new(field_number: u32, wire_type: WireType) -> Self {
        Self {
            field_number,
            wire_type,
        }
    }

    pub const fn field_number(&self) -> u32 {
        self.field_number
    }

    pub const fn wire_type(&self) -> WireType {
        self.wire_type
    }

    /// The raw tag value as written on the wire
    pub const fn to_raw(&self) -> u32 {
        (self.field_number << 3) | self.wire_type as u32
    }
}

// ============================================================================
// Varints
// ============================================================================

/// Append `value` as a LEB128 varint.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    while value >= 0x80 {
        buf.push((value as u8) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Read a LEB128 varint, advancing `buf` past it.
pub fn decode_varint(buf: &mut &[u8]) -> WireResult<u64> {
    let mut value = 0u64;
    for (i, &byte) in buf.iter().take(MAX_VARINT_LEN).enumerate() {
        // The tenth byte may only contribute the single remaining bit.
        if i == MAX_VARINT_LEN - 1 && byte > 0x01 {
            return Err(WireError::VarintOverflow);
        }
        value |= u64::from(byte & 0x7F) << (7 * i);
        if byte < 0x80 {
            *buf = &buf[i + 1..];
            return Ok(value);
        }
    }
    if buf.len() >= MAX_VARINT_LEN {
        Err(WireError::VarintOverflow)
    } else {
        Err(WireError::UnexpectedEof)
    }
}

/// Number of bytes `value` occupies as a varint.
#[inline]
pub const fn encoded_len_varint(value: u64) -> usize {
    // Bits needed, rounded up to 7-bit groups; zero still takes one byte.
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

// ============================================================================
// Tags
// ============================================================================

/// Append the tag for `field_number` with `wire_type`.
#[inline]
pub fn encode_tag(field_number: u32, wire_type: WireType, buf: &mut Vec<u8>) {
    encode_varint(u64::from(Tag::new(field_number, wire_type).to_raw()), buf);
}

/// Read a tag, rejecting field number 0 and reserved wire types.
pub fn decode_tag(buf: &mut &[u8]) -> WireResult<Tag> {
    let raw = decode_varint(buf)?;
    if raw > u64::from(u32::MAX) {
        return Err(WireError::InvalidTag(raw));
    }
    #[allow(clippy::cast_possible_truncation)]
    let wire_type = WireType::from_u8((raw & 0x07) as u8)?;
    #[allow(clippy::cast_possible_truncation)]
    let field_number = (raw >> 3) as u32;
    if field_number < MIN_FIELD_NUMBER {
        return Err(WireError::InvalidTag(raw));
    }
    Ok(Tag::new(field_number, wire_type))
}

/// Bytes taken by the tag of `field_number`.
#[inline]
pub const fn tag_len(field_number: u32) -> usize {
    encoded_len_varint((field_number as u64) << 3)
}

/// Fail unless the tag's wire type is the one the field kind expects.
#[inline]
pub fn check_wire_type(expected: WireType, tag: Tag) -> WireResult<()> {
    if tag.wire_type() == expected {
        Ok(())
    } else {
        Err(WireError::WireTypeMismatch {
            field_number: tag.field_number(),
            expected,
            actual: tag.wire_type(),
        })
    }
}

// ============================================================================
// Raw byte access
// ============================================================================

/// Split `len` bytes off the front of `buf`.
pub fn take<'a>(buf: &mut &'a [u8], len: usize) -> WireResult<&'a [u8]> {
    if buf.len() < len {
        return Err(WireError::UnexpectedEof);
    }
    let (head, tail) = buf.split_at(len);
    *buf = tail;
    Ok(head)
}

/// Read a varint length prefix and split that many bytes off `buf`.
pub fn take_length_delimited<'a>(buf: &mut &'a [u8]) -> WireResult<&'a [u8]> {
    let len = decode_varint(buf)?;
    let len = usize::try_from(len).map_err(|_| WireError::UnexpectedEof)?;
    take(buf, len)
}

fn take_array<const N: usize>(buf: &mut &[u8]) -> WireResult<[u8; N]> {
    let bytes = take(buf, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
}

/// Skip the value of an unknown field whose tag was just read.
pub fn skip_field(tag: Tag, buf: &mut &[u8]) -> WireResult<()> {
    skip_value(tag, buf, 0)
}

fn skip_value(tag: Tag, buf: &mut &[u8], depth: usize) -> WireResult<()> {
    match tag.wire_type() {
        WireType::Varint => decode_varint(buf).map(|_| ()),
        WireType::Fixed64 => take(buf, 8).map(|_| ()),
        WireType::Fixed32 => take(buf, 4).map(|_| ()),
        WireType::LengthDelimited => take_length_delimited(buf).map(|_| ()),
        WireType::StartGroup => {
            if depth >= MAX_GROUP_DEPTH {
                return Err(WireError::RecursionLimit(MAX_GROUP_DEPTH));
            }
            loop {
                let inner = decode_tag(buf)?;
                if inner.wire_type() == WireType::EndGroup {
                    if inner.field_number() != tag.field_number() {
                        return Err(WireError::UnmatchedEndGroup {
                            expected: tag.field_number(),
                            actual: inner.field_number(),
                        });
                    }
                    return Ok(());
                }
                skip_value(inner, buf, depth + 1)?;
            }
        }
        WireType::EndGroup => Err(WireError::UnexpectedEndGroup(tag.field_number())),
    }
}

// ============================================================================
// Per-kind field helpers
// ============================================================================

macro_rules! varint_kind {
    ($(#[$doc:meta])* $module:ident, $ty:ty, $to_wire:expr, $from_wire:expr) => {
        $(#[$doc])*
        pub mod $module {
            use super::*;

            #[inline]
            pub fn is_default(value: &$ty) -> bool {
                *value == <$ty>::default()
            }

            #[inline]
            pub fn value_eq(a: &$ty, b: &$ty) -> bool {
                a == b
            }

            #[inline]
            pub fn merge_value(dst: &mut $ty, src: &$ty) {
                if !is_default(src) {
                    *dst = *src;
                }
            }

            /// Only a present, non-default value replaces `dst`.
            #[inline]
            pub fn merge_option(dst: &mut Option<$ty>, src: &Option<$ty>) {
                if let Some(value) = src
                    && !is_default(value)
                {
                    *dst = Some(*value);
                }
            }

            #[inline]
            pub fn encoded_len(field_number: u32, value: &$ty) -> usize {
                tag_len(field_number) + encoded_len_varint(($to_wire)(*value))
            }

            #[inline]
            pub fn encode(field_number: u32, value: &$ty, buf: &mut Vec<u8>) {
                encode_tag(field_number, WireType::Varint, buf);
                encode_varint(($to_wire)(*value), buf);
            }

            pub fn merge(tag: Tag, value: &mut $ty, buf: &mut &[u8]) -> WireResult<()> {
                check_wire_type(WireType::Varint, tag)?;
                *value = ($from_wire)(decode_varint(buf)?);
                Ok(())
            }
        }
    };
}

macro_rules! fixed_kind {
    ($(#[$doc:meta])* $module:ident, $ty:ty, $wire_type:expr, $width:literal) => {
        $(#[$doc])*
        pub mod $module {
            use super::*;

            /// Zero with the sign bit clear; `-0.0` is written.
            #[inline]
            pub fn is_default(value: &$ty) -> bool {
                value.to_bits() == 0
            }

            /// Bitwise, so NaN equals itself and `0.0 != -0.0`.
            #[inline]
            pub fn value_eq(a: &$ty, b: &$ty) -> bool {
                a.to_bits() == b.to_bits()
            }

            #[inline]
            pub fn merge_value(dst: &mut $ty, src: &$ty) {
                if !is_default(src) {
                    *dst = *src;
                }
            }

            /// Only a present, non-default value replaces `dst`.
            #[inline]
            pub fn merge_option(dst: &mut Option<$ty>, src: &Option<$ty>) {
                if let Some(value) = src
                    && !is_default(value)
                {
                    *dst = Some(*value);
                }
            }

            #[inline]
            pub fn encoded_len(field_number: u32, _value: &$ty) -> usize {
                tag_len(field_number) + $width
            }

            #[inline]
            pub fn encode(field_number: u32, value: &$ty, buf: &mut Vec<u8>) {
                encode_tag(field_number, $wire_type, buf);
                buf.extend_from_slice(&value.to_le_bytes());
            }

            pub fn merge(tag: Tag, value: &mut $ty, buf: &mut &[u8]) -> WireResult<()> {
                check_wire_type($wire_type, tag)?;
                *value = <$ty>::from_le_bytes(take_array::<$width>(buf)?);
                Ok(())
            }
        }
    };
}

varint_kind!(
    /// `i32`, written as a sign-extended 64-bit varint.
    int32,
    i32,
    |v: i32| i64::from(v) as u64,
    |v: u64| v as i32
);

varint_kind!(
    /// `i64`, written as a two's-complement varint.
    int64,
    i64,
    |v: i64| v as u64,
    |v: u64| v as i64
);

varint_kind!(
    /// `u32`, truncated from 64 bits on decode.
    uint32,
    u32,
    u64::from,
    |v: u64| v as u32
);

varint_kind!(uint64, u64, |v: u64| v, |v: u64| v);

varint_kind!(
    /// `bool`, written as varint 0 or 1.
    boolean,
    bool,
    u64::from,
    |v: u64| v != 0
);

fixed_kind!(
    /// `f32`, IEEE 754 little-endian.
    float,
    f32,
    WireType::Fixed32,
    4
);

fixed_kind!(
    /// `f64`, IEEE 754 little-endian.
    double,
    f64,
    WireType::Fixed64,
    8
);

/// Length-prefixed UTF-8 strings.
pub mod string {
    use super::*;

    #[inline]
    pub fn is_default(value: &String) -> bool {
        value.is_empty()
    }

    #[inline]
    pub fn value_eq(a: &String, b: &String) -> bool {
        a == b
    }

    pub fn merge_value(dst: &mut String, src: &String) {
        if !is_default(src) {
            dst.clone_from(src);
        }
    }

    /// `None` and `Some("")` leave `dst` untouched.
    pub fn merge_option(dst: &mut Option<String>, src: &Option<String>) {
        if let Some(value) = src
            && !is_default(value)
        {
            *dst = Some(value.clone());
        }
    }

    #[inline]
    pub fn encoded_len(field_number: u32, value: &String) -> usize {
        tag_len(field_number) + encoded_len_varint(value.len() as u64) + value.len()
    }

    pub fn encode(field_number: u32, value: &String, buf: &mut Vec<u8>) {
        encode_tag(field_number, WireType::LengthDelimited, buf);
        encode_varint(value.len() as u64, buf);
        buf.extend_from_slice(value.as_bytes());
    }

    pub fn merge(tag: Tag, value: &mut String, buf: &mut &[u8]) -> WireResult<()> {
        check_wire_type(WireType::LengthDelimited, tag)?;
        let bytes = take_length_delimited(buf)?;
        let text = std::str::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8)?;
        value.clear();
        value.push_str(text);
        Ok(())
    }
}

/// Nested messages, length-prefixed.
pub mod message {
    use super::*;

    /// A nested message is default when none of its fields would be written.
    #[inline]
    pub fn is_default<M: Message>(value: &M) -> bool {
        value.calculate_size() == 0
    }

    #[inline]
    pub fn value_eq<M: Message>(a: &M, b: &M) -> bool {
        a == b
    }

    /// Nested messages merge field by field instead of being replaced.
    pub fn merge_value<M: Message>(dst: &mut M, src: &M) {
        dst.merge(src);
    }

    /// An absent or all-default `src` leaves `dst` untouched.
    pub fn merge_option<M: Message>(dst: &mut Option<M>, src: &Option<M>) {
        if let Some(value) = src
            && !is_default(value)
        {
            match dst {
                Some(existing) => existing.merge(value),
                None => *dst = Some(value.clone()),
            }
        }
    }

    pub fn encoded_len<M: Message>(field_number: u32, value: &M) -> usize {
        let len = value.calculate_size();
        tag_len(field_number) + encoded_len_varint(len as u64) + len
    }

    pub fn encode<M: Message>(field_number: u32, value: &M, buf: &mut Vec<u8>) {
        encode_tag(field_number, WireType::LengthDelimited, buf);
        encode_varint(value.calculate_size() as u64, buf);
        value.write_to(buf);
    }

    pub fn merge<M: Message>(tag: Tag, value: &mut M, buf: &mut &[u8]) -> WireResult<()> {
        check_wire_type(WireType::LengthDelimited, tag)?;
        let bytes = take_length_delimited(buf)?;
        value.merge_from_slice(bytes)
    }
}

#[cfg(test)]
#[path = "wire/wire_tests.rs"]
mod wire_tests;
