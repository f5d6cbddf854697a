//! Message and service contracts implemented by generated code

use crate::descriptor::MessageDescriptor;
use crate::error::{WireError, WireResult};
use crate::wire::{self, Tag, WireType};

/// A schema-described message with a Protocol Buffers wire encoding.
///
/// Implementations are generated by `wirekit-codegen` together with
/// `Default`, `Clone` and `PartialEq`; they are not written by hand.
///
/// # Example
///
/// ```ignore
/// #[wire_message]
/// #[derive(Debug)]
/// pub struct Point {
///     pub x: i32,
///     pub y: i32,
/// }
///
/// include!(concat!(env!("OUT_DIR"), "/Point.g.rs"));
///
/// let point = Point { x: 0, y: 5 };
/// let bytes = point.encode_to_vec();
/// assert_eq!(bytes, [0x10, 0x05]);
/// assert_eq!(Point::decode(&bytes)?, point);
/// ```
pub trait Message: Default + Clone + PartialEq + Send + Sync + 'static {
    /// Schema name, which is the struct name unless the marker overrides it
    const SCHEMA_NAME: &'static str;

    /// The encoded `DescriptorProto` for this message
    const DESCRIPTOR_BLOB: &'static [u8];

    /// The decoded descriptor, built once on first use
    fn descriptor() -> &'static MessageDescriptor;

    /// Exact number of bytes [`write_to`](Message::write_to) will append
    fn calculate_size(&self) -> usize;

    /// Overwrite fields with the non-default values of `other`
    fn merge(&mut self, other: &Self);

    /// Append every non-default field in declaration order
    fn write_to(&self, buf: &mut Vec<u8>);

    /// Decode the value of one field whose tag was just read.
    ///
    /// Unknown field numbers are skipped.
    fn merge_field(&mut self, tag: Tag, buf: &mut &[u8]) -> WireResult<()>;

    /// Merge every field encoded in `buf` into `self`
    fn merge_from_slice(&mut self, mut buf: &[u8]) -> WireResult<()> {
        while !buf.is_empty() {
            let tag = wire::decode_tag(&mut buf)?;
            if tag.wire_type() == WireType::EndGroup {
                return Err(WireError::UnexpectedEndGroup(tag.field_number()));
            }
            self.merge_field(tag, &mut buf)?;
        }
        Ok(())
    }

    /// Encode into a freshly allocated buffer
    fn encode_to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.calculate_size());
        self.write_to(&mut buf);
        buf
    }

    /// Decode a message, starting from all fields at their defaults
    fn decode(buf: &[u8]) -> WireResult<Self> {
        let mut message = Self::default();
        message.merge_from_slice(buf)?;
        Ok(message)
    }
}

/// A service declaration.
///
/// Generated service units only name the service; dispatch is not part of
/// this crate.
pub trait Service {
    const SERVICE_NAME: &'static str;
}
