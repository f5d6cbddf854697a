//! Structural schema descriptors and their binary blob format
//!
//! A [`MessageDescriptor`] is encoded as a `google.protobuf.DescriptorProto`
//! so the blob can be read by any Protocol Buffers tooling:
//!
//! | message | field | number | wire |
//! |---------|-------|--------|------|
//! | `DescriptorProto` | `name` | 1 | string |
//! | `DescriptorProto` | `field` | 2 | repeated message |
//! | `FieldDescriptorProto` | `name` | 1 | string |
//! | `FieldDescriptorProto` | `number` | 3 | int32 |
//! | `FieldDescriptorProto` | `label` | 4 | enum (always optional) |
//! | `FieldDescriptorProto` | `type` | 5 | enum |
//! | `FieldDescriptorProto` | `type_name` | 6 | string |
//! | `FieldDescriptorProto` | `proto3_optional` | 17 | bool |

use crate::error::DescriptorError;
use crate::wire::{self, MAX_FIELD_NUMBER, MIN_FIELD_NUMBER, WireType};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::ops::RangeInclusive;

const DESCRIPTOR_NAME: u32 = 1;
const DESCRIPTOR_FIELD: u32 = 2;

const FIELD_NAME: u32 = 1;
const FIELD_NUMBER: u32 = 3;
const FIELD_LABEL: u32 = 4;
const FIELD_TYPE: u32 = 5;
const FIELD_TYPE_NAME: u32 = 6;
const FIELD_PROTO3_OPTIONAL: u32 = 17;

const LABEL_OPTIONAL: u64 = 1;

/// The closed set of field encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WireKind {
    Int32,
    Int64,
    #[serde(rename = "uint32")]
    UInt32,
    #[serde(rename = "uint64")]
    UInt64,
    Float,
    Double,
    Bool,
    String,
    Message,
    /// Part of the descriptor vocabulary; no Rust type maps to it yet
    Enum,
}

impl WireKind {
    /// Wire type used for values of this kind
    pub const fn wire_type(self) -> WireType {
        match self {
            WireKind::Int32
            | WireKind::Int64
            | WireKind::UInt32
            | WireKind::UInt64
            | WireKind::Bool
            | WireKind::Enum => WireType::Varint,
            WireKind::Float => WireType::Fixed32,
            WireKind::Double => WireType::Fixed64,
            WireKind::String | WireKind::Message => WireType::LengthDelimited,
        }
    }

    /// `FieldDescriptorProto.Type` code
    pub const fn type_code(self) -> u64 {
        match self {
            WireKind::Double => 1,
            WireKind::Float => 2,
            WireKind::Int64 => 3,
            WireKind::UInt64 => 4,
            WireKind::Int32 => 5,
            WireKind::Bool => 8,
            WireKind::String => 9,
            WireKind::Message => 11,
            WireKind::UInt32 => 13,
            WireKind::Enum => 14,
        }
    }

    pub const fn from_type_code(code: u64) -> Option<Self> {
        match code {
            1 => Some(WireKind::Double),
            2 => Some(WireKind::Float),
            3 => Some(WireKind::Int64),
            4 => Some(WireKind::UInt64),
            5 => Some(WireKind::Int32),
            8 => Some(WireKind::Bool),
            9 => Some(WireKind::String),
            11 => Some(WireKind::Message),
            13 => Some(WireKind::UInt32),
            14 => Some(WireKind::Enum),
            _ => None,
        }
    }

    /// Lower-case name used in `.proto` syntax
    pub const fn proto_name(self) -> &'static str {
        match self {
            WireKind::Int32 => "int32",
            WireKind::Int64 => "int64",
            WireKind::UInt32 => "uint32",
            WireKind::UInt64 => "uint64",
            WireKind::Float => "float",
            WireKind::Double => "double",
            WireKind::Bool => "bool",
            WireKind::String => "string",
            WireKind::Message => "message",
            WireKind::Enum => "enum",
        }
    }
}

impl fmt::Display for WireKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.proto_name())
    }
}

/// One field of a message schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    name: String,
    number: u32,
    kind: WireKind,
    nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    type_name: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, number: u32, kind: WireKind) -> Self {
        Self {
            name: name.into(),
            number,
            kind,
            nullable: false,
            type_name: None,
        }
    }

    /// Mark the field as `Option<T>`
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Schema name of the nested message, for [`WireKind::Message`] fields
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn kind(&self) -> WireKind {
        self.kind
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        wire::string::encode(FIELD_NAME, &self.name, buf);
        wire::uint32::encode(FIELD_NUMBER, &self.number, buf);
        wire::uint64::encode(FIELD_LABEL, &LABEL_OPTIONAL, buf);
        wire::uint64::encode(FIELD_TYPE, &self.kind.type_code(), buf);
        if let Some(type_name) = &self.type_name {
            wire::string::encode(FIELD_TYPE_NAME, type_name, buf);
        }
        if self.nullable {
            wire::boolean::encode(FIELD_PROTO3_OPTIONAL, &true, buf);
        }
    }

    fn decode(mut buf: &[u8]) -> Result<Self, DescriptorError> {
        let mut name = String::new();
        let mut number = 0u64;
        let mut type_code = 0u64;
        let mut type_name = None;
        let mut nullable = false;

        while !buf.is_empty() {
            let tag = wire::decode_tag(&mut buf)?;
            match tag.field_number() {
                FIELD_NAME => wire::string::merge(tag, &mut name, &mut buf)?,
                FIELD_NUMBER => wire::uint64::merge(tag, &mut number, &mut buf)?,
                FIELD_TYPE => wire::uint64::merge(tag, &mut type_code, &mut buf)?,
                FIELD_TYPE_NAME => {
                    wire::string::merge(tag, type_name.get_or_insert_with(String::new), &mut buf)?
                }
                FIELD_PROTO3_OPTIONAL => wire::boolean::merge(tag, &mut nullable, &mut buf)?,
                _ => wire::skip_field(tag, &mut buf)?,
            }
        }

        let kind = WireKind::from_type_code(type_code)
            .ok_or(DescriptorError::UnknownTypeCode(type_code))?;
        let number = u32::try_from(number).map_err(|_| DescriptorError::InvalidFieldNumber {
            message: String::new(),
            field: name.clone(),
            number,
        })?;

        Ok(Self {
            name,
            number,
            kind,
            nullable,
            type_name,
        })
    }
}

/// Ordered field list of one message, indexed by field number
#[derive(Debug, Clone, Serialize)]
pub struct MessageDescriptor {
    schema_name: String,
    fields: Vec<FieldDescriptor>,
    #[serde(skip)]
    by_number: HashMap<u32, usize>,
}

impl MessageDescriptor {
    /// Build a descriptor, validating field names and numbers.
    ///
    /// Numbers must be unique and within `1..=MAX_FIELD_NUMBER`; gaps are
    /// allowed and reported by [`number_gaps`](Self::number_gaps).
    pub fn new(
        schema_name: impl Into<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Result<Self, DescriptorError> {
        let schema_name = schema_name.into();
        if schema_name.is_empty() {
            return Err(DescriptorError::EmptySchemaName);
        }

        let mut names = HashSet::new();
        let mut by_number = HashMap::with_capacity(fields.len());

        for (index, field) in fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(DescriptorError::MissingFieldName {
                    message: schema_name,
                    number: field.number,
                });
            }
            if !(MIN_FIELD_NUMBER..=MAX_FIELD_NUMBER).contains(&field.number) {
                return Err(DescriptorError::InvalidFieldNumber {
                    message: schema_name,
                    field: field.name.clone(),
                    number: u64::from(field.number),
                });
            }
            if !names.insert(field.name.as_str()) {
                return Err(DescriptorError::DuplicateFieldName {
                    message: schema_name,
                    field: field.name.clone(),
                });
            }
            if let Some(&first) = by_number.get(&field.number) {
                let first: &FieldDescriptor = &fields[first];
                return Err(DescriptorError::DuplicateFieldNumber {
                    message: schema_name,
                    number: field.number,
                    first: first.name.clone(),
                    second: field.name.clone(),
                });
            }
            by_number.insert(field.number, index);
        }

        Ok(Self {
            schema_name,
            fields,
            by_number,
        })
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field_by_number(&self, number: u32) -> Option<&FieldDescriptor> {
        self.by_number.get(&number).map(|&index| &self.fields[index])
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldDescriptor::name)
    }

    /// Runs of unused numbers between 1 and the highest assigned number
    pub fn number_gaps(&self) -> Vec<RangeInclusive<u32>> {
        let used: BTreeSet<u32> = self.by_number.keys().copied().collect();
        let mut gaps = Vec::new();
        let mut next = MIN_FIELD_NUMBER;
        for number in used {
            if number > next {
                gaps.push(next..=number - 1);
            }
            next = number.saturating_add(1);
        }
        gaps
    }

    /// Serialize as a `DescriptorProto`
    pub fn encode_to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        wire::string::encode(DESCRIPTOR_NAME, &self.schema_name, &mut buf);

        let mut field_buf = Vec::new();
        for field in &self.fields {
            field_buf.clear();
            field.encode(&mut field_buf);
            wire::encode_tag(DESCRIPTOR_FIELD, WireType::LengthDelimited, &mut buf);
            wire::encode_varint(field_buf.len() as u64, &mut buf);
            buf.extend_from_slice(&field_buf);
        }

        buf
    }

    /// Parse a `DescriptorProto`, skipping fields this crate does not use
    pub fn decode(mut buf: &[u8]) -> Result<Self, DescriptorError> {
        let mut schema_name = String::new();
        let mut fields = Vec::new();

        while !buf.is_empty() {
            let tag = wire::decode_tag(&mut buf)?;
            match tag.field_number() {
                DESCRIPTOR_NAME => wire::string::merge(tag, &mut schema_name, &mut buf)?,
                DESCRIPTOR_FIELD => {
                    wire::check_wire_type(WireType::LengthDelimited, tag)?;
                    let bytes = wire::take_length_delimited(&mut buf)?;
                    fields.push(FieldDescriptor::decode(bytes)?);
                }
                _ => wire::skip_field(tag, &mut buf)?,
            }
        }

        Self::new(schema_name, fields)
    }
}

impl PartialEq for MessageDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.schema_name == other.schema_name && self.fields == other.fields
    }
}

impl Eq for MessageDescriptor {}

/// Decode a descriptor blob embedded by generated code.
///
/// # Panics
///
/// Panics if `blob` is malformed. Blobs are written by the code generator
/// from an already validated descriptor, so a failure here means the
/// generated unit was edited or produced by an incompatible generator.
pub fn decode_embedded(schema_name: &str, blob: &[u8]) -> MessageDescriptor {
    match MessageDescriptor::decode(blob) {
        Ok(descriptor) => descriptor,
        Err(e) => panic!("embedded descriptor for `{schema_name}` is invalid: {e}"),
    }
}
