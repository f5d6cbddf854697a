//! Error types for wire encoding and schema descriptors

use thiserror::Error;

/// Result type alias for decode operations
pub type WireResult<T> = Result<T, WireError>;

/// Errors raised while decoding wire-format bytes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Input ended in the middle of a value
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A varint ran past 10 bytes or overflowed 64 bits
    #[error("varint overflows 64 bits")]
    VarintOverflow,

    /// A tag with field number 0 or one that does not fit in 32 bits
    #[error("invalid tag: {0}")]
    InvalidTag(u64),

    /// Wire type markers 6 and 7 are reserved
    #[error("invalid wire type: {0}")]
    InvalidWireType(u8),

    /// A known field arrived with a different wire type than its kind uses
    #[error("field {field_number}: expected wire type {expected}, got {actual}")]
    WireTypeMismatch {
        field_number: u32,
        expected: crate::wire::WireType,
        actual: crate::wire::WireType,
    },

    /// String bytes were not valid UTF-8
    #[error("string field is not valid UTF-8")]
    InvalidUtf8,

    /// An end-group marker appeared outside of a group
    #[error("unexpected end group for field {0}")]
    UnexpectedEndGroup(u32),

    /// An end-group marker closed a different group than the one open
    #[error("end group for field {actual} does not close group {expected}")]
    UnmatchedEndGroup { expected: u32, actual: u32 },

    /// Groups nested deeper than the skip limit
    #[error("group nesting exceeds {0} levels")]
    RecursionLimit(usize),

    /// An error attributed to a specific message field
    #[error("{message}.{field}: {source}")]
    InField {
        message: &'static str,
        field: &'static str,
        #[source]
        source: Box<WireError>,
    },
}

impl WireError {
    /// Attach the message and field the error was raised for
    pub fn in_field(self, message: &'static str, field: &'static str) -> Self {
        WireError::InField {
            message,
            field,
            source: Box::new(self),
        }
    }

    /// The innermost error, with field attribution removed
    pub fn root_cause(&self) -> &WireError {
        match self {
            WireError::InField { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Errors raised while building, decoding, or registering descriptors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// A message descriptor needs a schema name
    #[error("schema name cannot be empty")]
    EmptySchemaName,

    /// Field descriptors need a name
    #[error("{message}: field {number} has no name")]
    MissingFieldName { message: String, number: u32 },

    /// Two fields share a name
    #[error("{message}: duplicate field name `{field}`")]
    DuplicateFieldName { message: String, field: String },

    /// Two fields share a number
    #[error("{message}: field number {number} used by both `{first}` and `{second}`")]
    DuplicateFieldNumber {
        message: String,
        number: u32,
        first: String,
        second: String,
    },

    /// A field number is outside `1..=MAX_FIELD_NUMBER`
    #[error("{message}: field `{field}` has invalid number {number}")]
    InvalidFieldNumber {
        message: String,
        field: String,
        number: u64,
    },

    /// A descriptor blob used a type code this crate does not know
    #[error("unknown field type code: {0}")]
    UnknownTypeCode(u64),

    /// A registry already holds a descriptor for this schema name
    #[error("schema `{0}` is already registered")]
    DuplicateSchema(String),

    /// The descriptor blob itself was malformed
    #[error("malformed descriptor: {0}")]
    Wire(#[from] WireError),
}
