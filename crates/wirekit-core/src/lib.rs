//! wirekit-core - Wire primitives, message traits, and schema descriptors
//!
//! This crate provides the runtime that generated message code links against:
//! - [`Message`] trait implemented for every `#[wire_message]` struct
//! - [`Service`] trait implemented for every `#[wire_service]` struct
//! - [`wire`] module with varint, tag and per-kind field helpers
//! - [`MessageDescriptor`] and its `DescriptorProto` blob encoding
//! - [`DescriptorRegistry`] for looking descriptors up by schema name
//! - [`WireError`] and [`DescriptorError`] for error handling

mod descriptor;
mod error;
mod message;
mod registry;
pub mod wire;

pub use descriptor::{FieldDescriptor, MessageDescriptor, WireKind, decode_embedded};
pub use error::{DescriptorError, WireError, WireResult};
pub use message::{Message, Service};
pub use registry::DescriptorRegistry;
pub use wire::{Tag, WireType};

/// Items used by generated code. Not part of the public API.
#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::OnceCell;
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        DescriptorError, DescriptorRegistry, FieldDescriptor, Message, MessageDescriptor, Service,
        WireError, WireKind, WireResult,
    };
}
