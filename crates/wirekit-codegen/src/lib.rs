//! wirekit-codegen - Build-time generator for wirekit message codecs
//!
//! Scans Rust source for structs marked `#[wire_message]` or
//! `#[wire_service]` and writes one unit per declaration that completes it
//! with the `Message` (or `Service`) implementation.
//!
//! # Pipeline
//!
//! ```text
//! source files
//!     ↓
//!  [discovery]   marked structs → messages, services, skipped
//!     ↓ per message
//!  [schema]      qualifying fields
//!  [types]       field type → wire kind
//!  [descriptor]  numbered fields → MessageDescriptor + blob
//!  [synth]       Default, Clone, PartialEq, Message impls
//!     ↓
//!  UnitSink      "{schema}.g" → OUT_DIR/{schema}.g.rs
//! ```
//!
//! # Usage
//!
//! ```no_run
//! // build.rs
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     wirekit_codegen::Config::new().compile(&["src/model.rs"])?;
//!     Ok(())
//! }
//! ```
//!
//! and next to each declaration:
//!
//! ```ignore
//! include!(concat!(env!("OUT_DIR"), "/Point.g.rs"));
//! ```

mod config;
pub mod descriptor;
pub mod discovery;
mod driver;
mod error;
pub mod schema;
mod service;
mod sink;
pub mod synth;
pub mod types;

pub use config::Config;
pub use discovery::{Declaration, DeclarationKind, Discovery, SkipReason, Skipped, discover};
pub use driver::{
    DEFAULT_RUNTIME_PATH, GeneratedUnit, Generator, MessageFailure, Report, UNIT_SUFFIX,
    parse_file, unit_name,
};
pub use error::{CodegenError, UnsupportedTypeError};
pub use service::synthesize_service;
pub use sink::{DirectorySink, MemorySink, UnitSink};
pub use types::{KnownMessages, Lookup, MappedType, map_type};
