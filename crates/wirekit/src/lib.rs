//! # wirekit
//!
//! Protocol Buffers wire codecs for plain Rust structs.
//!
//! Mark a struct with `#[wire_message]`, run `wirekit-codegen` from
//! `build.rs`, and include the generated unit next to the struct. The unit
//! implements [`Message`] together with `Default`, `Clone` and `PartialEq`.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! wirekit = "0.3"
//!
//! [build-dependencies]
//! wirekit-codegen = "0.3"
//! ```
//!
//! ```ignore
//! // build.rs
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     wirekit_codegen::Config::new().compile(&["src/model.rs"])?;
//!     Ok(())
//! }
//! ```
//!
//! ```ignore
//! // src/model.rs
//! use wirekit::prelude::*;
//!
//! #[wire_message]
//! #[derive(Debug)]
//! pub struct Point {
//!     pub x: i32,
//!     pub y: i32,
//! }
//!
//! include!(concat!(env!("OUT_DIR"), "/Point.g.rs"));
//!
//! let point = Point { x: 0, y: 5 };
//! assert_eq!(point.encode_to_vec(), [0x10, 0x05]);
//! ```
//!
//! ## Supported field types
//!
//! | Rust | wire kind |
//! |------|-----------|
//! | `i32`, `i64`, `u32`, `u64`, `bool` | varint |
//! | `f32` / `f64` | fixed32 / fixed64 |
//! | `String` | length-delimited |
//! | another `#[wire_message]` struct | length-delimited |
//! | `Option<T>` of any of the above | same as `T`, with presence |

pub use wirekit_core::*;
pub use wirekit_macros::{wire_message, wire_service};

/// Prelude for model modules
pub mod prelude {
    pub use wirekit_core::prelude::*;
    pub use wirekit_macros::{wire_message, wire_service};
}
