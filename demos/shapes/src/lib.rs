//! shapes - a small model compiled with wirekit
//!
//! `build.rs` runs the generator over `src/model.rs`; each declaration there
//! includes its unit from `OUT_DIR`.

pub mod model;

pub use model::*;
