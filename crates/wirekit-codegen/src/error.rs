//! Error types for code generation

use std::path::PathBuf;
use thiserror::Error;
use wirekit_core::DescriptorError;

/// A field type the mapper has no wire kind for
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported field type `{ty}`: {reason}")]
pub struct UnsupportedTypeError {
    /// The declared type, rendered as source text
    pub ty: String,
    pub reason: &'static str,
}

impl UnsupportedTypeError {
    pub(crate) fn new(ty: &syn::Type, reason: &'static str) -> Self {
        Self {
            ty: render_type(ty),
            reason,
        }
    }
}

/// Errors raised while generating units
///
/// `UnsupportedType`, `InvalidAttribute` and `Descriptor` are scoped to a
/// single message: the driver records them and carries on. Everything else
/// aborts the run.
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: syn::Error,
    },

    #[error("{message}.{field}: {source}")]
    UnsupportedType {
        message: String,
        field: String,
        #[source]
        source: UnsupportedTypeError,
    },

    #[error("{message}: invalid #[wire] attribute: {reason}")]
    InvalidAttribute { message: String, reason: String },

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error("invalid runtime path `{0}`")]
    InvalidRuntimePath(String),

    #[error("unit `{0}` was generated twice")]
    DuplicateUnit(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{} message(s) failed code generation:\n  {}", .failures.len(), .failures.join("\n  "))]
    Incomplete { failures: Vec<String> },
}

impl CodegenError {
    /// Whether this error only affects the message it was raised for
    pub fn is_message_scoped(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedType { .. } | Self::InvalidAttribute { .. } | Self::Descriptor(_)
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Render a type close to how it appears in source
pub(crate) fn render_type(ty: &syn::Type) -> String {
    quote::quote!(#ty)
        .to_string()
        .replace(" <", "<")
        .replace("< ", "<")
        .replace(" >", ">")
        .replace(" ::", "::")
        .replace(":: ", "::")
        .replace(" ,", ",")
}
