//! Schema Extractor: the data-carrying fields of an accepted message

use crate::discovery::{Declaration, DeclarationKind};
use crate::error::CodegenError;
use crate::types::option_inner;
use darling::FromField;
use darling::util::Flag;
use std::collections::HashSet;
use syn::ext::IdentExt;
use syn::{Fields, Ident, Type};
use tracing::warn;

/// `#[wire(...)]` helper options on a message field
#[derive(Debug, FromField)]
#[darling(attributes(wire))]
struct FieldOpts {
    ident: Option<Ident>,
    ty: Type,

    /// Not part of the wire schema
    #[darling(default)]
    skip: Flag,

    /// Explicit field number
    #[darling(default)]
    number: Option<u32>,
}

/// A field that takes part in the wire schema
#[derive(Debug, Clone)]
pub struct ExtractedField {
    /// Schema field name (raw identifiers lose their `r#`)
    pub name: String,
    pub ident: Ident,
    pub ty: Type,
    pub number: Option<u32>,
}

impl ExtractedField {
    pub fn is_nullable(&self) -> bool {
        option_inner(&self.ty).is_some()
    }
}

/// The extracted shape of one message
#[derive(Debug, Clone)]
pub struct Schema {
    pub schema_name: String,
    /// Inline modules enclosing the struct; field types resolve from here
    pub module_path: Vec<String>,
    /// Qualifying fields in declaration order
    pub fields: Vec<ExtractedField>,
    /// Every member of the struct, `#[wire(skip)]` ones included
    pub members: Vec<Ident>,
}

impl Schema {
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// Extract the schema of an accepted message declaration
pub fn extract(declaration: &Declaration) -> Result<Schema, CodegenError> {
    debug_assert_eq!(declaration.kind, DeclarationKind::Message);

    let invalid = |error: darling::Error| CodegenError::InvalidAttribute {
        message: declaration.name.clone(),
        reason: error.to_string(),
    };

    let named = match &declaration.item.fields {
        Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => {
            return Err(invalid(darling::Error::unsupported_shape(
                "tuple struct",
            )));
        }
    };

    let mut errors = darling::Error::accumulator();
    let mut seen = HashSet::new();
    let mut fields = Vec::new();
    let mut members = Vec::with_capacity(named.len());

    for field in named {
        let Some(opts) = errors.handle(FieldOpts::from_field(field)) else {
            continue;
        };
        let Some(ident) = opts.ident else {
            continue;
        };
        members.push(ident.clone());

        if opts.skip.is_present() {
            if opts.number.is_some() {
                errors.push(
                    darling::Error::custom("`skip` and `number` cannot be combined")
                        .with_span(&ident),
                );
            }
            continue;
        }

        let name = ident.unraw().to_string();
        if !seen.insert(name.clone()) {
            warn!(
                message = %declaration.name,
                field = %name,
                "duplicate field name; keeping the first occurrence"
            );
            continue;
        }

        fields.push(ExtractedField {
            name,
            ident,
            ty: opts.ty,
            number: opts.number,
        });
    }

    errors.finish().map_err(invalid)?;

    Ok(Schema {
        schema_name: declaration.name.clone(),
        module_path: declaration.module_path.clone(),
        fields,
        members,
    })
}
