//! Descriptor Builder: number fields, map their types and build the
//! [`MessageDescriptor`] embedded in the generated unit

use crate::error::CodegenError;
use crate::schema::{ExtractedField, Schema};
use crate::types::{KnownMessages, map_type};
use syn::{Ident, Type};
use tracing::warn;
use wirekit_core::{FieldDescriptor, MessageDescriptor, WireKind};

/// A qualifying field with its wire number and kind settled
#[derive(Debug, Clone)]
pub struct ResolvedField {
    pub name: String,
    pub ident: Ident,
    pub ty: Type,
    pub number: u32,
    pub kind: WireKind,
    pub nullable: bool,
    pub type_name: Option<String>,
}

impl ResolvedField {
    fn to_descriptor(&self) -> FieldDescriptor {
        let field =
            FieldDescriptor::new(self.name.clone(), self.number, self.kind).nullable(self.nullable);
        match &self.type_name {
            Some(type_name) => field.with_type_name(type_name.clone()),
            None => field,
        }
    }
}

/// Map every field of `schema` and assign its number.
///
/// An explicit `#[wire(number = N)]` wins; otherwise the field takes its
/// 1-based position among the qualifying fields.
pub fn resolve(schema: &Schema, known: &KnownMessages) -> Result<Vec<ResolvedField>, CodegenError> {
    schema
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| resolve_field(schema, index, field, known))
        .collect()
}

fn resolve_field(
    schema: &Schema,
    index: usize,
    field: &ExtractedField,
    known: &KnownMessages,
) -> Result<ResolvedField, CodegenError> {
    let mapped = map_type(&field.ty, known, &schema.module_path).map_err(|source| {
        CodegenError::UnsupportedType {
            message: schema.schema_name.clone(),
            field: field.name.clone(),
            source,
        }
    })?;

    // Out-of-range positions are rejected when the descriptor is built
    let number = field
        .number
        .unwrap_or_else(|| u32::try_from(index + 1).unwrap_or(u32::MAX));

    Ok(ResolvedField {
        name: field.name.clone(),
        ident: field.ident.clone(),
        ty: field.ty.clone(),
        number,
        kind: mapped.kind,
        nullable: mapped.nullable,
        type_name: mapped.type_name,
    })
}

/// Build and validate the descriptor.
///
/// Reused or out-of-range numbers fail the message; gaps are only logged.
pub fn build(schema_name: &str, fields: &[ResolvedField]) -> Result<MessageDescriptor, CodegenError> {
    let descriptor = MessageDescriptor::new(
        schema_name,
        fields.iter().map(ResolvedField::to_descriptor).collect(),
    )?;

    let gaps = descriptor.number_gaps();
    if !gaps.is_empty() {
        warn!(message = %schema_name, ?gaps, "field numbers are not contiguous");
    }

    Ok(descriptor)
}

#[cfg(test)]
#[path = "descriptor/descriptor_tests.rs"]
mod descriptor_tests;
