//! Codec Synthesizer: the unit that completes one message declaration
//!
//! The unit is a set of trait impls written against the runtime path, so it
//! can be `include!`d in the module that declares the struct:
//!
//! - `Default` and `Clone` over every member, `#[wire(skip)]` ones included
//! - `PartialEq` over the schema fields, floats compared by bit pattern
//! - `Message`: size, merge, encode, per-field decode and the embedded
//!   descriptor
//!
//! All field-level work goes through `wire::<kind>` helpers, so the unit only
//! decides which helper to call for which field.

use crate::descriptor::ResolvedField;
use crate::discovery::Declaration;
use crate::error::{CodegenError, UnsupportedTypeError};
use crate::schema::Schema;
use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};
use syn::Fields;
use wirekit_core::{MessageDescriptor, WireKind};

/// Name of the `wire` helper module for a kind
pub fn kind_module(kind: WireKind) -> Option<&'static str> {
    match kind {
        WireKind::Int32 => Some("int32"),
        WireKind::Int64 => Some("int64"),
        WireKind::UInt32 => Some("uint32"),
        WireKind::UInt64 => Some("uint64"),
        WireKind::Float => Some("float"),
        WireKind::Double => Some("double"),
        WireKind::Bool => Some("boolean"),
        WireKind::String => Some("string"),
        WireKind::Message => Some("message"),
        WireKind::Enum => None,
    }
}

/// Per-field pieces shared by every generated operation
struct FieldTokens<'a> {
    field: &'a ResolvedField,
    helper: TokenStream,
    number: Literal,
    name: Literal,
}

impl FieldTokens<'_> {
    fn size(&self) -> TokenStream {
        let Self { helper, number, .. } = self;
        let ident = &self.field.ident;
        if self.field.nullable {
            quote! {
                if let ::core::option::Option::Some(value) = &self.#ident {
                    size += #helper::encoded_len(#number, value);
                }
            }
        } else {
            quote! {
                if !#helper::is_default(&self.#ident) {
                    size += #helper::encoded_len(#number, &self.#ident);
                }
            }
        }
    }

    fn write(&self) -> TokenStream {
        let Self { helper, number, .. } = self;
        let ident = &self.field.ident;
        if self.field.nullable {
            quote! {
                if let ::core::option::Option::Some(value) = &self.#ident {
                    #helper::encode(#number, value, buf);
                }
            }
        } else {
            quote! {
                if !#helper::is_default(&self.#ident) {
                    #helper::encode(#number, &self.#ident, buf);
                }
            }
        }
    }

    fn eq(&self) -> TokenStream {
        let helper = &self.helper;
        let ident = &self.field.ident;
        if self.field.nullable {
            quote! {
                match (&self.#ident, &other.#ident) {
                    (::core::option::Option::Some(a), ::core::option::Option::Some(b)) => {
                        #helper::value_eq(a, b)
                    }
                    (::core::option::Option::None, ::core::option::Option::None) => true,
                    _ => false,
                }
            }
        } else {
            quote! { #helper::value_eq(&self.#ident, &other.#ident) }
        }
    }

    fn merge(&self) -> TokenStream {
        let helper = &self.helper;
        let ident = &self.field.ident;
        if self.field.nullable {
            quote! { #helper::merge_option(&mut self.#ident, &other.#ident); }
        } else {
            quote! { #helper::merge_value(&mut self.#ident, &other.#ident); }
        }
    }

    fn merge_arm(&self) -> TokenStream {
        let Self {
            helper,
            number,
            name,
            ..
        } = self;
        let ident = &self.field.ident;
        let target = if self.field.nullable {
            quote! { self.#ident.get_or_insert_with(::core::default::Default::default) }
        } else {
            quote! { &mut self.#ident }
        };
        quote! {
            #number => #helper::merge(tag, #target, buf)
                .map_err(|e| e.in_field(Self::SCHEMA_NAME, #name)),
        }
    }
}

/// Synthesize the unit for one accepted message
pub fn synthesize_message(
    declaration: &Declaration,
    schema: &Schema,
    fields: &[ResolvedField],
    descriptor: &MessageDescriptor,
    runtime: &syn::Path,
) -> Result<TokenStream, CodegenError> {
    let ident = &declaration.ident;
    let schema_name = Literal::string(descriptor.schema_name());
    let blob = Literal::byte_string(&descriptor.encode_to_vec());

    let tokens = fields
        .iter()
        .map(|field| {
            let module = kind_module(field.kind).ok_or_else(|| CodegenError::UnsupportedType {
                message: declaration.name.clone(),
                field: field.name.clone(),
                source: UnsupportedTypeError::new(&field.ty, "enum fields are not generated"),
            })?;
            let module = format_ident!("{module}");
            Ok(FieldTokens {
                field,
                helper: quote! { #runtime::wire::#module },
                number: Literal::u32_suffixed(field.number),
                name: Literal::string(&field.name),
            })
        })
        .collect::<Result<Vec<_>, CodegenError>>()?;

    let members = &schema.members;
    let (default_body, clone_body) = match declaration.item.fields {
        Fields::Unit => (quote! { Self }, quote! { Self }),
        _ => (
            quote! { Self { #(#members: ::core::default::Default::default(),)* } },
            quote! { Self { #(#members: ::core::clone::Clone::clone(&self.#members),)* } },
        ),
    };

    let sizes = tokens.iter().map(FieldTokens::size);
    let writes = tokens.iter().map(FieldTokens::write);
    let eqs = tokens.iter().map(FieldTokens::eq);
    let merges = tokens.iter().map(FieldTokens::merge);
    let arms = tokens.iter().map(FieldTokens::merge_arm);

    Ok(quote! {
        #[automatically_derived]
        impl ::core::default::Default for #ident {
            fn default() -> Self {
                #default_body
            }
        }

        #[automatically_derived]
        impl ::core::clone::Clone for #ident {
            fn clone(&self) -> Self {
                #clone_body
            }
        }

        #[automatically_derived]
        impl ::core::cmp::PartialEq for #ident {
            fn eq(&self, other: &Self) -> bool {
                if ::core::ptr::eq(self, other) {
                    return true;
                }
                true #(&& #eqs)*
            }
        }

        #[automatically_derived]
        #[allow(unused_mut, unused_variables, clippy::match_single_binding)]
        impl #runtime::Message for #ident {
            const SCHEMA_NAME: &'static str = #schema_name;
            const DESCRIPTOR_BLOB: &'static [u8] = #blob;

            fn descriptor() -> &'static #runtime::MessageDescriptor {
                static DESCRIPTOR: #runtime::__private::OnceCell<#runtime::MessageDescriptor> =
                    #runtime::__private::OnceCell::new();
                DESCRIPTOR.get_or_init(|| {
                    #runtime::decode_embedded(Self::SCHEMA_NAME, Self::DESCRIPTOR_BLOB)
                })
            }

            fn calculate_size(&self) -> usize {
                let mut size = 0usize;
                #(#sizes)*
                size
            }

            fn merge(&mut self, other: &Self) {
                #(#merges)*
            }

            fn write_to(&self, buf: &mut ::std::vec::Vec<u8>) {
                #(#writes)*
            }

            fn merge_field(
                &mut self,
                tag: #runtime::Tag,
                buf: &mut &[u8],
            ) -> #runtime::WireResult<()> {
                match tag.field_number() {
                    #(#arms)*
                    _ => #runtime::wire::skip_field(tag, buf),
                }
            }
        }
    })
}
