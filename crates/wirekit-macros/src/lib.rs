//! wirekit-macros - Marker attributes for wirekit messages and services
//!
//! This crate provides:
//! - `#[wire_message]` - Mark a struct as a wire message
//! - `#[wire_service]` - Mark a struct as a service declaration
//!
//! The markers generate nothing. `wirekit-codegen` finds them in the source
//! at build time and writes the `Message`/`Service` implementations into
//! `OUT_DIR`; the attributes here only validate their arguments and strip
//! the `#[wire(...)]` field helpers so the struct compiles as written.

use darling::ast::NestedMeta;
use darling::{FromAttributes, FromMeta};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::ToTokens;
use syn::{Fields, Item};

/// Arguments shared by both markers
#[derive(Debug, Default, FromMeta)]
struct MarkerArgs {
    /// Schema name override; defaults to the struct name
    #[darling(default)]
    name: Option<String>,
}

/// `#[wire(...)]` helper on a message field
#[derive(Debug, Default, FromAttributes)]
#[darling(attributes(wire))]
struct FieldArgs {
    #[darling(default)]
    skip: darling::util::Flag,

    #[darling(default)]
    number: Option<u32>,
}

/// Mark a struct as a wire message
///
/// The struct must not derive `Clone`, `PartialEq` or `Default`; the
/// generated unit implements them.
///
/// # Example
///
/// ```ignore
/// use wirekit::wire_message;
///
/// #[wire_message(name = "Location")]
/// #[derive(Debug)]
/// pub struct GeoPoint {
///     pub lat: f64,
///     pub lon: f64,
///     #[wire(number = 5)]
///     pub label: Option<String>,
///     #[wire(skip)]
///     pub cached_hash: u64,
/// }
///
/// include!(concat!(env!("OUT_DIR"), "/Location.g.rs"));
/// ```
#[proc_macro_attribute]
pub fn wire_message(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand_message(attr.into(), item.into())
        .unwrap_or_else(darling::Error::write_errors)
        .into()
}

/// Mark a struct as a service declaration
///
/// # Example
///
/// ```ignore
/// use wirekit::wire_service;
///
/// #[wire_service(name = "UserDirectory")]
/// pub struct Directory;
///
/// include!(concat!(env!("OUT_DIR"), "/UserDirectory.g.rs"));
/// ```
#[proc_macro_attribute]
pub fn wire_service(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand_service(attr.into(), item.into())
        .unwrap_or_else(darling::Error::write_errors)
        .into()
}

fn expand_message(attr: TokenStream2, item: TokenStream2) -> darling::Result<TokenStream2> {
    parse_marker_args(attr)?;
    let mut item: Item = syn::parse2(item)?;

    if let Item::Struct(ref mut item_struct) = item {
        strip_field_helpers(&mut item_struct.fields)?;
    }

    Ok(item.into_token_stream())
}

fn expand_service(attr: TokenStream2, item: TokenStream2) -> darling::Result<TokenStream2> {
    parse_marker_args(attr)?;
    let item: Item = syn::parse2(item)?;
    Ok(item.into_token_stream())
}

fn parse_marker_args(attr: TokenStream2) -> darling::Result<MarkerArgs> {
    let metas = NestedMeta::parse_meta_list(attr)?;
    let args = MarkerArgs::from_list(&metas)?;

    if let Some(name) = &args.name
        && !is_schema_name(name)
    {
        return Err(darling::Error::custom(format!(
            "`{name}` is not a valid schema name"
        )));
    }

    Ok(args)
}

/// Validate `#[wire(...)]` helpers and remove them from the fields
fn strip_field_helpers(fields: &mut Fields) -> darling::Result<()> {
    let mut errors = darling::Error::accumulator();

    for field in fields.iter_mut() {
        if let Some(args) = errors.handle(FieldArgs::from_attributes(&field.attrs)) {
            if args.skip.is_present() && args.number.is_some() {
                errors.push(
                    darling::Error::custom("`skip` and `number` cannot be combined")
                        .with_span(&*field),
                );
            }
            if args.number == Some(0) {
                errors.push(
                    darling::Error::custom("field numbers start at 1").with_span(&field.ty),
                );
            }
        }
        field.attrs.retain(|attr| !attr.path().is_ident("wire"));
    }

    errors.finish()
}

/// Schema names follow identifier rules, dots allowed for packages
fn is_schema_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
