//! Discovery Pass: find marked declarations in parsed source
//!
//! A struct is a candidate when it carries exactly one of `#[wire_message]`
//! or `#[wire_service]` (matched on the last path segment, so
//! `#[wirekit::wire_message]` works too). It is accepted when a unit written
//! outside the declaration can complete it: no generic parameters and, for
//! messages, named or unit fields and none of the traits the unit implements
//! already derived. Rejected candidates are returned as [`Skipped`] records.

use darling::FromMeta;
use darling::ast::NestedMeta;
use std::fmt;
use syn::punctuated::Punctuated;
use syn::{Attribute, Fields, Item, ItemStruct, Meta, Token};
use tracing::debug;

pub const MESSAGE_MARKER: &str = "wire_message";
pub const SERVICE_MARKER: &str = "wire_service";

/// Traits the generated message unit implements
const GENERATED_TRAITS: &[&str] = &["Clone", "PartialEq", "Default"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Message,
    Service,
}

impl DeclarationKind {
    pub fn marker(self) -> &'static str {
        match self {
            Self::Message => MESSAGE_MARKER,
            Self::Service => SERVICE_MARKER,
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message => f.write_str("message"),
            Self::Service => f.write_str("service"),
        }
    }
}

/// An accepted declaration
#[derive(Debug, Clone)]
pub struct Declaration {
    /// Schema name: the marker's `name` argument, else the struct name
    pub name: String,
    pub ident: syn::Ident,
    pub kind: DeclarationKind,
    pub item: ItemStruct,
    /// Inline modules enclosing the declaration, outermost first
    pub module_path: Vec<String>,
}

impl Declaration {
    /// Struct path relative to the file root, e.g. `geo::GeoPoint`
    pub fn qualified_ident(&self) -> String {
        qualify(&self.module_path, &self.ident.to_string())
    }
}

/// Why a marked item produced no unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Both markers, or the same marker twice
    ConflictingMarkers,
    /// Marker on an enum, union, function or other non-struct item
    NotAStruct,
    /// Struct has generic parameters
    Generic,
    /// Message with positional fields
    TupleStruct,
    /// Message already derives a trait the unit implements
    ConflictingDerive(String),
    /// Marker arguments could not be parsed
    InvalidMarker(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConflictingMarkers => f.write_str("more than one wire marker"),
            Self::NotAStruct => f.write_str("marker is only supported on structs"),
            Self::Generic => f.write_str("generic structs cannot be extended"),
            Self::TupleStruct => f.write_str("messages need named fields"),
            Self::ConflictingDerive(name) => {
                write!(f, "derives `{name}`, which the generated unit implements")
            }
            Self::InvalidMarker(reason) => write!(f, "invalid marker arguments: {reason}"),
        }
    }
}

/// A marked item that was not accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// The item's identifier
    pub name: String,
    pub module_path: Vec<String>,
    pub reason: SkipReason,
}

impl Skipped {
    pub fn qualified_name(&self) -> String {
        qualify(&self.module_path, &self.name)
    }
}

/// Result of scanning one or more files
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub messages: Vec<Declaration>,
    pub services: Vec<Declaration>,
    pub skipped: Vec<Skipped>,
}

impl Discovery {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.services.is_empty() && self.skipped.is_empty()
    }

    /// Append another file's results, keeping discovery order
    pub fn extend(&mut self, other: Discovery) {
        self.messages.extend(other.messages);
        self.services.extend(other.services);
        self.skipped.extend(other.skipped);
    }
}

/// Marker arguments, as accepted by the attribute macros
#[derive(Debug, Default, FromMeta)]
struct MarkerArgs {
    #[darling(default)]
    name: Option<String>,
}

/// Scan a parsed file, descending into inline modules
pub fn discover(file: &syn::File) -> Discovery {
    let mut discovery = Discovery::default();
    let mut module_path = Vec::new();
    visit_items(&file.items, &mut module_path, &mut discovery);
    discovery
}

fn visit_items(items: &[Item], module_path: &mut Vec<String>, discovery: &mut Discovery) {
    for item in items {
        match item {
            Item::Struct(item_struct) => visit_struct(item_struct, module_path, discovery),
            Item::Mod(module) => {
                if let Some((_, nested)) = &module.content {
                    module_path.push(module.ident.to_string());
                    visit_items(nested, module_path, discovery);
                    module_path.pop();
                }
            }
            other => {
                if let Some((ident, attrs)) = ident_and_attrs(other)
                    && !markers(attrs).is_empty()
                {
                    skip(discovery, ident, module_path, SkipReason::NotAStruct);
                }
            }
        }
    }
}

fn visit_struct(item: &ItemStruct, module_path: &[String], discovery: &mut Discovery) {
    let ident = item.ident.to_string();
    let found = markers(&item.attrs);

    let (kind, marker) = match found.as_slice() {
        [] => return,
        [single] => *single,
        _ => return skip(discovery, ident, module_path, SkipReason::ConflictingMarkers),
    };

    let args = match marker_args(marker) {
        Ok(args) => args,
        Err(reason) => {
            return skip(discovery, ident, module_path, SkipReason::InvalidMarker(reason));
        }
    };

    if !item.generics.params.is_empty() {
        return skip(discovery, ident, module_path, SkipReason::Generic);
    }

    if kind == DeclarationKind::Message {
        if let Fields::Unnamed(_) = item.fields {
            return skip(discovery, ident, module_path, SkipReason::TupleStruct);
        }
        if let Some(derived) = conflicting_derive(&item.attrs) {
            return skip(
                discovery,
                ident,
                module_path,
                SkipReason::ConflictingDerive(derived),
            );
        }
    }

    let declaration = Declaration {
        name: args.name.unwrap_or_else(|| ident.clone()),
        ident: item.ident.clone(),
        kind,
        item: item.clone(),
        module_path: module_path.to_vec(),
    };
    debug!(
        schema = %declaration.name,
        path = %declaration.qualified_ident(),
        "found {kind}"
    );

    match kind {
        DeclarationKind::Message => discovery.messages.push(declaration),
        DeclarationKind::Service => discovery.services.push(declaration),
    }
}

fn skip(discovery: &mut Discovery, name: String, module_path: &[String], reason: SkipReason) {
    let skipped = Skipped {
        name,
        module_path: module_path.to_vec(),
        reason,
    };
    debug!(item = %skipped.qualified_name(), reason = %skipped.reason, "skipping marked item");
    discovery.skipped.push(skipped);
}

/// Recognized markers among `attrs`, in order
fn markers(attrs: &[Attribute]) -> Vec<(DeclarationKind, &Attribute)> {
    attrs
        .iter()
        .filter_map(|attr| {
            let last = attr.path().segments.last()?;
            if last.ident == MESSAGE_MARKER {
                Some((DeclarationKind::Message, attr))
            } else if last.ident == SERVICE_MARKER {
                Some((DeclarationKind::Service, attr))
            } else {
                None
            }
        })
        .collect()
}

fn marker_args(attr: &Attribute) -> Result<MarkerArgs, String> {
    let args = match &attr.meta {
        Meta::Path(_) => MarkerArgs::default(),
        Meta::List(list) => {
            let metas =
                NestedMeta::parse_meta_list(list.tokens.clone()).map_err(|e| e.to_string())?;
            MarkerArgs::from_list(&metas).map_err(|e| e.to_string())?
        }
        Meta::NameValue(_) => return Err("expected `name = \"...\"` in parentheses".into()),
    };

    if let Some(name) = &args.name
        && !is_schema_name(name)
    {
        return Err(format!("`{name}` is not a valid schema name"));
    }
    Ok(args)
}

/// First derived trait the generated unit would also implement
fn conflicting_derive(attrs: &[Attribute]) -> Option<String> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("derive"))
        .filter_map(|attr| {
            attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
                .ok()
        })
        .flatten()
        .filter_map(|path| path.segments.last().map(|s| s.ident.to_string()))
        .find(|name| GENERATED_TRAITS.contains(&name.as_str()))
}

fn ident_and_attrs(item: &Item) -> Option<(String, &[Attribute])> {
    let (ident, attrs) = match item {
        Item::Enum(i) => (&i.ident, &i.attrs),
        Item::Union(i) => (&i.ident, &i.attrs),
        Item::Fn(i) => (&i.sig.ident, &i.attrs),
        Item::Trait(i) => (&i.ident, &i.attrs),
        Item::Type(i) => (&i.ident, &i.attrs),
        Item::Const(i) => (&i.ident, &i.attrs),
        Item::Static(i) => (&i.ident, &i.attrs),
        _ => return None,
    };
    Some((ident.to_string(), attrs.as_slice()))
}

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

fn qualify(module_path: &[String], name: &str) -> String {
    if module_path.is_empty() {
        name.to_string()
    } else {
        format!("{}::{name}", module_path.join("::"))
    }
}
