//! Type Mapper: declared Rust field types to wire kinds
//!
//! The mapping is a fixed table plus the set of messages accepted in the
//! current run. `Option<T>` maps to `T`'s kind and marks the field nullable.

use crate::error::UnsupportedTypeError;
use syn::{GenericArgument, PathArguments, Type};
use wirekit_core::WireKind;

/// Type mapping from Rust to a wire kind
struct KindMapping {
    rust_type: &'static str,
    kind: WireKind,
}

const KIND_MAPPINGS: &[KindMapping] = &[
    KindMapping {
        rust_type: "i32",
        kind: WireKind::Int32,
    },
    KindMapping {
        rust_type: "i64",
        kind: WireKind::Int64,
    },
    KindMapping {
        rust_type: "u32",
        kind: WireKind::UInt32,
    },
    KindMapping {
        rust_type: "u64",
        kind: WireKind::UInt64,
    },
    KindMapping {
        rust_type: "f32",
        kind: WireKind::Float,
    },
    KindMapping {
        rust_type: "f64",
        kind: WireKind::Double,
    },
    KindMapping {
        rust_type: "bool",
        kind: WireKind::Bool,
    },
    KindMapping {
        rust_type: "String",
        kind: WireKind::String,
    },
];

/// A message accepted in this run
#[derive(Debug, Clone, PartialEq, Eq)]
struct KnownMessage {
    module_path: Vec<String>,
    ident: String,
    schema_name: String,
}

/// Messages accepted in this run, keyed by the module that declares them.
///
/// Field types are resolved against the declaring module of the message
/// that uses them, so two structs with the same name in different modules
/// stay distinct.
#[derive(Debug, Clone, Default)]
pub struct KnownMessages {
    entries: Vec<KnownMessage>,
}

/// Result of resolving a type path against [`KnownMessages`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// Schema name of the referenced message
    Found(&'a str),
    NotFound,
    /// More than one message matches and the path does not say which
    Ambiguous,
}

impl KnownMessages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `ident` declared in `module_path` under `schema_name`
    pub fn insert(
        &mut self,
        module_path: &[String],
        ident: impl Into<String>,
        schema_name: impl Into<String>,
    ) {
        self.entries.push(KnownMessage {
            module_path: module_path.to_vec(),
            ident: ident.into(),
            schema_name: schema_name.into(),
        });
    }

    /// Forget the message declared as `ident` in `module_path` with
    /// `schema_name`. Other messages sharing the struct name are kept.
    pub fn remove(
        &mut self,
        module_path: &[String],
        ident: &str,
        schema_name: &str,
    ) -> Option<String> {
        let index = self.entries.iter().position(|entry| {
            entry.module_path == module_path
                && entry.ident == ident
                && entry.schema_name == schema_name
        })?;
        Some(self.entries.remove(index).schema_name)
    }

    /// Schema name of the message declared exactly as `module_path::ident`
    pub fn schema_name(&self, module_path: &[String], ident: &str) -> Option<&str> {
        let mut matches = self
            .entries
            .iter()
            .filter(|entry| entry.module_path == module_path && entry.ident == ident);
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Some(entry.schema_name.as_str()),
            _ => None,
        }
    }

    /// Resolve a type path written inside `scope`.
    ///
    /// A bare name prefers a message declared in `scope` itself, then any
    /// single message with that name (brought in with `use`). A qualified
    /// path is tried relative to `scope` (`self::`, `super::` and plain
    /// `a::B`), then from the file root (`crate::`), then as a suffix of a
    /// declaring module path. Several candidates at the same step are
    /// ambiguous.
    pub fn lookup(&self, path: &syn::Path, scope: &[String]) -> Lookup<'_> {
        let Some(last) = path.segments.last() else {
            return Lookup::NotFound;
        };
        let ident = last.ident.to_string();
        let prefix: Vec<String> = path
            .segments
            .iter()
            .take(path.segments.len() - 1)
            .map(|segment| segment.ident.to_string())
            .collect();

        if prefix.is_empty() && path.leading_colon.is_none() {
            return match self.unique(|entry| entry.module_path == scope, &ident) {
                Lookup::NotFound => self.unique(|_| true, &ident),
                found => found,
            };
        }

        for module in candidate_modules(&prefix, scope) {
            match self.unique(|entry| entry.module_path == module, &ident) {
                Lookup::NotFound => {}
                found => return found,
            }
        }

        let tail: Vec<&String> = prefix
            .iter()
            .filter(|segment| !matches!(segment.as_str(), "crate" | "self" | "super"))
            .collect();
        self.unique(
            |entry| {
                entry.module_path.len() >= tail.len()
                    && entry.module_path[entry.module_path.len() - tail.len()..]
                        .iter()
                        .eq(tail.iter().copied())
            },
            &ident,
        )
    }

    fn unique(&self, in_module: impl Fn(&KnownMessage) -> bool, ident: &str) -> Lookup<'_> {
        let mut matches = self
            .entries
            .iter()
            .filter(|entry| entry.ident == ident && in_module(entry));
        match (matches.next(), matches.next()) {
            (None, _) => Lookup::NotFound,
            (Some(entry), None) => Lookup::Found(&entry.schema_name),
            (Some(_), Some(_)) => Lookup::Ambiguous,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Absolute module paths a qualified prefix may name from `scope`
fn candidate_modules(prefix: &[String], scope: &[String]) -> Vec<Vec<String>> {
    let mut segments = prefix.iter().peekable();
    match segments.peek().map(|segment| segment.as_str()) {
        Some("crate") => {
            segments.next();
            vec![segments.cloned().collect()]
        }
        Some("self") | Some("super") => {
            let mut module = scope.to_vec();
            while let Some(segment) = segments.peek() {
                match segment.as_str() {
                    "self" => {}
                    "super" => {
                        if module.pop().is_none() {
                            return Vec::new();
                        }
                    }
                    _ => break,
                }
                segments.next();
            }
            module.extend(segments.cloned());
            vec![module]
        }
        _ => {
            let relative: Vec<String> = scope.iter().chain(prefix).cloned().collect();
            vec![relative, prefix.to_vec()]
        }
    }
}

/// The wire shape of one field type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    pub kind: WireKind,
    pub nullable: bool,
    /// Referenced schema name, for `WireKind::Message`
    pub type_name: Option<String>,
}

/// Map a declared field type to its wire kind.
///
/// `scope` is the module path of the message declaring the field; message
/// references are resolved against it.
pub fn map_type(
    ty: &Type,
    known: &KnownMessages,
    scope: &[String],
) -> Result<MappedType, UnsupportedTypeError> {
    let (inner, nullable) = match option_inner(ty) {
        Some(inner) => {
            if option_inner(inner).is_some() {
                return Err(UnsupportedTypeError::new(
                    ty,
                    "only one level of Option is supported",
                ));
            }
            (inner, true)
        }
        None => (ty, false),
    };

    let (kind, type_name) = map_plain(inner, known, scope).map_err(|reason| {
        UnsupportedTypeError::new(ty, reason.unwrap_or_else(|| unsupported_reason(inner)))
    })?;
    Ok(MappedType {
        kind,
        nullable,
        type_name,
    })
}

/// The `T` of an `Option<T>`, if `ty` is one
pub fn option_inner(ty: &Type) -> Option<&Type> {
    let segment = last_segment(ty)?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

/// `Err(Some(reason))` when the type names a message ambiguously
fn map_plain(
    ty: &Type,
    known: &KnownMessages,
    scope: &[String],
) -> Result<(WireKind, Option<String>), Option<&'static str>> {
    let segment = last_segment(ty).ok_or(None)?;
    if !segment.arguments.is_none() {
        return Err(None);
    }
    let ident = segment.ident.to_string();

    if let Some(mapping) = KIND_MAPPINGS.iter().find(|m| m.rust_type == ident) {
        return Ok((mapping.kind, None));
    }

    let Type::Path(path) = ty else {
        return Err(None);
    };
    match known.lookup(&path.path, scope) {
        Lookup::Found(schema_name) => Ok((WireKind::Message, Some(schema_name.to_string()))),
        Lookup::NotFound => Err(None),
        Lookup::Ambiguous => Err(Some(
            "more than one message has this name; qualify the path",
        )),
    }
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(path) if path.qself.is_none() => path.path.segments.last(),
        Type::Paren(paren) => last_segment(&paren.elem),
        Type::Group(group) => last_segment(&group.elem),
        _ => None,
    }
}

fn unsupported_reason(ty: &Type) -> &'static str {
    match ty {
        Type::Reference(_) => "references cannot be decoded into; use an owned type",
        Type::Array(_) | Type::Slice(_) => "repeated fields are not supported",
        Type::Tuple(_) => "tuples are not supported",
        Type::Path(_) => match last_segment(ty) {
            Some(segment) if !segment.arguments.is_none() => "generic types are not supported",
            _ => "not a supported scalar or a generated message",
        },
        _ => "type has no wire representation",
    }
}
