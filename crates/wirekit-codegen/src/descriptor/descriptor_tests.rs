#![allow(non_snake_case)]

use super::*;
use crate::discovery::discover;
use crate::schema::extract;
use wirekit_core::DescriptorError;

fn schema(file: syn::File) -> Schema {
    let declaration = discover(&file).messages.into_iter().next().unwrap();
    extract(&declaration).unwrap()
}

#[test]
fn resolve___positional_numbers___start_at_one() {
    let schema = schema(syn::parse_quote! {
        #[wire_message]
        struct Point { x: i32, y: i32 }
    });

    let fields = resolve(&schema, &KnownMessages::new()).unwrap();

    let numbers: Vec<_> = fields.iter().map(|f| f.number).collect();
    assert_eq!(numbers, [1, 2]);
    assert_eq!(fields[0].kind, WireKind::Int32);
}

#[test]
fn resolve___skipped_member___does_not_take_a_position() {
    let schema = schema(syn::parse_quote! {
        #[wire_message]
        struct Cached {
            #[wire(skip)]
            hits: u8,
            value: String,
        }
    });

    let fields = resolve(&schema, &KnownMessages::new()).unwrap();

    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].number, 1);
}

#[test]
fn resolve___explicit_number___overrides_position() {
    let schema = schema(syn::parse_quote! {
        #[wire_message]
        struct Order {
            id: u64,
            #[wire(number = 10)]
            note: Option<String>,
        }
    });

    let fields = resolve(&schema, &KnownMessages::new()).unwrap();

    assert_eq!(fields[1].number, 10);
    assert!(fields[1].nullable);
}

#[test]
fn resolve___unsupported_type___names_the_field() {
    let schema = schema(syn::parse_quote! {
        #[wire_message]
        struct Pixel { red: u8 }
    });

    let err = resolve(&schema, &KnownMessages::new()).unwrap_err();

    assert!(matches!(
        err,
        CodegenError::UnsupportedType { ref message, ref field, .. }
            if message == "Pixel" && field == "red"
    ));
}

#[test]
fn resolve___known_message___gets_type_name() {
    let schema = schema(syn::parse_quote! {
        #[wire_message]
        struct User { home: Address }
    });
    let mut known = KnownMessages::new();
    known.insert(&[], "Address", "Address");

    let fields = resolve(&schema, &known).unwrap();

    assert_eq!(fields[0].kind, WireKind::Message);
    assert_eq!(fields[0].type_name.as_deref(), Some("Address"));
}

#[test]
fn build___fields___keep_order_and_attributes() {
    let schema = schema(syn::parse_quote! {
        #[wire_message]
        struct User { id: u64, home: Option<Address> }
    });
    let mut known = KnownMessages::new();
    known.insert(&[], "Address", "Address");
    let fields = resolve(&schema, &known).unwrap();

    let descriptor = build("User", &fields).unwrap();

    assert_eq!(descriptor.schema_name(), "User");
    let home = descriptor.field_by_number(2).unwrap();
    assert_eq!(home.name(), "home");
    assert!(home.is_nullable());
    assert_eq!(home.type_name(), Some("Address"));
}

#[test]
fn build___explicit_number_colliding_with_position___fails() {
    let schema = schema(syn::parse_quote! {
        #[wire_message]
        struct Clash {
            a: i32,
            #[wire(number = 1)]
            b: i32,
        }
    });
    let fields = resolve(&schema, &KnownMessages::new()).unwrap();

    let err = build("Clash", &fields).unwrap_err();

    assert!(matches!(
        err,
        CodegenError::Descriptor(DescriptorError::DuplicateFieldNumber { number: 1, .. })
    ));
}

#[test]
fn build___number_above_range___fails() {
    let schema = schema(syn::parse_quote! {
        #[wire_message]
        struct Far {
            #[wire(number = 536870912)]
            a: i32,
        }
    });
    let fields = resolve(&schema, &KnownMessages::new()).unwrap();

    let err = build("Far", &fields).unwrap_err();

    assert!(matches!(
        err,
        CodegenError::Descriptor(DescriptorError::InvalidFieldNumber { .. })
    ));
}

#[test]
fn build___gaps___are_allowed() {
    let schema = schema(syn::parse_quote! {
        #[wire_message]
        struct Sparse {
            a: bool,
            #[wire(number = 5)]
            b: bool,
        }
    });
    let fields = resolve(&schema, &KnownMessages::new()).unwrap();

    let descriptor = build("Sparse", &fields).unwrap();

    assert_eq!(descriptor.number_gaps(), [2..=4]);
}

#[test]
fn build___largest_valid_number___is_accepted() {
    let schema = schema(syn::parse_quote! {
        #[wire_message]
        struct Wide {
            first: u32,
            #[wire(number = 536870911)]
            last: u32,
        }
    });
    let fields = resolve(&schema, &KnownMessages::new()).unwrap();

    let descriptor = build("Wide", &fields).unwrap();

    assert_eq!(descriptor.field_by_name("last").unwrap().number(), 536_870_911);
    assert_eq!(descriptor.number_gaps(), [2..=536_870_910]);
}
