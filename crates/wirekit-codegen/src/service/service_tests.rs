#![allow(non_snake_case)]

use super::*;
use crate::discovery::discover;

#[test]
fn synthesize_service___implements_service_with_schema_name() {
    let file: syn::File = syn::parse_quote! {
        #[wire_service(name = "UserDirectory")]
        pub struct Directory;
    };
    let declaration = discover(&file).services.into_iter().next().unwrap();

    let tokens = synthesize_service(&declaration, &syn::parse_quote!(::wirekit));
    let item: syn::ItemImpl = syn::parse2(tokens).unwrap();

    let trait_path = &item.trait_.as_ref().unwrap().1;
    assert_eq!(quote::quote!(#trait_path).to_string(), ":: wirekit :: Service");
    assert_eq!(item.items.len(), 1);
    let text = quote::quote!(#item).to_string();
    assert!(text.contains("\"UserDirectory\""));
}
