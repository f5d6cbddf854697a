//! Service Stub Synthesizer

use crate::discovery::Declaration;
use proc_macro2::{Literal, TokenStream};
use quote::quote;

/// The unit for a service declaration: its name and nothing else
pub fn synthesize_service(declaration: &Declaration, runtime: &syn::Path) -> TokenStream {
    let ident = &declaration.ident;
    let name = Literal::string(&declaration.name);

    quote! {
        #[automatically_derived]
        impl #runtime::Service for #ident {
            const SERVICE_NAME: &'static str = #name;
        }
    }
}

#[cfg(test)]
#[path = "service/service_tests.rs"]
mod service_tests;
