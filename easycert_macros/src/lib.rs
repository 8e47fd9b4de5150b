use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Derives `to_string_lines(&self, title)`, which renders every named field
/// as an aligned `key: value` line, in declaration order, between a header
/// and a footer rule.
///
/// Every field type must implement [std::fmt::Debug].
#[proc_macro_derive(ToStringLines)]
pub fn to_string_lines_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = &ast.ident;

    let fields = match &ast.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields_named) => &fields_named.named,
            _ => {
                return syn::Error::new_spanned(
                    &ast.ident,
                    "ToStringLines can only be derived for structs with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(
                &ast.ident,
                "ToStringLines can only be derived for structs",
            )
            .to_compile_error()
            .into();
        }
    };

    // (key, value) pairs in declaration order
    let entries = fields.iter().filter_map(|field| {
        let ident = field.ident.as_ref()?;
        let key = ident.to_string();
        Some(quote! {
            (#key, format!("{:?}", self.#ident))
        })
    });

    let generated = quote! {
        impl #name {
            #[allow(dead_code)]
            pub(crate) fn to_string_lines(&self, title: impl std::fmt::Display) -> Vec<String> {
                let entries: Vec<(&str, String)> = vec![#(#entries),*];
                let width = entries.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);

                let header = format!("--- {} configuration ---", title);
                let footer = "-".repeat(header.chars().count());
                let mut lines = Vec::<String>::with_capacity(entries.len() + 2);
                lines.push(header);
                for (key, value) in entries {
                    lines.push(format!("  {:width$}: {}", key, value, width = width));
                }
                lines.push(footer);
                lines
            }
        }
    };

    generated.into()
}
