//! Procedural macros for `workbench`.
//!
//! - `#[derive(Model)]` implements `workbench::Attributes` with one setter
//!   arm per named field and `workbench::Model` with the type's class path.
//! - `#[builders]` turns an inherent `impl` block into a builder-producing
//!   context: every associated function named `<entity>_defaults` is
//!   declared, in source order, by a generated `declare_builders`, and
//!   `new_<entity>`, `create_<entity>` and `find_or_create_<entity>`
//!   methods are generated for it.

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemImpl, parse_macro_input};

mod builders;
mod crate_path;
mod model;
mod signature;


/// Derive macro for `workbench::Model`.
///
/// Struct attributes: `#[workbench(path = "Admin::User")]`,
/// `#[workbench(namespace = "admin")]`, `#[workbench(crate = "alias")]`.
/// Field attributes: `#[workbench(skip)]`, `#[workbench(rename = "key")]`.
#[proc_macro_derive(Model, attributes(workbench))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Declares the `*_defaults` functions of an `impl` block as builders.
///
/// Accepts `#[builders(crate = "alias")]`. Inside the block,
/// `#[use_class(...)]` and `#[count_with(...)]` on a defaults function take
/// either a string literal (`"user"`, `"admin/user"`) or a type path.
#[proc_macro_attribute]
pub fn builders(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut crate_path = None;
    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("crate") {
            let lit: syn::LitStr = meta.value()?.parse()?;
            crate_path = Some(lit.parse::<syn::Path>()?);
            Ok(())
        } else {
            Err(meta.error("unsupported builders argument; expected `crate = \"...\"`"))
        }
    });
    parse_macro_input!(args with parser);
    let item = parse_macro_input!(input as ItemImpl);
    builders::expand(item, crate_path.as_ref())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
