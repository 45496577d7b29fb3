//! Runtime crate path used by generated code.
//!
//! Both macros accept `crate = "..."` for callers that import `workbench`
//! under another name, e.g. `use workbench as bench;` followed by
//! `#[derive(Model)] #[workbench(crate = "bench")]` and
//! `#[builders(crate = "bench")]`. Every runtime path in the expansion
//! (`Attributes`, `Defaults`, `overrides` and so on) is prefixed with the
//! tokens returned here.

use proc_macro2::TokenStream;
use quote::quote;

/// Prefix for runtime paths: the `crate = "..."` argument, or the
/// absolute `::workbench` so a local module named `workbench` cannot
/// shadow it.
///
/// ```rust,ignore
/// assert_eq!(resolve(None).to_string(), ":: workbench");
///
/// let alias: syn::Path = syn::parse_quote!(bench);
/// let tokens = resolve(Some(&alias));
/// assert_eq!(quote!(#tokens::Defaults).to_string(), "bench :: Defaults");
/// ```
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { ::workbench }, |path| quote! { #path })
}
