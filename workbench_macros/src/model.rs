//! Expansion of `#[derive(Model)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr};

use workbench_naming::class_path_in;

use crate::crate_path;

#[derive(Default)]
pub(crate) struct StructAttrs {
    pub path: Option<LitStr>,
    pub namespace: Option<LitStr>,
    pub crate_path: Option<syn::Path>,
}

#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub skip: bool,
    pub rename: Option<String>,
}

fn parse_workbench<F>(attrs: &[syn::Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&syn::meta::ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("workbench")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

pub(crate) fn parse_struct_attrs(attrs: &[syn::Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    parse_workbench(attrs, |meta| {
        if meta.path.is_ident("path") {
            out.path = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("namespace") {
            out.namespace = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("crate") {
            let lit: LitStr = meta.value()?.parse()?;
            out.crate_path = Some(lit.parse()?);
        } else {
            return Err(meta.error(
                "unknown workbench attribute; expected `path`, `namespace` or `crate`",
            ));
        }
        Ok(())
    })?;
    if let (Some(_), Some(namespace)) = (&out.path, &out.namespace) {
        return Err(syn::Error::new_spanned(
            namespace,
            "`path` and `namespace` are mutually exclusive",
        ));
    }
    Ok(out)
}

pub(crate) fn parse_field_attrs(attrs: &[syn::Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_workbench(attrs, |meta| {
        if meta.path.is_ident("skip") {
            out.skip = true;
        } else if meta.path.is_ident("rename") {
            let lit: LitStr = meta.value()?.parse()?;
            out.rename = Some(lit.value());
        } else {
            return Err(meta.error(
                "unknown workbench field attribute; expected `skip` or `rename`",
            ));
        }
        Ok(())
    })?;
    Ok(out)
}

/// Class path for a struct: the explicit `path`, the classified
/// `namespace` followed by the struct name, or the struct name alone.
pub(crate) fn class_path(ident: &syn::Ident, attrs: &StructAttrs) -> String {
    if let Some(path) = &attrs.path {
        return path.value().trim_start_matches(':').to_owned();
    }
    let name = ident.to_string();
    attrs
        .namespace
        .as_ref()
        .map_or_else(|| name.clone(), |namespace| class_path_in(&namespace.value(), &name))
}

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let ident = &input.ident;
    let attrs = parse_struct_attrs(&input.attrs)?;
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            _ => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "Model requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                ident,
                "Model can only be derived for structs",
            ));
        }
    };

    let krate = crate_path::resolve(attrs.crate_path.as_ref());
    let mut keys = Vec::new();
    let mut members = Vec::new();
    for field in fields {
        let field_attrs = parse_field_attrs(&field.attrs)?;
        if field_attrs.skip {
            continue;
        }
        let Some(member) = field.ident.as_ref() else {
            continue;
        };
        let key = field_attrs
            .rename
            .unwrap_or_else(|| member.to_string().trim_start_matches("r#").to_owned());
        keys.push(key);
        members.push(member);
    }

    let path = class_path(ident, &attrs);
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #krate::Attributes for #ident #ty_generics #where_clause {
            fn assign(
                &mut self,
                key: &str,
                value: &#krate::serde_json::Value,
            ) -> ::core::result::Result<(), #krate::AttributeError> {
                match key {
                    #(
                        #keys => {
                            self.#members = #krate::serde_json::from_value(
                                ::core::clone::Clone::clone(value),
                            )
                            .map_err(|source| #krate::AttributeError::invalid(key, source))?;
                            ::core::result::Result::Ok(())
                        }
                    )*
                    _ => ::core::result::Result::Err(#krate::AttributeError::unknown(key)),
                }
            }

            fn attribute(&self, key: &str) -> ::core::option::Option<#krate::serde_json::Value> {
                match key {
                    #( #keys => #krate::serde_json::to_value(&self.#members).ok(), )*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #impl_generics #krate::Model for #ident #ty_generics #where_clause {
            const PATH: &'static str = #path;
        }
    })
}
