//! Expansion of `#[builders]`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::parse::{Parse, ParseStream};
use syn::{Attribute, ImplItem, ImplItemFn, ItemImpl, LitStr, Type};
use workbench_naming::entity_name;

use crate::crate_path;
use crate::signature::{self, DefaultsSignature, Slot};

const USE_CLASS: &str = "use_class";
const COUNT_WITH: &str = "count_with";

/// Argument of `#[use_class(...)]` / `#[count_with(...)]`.
pub(crate) enum OverrideArg {
    Name(LitStr),
    Type(Type),
}

impl Parse for OverrideArg {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        if input.peek(LitStr) {
            input.parse().map(Self::Name)
        } else {
            input.parse().map(Self::Type)
        }
    }
}

impl OverrideArg {
    fn identifier(&self, krate: &TokenStream) -> TokenStream {
        match self {
            Self::Name(lit) => quote! { #lit },
            Self::Type(ty) => quote! { #krate::Identifier::of::<#ty>() },
        }
    }
}

/// One recognised `<entity>_defaults` function.
pub(crate) struct Declaration {
    pub entity: String,
    pub fn_ident: syn::Ident,
    pub signature: DefaultsSignature,
    pub use_class: Option<OverrideArg>,
    pub count_with: Option<OverrideArg>,
}

/// Removes and parses an override attribute from `attrs`.
fn take_override(attrs: &mut Vec<Attribute>, name: &str) -> syn::Result<Option<OverrideArg>> {
    let mut found: Option<OverrideArg> = None;
    let mut error: Option<syn::Error> = None;
    attrs.retain(|attr| {
        if !attr.path().is_ident(name) {
            return true;
        }
        if found.is_some() {
            error.get_or_insert_with(|| {
                syn::Error::new_spanned(attr, format!("duplicate `{name}` attribute"))
            });
        } else {
            match attr.parse_args::<OverrideArg>() {
                Ok(arg) => found = Some(arg),
                Err(err) => {
                    error.get_or_insert(err);
                }
            }
        }
        false
    });
    error.map_or(Ok(found), Err)
}

pub(crate) fn declaration(item: &mut ImplItemFn) -> syn::Result<Option<Declaration>> {
    let use_class = take_override(&mut item.attrs, USE_CLASS)?;
    let count_with = take_override(&mut item.attrs, COUNT_WITH)?;
    let fn_name = item.sig.ident.to_string();
    let Some(entity) = entity_name(&fn_name) else {
        if use_class.is_some() || count_with.is_some() {
            return Err(syn::Error::new_spanned(
                &item.sig.ident,
                "`use_class` and `count_with` apply only to `<entity>_defaults` functions",
            ));
        }
        return Ok(None);
    };
    Ok(Some(Declaration {
        entity: entity.to_owned(),
        fn_ident: item.sig.ident.clone(),
        signature: signature::parse(&item.sig)?,
        use_class,
        count_with,
    }))
}

fn declare_tokens(decl: &Declaration, krate: &TokenStream) -> TokenStream {
    let fn_name = decl.fn_ident.to_string();
    let fn_ident = &decl.fn_ident;
    let target = &decl.signature.target;
    let required = decl.signature.required();
    let variadic = decl.signature.variadic();
    let mut args = Vec::new();
    match decl.signature.counter {
        Some(Slot::Required) => args.push(quote! { args.counter()? }),
        Some(Slot::Optional) => args.push(quote! { args.counter_opt() }),
        None => {}
    }
    match decl.signature.overrides {
        Some(Slot::Required) => args.push(quote! { args.overrides()? }),
        Some(Slot::Optional) => args.push(quote! { args.overrides_opt() }),
        None => {}
    }
    let unused = args.is_empty().then(|| quote! { let _ = args; });
    let call = if decl.signature.fallible {
        quote! { Self::#fn_ident(record, #(#args),*).map_err(#krate::WorkbenchError::defaults) }
    } else {
        quote! {
            Self::#fn_ident(record, #(#args),*);
            ::core::result::Result::Ok(())
        }
    };
    let use_class = decl.use_class.as_ref().map(|arg| {
        let identifier = arg.identifier(krate);
        quote! { builders.use_class(#identifier); }
    });
    let count_with = decl.count_with.as_ref().map(|arg| {
        let identifier = arg.identifier(krate);
        quote! { builders.count_with(#identifier); }
    });
    quote! {
        #use_class
        #count_with
        builders.declare(
            #fn_name,
            #krate::Defaults::with_arity::<#target, _>(
                #krate::Arity::new(#required, #variadic),
                |record: &mut #target, args: #krate::DefaultsArgs<'_>| {
                    #unused
                    #call
                },
            ),
        )?;
    }
}

fn operation_tokens(decl: &Declaration, krate: &TokenStream) -> TokenStream {
    let entity = &decl.entity;
    let target = &decl.signature.target;
    let new_ident = format_ident!("new_{}", entity);
    let create_ident = format_ident!("create_{}", entity);
    let find_ident = format_ident!("find_or_create_{}", entity);
    let new_doc = format!("Builds a `{entity}` from its defaults without persisting it.");
    let create_doc = format!("Builds a `{entity}` from its defaults and saves it.");
    let find_doc = format!(
        "Returns the first persisted `{entity}` matching the overrides, \
         creating one if none exists."
    );
    quote! {
        #[doc = #new_doc]
        pub fn #new_ident(&self, overrides: &#krate::Overrides) -> #krate::Result<#target> {
            #krate::BuilderContext::builders(self)
                .builder(#entity)?
                .build_as::<#target>(overrides)
        }

        #[doc = #create_doc]
        pub fn #create_ident(&self, overrides: &#krate::Overrides) -> #krate::Result<#target> {
            #krate::BuilderContext::builders(self)
                .builder(#entity)?
                .create_as::<#target>(overrides)
        }

        #[doc = #find_doc]
        pub fn #find_ident(&self, overrides: &#krate::Overrides) -> #krate::Result<#target> {
            #krate::BuilderContext::builders(self)
                .builder(#entity)?
                .find_or_create_as::<#target>(overrides)
        }
    }
}

pub(crate) fn expand(
    mut item: ItemImpl,
    crate_path: Option<&syn::Path>,
) -> syn::Result<TokenStream> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[builders] applies to inherent impl blocks only",
        ));
    }
    let krate = crate_path::resolve(crate_path);
    let mut declarations = Vec::new();
    for impl_item in &mut item.items {
        if let ImplItem::Fn(function) = impl_item {
            if let Some(decl) = declaration(function)? {
                declarations.push(decl);
            }
        }
    }

    let declares = declarations.iter().map(|decl| declare_tokens(decl, &krate));
    let operations = declarations.iter().map(|decl| operation_tokens(decl, &krate));
    let self_ty = &item.self_ty;
    let (impl_generics, _, where_clause) = item.generics.split_for_impl();

    Ok(quote! {
        #item

        impl #impl_generics #self_ty #where_clause {
            /// Declares this context's `*_defaults` functions on `builders`,
            /// in source order.
            ///
            /// # Errors
            ///
            /// Fails when a target or counter class does not resolve.
            pub fn declare_builders(builders: &#krate::Builders) -> #krate::Result<()> {
                #( #declares )*
                ::core::result::Result::Ok(())
            }

            #( #operations )*
        }
    })
}
