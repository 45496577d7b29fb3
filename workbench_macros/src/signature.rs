//! Arity inference for defaults functions.
//!
//! The first parameter must be `&mut T`. The second receives the counter
//! and the third the raw overrides; either may be wrapped in `Option` to
//! make it optional, which makes the whole function variadic. Optional
//! parameters must come after required ones.

use syn::{FnArg, GenericArgument, PathArguments, ReturnType, Signature, Type};

/// How one trailing parameter receives its argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    Required,
    Optional,
}

/// Shape of a defaults function, read from its signature.
#[derive(Clone)]
pub(crate) struct DefaultsSignature {
    pub target: Type,
    pub counter: Option<Slot>,
    pub overrides: Option<Slot>,
    pub fallible: bool,
}

impl DefaultsSignature {
    /// Minimum number of positional parameters.
    pub(crate) fn required(&self) -> u8 {
        let trailing = [self.counter, self.overrides]
            .into_iter()
            .take_while(|slot| *slot == Some(Slot::Required))
            .count();
        1 + u8::try_from(trailing).unwrap_or(2)
    }

    /// Whether any parameter is optional.
    pub(crate) fn variadic(&self) -> bool {
        self.counter == Some(Slot::Optional) || self.overrides == Some(Slot::Optional)
    }
}

pub(crate) fn is_option(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    path.qself.is_none()
        && path.path.segments.last().is_some_and(|segment| {
            segment.ident == "Option"
                && matches!(
                    &segment.arguments,
                    PathArguments::AngleBracketed(args)
                        if args.args.len() == 1
                            && matches!(args.args.first(), Some(GenericArgument::Type(_)))
                )
        })
}

pub(crate) fn parse(sig: &Signature) -> syn::Result<DefaultsSignature> {
    let mut inputs = sig.inputs.iter();
    let target = match inputs.next() {
        Some(FnArg::Typed(pat)) => match &*pat.ty {
            Type::Reference(reference) if reference.mutability.is_some() => {
                (*reference.elem).clone()
            }
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "the first parameter of a defaults function must be `&mut T`",
                ));
            }
        },
        Some(FnArg::Receiver(receiver)) => {
            return Err(syn::Error::new_spanned(
                receiver,
                "defaults functions are associated functions and cannot take `self`",
            ));
        }
        None => {
            return Err(syn::Error::new_spanned(
                &sig.ident,
                "a defaults function takes the object being built as its first parameter",
            ));
        }
    };

    let mut slots = Vec::new();
    let mut seen_optional = false;
    for arg in inputs {
        let FnArg::Typed(pat) = arg else {
            return Err(syn::Error::new_spanned(arg, "unexpected receiver"));
        };
        let slot = if is_option(&pat.ty) {
            seen_optional = true;
            Slot::Optional
        } else if seen_optional {
            return Err(syn::Error::new_spanned(
                &pat.ty,
                "required parameters cannot follow optional ones",
            ));
        } else {
            Slot::Required
        };
        slots.push((slot, pat));
    }
    if let Some((_, extra)) = slots.get(2) {
        return Err(syn::Error::new_spanned(
            extra,
            "defaults functions take at most the object, a counter and the overrides",
        ));
    }

    Ok(DefaultsSignature {
        target,
        counter: slots.first().map(|(slot, _)| *slot),
        overrides: slots.get(1).map(|(slot, _)| *slot),
        fallible: !matches!(sig.output, ReturnType::Default),
    })
}
