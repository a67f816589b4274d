// Parameter classification and extraction code generation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Expr, FnArg, GenericArgument, Ident, PathArguments, Result, Type};

/// How a parameter is filled from the call frame
pub enum ParamKind {
    /// Leading `&mut CallFrame`
    Frame,
    /// Must be supplied
    Required(Type),
    /// `Option<T>`: `None` when omitted
    Optional(Type),
    /// `#[default(expr)]`: `expr` when omitted
    Defaulted(Type, Expr),
}

/// One parsed parameter
pub struct Param {
    pub name: Ident,
    pub kind: ParamKind,
}

impl Param {
    /// True for parameters the caller may omit
    pub fn is_optional(&self) -> bool {
        matches!(self.kind, ParamKind::Optional(_) | ParamKind::Defaulted(..))
    }
}

/// Classify a function parameter, removing the `#[default]` attribute
pub fn parse_param(arg: &mut FnArg) -> Result<Param> {
    let pat_type = match arg {
        FnArg::Typed(pat_type) => pat_type,
        FnArg::Receiver(receiver) => {
            return Err(syn::Error::new_spanned(
                receiver,
                "Methods (self) are not supported in #[member]",
            ));
        }
    };

    let name = match &*pat_type.pat {
        syn::Pat::Ident(pat_ident) => pat_ident.ident.clone(),
        other => {
            return Err(syn::Error::new_spanned(
                other,
                "Only simple identifiers are supported as arguments",
            ));
        }
    };

    let mut default = None;
    let mut kept = Vec::with_capacity(pat_type.attrs.len());
    for attr in pat_type.attrs.drain(..) {
        if attr.path().is_ident("default") {
            default = Some(attr.parse_args::<Expr>()?);
        } else {
            kept.push(attr);
        }
    }
    pat_type.attrs = kept;

    let ty = (*pat_type.ty).clone();
    let kind = if is_frame(&ty) {
        if default.is_some() {
            return Err(syn::Error::new_spanned(&ty, "the call frame cannot have a default"));
        }
        ParamKind::Frame
    } else if let Some(expr) = default {
        ParamKind::Defaulted(ty, expr)
    } else if let Some(inner) = option_inner(&ty) {
        ParamKind::Optional(inner.clone())
    } else {
        ParamKind::Required(ty)
    };

    Ok(Param { name, kind })
}

/// `&mut CallFrame<'_>` (any path ending in `CallFrame`)
fn is_frame(ty: &Type) -> bool {
    match ty {
        Type::Reference(r) if r.mutability.is_some() => match &*r.elem {
            Type::Path(p) => p
                .path
                .segments
                .last()
                .is_some_and(|seg| seg.ident == "CallFrame"),
            _ => false,
        },
        _ => false,
    }
}

/// `T` of `Option<T>`
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(p) = ty else {
        return None;
    };
    let seg = p.path.segments.last()?;
    if seg.ident != "Option" {
        return None;
    }
    match &seg.arguments {
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first()? {
            GenericArgument::Type(inner) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}

/// Generates the statement binding one parameter from `frame`.
pub fn generate_extraction(param: &Param, frame: &Ident) -> TokenStream {
    let name = &param.name;
    match &param.kind {
        ParamKind::Frame => TokenStream::new(),
        ParamKind::Required(ty) => quote! {
            let #name = <#ty as ::leafbind_sdk::FromArg>::from_arg(#frame)?;
        },
        ParamKind::Optional(ty) => quote! {
            let #name = <#ty as ::leafbind_sdk::FromArg>::from_optional_arg(#frame)?;
        },
        ParamKind::Defaulted(ty, default) => quote! {
            let #name: #ty = match <#ty as ::leafbind_sdk::FromArg>::from_optional_arg(#frame)? {
                ::core::option::Option::Some(value) => value,
                ::core::option::Option::None => #default,
            };
        },
    }
}

/// Generates the argument passed to the wrapped function.
pub fn generate_call_arg(param: &Param, frame: &Ident) -> TokenStream {
    match param.kind {
        ParamKind::Frame => quote! { &mut *#frame },
        _ => {
            let name = &param.name;
            quote! { #name }
        }
    }
}
