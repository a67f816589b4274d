// #[member] proc-macro implementation
//
// Generates a HandlerDescriptor constructor for a typed Rust function.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::meta::ParseNestedMeta;
use syn::{ItemFn, LitStr, Result, ReturnType, Type};

use crate::params::{generate_call_arg, generate_extraction, parse_param, Param, ParamKind};

/// Arguments of `#[member(...)]`
#[derive(Default)]
pub struct MemberArgs {
    name: Option<String>,
    mutable: bool,
}

impl MemberArgs {
    pub fn parse(&mut self, meta: ParseNestedMeta) -> Result<()> {
        if meta.path.is_ident("name") {
            let lit: LitStr = meta.value()?.parse()?;
            if lit.value().is_empty() {
                return Err(syn::Error::new_spanned(lit, "member name cannot be empty"));
            }
            self.name = Some(lit.value());
            Ok(())
        } else if meta.path.is_ident("mutable") {
            self.mutable = true;
            Ok(())
        } else {
            Err(meta.error("unsupported #[member] argument; expected `name = \"...\"` or `mutable`"))
        }
    }
}

/// Expands the #[member] attribute macro.
///
/// Input: Original Rust function
/// Output: Original function (parameter attributes removed) + descriptor
/// constructor
///
/// Example expansion:
/// ```ignore
/// // Input:
/// #[member]
/// fn set_volume(level: f64, #[default(-1)] fade_ms: i32) -> bool { .. }
///
/// // Output:
/// fn set_volume(level: f64, fade_ms: i32) -> bool { .. }
///
/// fn set_volume_member() -> ::leafbind_sdk::HandlerDescriptor {
///     ::leafbind_sdk::HandlerDescriptor::new("setVolume", 1, |__frame| {
///         let level = <f64 as FromArg>::from_arg(__frame)?;
///         let fade_ms: i32 = match <i32 as FromArg>::from_optional_arg(__frame)? { .. };
///         let __result = set_volume(level, fade_ms);
///         __frame.set_return(__result);
///         Ok(())
///     })
/// }
/// ```
pub fn expand_member(args: MemberArgs, mut func: ItemFn) -> Result<TokenStream> {
    if let Some(asyncness) = &func.sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "async functions are not supported in #[member]",
        ));
    }
    if !func.sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &func.sig.generics,
            "generic functions are not supported in #[member]",
        ));
    }
    if let Some(variadic) = &func.sig.variadic {
        return Err(syn::Error::new_spanned(variadic, "variadic functions are not supported"));
    }

    let mut params: Vec<Param> = Vec::with_capacity(func.sig.inputs.len());
    for arg in func.sig.inputs.iter_mut() {
        params.push(parse_param(arg)?);
    }
    validate_order(&params)?;

    let func_name = &func.sig.ident;
    let member_fn = format_ident!("{}_member", func_name);
    let vis = &func.vis;
    let js_name = args
        .name
        .unwrap_or_else(|| to_lower_camel_case(&func_name.to_string()));
    let min_args = params
        .iter()
        .filter(|p| matches!(p.kind, ParamKind::Required(_)))
        .count();

    let frame = format_ident!("__frame");
    let extractions = params.iter().map(|p| generate_extraction(p, &frame));
    let call_args = params.iter().map(|p| generate_call_arg(p, &frame));
    let call = quote! { #func_name(#(#call_args),*) };

    let body = match &func.sig.output {
        ReturnType::Default => quote! {
            #call;
        },
        ReturnType::Type(_, ty) if is_result(ty) => quote! {
            let __result = #call?;
            #frame.set_return(__result);
        },
        ReturnType::Type(..) => quote! {
            let __result = #call;
            #frame.set_return(__result);
        },
    };

    let access = if args.mutable {
        quote! { .mutable() }
    } else {
        TokenStream::new()
    };
    let doc = format!("Handler descriptor for [`{}`], exposed as `{}`.", func_name, js_name);

    Ok(quote! {
        #func

        #[doc = #doc]
        #vis fn #member_fn() -> ::leafbind_sdk::HandlerDescriptor {
            ::leafbind_sdk::HandlerDescriptor::new(
                #js_name,
                #min_args,
                |#frame: &mut ::leafbind_sdk::CallFrame<'_>| -> ::leafbind_sdk::BindResult<()> {
                    #(#extractions)*
                    #body
                    ::core::result::Result::Ok(())
                },
            )
            #access
        }
    })
}

/// Frame first, required before optional
fn validate_order(params: &[Param]) -> Result<()> {
    let mut seen_optional = false;
    for (i, param) in params.iter().enumerate() {
        match param.kind {
            ParamKind::Frame if i != 0 => {
                return Err(syn::Error::new_spanned(
                    &param.name,
                    "the call frame must be the first parameter",
                ));
            }
            ParamKind::Required(_) if seen_optional => {
                return Err(syn::Error::new_spanned(
                    &param.name,
                    "required parameters must come before optional ones",
                ));
            }
            _ => {}
        }
        seen_optional |= param.is_optional();
    }
    Ok(())
}

/// `Result<..>` or `BindResult<..>` by last path segment
fn is_result(ty: &Type) -> bool {
    match ty {
        Type::Path(p) => p
            .path
            .segments
            .last()
            .is_some_and(|seg| seg.ident == "Result" || seg.ident == "BindResult"),
        _ => false,
    }
}

/// `set_text_scale` -> `setTextScale`
fn to_lower_camel_case(ident: &str) -> String {
    let ident = ident.strip_prefix("r#").unwrap_or(ident);
    let mut out = String::with_capacity(ident.len());
    for (i, part) in ident.split('_').filter(|p| !p.is_empty()).enumerate() {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                out.push(first);
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_camel_case() {
        assert_eq!(to_lower_camel_case("set_volume"), "setVolume");
        assert_eq!(to_lower_camel_case("dismiss_all"), "dismissAll");
        assert_eq!(to_lower_camel_case("log"), "log");
        assert_eq!(to_lower_camel_case("_private_helper"), "privateHelper");
        assert_eq!(to_lower_camel_case("r#type"), "type");
        assert_eq!(to_lower_camel_case("set_text_scale_2"), "setTextScale2");
    }

    #[test]
    fn test_is_result() {
        assert!(is_result(&parse_quote!(Result<i32, String>)));
        assert!(is_result(&parse_quote!(leafbind_sdk::BindResult<()>)));
        assert!(!is_result(&parse_quote!(Option<i32>)));
        assert!(!is_result(&parse_quote!((i32, i32))));
    }

    #[test]
    fn test_expansion_names_descriptor() {
        let func: ItemFn = parse_quote! {
            pub fn set_volume(level: f64, #[default(-1)] fade_ms: i32) -> bool {
                level > 0.0 && fade_ms != 0
            }
        };
        let out = expand_member(MemberArgs::default(), func).unwrap().to_string();
        assert!(out.contains("set_volume_member"));
        assert!(out.contains("\"setVolume\""));
        assert!(!out.contains("default"));
    }

    #[test]
    fn test_rejects_required_after_optional() {
        let func: ItemFn = parse_quote! {
            fn bad(a: Option<i32>, b: i32) {}
        };
        assert!(expand_member(MemberArgs::default(), func).is_err());
    }

    #[test]
    fn test_rejects_frame_not_first() {
        let func: ItemFn = parse_quote! {
            fn bad(a: i32, frame: &mut CallFrame<'_>) {}
        };
        assert!(expand_member(MemberArgs::default(), func).is_err());
    }

    #[test]
    fn test_rejects_async_and_generics() {
        let func: ItemFn = parse_quote! { async fn slow() {} };
        assert!(expand_member(MemberArgs::default(), func).is_err());

        let func: ItemFn = parse_quote! { fn generic<T>(t: T) {} };
        assert!(expand_member(MemberArgs::default(), func).is_err());
    }
}
