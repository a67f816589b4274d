// leafbind-native: attribute macro for declaring native members
//
// Provides:
// - #[member] - Generates a HandlerDescriptor constructor for a typed function
//
// Example:
// ```
// use leafbind_native::member;
//
// #[member]
// fn set_volume(level: f64, #[default(-1)] fade_ms: i32) -> bool {
//     level > 0.0 && fade_ms != 0
// }
//
// let table = MemberTable::new("audio").member(set_volume_member())?;
// ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, ItemFn};

mod member;
mod params;

/// Marks a Rust function as a script-callable native member.
///
/// Leaves the function in place and generates `<fn>_member()`, which
/// returns a `leafbind_sdk::HandlerDescriptor` that:
/// - Checks the minimum argument count (every parameter before the first
///   optional one)
/// - Extracts each parameter left to right through `FromArg`
/// - Encodes the return value through `ToScript`
/// - Propagates `Err` from functions returning `Result`
///
/// Parameters:
/// - `Option<T>` is optional and yields `None` when omitted
/// - `#[default(expr)] x: T` is optional and yields `expr` when omitted
/// - A leading `&mut CallFrame` receives the frame itself
///
/// Attribute arguments:
/// - `name = "..."` overrides the script name (lowerCamelCase of the
///   function name by default)
/// - `mutable` lets scripts overwrite the member
///
/// # Example
///
/// ```ignore
/// #[member(name = "getText")]
/// fn text(frame: &mut CallFrame, id: i32) -> BindResult<String> {
///     lookup(frame, id)
/// }
/// ```
#[proc_macro_attribute]
pub fn member(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut args = member::MemberArgs::default();
    let parser = syn::meta::parser(|meta| args.parse(meta));
    parse_macro_input!(attr with parser);

    let input = parse_macro_input!(item as ItemFn);
    member::expand_member(args, input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
