//! Script logger
//!
//! `logger.log(...)` renders every argument with the runtime's ToString,
//! joins them with spaces and forwards the line to `debug_log!`. Release
//! builds drop the line.

use leafbind_native::member;
use leafbind_sdk::{debug_log, BindResult, CallFrame, JsValue, MemberTable, ScriptContext};

/// Render `values` the way `logger.log` prints them.
///
/// Values without a string form (native instances) print as their type name
/// in brackets instead of failing the call.
pub fn render(ctx: &dyn ScriptContext, values: &[JsValue]) -> String {
    values
        .iter()
        .map(|&value| match ctx.display_value(value) {
            Ok(text) => text.to_string(),
            Err(_) => format!("[{}]", value.type_name()),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[member]
fn log(frame: &mut CallFrame<'_>) -> BindResult<()> {
    let ctx = frame.context();
    let line = render(ctx, frame.rest());
    debug_log!("{}", line);
    Ok(())
}

/// The `logger` object
pub fn logger_table() -> BindResult<MemberTable> {
    MemberTable::new("logger").member(log_member())
}
