//! Return value encoding
//!
//! `ToScript` turns a native result into a runtime value. Encoding does no
//! validation: the handler picks the encoder that matches its native type.

use crate::args::{ArrayRef, FunctionRef};
use crate::context::ScriptContext;
use crate::value::{JsValue, ObjectRef};

/// The `null` sentinel as a native return type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Null;

/// The `undefined` sentinel as a native return type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Undefined;

/// Convert a native value into a runtime value.
///
/// Implement this trait to allow your type to be returned from a handler.
pub trait ToScript {
    /// Encode into the runtime's representation
    fn to_script(self, ctx: &dyn ScriptContext) -> JsValue;
}

impl ToScript for JsValue {
    fn to_script(self, _ctx: &dyn ScriptContext) -> JsValue {
        self
    }
}

impl ToScript for i32 {
    fn to_script(self, _ctx: &dyn ScriptContext) -> JsValue {
        JsValue::int32(self)
    }
}

impl ToScript for f64 {
    fn to_script(self, _ctx: &dyn ScriptContext) -> JsValue {
        JsValue::double(self)
    }
}

impl ToScript for bool {
    fn to_script(self, _ctx: &dyn ScriptContext) -> JsValue {
        JsValue::bool(self)
    }
}

impl ToScript for &str {
    fn to_script(self, ctx: &dyn ScriptContext) -> JsValue {
        ctx.string_value(self)
    }
}

impl ToScript for String {
    fn to_script(self, ctx: &dyn ScriptContext) -> JsValue {
        ctx.string_value(&self)
    }
}

impl ToScript for ObjectRef {
    fn to_script(self, _ctx: &dyn ScriptContext) -> JsValue {
        JsValue::object(self)
    }
}

impl ToScript for ArrayRef {
    fn to_script(self, _ctx: &dyn ScriptContext) -> JsValue {
        JsValue::object(self.object())
    }
}

impl ToScript for FunctionRef {
    fn to_script(self, _ctx: &dyn ScriptContext) -> JsValue {
        JsValue::object(self.object())
    }
}

impl ToScript for Null {
    fn to_script(self, _ctx: &dyn ScriptContext) -> JsValue {
        JsValue::null()
    }
}

impl ToScript for Undefined {
    fn to_script(self, _ctx: &dyn ScriptContext) -> JsValue {
        JsValue::undefined()
    }
}

// Unit (for handlers that produce nothing)
impl ToScript for () {
    fn to_script(self, _ctx: &dyn ScriptContext) -> JsValue {
        JsValue::undefined()
    }
}

// Absent results encode as null
impl<T: ToScript> ToScript for Option<T> {
    fn to_script(self, ctx: &dyn ScriptContext) -> JsValue {
        match self {
            Some(value) => value.to_script(ctx),
            None => JsValue::null(),
        }
    }
}
