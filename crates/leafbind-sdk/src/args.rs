//! Argument extraction
//!
//! Arguments are consumed left to right from a [`CallFrame`]. Each read
//! coerces the next value with the runtime's own conversion rules and
//! advances the cursor by one. Optional reads that find nothing left yield
//! their default and leave the cursor where it is.
//!
//! Two string forms exist and each handler picks one per argument:
//!
//! - [`CallFrame::string`] returns a [`CallStr`] that shares the runtime's
//!   buffer and cannot outlive the call.
//! - [`CallFrame::persisted_string`] returns an owned `String`; dropping it
//!   releases it.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::rc::Rc;

use crate::context::ScriptContext;
use crate::error::{BindResult, BindingError};
use crate::frame::CallFrame;
use crate::value::{JsValue, ObjectRef};

// ============================================================================
// Declarative specs
// ============================================================================

/// Primitive kind a parameter is coerced to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// ToInt32
    Int32,
    /// ToNumber
    Double,
    /// ToBoolean
    Bool,
    /// ToString
    String,
    /// Any object
    Object,
    /// Object passing the runtime's array predicate
    Array,
    /// Object passing the runtime's callable predicate
    Function,
    /// The raw value, untouched
    Value,
}

impl ArgKind {
    /// Name used in coercion errors
    pub const fn name(self) -> &'static str {
        match self {
            ArgKind::Int32 => "int32",
            ArgKind::Double => "number",
            ArgKind::Bool => "boolean",
            ArgKind::String => "string",
            ArgKind::Object => "object",
            ArgKind::Array => "array",
            ArgKind::Function => "function",
            ArgKind::Value => "value",
        }
    }
}

/// Default yielded by an omitted optional parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ArgDefault {
    /// Integer default
    Int32(i32),
    /// Double default
    Double(f64),
    /// Boolean default
    Bool(bool),
    /// String default
    String(String),
    /// Absent object / `null`
    Null,
    /// `undefined`
    Undefined,
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSpec {
    kind: ArgKind,
    default: Option<ArgDefault>,
}

impl ArgSpec {
    /// Required parameter of `kind`
    pub const fn required(kind: ArgKind) -> Self {
        Self { kind, default: None }
    }

    /// Optional parameter of `kind` with `default`
    pub const fn optional(kind: ArgKind, default: ArgDefault) -> Self {
        Self {
            kind,
            default: Some(default),
        }
    }

    /// Required int32
    pub const fn int32() -> Self {
        Self::required(ArgKind::Int32)
    }

    /// Optional int32
    pub const fn int32_or(default: i32) -> Self {
        Self::optional(ArgKind::Int32, ArgDefault::Int32(default))
    }

    /// Required double
    pub const fn double() -> Self {
        Self::required(ArgKind::Double)
    }

    /// Optional double
    pub const fn double_or(default: f64) -> Self {
        Self::optional(ArgKind::Double, ArgDefault::Double(default))
    }

    /// Required boolean
    pub const fn boolean() -> Self {
        Self::required(ArgKind::Bool)
    }

    /// Required string
    pub const fn string() -> Self {
        Self::required(ArgKind::String)
    }

    /// Optional string
    pub fn string_or(default: impl Into<String>) -> Self {
        Self::optional(ArgKind::String, ArgDefault::String(default.into()))
    }

    /// Required object
    pub const fn object() -> Self {
        Self::required(ArgKind::Object)
    }

    /// Optional object, absent as `None`
    pub const fn object_opt() -> Self {
        Self::optional(ArgKind::Object, ArgDefault::Null)
    }

    /// Required array
    pub const fn array() -> Self {
        Self::required(ArgKind::Array)
    }

    /// Optional array, absent as `None`
    pub const fn array_opt() -> Self {
        Self::optional(ArgKind::Array, ArgDefault::Null)
    }

    /// Required function
    pub const fn function() -> Self {
        Self::required(ArgKind::Function)
    }

    /// Optional function, absent as `None`
    pub const fn function_opt() -> Self {
        Self::optional(ArgKind::Function, ArgDefault::Null)
    }

    /// Required raw value
    pub const fn value() -> Self {
        Self::required(ArgKind::Value)
    }

    /// Declared kind
    pub fn kind(&self) -> ArgKind {
        self.kind
    }

    /// Default, if optional
    pub fn default(&self) -> Option<&ArgDefault> {
        self.default.as_ref()
    }

    /// True when the parameter may be omitted
    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }

    fn default_fits(&self) -> bool {
        match (&self.default, self.kind) {
            (None, _) => true,
            (Some(_), ArgKind::Value) => true,
            (Some(ArgDefault::Int32(_)), ArgKind::Int32 | ArgKind::Double) => true,
            (Some(ArgDefault::Double(_)), ArgKind::Double) => true,
            (Some(ArgDefault::Bool(_)), ArgKind::Bool) => true,
            (Some(ArgDefault::String(_)), ArgKind::String) => true,
            (Some(ArgDefault::Null), ArgKind::Object | ArgKind::Array | ArgKind::Function) => true,
            _ => false,
        }
    }
}

/// Ordered parameter list of one handler.
///
/// Required parameters come first; the minimum arity is the number of
/// required parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    specs: Vec<ArgSpec>,
    min_args: usize,
}

impl Signature {
    /// Validate and build a signature
    pub fn new(specs: Vec<ArgSpec>) -> BindResult<Self> {
        let mut min_args = 0;
        let mut seen_optional = false;
        for (i, spec) in specs.iter().enumerate() {
            if !spec.default_fits() {
                return Err(BindingError::InvalidSignature(format!(
                    "parameter {} has a default that does not fit {}",
                    i,
                    spec.kind.name()
                )));
            }
            if spec.is_optional() {
                seen_optional = true;
            } else if seen_optional {
                return Err(BindingError::InvalidSignature(format!(
                    "required parameter {} follows an optional one",
                    i
                )));
            } else {
                min_args += 1;
            }
        }
        Ok(Self { specs, min_args })
    }

    /// A signature with no parameters
    pub fn empty() -> Self {
        Self {
            specs: Vec::new(),
            min_args: 0,
        }
    }

    /// Number of required parameters
    pub fn min_args(&self) -> usize {
        self.min_args
    }

    /// Number of declared parameters
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// True when no parameters are declared
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Iterate over the parameters
    pub fn iter(&self) -> impl Iterator<Item = &ArgSpec> {
        self.specs.iter()
    }
}

/// A natively-typed extracted argument
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// From [`ArgKind::Int32`]
    Int32(i32),
    /// From [`ArgKind::Double`]
    Double(f64),
    /// From [`ArgKind::Bool`]
    Bool(bool),
    /// From [`ArgKind::String`], persisted
    String(String),
    /// From [`ArgKind::Object`]; `None` for an omitted optional
    Object(Option<ObjectRef>),
    /// From [`ArgKind::Array`]; `None` for an omitted optional
    Array(Option<ArrayRef>),
    /// From [`ArgKind::Function`]; `None` for an omitted optional
    Function(Option<FunctionRef>),
    /// From [`ArgKind::Value`]
    Value(JsValue),
}

impl Arg {
    /// Integer payload
    pub fn as_int32(&self) -> Option<i32> {
        match self {
            Arg::Int32(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric payload, widening integers
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Arg::Double(d) => Some(*d),
            Arg::Int32(i) => Some(f64::from(*i)),
            _ => None,
        }
    }

    /// Boolean payload
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Arg::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// String payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::String(s) => Some(s),
            _ => None,
        }
    }

    /// Object payload of any object-like kind
    pub fn as_object(&self) -> Option<ObjectRef> {
        match self {
            Arg::Object(o) => *o,
            Arg::Array(a) => a.map(ArrayRef::object),
            Arg::Function(f) => f.map(FunctionRef::object),
            Arg::Value(v) => v.as_object(),
            _ => None,
        }
    }

    /// Raw value payload
    pub fn as_value(&self) -> Option<JsValue> {
        match self {
            Arg::Value(v) => Some(*v),
            _ => None,
        }
    }
}

// ============================================================================
// Typed handles
// ============================================================================

/// An object known to satisfy the runtime's array predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArrayRef(ObjectRef);

impl ArrayRef {
    /// Underlying object
    pub fn object(self) -> ObjectRef {
        self.0
    }

    /// Array length
    pub fn len(self, ctx: &dyn ScriptContext) -> BindResult<usize> {
        ctx.array_len(self.0)
    }

    /// True for an empty array
    pub fn is_empty(self, ctx: &dyn ScriptContext) -> BindResult<bool> {
        Ok(self.len(ctx)? == 0)
    }

    /// Element at `index`
    pub fn get(self, ctx: &dyn ScriptContext, index: usize) -> BindResult<JsValue> {
        ctx.array_get(self.0, index)
    }

    /// Collect every element
    pub fn to_vec(self, ctx: &dyn ScriptContext) -> BindResult<Vec<JsValue>> {
        let len = self.len(ctx)?;
        let mut out = Vec::with_capacity(len);
        for i in 0..len {
            out.push(self.get(ctx, i)?);
        }
        Ok(out)
    }
}

/// An object known to satisfy the runtime's callable predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionRef(ObjectRef);

impl FunctionRef {
    /// Underlying object
    pub fn object(self) -> ObjectRef {
        self.0
    }

    /// Call back into the runtime
    pub fn call(self, ctx: &dyn ScriptContext, this: JsValue, args: &[JsValue]) -> BindResult<JsValue> {
        ctx.call_function(self.0, this, args)
    }
}

/// A string argument borrowed for the remainder of the call.
///
/// Shares the runtime's buffer; the lifetime ties it to the frame it came
/// from so it cannot be stashed past the call. Use
/// [`CallStr::to_persisted`] or [`CallFrame::persisted_string`] when the
/// text must survive.
#[derive(Clone)]
pub struct CallStr<'a> {
    text: Rc<str>,
    _frame: PhantomData<&'a ()>,
}

impl CallStr<'_> {
    /// Copy into an owned string
    pub fn to_persisted(&self) -> String {
        self.text.to_string()
    }

    /// Encoded length in bytes
    pub fn byte_len(&self) -> usize {
        self.text.len()
    }
}

impl Deref for CallStr<'_> {
    type Target = str;

    fn deref(&self) -> &str {
        &self.text
    }
}

impl AsRef<str> for CallStr<'_> {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for CallStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for CallStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.text, f)
    }
}

impl PartialEq<str> for CallStr<'_> {
    fn eq(&self, other: &str) -> bool {
        &*self.text == other
    }
}

impl PartialEq<&str> for CallStr<'_> {
    fn eq(&self, other: &&str) -> bool {
        &*self.text == *other
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Truncate to at most `max` bytes without splitting a UTF-8 sequence
fn truncate_at_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

impl<'a> CallFrame<'a> {
    fn coerce_object(&self, index: usize, value: JsValue, kind: ArgKind) -> BindResult<ObjectRef> {
        let obj = value
            .as_object()
            .ok_or_else(|| BindingError::coercion(index, kind.name(), value.type_name()))?;
        let passes = match kind {
            ArgKind::Array => self.context().is_array(obj),
            ArgKind::Function => self.context().is_function(obj),
            _ => true,
        };
        if passes {
            Ok(obj)
        } else {
            Err(BindingError::coercion(index, kind.name(), value.type_name()))
        }
    }

    fn read_js_string(&self, index: usize, value: JsValue) -> BindResult<Rc<str>> {
        let ctx = self.context();
        let s = ctx
            .to_js_string(value)
            .map_err(|_| BindingError::coercion(index, "string", value.type_name()))?;
        ctx.read_string(s)
    }

    /// Skip the next argument
    pub fn skip(&mut self) -> BindResult<()> {
        self.advance().map(|_| ())
    }

    /// Next argument, untouched
    pub fn value(&mut self) -> BindResult<JsValue> {
        self.advance().map(|(_, v)| v)
    }

    /// Next argument, untouched, if any remain
    pub fn value_opt(&mut self) -> Option<JsValue> {
        self.advance().ok().map(|(_, v)| v)
    }

    /// Next argument via ToInt32
    pub fn int32(&mut self) -> BindResult<i32> {
        let (index, value) = self.advance()?;
        self.context()
            .to_int32(value)
            .map_err(|_| BindingError::coercion(index, "int32", value.type_name()))
    }

    /// Optional ToInt32
    pub fn int32_or(&mut self, default: i32) -> BindResult<i32> {
        if self.remaining() == 0 {
            return Ok(default);
        }
        self.int32()
    }

    /// Next argument via ToNumber
    pub fn double(&mut self) -> BindResult<f64> {
        let (index, value) = self.advance()?;
        self.context()
            .to_number(value)
            .map_err(|_| BindingError::coercion(index, "number", value.type_name()))
    }

    /// Optional ToNumber
    pub fn double_or(&mut self, default: f64) -> BindResult<f64> {
        if self.remaining() == 0 {
            return Ok(default);
        }
        self.double()
    }

    /// Next argument via ToBoolean
    pub fn boolean(&mut self) -> BindResult<bool> {
        let (_, value) = self.advance()?;
        Ok(self.context().to_boolean(value))
    }

    /// Optional ToBoolean
    pub fn boolean_or(&mut self, default: bool) -> BindResult<bool> {
        if self.remaining() == 0 {
            return Ok(default);
        }
        self.boolean()
    }

    /// Next argument via ToString, valid until the call returns
    pub fn string(&mut self) -> BindResult<CallStr<'a>> {
        let (index, value) = self.advance()?;
        let text = self.read_js_string(index, value)?;
        Ok(CallStr {
            text,
            _frame: PhantomData,
        })
    }

    /// Next argument via ToString, copied into an owned buffer
    pub fn persisted_string(&mut self) -> BindResult<String> {
        let (index, value) = self.advance()?;
        Ok(self.read_js_string(index, value)?.to_string())
    }

    /// Optional ToString, copied into an owned buffer
    pub fn string_or(&mut self, default: &str) -> BindResult<String> {
        if self.remaining() == 0 {
            return Ok(default.to_string());
        }
        self.persisted_string()
    }

    /// Next argument via ToString, keeping at most `max_bytes` bytes.
    ///
    /// Returns the prefix and the full encoded length, which exceeds the
    /// prefix length when the string was cut.
    pub fn string_prefix(&mut self, max_bytes: usize) -> BindResult<(String, usize)> {
        let (index, value) = self.advance()?;
        let text = self.read_js_string(index, value)?;
        Ok((truncate_at_boundary(&text, max_bytes).to_string(), text.len()))
    }

    /// Next argument as an object
    pub fn object(&mut self) -> BindResult<ObjectRef> {
        let (index, value) = self.advance()?;
        self.coerce_object(index, value, ArgKind::Object)
    }

    // Optional object-like reads share one rule: omitted, `null` and
    // `undefined` all yield `None`; anything else must pass `read`.
    fn nullable<T>(&mut self, read: fn(&mut Self) -> BindResult<T>) -> BindResult<Option<T>> {
        match self.peek() {
            None => Ok(None),
            Some(v) if v.is_nullish() => {
                self.advance()?;
                Ok(None)
            }
            Some(_) => read(self).map(Some),
        }
    }

    /// Optional object. Omitted, `null` and `undefined` all yield `None`.
    pub fn object_opt(&mut self) -> BindResult<Option<ObjectRef>> {
        self.nullable(Self::object)
    }

    /// Next argument as an array
    pub fn array(&mut self) -> BindResult<ArrayRef> {
        let (index, value) = self.advance()?;
        self.coerce_object(index, value, ArgKind::Array).map(ArrayRef)
    }

    /// Next argument as a function
    pub fn function(&mut self) -> BindResult<FunctionRef> {
        let (index, value) = self.advance()?;
        self.coerce_object(index, value, ArgKind::Function)
            .map(FunctionRef)
    }

    /// Optional array, absent like [`CallFrame::object_opt`]
    pub fn array_opt(&mut self) -> BindResult<Option<ArrayRef>> {
        self.nullable(Self::array)
    }

    /// Optional function, absent like [`CallFrame::object_opt`]
    pub fn function_opt(&mut self) -> BindResult<Option<FunctionRef>> {
        self.nullable(Self::function)
    }

    /// True if the next argument is a string primitive
    pub fn next_is_string(&self) -> bool {
        self.peek().is_some_and(|v| v.is_string())
    }

    /// True if the next argument is an array object
    pub fn next_is_array(&self) -> bool {
        self.peek()
            .and_then(|v| v.as_object())
            .is_some_and(|obj| self.context().is_array(obj))
    }

    /// Encode an omitted `Value`-kind default as the value itself
    fn default_value(&self, default: &ArgDefault) -> JsValue {
        match default {
            ArgDefault::Int32(i) => JsValue::int32(*i),
            ArgDefault::Double(d) => JsValue::double(*d),
            ArgDefault::Bool(b) => JsValue::bool(*b),
            ArgDefault::String(s) => self.context().string_value(s),
            ArgDefault::Null => JsValue::null(),
            ArgDefault::Undefined => JsValue::undefined(),
        }
    }

    /// Extract one argument as declared by `spec`
    pub fn extract(&mut self, spec: &ArgSpec) -> BindResult<Arg> {
        if self.remaining() == 0 {
            if let Some(default) = spec.default() {
                if spec.kind() == ArgKind::Value {
                    return Ok(Arg::Value(self.default_value(default)));
                }
                return Ok(match default {
                    ArgDefault::Int32(i) if spec.kind() == ArgKind::Double => Arg::Double(f64::from(*i)),
                    ArgDefault::Int32(i) => Arg::Int32(*i),
                    ArgDefault::Double(d) => Arg::Double(*d),
                    ArgDefault::Bool(b) => Arg::Bool(*b),
                    ArgDefault::String(s) => Arg::String(s.clone()),
                    ArgDefault::Null => match spec.kind() {
                        ArgKind::Array => Arg::Array(None),
                        ArgKind::Function => Arg::Function(None),
                        _ => Arg::Object(None),
                    },
                    ArgDefault::Undefined => Arg::Value(JsValue::undefined()),
                });
            }
        }
        Ok(match spec.kind() {
            ArgKind::Int32 => Arg::Int32(self.int32()?),
            ArgKind::Double => Arg::Double(self.double()?),
            ArgKind::Bool => Arg::Bool(self.boolean()?),
            ArgKind::String => Arg::String(self.persisted_string()?),
            ArgKind::Object if spec.is_optional() => Arg::Object(self.object_opt()?),
            ArgKind::Object => Arg::Object(Some(self.object()?)),
            ArgKind::Array if spec.is_optional() => Arg::Array(self.array_opt()?),
            ArgKind::Array => Arg::Array(Some(self.array()?)),
            ArgKind::Function if spec.is_optional() => Arg::Function(self.function_opt()?),
            ArgKind::Function => Arg::Function(Some(self.function()?)),
            ArgKind::Value => Arg::Value(self.value()?),
        })
    }

    /// Extract every parameter of `signature`, in order
    pub fn extract_all(&mut self, signature: &Signature) -> BindResult<Vec<Arg>> {
        signature.iter().map(|spec| self.extract(spec)).collect()
    }
}

// ============================================================================
// Typed extraction
// ============================================================================

/// Extract a Rust value from the next argument of a frame.
///
/// Used by `#[member]`-generated handlers; implement it to accept your own
/// types as parameters.
pub trait FromArg: Sized {
    /// Kind reported in errors and signatures
    const KIND: ArgKind;

    /// Required extraction
    fn from_arg(frame: &mut CallFrame<'_>) -> BindResult<Self>;

    /// Optional extraction: `None` when nothing remains
    fn from_optional_arg(frame: &mut CallFrame<'_>) -> BindResult<Option<Self>> {
        if frame.remaining() == 0 {
            Ok(None)
        } else {
            Self::from_arg(frame).map(Some)
        }
    }
}

impl FromArg for i32 {
    const KIND: ArgKind = ArgKind::Int32;

    fn from_arg(frame: &mut CallFrame<'_>) -> BindResult<Self> {
        frame.int32()
    }
}

impl FromArg for f64 {
    const KIND: ArgKind = ArgKind::Double;

    fn from_arg(frame: &mut CallFrame<'_>) -> BindResult<Self> {
        frame.double()
    }
}

impl FromArg for bool {
    const KIND: ArgKind = ArgKind::Bool;

    fn from_arg(frame: &mut CallFrame<'_>) -> BindResult<Self> {
        frame.boolean()
    }
}

impl FromArg for String {
    const KIND: ArgKind = ArgKind::String;

    fn from_arg(frame: &mut CallFrame<'_>) -> BindResult<Self> {
        frame.persisted_string()
    }
}

impl FromArg for JsValue {
    const KIND: ArgKind = ArgKind::Value;

    fn from_arg(frame: &mut CallFrame<'_>) -> BindResult<Self> {
        frame.value()
    }
}

impl FromArg for ObjectRef {
    const KIND: ArgKind = ArgKind::Object;

    fn from_arg(frame: &mut CallFrame<'_>) -> BindResult<Self> {
        frame.object()
    }

    fn from_optional_arg(frame: &mut CallFrame<'_>) -> BindResult<Option<Self>> {
        frame.object_opt()
    }
}

impl FromArg for ArrayRef {
    const KIND: ArgKind = ArgKind::Array;

    fn from_arg(frame: &mut CallFrame<'_>) -> BindResult<Self> {
        frame.array()
    }

    fn from_optional_arg(frame: &mut CallFrame<'_>) -> BindResult<Option<Self>> {
        frame.array_opt()
    }
}

impl FromArg for FunctionRef {
    const KIND: ArgKind = ArgKind::Function;

    fn from_arg(frame: &mut CallFrame<'_>) -> BindResult<Self> {
        frame.function()
    }

    fn from_optional_arg(frame: &mut CallFrame<'_>) -> BindResult<Option<Self>> {
        frame.function_opt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_min_args() {
        let sig = Signature::new(vec![
            ArgSpec::int32(),
            ArgSpec::string(),
            ArgSpec::int32_or(-1),
            ArgSpec::object_opt(),
        ])
        .unwrap();
        assert_eq!(sig.min_args(), 2);
        assert_eq!(sig.len(), 4);
    }

    #[test]
    fn test_signature_rejects_required_after_optional() {
        let err = Signature::new(vec![ArgSpec::int32_or(0), ArgSpec::int32()]).unwrap_err();
        assert!(matches!(err, BindingError::InvalidSignature(_)));
    }

    #[test]
    fn test_signature_rejects_mismatched_default() {
        let spec = ArgSpec::optional(ArgKind::Bool, ArgDefault::Int32(1));
        assert!(Signature::new(vec![spec]).is_err());

        let spec = ArgSpec::optional(ArgKind::Double, ArgDefault::Int32(1));
        assert!(Signature::new(vec![spec]).is_ok());
    }

    #[test]
    fn test_truncate_at_boundary() {
        assert_eq!(truncate_at_boundary("hello", 10), "hello");
        assert_eq!(truncate_at_boundary("hello", 3), "hel");
        // "é" is two bytes; cutting through it backs off
        assert_eq!(truncate_at_boundary("aé", 2), "a");
    }

    #[test]
    fn test_arg_accessors() {
        assert_eq!(Arg::Int32(3).as_double(), Some(3.0));
        assert_eq!(Arg::String("x".into()).as_str(), Some("x"));
        assert_eq!(Arg::Object(None).as_object(), None);
        assert_eq!(Arg::Bool(true).as_int32(), None);
    }
}
