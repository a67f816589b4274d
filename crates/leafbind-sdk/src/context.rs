//! ScriptContext trait: abstract runtime operations
//!
//! Defines the interface a host script runtime implements. Handlers and the
//! registration helpers program against this trait only; they never see the
//! runtime's heap or collector.

use std::any::Any;
use std::rc::Rc;

use crate::class::ClassDescriptor;
use crate::error::BindResult;
use crate::member::{HandlerDescriptor, PropertyFlags};
use crate::value::{JsValue, ObjectRef, StringRef};

/// Identifier of a class registered with one runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub usize);

/// Abstract runtime context handed to every native handler.
///
/// One context is shared by every handler of a runtime and is only ever
/// touched from the runtime's thread, so all methods take `&self` and
/// implementations use interior mutability. Nothing here is `Send`.
pub trait ScriptContext {
    // ========================================================================
    // Request bracket
    // ========================================================================

    /// Enter a reentrancy region. Paired with exactly one `end_request`.
    fn begin_request(&self);

    /// Leave the innermost reentrancy region
    fn end_request(&self);

    // ========================================================================
    // Error reporting
    // ========================================================================

    /// Record an error for the current call; the runtime turns it into a
    /// script-visible exception once the handler returns.
    fn report_error(&self, message: &str);

    // ========================================================================
    // Coercion
    // ========================================================================

    /// ECMA ToInt32
    fn to_int32(&self, value: JsValue) -> BindResult<i32>;

    /// ECMA ToNumber
    fn to_number(&self, value: JsValue) -> BindResult<f64>;

    /// ECMA ToBoolean (never fails)
    fn to_boolean(&self, value: JsValue) -> bool;

    /// ECMA ToString, producing a runtime string
    fn to_js_string(&self, value: JsValue) -> BindResult<StringRef>;

    /// Runtime array predicate
    fn is_array(&self, obj: ObjectRef) -> bool;

    /// Runtime callable predicate
    fn is_function(&self, obj: ObjectRef) -> bool;

    // ========================================================================
    // Strings
    // ========================================================================

    /// Allocate a string on the runtime heap
    fn new_string(&self, s: &str) -> StringRef;

    /// Borrow the contents of a runtime string
    fn read_string(&self, s: StringRef) -> BindResult<Rc<str>>;

    // ========================================================================
    // Objects
    // ========================================================================

    /// Allocate a plain object
    fn new_object(&self) -> ObjectRef;

    /// Allocate an array holding `items`
    fn new_array(&self, items: &[JsValue]) -> ObjectRef;

    /// Length of an array object
    fn array_len(&self, arr: ObjectRef) -> BindResult<usize>;

    /// Element of an array object (`undefined` past the end)
    fn array_get(&self, arr: ObjectRef, index: usize) -> BindResult<JsValue>;

    /// Property lookup, following the prototype chain
    fn get_property(&self, obj: ObjectRef, name: &str) -> BindResult<JsValue>;

    /// Script-style assignment; honours read-only flags
    fn set_property(&self, obj: ObjectRef, name: &str, value: JsValue) -> BindResult<()>;

    /// Define or redefine an own property with explicit flags
    fn define_property(
        &self,
        obj: ObjectRef,
        name: &str,
        value: JsValue,
        flags: PropertyFlags,
    ) -> BindResult<()>;

    /// Script-style delete; refuses permanent properties
    fn delete_property(&self, obj: ObjectRef, name: &str) -> BindResult<bool>;

    /// Create a native function object for `descriptor` and install it on
    /// `obj` under the descriptor's name with the descriptor's flags
    fn define_function(
        &self,
        obj: ObjectRef,
        descriptor: Rc<HandlerDescriptor>,
    ) -> BindResult<ObjectRef>;

    /// Invoke a callable object
    fn call_function(&self, func: ObjectRef, this: JsValue, args: &[JsValue])
        -> BindResult<JsValue>;

    /// The runtime's global object
    fn global(&self) -> ObjectRef;

    // ========================================================================
    // Classes
    // ========================================================================

    /// Register a class and define its constructor on `parent`
    fn init_class(&self, parent: ObjectRef, class: Rc<ClassDescriptor>) -> BindResult<ClassId>;

    /// Allocate an instance of a registered class with an empty payload slot
    fn new_instance(&self, class: ClassId) -> BindResult<ObjectRef>;

    /// Class of an instance, if it is one
    fn class_of(&self, obj: ObjectRef) -> Option<ClassId>;

    /// Store the private payload of an instance. Fails if one is already set.
    fn set_private(&self, obj: ObjectRef, payload: Rc<dyn Any>) -> BindResult<()>;

    /// Read the private payload of an instance
    fn get_private(&self, obj: ObjectRef) -> BindResult<Option<Rc<dyn Any>>>;

    // ========================================================================
    // Provided helpers
    // ========================================================================

    /// Allocate a string and box it as a value
    fn string_value(&self, s: &str) -> JsValue {
        JsValue::string(self.new_string(s))
    }

    /// ToString followed by a read, for diagnostics and logging
    fn display_value(&self, value: JsValue) -> BindResult<Rc<str>> {
        let s = self.to_js_string(value)?;
        self.read_string(s)
    }
}

/// Scoped request bracket.
///
/// Construction begins the request; dropping ends it. Because the end runs
/// from `Drop`, every exit path (return, `?`, unwinding) closes the region.
#[must_use = "the request ends as soon as the guard is dropped"]
pub struct RequestGuard<'a> {
    ctx: &'a dyn ScriptContext,
}

impl<'a> RequestGuard<'a> {
    /// Begin a request on `ctx`
    pub fn enter(ctx: &'a dyn ScriptContext) -> Self {
        ctx.begin_request();
        Self { ctx }
    }
}

impl Drop for RequestGuard<'_> {
    fn drop(&mut self) {
        self.ctx.end_request();
    }
}
