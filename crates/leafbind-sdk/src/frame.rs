//! CallFrame: one native invocation as seen by a handler
//!
//! The frame bundles the runtime context, the receiver, the argument slice
//! with a left-to-right cursor, and the return slot. It is created by
//! [`dispatch`](crate::dispatch) for exactly one call and dropped when the
//! call ends; nothing borrowed from it can outlive the call.

use std::rc::Rc;

use crate::context::{ClassId, ScriptContext};
use crate::convert::ToScript;
use crate::error::{BindResult, BindingError};
use crate::value::{JsValue, ObjectRef};

/// Execution state for a single handler invocation.
pub struct CallFrame<'a> {
    ctx: &'a dyn ScriptContext,
    name: &'a str,
    this: JsValue,
    args: &'a [JsValue],
    pos: usize,
    rval: JsValue,
    constructing: Option<ClassId>,
}

impl<'a> CallFrame<'a> {
    /// Create a frame over `args` for the handler declared as `name`
    pub fn new(
        ctx: &'a dyn ScriptContext,
        name: &'a str,
        this: JsValue,
        args: &'a [JsValue],
    ) -> Self {
        Self {
            ctx,
            name,
            this,
            args,
            pos: 0,
            rval: JsValue::undefined(),
            constructing: None,
        }
    }

    /// Mark this frame as a constructor call for `class`
    pub fn constructing(mut self, class: ClassId) -> Self {
        self.constructing = Some(class);
        self
    }

    /// The runtime context
    #[inline]
    pub fn context(&self) -> &'a dyn ScriptContext {
        self.ctx
    }

    /// Declared name of the running handler
    #[inline]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Number of arguments supplied by the caller
    #[inline]
    pub fn argc(&self) -> usize {
        self.args.len()
    }

    /// Arguments not yet consumed
    #[inline]
    pub fn remaining(&self) -> usize {
        self.args.len() - self.pos
    }

    /// Index of the next argument
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The receiver value
    #[inline]
    pub fn this(&self) -> JsValue {
        self.this
    }

    /// The receiver as an object
    pub fn this_object(&self) -> BindResult<ObjectRef> {
        self.this.as_object().ok_or_else(|| {
            BindingError::Runtime(format!(
                "{} called on a non-object receiver ({})",
                self.name,
                self.this.type_name()
            ))
        })
    }

    /// Class being constructed, when called as a constructor
    #[inline]
    pub fn constructing_class(&self) -> Option<ClassId> {
        self.constructing
    }

    // ========================================================================
    // Cursor
    // ========================================================================

    /// Next argument without consuming it
    #[inline]
    pub(crate) fn peek(&self) -> Option<JsValue> {
        self.args.get(self.pos).copied()
    }

    /// Consume the next argument. Running out is an arity error.
    pub(crate) fn advance(&mut self) -> BindResult<(usize, JsValue)> {
        match self.args.get(self.pos) {
            Some(&value) => {
                let index = self.pos;
                self.pos += 1;
                Ok((index, value))
            }
            None => Err(BindingError::Arity {
                expected: self.pos + 1,
                got: self.args.len(),
            }),
        }
    }

    /// Consume every remaining argument
    pub fn rest(&mut self) -> &'a [JsValue] {
        let tail = &self.args[self.pos..];
        self.pos = self.args.len();
        tail
    }

    // ========================================================================
    // Return slot
    // ========================================================================

    /// Encode `value` into the return slot, replacing any earlier result
    pub fn set_return<T: ToScript>(&mut self, value: T) {
        self.rval = value.to_script(self.ctx);
    }

    /// Return `true`
    pub fn return_true(&mut self) {
        self.rval = JsValue::bool(true);
    }

    /// Return `false`
    pub fn return_false(&mut self) {
        self.rval = JsValue::bool(false);
    }

    /// Return `null`
    pub fn return_null(&mut self) {
        self.rval = JsValue::null();
    }

    /// Return `undefined`
    pub fn return_undefined(&mut self) {
        self.rval = JsValue::undefined();
    }

    /// Current content of the return slot
    #[inline]
    pub fn return_value(&self) -> JsValue {
        self.rval
    }

    // ========================================================================
    // Instances
    // ========================================================================

    /// Allocate an instance of the class being constructed
    pub fn new_instance(&self) -> BindResult<ObjectRef> {
        let class = self.constructing.ok_or_else(|| {
            BindingError::lifecycle(format!("{} was not called as a constructor", self.name))
        })?;
        self.ctx.new_instance(class)
    }

    /// Attach the native payload of a freshly created instance
    pub fn set_private<T: 'static>(&self, obj: ObjectRef, payload: T) -> BindResult<()> {
        self.ctx.set_private(obj, Rc::new(payload))
    }

    /// Native payload of `obj`, failing if it was never set, was already
    /// finalized, or holds another type
    pub fn private<T: 'static>(&self, obj: ObjectRef) -> BindResult<Rc<T>> {
        match self.ctx.get_private(obj)? {
            Some(payload) => payload.downcast::<T>().map_err(|_| {
                BindingError::lifecycle(format!(
                    "{}: payload is not a {}",
                    self.name,
                    std::any::type_name::<T>()
                ))
            }),
            None => Err(BindingError::lifecycle(format!(
                "{}: instance has no native payload",
                self.name
            ))),
        }
    }

    /// Native payload of the receiver
    pub fn this_private<T: 'static>(&self) -> BindResult<Rc<T>> {
        let obj = self.this_object()?;
        self.private(obj)
    }
}

impl std::fmt::Debug for CallFrame<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallFrame")
            .field("name", &self.name)
            .field("argc", &self.args.len())
            .field("pos", &self.pos)
            .field("rval", &self.rval)
            .finish()
    }
}
