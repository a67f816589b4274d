//! Native call dispatch
//!
//! Every native invocation goes through [`dispatch`]: open the request
//! bracket, check arity, run the handler with panic catching, and route any
//! failure through [`report_failure`]. The bracket is held by a
//! [`RequestGuard`], so it closes on every path.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::context::{ClassId, RequestGuard, ScriptContext};
use crate::error::BindingError;
use crate::frame::CallFrame;
use crate::member::HandlerDescriptor;
use crate::value::JsValue;

/// Result of one native call as seen by the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// The handler completed; the value is its return slot
    Returned(JsValue),
    /// The handler failed and an error was reported to the context
    Failed,
}

impl CallOutcome {
    /// True if the call failed
    pub fn is_failed(&self) -> bool {
        matches!(self, CallOutcome::Failed)
    }

    /// Returned value, if any
    pub fn value(&self) -> Option<JsValue> {
        match self {
            CallOutcome::Returned(v) => Some(*v),
            CallOutcome::Failed => None,
        }
    }
}

/// Invoke `descriptor` with `args`.
///
/// `constructing` is the class being constructed when the runtime calls a
/// class constructor, `None` otherwise.
pub fn dispatch(
    ctx: &dyn ScriptContext,
    descriptor: &HandlerDescriptor,
    this: JsValue,
    args: &[JsValue],
    constructing: Option<ClassId>,
) -> CallOutcome {
    let _request = RequestGuard::enter(ctx);
    crate::trace_call!("{}({} args)", descriptor.name(), args.len());

    if args.len() < descriptor.min_args() {
        let err = BindingError::Arity {
            expected: descriptor.min_args(),
            got: args.len(),
        };
        report_failure(ctx, descriptor.name(), &err);
        return CallOutcome::Failed;
    }

    let mut frame = CallFrame::new(ctx, descriptor.name(), this, args);
    if let Some(class) = constructing {
        frame = frame.constructing(class);
    }

    let handler = &**descriptor.handler();
    let result = match catch_unwind(AssertUnwindSafe(|| handler(&mut frame))) {
        Ok(result) => result,
        Err(payload) => Err(BindingError::Panic(panic_message(payload.as_ref()))),
    };

    match result {
        Ok(()) => CallOutcome::Returned(frame.return_value()),
        Err(err) => {
            report_failure(ctx, descriptor.name(), &err);
            CallOutcome::Failed
        }
    }
}

/// Report a failed call of `name` to the context
pub fn report_failure(ctx: &dyn ScriptContext, name: &str, err: &BindingError) {
    let message = format!("Invalid arguments to {}: {}", name, err);
    tracing::warn!(target: "leafbind", member = name, "{}", message);
    ctx.report_error(&message);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
