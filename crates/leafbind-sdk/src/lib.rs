//! Leafbind SDK - call-boundary contract for native script bindings
//!
//! This crate holds everything a native module needs to expose functions and
//! classes to an embedded script runtime, without depending on any runtime:
//! argument extraction, return value encoding, error reporting, member
//! registration and class lifecycle hooks. Runtimes implement
//! [`ScriptContext`] and route every native call through [`dispatch`].
//!
//! # Example
//!
//! ```ignore
//! use leafbind_sdk::{attach, HandlerDescriptor, MemberTable};
//!
//! let table = MemberTable::new("device")
//!     .member(HandlerDescriptor::new("setVolume", 1, |frame| {
//!         let level = frame.double()?;
//!         let fade = frame.int32_or(-1)?;
//!         frame.set_return(level > 0.0 && fade != 0);
//!         Ok(())
//!     }))?;
//!
//! attach(ctx, ctx.global(), &table)?;
//! ```

#![warn(missing_docs)]

pub mod args;
pub mod class;
pub mod context;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod frame;
pub mod log;
pub mod member;
pub mod value;

pub use args::{Arg, ArgDefault, ArgKind, ArgSpec, ArrayRef, CallStr, FromArg, FunctionRef, Signature};
pub use class::{create_class, ClassBuilder, ClassDescriptor, Finalizer};
pub use context::{ClassId, RequestGuard, ScriptContext};
pub use convert::{Null, ToScript, Undefined};
pub use dispatch::{dispatch, report_failure, CallOutcome};
pub use error::{BindResult, BindingError};
pub use frame::CallFrame;
pub use member::{
    attach, attach_existing, define_members, HandlerDescriptor, HandlerFn, MemberAccess,
    MemberTable, PropertyFlags,
};
pub use value::{JsValue, ObjectRef, StringRef};

#[doc(hidden)]
pub mod __private {
    pub use tracing;
}
