//! Leafbind runtime - reference host for native bindings
//!
//! A single-threaded object runtime implementing
//! [`ScriptContext`](leafbind_sdk::ScriptContext). It provides an object
//! heap with property flags and prototype chains, native function objects,
//! class instances with payload slots, a mark-sweep collector that drives
//! class finalizers, and request bracket accounting.
//!
//! # Example
//!
//! ```ignore
//! use leafbind_runtime::Runtime;
//! use leafbind_sdk::{attach, HandlerDescriptor, JsValue, MemberTable};
//!
//! let rt = Runtime::new();
//! let table = MemberTable::new("math").member(HandlerDescriptor::new("twice", 1, |frame| {
//!     let n = frame.int32()?;
//!     frame.set_return(n * 2);
//!     Ok(())
//! }))?;
//! attach(&rt, rt.global(), &table)?;
//!
//! assert_eq!(rt.call_path("math.twice", &[JsValue::int32(21)])?, JsValue::int32(42));
//! ```

#![warn(missing_docs)]

pub mod class_registry;
pub mod coerce;
pub mod config;
pub mod defaults;
pub mod error;
pub mod gc;
pub mod heap;
pub mod runtime;

pub use config::RuntimeOptions;
pub use error::{RuntimeError, ScriptError};
pub use gc::GcStats;
pub use runtime::{RequestStats, Runtime};
