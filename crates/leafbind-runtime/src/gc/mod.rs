//! Garbage collection
//!
//! Mark-sweep over the object heap. Instances whose payload is still set
//! when they are swept are handed back as [`Orphan`]s so the runtime can run
//! their class finalizer after releasing its heap borrow.

mod collector;
mod roots;

pub use collector::{GarbageCollector, GcStats, Orphan};
pub use roots::RootSet;
