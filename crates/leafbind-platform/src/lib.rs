//! Leafbind platform collaborators
//!
//! Native services exposed to scripts through the leafbind SDK:
//! - [`text_input`]: a headless model of on-screen text fields
//! - [`logger`]: `logger.log(...)` diagnostics
//! - [`bindings`]: the script-facing objects and the `TextInput` class

#![warn(missing_docs)]

pub mod bindings;
pub mod logger;
pub mod text_input;

pub use bindings::{install, text_input_class, text_inputs_table, SharedTextInputs, TextInputHandle};
pub use logger::{logger_table, render};
pub use text_input::{InputType, Rect, TextInput, TextInputError, TextInputManager};
