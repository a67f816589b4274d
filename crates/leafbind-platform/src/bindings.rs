//! Script bindings for the platform collaborators
//!
//! `install` puts three things on a parent object:
//! - `textInputs`: id-based access to the shared [`TextInputManager`]
//! - `TextInput`: a class whose instances own one input each
//! - `logger`: see [`crate::logger`]
//!
//! Unknown ids never fail a call: queries answer `false` or `null`.

use std::cell::RefCell;
use std::rc::Rc;

use leafbind_sdk::{
    attach, create_class, Arg, ArgSpec, BindResult, BindingError, CallFrame, ClassBuilder,
    ClassDescriptor, ClassId, HandlerDescriptor, MemberTable, ObjectRef, ScriptContext, Signature,
};

use crate::logger::logger_table;
use crate::text_input::{InputType, TextInputManager};

/// Manager shared between the bindings and the host
pub type SharedTextInputs = Rc<RefCell<TextInputManager>>;

/// Payload of a `TextInput` instance
pub struct TextInputHandle {
    id: i32,
    manager: SharedTextInputs,
}

impl TextInputHandle {
    /// Id of the input this instance owns
    pub fn id(&self) -> i32 {
        self.id
    }
}

/// Install `textInputs`, `TextInput` and `logger` on `parent`
pub fn install(
    ctx: &dyn ScriptContext,
    parent: ObjectRef,
    inputs: &SharedTextInputs,
) -> BindResult<ClassId> {
    attach(ctx, parent, &text_inputs_table(inputs)?)?;
    attach(ctx, parent, &logger_table()?)?;
    create_class(ctx, parent, text_input_class(inputs)?)
}

// ============================================================================
// textInputs
// ============================================================================

fn arg_i32(args: &[Arg], i: usize) -> BindResult<i32> {
    args.get(i)
        .and_then(Arg::as_int32)
        .ok_or_else(|| BindingError::Runtime(format!("missing integer argument {}", i)))
}

fn arg_f32(args: &[Arg], i: usize) -> BindResult<f32> {
    args.get(i)
        .and_then(Arg::as_double)
        .map(|d| d as f32)
        .ok_or_else(|| BindingError::Runtime(format!("missing number argument {}", i)))
}

fn arg_str(args: &[Arg], i: usize) -> BindResult<&str> {
    args.get(i)
        .and_then(Arg::as_str)
        .ok_or_else(|| BindingError::Runtime(format!("missing string argument {}", i)))
}

/// The `textInputs` object
pub fn text_inputs_table(inputs: &SharedTextInputs) -> BindResult<MemberTable> {
    let mut table = MemberTable::new("textInputs");

    // create(x, y, width, height, text = "") -> id
    let m = Rc::clone(inputs);
    table.add(HandlerDescriptor::with_signature(
        "create",
        Signature::new(vec![
            ArgSpec::int32(),
            ArgSpec::int32(),
            ArgSpec::int32(),
            ArgSpec::int32(),
            ArgSpec::string_or(""),
        ])?,
        move |frame, args| {
            let id = m.borrow_mut().add_text_input(
                arg_i32(&args, 0)?,
                arg_i32(&args, 1)?,
                arg_i32(&args, 2)?,
                arg_i32(&args, 3)?,
                arg_str(&args, 4)?,
            );
            frame.set_return(id);
            Ok(())
        },
    ))?;

    let m = Rc::clone(inputs);
    table.add(HandlerDescriptor::new("exists", 1, move |frame| {
        let id = frame.int32()?;
        frame.set_return(m.borrow().contains(id));
        Ok(())
    }))?;

    let m = Rc::clone(inputs);
    table.add(HandlerDescriptor::new("getText", 1, move |frame| {
        let id = frame.int32()?;
        let text = m.borrow().get(id).map(|input| input.text().to_string());
        frame.set_return(text);
        Ok(())
    }))?;

    let m = Rc::clone(inputs);
    table.add(HandlerDescriptor::new("setText", 2, move |frame| {
        let id = frame.int32()?;
        let text = frame.persisted_string()?;
        let updated = match m.borrow_mut().get_mut(id) {
            Some(input) => {
                input.set_text(text);
                true
            }
            None => false,
        };
        frame.set_return(updated);
        Ok(())
    }))?;

    let m = Rc::clone(inputs);
    table.add(HandlerDescriptor::with_signature(
        "setPosition",
        Signature::new(vec![ArgSpec::int32(), ArgSpec::double(), ArgSpec::double()])?,
        move |frame, args| {
            let (x, y) = (arg_f32(&args, 1)?, arg_f32(&args, 2)?);
            let updated = match m.borrow_mut().get_mut(arg_i32(&args, 0)?) {
                Some(input) => {
                    input.set_position(x, y);
                    true
                }
                None => false,
            };
            frame.set_return(updated);
            Ok(())
        },
    ))?;

    let m = Rc::clone(inputs);
    table.add(HandlerDescriptor::with_signature(
        "setDimensions",
        Signature::new(vec![ArgSpec::int32(), ArgSpec::double(), ArgSpec::double()])?,
        move |frame, args| {
            let (width, height) = (arg_f32(&args, 1)?, arg_f32(&args, 2)?);
            let updated = match m.borrow_mut().get_mut(arg_i32(&args, 0)?) {
                Some(input) => {
                    input.set_dimensions(width, height);
                    true
                }
                None => false,
            };
            frame.set_return(updated);
            Ok(())
        },
    ))?;

    // setType(id, name): an unknown type name is an error, an unknown id is not
    let m = Rc::clone(inputs);
    table.add(HandlerDescriptor::new("setType", 2, move |frame| {
        let id = frame.int32()?;
        let input_type: InputType = frame.string()?.parse()?;
        let updated = match m.borrow_mut().get_mut(id) {
            Some(input) => {
                input.set_type(input_type);
                true
            }
            None => false,
        };
        frame.set_return(updated);
        Ok(())
    }))?;

    let m = Rc::clone(inputs);
    table.add(HandlerDescriptor::new("focus", 1, move |frame| {
        let id = frame.int32()?;
        let focused = m.borrow_mut().focus(id).is_ok();
        frame.set_return(focused);
        Ok(())
    }))?;

    let m = Rc::clone(inputs);
    table.add(HandlerDescriptor::new("destroy", 1, move |frame| {
        let id = frame.int32()?;
        let removed = m.borrow_mut().destroy(id);
        frame.set_return(removed);
        Ok(())
    }))?;

    let m = Rc::clone(inputs);
    table.add(HandlerDescriptor::no_args("dismissAll", move |_frame| {
        m.borrow_mut().dismiss_all();
        Ok(())
    }))?;

    let m = Rc::clone(inputs);
    table.add(HandlerDescriptor::no_args("destroyAll", move |_frame| {
        m.borrow_mut().destroy_all();
        Ok(())
    }))?;

    Ok(table)
}

// ============================================================================
// TextInput class
// ============================================================================

fn handle(frame: &CallFrame<'_>) -> BindResult<Rc<TextInputHandle>> {
    frame.this_private::<TextInputHandle>()
}

/// `new TextInput(x, y, width, height, text = "")`
///
/// Each instance owns one input in the shared manager. The finalizer
/// destroys it once the instance is collected.
pub fn text_input_class(inputs: &SharedTextInputs) -> BindResult<ClassDescriptor> {
    let m = Rc::clone(inputs);
    let class = ClassBuilder::<TextInputHandle>::new("TextInput")
        .constructor(4, move |frame| {
            let x = frame.int32()?;
            let y = frame.int32()?;
            let width = frame.int32()?;
            let height = frame.int32()?;
            let text = frame.string_or("")?;

            let obj = frame.new_instance()?;
            let id = m.borrow_mut().add_text_input(x, y, width, height, &text);
            let payload = TextInputHandle {
                id,
                manager: Rc::clone(&m),
            };
            frame.set_private(obj, payload)?;
            frame.set_return(obj);
            Ok(())
        })
        .method(HandlerDescriptor::no_args("id", |frame| {
            let id = handle(frame)?.id;
            frame.set_return(id);
            Ok(())
        }))?
        .method(HandlerDescriptor::no_args("getText", |frame| {
            let handle = handle(frame)?;
            let text = handle
                .manager
                .borrow()
                .get(handle.id)
                .map(|input| input.text().to_string());
            frame.set_return(text);
            Ok(())
        }))?
        .method(HandlerDescriptor::new("setText", 1, |frame| {
            let handle = handle(frame)?;
            let text = frame.persisted_string()?;
            handle.manager.borrow_mut().input_mut(handle.id)?.set_text(text);
            Ok(())
        }))?
        .method(HandlerDescriptor::no_args("focus", |frame| {
            let handle = handle(frame)?;
            handle.manager.borrow_mut().focus(handle.id)?;
            Ok(())
        }))?
        .method(HandlerDescriptor::no_args("destroy", |frame| {
            let handle = handle(frame)?;
            let removed = handle.manager.borrow_mut().destroy(handle.id);
            frame.set_return(removed);
            Ok(())
        }))?
        .finalizer(|handle: Rc<TextInputHandle>| match handle.manager.try_borrow_mut() {
            Ok(mut manager) => {
                manager.destroy(handle.id);
            }
            Err(_) => tracing::warn!(id = handle.id, "text input manager busy during finalization"),
        })
        .build();
    Ok(class)
}
