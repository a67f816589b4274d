//! Platform binding tests
//!
//! Drives `textInputs`, `TextInput` and `logger` through the reference
//! runtime and checks the manager state behind them.

use std::cell::RefCell;
use std::rc::Rc;

use leafbind_platform::{install, render, InputType, Rect, SharedTextInputs, TextInputManager};
use leafbind_runtime::Runtime;
use leafbind_sdk::{JsValue, ScriptContext};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn setup() -> (Runtime, SharedTextInputs) {
    init_tracing();
    let rt = Runtime::new();
    let inputs = Rc::new(RefCell::new(TextInputManager::new()));
    install(&rt, rt.global(), &inputs).unwrap();
    (rt, inputs)
}

fn ints(values: &[i32]) -> Vec<JsValue> {
    values.iter().map(|&v| JsValue::int32(v)).collect()
}

// ============================================================================
// textInputs
// ============================================================================

#[test]
fn test_create_and_query() {
    let (rt, inputs) = setup();
    let mut args = ints(&[10, 20, 200, 40]);
    args.push(rt.string_value("hello"));

    let id = rt.call_path("textInputs.create", &args).unwrap();
    assert_eq!(id, JsValue::int32(1));
    assert_eq!(
        rt.call_path("textInputs.exists", &[id]).unwrap(),
        JsValue::bool(true)
    );

    let text = rt.call_path("textInputs.getText", &[id]).unwrap();
    assert_eq!(rt.string(text).unwrap(), "hello");

    let manager = inputs.borrow();
    let input = manager.get(1).unwrap();
    assert_eq!(input.frame(), Rect::new(10.0, 20.0, 200.0, 40.0));
}

#[test]
fn test_create_without_text() {
    let (rt, inputs) = setup();
    let id = rt.call_path("textInputs.create", &ints(&[0, 0, 1, 1])).unwrap();
    assert_eq!(id, JsValue::int32(1));
    assert_eq!(inputs.borrow().get(1).unwrap().text(), "");

    let err = rt
        .call_path("textInputs.create", &ints(&[0, 0, 1]))
        .unwrap_err();
    assert!(err.message.starts_with("Invalid arguments to create"));
    assert_eq!(inputs.borrow().len(), 1);
}

#[test]
fn test_setters() {
    let (rt, inputs) = setup();
    rt.call_path("textInputs.create", &ints(&[0, 0, 10, 10])).unwrap();
    let one = JsValue::int32(1);

    let text = rt.string_value("typed");
    assert_eq!(
        rt.call_path("textInputs.setText", &[one, text]).unwrap(),
        JsValue::bool(true)
    );
    rt.call_path(
        "textInputs.setPosition",
        &[one, JsValue::double(2.5), JsValue::int32(3)],
    )
    .unwrap();
    rt.call_path(
        "textInputs.setDimensions",
        &[one, JsValue::int32(50), JsValue::int32(12)],
    )
    .unwrap();
    let kind = rt.string_value("password");
    rt.call_path("textInputs.setType", &[one, kind]).unwrap();

    let manager = inputs.borrow();
    let input = manager.get(1).unwrap();
    assert_eq!(input.text(), "typed");
    assert_eq!(input.frame(), Rect::new(2.5, 3.0, 50.0, 12.0));
    assert_eq!(input.input_type(), InputType::Password);
}

#[test]
fn test_unknown_id_is_not_an_error() {
    let (rt, _) = setup();
    let missing = JsValue::int32(42);
    let text = rt.string_value("x");

    assert_eq!(rt.call_path("textInputs.exists", &[missing]).unwrap(), JsValue::bool(false));
    assert_eq!(rt.call_path("textInputs.getText", &[missing]).unwrap(), JsValue::null());
    assert_eq!(
        rt.call_path("textInputs.setText", &[missing, text]).unwrap(),
        JsValue::bool(false)
    );
    assert_eq!(rt.call_path("textInputs.focus", &[missing]).unwrap(), JsValue::bool(false));
    assert_eq!(rt.call_path("textInputs.destroy", &[missing]).unwrap(), JsValue::bool(false));
}

#[test]
fn test_unknown_type_name_fails() {
    let (rt, _) = setup();
    rt.call_path("textInputs.create", &ints(&[0, 0, 1, 1])).unwrap();
    let kind = rt.string_value("hologram");
    let err = rt
        .call_path("textInputs.setType", &[JsValue::int32(1), kind])
        .unwrap_err();
    assert!(err.message.contains("unknown text input type 'hologram'"));
}

#[test]
fn test_focus_dismiss_destroy() {
    let (rt, inputs) = setup();
    for _ in 0..3 {
        rt.call_path("textInputs.create", &ints(&[0, 0, 1, 1])).unwrap();
    }

    rt.call_path("textInputs.focus", &[JsValue::int32(2)]).unwrap();
    assert!(inputs.borrow().get(2).unwrap().is_focused());

    rt.call_path("textInputs.dismissAll", &[]).unwrap();
    assert!(!inputs.borrow().get(2).unwrap().is_focused());

    assert_eq!(
        rt.call_path("textInputs.destroy", &[JsValue::int32(1)]).unwrap(),
        JsValue::bool(true)
    );
    assert_eq!(inputs.borrow().ids(), vec![2, 3]);

    assert_eq!(rt.call_path("textInputs.destroyAll", &[]).unwrap(), JsValue::undefined());
    assert!(inputs.borrow().is_empty());
    assert!(rt.request_stats().is_balanced());
}

// ============================================================================
// TextInput class
// ============================================================================

#[test]
fn test_text_input_instance() {
    let (rt, inputs) = setup();
    let mut args = ints(&[1, 2, 3, 4]);
    args.push(rt.string_value("initial"));
    let field = rt.construct_class("TextInput", &args).unwrap();

    assert_eq!(rt.call_method(field, "id", &[]).unwrap(), JsValue::int32(1));
    let text = rt.call_method(field, "getText", &[]).unwrap();
    assert_eq!(rt.string(text).unwrap(), "initial");

    let updated = rt.string_value("updated");
    rt.call_method(field, "setText", &[updated]).unwrap();
    rt.call_method(field, "focus", &[]).unwrap();

    let manager = inputs.borrow();
    assert_eq!(manager.get(1).unwrap().text(), "updated");
    assert!(manager.get(1).unwrap().is_focused());
}

#[test]
fn test_instance_methods_after_explicit_destroy() {
    let (rt, _) = setup();
    let field = rt.construct_class("TextInput", &ints(&[0, 0, 1, 1])).unwrap();

    assert_eq!(rt.call_method(field, "destroy", &[]).unwrap(), JsValue::bool(true));
    assert_eq!(rt.call_method(field, "destroy", &[]).unwrap(), JsValue::bool(false));
    assert_eq!(rt.call_method(field, "getText", &[]).unwrap(), JsValue::null());

    let err = rt.call_method(field, "focus", &[]).unwrap_err();
    assert!(err.message.contains("no text input with id 1"));
}

#[test]
fn test_collected_instance_destroys_its_input() {
    let (rt, inputs) = setup();
    let kept = rt.construct_class("TextInput", &ints(&[0, 0, 1, 1])).unwrap();
    rt.construct_class("TextInput", &ints(&[0, 0, 1, 1])).unwrap();
    rt.root(kept.to_value());
    assert_eq!(inputs.borrow().len(), 2);

    rt.collect();
    assert_eq!(inputs.borrow().ids(), vec![1]);

    drop(rt);
    assert!(inputs.borrow().is_empty());
}

#[test]
fn test_finalizer_ignores_already_destroyed_input() {
    let (rt, inputs) = setup();
    rt.construct_class("TextInput", &ints(&[0, 0, 1, 1])).unwrap();
    inputs.borrow_mut().destroy_all();

    rt.collect();
    assert!(inputs.borrow().is_empty());
    assert_eq!(rt.gc_stats().payloads_finalized, 1);
}

// ============================================================================
// logger
// ============================================================================

#[test]
fn test_logger_accepts_any_arguments() {
    let (rt, _) = setup();
    let msg = rt.string_value("ready");
    let field = rt.construct_class("TextInput", &ints(&[0, 0, 1, 1])).unwrap();

    assert_eq!(rt.call_path("logger.log", &[]).unwrap(), JsValue::undefined());
    assert_eq!(
        rt.call_path("logger.log", &[msg, JsValue::int32(3), field.to_value()])
            .unwrap(),
        JsValue::undefined()
    );
}

#[test]
fn test_render_joins_with_spaces() {
    let (rt, _) = setup();
    let word = rt.string_value("level");
    let plain = rt.new_object();
    let field = rt.construct_class("TextInput", &ints(&[0, 0, 1, 1])).unwrap();

    let line = render(
        &rt,
        &[
            word,
            JsValue::int32(7),
            JsValue::double(0.5),
            JsValue::bool(true),
            JsValue::null(),
            plain.to_value(),
            field.to_value(),
        ],
    );
    assert_eq!(line, "level 7 0.5 true null [object Object] [object]");
    assert_eq!(render(&rt, &[]), "");
}
