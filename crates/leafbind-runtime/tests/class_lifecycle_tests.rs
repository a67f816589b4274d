//! Class lifecycle tests
//!
//! Native-backed classes: construction, payload access from methods,
//! finalization by the collector and at runtime teardown.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leafbind_runtime::{Runtime, RuntimeOptions};
use leafbind_sdk::{
    create_class, BindingError, ClassBuilder, ClassDescriptor, HandlerDescriptor, JsValue,
    ScriptContext,
};

struct Counter {
    value: Cell<i32>,
}

// Class `Counter(start?)` with `increment()` and `value()`; the finalizer
// bumps `finalized` and records the final value.
fn counter_class(finalized: Rc<Cell<u32>>, last_values: Rc<RefCell<Vec<i32>>>) -> ClassDescriptor {
    ClassBuilder::<Counter>::new("Counter")
        .constructor(0, |frame| {
            let start = frame.int32_or(0)?;
            let obj = frame.new_instance()?;
            frame.set_private(
                obj,
                Counter {
                    value: Cell::new(start),
                },
            )?;
            frame.set_return(obj);
            Ok(())
        })
        .method(HandlerDescriptor::no_args("increment", |frame| {
            let counter = frame.this_private::<Counter>()?;
            counter.value.set(counter.value.get() + 1);
            frame.set_return(counter.value.get());
            Ok(())
        }))
        .unwrap()
        .method(HandlerDescriptor::no_args("value", |frame| {
            let counter = frame.this_private::<Counter>()?;
            frame.set_return(counter.value.get());
            Ok(())
        }))
        .unwrap()
        .finalizer(move |counter: Rc<Counter>| {
            finalized.set(finalized.get() + 1);
            last_values.borrow_mut().push(counter.value.get());
        })
        .build()
}

fn setup() -> (Runtime, Rc<Cell<u32>>, Rc<RefCell<Vec<i32>>>) {
    let rt = Runtime::new();
    let finalized = Rc::new(Cell::new(0));
    let values = Rc::new(RefCell::new(Vec::new()));
    create_class(
        &rt,
        rt.global(),
        counter_class(Rc::clone(&finalized), Rc::clone(&values)),
    )
    .unwrap();
    (rt, finalized, values)
}

// ============================================================================
// Construction and methods
// ============================================================================

#[test]
fn test_construct_and_call_methods() {
    let (rt, _, _) = setup();
    let counter = rt.construct_class("Counter", &[JsValue::int32(10)]).unwrap();

    assert_eq!(rt.call_method(counter, "increment", &[]).unwrap(), JsValue::int32(11));
    assert_eq!(rt.call_method(counter, "increment", &[]).unwrap(), JsValue::int32(12));
    assert_eq!(rt.call_method(counter, "value", &[]).unwrap(), JsValue::int32(12));
    assert_eq!(rt.class_of(counter), rt.class_id("Counter"));
}

#[test]
fn test_constructor_is_defined_on_parent() {
    let (rt, _, _) = setup();
    let ctor = rt.resolve_path("Counter").unwrap().as_object().unwrap();
    assert!(rt.is_function(ctor));

    let instance = rt.construct(ctor, &[]).unwrap();
    assert_eq!(rt.call_method(instance, "value", &[]).unwrap(), JsValue::int32(0));

    // Calling the constructor as a plain function still constructs
    let value = rt.call(ctor, JsValue::undefined(), &[JsValue::int32(3)]).unwrap();
    let instance = value.as_object().unwrap();
    assert_eq!(rt.call_method(instance, "value", &[]).unwrap(), JsValue::int32(3));
}

#[test]
fn test_method_on_wrong_receiver() {
    let (rt, _, _) = setup();
    let counter = rt.construct_class("Counter", &[]).unwrap();
    let increment = rt.get_property(counter, "increment").unwrap().as_object().unwrap();

    let plain = rt.new_object();
    let err = rt.call(increment, plain.to_value(), &[]).unwrap_err();
    assert!(err.message.starts_with("Invalid arguments to increment"));
    assert!(err.message.contains("not a class instance"));

    let err = rt.call(increment, JsValue::int32(1), &[]).unwrap_err();
    assert!(err.message.contains("non-object receiver"));
}

#[test]
fn test_duplicate_class_registration() {
    let (rt, finalized, values) = setup();
    let err = create_class(&rt, rt.global(), counter_class(finalized, values)).unwrap_err();
    assert_eq!(err, BindingError::ClassExists("Counter".into()));
}

// ============================================================================
// Payload misuse
// ============================================================================

#[test]
fn test_new_instance_outside_constructor() {
    let rt = Runtime::new();
    let desc = HandlerDescriptor::no_args("make", |frame| {
        frame.new_instance()?;
        Ok(())
    });
    rt.define_function(rt.global(), Rc::new(desc)).unwrap();

    let err = rt.call_path("make", &[]).unwrap_err();
    assert!(err.message.contains("make was not called as a constructor"));
}

#[test]
fn test_payload_set_twice() {
    let rt = Runtime::new();
    let class = ClassBuilder::<u32>::new("Twice")
        .constructor(0, |frame| {
            let obj = frame.new_instance()?;
            frame.set_private(obj, 1u32)?;
            frame.set_private(obj, 2u32)?;
            frame.set_return(obj);
            Ok(())
        })
        .build();
    create_class(&rt, rt.global(), class).unwrap();

    let err = rt.construct_class("Twice", &[]).unwrap_err();
    assert!(err.message.contains("payload already set"));
}

#[test]
fn test_payload_of_wrong_type() {
    let rt = Runtime::new();
    let class = ClassBuilder::<String>::new("Text")
        .constructor(0, |frame| {
            let obj = frame.new_instance()?;
            frame.set_private(obj, String::from("x"))?;
            frame.set_return(obj);
            Ok(())
        })
        .method(HandlerDescriptor::no_args("asNumber", |frame| {
            let n = frame.this_private::<u32>()?;
            frame.set_return(*n as i32);
            Ok(())
        }))
        .unwrap()
        .build();
    create_class(&rt, rt.global(), class).unwrap();

    let text = rt.construct_class("Text", &[]).unwrap();
    let err = rt.call_method(text, "asNumber", &[]).unwrap_err();
    assert!(err.message.contains("payload is not a u32"));
}

// Counts how often it is dropped
struct Tracked(Rc<Cell<u32>>);

impl Drop for Tracked {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

#[test]
fn test_payload_must_match_class_type() {
    let rt = Runtime::new();
    let finalized = Rc::new(Cell::new(0));
    let drops = Rc::new(Cell::new(0));

    let sink = Rc::clone(&finalized);
    let counted = Rc::clone(&drops);
    let class = ClassBuilder::<u32>::new("Mismatched")
        .constructor(0, move |frame| {
            let obj = frame.new_instance()?;
            frame.set_private(obj, Tracked(Rc::clone(&counted)))?;
            frame.set_return(obj);
            Ok(())
        })
        .finalizer(move |_payload: Rc<u32>| sink.set(sink.get() + 1))
        .build();
    create_class(&rt, rt.global(), class).unwrap();

    let err = rt.construct_class("Mismatched", &[]).unwrap_err();
    assert!(err.message.starts_with("Invalid arguments to Mismatched"));
    assert!(err.message.contains("payload type does not match class Mismatched"));

    // The rejected payload never became an instance payload
    assert_eq!(drops.get(), 1);
    rt.collect();
    drop(rt);
    assert_eq!(finalized.get(), 0);
    assert_eq!(drops.get(), 1);
}

#[test]
fn test_default_constructor_has_no_payload() {
    let rt = Runtime::new();
    let class = ClassBuilder::<u32>::new("Bare")
        .method(HandlerDescriptor::no_args("read", |frame| {
            let n = frame.this_private::<u32>()?;
            frame.set_return(*n as i32);
            Ok(())
        }))
        .unwrap()
        .build();
    create_class(&rt, rt.global(), class).unwrap();

    let bare = rt.construct_class("Bare", &[]).unwrap();
    let err = rt.call_method(bare, "read", &[]).unwrap_err();
    assert!(err.message.contains("no native payload"));
}

// ============================================================================
// Finalization
// ============================================================================

#[test]
fn test_finalizer_runs_exactly_once() {
    let (rt, finalized, values) = setup();
    let counter = rt.construct_class("Counter", &[JsValue::int32(5)]).unwrap();
    rt.call_method(counter, "increment", &[]).unwrap();

    rt.root(counter.to_value());
    rt.collect();
    assert_eq!(finalized.get(), 0);

    rt.unroot(counter.to_value());
    rt.collect();
    assert_eq!(finalized.get(), 1);
    assert_eq!(*values.borrow(), vec![6]);

    rt.collect();
    drop(rt);
    assert_eq!(finalized.get(), 1);
}

// Class `Tally` whose constructor bumps `live` and whose finalizer
// decrements it again.
fn tally_class(live: Rc<Cell<i64>>) -> ClassDescriptor {
    let created = Rc::clone(&live);
    ClassBuilder::<i64>::new("Tally")
        .constructor(0, move |frame| {
            let obj = frame.new_instance()?;
            created.set(created.get() + 1);
            frame.set_private(obj, created.get())?;
            frame.set_return(obj);
            Ok(())
        })
        .finalizer(move |_ticket: Rc<i64>| live.set(live.get() - 1))
        .build()
}

#[test]
fn test_three_instances_finalized() {
    let rt = Runtime::new();
    let live = Rc::new(Cell::new(7));
    let baseline = live.get();
    create_class(&rt, rt.global(), tally_class(Rc::clone(&live))).unwrap();

    for _ in 0..3 {
        rt.construct_class("Tally", &[]).unwrap();
    }
    assert_eq!(live.get(), baseline + 3);

    rt.collect();
    assert_eq!(live.get(), baseline);
    assert_eq!(rt.gc_stats().payloads_finalized, 3);
}

#[test]
fn test_reachable_through_property_survives() {
    let (rt, finalized, _) = setup();
    let holder = rt.new_object();
    rt.root(holder.to_value());

    let counter = rt.construct_class("Counter", &[]).unwrap();
    rt.set_property(holder, "counter", counter.to_value()).unwrap();
    rt.collect();
    assert_eq!(finalized.get(), 0);
    assert!(rt.is_alive(counter));

    rt.delete_property(holder, "counter").unwrap();
    rt.collect();
    assert_eq!(finalized.get(), 1);
    assert!(!rt.is_alive(counter));

    // A stale handle is reported, not reused
    let err = rt.call_method(counter, "value", &[]).unwrap_err();
    assert!(err.message.contains("dangling"));
}

#[test]
fn test_remaining_instances_finalized_on_drop() {
    let (rt, finalized, values) = setup();
    let a = rt.construct_class("Counter", &[JsValue::int32(1)]).unwrap();
    let b = rt.construct_class("Counter", &[JsValue::int32(2)]).unwrap();
    rt.root(a.to_value());
    rt.root(b.to_value());

    drop(rt);
    assert_eq!(finalized.get(), 2);
    let mut seen = values.borrow().clone();
    seen.sort();
    assert_eq!(seen, vec![1, 2]);
}

#[test]
fn test_drop_finalizes_regardless_of_options() {
    let options = RuntimeOptions::default()
        .with_gc_threshold(1_000_000)
        .with_max_call_depth(4);
    let rt = Runtime::with_options(options);
    let finalized = Rc::new(Cell::new(0));
    let values = Rc::new(RefCell::new(Vec::new()));
    create_class(
        &rt,
        rt.global(),
        counter_class(Rc::clone(&finalized), Rc::clone(&values)),
    )
    .unwrap();

    let counter = rt.construct_class("Counter", &[JsValue::int32(9)]).unwrap();
    rt.root(counter.to_value());
    drop(rt);
    assert_eq!(finalized.get(), 1);
    assert_eq!(*values.borrow(), vec![9]);
}

#[test]
fn test_panicking_finalizer_does_not_poison_runtime() {
    let rt = Runtime::new();
    let class = ClassBuilder::<u32>::new("Fragile")
        .constructor(0, |frame| {
            let obj = frame.new_instance()?;
            frame.set_private(obj, 0u32)?;
            frame.set_return(obj);
            Ok(())
        })
        .finalizer(|_payload: Rc<u32>| panic!("finalizer failed"))
        .build();
    create_class(&rt, rt.global(), class).unwrap();

    rt.construct_class("Fragile", &[]).unwrap();
    assert_eq!(rt.collect(), Some(1));
    assert!(rt.construct_class("Fragile", &[]).is_ok());
    assert!(rt.request_stats().is_balanced());
}
