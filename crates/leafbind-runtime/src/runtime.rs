//! Reference host runtime
//!
//! [`Runtime`] owns a heap, a class registry and a collector, and implements
//! [`ScriptContext`] so native handlers can run against it. It does not
//! execute script source: embedders drive it through [`Runtime::call`],
//! [`Runtime::call_method`], [`Runtime::construct`] and friends.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use leafbind_sdk::{
    dispatch, BindResult, BindingError, CallOutcome, ClassDescriptor, ClassId, HandlerDescriptor,
    JsValue, ObjectRef, PropertyFlags, ScriptContext, StringRef,
};

use crate::class_registry::{ClassRegistry, RegisteredClass};
use crate::coerce;
use crate::config::RuntimeOptions;
use crate::error::ScriptError;
use crate::gc::{GarbageCollector, GcStats, RootSet};
use crate::heap::{Heap, NativeFunction, ObjectKind};

/// Request bracket accounting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestStats {
    /// Brackets opened
    pub begun: u64,
    /// Brackets closed
    pub ended: u64,
    /// Currently open brackets
    pub depth: usize,
}

impl RequestStats {
    /// Every opened bracket has been closed
    pub fn is_balanced(&self) -> bool {
        self.begun == self.ended && self.depth == 0
    }
}

/// Single-threaded object runtime hosting native bindings
pub struct Runtime {
    heap: RefCell<Heap>,
    classes: RefCell<ClassRegistry>,
    roots: RefCell<RootSet>,
    gc: RefCell<GarbageCollector>,
    global: ObjectRef,
    options: RuntimeOptions,
    requests: Cell<RequestStats>,
    pending_error: RefCell<Option<String>>,
}

impl Runtime {
    /// Runtime with default options
    pub fn new() -> Self {
        Self::with_options(RuntimeOptions::default())
    }

    /// Runtime with explicit options
    pub fn with_options(options: RuntimeOptions) -> Self {
        let mut heap = Heap::new();
        let global = heap.alloc_object(ObjectKind::Plain, None);
        let mut roots = RootSet::new();
        roots.add_permanent_root(global.to_value());

        tracing::debug!(
            gc_threshold = options.gc_threshold,
            max_call_depth = options.max_call_depth,
            "runtime created"
        );

        Self {
            heap: RefCell::new(heap),
            classes: RefCell::new(ClassRegistry::new()),
            roots: RefCell::new(roots),
            gc: RefCell::new(GarbageCollector::new(options.gc_threshold)),
            global,
            options,
            requests: Cell::new(RequestStats::default()),
            pending_error: RefCell::new(None),
        }
    }

    /// Options the runtime was created with
    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    /// Request bracket counters
    pub fn request_stats(&self) -> RequestStats {
        self.requests.get()
    }

    /// Collector statistics
    pub fn gc_stats(&self) -> GcStats {
        self.gc.borrow().stats().clone()
    }

    /// Number of live heap cells
    pub fn heap_len(&self) -> usize {
        self.heap.borrow().len()
    }

    // ========================================================================
    // Embedder entry points
    // ========================================================================

    /// Call a function object
    pub fn call(&self, func: ObjectRef, this: JsValue, args: &[JsValue]) -> Result<JsValue, ScriptError> {
        let result = self.invoke(func, this, args).map_err(script_error);
        self.safe_point(&result);
        result
    }

    /// Look up `name` on `obj` and call it with `obj` as receiver
    pub fn call_method(&self, obj: ObjectRef, name: &str, args: &[JsValue]) -> Result<JsValue, ScriptError> {
        let func = self.get_property(obj, name).map_err(script_error)?;
        let func = func
            .as_object()
            .ok_or_else(|| ScriptError::new(format!("{} is not a function", name)))?;
        self.call(func, obj.to_value(), args)
    }

    /// Resolve a dotted path from the global object and call it, with the
    /// object holding the function as receiver
    pub fn call_path(&self, path: &str, args: &[JsValue]) -> Result<JsValue, ScriptError> {
        match path.rsplit_once('.') {
            Some((holder, name)) => {
                let holder = self.resolve_path(holder)?;
                let holder = holder
                    .as_object()
                    .ok_or_else(|| ScriptError::new(format!("{} is not an object", path)))?;
                self.call_method(holder, name, args)
            }
            None => self.call_method(self.global, path, args),
        }
    }

    /// Call a class constructor
    pub fn construct(&self, ctor: ObjectRef, args: &[JsValue]) -> Result<ObjectRef, ScriptError> {
        let result = self.invoke_constructor(ctor, args).map_err(script_error);
        self.safe_point(&result.as_ref().map(|obj| obj.to_value()));
        result
    }

    /// Construct a registered class by name
    pub fn construct_class(&self, name: &str, args: &[JsValue]) -> Result<ObjectRef, ScriptError> {
        let ctor = self
            .classes
            .borrow()
            .get_by_name(name)
            .map(|(_, class)| class.constructor)
            .ok_or_else(|| ScriptError::new(format!("{} is not a registered class", name)))?;
        self.construct(ctor, args)
    }

    /// Property lookup by dotted path from the global object
    pub fn resolve_path(&self, path: &str) -> Result<JsValue, ScriptError> {
        let mut current = self.global.to_value();
        for segment in path.split('.') {
            let obj = current
                .as_object()
                .ok_or_else(|| ScriptError::new(format!("cannot read {} of a primitive", segment)))?;
            current = self.get_property(obj, segment).map_err(script_error)?;
        }
        Ok(current)
    }

    /// Read a string value
    pub fn string(&self, value: JsValue) -> Option<String> {
        let s = value.as_string()?;
        self.heap.borrow().string(s).ok().map(|t| t.to_string())
    }

    /// Enumerable own property names
    pub fn keys(&self, obj: ObjectRef) -> BindResult<Vec<String>> {
        Ok(self.heap.borrow().object(obj)?.keys())
    }

    /// Flags of an own property
    pub fn property_flags(&self, obj: ObjectRef, name: &str) -> Option<PropertyFlags> {
        let heap = self.heap.borrow();
        heap.object(obj).ok()?.get_own(name).map(|p| p.flags)
    }

    /// Check if a handle still refers to a live object
    pub fn is_alive(&self, obj: ObjectRef) -> bool {
        self.heap.borrow().contains(obj.raw())
    }

    /// Registered class by name
    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.classes.borrow().get_by_name(name).map(|(id, _)| id)
    }

    // ========================================================================
    // Rooting and collection
    // ========================================================================

    /// Keep `value` alive across collections until unrooted
    pub fn root(&self, value: JsValue) {
        self.roots.borrow_mut().add_root(value);
    }

    /// Release one [`root`](Self::root) of `value`
    pub fn unroot(&self, value: JsValue) -> bool {
        self.roots.borrow_mut().remove_root(value)
    }

    /// Run a full collection. Returns the number of cells freed, or `None`
    /// when called inside a native call.
    pub fn collect(&self) -> Option<usize> {
        if self.requests.get().depth > 0 {
            tracing::debug!("collection deferred: native call in progress");
            return None;
        }
        Some(self.collect_with(&[]))
    }

    fn collect_with(&self, extra_roots: &[JsValue]) -> usize {
        let orphans = {
            let roots = self.roots.borrow();
            let classes = self.classes.borrow();
            let class_roots: Vec<JsValue> = classes
                .iter()
                .flat_map(|(_, c)| [c.prototype.to_value(), c.constructor.to_value()])
                .collect();
            let mut heap = self.heap.borrow_mut();
            let orphans = self.gc.borrow_mut().collect(
                &mut heap,
                roots
                    .iter()
                    .chain(class_roots)
                    .chain(extra_roots.iter().copied()),
            );
            orphans
        };

        let stats = self.gc_stats();
        tracing::debug!(
            marked = stats.last_marked_count,
            freed = stats.last_freed_count,
            finalized = orphans.len(),
            live = stats.live_objects,
            "gc collection"
        );

        self.finalize(orphans.into_iter().map(|o| (o.class, o.payload)));
        stats.last_freed_count
    }

    /// Collect if the threshold was crossed and no call is in progress
    fn safe_point<E>(&self, result: &Result<JsValue, E>) {
        if self.requests.get().depth > 0 {
            return;
        }
        let due = self.gc.borrow().should_collect(&self.heap.borrow());
        if due {
            let in_flight: Vec<JsValue> = result.iter().copied().collect();
            self.collect_with(&in_flight);
        }
    }

    fn finalize(&self, payloads: impl IntoIterator<Item = (ClassId, Rc<dyn Any>)>) {
        for (class, payload) in payloads {
            let descriptor = self
                .classes
                .borrow()
                .get(class)
                .map(|c| Rc::clone(&c.descriptor));
            let Some(descriptor) = descriptor else {
                tracing::error!(class = class.0, "finalizing instance of unknown class");
                continue;
            };
            if catch_unwind(AssertUnwindSafe(|| descriptor.finalize(payload))).is_err() {
                tracing::error!(class = descriptor.name(), "finalizer panicked");
            }
        }
    }

    // ========================================================================
    // Invocation
    // ========================================================================

    fn native_function(&self, func: ObjectRef) -> BindResult<NativeFunction> {
        let heap = self.heap.borrow();
        match &heap.object(func)?.kind {
            ObjectKind::Function(native) => Ok(native.clone()),
            other => Err(BindingError::Runtime(format!(
                "{} is not a function",
                other.describe()
            ))),
        }
    }

    fn check_depth(&self) -> BindResult<()> {
        if self.requests.get().depth >= self.options.max_call_depth {
            return Err(BindingError::Runtime(format!(
                "maximum call depth of {} exceeded",
                self.options.max_call_depth
            )));
        }
        Ok(())
    }

    fn run(
        &self,
        descriptor: &HandlerDescriptor,
        this: JsValue,
        args: &[JsValue],
        constructing: Option<ClassId>,
    ) -> BindResult<JsValue> {
        self.check_depth()?;
        match dispatch(self, descriptor, this, args, constructing) {
            CallOutcome::Returned(value) => {
                // Errors reported by a handler that still returned are dropped
                self.pending_error.borrow_mut().take();
                Ok(value)
            }
            CallOutcome::Failed => {
                let message = self
                    .pending_error
                    .borrow_mut()
                    .take()
                    .unwrap_or_else(|| format!("{} failed", descriptor.name()));
                Err(BindingError::Runtime(message))
            }
        }
    }

    fn invoke(&self, func: ObjectRef, this: JsValue, args: &[JsValue]) -> BindResult<JsValue> {
        let native = self.native_function(func)?;
        if let Some(class) = native.constructs {
            // Calling a constructor without `new` still constructs
            return self
                .construct_instance(&native.descriptor, class, args)
                .map(ObjectRef::to_value);
        }
        self.run(&native.descriptor, this, args, None)
    }

    fn invoke_constructor(&self, ctor: ObjectRef, args: &[JsValue]) -> BindResult<ObjectRef> {
        let native = self.native_function(ctor)?;
        let class = native.constructs.ok_or_else(|| {
            BindingError::Runtime(format!("{} is not a constructor", native.descriptor.name()))
        })?;
        self.construct_instance(&native.descriptor, class, args)
    }

    fn construct_instance(
        &self,
        descriptor: &HandlerDescriptor,
        class: ClassId,
        args: &[JsValue],
    ) -> BindResult<ObjectRef> {
        let value = self.run(descriptor, JsValue::undefined(), args, Some(class))?;
        match value.as_object() {
            Some(obj) if self.class_of(obj) == Some(class) => Ok(obj),
            _ => Err(BindingError::Runtime(format!(
                "constructor {} did not return an instance",
                descriptor.name()
            ))),
        }
    }

    fn alloc_function(&self, descriptor: Rc<HandlerDescriptor>, constructs: Option<ClassId>) -> ObjectRef {
        self.heap.borrow_mut().alloc_object(
            ObjectKind::Function(NativeFunction {
                descriptor,
                constructs,
            }),
            None,
        )
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        let stats = self.requests.get();
        if !stats.is_balanced() {
            tracing::error!(
                begun = stats.begun,
                ended = stats.ended,
                depth = stats.depth,
                "runtime dropped with unbalanced requests"
            );
        }
        let payloads = self.heap.borrow_mut().drain_payloads();
        tracing::debug!(count = payloads.len(), "finalizing remaining instances");
        self.finalize(payloads);
    }
}

fn script_error(err: BindingError) -> ScriptError {
    ScriptError::new(err.to_string())
}

// ============================================================================
// ScriptContext
// ============================================================================

impl ScriptContext for Runtime {
    fn begin_request(&self) {
        let mut stats = self.requests.get();
        stats.begun += 1;
        stats.depth += 1;
        self.requests.set(stats);
    }

    fn end_request(&self) {
        let mut stats = self.requests.get();
        if stats.depth == 0 {
            tracing::error!("end_request without a matching begin_request");
            return;
        }
        stats.ended += 1;
        stats.depth -= 1;
        self.requests.set(stats);
    }

    fn report_error(&self, message: &str) {
        *self.pending_error.borrow_mut() = Some(message.to_string());
    }

    fn to_int32(&self, value: JsValue) -> BindResult<i32> {
        coerce::to_int32(&self.heap.borrow(), value)
    }

    fn to_number(&self, value: JsValue) -> BindResult<f64> {
        coerce::to_number(&self.heap.borrow(), value)
    }

    fn to_boolean(&self, value: JsValue) -> bool {
        coerce::to_boolean(&self.heap.borrow(), value)
    }

    fn to_js_string(&self, value: JsValue) -> BindResult<StringRef> {
        if let Some(s) = value.as_string() {
            self.heap.borrow().string(s)?;
            return Ok(s);
        }
        let text = coerce::to_string(&self.heap.borrow(), value)?;
        Ok(self.new_string(&text))
    }

    fn is_array(&self, obj: ObjectRef) -> bool {
        matches!(
            self.heap.borrow().object(obj).map(|o| &o.kind),
            Ok(ObjectKind::Array(_))
        )
    }

    fn is_function(&self, obj: ObjectRef) -> bool {
        matches!(
            self.heap.borrow().object(obj).map(|o| &o.kind),
            Ok(ObjectKind::Function(_))
        )
    }

    fn new_string(&self, s: &str) -> StringRef {
        self.heap.borrow_mut().alloc_string(s)
    }

    fn read_string(&self, s: StringRef) -> BindResult<Rc<str>> {
        self.heap.borrow().string(s)
    }

    fn new_object(&self) -> ObjectRef {
        self.heap.borrow_mut().alloc_object(ObjectKind::Plain, None)
    }

    fn new_array(&self, items: &[JsValue]) -> ObjectRef {
        self.heap
            .borrow_mut()
            .alloc_object(ObjectKind::Array(items.to_vec()), None)
    }

    fn array_len(&self, arr: ObjectRef) -> BindResult<usize> {
        match &self.heap.borrow().object(arr)?.kind {
            ObjectKind::Array(items) => Ok(items.len()),
            other => Err(BindingError::Runtime(format!("{} is not an array", other.describe()))),
        }
    }

    fn array_get(&self, arr: ObjectRef, index: usize) -> BindResult<JsValue> {
        match &self.heap.borrow().object(arr)?.kind {
            ObjectKind::Array(items) => Ok(items.get(index).copied().unwrap_or_default()),
            other => Err(BindingError::Runtime(format!("{} is not an array", other.describe()))),
        }
    }

    fn get_property(&self, obj: ObjectRef, name: &str) -> BindResult<JsValue> {
        let heap = self.heap.borrow();
        let mut current = Some(obj);
        let mut hops = 0;
        while let Some(o) = current {
            let data = heap.object(o)?;
            if let Some(prop) = data.get_own(name) {
                return Ok(prop.value);
            }
            if let (ObjectKind::Array(items), "length") = (&data.kind, name) {
                return Ok(JsValue::double(items.len() as f64));
            }
            hops += 1;
            if hops > self.options.max_call_depth {
                return Err(BindingError::Runtime("prototype chain too deep".to_string()));
            }
            current = data.proto;
        }
        Ok(JsValue::undefined())
    }

    fn set_property(&self, obj: ObjectRef, name: &str, value: JsValue) -> BindResult<()> {
        self.heap.borrow_mut().object_mut(obj)?.assign(name, value)
    }

    fn define_property(&self, obj: ObjectRef, name: &str, value: JsValue, flags: PropertyFlags) -> BindResult<()> {
        self.heap
            .borrow_mut()
            .object_mut(obj)?
            .define(name, value, flags)
    }

    fn delete_property(&self, obj: ObjectRef, name: &str) -> BindResult<bool> {
        self.heap.borrow_mut().object_mut(obj)?.delete(name)
    }

    fn define_function(&self, obj: ObjectRef, descriptor: Rc<HandlerDescriptor>) -> BindResult<ObjectRef> {
        let name = descriptor.name().to_string();
        let flags = descriptor.flags();
        let func = self.alloc_function(descriptor, None);
        self.define_property(obj, &name, func.to_value(), flags)?;
        Ok(func)
    }

    fn call_function(&self, func: ObjectRef, this: JsValue, args: &[JsValue]) -> BindResult<JsValue> {
        self.invoke(func, this, args)
    }

    fn global(&self) -> ObjectRef {
        self.global
    }

    fn init_class(&self, parent: ObjectRef, class: Rc<ClassDescriptor>) -> BindResult<ClassId> {
        if self.classes.borrow().contains(class.name()) {
            return Err(BindingError::ClassExists(class.name().to_string()));
        }

        let prototype = self.new_object();
        for member in class.members().iter() {
            self.define_function(prototype, Rc::clone(member))?;
        }

        let id = self.classes.borrow().next_class_id();
        let constructor = self.alloc_function(Rc::clone(class.constructor()), Some(id));
        self.define_property(
            constructor,
            "prototype",
            prototype.to_value(),
            PropertyFlags::FUNCTION,
        )?;
        self.define_property(parent, class.name(), constructor.to_value(), PropertyFlags::FUNCTION)?;

        tracing::debug!(
            class = class.name(),
            members = class.members().len(),
            finalizer = class.has_finalizer(),
            "class registered"
        );

        self.classes.borrow_mut().register_class(RegisteredClass {
            descriptor: class,
            prototype,
            constructor,
        })
    }

    fn new_instance(&self, class: ClassId) -> BindResult<ObjectRef> {
        let prototype = self
            .classes
            .borrow()
            .get(class)
            .map(|c| c.prototype)
            .ok_or_else(|| BindingError::Runtime(format!("unknown class id {}", class.0)))?;
        Ok(self.heap.borrow_mut().alloc_object(
            ObjectKind::Instance {
                class,
                private: None,
            },
            Some(prototype),
        ))
    }

    fn class_of(&self, obj: ObjectRef) -> Option<ClassId> {
        match self.heap.borrow().object(obj).ok()?.kind {
            ObjectKind::Instance { class, .. } => Some(class),
            _ => None,
        }
    }

    fn set_private(&self, obj: ObjectRef, payload: Rc<dyn Any>) -> BindResult<()> {
        let class = self.class_of(obj).and_then(|id| {
            self.classes
                .borrow()
                .get(id)
                .map(|c| Rc::clone(&c.descriptor))
        });
        let mut heap = self.heap.borrow_mut();
        match &mut heap.object_mut(obj)?.kind {
            ObjectKind::Instance { private, .. } => {
                if private.is_some() {
                    return Err(BindingError::lifecycle("instance payload already set"));
                }
                if let Some(class) = class.filter(|c| !c.accepts(&*payload)) {
                    return Err(BindingError::lifecycle(format!(
                        "payload type does not match class {}",
                        class.name()
                    )));
                }
                *private = Some(payload);
                Ok(())
            }
            other => Err(BindingError::lifecycle(format!(
                "{} is not a class instance",
                other.describe()
            ))),
        }
    }

    fn get_private(&self, obj: ObjectRef) -> BindResult<Option<Rc<dyn Any>>> {
        let heap = self.heap.borrow();
        match &heap.object(obj)?.kind {
            ObjectKind::Instance { private, .. } => Ok(private.clone()),
            other => Err(BindingError::lifecycle(format!(
                "{} is not a class instance",
                other.describe()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leafbind_sdk::{attach, ClassBuilder, MemberTable};

    fn echo() -> HandlerDescriptor {
        HandlerDescriptor::new("echo", 1, |frame| {
            let v = frame.value()?;
            frame.set_return(v);
            Ok(())
        })
    }

    #[test]
    fn test_global_survives_collection() {
        let rt = Runtime::new();
        rt.collect();
        assert!(rt.is_alive(rt.global()));
    }

    #[test]
    fn test_call_attached_member() {
        let rt = Runtime::new();
        let table = MemberTable::new("util").member(echo()).unwrap();
        attach(&rt, rt.global(), &table).unwrap();

        let result = rt.call_path("util.echo", &[JsValue::int32(9)]).unwrap();
        assert_eq!(result, JsValue::int32(9));
        assert!(rt.request_stats().is_balanced());
        assert_eq!(rt.request_stats().begun, 1);
    }

    #[test]
    fn test_failed_call_becomes_script_error() {
        let rt = Runtime::new();
        let table = MemberTable::new("util").member(echo()).unwrap();
        attach(&rt, rt.global(), &table).unwrap();

        let err = rt.call_path("util.echo", &[]).unwrap_err();
        assert_eq!(
            err.message,
            "Invalid arguments to echo: expected at least 1 argument(s), got 0"
        );
    }

    #[test]
    fn test_calling_non_function() {
        let rt = Runtime::new();
        let obj = rt.new_object();
        assert!(rt.call(obj, JsValue::undefined(), &[]).is_err());
        assert!(rt.call_method(rt.global(), "missing", &[]).is_err());
    }

    #[test]
    fn test_unrooted_objects_are_collected() {
        let rt = Runtime::new();
        let kept = rt.new_object();
        let lost = rt.new_object();
        rt.root(kept.to_value());

        assert_eq!(rt.collect(), Some(1));
        assert!(rt.is_alive(kept));
        assert!(!rt.is_alive(lost));
        assert!(rt.get_property(lost, "x").is_err());

        assert!(rt.unroot(kept.to_value()));
        rt.collect();
        assert!(!rt.is_alive(kept));
    }

    #[test]
    fn test_collect_deferred_inside_call() {
        let rt = Runtime::new();
        rt.begin_request();
        assert_eq!(rt.collect(), None);
        rt.end_request();
        assert!(rt.collect().is_some());
    }

    #[test]
    fn test_automatic_collection_at_threshold() {
        let rt = Runtime::with_options(RuntimeOptions::default().with_gc_threshold(4));
        let table = MemberTable::new("util")
            .member(HandlerDescriptor::no_args("garbage", |frame| {
                let ctx = frame.context();
                for _ in 0..8 {
                    ctx.new_object();
                }
                frame.set_return("result");
                Ok(())
            }))
            .unwrap();
        attach(&rt, rt.global(), &table).unwrap();

        let result = rt.call_path("util.garbage", &[]).unwrap();
        assert_eq!(rt.gc_stats().collections, 1);
        // The in-flight result survives the collection
        assert_eq!(rt.string(result).as_deref(), Some("result"));
    }

    #[test]
    fn test_max_call_depth() {
        let rt = Runtime::with_options(RuntimeOptions::default().with_max_call_depth(3));
        let table = MemberTable::new("util")
            .member(HandlerDescriptor::new("recurse", 1, |frame| {
                let f = frame.function()?;
                let ctx = frame.context();
                let result = f.call(ctx, JsValue::undefined(), &[f.object().to_value()])?;
                frame.set_return(result);
                Ok(())
            }))
            .unwrap();
        let util = attach(&rt, rt.global(), &table).unwrap();
        let recurse = rt.get_property(util, "recurse").unwrap();

        let err = rt.call_path("util.recurse", &[recurse]).unwrap_err();
        assert!(err.message.contains("maximum call depth of 3 exceeded"));
        assert!(rt.request_stats().is_balanced());
    }

    #[test]
    fn test_flags_on_attached_members() {
        let rt = Runtime::new();
        let table = MemberTable::new("util")
            .member(echo())
            .unwrap()
            .member(HandlerDescriptor::no_args("hook", |_f| Ok(())).mutable())
            .unwrap();
        let util = attach(&rt, rt.global(), &table).unwrap();

        assert_eq!(rt.property_flags(rt.global(), "util"), Some(PropertyFlags::PROPERTY));
        assert!(matches!(
            rt.set_property(util, "echo", JsValue::null()),
            Err(BindingError::ReadOnly(_))
        ));
        assert!(rt.set_property(util, "hook", JsValue::null()).is_ok());
        assert!(matches!(
            rt.delete_property(util, "hook"),
            Err(BindingError::Permanent(_))
        ));
        assert_eq!(rt.keys(rt.global()).unwrap(), vec!["util".to_string()]);
    }

    #[test]
    fn test_constructor_must_return_instance() {
        let rt = Runtime::new();
        let class = ClassBuilder::<()>::new("Broken")
            .constructor(0, |frame| {
                frame.return_null();
                Ok(())
            })
            .build();
        leafbind_sdk::create_class(&rt, rt.global(), class).unwrap();

        let err = rt.construct_class("Broken", &[]).unwrap_err();
        assert!(err.message.contains("did not return an instance"));
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let rt = Runtime::new();
        let make = || ClassBuilder::<()>::new("Point").build();
        leafbind_sdk::create_class(&rt, rt.global(), make()).unwrap();
        let err = leafbind_sdk::create_class(&rt, rt.global(), make()).unwrap_err();
        assert_eq!(err, BindingError::ClassExists("Point".into()));
    }

    #[test]
    fn test_array_length_property() {
        let rt = Runtime::new();
        let arr = rt.new_array(&[JsValue::int32(1), JsValue::int32(2)]);
        assert_eq!(rt.get_property(arr, "length").unwrap().as_number(), Some(2.0));
        assert_eq!(rt.array_get(arr, 5).unwrap(), JsValue::undefined());
    }
}
