//! Native-backed script classes
//!
//! A [`ClassDescriptor`] bundles the constructor, the prototype members and
//! an optional finalizer. The runtime registers it once and calls the
//! finalizer from its collector when an instance becomes unreachable.

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::context::{ClassId, ScriptContext};
use crate::error::BindResult;
use crate::frame::CallFrame;
use crate::member::{HandlerDescriptor, MemberTable};
use crate::value::ObjectRef;

/// Teardown hook receiving the payload of a collected instance
pub type Finalizer = Rc<dyn Fn(Rc<dyn Any>)>;

/// Registration data for one class
pub struct ClassDescriptor {
    name: String,
    constructor: Rc<HandlerDescriptor>,
    members: MemberTable,
    finalizer: Option<Finalizer>,
    payload_type: Option<TypeId>,
}

impl ClassDescriptor {
    /// Assemble a descriptor from parts. Instances accept a payload of any
    /// type; use [`ClassBuilder`] to pin it.
    pub fn new(
        name: impl Into<String>,
        constructor: HandlerDescriptor,
        members: MemberTable,
        finalizer: Option<Finalizer>,
    ) -> Self {
        Self {
            name: name.into(),
            constructor: Rc::new(constructor),
            members,
            finalizer,
            payload_type: None,
        }
    }

    /// Class name, also the constructor's script name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constructor handler
    pub fn constructor(&self) -> &Rc<HandlerDescriptor> {
        &self.constructor
    }

    /// Prototype members
    pub fn members(&self) -> &MemberTable {
        &self.members
    }

    /// Whether instances need finalization
    pub fn has_finalizer(&self) -> bool {
        self.finalizer.is_some()
    }

    /// Whether `payload` may be stored in an instance of this class
    pub fn accepts(&self, payload: &dyn Any) -> bool {
        self.payload_type
            .map_or(true, |expected| payload.type_id() == expected)
    }

    /// Hand a collected instance's payload to the finalizer
    pub fn finalize(&self, payload: Rc<dyn Any>) {
        if let Some(finalizer) = &self.finalizer {
            finalizer(payload);
        }
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("constructor", &self.constructor)
            .field("members", &self.members)
            .field("finalizer", &self.finalizer.is_some())
            .finish()
    }
}

/// Typed builder for a class whose payload is `T`
pub struct ClassBuilder<T> {
    name: String,
    constructor: Option<HandlerDescriptor>,
    members: MemberTable,
    finalizer: Option<Finalizer>,
    _payload: PhantomData<fn() -> T>,
}

impl<T: 'static> ClassBuilder<T> {
    /// Start a class named `name`
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            members: MemberTable::new(name.clone()),
            name,
            constructor: None,
            finalizer: None,
            _payload: PhantomData,
        }
    }

    /// Constructor body. It should allocate with [`CallFrame::new_instance`],
    /// attach a payload and return the instance.
    pub fn constructor<F>(mut self, min_args: usize, f: F) -> Self
    where
        F: Fn(&mut CallFrame<'_>) -> BindResult<()> + 'static,
    {
        self.constructor = Some(HandlerDescriptor::new(self.name.clone(), min_args, f));
        self
    }

    /// Add a prototype method
    pub fn method(mut self, descriptor: HandlerDescriptor) -> BindResult<Self> {
        self.members.add(descriptor)?;
        Ok(self)
    }

    /// Add every member of `table` to the prototype
    pub fn members(mut self, table: &MemberTable) -> BindResult<Self> {
        self.members.extend(table)?;
        Ok(self)
    }

    /// Teardown hook. Receives the payload once, after the instance became
    /// unreachable.
    pub fn finalizer<F>(mut self, f: F) -> Self
    where
        F: Fn(Rc<T>) + 'static,
    {
        let class = self.name.clone();
        self.finalizer = Some(Rc::new(move |payload: Rc<dyn Any>| {
            match payload.downcast::<T>() {
                Ok(payload) => f(payload),
                // Unreachable through a runtime that checks `accepts`
                Err(_) => tracing::error!(
                    class = class.as_str(),
                    expected = std::any::type_name::<T>(),
                    "finalizer received a payload of another type"
                ),
            }
        }));
        self
    }

    /// Finish the descriptor. Without an explicit constructor the class
    /// constructs bare instances with no payload. Instances only accept a
    /// payload of type `T`.
    pub fn build(self) -> ClassDescriptor {
        let constructor = self.constructor.unwrap_or_else(|| {
            HandlerDescriptor::no_args(self.name.clone(), |frame| {
                let obj = frame.new_instance()?;
                frame.set_return(obj);
                Ok(())
            })
        });
        ClassDescriptor {
            name: self.name,
            constructor: Rc::new(constructor),
            members: self.members,
            finalizer: self.finalizer,
            payload_type: Some(TypeId::of::<T>()),
        }
    }
}

/// Register `class` with the runtime and define its constructor on `parent`
pub fn create_class(
    ctx: &dyn ScriptContext,
    parent: ObjectRef,
    class: ClassDescriptor,
) -> BindResult<ClassId> {
    ctx.init_class(parent, Rc::new(class))
}
