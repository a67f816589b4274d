//! Class registry for native-backed script classes

use std::rc::Rc;

use leafbind_sdk::{BindResult, BindingError, ClassDescriptor, ClassId, ObjectRef};
use rustc_hash::FxHashMap;

/// A class registered with one runtime
#[derive(Debug, Clone)]
pub struct RegisteredClass {
    /// Declaration
    pub descriptor: Rc<ClassDescriptor>,
    /// Prototype holding the class members
    pub prototype: ObjectRef,
    /// Constructor function object
    pub constructor: ObjectRef,
}

/// Class registry for the runtime
#[derive(Debug, Default)]
pub struct ClassRegistry {
    /// Classes indexed by ID
    classes: Vec<RegisteredClass>,
    /// Class name to ID mapping
    name_to_id: FxHashMap<String, usize>,
}

impl ClassRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get next available class ID
    pub fn next_class_id(&self) -> ClassId {
        ClassId(self.classes.len())
    }

    /// Check if a class name is taken
    pub fn contains(&self, name: &str) -> bool {
        self.name_to_id.contains_key(name)
    }

    /// Register a new class. Names are unique per runtime.
    pub fn register_class(&mut self, class: RegisteredClass) -> BindResult<ClassId> {
        let name = class.descriptor.name().to_string();
        if self.name_to_id.contains_key(&name) {
            return Err(BindingError::ClassExists(name));
        }
        let id = self.classes.len();
        self.classes.push(class);
        self.name_to_id.insert(name, id);
        Ok(ClassId(id))
    }

    /// Get class by ID
    pub fn get(&self, id: ClassId) -> Option<&RegisteredClass> {
        self.classes.get(id.0)
    }

    /// Get class by name
    pub fn get_by_name(&self, name: &str) -> Option<(ClassId, &RegisteredClass)> {
        self.name_to_id
            .get(name)
            .and_then(|&id| self.classes.get(id).map(|c| (ClassId(id), c)))
    }

    /// Iterate over all classes with their IDs
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &RegisteredClass)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(id, class)| (ClassId(id), class))
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True when no class is registered
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
