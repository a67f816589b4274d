//! Object heap
//!
//! Every string and object lives in a cell keyed by a monotonically
//! increasing id. Ids are never reused, so a handle that outlives its cell
//! is reported as dangling instead of aliasing a newer allocation.

use std::any::Any;
use std::rc::Rc;

use leafbind_sdk::{
    BindResult, BindingError, ClassId, HandlerDescriptor, JsValue, ObjectRef, PropertyFlags,
    StringRef,
};
use rustc_hash::FxHashMap;

/// One own property
#[derive(Debug, Clone, Copy)]
pub struct Property {
    /// Stored value
    pub value: JsValue,
    /// Attribute bits
    pub flags: PropertyFlags,
}

/// Native function cell
#[derive(Clone)]
pub struct NativeFunction {
    /// Handler invoked on call
    pub descriptor: Rc<HandlerDescriptor>,
    /// Class constructed when this is a class constructor
    pub constructs: Option<ClassId>,
}

/// What an object is beyond its properties
pub enum ObjectKind {
    /// `{}`
    Plain,
    /// `[...]`
    Array(Vec<JsValue>),
    /// Callable native function
    Function(NativeFunction),
    /// Instance of a registered class with its payload slot
    Instance {
        /// Owning class
        class: ClassId,
        /// Native payload, taken out exactly once by finalization
        private: Option<Rc<dyn Any>>,
    },
}

impl ObjectKind {
    /// Short description used in diagnostics
    pub fn describe(&self) -> &'static str {
        match self {
            ObjectKind::Plain => "object",
            ObjectKind::Array(_) => "array",
            ObjectKind::Function(_) => "function",
            ObjectKind::Instance { .. } => "instance",
        }
    }
}

/// Object cell: kind, prototype and ordered own properties
pub struct ObjectData {
    /// Object kind
    pub kind: ObjectKind,
    /// Prototype link
    pub proto: Option<ObjectRef>,
    props: FxHashMap<String, Property>,
    order: Vec<String>,
}

impl ObjectData {
    /// Fresh object without properties
    pub fn new(kind: ObjectKind, proto: Option<ObjectRef>) -> Self {
        Self {
            kind,
            proto,
            props: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    /// Own property
    pub fn get_own(&self, name: &str) -> Option<&Property> {
        self.props.get(name)
    }

    /// Define or redefine an own property. Permanent properties cannot be
    /// redefined.
    pub fn define(&mut self, name: &str, value: JsValue, flags: PropertyFlags) -> BindResult<()> {
        match self.props.get_mut(name) {
            Some(existing) if existing.flags.is_permanent() => {
                Err(BindingError::Permanent(name.to_string()))
            }
            Some(existing) => {
                *existing = Property { value, flags };
                Ok(())
            }
            None => {
                self.order.push(name.to_string());
                self.props.insert(name.to_string(), Property { value, flags });
                Ok(())
            }
        }
    }

    /// Script assignment. New properties are enumerable and configurable.
    pub fn assign(&mut self, name: &str, value: JsValue) -> BindResult<()> {
        match self.props.get_mut(name) {
            Some(existing) if existing.flags.is_read_only() => {
                Err(BindingError::ReadOnly(name.to_string()))
            }
            Some(existing) => {
                existing.value = value;
                Ok(())
            }
            None => self.define(name, value, PropertyFlags::ENUMERATE),
        }
    }

    /// Script delete. Deleting a missing property succeeds.
    pub fn delete(&mut self, name: &str) -> BindResult<bool> {
        match self.props.get(name) {
            Some(existing) if existing.flags.is_permanent() => {
                Err(BindingError::Permanent(name.to_string()))
            }
            Some(_) => {
                self.props.remove(name);
                self.order.retain(|key| key != name);
                Ok(true)
            }
            None => Ok(true),
        }
    }

    /// Own enumerable property names in definition order
    pub fn keys(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|key| self.props.get(*key).is_some_and(|p| p.flags.is_enumerable()))
            .cloned()
            .collect()
    }

    /// Every value this object references
    pub fn references(&self) -> impl Iterator<Item = JsValue> + '_ {
        let elements: &[JsValue] = match &self.kind {
            ObjectKind::Array(items) => items,
            _ => &[],
        };
        self.props
            .values()
            .map(|p| p.value)
            .chain(elements.iter().copied())
            .chain(self.proto.map(ObjectRef::to_value))
    }
}

/// Contents of a heap cell
pub enum CellData {
    /// Immutable string
    String(Rc<str>),
    /// Object
    Object(ObjectData),
}

/// Heap cell with its mark bit
pub struct HeapCell {
    /// Contents
    pub data: CellData,
    /// Set during the mark phase
    pub marked: bool,
}

/// Heap of strings and objects
pub struct Heap {
    cells: FxHashMap<u64, HeapCell>,
    next_id: u64,
    total_allocations: usize,
}

impl Heap {
    /// Empty heap
    pub fn new() -> Self {
        Self {
            cells: FxHashMap::default(),
            next_id: 1,
            total_allocations: 0,
        }
    }

    fn insert(&mut self, data: CellData) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.total_allocations += 1;
        self.cells.insert(id, HeapCell { data, marked: false });
        id
    }

    /// Allocate a string
    pub fn alloc_string(&mut self, s: &str) -> StringRef {
        StringRef::from_raw(self.insert(CellData::String(Rc::from(s))))
    }

    /// Allocate an object
    pub fn alloc_object(&mut self, kind: ObjectKind, proto: Option<ObjectRef>) -> ObjectRef {
        ObjectRef::from_raw(self.insert(CellData::Object(ObjectData::new(kind, proto))))
    }

    /// String contents
    pub fn string(&self, s: StringRef) -> BindResult<Rc<str>> {
        match self.cells.get(&s.raw()).map(|c| &c.data) {
            Some(CellData::String(text)) => Ok(Rc::clone(text)),
            Some(CellData::Object(_)) => Err(BindingError::Runtime(format!(
                "handle {} is not a string",
                s.raw()
            ))),
            None => Err(dangling(s.raw())),
        }
    }

    /// Object cell
    pub fn object(&self, obj: ObjectRef) -> BindResult<&ObjectData> {
        match self.cells.get(&obj.raw()).map(|c| &c.data) {
            Some(CellData::Object(data)) => Ok(data),
            Some(CellData::String(_)) => Err(not_an_object(obj)),
            None => Err(dangling(obj.raw())),
        }
    }

    /// Mutable object cell
    pub fn object_mut(&mut self, obj: ObjectRef) -> BindResult<&mut ObjectData> {
        match self.cells.get_mut(&obj.raw()).map(|c| &mut c.data) {
            Some(CellData::Object(data)) => Ok(data),
            Some(CellData::String(_)) => Err(not_an_object(obj)),
            None => Err(dangling(obj.raw())),
        }
    }

    /// Check if a handle still refers to a live cell
    pub fn contains(&self, raw: u64) -> bool {
        self.cells.contains_key(&raw)
    }

    /// Cell by raw id
    pub fn cell(&self, raw: u64) -> Option<&HeapCell> {
        self.cells.get(&raw)
    }

    /// Mutable cell by raw id
    pub fn cell_mut(&mut self, raw: u64) -> Option<&mut HeapCell> {
        self.cells.get_mut(&raw)
    }

    /// Mutable access to every cell
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut HeapCell> {
        self.cells.values_mut()
    }

    /// Remove every unmarked cell, returning the removed cells
    pub fn sweep_unmarked(&mut self) -> Vec<HeapCell> {
        let dead: Vec<u64> = self
            .cells
            .iter()
            .filter(|(_, cell)| !cell.marked)
            .map(|(&id, _)| id)
            .collect();
        dead.into_iter()
            .filter_map(|id| self.cells.remove(&id))
            .collect()
    }

    /// Take the payload out of every remaining instance
    pub fn drain_payloads(&mut self) -> Vec<(ClassId, Rc<dyn Any>)> {
        let mut payloads = Vec::new();
        for cell in self.cells.values_mut() {
            if let CellData::Object(ObjectData {
                kind: ObjectKind::Instance { class, private },
                ..
            }) = &mut cell.data
            {
                if let Some(payload) = private.take() {
                    payloads.push((*class, payload));
                }
            }
        }
        payloads
    }

    /// Number of live cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when nothing is allocated
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Allocations since the heap was created
    pub fn total_allocations(&self) -> usize {
        self.total_allocations
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

fn dangling(raw: u64) -> BindingError {
    BindingError::Runtime(format!("dangling handle {}", raw))
}

fn not_an_object(obj: ObjectRef) -> BindingError {
    BindingError::Runtime(format!("handle {} is not an object", obj.raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_string() {
        let mut heap = Heap::new();
        let s = heap.alloc_string("hello");
        assert_eq!(&*heap.string(s).unwrap(), "hello");
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut heap = Heap::new();
        let a = heap.alloc_object(ObjectKind::Plain, None);
        heap.sweep_unmarked();
        assert!(heap.object(a).is_err());

        let b = heap.alloc_object(ObjectKind::Plain, None);
        assert_ne!(a, b);
        assert!(heap.object(a).is_err());
        assert!(heap.object(b).is_ok());
    }

    #[test]
    fn test_string_handle_is_not_an_object() {
        let mut heap = Heap::new();
        let s = heap.alloc_string("x");
        let as_obj = ObjectRef::from_raw(s.raw());
        assert!(heap.object(as_obj).is_err());
    }

    #[test]
    fn test_property_flags_enforced() {
        let mut obj = ObjectData::new(ObjectKind::Plain, None);
        obj.define("fixed", JsValue::int32(1), PropertyFlags::FUNCTION)
            .unwrap();
        obj.define("open", JsValue::int32(2), PropertyFlags::MUTABLE_FUNCTION)
            .unwrap();

        assert_eq!(
            obj.assign("fixed", JsValue::int32(3)),
            Err(BindingError::ReadOnly("fixed".into()))
        );
        assert!(obj.assign("open", JsValue::int32(4)).is_ok());
        assert_eq!(obj.get_own("open").unwrap().value, JsValue::int32(4));

        assert!(obj.delete("open").is_err());
        assert!(obj.delete("fixed").is_err());
        assert_eq!(obj.delete("missing"), Ok(true));
    }

    #[test]
    fn test_assign_creates_enumerable_property() {
        let mut obj = ObjectData::new(ObjectKind::Plain, None);
        obj.define("hidden", JsValue::null(), PropertyFlags::NONE)
            .unwrap();
        obj.assign("b", JsValue::int32(1)).unwrap();
        obj.assign("a", JsValue::int32(2)).unwrap();
        assert_eq!(obj.keys(), vec!["b".to_string(), "a".to_string()]);

        assert_eq!(obj.delete("b"), Ok(true));
        assert_eq!(obj.keys(), vec!["a".to_string()]);
    }

    #[test]
    fn test_drain_payloads() {
        let mut heap = Heap::new();
        heap.alloc_object(
            ObjectKind::Instance {
                class: ClassId(0),
                private: Some(Rc::new(5u32)),
            },
            None,
        );
        heap.alloc_object(
            ObjectKind::Instance {
                class: ClassId(0),
                private: None,
            },
            None,
        );

        let payloads = heap.drain_payloads();
        assert_eq!(payloads.len(), 1);
        assert!(heap.drain_payloads().is_empty());
    }
}
