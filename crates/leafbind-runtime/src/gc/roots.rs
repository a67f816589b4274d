//! GC root tracking
//!
//! Roots are the starting points of the mark phase:
//! - Values pinned by the embedder (`Runtime::root`)
//! - Values registered by the runtime itself (global object, class objects)

use leafbind_sdk::JsValue;

/// Root set for garbage collection
pub struct RootSet {
    /// Values pinned by the embedder; a value pinned twice needs two unpins
    pinned: Vec<JsValue>,

    /// Runtime-owned roots, never removed
    permanent: Vec<JsValue>,
}

fn is_heap_value(value: JsValue) -> bool {
    value.is_object() || value.is_string()
}

impl RootSet {
    /// Create a new root set
    pub fn new() -> Self {
        Self {
            pinned: Vec::new(),
            permanent: Vec::new(),
        }
    }

    /// Pin a value
    pub fn add_root(&mut self, value: JsValue) {
        if is_heap_value(value) {
            self.pinned.push(value);
        }
    }

    /// Release one pin of a value. Returns false if it was not pinned.
    pub fn remove_root(&mut self, value: JsValue) -> bool {
        match self.pinned.iter().rposition(|&v| v == value) {
            Some(index) => {
                self.pinned.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Add a runtime-owned root
    pub fn add_permanent_root(&mut self, value: JsValue) {
        if is_heap_value(value) {
            self.permanent.push(value);
        }
    }

    /// Iterate over all roots
    pub fn iter(&self) -> impl Iterator<Item = JsValue> + '_ {
        self.pinned.iter().chain(self.permanent.iter()).copied()
    }

    /// Get total number of roots
    pub fn len(&self) -> usize {
        self.pinned.len() + self.permanent.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RootSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leafbind_sdk::ObjectRef;

    #[test]
    fn test_root_set_creation() {
        let roots = RootSet::new();
        assert_eq!(roots.len(), 0);
        assert!(roots.is_empty());
    }

    #[test]
    fn test_primitives_are_ignored() {
        let mut roots = RootSet::new();
        roots.add_root(JsValue::int32(42));
        roots.add_root(JsValue::bool(true));
        roots.add_root(JsValue::null());
        roots.add_permanent_root(JsValue::undefined());
        assert_eq!(roots.len(), 0);
    }

    #[test]
    fn test_pins_are_counted() {
        let mut roots = RootSet::new();
        let obj = ObjectRef::from_raw(7).to_value();

        roots.add_root(obj);
        roots.add_root(obj);
        assert_eq!(roots.len(), 2);

        assert!(roots.remove_root(obj));
        assert_eq!(roots.iter().filter(|&v| v == obj).count(), 1);
        assert!(roots.remove_root(obj));
        assert!(!roots.remove_root(obj));
    }
}
