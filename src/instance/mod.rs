use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::class::Class;
use crate::value::Value;

pub mod store;
pub use store::InstanceStore;

/// Shared handle to a live instance. Identity is pointer identity.
pub type ObjRef = Rc<Instance>;

pub struct Instance {
    class: Rc<Class>,
    name: String,
    attributes: RefCell<HashMap<String, Value>>,
}

impl Instance {
    pub(crate) fn new(
        class: Rc<Class>,
        name: impl Into<String>,
        attributes: HashMap<String, Value>,
    ) -> ObjRef {
        Rc::new(Instance { class, name: name.into(), attributes: RefCell::new(attributes) })
    }

    pub fn class(&self) -> &Rc<Class> {
        &self.class
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current value of an attribute, if the instance holds one.
    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes.borrow().get(name).cloned()
    }

    pub fn attribute_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.attributes.borrow().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Only resolved setters and primitive bodies write attributes.
    pub(crate) fn store_attribute(&self, name: &str, value: Value) {
        self.attributes.borrow_mut().insert(name.to_string(), value);
    }

    pub fn is(a: &ObjRef, b: &ObjRef) -> bool {
        Rc::ptr_eq(a, b)
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class.name())
            .field("name", &self.name)
            .field("attributes", &self.attribute_names())
            .finish()
    }
}
