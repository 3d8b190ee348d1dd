use std::collections::HashMap;
use std::rc::Rc;

use super::{Class, ClassDef};
use crate::error::{DispatchError, Result};

/// Owns every defined class. Classes are never redefined or removed.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, Rc<Class>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        ClassRegistry::default()
    }

    /// Register `def`, resolving its base names against classes defined earlier.
    pub fn define(&mut self, def: ClassDef) -> Result<Rc<Class>> {
        if self.classes.contains_key(&def.name) {
            return Err(DispatchError::ClassAlreadyDefined { name: def.name });
        }
        let bases = def.bases.iter()
            .map(|base| self.get(base))
            .collect::<Result<Vec<_>>>()?;
        let methods = def.methods.into_iter().collect();
        let class = Rc::new(Class::new(def.name.clone(), bases, def.attrs, def.constructor, methods));
        self.classes.insert(def.name, Rc::clone(&class));
        Ok(class)
    }

    pub fn get(&self, name: &str) -> Result<Rc<Class>> {
        self.classes.get(name).cloned().ok_or_else(|| {
            DispatchError::ClassNotFound { name: name.to_string() }
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Class names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
