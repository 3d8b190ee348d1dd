use std::collections::HashMap;

use super::ObjRef;
use crate::error::{DispatchError, Result};

/// Stack of name→instance scope frames. The bottom frame is the root scope
/// and is never popped.
#[derive(Debug)]
pub struct InstanceStore {
    frames: Vec<HashMap<String, ObjRef>>,
}

impl Default for InstanceStore {
    fn default() -> Self {
        InstanceStore { frames: vec![HashMap::new()] }
    }
}

impl InstanceStore {
    pub fn new() -> Self {
        InstanceStore::default()
    }

    pub fn push(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Bind `name` in the top frame, replacing any binding there.
    pub fn register(&mut self, name: impl Into<String>, instance: ObjRef) {
        let top = self.frames.len() - 1;
        self.register_at(top, name, instance);
    }

    /// Bind `name` in frame `frame` (0 is the root). Out-of-range indices bind in the top frame.
    pub fn register_at(&mut self, frame: usize, name: impl Into<String>, instance: ObjRef) {
        let frame = frame.min(self.frames.len() - 1);
        self.frames[frame].insert(name.into(), instance);
    }

    /// Innermost binding of `name`.
    pub fn get(&self, name: &str) -> Result<ObjRef> {
        for frame in self.frames.iter().rev() {
            if let Some(instance) = frame.get(name) {
                return Ok(instance.clone());
            }
        }
        Err(DispatchError::NotDefined { name: name.to_string() })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.frames.iter().any(|frame| frame.contains_key(name))
    }

    /// Remove `name` from frame `frame` only. Same clamping as `register_at`.
    pub fn remove_at(&mut self, frame: usize, name: &str) -> Option<ObjRef> {
        let frame = frame.min(self.frames.len() - 1);
        self.frames[frame].remove(name)
    }

    /// Remove the innermost binding of `name`, exposing any outer one.
    pub fn evict(&mut self, name: &str) -> Option<ObjRef> {
        self.frames.iter_mut().rev().find_map(|frame| frame.remove(name))
    }
}
