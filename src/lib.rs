//! A small message-passing object runtime: classes with attributes and
//! methods, multiple inheritance, private members and scoped instance
//! names, all driven by sending messages with keyword arguments.

pub mod class;
pub mod diagnostic;
pub mod dispatch;
pub mod error;
pub mod instance;
pub mod primitives;
pub mod script;
pub mod value;

pub use class::{Access, AttrDecl, Body, Class, ClassDef, ClassRegistry, MethodDef};
pub use dispatch::{Dispatcher, Kwargs, Receiver};
pub use error::{DispatchError, Result};
pub use instance::{Instance, InstanceStore, ObjRef};
pub use script::{Script, ScriptError};
pub use value::Value;
