use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::class::{AttrDecl, Class, ClassDef, ClassRegistry, Resolved};
use crate::error::{DispatchError, Result};
use crate::instance::{Instance, InstanceStore, ObjRef};
use crate::primitives;
use crate::value::Value;

pub mod control;
pub mod kwargs;
pub use kwargs::Kwargs;

/// Name of the root instance that understands `define` and `new`.
pub const ENV: &str = "env";
pub const THIS: &str = "this";
pub const ARGS: &str = "args";

/// Who a message is sent to.
#[derive(Debug, Clone)]
pub enum Receiver {
    /// Looked up in the instance store, innermost frame first.
    Name(String),
    Object(ObjRef),
    /// Primitive values are boxed before dispatch.
    Value(Value),
}

impl From<&str> for Receiver {
    fn from(name: &str) -> Self { Receiver::Name(name.to_string()) }
}

impl From<String> for Receiver {
    fn from(name: String) -> Self { Receiver::Name(name) }
}

impl From<ObjRef> for Receiver {
    fn from(obj: ObjRef) -> Self { Receiver::Object(obj) }
}

impl From<&ObjRef> for Receiver {
    fn from(obj: &ObjRef) -> Self { Receiver::Object(obj.clone()) }
}

impl From<Value> for Receiver {
    fn from(value: Value) -> Self { Receiver::Value(value) }
}

/// Per-call access decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    SelfCall,
    Granted,
    Denied,
}

impl Gate {
    fn decide(resolved: &Resolved, self_call: bool) -> Gate {
        if self_call {
            Gate::SelfCall
        } else if resolved.access().is_private() {
            Gate::Denied
        } else {
            Gate::Granted
        }
    }
}

/// The message dispatcher. Owns the class registry and the instance store and
/// is handed to every method body so bodies can send further messages.
#[derive(Debug)]
pub struct Dispatcher {
    registry: ClassRegistry,
    store: InstanceStore,
    next_temp: u64,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Dispatcher::new()
    }
}

impl Dispatcher {
    /// A dispatcher with the primitive classes and the `env` root instance installed.
    pub fn new() -> Self {
        let mut dispatcher = Dispatcher::empty();
        let installed = dispatcher.bootstrap();
        debug_assert!(installed.is_ok(), "bootstrap failed: {installed:?}");
        if let Err(err) = installed {
            tracing::error!(%err, "bootstrap failed, runtime is incomplete");
        }
        dispatcher
    }

    /// Like [`Dispatcher::new`] but reports a failed bootstrap.
    pub fn try_new() -> Result<Self> {
        let mut dispatcher = Dispatcher::empty();
        dispatcher.bootstrap()?;
        Ok(dispatcher)
    }

    fn empty() -> Self {
        Dispatcher {
            registry: ClassRegistry::new(),
            store: InstanceStore::new(),
            next_temp: 0,
        }
    }

    fn bootstrap(&mut self) -> Result<()> {
        for def in primitives::definitions() {
            self.define(def)?;
        }
        let env = self.define(control::env_class())?;
        self.store.register(ENV, Instance::new(env, ENV, HashMap::new()));
        Ok(())
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub fn store(&self) -> &InstanceStore {
        &self.store
    }

    /// Register a class. Same path as the `define` control message.
    #[tracing::instrument(level = "debug", skip_all, fields(class = %def.name))]
    pub fn define(&mut self, def: ClassDef) -> Result<Rc<Class>> {
        let class = self.registry.define(def)?;
        debug!(bases = class.bases().len(), attrs = class.attrs().len(), "class defined");
        Ok(class)
    }

    /// Create an instance of `cls`, bind it as `name` in the current top frame
    /// and run its constructor with `args`.
    pub fn instantiate(&mut self, cls: &str, name: &str, args: Kwargs) -> Result<ObjRef> {
        let frame = self.store.depth() - 1;
        self.instantiate_in(frame, cls, name, args)
    }

    pub(crate) fn instantiate_in(
        &mut self,
        frame: usize,
        cls: &str,
        name: &str,
        args: Kwargs,
    ) -> Result<ObjRef> {
        let class = self.registry.get(cls)?;
        let instance = Instance::new(Rc::clone(&class), name, class.default_attributes());
        self.store.register_at(frame, name, instance.clone());
        debug!(class = %cls, instance = %name, frame, "instance created");

        if let Some(constructor) = class.resolve_constructor() {
            let args = self.args_instance(args)?;
            let result = {
                let mut scope = Scope::open(self, &instance, &args);
                constructor.call(&mut scope)
            };
            if let Err(err) = result {
                // A half-built instance must not stay reachable by name.
                self.store.remove_at(frame, name);
                return Err(err);
            }
        }
        Ok(instance)
    }

    /// Send `message` to `receiver` with keyword arguments.
    ///
    /// The receiver and the method are resolved and access is checked before
    /// the body runs. The call's scope frame (binding `this` and `args`) is
    /// popped on every exit path.
    #[tracing::instrument(level = "trace", skip(self, receiver, args))]
    pub fn send(
        &mut self,
        receiver: impl Into<Receiver>,
        message: &str,
        args: Kwargs,
    ) -> Result<Value> {
        let this = self.resolve_receiver(receiver.into())?;
        let args = self.args_instance(args)?;
        let caller = self.store.get(THIS).ok();

        let mut scope = Scope::open(self, &this, &args);
        let resolved = this.class().resolve_method(message)?;
        let self_call = caller.as_ref().is_some_and(|c| Instance::is(c, &this));
        match Gate::decide(&resolved, self_call) {
            Gate::SelfCall | Gate::Granted => {}
            Gate::Denied => {
                debug!(class = %this.class().name(), %message, "private member denied");
                return Err(DispatchError::MethodAccessDenied {
                    class: this.class().name().to_string(),
                    method: message.to_string(),
                });
            }
        }
        trace!(class = %this.class().name(), instance = %this.name(), "invoke");
        scope.invoke(&this, resolved)
    }

    fn invoke(&mut self, this: &ObjRef, resolved: Resolved) -> Result<Value> {
        match resolved {
            Resolved::Method { body, .. } => body.call(self),
            Resolved::Getter { attr, .. } => Ok(this.attribute(&attr).unwrap_or(Value::Nil)),
            Resolved::Setter { attr, .. } => {
                // Primitives are stored raw so no box is ever shared with the caller.
                let value = self.send(ARGS, "get-value", Kwargs::new())?;
                let value = self.unbox(value)?;
                this.store_attribute(&attr, value);
                Ok(Value::Nil)
            }
        }
    }

    fn resolve_receiver(&mut self, receiver: Receiver) -> Result<ObjRef> {
        match receiver {
            Receiver::Name(name) => self.store.get(&name),
            Receiver::Object(obj) => Ok(obj),
            Receiver::Value(value) => self.box_value(value),
        }
    }

    /// Reify keyword arguments as an instance of a one-off class whose public
    /// attributes are exactly the arguments.
    fn args_instance(&mut self, args: Kwargs) -> Result<ObjRef> {
        let mut attrs = Vec::with_capacity(args.len());
        let mut values = HashMap::with_capacity(args.len());
        for (name, value) in args {
            let value = if value.is_primitive() {
                Value::Object(self.box_value(value)?)
            } else {
                value
            };
            attrs.push(AttrDecl::public(name.clone()));
            values.insert(name, value);
        }
        let class = Rc::new(Class::new(ARGS, Vec::new(), attrs, None, HashMap::new()));
        Ok(Instance::new(class, ARGS, values))
    }

    /// Wrap a raw primitive in a fresh instance of its primitive class.
    /// Objects pass through unchanged.
    pub fn box_value(&mut self, value: Value) -> Result<ObjRef> {
        let class_name = match &value {
            Value::Object(obj) => return Ok(obj.clone()),
            Value::Int(_) => primitives::INT,
            Value::Float(_) => primitives::FLOAT,
            Value::Text(_) => primitives::STR,
            Value::Bool(_) => primitives::BOOL,
            other => {
                return Err(DispatchError::bad_argument(
                    "receiver",
                    format!("a {} cannot receive messages", other.type_name()),
                ));
            }
        };
        let class = self.registry.get(class_name)?;
        self.next_temp += 1;
        let name = format!("{}#{}", class_name, self.next_temp);
        let mut attributes = HashMap::new();
        attributes.insert(primitives::VALUE.to_string(), value);
        Ok(Instance::new(class, name, attributes))
    }

    pub fn boxed(&mut self, value: Value) -> Result<Value> {
        self.box_value(value).map(Value::Object)
    }

    /// Raw value of a primitive box. Anything else, including instances of
    /// user classes with a `value` attribute, is returned as it is.
    pub fn unbox(&mut self, value: Value) -> Result<Value> {
        let obj = match &value {
            Value::Object(obj) if primitives::is_box(obj) => obj.clone(),
            _ => return Ok(value),
        };
        self.send(obj, "get-value", Kwargs::new())
    }

    pub fn lookup(&self, name: &str) -> Result<ObjRef> {
        self.store.get(name)
    }

    /// Drop the innermost binding of `name` (e.g. a temporary holding a return value).
    pub fn evict(&mut self, name: &str) -> Option<ObjRef> {
        let evicted = self.store.evict(name);
        if evicted.is_some() {
            debug!(instance = %name, "evicted");
        }
        evicted
    }

    /// `this` of the call currently executing.
    pub fn this(&self) -> Result<ObjRef> {
        self.store.get(THIS)
    }

    /// `args` of the call currently executing.
    pub fn args(&self) -> Result<ObjRef> {
        self.store.get(ARGS)
    }

    /// Unboxed keyword argument `name` of the current call.
    pub fn arg(&mut self, name: &str) -> Result<Value> {
        let value = self.send(ARGS, &format!("get-{}", name), Kwargs::new())?;
        self.unbox(value)
    }

    pub fn optional_arg(&mut self, name: &str) -> Result<Option<Value>> {
        if self.args()?.class().declares(name) {
            self.arg(name).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Scope frame for one call. Pushes on open, pops on drop, so the frame goes
/// away on success, on `?` and on unwinding alike.
struct Scope<'a> {
    dispatcher: &'a mut Dispatcher,
}

impl<'a> Scope<'a> {
    fn open(dispatcher: &'a mut Dispatcher, this: &ObjRef, args: &ObjRef) -> Self {
        dispatcher.store.push();
        dispatcher.store.register(THIS, this.clone());
        dispatcher.store.register(ARGS, args.clone());
        Scope { dispatcher }
    }
}

impl Deref for Scope<'_> {
    type Target = Dispatcher;
    fn deref(&self) -> &Dispatcher {
        self.dispatcher
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut Dispatcher {
        self.dispatcher
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.dispatcher.store.pop();
    }
}
