use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::dispatch::Dispatcher;
use crate::error::{DispatchError, Result};
use crate::script::{self, Expr};
use crate::value::Value;

pub mod registry;
pub use registry::ClassRegistry;

/// Access kind of an attribute declaration or a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    #[default]
    Public,
    Private,
    Readonly,
}

impl Access {
    /// Access kind of the synthesized `get-<attr>` accessor.
    pub fn getter(self) -> Access {
        match self {
            Access::Private => Access::Private,
            Access::Public | Access::Readonly => Access::Public,
        }
    }

    /// Access kind of the synthesized `set-<attr>` accessor.
    pub fn setter(self) -> Access {
        match self {
            Access::Public => Access::Public,
            Access::Private | Access::Readonly => Access::Private,
        }
    }

    pub fn is_private(self) -> bool {
        self == Access::Private
    }
}

impl std::str::FromStr for Access {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Access> {
        match s {
            "public" => Ok(Access::Public),
            "private" => Ok(Access::Private),
            "readonly" => Ok(Access::Readonly),
            other => Err(DispatchError::bad_argument(
                "kind",
                format!("expected public, private or readonly, got '{}'", other),
            )),
        }
    }
}

impl std::fmt::Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Access::Public => write!(f, "public"),
            Access::Private => write!(f, "private"),
            Access::Readonly => write!(f, "readonly"),
        }
    }
}

pub type NativeFn = dyn Fn(&mut Dispatcher) -> Result<Value>;

/// Executable body of a method or constructor. Runs with `this` and `args`
/// bound in the dispatcher's current scope frame.
#[derive(Clone)]
pub enum Body {
    Native(Rc<NativeFn>),
    Script(Rc<[Expr]>),
}

impl Body {
    pub fn native(f: impl Fn(&mut Dispatcher) -> Result<Value> + 'static) -> Self {
        Body::Native(Rc::new(f))
    }

    pub fn script(exprs: Vec<Expr>) -> Self {
        Body::Script(exprs.into())
    }

    pub(crate) fn call(&self, dispatcher: &mut Dispatcher) -> Result<Value> {
        match self {
            Body::Native(f) => f(dispatcher),
            Body::Script(exprs) => script::eval_body(dispatcher, exprs),
        }
    }

    pub fn ptr_eq(&self, other: &Body) -> bool {
        match (self, other) {
            (Body::Native(a), Body::Native(b)) => Rc::ptr_eq(a, b),
            (Body::Script(a), Body::Script(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Body::Native(_) => write!(f, "Body::Native"),
            Body::Script(exprs) => write!(f, "Body::Script({} exprs)", exprs.len()),
        }
    }
}

/// An attribute declaration: `name`, its access kind and the default value
/// every new instance starts with.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrDecl {
    pub name: String,
    pub access: Access,
    pub default: Value,
}

impl AttrDecl {
    pub fn new(name: impl Into<String>, access: Access) -> Self {
        AttrDecl { name: name.into(), access, default: Value::Nil }
    }

    pub fn public(name: impl Into<String>) -> Self {
        AttrDecl::new(name, Access::Public)
    }

    pub fn private(name: impl Into<String>) -> Self {
        AttrDecl::new(name, Access::Private)
    }

    pub fn readonly(name: impl Into<String>) -> Self {
        AttrDecl::new(name, Access::Readonly)
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    fn getter_name(&self) -> String {
        format!("get-{}", self.name)
    }

    fn setter_name(&self) -> String {
        format!("set-{}", self.name)
    }
}

#[derive(Debug, Clone)]
pub struct MethodDef {
    pub access: Access,
    pub body: Body,
}

impl MethodDef {
    pub fn public(body: Body) -> Self {
        MethodDef { access: Access::Public, body }
    }

    pub fn private(body: Body) -> Self {
        MethodDef { access: Access::Private, body }
    }
}

/// The payload of a `define` message, with bases still referenced by name.
#[derive(Debug, Clone, Default)]
pub struct ClassDef {
    pub name: String,
    pub bases: Vec<String>,
    pub attrs: Vec<AttrDecl>,
    pub constructor: Option<Body>,
    pub methods: Vec<(String, MethodDef)>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>) -> Self {
        ClassDef { name: name.into(), ..ClassDef::default() }
    }

    pub fn base(mut self, name: impl Into<String>) -> Self {
        self.bases.push(name.into());
        self
    }

    pub fn attr(mut self, attr: AttrDecl) -> Self {
        self.attrs.push(attr);
        self
    }

    pub fn constructor(mut self, body: Body) -> Self {
        self.constructor = Some(body);
        self
    }

    pub fn method(mut self, name: impl Into<String>, method: MethodDef) -> Self {
        self.methods.push((name.into(), method));
        self
    }
}

/// Outcome of resolving a message name against a class.
#[derive(Debug, Clone)]
pub enum Resolved {
    Method { access: Access, body: Body },
    Getter { attr: String, access: Access },
    Setter { attr: String, access: Access },
}

impl Resolved {
    pub fn access(&self) -> Access {
        match self {
            Resolved::Method { access, .. }
            | Resolved::Getter { access, .. }
            | Resolved::Setter { access, .. } => *access,
        }
    }
}

/// An immutable class record. Bases are shared with the registry.
#[derive(Debug)]
pub struct Class {
    name: String,
    bases: Vec<Rc<Class>>,
    attrs: Vec<AttrDecl>,
    constructor: Option<Body>,
    methods: HashMap<String, MethodDef>,
}

impl Class {
    pub(crate) fn new(
        name: impl Into<String>,
        bases: Vec<Rc<Class>>,
        attrs: Vec<AttrDecl>,
        constructor: Option<Body>,
        methods: HashMap<String, MethodDef>,
    ) -> Self {
        Class { name: name.into(), bases, attrs, constructor, methods }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bases(&self) -> &[Rc<Class>] {
        &self.bases
    }

    pub fn attrs(&self) -> &[AttrDecl] {
        &self.attrs
    }

    pub fn declares(&self, attr: &str) -> bool {
        self.attrs.iter().any(|a| a.name == attr)
    }

    /// Own constructor, else the first one found depth-first through the bases.
    pub fn resolve_constructor(&self) -> Option<Body> {
        if let Some(body) = &self.constructor {
            return Some(body.clone());
        }
        self.bases.iter().find_map(|base| base.resolve_constructor())
    }

    /// Default attribute values for a fresh instance. Bases are overlaid in
    /// declared order, so a later base overrides an earlier one; own
    /// declarations override every base.
    pub fn default_attributes(&self) -> HashMap<String, Value> {
        let mut attrs = HashMap::new();
        for base in &self.bases {
            attrs.extend(base.default_attributes());
        }
        for attr in &self.attrs {
            attrs.insert(attr.name.clone(), attr.default.clone());
        }
        attrs
    }

    /// Methods across the whole base chain first, then synthesized accessors.
    /// Both walks are depth-first and stop at the first match.
    pub fn resolve_method(&self, name: &str) -> Result<Resolved> {
        self.find_method(name)
            .or_else(|| self.find_accessor(name))
            .ok_or_else(|| DispatchError::MethodNotFound {
                class: self.name.clone(),
                method: name.to_string(),
            })
    }

    fn find_method(&self, name: &str) -> Option<Resolved> {
        if let Some(method) = self.methods.get(name) {
            return Some(Resolved::Method { access: method.access, body: method.body.clone() });
        }
        self.bases.iter().find_map(|base| base.find_method(name))
    }

    fn find_accessor(&self, name: &str) -> Option<Resolved> {
        for attr in &self.attrs {
            if name == attr.getter_name() {
                return Some(Resolved::Getter { attr: attr.name.clone(), access: attr.access.getter() });
            }
            if name == attr.setter_name() {
                return Some(Resolved::Setter { attr: attr.name.clone(), access: attr.access.setter() });
            }
        }
        self.bases.iter().find_map(|base| base.find_accessor(name))
    }
}
