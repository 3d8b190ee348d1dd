//! The `define` and `new` control messages understood by the `env` root instance.

use super::{Dispatcher, Kwargs};
use crate::class::{Access, AttrDecl, Body, ClassDef, MethodDef};
use crate::error::{DispatchError, Result};
use crate::value::Value;

pub const ENV_CLASS: &str = "env";

pub(crate) fn env_class() -> ClassDef {
    ClassDef::new(ENV_CLASS)
        .method("define", MethodDef::public(Body::native(define)))
        .method("new", MethodDef::public(Body::native(new)))
}

/// `define{name, bases?, attrs?, constructor?, methods?}`
fn define(d: &mut Dispatcher) -> Result<Value> {
    let name = text(d.arg("name")?, "name")?;
    let mut def = ClassDef::new(name);

    if let Some(bases) = d.optional_arg("bases")? {
        for base in list(bases, "bases")? {
            def = def.base(text(d.unbox(base)?, "bases")?);
        }
    }
    if let Some(attrs) = d.optional_arg("attrs")? {
        for attr in list(attrs, "attrs")? {
            def = def.attr(attr_decl(d, attr)?);
        }
    }
    match d.optional_arg("constructor")? {
        None | Some(Value::Nil) => {}
        Some(Value::Body(body)) => def = def.constructor(body),
        Some(other) => return Err(wrong_type("constructor", "body", &other)),
    }
    if let Some(methods) = d.optional_arg("methods")? {
        let methods = match methods {
            Value::Map(methods) => methods,
            other => return Err(wrong_type("methods", "map", &other)),
        };
        for (method_name, spec) in methods {
            def = def.method(method_name, method_def(d, spec)?);
        }
    }

    d.define(def)?;
    Ok(Value::Nil)
}

/// `new{cls, name, ...constructorArgs}`
fn new(d: &mut Dispatcher) -> Result<Value> {
    let cls = text(d.arg("cls")?, "cls")?;
    let name = text(d.arg("name")?, "name")?;

    let args = d.args()?;
    let mut ctor_args = Kwargs::new();
    for attr in args.class().attrs() {
        if attr.name == "cls" || attr.name == "name" {
            continue;
        }
        let value = d.send(&args, &format!("get-{}", attr.name), Kwargs::new())?;
        ctor_args.insert(attr.name.clone(), value);
    }

    // Bind in the sender's frame, not in the frame of this `new` call.
    let frame = d.store.depth().saturating_sub(2);
    let instance = d.instantiate_in(frame, &cls, &name, ctor_args)?;
    Ok(Value::Object(instance))
}

/// `"name"` or `{name, kind?, default?}`
fn attr_decl(d: &mut Dispatcher, value: Value) -> Result<AttrDecl> {
    match d.unbox(value)? {
        Value::Text(name) => Ok(AttrDecl::public(name)),
        Value::Map(mut fields) => {
            let name = match fields.remove("name") {
                Some(name) => text(d.unbox(name)?, "attrs.name")?,
                None => return Err(DispatchError::bad_argument("attrs", "attribute without a name")),
            };
            let access = match fields.remove("kind") {
                Some(kind) => text(d.unbox(kind)?, "attrs.kind")?.parse::<Access>()?,
                None => Access::Public,
            };
            let default = fields.remove("default").unwrap_or(Value::Nil);
            Ok(AttrDecl::new(name, access).with_default(default))
        }
        other => Err(wrong_type("attrs", "str or map", &other)),
    }
}

/// A bare body (public) or `{kind?, body}`
fn method_def(d: &mut Dispatcher, value: Value) -> Result<MethodDef> {
    match value {
        Value::Body(body) => Ok(MethodDef::public(body)),
        Value::Map(mut fields) => {
            let access = match fields.remove("kind") {
                Some(kind) => text(d.unbox(kind)?, "methods.kind")?.parse::<Access>()?,
                None => Access::Public,
            };
            match fields.remove("body") {
                Some(Value::Body(body)) => Ok(MethodDef { access, body }),
                Some(other) => Err(wrong_type("methods.body", "body", &other)),
                None => Err(DispatchError::bad_argument("methods", "method without a body")),
            }
        }
        other => Err(wrong_type("methods", "body or map", &other)),
    }
}

fn text(value: Value, name: &str) -> Result<String> {
    match value {
        Value::Text(s) => Ok(s),
        other => Err(wrong_type(name, "str", &other)),
    }
}

fn list(value: Value, name: &str) -> Result<Vec<Value>> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(wrong_type(name, "list", &other)),
    }
}

fn wrong_type(name: &str, expected: &str, found: &Value) -> DispatchError {
    DispatchError::bad_argument(name, format!("expected {}, got {}", expected, found.type_name()))
}
