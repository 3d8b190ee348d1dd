//! Primitive classes. Raw values are boxed into instances of these so they can
//! receive messages. Arithmetic always returns a new box.

use crate::class::{AttrDecl, Body, ClassDef, MethodDef};
use crate::dispatch::{Dispatcher, Kwargs};
use crate::error::{DispatchError, Result};
use crate::instance::ObjRef;
use crate::value::Value;

pub const INT: &str = "int";
pub const FLOAT: &str = "float";
pub const STR: &str = "str";
pub const BOOL: &str = "bool";

/// Attribute holding the raw value inside every box.
pub const VALUE: &str = "value";

#[derive(Debug, Clone, Copy)]
enum Op {
    Add,
    Sub,
    Multiply,
    Max,
}

impl Op {
    fn name(self) -> &'static str {
        match self {
            Op::Add => "add",
            Op::Sub => "sub",
            Op::Multiply => "multiply",
            Op::Max => "max",
        }
    }
}

const ARITHMETIC: [Op; 4] = [Op::Add, Op::Sub, Op::Multiply, Op::Max];

pub(crate) fn definitions() -> Vec<ClassDef> {
    let mut int = ClassDef::new(INT)
        .attr(AttrDecl::public(VALUE).with_default(0))
        .method("set-value", MethodDef::public(Body::native(|d| set_value(d, INT))));
    let mut float = ClassDef::new(FLOAT)
        .attr(AttrDecl::public(VALUE).with_default(0.0))
        .method("set-value", MethodDef::public(Body::native(|d| set_value(d, FLOAT))));
    for op in ARITHMETIC {
        int = int.method(op.name(), MethodDef::public(Body::native(move |d| arithmetic(d, op))));
        float = float.method(op.name(), MethodDef::public(Body::native(move |d| arithmetic(d, op))));
    }

    let text = ClassDef::new(STR)
        .attr(AttrDecl::public(VALUE).with_default(""))
        .method("set-value", MethodDef::public(Body::native(|d| set_value(d, STR))))
        .method("concat", MethodDef::public(Body::native(concat)))
        .method("length", MethodDef::public(Body::native(length)));

    let boolean = ClassDef::new(BOOL)
        .attr(AttrDecl::public(VALUE).with_default(false))
        .method("set-value", MethodDef::public(Body::native(|d| set_value(d, BOOL))))
        .method("not", MethodDef::public(Body::native(not)));

    vec![int, float, text, boolean]
}

/// Whether `obj` is a box of one of the primitive classes.
pub fn is_box(obj: &ObjRef) -> bool {
    matches!(obj.class().name(), INT | FLOAT | STR | BOOL)
}

/// Raw value stored in the box bound to `this`.
fn own_value(d: &mut Dispatcher) -> Result<Value> {
    let value = d.send("this", "get-value", Kwargs::new())?;
    d.unbox(value)
}

/// Stores the raw value, so boxes never nest.
fn set_value(d: &mut Dispatcher, class: &str) -> Result<Value> {
    let value = match (class, d.arg(VALUE)?) {
        (INT, v @ Value::Int(_)) => v,
        (FLOAT, Value::Int(n)) => Value::Float(n as f64),
        (FLOAT, v @ Value::Float(_)) => v,
        (STR, v @ Value::Text(_)) => v,
        (BOOL, v @ Value::Bool(_)) => v,
        (_, other) => {
            return Err(DispatchError::bad_argument(
                VALUE,
                format!("cannot store {} in {}", other.type_name(), class),
            ));
        }
    };
    d.this()?.store_attribute(VALUE, value);
    Ok(Value::Nil)
}

fn arithmetic(d: &mut Dispatcher, op: Op) -> Result<Value> {
    let lhs = own_value(d)?;
    let rhs = d.arg("other")?;
    let result = match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Value::Int(int_op(op, a, b)?),
        (Value::Int(a), Value::Float(b)) => Value::Float(float_op(op, a as f64, b)),
        (Value::Float(a), Value::Int(b)) => Value::Float(float_op(op, a, b as f64)),
        (Value::Float(a), Value::Float(b)) => Value::Float(float_op(op, a, b)),
        (a, b) => {
            return Err(DispatchError::bad_argument(
                "other",
                format!("cannot {} {} and {}", op.name(), a.type_name(), b.type_name()),
            ));
        }
    };
    d.boxed(result)
}

fn int_op(op: Op, a: i64, b: i64) -> Result<i64> {
    let result = match op {
        Op::Add => a.checked_add(b),
        Op::Sub => a.checked_sub(b),
        Op::Multiply => a.checked_mul(b),
        Op::Max => Some(a.max(b)),
    };
    result.ok_or_else(|| {
        DispatchError::bad_argument("other", format!("integer overflow in {}", op.name()))
    })
}

fn float_op(op: Op, a: f64, b: f64) -> f64 {
    match op {
        Op::Add => a + b,
        Op::Sub => a - b,
        Op::Multiply => a * b,
        Op::Max => a.max(b),
    }
}

fn concat(d: &mut Dispatcher) -> Result<Value> {
    let lhs = own_value(d)?;
    let rhs = d.arg("other")?;
    match (lhs, rhs) {
        (Value::Text(mut a), Value::Text(b)) => {
            a.push_str(&b);
            d.boxed(Value::Text(a))
        }
        (a, b) => Err(DispatchError::bad_argument(
            "other",
            format!("cannot concat {} and {}", a.type_name(), b.type_name()),
        )),
    }
}

fn length(d: &mut Dispatcher) -> Result<Value> {
    match own_value(d)? {
        Value::Text(s) => d.boxed(Value::Int(s.chars().count() as i64)),
        other => Err(DispatchError::bad_argument(
            "this",
            format!("expected str, got {}", other.type_name()),
        )),
    }
}

fn not(d: &mut Dispatcher) -> Result<Value> {
    match own_value(d)? {
        Value::Bool(b) => d.boxed(Value::Bool(!b)),
        other => Err(DispatchError::bad_argument(
            "this",
            format!("expected bool, got {}", other.type_name()),
        )),
    }
}
