//! JSON message scripts: a driver format for bootstrapping classes and
//! instances and sending messages, plus the expression bodies used by
//! script-defined methods.

use std::collections::BTreeMap;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::class::{Access, Body};
use crate::dispatch::{Dispatcher, Kwargs, Receiver, ENV};
use crate::error::{DispatchError, Result};
use crate::value::Value;

/// One expression of a method or constructor body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// A JSON literal.
    Lit(serde_json::Value),
    /// An instance bound in the current scopes.
    Ref(String),
    Send(Box<SendExpr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendExpr {
    pub to: Target,
    pub message: String,
    #[serde(default)]
    pub args: BTreeMap<String, Expr>,
}

/// Receiver of a send: an instance name or the value of another expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Name(String),
    Expr(Expr),
}

/// Run a body; its value is the value of the last expression.
pub fn eval_body(d: &mut Dispatcher, body: &[Expr]) -> Result<Value> {
    let mut last = Value::Nil;
    for expr in body {
        last = eval(d, expr)?;
    }
    Ok(last)
}

pub fn eval(d: &mut Dispatcher, expr: &Expr) -> Result<Value> {
    match expr {
        Expr::Lit(json) => Ok(Value::from_json(json)),
        Expr::Ref(name) => d.lookup(name).map(Value::Object),
        Expr::Send(send) => eval_send(d, send),
    }
}

/// The receiver expression is evaluated before the arguments.
fn eval_send(d: &mut Dispatcher, send: &SendExpr) -> Result<Value> {
    let receiver = match &send.to {
        Target::Name(name) => Receiver::Name(name.clone()),
        Target::Expr(expr) => Receiver::Value(eval(d, expr)?),
    };
    let args = eval_args(d, &send.args)?;
    d.send(receiver, &send.message, args)
}

fn eval_args(d: &mut Dispatcher, args: &BTreeMap<String, Expr>) -> Result<Kwargs> {
    let mut kwargs = Kwargs::new();
    for (name, expr) in args {
        kwargs.insert(name.clone(), eval(d, expr)?);
    }
    Ok(kwargs)
}

// ---- Script documents ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Define(DefineStep),
    New(NewStep),
    Send(SendStep),
    ExpectError(ExpectErrorStep),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefineStep {
    pub name: String,
    #[serde(default)]
    pub bases: Vec<String>,
    #[serde(default)]
    pub attrs: Vec<AttrSpec>,
    #[serde(default)]
    pub constructor: Option<Vec<Expr>>,
    #[serde(default)]
    pub methods: BTreeMap<String, MethodSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrSpec {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        kind: Access,
        #[serde(default)]
        default: serde_json::Value,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodSpec {
    #[serde(default)]
    pub kind: Access,
    pub body: Vec<Expr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStep {
    pub cls: String,
    pub name: String,
    #[serde(default)]
    pub args: BTreeMap<String, Expr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendStep {
    #[serde(flatten)]
    pub send: SendExpr,
    /// Print the unboxed result.
    #[serde(default)]
    pub print: bool,
    /// Literal the unboxed result must equal.
    #[serde(default)]
    pub expect: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectErrorStep {
    pub send: SendExpr,
    pub kind: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("cannot read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid script: {0}")]
    Json(#[from] serde_json::Error),
    #[error("step {step}: {source}")]
    Dispatch {
        step: usize,
        #[source]
        source: DispatchError,
    },
    #[error("step {step}: expected {expected}, got {found}")]
    Expectation { step: usize, expected: String, found: String },
    #[error("step {step}: expected {kind} but the send succeeded")]
    MissingError { step: usize, kind: String },
    #[error("step {step}: expected {expected} but got {found}")]
    WrongError {
        step: usize,
        expected: String,
        #[source]
        found: DispatchError,
    },
}

impl ScriptError {
    pub fn code(&self) -> &'static str {
        match self {
            ScriptError::Io(_) => "OOS-X001",
            ScriptError::Json(_) => "OOS-X002",
            ScriptError::Dispatch { source, .. } => source.code(),
            ScriptError::Expectation { .. } => "OOS-X003",
            ScriptError::MissingError { .. } | ScriptError::WrongError { .. } => "OOS-X004",
        }
    }
}

impl Script {
    pub fn from_json(src: &str) -> std::result::Result<Script, ScriptError> {
        Ok(serde_json::from_str(src)?)
    }

    pub fn load(path: &std::path::Path) -> std::result::Result<Script, ScriptError> {
        let src = std::fs::read_to_string(path)?;
        Script::from_json(&src)
    }

    /// Run every step in order, writing printed results to `out`. Steps are
    /// numbered from 1 in errors.
    pub fn run(
        &self,
        d: &mut Dispatcher,
        out: &mut impl Write,
    ) -> std::result::Result<(), ScriptError> {
        for (i, step) in self.steps.iter().enumerate() {
            let step_no = i + 1;
            tracing::debug!(step = step_no, "running step");
            let dispatch = |source| ScriptError::Dispatch { step: step_no, source };
            match step {
                Step::Define(def) => {
                    let args = def.to_kwargs();
                    d.send(ENV, "define", args).map_err(dispatch)?;
                }
                Step::New(new) => {
                    let mut args = eval_args(d, &new.args).map_err(dispatch)?;
                    args.insert("cls", new.cls.as_str());
                    args.insert("name", new.name.as_str());
                    d.send(ENV, "new", args).map_err(dispatch)?;
                }
                Step::Send(send) => {
                    let result = eval_send(d, &send.send).map_err(dispatch)?;
                    let result = d.unbox(result).map_err(dispatch)?;
                    if send.print {
                        writeln!(out, "{}", result)?;
                    }
                    if let Some(expected) = &send.expect {
                        let expected = Value::from_json(expected);
                        if expected != result {
                            return Err(ScriptError::Expectation {
                                step: step_no,
                                expected: expected.to_string(),
                                found: result.to_string(),
                            });
                        }
                    }
                }
                Step::ExpectError(expect) => {
                    match eval_send(d, &expect.send) {
                        Ok(_) => {
                            let kind = expect.kind.clone();
                            return Err(ScriptError::MissingError { step: step_no, kind });
                        }
                        Err(err) if err.kind() == expect.kind => {
                            tracing::debug!(step = step_no, kind = err.kind(), "expected error raised");
                        }
                        Err(err) => {
                            return Err(ScriptError::WrongError {
                                step: step_no,
                                expected: expect.kind.clone(),
                                found: err,
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl DefineStep {
    /// Arguments of the `define` control message.
    fn to_kwargs(&self) -> Kwargs {
        let bases = self.bases.iter().map(|b| Value::Text(b.clone())).collect::<Vec<_>>();
        let attrs = self.attrs.iter().map(AttrSpec::to_value).collect::<Vec<_>>();
        let methods = self.methods.iter()
            .map(|(name, spec)| {
                let mut fields = BTreeMap::new();
                fields.insert("kind".to_string(), Value::Text(spec.kind.to_string()));
                fields.insert("body".to_string(), Value::Body(Body::script(spec.body.clone())));
                (name.clone(), Value::Map(fields))
            })
            .collect::<BTreeMap<_, _>>();

        let mut args = Kwargs::new()
            .with("name", self.name.as_str())
            .with("bases", bases)
            .with("attrs", attrs)
            .with("methods", Value::Map(methods));
        if let Some(ctor) = &self.constructor {
            args.insert("constructor", Body::script(ctor.clone()));
        }
        args
    }
}

impl AttrSpec {
    fn to_value(&self) -> Value {
        match self {
            AttrSpec::Name(name) => Value::Text(name.clone()),
            AttrSpec::Full { name, kind, default } => {
                let mut fields = BTreeMap::new();
                fields.insert("name".to_string(), Value::Text(name.clone()));
                fields.insert("kind".to_string(), Value::Text(kind.to_string()));
                fields.insert("default".to_string(), Value::from_json(default));
                Value::Map(fields)
            }
        }
    }
}
