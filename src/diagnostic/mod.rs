pub mod ansi;
pub mod json;
pub mod registry;

use crate::error::DispatchError;
use crate::script::ScriptError;

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: Option<&'static str>,
    pub message: String,
    /// Script step the problem was raised in, numbered from 1.
    pub step: Option<usize>,
    pub notes: Vec<String>,
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            code: None,
            message: message.into(),
            step: None,
            notes: Vec::new(),
            suggestion: None,
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn at_step(mut self, step: usize) -> Self {
        self.step = Some(step);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

// ---- From impls for runtime error types ----

impl From<&DispatchError> for Diagnostic {
    fn from(e: &DispatchError) -> Self {
        let d = Diagnostic::error(e.to_string()).with_code(e.code());
        match e {
            DispatchError::ClassNotFound { name } => {
                d.with_suggestion(format!("define '{name}' before using it as a base or instantiating it"))
            }
            DispatchError::ClassAlreadyDefined { .. } => {
                d.with_note("class names are global and a class cannot be redefined")
            }
            DispatchError::MethodNotFound { method, .. } => {
                let attr = method.strip_prefix("get-").or_else(|| method.strip_prefix("set-"));
                match attr {
                    Some(attr) => {
                        d.with_note(format!("no class in the chain declares an attribute '{attr}'"))
                    }
                    None => d,
                }
            }
            DispatchError::MethodAccessDenied { .. } => {
                d.with_note("private members answer only messages a method sends to its own instance")
            }
            DispatchError::NotDefined { .. } => {
                d.with_note("instances created inside a method disappear when the method returns")
            }
            DispatchError::BadArgument { .. } => d,
        }
    }
}

impl From<&ScriptError> for Diagnostic {
    fn from(e: &ScriptError) -> Self {
        match e {
            ScriptError::Dispatch { step, source } => Diagnostic::from(source).at_step(*step),
            ScriptError::WrongError { step, found, .. } => Diagnostic::error(e.to_string())
                .with_code(e.code())
                .at_step(*step)
                .with_note(format!("raised {} ({})", found.kind(), found.code())),
            ScriptError::Expectation { step, .. } | ScriptError::MissingError { step, .. } => {
                Diagnostic::error(e.to_string()).with_code(e.code()).at_step(*step)
            }
            ScriptError::Io(_) | ScriptError::Json(_) => {
                Diagnostic::error(e.to_string()).with_code(e.code())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_error_builder() {
        let d = Diagnostic::error("something went wrong");
        assert_eq!(d.message, "something went wrong");
        assert!(d.code.is_none());
        assert!(d.step.is_none());
        assert!(d.notes.is_empty());
        assert!(d.suggestion.is_none());
    }

    #[test]
    fn diagnostic_with_note_and_suggestion() {
        let d = Diagnostic::error("access denied")
            .with_note("in class 'bank'")
            .with_suggestion("call it from a bank method");
        assert_eq!(d.notes, vec!["in class 'bank'"]);
        assert_eq!(d.suggestion.as_deref(), Some("call it from a bank method"));
    }

    #[test]
    fn from_dispatch_error_carries_code() {
        let e = DispatchError::ClassNotFound { name: "bank".into() };
        let d = Diagnostic::from(&e);
        assert_eq!(d.code, Some("OOS-C001"));
        assert!(d.message.contains("bank"));
        assert!(d.suggestion.is_some());
    }

    #[test]
    fn accessor_miss_names_attribute() {
        let e = DispatchError::MethodNotFound { class: "bank".into(), method: "get-euros".into() };
        let d = Diagnostic::from(&e);
        assert!(d.notes.iter().any(|n| n.contains("'euros'")));
        let e = DispatchError::MethodNotFound { class: "bank".into(), method: "fly".into() };
        assert!(Diagnostic::from(&e).notes.is_empty());
    }

    #[test]
    fn from_script_error_keeps_step() {
        let e = ScriptError::Dispatch {
            step: 4,
            source: DispatchError::NotDefined { name: "ghost".into() },
        };
        let d = Diagnostic::from(&e);
        assert_eq!(d.step, Some(4));
        assert_eq!(d.code, Some("OOS-S001"));
        assert_eq!(d.message, "ghost is not defined");
    }

    #[test]
    fn wrong_error_mentions_what_was_raised() {
        let e = ScriptError::WrongError {
            step: 2,
            expected: "MethodNotFound".into(),
            found: DispatchError::NotDefined { name: "x".into() },
        };
        let d = Diagnostic::from(&e);
        assert_eq!(d.code, Some("OOS-X004"));
        assert!(d.notes[0].contains("NotDefined"));
    }

    #[test]
    fn every_emitted_code_is_registered() {
        let errors = [
            DispatchError::ClassNotFound { name: "a".into() },
            DispatchError::ClassAlreadyDefined { name: "a".into() },
            DispatchError::MethodNotFound { class: "a".into(), method: "b".into() },
            DispatchError::MethodAccessDenied { class: "a".into(), method: "b".into() },
            DispatchError::NotDefined { name: "a".into() },
            DispatchError::bad_argument("a", "b"),
        ];
        for e in &errors {
            assert!(registry::lookup(e.code()).is_some(), "{} not registered", e.code());
        }
        for code in ["OOS-X001", "OOS-X002", "OOS-X003", "OOS-X004"] {
            assert!(registry::lookup(code).is_some(), "{code} not registered");
        }
    }
}
