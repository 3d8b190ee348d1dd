//! Errors raised while defining classes and dispatching messages.

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, DispatchError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    #[error("class not found: {name}")]
    ClassNotFound { name: String },
    #[error("class already defined: {name}")]
    ClassAlreadyDefined { name: String },
    #[error("method not found: '{method}' on class {class}")]
    MethodNotFound { class: String, method: String },
    #[error("access denied: '{method}' is private to class {class}")]
    MethodAccessDenied { class: String, method: String },
    #[error("{name} is not defined")]
    NotDefined { name: String },
    #[error("bad argument '{name}': {reason}")]
    BadArgument { name: String, reason: String },
}

impl DispatchError {
    pub(crate) fn bad_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        DispatchError::BadArgument { name: name.into(), reason: reason.into() }
    }

    /// The variant name, as used by `expect_error` steps in message scripts.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::ClassNotFound { .. } => "ClassNotFound",
            DispatchError::ClassAlreadyDefined { .. } => "ClassAlreadyDefined",
            DispatchError::MethodNotFound { .. } => "MethodNotFound",
            DispatchError::MethodAccessDenied { .. } => "MethodAccessDenied",
            DispatchError::NotDefined { .. } => "NotDefined",
            DispatchError::BadArgument { .. } => "BadArgument",
        }
    }

    /// Stable diagnostic code, see `diagnostic::registry`.
    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::ClassNotFound { .. } => "OOS-C001",
            DispatchError::ClassAlreadyDefined { .. } => "OOS-C002",
            DispatchError::MethodNotFound { .. } => "OOS-M001",
            DispatchError::MethodAccessDenied { .. } => "OOS-M002",
            DispatchError::NotDefined { .. } => "OOS-S001",
            DispatchError::BadArgument { .. } => "OOS-A001",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_missing_piece() {
        let e = DispatchError::MethodNotFound { class: "bank".into(), method: "fly".into() };
        assert_eq!(e.to_string(), "method not found: 'fly' on class bank");
        let e = DispatchError::NotDefined { name: "my-account".into() };
        assert_eq!(e.to_string(), "my-account is not defined");
    }

    #[test]
    fn kinds_and_codes_are_distinct() {
        let all = [
            DispatchError::ClassNotFound { name: "a".into() },
            DispatchError::ClassAlreadyDefined { name: "a".into() },
            DispatchError::MethodNotFound { class: "a".into(), method: "b".into() },
            DispatchError::MethodAccessDenied { class: "a".into(), method: "b".into() },
            DispatchError::NotDefined { name: "a".into() },
            DispatchError::bad_argument("a", "b"),
        ];
        let mut kinds: Vec<_> = all.iter().map(|e| e.kind()).collect();
        let mut codes: Vec<_> = all.iter().map(|e| e.code()).collect();
        kinds.sort_unstable();
        kinds.dedup();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(kinds.len(), all.len());
        assert_eq!(codes.len(), all.len());
    }
}
