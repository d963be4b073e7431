//! Error types for proxy invocation

/// Result type for proxy and delegate calls
pub type InvokeResult<T> = Result<T, InvokeError>;

/// Errors raised while invoking a method on a proxy or its delegate
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvokeError {
    /// The field a forwarding method targets holds no delegate yet
    #[error("Field '{0}' has no delegate bound")]
    Unbound(String),

    /// No method matches the requested name or signature
    #[error("No such method: {0}")]
    NoSuchMethod(String),

    /// No field with this name exists on the type
    #[error("No such field: {0}")]
    NoSuchField(String),

    /// More than one method matches a by-name lookup
    #[error("Ambiguous method: {0}")]
    Ambiguous(String),

    /// Wrong number of arguments
    #[error("Method '{method}' expects {expected} argument(s), got {got}")]
    Arity {
        /// Method name
        method: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// The method exists but has no body to run
    #[error("Method '{0}' has no implementation")]
    Unimplemented(String),

    /// The delegate itself failed
    #[error("{0}")]
    Delegate(String),
}

impl From<String> for InvokeError {
    fn from(s: String) -> Self {
        InvokeError::Delegate(s)
    }
}

impl From<&str> for InvokeError {
    fn from(s: &str) -> Self {
        InvokeError::Delegate(s.to_string())
    }
}
