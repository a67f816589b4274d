//! Error types for the binding layer

/// Result type for binding operations
pub type BindResult<T> = Result<T, BindingError>;

/// Everything that can go wrong at the call boundary or while wiring tables.
///
/// `Arity`, `Coercion` and `Lifecycle` are call-time failures and abort the
/// current invocation. The setup variants surface while building member
/// tables or registering classes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindingError {
    /// Fewer arguments than the handler's declared minimum
    #[error("expected at least {expected} argument(s), got {got}")]
    Arity {
        /// Declared minimum
        expected: usize,
        /// Supplied count
        got: usize,
    },

    /// A supplied value could not be converted to the declared kind
    #[error("argument {index}: expected {expected}, got {got}")]
    Coercion {
        /// Zero-based argument position
        index: usize,
        /// Kind the handler asked for
        expected: &'static str,
        /// Runtime type name of the supplied value
        got: String,
    },

    /// Instance payload missing, already set, or already finalized
    #[error("lifecycle misuse: {0}")]
    Lifecycle(String),

    /// Two members with the same name in one table
    #[error("duplicate member: {0}")]
    DuplicateMember(String),

    /// Signature declares an optional argument before a required one
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Class registered twice on the same runtime
    #[error("class already registered: {0}")]
    ClassExists(String),

    /// Write to a read-only property
    #[error("property is read-only: {0}")]
    ReadOnly(String),

    /// Delete of a permanent property
    #[error("property is permanent: {0}")]
    Permanent(String),

    /// Failure reported by the host runtime
    #[error("{0}")]
    Runtime(String),

    /// Handler panicked
    #[error("handler panicked: {0}")]
    Panic(String),
}

impl BindingError {
    /// Build a coercion error for the value at `index`
    pub fn coercion(index: usize, expected: &'static str, got: impl Into<String>) -> Self {
        BindingError::Coercion {
            index,
            expected,
            got: got.into(),
        }
    }

    /// Build a lifecycle error
    pub fn lifecycle(msg: impl Into<String>) -> Self {
        BindingError::Lifecycle(msg.into())
    }

    /// True for the three call-time kinds
    pub fn is_call_error(&self) -> bool {
        matches!(
            self,
            BindingError::Arity { .. } | BindingError::Coercion { .. } | BindingError::Lifecycle(_)
        )
    }
}

impl From<String> for BindingError {
    fn from(s: String) -> Self {
        BindingError::Runtime(s)
    }
}

impl From<&str> for BindingError {
    fn from(s: &str) -> Self {
        BindingError::Runtime(s.to_string())
    }
}
