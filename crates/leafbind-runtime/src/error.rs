//! Runtime error types.

/// Errors raised while loading runtime options.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Failed to read a configuration file
    #[error("Failed to read runtime options: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse runtime options: {0}")]
    Parse(#[from] toml::de::Error),

    /// Option value out of range
    #[error("Invalid runtime options: {0}")]
    Validation(String),
}

/// Script-visible exception produced by a failed native call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ScriptError {
    /// Message reported by the failing handler or by the runtime
    pub message: String,
}

impl ScriptError {
    /// Create an exception carrying `message`
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_error_display() {
        let err = ScriptError::new("Invalid arguments to f: boom");
        assert_eq!(err.to_string(), "Invalid arguments to f: boom");
    }
}
