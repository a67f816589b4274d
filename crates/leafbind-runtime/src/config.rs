//! Runtime options (leafbind.toml)
//!
//! ```toml
//! gc_threshold = 512
//! max_call_depth = 64
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::defaults::{DEFAULT_GC_THRESHOLD, DEFAULT_MAX_CALL_DEPTH};
use crate::error::RuntimeError;

/// Tunables for a [`Runtime`](crate::Runtime)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RuntimeOptions {
    /// Allocations between automatic collections
    #[serde(default = "default_gc_threshold")]
    pub gc_threshold: usize,

    /// Maximum nesting of native calls
    #[serde(default = "default_max_call_depth")]
    pub max_call_depth: usize,
}

fn default_gc_threshold() -> usize {
    DEFAULT_GC_THRESHOLD
}

fn default_max_call_depth() -> usize {
    DEFAULT_MAX_CALL_DEPTH
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            gc_threshold: DEFAULT_GC_THRESHOLD,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl RuntimeOptions {
    /// Load options from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, RuntimeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse options from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, RuntimeError> {
        let options: RuntimeOptions = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject values the runtime cannot work with
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.gc_threshold == 0 {
            return Err(RuntimeError::Validation(
                "gc_threshold must be at least 1".to_string(),
            ));
        }
        if self.max_call_depth == 0 {
            return Err(RuntimeError::Validation(
                "max_call_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Set the collection threshold
    pub fn with_gc_threshold(mut self, allocations: usize) -> Self {
        self.gc_threshold = allocations;
        self
    }

    /// Set the native call depth limit
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RuntimeOptions::default();
        assert_eq!(options.gc_threshold, 1024);
        assert_eq!(options.max_call_depth, 256);
    }

    #[test]
    fn test_parse_partial() {
        let options = RuntimeOptions::from_str("gc_threshold = 16").unwrap();
        assert_eq!(options.gc_threshold, 16);
        assert_eq!(options.max_call_depth, DEFAULT_MAX_CALL_DEPTH);
    }

    #[test]
    fn test_parse_empty() {
        let options = RuntimeOptions::from_str("").unwrap();
        assert_eq!(options, RuntimeOptions::default());
    }

    #[test]
    fn test_validate_rejects_zero() {
        let result = RuntimeOptions::from_str("gc_threshold = 0");
        assert!(matches!(result, Err(RuntimeError::Validation(_))));

        let result = RuntimeOptions::from_str("max_call_depth = 0");
        assert!(matches!(result, Err(RuntimeError::Validation(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_field() {
        let result = RuntimeOptions::from_str("heap_size = 10");
        assert!(matches!(result, Err(RuntimeError::Parse(_))));

        // Teardown always finalizes; there is no switch for it
        let result = RuntimeOptions::from_str("collect_on_drop = false");
        assert!(matches!(result, Err(RuntimeError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_wrong_type() {
        let result = RuntimeOptions::from_str("gc_threshold = \"many\"");
        assert!(matches!(result, Err(RuntimeError::Parse(_))));
    }
}
