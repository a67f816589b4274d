//! Default constants for runtime configuration.

/// Allocations between automatic collections.
pub const DEFAULT_GC_THRESHOLD: usize = 1024;

/// Maximum nesting of native calls before the runtime refuses a call.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;
