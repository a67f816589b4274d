//! Diagnostic logging shim
//!
//! `debug_log!` forwards to `tracing::debug!` in debug builds. In release
//! builds the arguments are still type-checked but never formatted.
//! `trace_call!` is compiled in only with the `log-calls` feature.

/// Debug-build diagnostic message
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)+) => {
        $crate::__private::tracing::debug!(target: "leafbind", $($arg)+)
    };
}

/// Debug-build diagnostic message
#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)+) => {{
        if false {
            let _ = ::core::format_args!($($arg)+);
        }
    }};
}

/// Per-call trace event
#[cfg(feature = "log-calls")]
#[macro_export]
macro_rules! trace_call {
    ($($arg:tt)+) => {
        $crate::__private::tracing::trace!(target: "leafbind::calls", $($arg)+)
    };
}

/// Per-call trace event
#[cfg(not(feature = "log-calls"))]
#[macro_export]
macro_rules! trace_call {
    ($($arg:tt)+) => {{
        if false {
            let _ = ::core::format_args!($($arg)+);
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_accept_format_arguments() {
        let name = "vibrate";
        crate::debug_log!("plain message");
        crate::debug_log!("calling {} with {} args", name, 2);
        crate::trace_call!("{}({} args)", name, 0);
    }
}
