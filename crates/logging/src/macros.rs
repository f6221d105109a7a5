//! crates/logging/src/macros.rs
//! Gated logging macros.
//!
//! Both macros consult the thread-local verbosity gate first, so disabled
//! categories never format their arguments. Events that pass the gate are
//! forwarded to `tracing` under the `rfind` target with the flag as a field,
//! and buffered as [`DiagnosticEvent`](crate::DiagnosticEvent)s while capture
//! is enabled.

/// Emit a debug diagnostic for `DebugFlag::$flag` at `$level`.
///
/// # Example
/// ```ignore
/// debug_log!(Walk, 2, "entering directory: {:?}", path);
/// ```
#[macro_export]
macro_rules! debug_log {
    ($flag:ident, $level:expr, $($arg:tt)*) => {{
        let level: u8 = $level;
        if $crate::debug_gte($crate::DebugFlag::$flag, level) {
            let message = ::std::format!($($arg)*);
            $crate::tracing::debug!(
                target: "rfind",
                flag = $crate::DebugFlag::$flag.name(),
                verbosity = level,
                "{}",
                message
            );
            $crate::emit_debug($crate::DebugFlag::$flag, level, message);
        }
    }};
}

/// Emit an info diagnostic for `InfoFlag::$flag` at `$level`.
///
/// # Example
/// ```ignore
/// info_log!(Stats, 1, "visited {} entries", count);
/// ```
#[macro_export]
macro_rules! info_log {
    ($flag:ident, $level:expr, $($arg:tt)*) => {{
        let level: u8 = $level;
        if $crate::info_gte($crate::InfoFlag::$flag, level) {
            let message = ::std::format!($($arg)*);
            $crate::tracing::info!(
                target: "rfind",
                flag = $crate::InfoFlag::$flag.name(),
                verbosity = level,
                "{}",
                message
            );
            $crate::emit_info($crate::InfoFlag::$flag, level, message);
        }
    }};
}
