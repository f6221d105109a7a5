#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` provides the verbosity system shared by the rfind workspace.
//! Diagnostics are grouped into [`InfoFlag`] and [`DebugFlag`] categories,
//! each carrying an independent level, so `-v` counts and `--debug=walk2`
//! style tokens can raise exactly the output a user asks for.
//!
//! # Design
//!
//! - [`VerbosityConfig`] combines [`InfoLevels`] and [`DebugLevels`] and maps
//!   verbose counts onto per-flag levels.
//! - A thread-local copy of the configuration gates the [`debug_log!`] and
//!   [`info_log!`] macros. Gated events are forwarded to `tracing` and, while
//!   [`set_capture`] is on, buffered as [`DiagnosticEvent`]s for
//!   [`drain_events`].
//! - [`init_tracing`] installs a `tracing-subscriber` formatter on stderr.
//!
//! # Examples
//!
//! ```
//! use logging::{debug_log, drain_events, init, set_capture, VerbosityConfig};
//!
//! let mut config = VerbosityConfig::default();
//! config.debug.walk = 2;
//! init(config);
//! set_capture(true);
//! drain_events();
//!
//! debug_log!(Walk, 1, "entering {}", "src");
//! debug_log!(Walk, 3, "too chatty");
//!
//! let events = drain_events();
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].message(), "entering src");
//! ```

mod config;
mod levels;
mod macros;
mod thread_local;
mod tracing_bridge;

pub use config::VerbosityConfig;
pub use levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};
pub use thread_local::{
    DiagnosticEvent, apply_debug_flag, apply_info_flag, capturing, current, debug_gte,
    drain_events, emit_debug, emit_info, info_gte, init, set_capture,
};
pub use tracing_bridge::{LOG_ENV, default_directive, init_tracing};

#[doc(hidden)]
pub use tracing;
