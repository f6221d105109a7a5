//! crates/logging/src/tracing_bridge.rs
//! Installs the `tracing` subscriber that renders gated diagnostics.
//!
//! The verbosity gate decides which events are produced at all; the
//! subscriber only decides where they go. Diagnostics are written to stderr
//! so they never interleave with records printed on stdout.

use super::config::VerbosityConfig;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the derived filter directive.
pub const LOG_ENV: &str = "RFIND_LOG";

/// Returns the filter directive matching the most verbose raised flag.
pub fn default_directive(config: &VerbosityConfig) -> &'static str {
    let debug = &config.debug;
    let any_debug = debug.walk > 0
        || debug.sort > 0
        || debug.stat > 0
        || debug.cycle > 0
        || debug.policy > 0
        || debug.content > 0;

    if any_debug {
        "rfind=debug"
    } else if config.is_silent() {
        "rfind=warn"
    } else {
        "rfind=info"
    }
}

/// Initialize the thread-local gate and the global stderr subscriber.
///
/// Returns `false` when a global subscriber was already installed, in which
/// case only the thread-local gate is updated.
pub fn init_tracing(config: VerbosityConfig) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&config)));

    super::thread_local::init(config);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init()
        .is_ok()
}
