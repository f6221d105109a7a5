//! Integration tests for the gated logging macros.
//!
//! These tests verify that `debug_log!` and `info_log!` emit or suppress
//! diagnostics according to the thread-local verbosity configuration, the
//! same way `-v` and `--debug=FLAG[N]` are applied by the command line.

use logging::{DebugFlag, DiagnosticEvent, InfoFlag, VerbosityConfig, debug_log, drain_events, info_log, init, set_capture};

/// Verifies debug_log emits when the flag level is sufficient.
#[test]
fn debug_log_emits_when_level_sufficient() {
    let mut config = VerbosityConfig::default();
    config.debug.walk = 2;
    init(config);
    set_capture(true);
    drain_events();

    debug_log!(Walk, 1, "entering {}", "dir");

    let events = drain_events();
    assert_eq!(
        events,
        vec![DiagnosticEvent::Debug {
            flag: DebugFlag::Walk,
            level: 1,
            message: "entering dir".to_string(),
        }]
    );
}

/// Verifies debug_log stays silent when the level is insufficient.
#[test]
fn debug_log_suppresses_when_level_insufficient() {
    let mut config = VerbosityConfig::default();
    config.debug.sort = 1;
    init(config);
    set_capture(true);
    drain_events();

    debug_log!(Sort, 2, "should not appear");

    assert!(drain_events().is_empty());
}

/// Verifies that flags are independent of each other.
#[test]
fn debug_flags_are_independent() {
    let mut config = VerbosityConfig::default();
    config.debug.cycle = 1;
    init(config);
    set_capture(true);
    drain_events();

    debug_log!(Cycle, 1, "cycle check");
    debug_log!(Policy, 1, "policy decision");

    let events = drain_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].message(), "cycle check");
}

/// Verifies the arguments of a suppressed event are never evaluated.
#[test]
fn suppressed_events_do_not_format_arguments() {
    init(VerbosityConfig::default());
    set_capture(true);
    drain_events();

    let mut evaluated = false;
    debug_log!(Stat, 1, "{}", {
        evaluated = true;
        "value"
    });

    assert!(!evaluated);
    assert!(drain_events().is_empty());
}

/// Verifies info_log records the info flag and level.
#[test]
fn info_log_records_flag_and_level() {
    init(VerbosityConfig::from_verbose_level(1));
    set_capture(true);
    drain_events();

    info_log!(Mutate, 1, "renamed {} to {}", "a", "b");
    info_log!(Walk, 1, "hidden at level one");

    let events = drain_events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        DiagnosticEvent::Info {
            flag,
            level,
            message,
        } => {
            assert_eq!(*flag, InfoFlag::Mutate);
            assert_eq!(*level, 1);
            assert_eq!(message, "renamed a to b");
        }
        other => panic!("expected info event, got {other:?}"),
    }
}

/// Verifies gated events are not retained unless capture is enabled.
#[test]
fn gated_events_are_not_retained_without_capture() {
    let mut config = VerbosityConfig::default();
    config.debug.walk = 3;
    init(config);
    set_capture(false);

    for index in 0..500 {
        debug_log!(Walk, 3, "visiting entry {index}");
    }

    set_capture(true);
    assert!(drain_events().is_empty());
    set_capture(false);
}
