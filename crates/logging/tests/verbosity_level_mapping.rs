//! Mapping of `-v` counts and flag tokens onto per-flag levels.

use logging::{DebugFlag, InfoFlag, VerbosityConfig, default_directive};

#[test]
fn single_verbose_reports_skips_and_mutations() {
    let config = VerbosityConfig::from_verbose_level(1);
    assert_eq!(config.info.get(InfoFlag::Skip), 1);
    assert_eq!(config.info.get(InfoFlag::Mutate), 1);
    assert_eq!(config.info.get(InfoFlag::Stats), 0);
    assert_eq!(config.debug.get(DebugFlag::Walk), 0);
}

#[test]
fn double_verbose_adds_statistics_and_walk_debugging() {
    let config = VerbosityConfig::from_verbose_level(2);
    assert_eq!(config.info.get(InfoFlag::Stats), 1);
    assert_eq!(config.info.get(InfoFlag::Walk), 2);
    assert_eq!(config.debug.get(DebugFlag::Walk), 1);
    assert_eq!(config.debug.get(DebugFlag::Cycle), 1);
    assert_eq!(config.debug.get(DebugFlag::Content), 0);
}

#[test]
fn high_verbose_counts_saturate() {
    let four = VerbosityConfig::from_verbose_level(4);
    let many = VerbosityConfig::from_verbose_level(u8::MAX);
    assert_eq!(four.debug.get(DebugFlag::Sort), 3);
    assert_eq!(many.debug.get(DebugFlag::Sort), 3);
    assert_eq!(many.info.get(InfoFlag::Walk), 2);
}

#[test]
fn tokens_refine_a_verbose_level() {
    let mut config = VerbosityConfig::from_verbose_level(1);
    config.apply_debug_flag("content2").unwrap();
    config.apply_info_flag("skip0").unwrap();
    assert_eq!(config.debug.get(DebugFlag::Content), 2);
    assert_eq!(config.info.get(InfoFlag::Skip), 0);
    assert_eq!(config.info.get(InfoFlag::Mutate), 1);
}

#[test]
fn directive_follows_the_loudest_flag() {
    assert_eq!(default_directive(&VerbosityConfig::from_verbose_level(0)), "rfind=warn");
    assert_eq!(default_directive(&VerbosityConfig::from_verbose_level(1)), "rfind=info");
    assert_eq!(default_directive(&VerbosityConfig::from_verbose_level(2)), "rfind=debug");
}
