use std::ffi::OsString;

use clap::error::ErrorKind;
use walk::Separator;

use super::*;

#[test]
fn defaults_walk_the_current_directory_by_name() {
    let args = parse_args(["rfind"]).expect("parse");
    assert_eq!(args, ParsedArgs::default());
    assert_eq!(args.sort, SortChoice::Name);
    assert_eq!(args.on_error, OnError::Fail);
    assert!(args.roots.is_empty());
}

#[test]
fn empty_argument_list_is_accepted() {
    let args = parse_args(Vec::<OsString>::new()).expect("parse");
    assert!(!args.show_help);
}

#[test]
fn collects_roots_in_order() {
    let args = parse_args(["rfind", "src", "tests"]).expect("parse");
    assert_eq!(args.roots, vec![OsString::from("src"), OsString::from("tests")]);
}

#[test]
fn parses_traversal_options() {
    let args = parse_args(["rfind", "-m", "2", "-d", "-L", "-s", "size", "-r", "-D"])
        .expect("parse");
    assert_eq!(args.max_depth, Some(2));
    assert!(args.depth_first);
    assert!(args.follow);
    assert_eq!(args.sort, SortChoice::Size);
    assert!(args.reverse);
    assert!(args.dirs_first);
}

#[test]
fn maps_every_sort_key() {
    for (value, expected) in [
        ("none", SortChoice::None),
        ("name", SortChoice::Name),
        ("size", SortChoice::Size),
        ("mtime", SortChoice::Mtime),
        ("atime", SortChoice::Atime),
        ("ctime", SortChoice::Ctime),
        ("ext", SortChoice::Ext),
    ] {
        let args = parse_args(["rfind", "--sort", value]).expect("parse");
        assert_eq!(args.sort, expected, "--sort {value}");
    }
}

#[test]
fn rejects_unknown_sort_key() {
    let error = parse_args(["rfind", "--sort", "inode"]).expect_err("invalid");
    assert_eq!(error.kind(), ErrorKind::InvalidValue);
}

#[test]
fn rejects_non_numeric_depth() {
    let error = parse_args(["rfind", "--max-depth", "deep"]).expect_err("invalid");
    assert_eq!(error.kind(), ErrorKind::ValueValidation);
}

#[test]
fn repeated_patterns_accumulate() {
    let args = parse_args(["rfind", "-n", "*.rs", "--name", "*.toml", "-P", "target"])
        .expect("parse");
    assert_eq!(args.names, vec!["*.rs".to_owned(), "*.toml".to_owned()]);
    assert_eq!(args.prunes, vec!["target".to_owned()]);
}

#[test]
fn parses_separator_names_and_characters() {
    let args = parse_args(["rfind", "-S", "tab"]).expect("parse");
    assert_eq!(args.separator, Some(Separator::Tab));
    let args = parse_args(["rfind", "--separator", " "]).expect("parse");
    assert_eq!(args.separator, Some(Separator::Space));
}

#[test]
fn rejects_unknown_separator() {
    let error = parse_args(["rfind", "-S", ";"]).expect_err("invalid");
    assert_eq!(error.kind(), ErrorKind::ValueValidation);
}

#[test]
fn maps_error_modes() {
    let args = parse_args(["rfind", "-e", "warn"]).expect("parse");
    assert_eq!(args.on_error, OnError::Warn);
    let args = parse_args(["rfind", "--on-error", "ignore"]).expect("parse");
    assert_eq!(args.on_error, OnError::Ignore);
}

#[test]
fn counts_verbose_flags_and_splits_diagnostic_tokens() {
    let args = parse_args(["rfind", "-vv", "--debug", "walk2,cycle", "--debug", "sort", "--info", "stats"])
        .expect("parse");
    assert_eq!(args.verbose, 2);
    assert_eq!(args.debug, vec!["walk2", "cycle", "sort"]);
    assert_eq!(args.info, vec!["stats"]);
}

#[test]
fn parses_selection_and_output_options() {
    let args = parse_args([
        "rfind", "-t", "d-", "-g", "needle", "-b", "--vimswap", "-l", "-c", "--colors", "xx",
        "-C", "--novcs",
    ])
    .expect("parse");
    assert_eq!(args.types.as_deref(), Some("d-"));
    assert_eq!(args.grep.as_deref(), Some("needle"));
    assert!(args.binary);
    assert!(args.vimswap);
    assert!(args.long);
    assert!(args.color);
    assert_eq!(args.colors.as_deref(), Some("xx"));
    assert!(args.count);
    assert!(args.novcs);
}

#[test]
fn rejects_unknown_option() {
    let error = parse_args(["rfind", "--frobnicate"]).expect_err("unknown");
    assert_eq!(error.kind(), ErrorKind::UnknownArgument);
}

#[test]
fn help_and_version_are_plain_flags() {
    let args = parse_args(["rfind", "-h"]).expect("parse");
    assert!(args.show_help);
    let args = parse_args(["rfind", "--version"]).expect("parse");
    assert!(args.show_version);
}
