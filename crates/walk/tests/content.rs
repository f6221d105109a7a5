//! Reading file contents from inside the visitor.

use std::fs;
use std::path::Path;

use regex::Regex;
use walk::{Entry, FileIdentity, OutputGuard, Walk, WalkErrorKind};

/// Runs `check` against the single entry at `path`.
fn with_entry(path: &Path, guard: OutputGuard, check: impl FnOnce(&mut Entry<'_>)) {
    let mut check = Some(check);
    Walk::builder()
        .output_guard(guard)
        .max_depth(Some(0))
        .build()
        .run([path], |entry| {
            if let Some(check) = check.take() {
                check(entry);
            }
            Ok(())
        })
        .expect("walk");
}

#[test]
fn binary_probe_detects_nul_bytes() {
    let temp = tempfile::tempdir().expect("tempdir");
    let binary = temp.path().join("binary");
    let text = temp.path().join("text");
    fs::write(&binary, [0x41, 0x00, 0x42]).expect("write");
    fs::write(&text, [0x41, 0x42]).expect("write");

    with_entry(&binary, OutputGuard::Disabled, |entry| {
        assert!(entry.is_binary(Some(1)).expect("probe"));
    });
    with_entry(&text, OutputGuard::Disabled, |entry| {
        assert!(!entry.is_binary(Some(1)).expect("probe"));
        assert!(!entry.is_binary(None).expect("probe"));
    });
}

#[test]
fn binary_probe_respects_block_budget() {
    let temp = tempfile::tempdir().expect("tempdir");
    let late = temp.path().join("late");
    let mut contents = vec![b'x'; 1 << 21];
    contents.push(0);
    fs::write(&late, &contents).expect("write");

    with_entry(&late, OutputGuard::Disabled, |entry| {
        assert!(!entry.is_binary(Some(1)).expect("probe"));
        assert!(!entry.is_binary(Some(0)).expect("probe"));
        assert!(entry.is_binary(None).expect("probe"));
    });
}

#[test]
fn read_honours_limit() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("data");
    fs::write(&file, b"hello world").expect("write");

    with_entry(&file, OutputGuard::Disabled, |entry| {
        assert_eq!(entry.read(Some(5)).expect("read"), b"hello");
        assert_eq!(entry.read(None).expect("read"), b"hello world");
    });
}

#[test]
fn lines_are_numbered_and_stripped() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("lines");
    fs::write(&file, b"first\r\nsecond\n\nfourth").expect("write");

    with_entry(&file, OutputGuard::Disabled, |entry| {
        let mut lines = Vec::new();
        let count = entry
            .for_each_line(|line, number| lines.push((number, line.to_owned())))
            .expect("lines");
        assert_eq!(count, 4);
        assert_eq!(
            lines,
            [
                (1, "first".to_owned()),
                (2, "second".to_owned()),
                (3, String::new()),
                (4, "fourth".to_owned()),
            ]
        );
    });
}

#[test]
fn grep_reports_matching_lines() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("source.rs");
    fs::write(&file, "fn main() {\n    // TODO: fix\n}\n// TODO again\n").expect("write");
    let pattern = Regex::new(r"TODO\S*").expect("regex");

    with_entry(&file, OutputGuard::Disabled, |entry| {
        let matches = entry.grep(&pattern).expect("grep");
        let numbers: Vec<_> = matches.iter().map(|found| found.line_number).collect();
        assert_eq!(numbers, [2, 4]);
        assert_eq!(matches[0].range, 7..12);
        assert_eq!(matches[1].highlighted("31;1"), "// \x1b[31;1mTODO\x1b[m again");
    });
}

#[test]
fn content_access_requires_regular_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    with_entry(temp.path(), OutputGuard::Disabled, |entry| {
        let error = entry.read(None).expect_err("directory");
        assert!(matches!(error.kind(), WalkErrorKind::NotRegularFile { .. }));
        assert!(error.is_recoverable());
    });
}

#[cfg(unix)]
#[test]
fn open_refuses_the_guarded_output_file() {
    use std::os::unix::fs::MetadataExt;

    let temp = tempfile::tempdir().expect("tempdir");
    let output = temp.path().join("output.log");
    fs::write(&output, b"collected").expect("write");
    let metadata = fs::metadata(&output).expect("stat");
    let guard = OutputGuard::Identity(FileIdentity::new(metadata.dev(), metadata.ino()));

    with_entry(&output, guard, |entry| {
        let error = entry.open().expect_err("output loop");
        assert!(matches!(error.kind(), WalkErrorKind::OutputLoop { .. }));
    });

    let other = temp.path().join("other.log");
    fs::write(&other, b"fine").expect("write");
    with_entry(&other, guard, |entry| {
        assert_eq!(entry.read(None).expect("read"), b"fine");
    });
}

#[test]
fn vimswap_requires_name_and_magic() {
    let temp = tempfile::tempdir().expect("tempdir");
    let swap = temp.path().join(".notes.txt.swp");
    let mut contents = b"b0VIM 9.0".to_vec();
    contents.resize(4096, 0);
    fs::write(&swap, &contents).expect("write");
    let fake = temp.path().join(".fake.swp");
    fs::write(&fake, b"not a swap file").expect("write");
    let named_wrong = temp.path().join("notes.swp");
    fs::write(&named_wrong, &contents).expect("write");

    with_entry(&swap, OutputGuard::Disabled, |entry| {
        assert!(entry.is_vimswap().expect("probe"));
    });
    with_entry(&fake, OutputGuard::Disabled, |entry| {
        assert!(!entry.is_vimswap().expect("probe"));
    });
    with_entry(&named_wrong, OutputGuard::Disabled, |entry| {
        assert!(!entry.is_vimswap().expect("probe"));
    });
}
