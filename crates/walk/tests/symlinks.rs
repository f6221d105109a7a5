#![cfg(unix)]
//! Symlink following and loop detection.

use std::fs;
use std::os::unix::fs::symlink;

use walk::{ColorCategory, ErrorPolicy, Walk, WalkErrorKind};

#[test]
fn loop_to_ancestor_raises_cyclic_recursion() {
    let temp = tempfile::tempdir().expect("tempdir");
    let x = temp.path().join("X");
    fs::create_dir(&x).expect("dir");
    symlink(&x, x.join("loop")).expect("symlink");

    let error = Walk::builder()
        .follow_symlinks(true)
        .build()
        .run([&x], |_| Ok(()))
        .expect_err("cycle detected");
    match error.kind() {
        WalkErrorKind::CyclicRecursion { path, ancestor } => {
            assert_eq!(path, &x.join("loop"));
            assert_eq!(ancestor, &x);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn followed_link_to_sibling_directory_is_descended() {
    let temp = tempfile::tempdir().expect("tempdir");
    let a = temp.path().join("a");
    fs::create_dir_all(a.join("real")).expect("dirs");
    fs::write(a.join("real/f"), b"").expect("write");
    symlink("real", a.join("link")).expect("symlink");

    let mut seen = Vec::new();
    let visited = Walk::builder()
        .follow_symlinks(true)
        .build()
        .run([&a], |entry| {
            let relative = entry.path().strip_prefix(temp.path()).expect("under temp");
            seen.push(relative.to_string_lossy().into_owned());
            Ok(())
        })
        .expect("walk");

    assert_eq!(seen, ["a", "a/link", "a/link/f", "a/real", "a/real/f"]);
    assert_eq!(visited, 5);
}

#[test]
fn loop_is_skipped_when_recovered() {
    let temp = tempfile::tempdir().expect("tempdir");
    let x = temp.path().join("X");
    fs::create_dir_all(x.join("sub")).expect("dirs");
    fs::write(x.join("sub/file"), b"").expect("write");
    symlink(&x, x.join("sub/back")).expect("symlink");

    let mut cycles = 0;
    let visited = Walk::builder()
        .follow_symlinks(true)
        .error_policy(ErrorPolicy::callback(|error| {
            if matches!(error.kind(), WalkErrorKind::CyclicRecursion { .. }) {
                cycles += 1;
            }
        }))
        .build()
        .run([&x], |_| Ok(()))
        .expect("walk");
    // X, X/sub, X/sub/back, X/sub/file
    assert_eq!(visited, 4);
    assert_eq!(cycles, 1);
}

#[test]
fn loop_to_directory_above_the_root_is_detected() {
    let temp = tempfile::tempdir().expect("tempdir");
    let top = temp.path().join("top");
    let root = top.join("inner");
    fs::create_dir_all(&root).expect("dirs");
    symlink(&top, root.join("up")).expect("symlink");

    let error = Walk::builder()
        .follow_symlinks(true)
        .build()
        .run([&root], |_| Ok(()))
        .expect_err("cycle detected");
    assert!(matches!(error.kind(), WalkErrorKind::CyclicRecursion { .. }));
}

#[test]
fn broken_links_are_visited_and_classified() {
    let temp = tempfile::tempdir().expect("tempdir");
    let link = temp.path().join("dangling");
    symlink(temp.path().join("nowhere"), &link).expect("symlink");

    let mut checked = false;
    Walk::builder()
        .follow_symlinks(true)
        .build()
        .run([&link], |entry| {
            assert!(entry.is_symlink());
            assert!(entry.is_broken_link());
            assert!(entry.resolved_status().is_none());
            assert_eq!(entry.type_letter(), 'l');
            assert_eq!(entry.color_category(), ColorCategory::BrokenLink);
            assert_eq!(
                entry.arrow().as_deref(),
                Some(format!(" -> {}", temp.path().join("nowhere").display()).as_str())
            );
            checked = true;
            Ok(())
        })
        .expect("walk");
    assert!(checked);
}
