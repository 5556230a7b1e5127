use fs_twin::compare::Segment;
use fs_twin::{
    assert_equal_dir, assert_equal_dir_with, assert_equal_file, compare_dir, CompareOptions,
    Discrepancy,
};
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tempfile::TempDir;

fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}

fn sandbox(expected: &[(&str, &str)], actual: &[(&str, &str)]) -> (TempDir, TempDir) {
    let expected_dir = TempDir::new().unwrap();
    let actual_dir = TempDir::new().unwrap();
    write_tree(expected_dir.path(), expected);
    write_tree(actual_dir.path(), actual);
    (expected_dir, actual_dir)
}

#[test]
fn test_equal_directories() {
    let (expected, actual) = sandbox(&[("a.txt", "hello")], &[("a.txt", "hello")]);

    assert_equal_dir(expected.path(), actual.path());
}

#[test]
fn test_crlf_equals_lf() {
    let (expected, actual) = sandbox(&[("a.txt", "hello\n")], &[("a.txt", "hello\r\n")]);

    assert_equal_dir(expected.path(), actual.path());
}

#[test]
fn test_missing_file_reported_alone() {
    let (expected, actual) = sandbox(&[("a.txt", "hello"), ("b.txt", "world")], &[("a.txt", "hello")]);

    let report = compare_dir(expected.path(), actual.path(), &CompareOptions::default());

    assert_eq!(
        report.discrepancies(),
        &[Discrepancy::Missing {
            name: "b.txt".to_string()
        }]
    );
}

#[test]
#[should_panic(expected = "b.txt missing from actual directory")]
fn test_missing_file_fails_assertion() {
    let (expected, actual) = sandbox(&[("a.txt", "hello"), ("b.txt", "world")], &[("a.txt", "hello")]);

    assert_equal_dir(expected.path(), actual.path());
}

#[test]
#[should_panic(expected = "c.txt is present in actual directory but not in expected one")]
fn test_extra_file_fails_assertion() {
    let (expected, actual) = sandbox(&[], &[("c.txt", "x")]);

    assert_equal_dir(expected.path(), actual.path());
}

#[test]
fn test_modified_file_has_diff() {
    let (expected, actual) = sandbox(&[("a.txt", "foo")], &[("a.txt", "bar")]);

    let report = compare_dir(expected.path(), actual.path(), &CompareOptions::default());

    assert_eq!(report.modified(), vec!["a.txt"]);
    match &report.discrepancies()[0] {
        Discrepancy::Modified { mismatch, .. } => {
            assert!(!mismatch.segments.is_empty());
            assert!(mismatch.unified.contains("-foo"));
            assert!(mismatch.unified.contains("+bar"));
        }
        other => panic!("unexpected discrepancy: {}", other),
    }
}

#[test]
#[should_panic(expected = "a.txt is different from expected")]
fn test_modified_file_fails_assertion() {
    let (expected, actual) = sandbox(&[("a.txt", "foo")], &[("a.txt", "bar")]);

    assert_equal_dir(expected.path(), actual.path());
}

#[test]
fn test_every_discrepancy_in_one_failure() {
    let (expected, actual) = sandbox(
        &[("a.txt", "foo"), ("b.txt", "b"), ("sub/c.txt", "c")],
        &[("a.txt", "bar"), ("sub/c.txt", "c"), ("d.txt", "d")],
    );

    let message = panic::catch_unwind(AssertUnwindSafe(|| {
        assert_equal_dir(expected.path(), actual.path())
    }))
        .unwrap_err()
        .downcast::<String>()
        .unwrap();

    assert!(message.starts_with("3 discrepancies found"));
    assert!(message.contains("a.txt is different from expected"));
    assert!(message.contains("b.txt missing from actual directory"));
    assert!(message.contains("d.txt is present in actual directory but not in expected one"));
}

#[test]
fn test_ignore_rule() {
    let (expected, actual) = sandbox(
        &[("Cargo.toml", "version = \"1.0.0\"\n")],
        &[("Cargo.toml", "version = \"1.1.0\"\n")],
    );
    let options = CompareOptions::new().ignore_diff(|filename: &str, segment: &Segment| {
        filename == "Cargo.toml" && segment.text_lossy().chars().all(|c| c.is_ascii_digit())
    });

    assert_equal_dir_with(expected.path(), actual.path(), &options);
}

#[test]
fn test_equal_files() {
    let (expected, actual) = sandbox(&[("a.txt", "line\r\nline\r\n")], &[("a.txt", "line\nline\n")]);

    assert_equal_file(expected.path().join("a.txt"), actual.path().join("a.txt"));
}

#[test]
#[should_panic(expected = "is different from expected")]
fn test_different_files() {
    let (expected, actual) = sandbox(&[("a.txt", "foo")], &[("a.txt", "bar")]);

    assert_equal_file(expected.path().join("a.txt"), actual.path().join("a.txt"));
}

#[test]
#[should_panic(expected = "failed to completely read actual")]
fn test_unreadable_file_fails_assertion() {
    let (expected, actual) = sandbox(&[("a.txt", "foo")], &[]);

    assert_equal_file(expected.path().join("a.txt"), actual.path().join("a.txt"));
}
