//! Directory and file equality checks for tests.
//!
//! Both sides are carriage filtered before being diffed, so a file written with
//! CRLF line endings equals the same file written with LF ones. Comparisons
//! never stop at the first difference: everything found lands in a [`Report`].

mod carriage;
mod diff;
mod flatten;
mod report;

pub use carriage::filter_carriage;
pub use diff::{
    check, diff, filter_diffs, pretty_text, unified, IgnoreRule, Mismatch, Operation, Segment,
};
pub use flatten::{read_dir_in_map, FileMap, Flattened};
pub use report::{Discrepancy, Report, Side};

use log::info;
use std::path::Path;

use crate::filesystem::{FileSystem, RealFileSystem};

#[derive(Default)]
pub struct CompareOptions {
    ignore: Vec<IgnoreRule>,
}

impl CompareOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule dropping matching segments from the differences.
    pub fn ignore_diff(mut self, rule: impl Fn(&str, &Segment) -> bool + 'static) -> Self {
        self.ignore.push(Box::new(rule));
        self
    }
}

/// Compares two directory trees read through `fs`.
///
/// Trees are flattened with [`read_dir_in_map`], so files are matched by name
/// only, whatever subdirectory they live in.
pub fn compare_dir_in<FS: FileSystem + ?Sized>(
    fs: &FS,
    expected: &Path,
    actual: &Path,
    options: &CompareOptions,
) -> Report {
    let mut report = Report::new();

    let expected_files = read_side(fs, Side::Expected, expected, &mut report);
    let actual_files = read_side(fs, Side::Actual, actual, &mut report);

    for (filename, expected_bytes) in &expected_files {
        let name = filename.to_string_lossy();
        let Some(actual_bytes) = actual_files.get(filename) else {
            report.push(Discrepancy::Missing {
                name: name.into_owned(),
            });
            continue;
        };

        let mismatch = check(&name, expected_bytes, &name, actual_bytes, &options.ignore);
        if let Some(mismatch) = mismatch {
            report.push(Discrepancy::Modified {
                name: name.into_owned(),
                mismatch,
            });
        }
    }

    for filename in actual_files.keys() {
        if !expected_files.contains_key(filename) {
            report.push(Discrepancy::Extra {
                name: filename.to_string_lossy().into_owned(),
            });
        }
    }

    info!(
        "Compared {} with {}: {} discrepancies",
        expected.display(),
        actual.display(),
        report.len()
    );
    report
}

fn read_side<FS: FileSystem + ?Sized>(
    fs: &FS,
    side: Side,
    dir: &Path,
    report: &mut Report,
) -> FileMap {
    let flattened = read_dir_in_map(fs, dir);
    if let Some(error) = flattened.error {
        report.push(Discrepancy::Unreadable {
            side,
            path: dir.to_path_buf(),
            message: error.to_string(),
        });
    }
    flattened.files
}

/// Compares two files read through `fs`.
///
/// When either file cannot be read, the failure is reported and contents are not diffed.
pub fn compare_file_in<FS: FileSystem + ?Sized>(
    fs: &FS,
    expected: &Path,
    actual: &Path,
    options: &CompareOptions,
) -> Report {
    let mut report = Report::new();

    let expected_bytes = read_file(fs, Side::Expected, expected, &mut report);
    let actual_bytes = read_file(fs, Side::Actual, actual, &mut report);

    if let (Some(expected_bytes), Some(actual_bytes)) = (expected_bytes, actual_bytes) {
        let expected_name = expected.to_string_lossy();
        let actual_name = actual.to_string_lossy();
        if let Some(mismatch) = check(
            &expected_name,
            &expected_bytes,
            &actual_name,
            &actual_bytes,
            &options.ignore,
        ) {
            report.push(Discrepancy::Modified {
                name: actual_name.into_owned(),
                mismatch,
            });
        }
    }

    info!(
        "Compared {} with {}: {} discrepancies",
        expected.display(),
        actual.display(),
        report.len()
    );
    report
}

fn read_file<FS: FileSystem + ?Sized>(
    fs: &FS,
    side: Side,
    path: &Path,
    report: &mut Report,
) -> Option<Vec<u8>> {
    match fs.read_file(path) {
        Ok(bytes) => Some(filter_carriage(&bytes)),
        Err(e) => {
            report.push(Discrepancy::Unreadable {
                side,
                path: path.to_path_buf(),
                message: e.to_string(),
            });
            None
        }
    }
}

pub fn compare_dir(
    expected: impl AsRef<Path>,
    actual: impl AsRef<Path>,
    options: &CompareOptions,
) -> Report {
    compare_dir_in(&RealFileSystem::new(), expected.as_ref(), actual.as_ref(), options)
}

pub fn compare_file(
    expected: impl AsRef<Path>,
    actual: impl AsRef<Path>,
    options: &CompareOptions,
) -> Report {
    compare_file_in(&RealFileSystem::new(), expected.as_ref(), actual.as_ref(), options)
}

/// Asserts that `expected` and `actual` directories hold the same files.
///
/// Fails if a file is missing in actual, if a file is present in actual but
/// not in expected, or if the content of any file in actual differs from its
/// peer in expected. All failures are reported at once.
#[track_caller]
pub fn assert_equal_dir(expected: impl AsRef<Path>, actual: impl AsRef<Path>) {
    compare_dir(expected, actual, &CompareOptions::default()).assert();
}

/// Same as [`assert_equal_dir`], with differences filtered by `options`.
#[track_caller]
pub fn assert_equal_dir_with(
    expected: impl AsRef<Path>,
    actual: impl AsRef<Path>,
    options: &CompareOptions,
) {
    compare_dir(expected, actual, options).assert();
}

/// Asserts that both files can be read and have the same content, line endings aside.
#[track_caller]
pub fn assert_equal_file(expected: impl AsRef<Path>, actual: impl AsRef<Path>) {
    compare_file(expected, actual, &CompareOptions::default()).assert();
}
