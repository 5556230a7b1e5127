use log::{debug, warn};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::Path;

use super::carriage::filter_carriage;
use crate::filesystem::{FileSystem, FileSystemError};

/// Filename (without any directory) to carriage filtered content.
///
/// Names are kept as the source lists them, so two names only collide when
/// their raw bytes are equal.
pub type FileMap = BTreeMap<OsString, Vec<u8>>;

/// Result of [`read_dir_in_map`]: every file that could be read, and the
/// failures met along the way, joined.
#[derive(Debug, Default)]
pub struct Flattened {
    pub files: FileMap,
    pub error: Option<FileSystemError>,
}

/// Reads `srcdir` and all its subdirectories into a single map keyed by filename.
///
/// Directory structure is discarded: when two files share a name (e.g. `a.txt`
/// and `sub/a.txt`), the one visited last wins. Entries are visited in the
/// order `fs` lists them, so with a sorted listing `sub/a.txt` overrides
/// `a.txt` while `z.txt` overrides `sub/z.txt`.
///
/// Unreadable files and directories don't stop the walk.
pub fn read_dir_in_map<FS: FileSystem + ?Sized>(fs: &FS, srcdir: &Path) -> Flattened {
    let mut files = FileMap::new();
    let mut errors = Vec::new();
    flatten_into(fs, srcdir, &mut files, &mut errors);

    Flattened {
        files,
        error: FileSystemError::join(errors).err(),
    }
}

fn flatten_into<FS: FileSystem + ?Sized>(
    fs: &FS,
    srcdir: &Path,
    files: &mut FileMap,
    errors: &mut Vec<FileSystemError>,
) {
    let entries = match fs.list_directory(srcdir) {
        Ok(entries) => entries,
        Err(source) => {
            warn!("Failed to list directory {}: {}", srcdir.display(), source);
            errors.push(FileSystemError::ReadDir {
                path: srcdir.to_path_buf(),
                source,
            });
            return;
        }
    };

    for entry in entries {
        let src = srcdir.join(&entry.name);

        if entry.is_directory {
            flatten_into(fs, &src, files, errors);
            continue;
        }

        match fs.read_file(&src) {
            Ok(bytes) => {
                if files.contains_key(&entry.name) {
                    debug!("{} overrides a file with the same name", src.display());
                }
                files.insert(entry.name, filter_carriage(&bytes));
            }
            Err(source) => {
                warn!("Failed to read {}: {}", src.display(), source);
                errors.push(FileSystemError::Read { path: src, source });
            }
        }
    }
}
