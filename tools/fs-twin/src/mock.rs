use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::filesystem::{EntryMetadata, FileSystem};

#[derive(Debug, Default)]
struct MockState {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
    unreadable: BTreeSet<PathBuf>,
}

/// In-memory [`FileSystem`] used as a test double.
///
/// Adding a file or directory registers all of its ancestors as directories.
/// Paths marked with [`MockFileSystem::deny`] fail every read with
/// `PermissionDenied`.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        let path = path.into();
        let mut state = self.state.lock().unwrap();
        if let Some(parent) = path.parent() {
            register_directory(&mut state, parent);
        }
        state.files.insert(path, content.into());
    }

    pub fn add_directory(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut state = self.state.lock().unwrap();
        register_directory(&mut state, &path);
    }

    pub fn deny(&self, path: impl Into<PathBuf>) {
        let mut state = self.state.lock().unwrap();
        state.unreadable.insert(path.into());
    }

    fn check_readable(state: &MockState, path: &Path) -> io::Result<()> {
        if state.unreadable.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            ));
        }
        Ok(())
    }
}

fn register_directory(state: &mut MockState, path: &Path) {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            break;
        }
        state.directories.insert(ancestor.to_path_buf());
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("not found: {}", path.display()),
    )
}

impl FileSystem for MockFileSystem {
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        let state = self.state.lock().unwrap();
        Self::check_readable(&state, path)?;

        if let Some(content) = state.files.get(path) {
            return Ok(Box::new(Cursor::new(content.clone())));
        }
        if state.directories.contains(path) {
            return Ok(Box::new(io::empty()));
        }
        Err(not_found(path))
    }

    fn list_directory(&self, path: &Path) -> io::Result<Vec<EntryMetadata>> {
        let state = self.state.lock().unwrap();
        Self::check_readable(&state, path)?;

        if !state.directories.contains(path) {
            return Err(not_found(path));
        }

        let mut results = Vec::new();

        for file_path in state.files.keys() {
            if file_path.parent() == Some(path) {
                if let Some(name) = file_path.file_name() {
                    results.push(EntryMetadata {
                        name: name.to_os_string(),
                        is_directory: false,
                    });
                }
            }
        }

        for dir_path in state.directories.iter() {
            if dir_path.parent() == Some(path) {
                if let Some(name) = dir_path.file_name() {
                    results.push(EntryMetadata {
                        name: name.to_os_string(),
                        is_directory: true,
                    });
                }
            }
        }

        results.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(results)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        let state = self.state.lock().unwrap();
        Self::check_readable(&state, path)?;

        state.files.get(path).cloned().ok_or_else(|| not_found(path))
    }
}
