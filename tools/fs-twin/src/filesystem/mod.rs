mod real;

pub use real::RealFileSystem;

use std::ffi::OsString;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default permission of copied files (`rw-r--r--`).
pub const RW_R_R: u32 = 0o644;

/// Permission of directories created while copying (`rwxr-xr-x`).
pub const RWX_RX_RX: u32 = 0o755;

#[derive(Debug, Error)]
pub enum FileSystemError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to create {}: {source}", .path.display())]
    Create { path: PathBuf, source: io::Error },

    #[error("failed to copy file {} to {}: {source}", .src.display(), .dest.display())]
    Copy {
        src: PathBuf,
        dest: PathBuf,
        source: io::Error,
    },

    #[error("failed to update {} permissions: {source}", .path.display())]
    Permissions { path: PathBuf, source: io::Error },

    #[error("failed to create folder {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to read directory {}: {source}", .path.display())]
    ReadDir { path: PathBuf, source: io::Error },

    #[error("{}", join_messages(.0))]
    Joined(Vec<FileSystemError>),
}

fn join_messages(errors: &[FileSystemError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl FileSystemError {
    /// Combines independently collected errors into a single one.
    ///
    /// Nested joined errors are flattened so that every leaf failure is listed once.
    pub fn join(errors: Vec<FileSystemError>) -> Result<()> {
        let mut leaves = Vec::with_capacity(errors.len());
        for error in errors {
            match error {
                FileSystemError::Joined(inner) => leaves.extend(inner),
                other => leaves.push(other),
            }
        }

        match leaves.len() {
            0 => Ok(()),
            1 => Err(leaves.remove(0)),
            _ => Err(FileSystemError::Joined(leaves)),
        }
    }

    /// Number of leaf failures carried by this error.
    pub fn count(&self) -> usize {
        match self {
            FileSystemError::Joined(inner) => inner.len(),
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, FileSystemError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMetadata {
    pub name: OsString,
    pub is_directory: bool,
}

/// Read-only view over a filesystem.
///
/// Copies and comparisons only ever read through this trait, which lets them
/// source files from somewhere other than the operating system (see
/// [`crate::mock::MockFileSystem`]). Writes always target the real filesystem.
pub trait FileSystem {
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>>;

    /// Lists the entries of a directory, sorted by name.
    fn list_directory(&self, path: &Path) -> io::Result<Vec<EntryMetadata>>;

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;
}

impl<FS: FileSystem + ?Sized> FileSystem for &FS {
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        (**self).open(path)
    }

    fn list_directory(&self, path: &Path) -> io::Result<Vec<EntryMetadata>> {
        (**self).list_directory(path)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read_file(path)
    }
}
