use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use super::{EntryMetadata, FileSystem};

/// [`FileSystem`] backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFileSystem {
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        let file = File::open(path)?;
        Ok(Box::new(file))
    }

    fn list_directory(&self, path: &Path) -> io::Result<Vec<EntryMetadata>> {
        let mut results = Vec::new();

        for entry in fs::read_dir(path)? {
            let entry = entry?;
            // Symlinks are reported as files, even when pointing to a directory
            let file_type = entry.file_type()?;

            results.push(EntryMetadata {
                name: entry.file_name(),
                is_directory: file_type.is_dir(),
            });
        }

        results.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(results)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}
