use log::{debug, info};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::filesystem::{
    FileSystem, FileSystemError, RealFileSystem, Result, RWX_RX_RX, RW_R_R,
};

/// Joins a source directory with one of its entry names.
///
/// Only source paths go through it; destination paths are always joined natively.
pub type Join = fn(&Path, &OsStr) -> PathBuf;

fn native_join(dir: &Path, name: &OsStr) -> PathBuf {
    dir.join(name)
}

#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Permission bits applied to every copied file.
    pub perm: u32,
    pub join: Join,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            perm: RW_R_R,
            join: native_join,
        }
    }
}

impl CopyOptions {
    pub fn with_perm(mut self, perm: u32) -> Self {
        self.perm = perm;
        self
    }

    pub fn with_join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }
}

/// Copies files and directories read from `FS` onto the real filesystem.
pub struct Copier<FS: FileSystem> {
    filesystem: FS,
    options: CopyOptions,
}

impl<FS: FileSystem> Copier<FS> {
    pub fn new(filesystem: FS) -> Self {
        Self {
            filesystem,
            options: CopyOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CopyOptions) -> Self {
        self.options = options;
        self
    }

    /// Copies `src` to `dest`. Fails if `src` is a directory.
    pub fn copy_file(&self, src: &Path, dest: &Path) -> Result<()> {
        let mut reader = self
            .filesystem
            .open(src)
            .map_err(|source| FileSystemError::Read {
                path: src.to_path_buf(),
                source,
            })?;

        let mut file = File::create(dest).map_err(|source| FileSystemError::Create {
            path: dest.to_path_buf(),
            source,
        })?;

        io::copy(&mut reader, &mut file).map_err(|source| FileSystemError::Copy {
            src: src.to_path_buf(),
            dest: dest.to_path_buf(),
            source,
        })?;

        set_permissions(&file, self.options.perm).map_err(|source| {
            FileSystemError::Permissions {
                path: dest.to_path_buf(),
                source,
            }
        })?;

        debug!("Copied: {} -> {}", src.display(), dest.display());
        Ok(())
    }

    /// Copies `srcdir` recursively as `destdir`. Fails if `srcdir` is a file.
    ///
    /// Failing entries do not stop the copy: every error is collected and
    /// returned joined once all entries have been visited.
    pub fn copy_dir(&self, srcdir: &Path, destdir: &Path) -> Result<()> {
        create_directory(destdir).map_err(|source| FileSystemError::CreateDir {
            path: destdir.to_path_buf(),
            source,
        })?;

        let entries = self
            .filesystem
            .list_directory(srcdir)
            .map_err(|source| FileSystemError::ReadDir {
                path: srcdir.to_path_buf(),
                source,
            })?;

        let mut errors = Vec::new();
        for entry in entries {
            let src = (self.options.join)(srcdir, &entry.name);
            let dest = destdir.join(&entry.name);

            let result = if entry.is_directory {
                self.copy_dir(&src, &dest)
            } else {
                self.copy_file(&src, &dest)
            };
            if let Err(e) = result {
                errors.push(e);
            }
        }

        info!("Copied directory: {} -> {}", srcdir.display(), destdir.display());
        FileSystemError::join(errors)
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.filesystem.open(path).is_ok()
    }
}

/// Copies a file from the operating system with default options.
pub fn copy_file(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<()> {
    Copier::new(RealFileSystem::new()).copy_file(src.as_ref(), dest.as_ref())
}

/// Copies a directory tree from the operating system with default options.
pub fn copy_dir(srcdir: impl AsRef<Path>, destdir: impl AsRef<Path>) -> Result<()> {
    Copier::new(RealFileSystem::new()).copy_dir(srcdir.as_ref(), destdir.as_ref())
}

pub fn exists(path: impl AsRef<Path>) -> bool {
    Copier::new(RealFileSystem::new()).exists(path.as_ref())
}

fn create_directory(path: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(RWX_RX_RX);
    }

    match builder.create(path) {
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        other => other,
    }
}

#[cfg(unix)]
fn set_permissions(file: &File, perm: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(perm))
}

#[cfg(not(unix))]
fn set_permissions(file: &File, perm: u32) -> io::Result<()> {
    let mut permissions = file.metadata()?.permissions();
    permissions.set_readonly(perm & 0o200 == 0);
    file.set_permissions(permissions)
}
