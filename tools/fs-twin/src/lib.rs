pub mod compare;
pub mod copy;
pub mod filesystem;

pub mod mock;

pub use compare::{
    assert_equal_dir, assert_equal_dir_with, assert_equal_file, compare_dir, compare_file,
    CompareOptions, Discrepancy, Report,
};
pub use copy::{copy_dir, copy_file, exists, Copier, CopyOptions};
pub use filesystem::{
    EntryMetadata, FileSystem, FileSystemError, RealFileSystem, RWX_RX_RX, RW_R_R,
};
