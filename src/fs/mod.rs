//! FileSystem Module
//!
//! The seam between the store and the disk.
//!
//! ## Responsibilities
//! - Whole-file reads and atomic whole-file writes
//! - Directory creation, enumeration, removal and rename
//! - Swappable backend so tests can run without touching the disk
//!
//! ## Atomic Write
//! ```text
//!   root/saves/.larder-tmpXXXXXX   ← write + (optional) fsync
//!          │
//!          │ rename
//!          ▼
//!   root/saves/slot1               ← readers only ever see the full file
//! ```

mod memory;
mod os;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use memory::MemoryFileSystem;
pub use os::OsFileSystem;

/// Prefix of in-flight temp files; listings skip these names
pub const TEMP_PREFIX: &str = ".larder-tmp";

/// Filesystem operations used by the store
///
/// Paths passed in are already resolved beneath the store root.
pub trait FileSystem: Send + Sync + 'static {
    /// Read a whole regular file
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replace `path` with `contents` so no partial file is ever visible
    ///
    /// The parent directory must already exist.
    fn write_atomic(&self, path: &Path, contents: &[u8], sync: bool) -> io::Result<()>;

    /// Create `path` and every missing ancestor
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Entries directly inside `path` (full paths, any order)
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Remove a file, or a directory with everything under it
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Move `from` to `to`, replacing an existing file at `to`
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }
}

impl<F: FileSystem> FileSystem for Arc<F> {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read(path)
    }

    fn write_atomic(&self, path: &Path, contents: &[u8], sync: bool) -> io::Result<()> {
        (**self).write_atomic(path, contents, sync)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        (**self).create_dir_all(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        (**self).read_dir(path)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        (**self).remove(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        (**self).rename(from, to)
    }

    fn is_file(&self, path: &Path) -> bool {
        (**self).is_file(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }
}
