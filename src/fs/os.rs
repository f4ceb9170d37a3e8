//! OS-backed FileSystem
//!
//! Thin wrapper over `std::fs`, with the atomic write done through a
//! `tempfile` in the target directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{FileSystem, TEMP_PREFIX};

/// The real filesystem (default backend)
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl OsFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for OsFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write_atomic(&self, path: &Path, contents: &[u8], sync: bool) -> io::Result<()> {
        // Temp file must live on the same filesystem as the target for the
        // rename to be atomic, so put it right next to it.
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX);
        // tempfile defaults to 0600; use the same mode a plain create gets
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        let mut temp = builder.tempfile_in(parent)?;

        // An overwrite keeps the permissions of the file it replaces
        if let Ok(existing) = fs::metadata(path) {
            temp.as_file().set_permissions(existing.permissions())?;
        }

        temp.write_all(contents)?;
        if sync {
            temp.as_file().sync_all()?;
        }

        // On failure the temp file is dropped, which deletes it
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            entries.push(entry?.path());
        }
        Ok(entries)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        // symlink_metadata so a link to a directory is unlinked, not followed
        if fs::symlink_metadata(path)?.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}
