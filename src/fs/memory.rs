//! In-memory FileSystem
//!
//! A path → node map behind a `parking_lot::RwLock`. Mirrors the OS
//! semantics the store relies on (parents must exist, rename replaces files,
//! remove is recursive) so store behaviour can be tested without a disk.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use super::FileSystem;

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Dir,
}

/// Filesystem held entirely in memory
///
/// `set_read_only(true)` makes every mutating call fail with
/// `PermissionDenied`, which is how tests provoke write failures.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    nodes: RwLock<BTreeMap<PathBuf, Node>>,
    read_only: AtomicBool,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle failure of all mutating operations
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Number of regular files currently stored
    pub fn file_count(&self) -> usize {
        self.nodes
            .read()
            .values()
            .filter(|node| matches!(node, Node::File(_)))
            .count()
    }

    /// Every path (files and directories) in sorted order
    pub fn paths(&self) -> Vec<PathBuf> {
        self.nodes.read().keys().cloned().collect()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn check_writable(&self) -> io::Result<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "memory filesystem is read-only",
            ));
        }
        Ok(())
    }

    /// "" and "/" always exist as directories
    fn is_implicit_root(path: &Path) -> bool {
        path.as_os_str().is_empty() || path.parent().is_none()
    }

    fn dir_exists(nodes: &BTreeMap<PathBuf, Node>, path: &Path) -> bool {
        Self::is_implicit_root(path) || matches!(nodes.get(path), Some(Node::Dir))
    }

    fn parent_exists(nodes: &BTreeMap<PathBuf, Node>, path: &Path) -> bool {
        match path.parent() {
            Some(parent) => Self::dir_exists(nodes, parent),
            None => true,
        }
    }

    fn not_found(path: &Path) -> io::Error {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("no such file or directory: {}", path.display()),
        )
    }

    fn other(path: &Path, what: &str) -> io::Error {
        io::Error::new(io::ErrorKind::Other, format!("{}: {}", what, path.display()))
    }

    /// `path` itself plus everything beneath it
    fn subtree(nodes: &BTreeMap<PathBuf, Node>, path: &Path) -> Vec<PathBuf> {
        nodes
            .keys()
            .filter(|p| p.starts_with(path))
            .cloned()
            .collect()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        match self.nodes.read().get(path) {
            Some(Node::File(bytes)) => Ok(bytes.clone()),
            Some(Node::Dir) => Err(Self::other(path, "is a directory")),
            None => Err(Self::not_found(path)),
        }
    }

    fn write_atomic(&self, path: &Path, contents: &[u8], _sync: bool) -> io::Result<()> {
        self.check_writable()?;
        let mut nodes = self.nodes.write();

        if !Self::parent_exists(&nodes, path) {
            return Err(Self::not_found(path));
        }
        if Self::is_implicit_root(path) || matches!(nodes.get(path), Some(Node::Dir)) {
            return Err(Self::other(path, "is a directory"));
        }

        // Swapping the whole node under the write lock is the atomic replace
        nodes.insert(path.to_path_buf(), Node::File(contents.to_vec()));
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check_writable()?;
        let mut nodes = self.nodes.write();

        // Ancestors come out deepest-first; create from the top down
        let mut chain: Vec<&Path> = path
            .ancestors()
            .filter(|p| !Self::is_implicit_root(p))
            .collect();
        chain.reverse();

        for dir in chain {
            match nodes.get(dir) {
                Some(Node::Dir) => {}
                Some(Node::File(_)) => return Err(Self::other(dir, "not a directory")),
                None => {
                    nodes.insert(dir.to_path_buf(), Node::Dir);
                }
            }
        }
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let nodes = self.nodes.read();

        if !Self::dir_exists(&nodes, path) {
            return match nodes.get(path) {
                Some(Node::File(_)) => Err(Self::other(path, "not a directory")),
                _ => Err(Self::not_found(path)),
            };
        }

        Ok(nodes
            .keys()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        self.check_writable()?;
        let mut nodes = self.nodes.write();

        if !nodes.contains_key(path) {
            return Err(Self::not_found(path));
        }
        for p in Self::subtree(&nodes, path) {
            nodes.remove(&p);
        }
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.check_writable()?;
        let mut nodes = self.nodes.write();

        let source_is_dir = match nodes.get(from) {
            Some(Node::Dir) => true,
            Some(Node::File(_)) => false,
            None => return Err(Self::not_found(from)),
        };
        if from == to {
            return Ok(());
        }
        if to.starts_with(from) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot move {} into itself", from.display()),
            ));
        }
        if !Self::parent_exists(&nodes, to) {
            return Err(Self::not_found(to));
        }

        match nodes.get(to) {
            Some(Node::Dir) if !source_is_dir => {
                return Err(Self::other(to, "is a directory"));
            }
            Some(Node::Dir) => {
                if Self::subtree(&nodes, to).len() > 1 {
                    return Err(Self::other(to, "directory not empty"));
                }
            }
            Some(Node::File(_)) if source_is_dir => {
                return Err(Self::other(to, "not a directory"));
            }
            _ => {}
        }

        let moved: Vec<(PathBuf, Node)> = Self::subtree(&nodes, from)
            .into_iter()
            .filter_map(|p| nodes.remove(&p).map(|node| (p, node)))
            .collect();

        for (old, node) in moved {
            let new = match old.strip_prefix(from) {
                Ok(rest) if rest.as_os_str().is_empty() => to.to_path_buf(),
                Ok(rest) => to.join(rest),
                Err(_) => continue,
            };
            nodes.insert(new, node);
        }
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.nodes.read().get(path), Some(Node::File(_)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        Self::dir_exists(&self.nodes.read(), path)
    }
}
