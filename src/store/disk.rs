//! Disk Store
//!
//! Maps each key 1:1 to a file under the storage root.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;

use crate::config::Config;
use crate::error::{Result, StorageError};
use crate::fs::{FileSystem, OsFileSystem, TEMP_PREFIX};
use crate::key;
use crate::lane::{Lane, Ticket, WorkerLane};

use super::{ReadOnlyStore, ReadableStore, WritableStore};

/// Byte store rooted at a fixed directory
///
/// ## Concurrency Model
///
/// - **Blocking calls** (`save`, `fetch`, ...): run on the calling thread.
///   No in-process lock; same-key writers race at the rename, and every
///   observed file is still complete.
/// - **Async calls** (`*_async`, `execute`): queued on the store's lane and
///   run one at a time in submission order. Clones share the lane, so they
///   share that ordering.
///
/// There is no cache: every call goes to the filesystem.
pub struct DiskStore<F: FileSystem = OsFileSystem> {
    inner: Arc<Inner<F>>,
    lane: Arc<dyn Lane>,
}

struct Inner<F> {
    config: Config,
    fs: F,
}

impl<F: FileSystem> Clone for DiskStore<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            lane: Arc::clone(&self.lane),
        }
    }
}

impl DiskStore<OsFileSystem> {
    /// Store on the real filesystem with a fresh worker lane
    pub fn open(config: Config) -> Result<Self> {
        Self::with_filesystem(config, OsFileSystem)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified storage root
    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }
}

impl<F: FileSystem> DiskStore<F> {
    /// Store on `fs` with a fresh worker lane built from `config`
    pub fn with_filesystem(config: Config, fs: F) -> Result<Self> {
        let lane: Arc<dyn Lane> = match config.queue_capacity {
            Some(capacity) => Arc::new(WorkerLane::bounded(config.lane_name.clone(), capacity)?),
            None => Arc::new(WorkerLane::spawn(config.lane_name.clone())?),
        };
        Ok(Self::with_parts(config, fs, lane))
    }

    /// Assemble a store from explicit parts
    ///
    /// Pass an `InlineLane` to make async calls complete before they return.
    /// Stores sharing one lane share its ordering.
    pub fn with_parts(config: Config, fs: F, lane: Arc<dyn Lane>) -> Self {
        tracing::debug!(root = %config.data_dir.display(), "disk store opened");
        Self {
            inner: Arc::new(Inner { config, fs }),
            lane,
        }
    }

    // =========================================================================
    // Blocking Operations
    // =========================================================================

    /// Write `value` under `key`, replacing any previous value atomically
    ///
    /// Steps:
    /// 1. Resolve the key under the root
    /// 2. Create missing parent directories
    /// 3. Write to a temp file next to the target and rename it into place
    pub fn save(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = key::resolve(self.root(), key)?;
        let fs = &self.inner.fs;

        let write = || -> io::Result<()> {
            if let Some(parent) = path.parent() {
                if !fs.is_dir(parent) {
                    fs.create_dir_all(parent)?;
                }
            }
            fs.write_atomic(&path, value, self.inner.config.sync_writes)
        };

        write().map_err(|source| {
            tracing::warn!(key, error = %source, "save failed");
            StorageError::WriteFailed {
                key: key.to_string(),
                source,
            }
        })?;

        tracing::debug!(key, bytes = value.len(), "saved");
        Ok(())
    }

    /// Read the bytes stored under `key`
    ///
    /// A missing file and an unreadable one both report `NotFound`.
    pub fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let path = key::resolve(self.root(), key)?;

        match self.inner.fs.read(&path) {
            Ok(bytes) => {
                tracing::debug!(key, bytes = bytes.len(), "fetched");
                Ok(bytes)
            }
            Err(e) => {
                tracing::debug!(key, error = %e, "fetch missed");
                Err(StorageError::NotFound(key.to_string()))
            }
        }
    }

    pub fn contains(&self, key: &str) -> Result<bool> {
        let path = key::resolve(self.root(), key)?;
        Ok(self.inner.fs.is_file(&path))
    }

    /// Keys of the entries directly inside `dir` (`""` is the root)
    ///
    /// Not recursive; subdirectories are listed as entries. Sorted. In-flight
    /// temp files and names that are not UTF-8 are skipped.
    pub fn list_files(&self, dir: &str) -> Result<Vec<String>> {
        let path = key::resolve_dir(self.root(), dir)?;

        let entries = self.inner.fs.read_dir(&path).map_err(|source| {
            tracing::warn!(dir, error = %source, "list failed");
            StorageError::ListFailed {
                dir: dir.to_string(),
                source,
            }
        })?;

        let mut keys: Vec<String> = entries
            .iter()
            .filter(|p| {
                p.file_name()
                    .map(|name| !name.to_string_lossy().starts_with(TEMP_PREFIX))
                    .unwrap_or(false)
            })
            .filter_map(|p| {
                let key = key::relative_key(self.root(), p);
                if key.is_none() {
                    tracing::debug!(path = %p.display(), "skipping entry with non UTF-8 name");
                }
                key
            })
            .collect();
        keys.sort();

        tracing::debug!(dir, count = keys.len(), "listed");
        Ok(keys)
    }

    /// Delete each entry in order (directories recursively)
    ///
    /// Every key is validated first, so an invalid key deletes nothing.
    /// Deletion stops at the first failure; entries removed before it stay
    /// removed and their count is reported in `RemoveFailed::removed`.
    pub fn remove_files<S: AsRef<str>>(&self, keys: &[S]) -> Result<()> {
        let targets = keys
            .iter()
            .map(|k| key::resolve(self.root(), k.as_ref()).map(|path| (k.as_ref(), path)))
            .collect::<Result<Vec<_>>>()?;

        for (removed, (key, path)) in targets.iter().enumerate() {
            self.inner.fs.remove(path).map_err(|source| {
                tracing::warn!(key = *key, removed, error = %source, "remove failed");
                StorageError::RemoveFailed {
                    key: key.to_string(),
                    removed,
                    source,
                }
            })?;
        }

        tracing::debug!(count = targets.len(), "removed");
        Ok(())
    }

    /// Relocate the entry at `from` to `to`
    ///
    /// The source must exist. Missing parents of `to` are created and an
    /// existing file at `to` is replaced.
    pub fn move_file(&self, from: &str, to: &str) -> Result<()> {
        let from_path = key::resolve(self.root(), from)?;
        let to_path = key::resolve(self.root(), to)?;
        let fs = &self.inner.fs;

        let relocate = || -> io::Result<()> {
            if !fs.exists(&from_path) {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("source does not exist: {}", from),
                ));
            }
            if let Some(parent) = to_path.parent() {
                if !fs.is_dir(parent) {
                    fs.create_dir_all(parent)?;
                }
            }
            fs.rename(&from_path, &to_path)
        };

        relocate().map_err(|source| {
            tracing::warn!(from, to, error = %source, "move failed");
            StorageError::MoveFailed {
                from: from.to_string(),
                to: to.to_string(),
                source,
            }
        })?;

        tracing::debug!(from, to, "moved");
        Ok(())
    }

    // =========================================================================
    // Async Operations
    // =========================================================================

    /// Queue `op` on the lane and call `handler` with its result, on the worker
    ///
    /// Fails only if the lane refuses the job, in which case `handler` is
    /// never called.
    pub fn execute<T, Op, H>(&self, op: Op, handler: H) -> Result<()>
    where
        T: Send + 'static,
        Op: FnOnce(&Self) -> Result<T> + Send + 'static,
        H: FnOnce(Result<T>) + Send + 'static,
    {
        let store = self.clone();
        self.lane.submit(Box::new(move || handler(op(&store))))
    }

    pub fn save_async(&self, key: impl Into<String>, value: impl Into<Bytes>) -> Ticket<()> {
        let key = key.into();
        let value = value.into();
        self.spawn(move |store| store.save(&key, &value))
    }

    pub fn fetch_async(&self, key: impl Into<String>) -> Ticket<Vec<u8>> {
        let key = key.into();
        self.spawn(move |store| store.fetch(&key))
    }

    pub fn list_files_async(&self, dir: impl Into<String>) -> Ticket<Vec<String>> {
        let dir = dir.into();
        self.spawn(move |store| store.list_files(&dir))
    }

    pub fn remove_files_async<I, S>(&self, keys: I) -> Ticket<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        self.spawn(move |store| store.remove_files(keys.as_slice()))
    }

    pub fn move_file_async(&self, from: impl Into<String>, to: impl Into<String>) -> Ticket<()> {
        let from = from.into();
        let to = to.into();
        self.spawn(move |store| store.move_file(&from, &to))
    }

    /// `execute` with the result routed into a ticket
    pub(crate) fn spawn<T, Op>(&self, op: Op) -> Ticket<T>
    where
        T: Send + 'static,
        Op: FnOnce(&Self) -> Result<T> + Send + 'static,
    {
        let (sender, ticket) = Ticket::pair();
        let handler = move |result| {
            // Caller may have dropped the ticket; the work is done either way
            let _ = sender.send(result);
        };

        match self.execute(op, handler) {
            Ok(()) => ticket,
            Err(e) => Ticket::ready(Err(e)),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the storage root
    pub fn root(&self) -> &Path {
        &self.inner.config.data_dir
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the filesystem backend
    pub fn filesystem(&self) -> &F {
        &self.inner.fs
    }

    /// A view of this store that can only read
    pub fn read_only(&self) -> ReadOnlyStore<Self> {
        ReadOnlyStore::new(self.clone())
    }
}

impl<F: FileSystem> ReadableStore for DiskStore<F> {
    fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        DiskStore::fetch(self, key)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        DiskStore::contains(self, key)
    }
}

impl<F: FileSystem> WritableStore for DiskStore<F> {
    fn save(&self, key: &str, value: &[u8]) -> Result<()> {
        DiskStore::save(self, key, value)
    }
}

impl<F: FileSystem> fmt::Debug for DiskStore<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiskStore")
            .field("root", &self.root())
            .finish_non_exhaustive()
    }
}
