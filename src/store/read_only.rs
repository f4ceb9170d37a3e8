//! Read-only view over a store

use crate::error::Result;
use crate::fs::FileSystem;
use crate::lane::Ticket;

use super::{DiskStore, ReadableStore};

/// Wraps a store and exposes only its read capability
#[derive(Debug, Clone)]
pub struct ReadOnlyStore<S> {
    inner: S,
}

impl<S> ReadOnlyStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ReadableStore> ReadableStore for ReadOnlyStore<S> {
    fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        self.inner.fetch(key)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        self.inner.contains(key)
    }
}

/// Listing is a read too, so the disk view keeps it
impl<F: FileSystem> ReadOnlyStore<DiskStore<F>> {
    pub fn list_files(&self, dir: &str) -> Result<Vec<String>> {
        self.inner.list_files(dir)
    }

    pub fn fetch_async(&self, key: impl Into<String>) -> Ticket<Vec<u8>> {
        self.inner.fetch_async(key)
    }

    pub fn list_files_async(&self, dir: impl Into<String>) -> Ticket<Vec<String>> {
        self.inner.list_files_async(dir)
    }
}
