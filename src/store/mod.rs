//! Store Module
//!
//! Byte-level key-value storage, one file per key.
//!
//! ## Responsibilities
//! - Atomic per-key writes, whole-file reads
//! - Listing, bulk removal and relocation of entries
//! - Blocking and lane-queued (async) forms of every operation
//!
//! ## Capabilities
//! ```text
//!   ReadableStore ──┐
//!                   ├──► Store (blanket)      DiskStore implements both
//!   WritableStore ──┘                         ReadOnlyStore exposes reads only
//! ```

mod disk;
mod read_only;

use std::sync::Arc;

use crate::error::Result;

pub use disk::DiskStore;
pub use read_only::ReadOnlyStore;

/// Read capability of a byte store
pub trait ReadableStore {
    /// Exact bytes last saved under `key`
    fn fetch(&self, key: &str) -> Result<Vec<u8>>;

    /// Whether a value exists under `key`
    fn contains(&self, key: &str) -> Result<bool>;
}

/// Write capability of a byte store
pub trait WritableStore {
    /// Create or fully replace the value under `key`
    fn save(&self, key: &str, value: &[u8]) -> Result<()>;
}

/// Full read/write store
pub trait Store: ReadableStore + WritableStore {}

impl<T: ReadableStore + WritableStore + ?Sized> Store for T {}

// =============================================================================
// Forwarding impls
// =============================================================================

impl<S: ReadableStore + ?Sized> ReadableStore for &S {
    fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        (**self).fetch(key)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}

impl<S: WritableStore + ?Sized> WritableStore for &S {
    fn save(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).save(key, value)
    }
}

impl<S: ReadableStore + ?Sized> ReadableStore for Arc<S> {
    fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        (**self).fetch(key)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}

impl<S: WritableStore + ?Sized> WritableStore for Arc<S> {
    fn save(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).save(key, value)
    }
}
