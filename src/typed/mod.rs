//! Typed Module
//!
//! Structured values on top of a byte store.
//!
//! ## Responsibilities
//! - Encode a serde value and save the bytes under a key
//! - Fetch the bytes and decode them back into the requested type
//!
//! The store never looks at the bytes; the codec never touches the disk.
//! ```text
//!   T ──Codec::encode──► Vec<u8> ──WritableStore::save──► root/key
//!   T ◄─Codec::decode─── Vec<u8> ◄─ReadableStore::fetch── root/key
//! ```

mod codec;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StorageError};
use crate::fs::FileSystem;
use crate::lane::Ticket;
use crate::store::{DiskStore, ReadableStore, WritableStore};

pub use codec::{BincodeCodec, Codec, JsonCodec};

/// Serializes values through a codec into a wrapped byte store
///
/// Works over any store: wrap a `ReadOnlyStore` and only `fetch` is
/// available.
#[derive(Debug, Clone)]
pub struct TypedStore<S, C = JsonCodec> {
    store: S,
    codec: C,
}

impl<S> TypedStore<S, JsonCodec> {
    /// Typed store using compact JSON
    pub fn new(store: S) -> Self {
        Self::with_codec(store, JsonCodec::new())
    }
}

impl<S, C: Codec> TypedStore<S, C> {
    pub fn with_codec(store: S, codec: C) -> Self {
        Self { store, codec }
    }

    /// Get the wrapped byte store
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: WritableStore, C: Codec> TypedStore<S, C> {
    /// Encode `value` and save it under `key`
    pub fn save<T: Serialize + ?Sized>(&self, value: &T, key: &str) -> Result<()> {
        let bytes = encode(&self.codec, value, key)?;
        self.store.save(key, &bytes)
    }
}

impl<S: ReadableStore, C: Codec> TypedStore<S, C> {
    /// Fetch the bytes under `key` and decode them as `T`
    pub fn fetch<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let bytes = self.store.fetch(key)?;
        decode(&self.codec, &bytes, key)
    }

    pub fn contains(&self, key: &str) -> Result<bool> {
        self.store.contains(key)
    }
}

/// Async forms ride the disk store's lane, so they are ordered with the
/// byte-level async calls of the same store.
impl<F: FileSystem, C: Codec + Clone + 'static> TypedStore<DiskStore<F>, C> {
    /// Encode now, write on the lane
    ///
    /// An encode failure comes back through the ticket, like any other.
    pub fn save_async<T: Serialize + ?Sized>(&self, value: &T, key: impl Into<String>) -> Ticket<()> {
        let key = key.into();
        match encode(&self.codec, value, &key) {
            Ok(bytes) => self.store.save_async(key, bytes),
            Err(e) => Ticket::ready(Err(e)),
        }
    }

    /// Fetch and decode on the lane
    pub fn fetch_async<T>(&self, key: impl Into<String>) -> Ticket<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let key = key.into();
        let codec = self.codec.clone();
        self.store.spawn(move |store| {
            let bytes = store.fetch(&key)?;
            decode(&codec, &bytes, &key)
        })
    }
}

fn encode<C: Codec, T: Serialize + ?Sized>(codec: &C, value: &T, key: &str) -> Result<Vec<u8>> {
    codec.encode(value).map_err(|source| {
        tracing::warn!(key, error = %source, "encode failed");
        StorageError::EncodeFailed {
            key: key.to_string(),
            source,
        }
    })
}

fn decode<C: Codec, T: DeserializeOwned>(codec: &C, bytes: &[u8], key: &str) -> Result<T> {
    codec.decode(bytes).map_err(|source| {
        tracing::warn!(key, error = %source, "decode failed");
        StorageError::DecodeFailed {
            key: key.to_string(),
            source,
        }
    })
}
