//! # Larder
//!
//! A minimal disk-backed key-value store for application save data:
//! - One file per key under a fixed root (`root/saves/slot1`)
//! - Atomic per-key writes (temp file + rename)
//! - Blocking API plus a serial per-store worker lane for async calls
//! - A typed layer that encodes serde values (JSON by default)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 TypedStore<S, C: Codec>                      │
//! │              (JsonCodec / BincodeCodec)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ ReadableStore / WritableStore
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  DiskStore<F: FileSystem>                    │
//! │        (save / fetch / list / remove / move, *_async)        │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │   FileSystem    │                │      Lane       │
//!   │ (Os / Memory)   │                │(Worker / Inline)│
//!   └─────────────────┘                └─────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use larder::{DiskStore, TypedStore};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Progress {
//!     level: u32,
//! }
//!
//! # fn main() -> larder::Result<()> {
//! let store = DiskStore::open_path("./saves")?;
//! store.save("raw/blob", b"\x00\x01")?;
//!
//! let typed = TypedStore::new(store.clone());
//! typed.save(&Progress { level: 3 }, "slot1")?;
//! let progress: Progress = typed.fetch("slot1")?;
//!
//! let pending = store.fetch_async("raw/blob");
//! assert_eq!(pending.wait()?, b"\x00\x01");
//! # let _ = progress;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod fs;
pub mod key;
pub mod lane;
pub mod store;
pub mod typed;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CodecError, ErrorKind, Result, StorageError};
pub use config::Config;
pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use lane::{InlineLane, Lane, Ticket, WorkerLane};
pub use store::{DiskStore, ReadOnlyStore, ReadableStore, Store, WritableStore};
pub use typed::{BincodeCodec, Codec, JsonCodec, TypedStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Larder
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
