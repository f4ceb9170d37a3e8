//! Configuration for Larder
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a store instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Storage root. Every key resolves to a file beneath it:
    ///   {data_dir}/
    ///     ├── settings          (key "settings")
    ///     └── saves/
    ///         └── slot1         (key "saves/slot1")
    pub data_dir: PathBuf,

    /// fsync the temp file before renaming it over the target
    pub sync_writes: bool,

    // -------------------------------------------------------------------------
    // Lane Configuration
    // -------------------------------------------------------------------------
    /// Max queued async jobs before `submit` blocks (None = unbounded)
    pub queue_capacity: Option<usize>,

    /// Name given to the worker thread
    pub lane_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./larder_data"),
            sync_writes: true,
            queue_capacity: None,
            lane_name: "larder-lane".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (storage root)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Enable or disable fsync before the atomic rename
    pub fn sync_writes(mut self, sync: bool) -> Self {
        self.config.sync_writes = sync;
        self
    }

    /// Bound the async queue; `submit` blocks while it is full
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = Some(capacity);
        self
    }

    /// Set the worker thread name
    pub fn lane_name(mut self, name: impl Into<String>) -> Self {
        self.config.lane_name = name.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
