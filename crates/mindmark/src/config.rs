//! Configuration types for a Mindmark session.
//!
//! This module provides configuration structures that control how the
//! synchronization engine behaves. All types implement
//! [`serde::Deserialize`] for loading from external sources such as TOML.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`SyncConfig`] - Timing of the debounced recompute pipeline.
//! - [`CanvasConfig`] - Defaults used when normalizing trees.
//! - [`StorageConfig`] - Key and content of the persisted state blob.
//!
//! # Example
//!
//! ```
//! # use mindmark::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.sync().debounce().as_millis(), 200);
//! assert_eq!(config.storage().key(), "mindmap-state");
//! ```

use std::time::Duration;

use serde::Deserialize;

use mindmark_core::{geometry::Point, normalize::DEFAULT_ANCHOR};

const DEFAULT_DEBOUNCE_MS: u64 = 200;
const DEFAULT_STORAGE_KEY: &str = "mindmap-state";

/// Top-level configuration for a Mindmark session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Recompute pipeline section.
    #[serde(default)]
    sync: SyncConfig,

    /// Tree normalization section.
    #[serde(default)]
    canvas: CanvasConfig,

    /// Persistence section.
    #[serde(default)]
    storage: StorageConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(sync: SyncConfig, canvas: CanvasConfig, storage: StorageConfig) -> Self {
        Self {
            sync,
            canvas,
            storage,
        }
    }

    /// Returns the recompute pipeline configuration.
    pub fn sync(&self) -> &SyncConfig {
        &self.sync
    }

    /// Returns the tree normalization configuration.
    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }

    /// Returns the persistence configuration.
    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }
}

/// Timing of the debounced recompute pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Quiet period after the last text change before the source is parsed.
    #[serde(default = "default_debounce_ms")]
    debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl SyncConfig {
    /// Creates a [`SyncConfig`] with the given quiet period.
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce_ms: u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Returns the quiet period.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Defaults applied when normalizing a tree for rendering.
#[derive(Debug, Clone, Deserialize)]
pub struct CanvasConfig {
    /// Anchor given to roots without a position, as `[x, y]`.
    #[serde(default = "default_anchor")]
    default_anchor: [f64; 2],
}

fn default_anchor() -> [f64; 2] {
    [DEFAULT_ANCHOR.x(), DEFAULT_ANCHOR.y()]
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            default_anchor: default_anchor(),
        }
    }
}

impl CanvasConfig {
    /// Returns the anchor given to roots without a position.
    pub fn default_anchor(&self) -> Point {
        Point::from(self.default_anchor)
    }
}

/// Key and content of the persisted state blob.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Name under which the state blob is stored.
    #[serde(default = "default_storage_key")]
    key: String,

    /// Keep collapse flags in stored trees instead of stripping them.
    #[serde(default)]
    persist_collapsed: bool,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
            persist_collapsed: false,
        }
    }
}

impl StorageConfig {
    /// Creates a [`StorageConfig`].
    pub fn new(key: impl Into<String>, persist_collapsed: bool) -> Self {
        Self {
            key: key.into(),
            persist_collapsed,
        }
    }

    /// Returns the storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns whether collapse flags are written to storage.
    pub fn persist_collapsed(&self) -> bool {
        self.persist_collapsed
    }
}
