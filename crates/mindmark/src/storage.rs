//! Persistence of the authoritative state.
//!
//! State is written as a single JSON blob under a configurable key through a
//! [`Storage`] backend. The blob is wrapped in a versioned envelope:
//!
//! ```json
//! { "version": 0, "state": { "children": [], "markdown": "", ... } }
//! ```
//!
//! Collapse flags are render-only and are stripped before writing unless the
//! storage configuration asks to keep them.

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use log::{debug, info};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mindmark_core::{
    geometry::Viewport, node::DiagramNode, preferences::StylePreferences, style::Theme,
};

use crate::{config::StorageConfig, state::AuthoritativeState};

/// Version written into new envelopes.
pub const STATE_VERSION: u32 = 0;

/// Errors raised by storage backends and the state codec.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot access `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot encode state: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("stored state under `{key}` is corrupt: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored state has unsupported version {0}")]
    UnsupportedVersion(u32),

    #[error("invalid storage key `{0}`")]
    InvalidKey(String),
}

/// A key-value store for string blobs.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Returns the value under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the value under `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local storage backed by a map.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Storage keeping one `<key>.json` file per key in a directory.
///
/// The directory is created on the first write. Writes go to a temporary
/// file that is then renamed over the target, so a crash never leaves a
/// half-written blob behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\'])
            && !key.contains('\0');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(path: &Path, source: io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(&path, err)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| io_error(&self.dir, err))?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|err| io_error(&tmp, err))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|err| io_error(&path, err))?;

        debug!(path:? = path, bytes = value.len(); "Wrote state file");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(&path, err)),
        }
    }
}

/// The persisted form of [`AuthoritativeState`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub children: Vec<DiagramNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub markdown: String,
    #[serde(default)]
    pub preferences: StylePreferences,
}

impl PersistedState {
    /// Captures `state`, stripping collapse flags unless `keep_collapsed` is set.
    pub fn capture(state: &AuthoritativeState, keep_collapsed: bool) -> Self {
        let children = if keep_collapsed {
            state.children().to_vec()
        } else {
            state
                .children()
                .iter()
                .map(DiagramNode::without_collapse)
                .collect()
        };

        Self {
            children,
            viewport: state.viewport(),
            theme: state.theme(),
            markdown: state.markdown().to_string(),
            preferences: state.preferences().clone(),
        }
    }

    pub fn into_state(self) -> AuthoritativeState {
        AuthoritativeState::new(
            self.children,
            self.viewport,
            self.theme,
            self.markdown,
            self.preferences,
        )
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    state: &'a PersistedState,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    state: serde_json::Value,
}

/// Encodes `state` into a versioned JSON blob.
pub fn encode_state(state: &PersistedState) -> Result<String, StorageError> {
    serde_json::to_string(&EnvelopeRef {
        version: STATE_VERSION,
        state,
    })
    .map_err(StorageError::Encode)
}

/// Decodes a blob written by [`encode_state`].
pub fn decode_state(key: &str, blob: &str) -> Result<PersistedState, StorageError> {
    let decode_err = |source| StorageError::Decode {
        key: key.to_string(),
        source,
    };

    let envelope: Envelope = serde_json::from_str(blob).map_err(decode_err)?;
    if envelope.version != STATE_VERSION {
        return Err(StorageError::UnsupportedVersion(envelope.version));
    }
    serde_json::from_value(envelope.state).map_err(decode_err)
}

/// Writes `state` to `storage` under the configured key.
pub async fn save_state(
    storage: &dyn Storage,
    config: &StorageConfig,
    state: &AuthoritativeState,
) -> Result<(), StorageError> {
    let persisted = PersistedState::capture(state, config.persist_collapsed());
    let blob = encode_state(&persisted)?;
    storage.set(config.key(), &blob).await?;
    info!(key = config.key(), roots = persisted.children.len(); "Saved state");
    Ok(())
}

/// Reads the state stored under the configured key.
///
/// Returns `None` when nothing has been stored yet.
pub async fn load_state(
    storage: &dyn Storage,
    config: &StorageConfig,
) -> Result<Option<AuthoritativeState>, StorageError> {
    let Some(blob) = storage.get(config.key()).await? else {
        debug!(key = config.key(); "No stored state");
        return Ok(None);
    };
    let persisted = decode_state(config.key(), &blob)?;
    info!(key = config.key(), roots = persisted.children.len(); "Loaded state");
    Ok(Some(persisted.into_state()))
}

/// Removes the stored state.
pub async fn clear_state(storage: &dyn Storage, config: &StorageConfig) -> Result<(), StorageError> {
    storage.remove(config.key()).await?;
    info!(key = config.key(); "Cleared stored state");
    Ok(())
}
