//! Durable client-side storage.
//!
//! A per-user directory of small JSON documents with browser-local-storage
//! semantics. The in-memory state is always authoritative; these files are
//! a persistence mirror rewritten synchronously after each mutation and
//! hydrated once at startup.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Cart line list, rewritten after every cart mutation.
pub const CART_FILE: &str = "cart.json";

/// Bearer token captured at admin login.
pub const TOKEN_FILE: &str = "token.json";

/// Reference to the most recently submitted order.
pub const LAST_ORDER_FILE: &str = "last_order.json";

/// Snapshot of the last successful dishes fetch; stale fallback only.
pub const DISHES_FILE: &str = "dishes.json";

/// Snapshot of the last successful orders fetch; stale fallback only.
pub const ORDERS_FILE: &str = "orders.json";

/// Handle on the storage directory.
#[derive(Debug, Clone)]
pub struct ClientStorage {
    dir: PathBuf,
}

impl ClientStorage {
    /// Opens (and creates if needed) the storage directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();

        fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    /// Reads one document. A missing file or a payload that fails to parse
    /// is `None`, never an error: malformed persisted state is treated as
    /// absent state.
    #[must_use]
    pub fn read<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let bytes = match fs::read(self.path(name)) {
            Ok(bytes) => bytes,
            Err(error) => {
                if error.kind() != ErrorKind::NotFound {
                    debug!(name, %error, "unreadable storage document");
                }
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(error) => {
                debug!(name, %error, "discarding malformed storage document");
                None
            }
        }
    }

    /// Rewrites one document in full.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the write fails.
    pub fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(value)?;

        fs::write(self.path(name), bytes)?;

        Ok(())
    }

    /// Removes one document; missing files are fine.
    ///
    /// # Errors
    ///
    /// Returns an error when the removal itself fails.
    pub fn remove(&self, name: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(name)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// The storage directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Errors from the durable storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure.
    #[error("storage i/o error")]
    Io(#[from] std::io::Error),

    /// Serialization failure while writing a document.
    #[error("storage encoding error")]
    Encode(#[from] serde_json::Error),
}
