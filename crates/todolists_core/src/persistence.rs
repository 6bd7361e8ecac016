//! Snapshot codec and best-effort load/save of the list collection.
//!
//! # Responsibility
//! - Encode/decode the collection as a JSON array of lists.
//! - Absorb missing, corrupt or unreadable snapshots into an empty collection.
//!
//! # Invariants
//! - `load_lists` never fails; every degraded path is logged.
//! - `decode_lists(encode_lists(x)) == x` for every collection.

use crate::model::list::TodoList;
use crate::storage::{KeyValueStorage, StorageError, StorageResult};
use log::{debug, error, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from decoding a persisted snapshot.
#[derive(Debug)]
pub enum SnapshotError {
    /// Stored text is not a JSON array of lists.
    Malformed(serde_json::Error),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "malformed lists snapshot: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
        }
    }
}

/// Serializes the collection to its persisted JSON text.
pub fn encode_lists(lists: &[TodoList]) -> StorageResult<String> {
    serde_json::to_string(lists).map_err(StorageError::Encode)
}

/// Parses persisted JSON text into a collection.
pub fn decode_lists(raw: &str) -> Result<Vec<TodoList>, SnapshotError> {
    serde_json::from_str(raw).map_err(SnapshotError::Malformed)
}

/// Reads the collection stored under `key`, falling back to empty.
pub fn load_lists<S: KeyValueStorage + ?Sized>(storage: &S, key: &str) -> Vec<TodoList> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("event=lists_load module=storage status=ok reason=absent");
            return Vec::new();
        }
        Err(err) => {
            error!(
                "event=lists_load module=storage status=error error_code=storage_read_failed error={err}"
            );
            return Vec::new();
        }
    };

    match decode_lists(&raw) {
        Ok(lists) => {
            debug!(
                "event=lists_load module=storage status=ok list_count={}",
                lists.len()
            );
            lists
        }
        Err(err) => {
            warn!(
                "event=lists_load module=storage status=error error_code=snapshot_malformed error={err}"
            );
            Vec::new()
        }
    }
}

/// Writes the collection under `key`.
pub fn save_lists<S: KeyValueStorage + ?Sized>(
    storage: &S,
    key: &str,
    lists: &[TodoList],
) -> StorageResult<()> {
    let encoded = encode_lists(lists)?;
    storage.set(key, &encoded)
}
