// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the editor core.

use crate::models::hotspot::HotspotId;

/// Failure reported by a [`KeyValueStore`](crate::io::persistence::KeyValueStore) write.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to encode {key}: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage backend rejected write to {key}: {reason}")]
    Rejected { key: String, reason: String },
}

/// Errors raised by editor operations.
///
/// None of these are fatal: the session turns them into warnings and
/// leaves the working state untouched (or, for storage failures, already
/// updated in memory).
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Container has not been measured yet")]
    ContainerNotMeasured,

    #[error("No hotspot with id {0}")]
    UnknownHotspot(HotspotId),

    #[error("Invalid duration {0:?}: expected a whole number of seconds")]
    InvalidDuration(String),

    #[error("Hotspot {0} is published and locked for editing")]
    Locked(HotspotId),

    #[error("No hotspot is being placed")]
    NoDraft,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, EditorError>;
