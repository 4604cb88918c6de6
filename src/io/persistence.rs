// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Key-value persistence of published hotspots.
//!
//! Two keys are used:
//! - `savedRectangles`: JSON object mapping hotspot id to a record
//!   `{x, y, width, height, rotate?, type?, time?, duration?, url}`, with
//!   keys written in mirror order.
//! - `disabledRectangles`: JSON array of published hotspot ids.
//!
//! Reading is lenient. Missing or malformed values load as "nothing saved",
//! bad records are skipped, and the positional keys written by older
//! versions ("0", "1", ...) are re-keyed with fresh ids. Those older records
//! hold container pixels rather than percentages; their ids are reported in
//! [`Snapshot::legacy`] so the store can convert them once the container has
//! a size.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StorageError;
use crate::models::hotspot::{Hotspot, HotspotId, HotspotKind};
use crate::util::geometry::Rect;

/// Key holding the persisted hotspot mirror.
pub const SAVED_KEY: &str = "savedRectangles";
/// Key holding the published marker set.
pub const PUBLISHED_KEY: &str = "disabledRectangles";

/// External get/set-by-key string store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
}

/// In-memory store. Clones share the same entries.
///
/// The application keeps one handle to copy entries into `eframe`'s storage
/// when the framework asks it to save.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with the hotspot keys found in `eframe`'s storage.
    pub fn from_eframe(storage: Option<&dyn eframe::Storage>) -> Self {
        let store = Self::new();
        if let Some(storage) = storage {
            let mut entries = store.entries.borrow_mut();
            for key in [SAVED_KEY, PUBLISHED_KEY] {
                if let Some(value) = storage.get_string(key) {
                    entries.insert(key.to_string(), value);
                }
            }
        }
        store
    }

    /// Copy every entry into `eframe`'s storage.
    pub fn flush_into(&self, storage: &mut dyn eframe::Storage) {
        for (key, value) in self.entries.borrow().iter() {
            storage.set_string(key, value.clone());
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

/// Persisted form of a hotspot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotRecord {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default)]
    pub url: String,
}

impl From<&Hotspot> for HotspotRecord {
    fn from(hotspot: &Hotspot) -> Self {
        let (time, duration) = match hotspot.kind {
            HotspotKind::Static => (None, None),
            HotspotKind::Dynamic {
                activation_time,
                duration,
            } => (Some(activation_time), Some(duration)),
        };
        Self {
            x: hotspot.rect.x,
            y: hotspot.rect.y,
            width: hotspot.rect.width,
            height: hotspot.rect.height,
            rotate: (hotspot.rotation != 0.0).then_some(hotspot.rotation),
            kind: Some(hotspot.kind.label().to_string()),
            time,
            duration,
            url: hotspot.url.clone(),
        }
    }
}

impl HotspotRecord {
    /// Rebuild the hotspot this record was written from.
    pub fn to_hotspot(&self, id: HotspotId, published: bool) -> Hotspot {
        let kind = match self.kind.as_deref() {
            Some("dynamic") => HotspotKind::Dynamic {
                activation_time: self.time.unwrap_or(0.0),
                duration: self.duration.unwrap_or(0),
            },
            _ => HotspotKind::Static,
        };
        Hotspot {
            id,
            rect: Rect::new(self.x, self.y, self.width, self.height),
            rotation: self.rotate.unwrap_or(0.0),
            kind,
            url: self.url.clone(),
            published,
        }
    }
}

/// Everything read back from the two persisted keys.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub saved: Vec<(HotspotId, HotspotRecord)>,
    pub published: BTreeSet<HotspotId>,
    /// Records re-keyed from positional keys, still in container pixels.
    pub legacy: BTreeSet<HotspotId>,
}

/// Read and decode both keys from `backend`.
pub fn read_snapshot(backend: &dyn KeyValueStore) -> Snapshot {
    let mut snapshot = Snapshot::default();
    let mut ids_by_key: HashMap<String, HotspotId> = HashMap::new();

    for (key, value) in saved_entries(backend) {
        let record = match serde_json::from_value::<HotspotRecord>(value) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping malformed saved hotspot {}: {}", key, e);
                continue;
            }
        };
        let id = key.parse().unwrap_or_else(|_| {
            let id = HotspotId::new();
            log::info!("Re-keyed legacy saved hotspot {} as {}", key, id);
            snapshot.legacy.insert(id);
            id
        });
        ids_by_key.insert(key, id);
        snapshot.saved.push((id, record));
    }

    for key in published_keys(backend) {
        match ids_by_key.get(&key) {
            Some(id) => {
                snapshot.published.insert(*id);
            }
            None => log::warn!("Dropping published marker {} with no saved hotspot", key),
        }
    }

    snapshot
}

fn parse_key(backend: &dyn KeyValueStore, key: &str) -> Option<Value> {
    let raw = backend.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring unreadable {}: {}", key, e);
            None
        }
    }
}

fn saved_entries(backend: &dyn KeyValueStore) -> Vec<(String, Value)> {
    match parse_key(backend, SAVED_KEY) {
        Some(Value::Object(map)) => map.into_iter().collect(),
        // Older versions overwrote the mirror with a plain array after a delete.
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            log::warn!("Ignoring {} of unexpected shape: {}", SAVED_KEY, other);
            Vec::new()
        }
    }
}

fn published_keys(backend: &dyn KeyValueStore) -> Vec<String> {
    match parse_key(backend, PUBLISHED_KEY) {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                other => {
                    log::warn!("Ignoring published marker {}", other);
                    None
                }
            })
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            log::warn!("Ignoring {} of unexpected shape: {}", PUBLISHED_KEY, other);
            Vec::new()
        }
    }
}

/// Write the mirror as a JSON object, keys in slice order.
pub fn write_saved(
    backend: &mut dyn KeyValueStore,
    saved: &[(HotspotId, HotspotRecord)],
) -> Result<(), StorageError> {
    let mut map = serde_json::Map::new();
    for (id, record) in saved {
        let value = serde_json::to_value(record).map_err(|source| StorageError::Encode {
            key: SAVED_KEY,
            source,
        })?;
        map.insert(id.to_string(), value);
    }
    backend.set(SAVED_KEY, Value::Object(map).to_string())
}

/// Write the published marker set as a JSON array of ids.
pub fn write_published(
    backend: &mut dyn KeyValueStore,
    published: &BTreeSet<HotspotId>,
) -> Result<(), StorageError> {
    let ids: Vec<String> = published.iter().map(ToString::to_string).collect();
    let json = serde_json::to_string(&ids).map_err(|source| StorageError::Encode {
        key: PUBLISHED_KEY,
        source,
    })?;
    backend.set(PUBLISHED_KEY, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::Storage;

    fn store_with(saved: &str, published: &str) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.set(SAVED_KEY, saved.to_string()).unwrap();
        store.set(PUBLISHED_KEY, published.to_string()).unwrap();
        store
    }

    #[test]
    fn test_empty_store_loads_nothing() {
        let snapshot = read_snapshot(&MemoryStore::new());
        assert!(snapshot.saved.is_empty());
        assert!(snapshot.published.is_empty());
    }

    #[test]
    fn test_invalid_json_loads_nothing() {
        let snapshot = read_snapshot(&store_with("{not json", "also not"));
        assert!(snapshot.saved.is_empty());
        assert!(snapshot.published.is_empty());
    }

    #[test]
    fn test_write_then_read_keeps_order_and_markers() {
        let a = Hotspot::new(Rect::new(1.0, 2.0, 3.0, 4.0), HotspotKind::Static, "https://a");
        let mut b = Hotspot::new(
            Rect::new(5.0, 6.0, 7.0, 8.0),
            HotspotKind::Dynamic {
                activation_time: 3.0,
                duration: 4,
            },
            "https://b",
        );
        b.rotation = 45.0;
        let c = Hotspot::new(Rect::new(9.0, 9.0, 9.0, 9.0), HotspotKind::Static, "https://c");

        let saved: Vec<_> = [&c, &a, &b]
            .iter()
            .map(|h| (h.id, HotspotRecord::from(*h)))
            .collect();
        let published: BTreeSet<_> = [b.id].into_iter().collect();

        let mut store = MemoryStore::new();
        write_saved(&mut store, &saved).unwrap();
        write_published(&mut store, &published).unwrap();

        let snapshot = read_snapshot(&store);
        let ids: Vec<_> = snapshot.saved.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![c.id, a.id, b.id]);
        assert!(snapshot.legacy.is_empty());
        assert_eq!(snapshot.published, published);

        let restored = snapshot.saved[2].1.to_hotspot(b.id, true);
        assert_eq!(restored.kind, b.kind);
        assert_eq!(restored.rotation, 45.0);
        assert_eq!(restored.url, "https://b");
        assert!(restored.published);
    }

    #[test]
    fn test_record_omits_absent_fields() {
        let hotspot = Hotspot::new(Rect::new(1.0, 2.0, 3.0, 4.0), HotspotKind::Static, "u");
        let json = serde_json::to_value(HotspotRecord::from(&hotspot)).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("rotate"));
        assert!(!object.contains_key("time"));
        assert!(!object.contains_key("duration"));
        assert_eq!(object["type"], "static");
    }

    #[test]
    fn test_legacy_positional_layout_is_rekeyed() {
        let saved = r#"{
            "0": {"x": 10, "y": 20, "width": 200, "height": 100, "type": "static", "url": "https://a"},
            "1": {"x": 30, "y": 40, "width": 200, "height": 100, "rotate": 12.5,
                  "type": "dynamic", "time": 3.2, "duration": 4, "url": "https://b"}
        }"#;
        let snapshot = read_snapshot(&store_with(saved, "[1]"));

        assert_eq!(snapshot.saved.len(), 2);
        let (first, second) = (&snapshot.saved[0], &snapshot.saved[1]);
        assert_ne!(first.0, second.0);
        assert_eq!(first.1.url, "https://a");
        assert_eq!(second.1.rotate, Some(12.5));
        assert_eq!(snapshot.published.len(), 1);
        assert!(snapshot.published.contains(&second.0));
        assert!(snapshot.legacy.contains(&first.0) && snapshot.legacy.contains(&second.0));
    }

    #[test]
    fn test_legacy_array_mirror_and_bad_records() {
        let saved = r#"[
            {"x": 1, "y": 1, "width": 10, "height": 10, "url": "ok"},
            {"x": "bad"}
        ]"#;
        let snapshot = read_snapshot(&store_with(saved, r#"["7", null]"#));
        assert_eq!(snapshot.saved.len(), 1);
        assert_eq!(snapshot.saved[0].1.url, "ok");
        assert!(snapshot.published.is_empty());
    }

    /// Stand-in for the framework's on-disk storage.
    #[derive(Default)]
    struct FakeStorage(HashMap<String, String>);

    impl Storage for FakeStorage {
        fn get_string(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }

        fn set_string(&mut self, key: &str, value: String) {
            self.0.insert(key.to_string(), value);
        }

        fn flush(&mut self) {}
    }

    #[test]
    fn test_eframe_storage_roundtrip() {
        let mut disk = FakeStorage::default();
        disk.set_string(SAVED_KEY, "{}".to_string());
        disk.set_string("window", "unrelated".to_string());

        let mut store = MemoryStore::from_eframe(Some(&disk as &dyn Storage));
        assert_eq!(store.get(SAVED_KEY).as_deref(), Some("{}"));
        assert!(store.get(PUBLISHED_KEY).is_none());
        assert!(store.get("window").is_none());

        let hotspot = Hotspot::new(Rect::new(1.0, 2.0, 3.0, 4.0), HotspotKind::Static, "u");
        write_saved(&mut store, &[(hotspot.id, HotspotRecord::from(&hotspot))]).unwrap();
        write_published(&mut store, &[hotspot.id].into_iter().collect()).unwrap();
        store.flush_into(&mut disk);

        assert_eq!(disk.get_string("window").as_deref(), Some("unrelated"));
        let reread = MemoryStore::from_eframe(Some(&disk as &dyn Storage));
        let snapshot = read_snapshot(&reread);
        assert_eq!(snapshot.saved.len(), 1);
        assert_eq!(snapshot.saved[0].0, hotspot.id);
        assert!(snapshot.published.contains(&hotspot.id));
    }

    #[test]
    fn test_missing_eframe_storage_is_empty() {
        let store = MemoryStore::from_eframe(None);
        assert!(store.get(SAVED_KEY).is_none());
    }

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        writer.set("k", "v".to_string()).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }
}
