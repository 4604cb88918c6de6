// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Authoritative hotspot collection.
//!
//! The store owns the ordered working collection, the persisted mirror of
//! published geometry and the published marker set. Only `publish`,
//! `unlock` and `remove` write through to the backend; `add` and `update`
//! change the working collection alone.

use std::collections::BTreeSet;

use crate::error::{EditorError, Result};
use crate::io::persistence::{self, HotspotRecord, KeyValueStore};
use crate::models::hotspot::{Hotspot, HotspotId, HotspotPatch};
use crate::util::geometry::ContainerBounds;
use crate::util::gesture;

pub struct HotspotStore {
    hotspots: Vec<Hotspot>,
    /// Persisted records in insertion order.
    saved: Vec<(HotspotId, HotspotRecord)>,
    published: BTreeSet<HotspotId>,
    /// Loaded hotspots whose geometry is still in container pixels.
    legacy: BTreeSet<HotspotId>,
    backend: Box<dyn KeyValueStore>,
}

impl HotspotStore {
    /// Rebuild the store from whatever `backend` holds.
    ///
    /// Missing or unreadable data yields an empty store.
    pub fn load(backend: Box<dyn KeyValueStore>) -> Self {
        let snapshot = persistence::read_snapshot(backend.as_ref());
        let hotspots = snapshot
            .saved
            .iter()
            .map(|(id, record)| record.to_hotspot(*id, snapshot.published.contains(id)))
            .collect::<Vec<_>>();

        log::info!(
            "Loaded {} saved hotspots ({} published)",
            hotspots.len(),
            snapshot.published.len()
        );

        Self {
            hotspots,
            saved: snapshot.saved,
            published: snapshot.published,
            legacy: snapshot.legacy,
            backend,
        }
    }

    /// Whether some loaded hotspots still wait for [`Self::convert_legacy`].
    pub fn has_legacy(&self) -> bool {
        !self.legacy.is_empty()
    }

    /// Convert pixel-unit hotspots from older saves to percentages of
    /// `bounds` and rewrite storage.
    ///
    /// The converted boxes are clamped inside the container. Nothing changes
    /// while `bounds` is unmeasured. Returns how many hotspots were converted.
    pub fn convert_legacy(&mut self, bounds: &ContainerBounds) -> Result<usize> {
        if self.legacy.is_empty() {
            return Ok(0);
        }
        let local = ContainerBounds::new(0.0, 0.0, bounds.width, bounds.height);
        let full = ContainerBounds::new(0.0, 0.0, 100.0, 100.0);

        let mut converted = Vec::with_capacity(self.legacy.len());
        for hotspot in self.hotspots.iter().filter(|h| self.legacy.contains(&h.id)) {
            let percent = local.rect_to_percent(&hotspot.rect)?;
            converted.push((hotspot.id, gesture::clamp_into(&percent, &full)));
        }

        for (id, rect) in &converted {
            if let Some(hotspot) = self.hotspots.iter_mut().find(|h| h.id == *id) {
                hotspot.rect = *rect;
                let record = HotspotRecord::from(&*hotspot);
                if let Some((_, saved)) = self.saved.iter_mut().find(|(saved_id, _)| saved_id == id) {
                    *saved = record;
                }
            }
        }
        self.legacy.clear();
        log::info!("Converted {} hotspots from pixel geometry", converted.len());

        self.write_all()?;
        Ok(converted.len())
    }

    pub fn hotspots(&self) -> &[Hotspot] {
        &self.hotspots
    }

    pub fn get(&self, id: HotspotId) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| h.id == id)
    }

    pub fn len(&self) -> usize {
        self.hotspots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hotspots.is_empty()
    }

    /// Persisted records, in the order they are written.
    pub fn saved_records(&self) -> &[(HotspotId, HotspotRecord)] {
        &self.saved
    }

    /// Append a hotspot to the working collection.
    pub fn add(&mut self, mut hotspot: Hotspot) -> HotspotId {
        hotspot.published = false;
        let id = hotspot.id;
        self.hotspots.push(hotspot);
        id
    }

    /// Apply `patch` to one hotspot.
    pub fn update(&mut self, id: HotspotId, patch: &HotspotPatch) -> Result<&Hotspot> {
        let hotspot = self
            .hotspots
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or(EditorError::UnknownHotspot(id))?;
        hotspot.apply(patch);
        Ok(hotspot)
    }

    /// Commit a hotspot's current state to storage and mark it published.
    ///
    /// Publishing again overwrites the same mirror entry.
    pub fn publish(&mut self, id: HotspotId) -> Result<()> {
        let hotspot = self
            .hotspots
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or(EditorError::UnknownHotspot(id))?;
        hotspot.published = true;

        let record = HotspotRecord::from(&*hotspot);
        match self.saved.iter_mut().find(|(saved_id, _)| *saved_id == id) {
            Some((_, existing)) => *existing = record,
            None => self.saved.push((id, record)),
        }
        self.published.insert(id);

        self.write_all()
    }

    /// Clear the published marker so the hotspot can be edited again.
    ///
    /// The last published geometry stays in the mirror until the next
    /// publish or removal.
    pub fn unlock(&mut self, id: HotspotId) -> Result<()> {
        let hotspot = self
            .hotspots
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or(EditorError::UnknownHotspot(id))?;
        hotspot.published = false;
        self.published.remove(&id);

        persistence::write_published(self.backend.as_mut(), &self.published)?;
        Ok(())
    }

    /// Delete a hotspot from the working collection and from storage.
    pub fn remove(&mut self, id: HotspotId) -> Result<Hotspot> {
        let index = self
            .hotspots
            .iter()
            .position(|h| h.id == id)
            .ok_or(EditorError::UnknownHotspot(id))?;
        let removed = self.hotspots.remove(index);
        self.saved.retain(|(saved_id, _)| *saved_id != id);
        self.published.remove(&id);
        self.legacy.remove(&id);

        self.write_all()?;
        Ok(removed)
    }

    fn write_all(&mut self) -> Result<()> {
        let saved = persistence::write_saved(self.backend.as_mut(), &self.saved);
        let published = persistence::write_published(self.backend.as_mut(), &self.published);
        saved.and(published)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::io::persistence::{MemoryStore, PUBLISHED_KEY, SAVED_KEY};
    use crate::models::hotspot::HotspotKind;
    use crate::util::geometry::Rect;

    const EPS: f64 = 1e-9;

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, key: &str, _value: String) -> std::result::Result<(), StorageError> {
            Err(StorageError::Rejected {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            })
        }
    }

    fn hotspot(url: &str) -> Hotspot {
        Hotspot::new(Rect::new(10.0, 10.0, 20.0, 20.0), HotspotKind::Static, url)
    }

    #[test]
    fn test_add_and_update_do_not_persist() {
        let backend = MemoryStore::new();
        let mut store = HotspotStore::load(Box::new(backend.clone()));

        let id = store.add(hotspot("https://a"));
        store
            .update(id, &HotspotPatch::rotation(30.0))
            .unwrap();

        assert_eq!(store.get(id).unwrap().rotation, 30.0);
        assert!(backend.get(SAVED_KEY).is_none());
        assert!(backend.get(PUBLISHED_KEY).is_none());
    }

    #[test]
    fn test_publish_is_idempotent() {
        let backend = MemoryStore::new();
        let mut store = HotspotStore::load(Box::new(backend.clone()));
        let id = store.add(hotspot("https://a"));

        store.publish(id).unwrap();
        let saved_once = backend.get(SAVED_KEY).unwrap();
        let published_once = backend.get(PUBLISHED_KEY).unwrap();

        store.publish(id).unwrap();
        assert_eq!(backend.get(SAVED_KEY).unwrap(), saved_once);
        assert_eq!(backend.get(PUBLISHED_KEY).unwrap(), published_once);
        assert_eq!(store.saved_records().len(), 1);
        assert!(store.get(id).unwrap().published);
    }

    #[test]
    fn test_reload_restores_published_in_order() {
        let backend = MemoryStore::new();
        let mut store = HotspotStore::load(Box::new(backend.clone()));
        let a = store.add(hotspot("https://a"));
        let b = store.add(hotspot("https://b"));
        let draft = store.add(hotspot("https://draft"));
        store.publish(b).unwrap();
        store.publish(a).unwrap();

        let reloaded = HotspotStore::load(Box::new(backend.clone()));
        let urls: Vec<_> = reloaded.hotspots().iter().map(|h| h.url.as_str()).collect();
        assert_eq!(urls, vec!["https://b", "https://a"]);
        assert!(reloaded.hotspots().iter().all(|h| h.published));
        assert!(reloaded.get(draft).is_none());
    }

    #[test]
    fn test_remove_clears_mirror_and_marker() {
        let backend = MemoryStore::new();
        let mut store = HotspotStore::load(Box::new(backend.clone()));
        let a = store.add(hotspot("https://a"));
        let b = store.add(hotspot("https://b"));
        store.publish(a).unwrap();
        store.publish(b).unwrap();

        let removed = store.remove(a).unwrap();
        assert_eq!(removed.url, "https://a");

        // A new hotspot never inherits the removed one's marker.
        let c = store.add(hotspot("https://c"));
        assert!(!store.get(c).unwrap().published);

        let reloaded = HotspotStore::load(Box::new(backend));
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.hotspots()[0].id, b);
        assert!(reloaded.hotspots()[0].published);
    }

    #[test]
    fn test_unlock_keeps_mirror() {
        let backend = MemoryStore::new();
        let mut store = HotspotStore::load(Box::new(backend.clone()));
        let id = store.add(hotspot("https://a"));
        store.publish(id).unwrap();
        store.unlock(id).unwrap();

        let reloaded = HotspotStore::load(Box::new(backend));
        assert_eq!(reloaded.len(), 1);
        assert!(!reloaded.hotspots()[0].published);
    }

    #[test]
    fn test_unknown_ids_are_reported() {
        let mut store = HotspotStore::load(Box::new(MemoryStore::new()));
        let ghost = HotspotId::new();
        assert!(matches!(
            store.update(ghost, &HotspotPatch::default()),
            Err(EditorError::UnknownHotspot(id)) if id == ghost
        ));
        assert!(matches!(store.publish(ghost), Err(EditorError::UnknownHotspot(_))));
        assert!(matches!(store.remove(ghost), Err(EditorError::UnknownHotspot(_))));
    }

    #[test]
    fn test_write_failure_still_updates_memory() {
        let mut store = HotspotStore::load(Box::new(FailingStore));
        let id = store.add(hotspot("https://a"));

        assert!(matches!(store.publish(id), Err(EditorError::Storage(_))));
        assert!(store.get(id).unwrap().published);
    }

    #[test]
    fn test_pixel_records_convert_once_measured() {
        let mut backend = MemoryStore::new();
        backend
            .set(
                SAVED_KEY,
                r#"{"0": {"x": 310, "y": 220, "width": 200, "height": 100, "url": "https://a"},
                    "1": {"x": 100, "y": 30, "width": 80, "height": 60, "url": "https://b"}}"#
                    .to_string(),
            )
            .unwrap();
        backend.set(PUBLISHED_KEY, "[0]".to_string()).unwrap();

        let mut store = HotspotStore::load(Box::new(backend.clone()));
        assert!(store.has_legacy());

        let unmeasured = ContainerBounds::new(0.0, 0.0, 0.0, 0.0);
        assert!(matches!(
            store.convert_legacy(&unmeasured),
            Err(EditorError::ContainerNotMeasured)
        ));
        assert!(store.has_legacy());

        let bounds = ContainerBounds::new(50.0, 20.0, 400.0, 300.0);
        assert_eq!(store.convert_legacy(&bounds).unwrap(), 2);
        assert!(!store.has_legacy());

        // 200x100 px at (310, 220) overflows a 400x300 container.
        let first = store.hotspots()[0].rect;
        assert!((first.width - 50.0).abs() < EPS);
        assert!((first.x - 50.0).abs() < EPS);
        assert!(first.right() <= 100.0 + EPS && first.bottom() <= 100.0 + EPS);
        assert!(store.hotspots()[0].published);

        let second = store.hotspots()[1].rect;
        assert!((second.x - 25.0).abs() < EPS);
        assert!((second.y - 10.0).abs() < EPS);
        assert!((second.width - 20.0).abs() < EPS);
        assert!((second.height - 20.0).abs() < EPS);

        // Storage now holds percentages under stable ids.
        let reloaded = HotspotStore::load(Box::new(backend));
        assert!(!reloaded.has_legacy());
        assert_eq!(reloaded.hotspots()[1].id, store.hotspots()[1].id);
        assert!((reloaded.hotspots()[0].rect.width - 50.0).abs() < EPS);
        assert_eq!(store.convert_legacy(&bounds).unwrap(), 0);
    }
}
