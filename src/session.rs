// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor session: the single owner of all editing state.
//!
//! The session wires pointer events to the gesture math and the hotspot
//! store, tracks the playback position, and switches between edit and view
//! mode. Everything runs on the UI thread inside one event or frame handler,
//! so there is no locking.
//!
//! Gestures form a small state machine:
//!
//! ```text
//! Idle --pointer_down(Move)--> Dragging --pointer_up/focus_lost--> Idle
//! Idle --pointer_down(Resize)--> Resizing --pointer_up/focus_lost--> Idle
//! Idle --pointer_down(Rotate)--> Rotating --pointer_up/focus_lost--> Idle
//! ```
//!
//! The hotspot id and its starting geometry are latched at pointer-down and
//! held until pointer-up.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::io::playback::PlaybackSource;
use crate::models::hotspot::{Hotspot, HotspotId, HotspotKind, HotspotPatch};
use crate::models::store::HotspotStore;
use crate::util::geometry::{ContainerBounds, Point, Rect, Size};
use crate::util::{gesture, visibility};

/// Editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Hotspots can be placed and edited; all are visible.
    Edit,
    /// Hotspots follow their time windows and clicks open their URLs.
    #[default]
    View,
}

/// Which control of a hotspot the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Move,
    Resize,
    Rotate,
}

/// In-progress pointer gesture. `start` is the pixel geometry at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Idle,
    Dragging {
        id: HotspotId,
        offset: Point,
        start: Rect,
    },
    Resizing {
        id: HotspotId,
        start: Rect,
    },
    Rotating {
        id: HotspotId,
        start: Rect,
    },
}

impl Gesture {
    pub fn hotspot(&self) -> Option<HotspotId> {
        match *self {
            Gesture::Idle => None,
            Gesture::Dragging { id, .. }
            | Gesture::Resizing { id, .. }
            | Gesture::Rotating { id, .. } => Some(id),
        }
    }

    fn start(&self) -> Option<Rect> {
        match *self {
            Gesture::Idle => None,
            Gesture::Dragging { start, .. }
            | Gesture::Resizing { start, .. }
            | Gesture::Rotating { start, .. } => Some(start),
        }
    }
}

/// Hotspot type chosen in the creation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindChoice {
    Static,
    Dynamic,
}

/// A hotspot placed on the canvas but not yet configured.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    /// Percent of the container.
    pub rect: Rect,
    /// Playback position when the container was clicked.
    pub captured_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Message for the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Parse a duration field into whole seconds. An empty field means zero.
pub fn parse_duration(text: &str) -> Result<u32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse()
        .map_err(|_| EditorError::InvalidDuration(text.to_string()))
}

pub struct EditorSession {
    store: HotspotStore,
    playback: Box<dyn PlaybackSource>,
    /// Latest position reported through `timeupdate`.
    current_time: Rc<Cell<f64>>,
    mode: Mode,
    gesture: Gesture,
    container: Option<ContainerBounds>,
    draft: Option<Draft>,
    pending_delete: Option<HotspotId>,
    notices: Vec<Notice>,
    min_size: Size,
    draft_size: Size,
}

impl EditorSession {
    pub fn new(
        store: HotspotStore,
        mut playback: Box<dyn PlaybackSource>,
        config: &EditorConfig,
    ) -> Self {
        let current_time = Rc::new(Cell::new(playback.current_time()));
        let sink = Rc::clone(&current_time);
        playback.on_time_update(Box::new(move |t| sink.set(t)));

        match config.start_mode {
            Mode::View => playback.play(),
            Mode::Edit => playback.pause(),
        }

        Self {
            store,
            playback,
            current_time,
            mode: config.start_mode,
            gesture: Gesture::Idle,
            container: None,
            draft: None,
            pending_delete: None,
            notices: Vec::new(),
            min_size: config.min_size(),
            draft_size: config.draft_size(),
        }
    }

    // =========================================================================
    // Mode & playback
    // =========================================================================

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch mode. View mode resumes playback, edit mode pauses it.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        self.pointer_up();
        self.mode = mode;
        match mode {
            Mode::View => {
                self.draft = None;
                self.pending_delete = None;
                self.playback.play();
            }
            Mode::Edit => self.playback.pause(),
        }
        log::info!("Entered {:?} mode", mode);
    }

    /// Playback position in seconds as of the last time update.
    pub fn current_time(&self) -> f64 {
        self.current_time.get()
    }

    pub fn is_paused(&self) -> bool {
        self.playback.is_paused()
    }

    pub fn duration(&self) -> Option<f64> {
        self.playback.duration()
    }

    /// Drive the playback source; call once per frame.
    pub fn tick(&mut self) {
        self.playback.poll();
    }

    pub fn toggle_playback(&mut self) {
        if self.playback.is_paused() {
            self.playback.play();
        } else {
            self.playback.pause();
        }
    }

    pub fn seek(&mut self, seconds: f64) {
        self.playback.seek(seconds);
    }

    // =========================================================================
    // Container & queries
    // =========================================================================

    /// Record the container's latest on-screen bounds.
    /// Record the container's layout. The first measured layout also
    /// converts pixel geometry loaded from older saves.
    pub fn set_container(&mut self, bounds: ContainerBounds) {
        self.container = Some(bounds);
        if bounds.is_measured() && self.store.has_legacy() {
            if let Err(e) = self.store.convert_legacy(&bounds) {
                self.report("Convert saved hotspots", e);
            }
        }
    }

    fn measured_container(&self) -> Result<ContainerBounds> {
        self.container
            .filter(ContainerBounds::is_measured)
            .ok_or(EditorError::ContainerNotMeasured)
    }

    pub fn hotspots(&self) -> &[Hotspot] {
        self.store.hotspots()
    }

    pub fn hotspot(&self, id: HotspotId) -> Option<&Hotspot> {
        self.store.get(id)
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn pending_delete(&self) -> Option<HotspotId> {
        self.pending_delete
    }

    pub fn is_visible(&self, hotspot: &Hotspot) -> bool {
        visibility::is_visible(&hotspot.kind, self.current_time(), self.mode == Mode::Edit)
    }

    /// Whether handles are shown and pointer-down starts a gesture.
    pub fn is_editable(&self, hotspot: &Hotspot) -> bool {
        self.mode == Mode::Edit && !hotspot.published
    }

    /// On-screen pixel geometry, once the container has been measured.
    pub fn pixel_rect(&self, hotspot: &Hotspot) -> Option<Rect> {
        let bounds = self.measured_container().ok()?;
        Some(bounds.rect_to_pixels(&hotspot.rect))
    }

    pub fn draft_pixel_rect(&self) -> Option<Rect> {
        let bounds = self.measured_container().ok()?;
        self.draft.as_ref().map(|d| bounds.rect_to_pixels(&d.rect))
    }

    /// Drain pending status messages.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, level: NoticeLevel, message: String) {
        self.notices.push(Notice { level, message });
    }

    fn report(&mut self, action: &str, err: EditorError) {
        match err {
            EditorError::Storage(e) => {
                log::error!("{}: {}", action, e);
                self.notify(
                    NoticeLevel::Error,
                    format!("{}: changes kept for this session but not saved ({})", action, e),
                );
            }
            other => {
                log::warn!("{}: {}", action, other);
                self.notify(NoticeLevel::Warning, format!("{}: {}", action, other));
            }
        }
    }

    // =========================================================================
    // Pointer gestures
    // =========================================================================

    /// Latch a gesture on `id`. Returns whether one started.
    pub fn pointer_down(&mut self, id: HotspotId, handle: Handle, pointer: Point) -> bool {
        if self.mode != Mode::Edit {
            return false;
        }
        let bounds = match self.measured_container() {
            Ok(bounds) => bounds,
            Err(e) => {
                log::debug!("Ignoring pointer-down: {}", e);
                return false;
            }
        };
        let Some(hotspot) = self.store.get(id) else {
            log::warn!("Pointer-down on unknown hotspot {}", id);
            return false;
        };
        if hotspot.published {
            return false;
        }

        let start = bounds.rect_to_pixels(&hotspot.rect);
        self.gesture = match handle {
            Handle::Move => Gesture::Dragging {
                id,
                offset: gesture::grab_offset(&start, pointer),
                start,
            },
            Handle::Resize => Gesture::Resizing { id, start },
            Handle::Rotate => Gesture::Rotating { id, start },
        };
        log::debug!("Started {:?} on hotspot {}", handle, id);
        true
    }

    /// Apply the latched gesture for a new pointer position.
    ///
    /// Deferred while the container is unmeasured.
    pub fn pointer_move(&mut self, pointer: Point) {
        let Some(id) = self.gesture.hotspot() else {
            return;
        };
        let bounds = match self.measured_container() {
            Ok(bounds) => bounds,
            Err(e) => {
                log::debug!("Deferring pointer-move: {}", e);
                return;
            }
        };
        let Some(hotspot) = self.store.get(id) else {
            log::warn!("Hotspot {} vanished mid-gesture", id);
            self.gesture = Gesture::Idle;
            return;
        };
        let current = bounds.rect_to_pixels(&hotspot.rect);

        let patch = match self.gesture {
            Gesture::Idle => return,
            Gesture::Dragging { offset, .. } => {
                let moved = gesture::move_to(&current, pointer, offset, &bounds);
                bounds.rect_to_percent(&moved).map(HotspotPatch::rect)
            }
            Gesture::Resizing { .. } => {
                let resized = gesture::resize_to(&current, pointer, self.min_size, &bounds);
                bounds.rect_to_percent(&resized).map(HotspotPatch::rect)
            }
            Gesture::Rotating { .. } => Ok(HotspotPatch::rotation(gesture::rotate_to(&current, pointer))),
        };

        let result = patch.and_then(|patch| self.store.update(id, &patch).map(|_| ()));
        if let Err(e) = result {
            self.gesture = Gesture::Idle;
            self.report("Gesture cancelled", e);
        }
    }

    /// End any gesture. Always returns to idle.
    pub fn pointer_up(&mut self) {
        if let (Some(id), Some(start)) = (self.gesture.hotspot(), self.gesture.start()) {
            if let Some(end) = self.store.get(id).and_then(|h| self.pixel_rect(h)) {
                log::debug!("Finished gesture on {}: {:?} -> {:?}", id, start, end);
            }
        }
        self.gesture = Gesture::Idle;
    }

    /// Losing window focus ends the gesture like a pointer release.
    pub fn focus_lost(&mut self) {
        if self.gesture != Gesture::Idle {
            log::debug!("Focus lost during gesture");
        }
        self.pointer_up();
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Place a draft hotspot centred on `pointer` and pause playback.
    ///
    /// Only in edit mode, with no gesture or draft in progress.
    pub fn click_container(&mut self, pointer: Point) -> bool {
        if self.mode != Mode::Edit || self.gesture != Gesture::Idle || self.draft.is_some() {
            return false;
        }
        let Ok(bounds) = self.measured_container() else {
            return false;
        };
        if !bounds.contains(pointer) {
            return false;
        }

        let placed = Rect::new(
            pointer.x - self.draft_size.width / 2.0,
            pointer.y - self.draft_size.height / 2.0,
            self.draft_size.width,
            self.draft_size.height,
        );
        let clamped = gesture::clamp_into(&placed, &bounds);
        let rect = match bounds.rect_to_percent(&clamped) {
            Ok(rect) => rect,
            Err(e) => {
                self.report("Cannot place hotspot", e);
                return false;
            }
        };

        self.playback.pause();
        self.draft = Some(Draft {
            rect,
            captured_time: self.current_time(),
        });
        true
    }

    /// Turn the draft into a hotspot and resume playback.
    ///
    /// An invalid duration keeps the draft so the dialog can be corrected.
    pub fn confirm_draft(&mut self, choice: KindChoice, url: &str, duration: &str) -> Result<HotspotId> {
        let draft = self.draft.as_ref().ok_or(EditorError::NoDraft)?;
        let kind = match choice {
            KindChoice::Static => HotspotKind::Static,
            KindChoice::Dynamic => HotspotKind::Dynamic {
                activation_time: draft.captured_time,
                duration: parse_duration(duration)?,
            },
        };

        let hotspot = Hotspot::new(draft.rect, kind, url.trim());
        let id = self.store.add(hotspot);
        self.draft = None;
        self.playback.play();
        log::info!("Created {} hotspot {}, total: {}", kind.label(), id, self.store.len());
        Ok(id)
    }

    pub fn cancel_draft(&mut self) {
        if self.draft.take().is_some() {
            self.playback.play();
        }
    }

    // =========================================================================
    // Editing, publishing, deletion
    // =========================================================================

    /// Change URL and, for dynamic hotspots, duration.
    pub fn edit(&mut self, id: HotspotId, url: &str, duration: &str) -> Result<()> {
        let hotspot = self.store.get(id).ok_or(EditorError::UnknownHotspot(id))?;
        if hotspot.published {
            return Err(EditorError::Locked(id));
        }
        let duration = if hotspot.kind.is_dynamic() {
            Some(parse_duration(duration)?)
        } else {
            None
        };

        self.store.update(
            id,
            &HotspotPatch {
                url: Some(url.trim().to_string()),
                duration,
                ..Default::default()
            },
        )?;
        log::info!("Edited hotspot {}", id);
        Ok(())
    }

    /// Persist a hotspot and lock it. Failures surface as notices.
    pub fn publish(&mut self, id: HotspotId) {
        if self.gesture.hotspot() == Some(id) {
            self.pointer_up();
        }
        match self.store.publish(id) {
            Ok(()) => {
                log::info!("Published hotspot {}", id);
                self.notify(NoticeLevel::Info, "Hotspot saved".to_string());
            }
            Err(e) => self.report("Save failed", e),
        }
    }

    /// Make a published hotspot editable again.
    pub fn unlock(&mut self, id: HotspotId) {
        match self.store.unlock(id) {
            Ok(()) => log::info!("Unlocked hotspot {}", id),
            Err(e) => self.report("Unlock failed", e),
        }
    }

    /// Ask for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: HotspotId) {
        if self.mode != Mode::Edit {
            return;
        }
        if self.store.get(id).is_some() {
            self.pending_delete = Some(id);
        } else {
            self.report("Delete failed", EditorError::UnknownHotspot(id));
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the hotspot awaiting confirmation.
    pub fn confirm_delete(&mut self) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        if self.gesture.hotspot() == Some(id) {
            self.gesture = Gesture::Idle;
        }
        match self.store.remove(id) {
            Ok(removed) => log::info!(
                "Deleted hotspot {} ({}), total: {}",
                id,
                removed.url,
                self.store.len()
            ),
            Err(e) => self.report("Delete failed", e),
        }
    }

    /// URL to open when `id` is clicked, if the click navigates.
    ///
    /// Clicks navigate for visible hotspots that are not being edited: every
    /// hotspot in view mode and published ones in edit mode.
    pub fn activate(&self, id: HotspotId) -> Option<String> {
        let hotspot = self.store.get(id)?;
        if !self.is_visible(hotspot) || self.is_editable(hotspot) || hotspot.url.is_empty() {
            return None;
        }
        log::info!("Opening {} from hotspot {}", hotspot.url, id);
        Some(hotspot.url.clone())
    }
}
