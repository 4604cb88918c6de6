// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback-time visibility of hotspots.

use crate::models::hotspot::HotspotKind;

/// Playback window `[start, end]` in seconds during which a hotspot shows.
///
/// Static hotspots have no window.
pub fn active_window(kind: &HotspotKind) -> Option<(f64, f64)> {
    match *kind {
        HotspotKind::Static => None,
        HotspotKind::Dynamic {
            activation_time,
            duration,
        } => Some((activation_time, activation_time + f64::from(duration))),
    }
}

/// Whether a hotspot of `kind` renders at `current_time`.
///
/// The window is closed on both ends. `edit_mode` shows everything so that
/// authors can always find their hotspots.
pub fn is_visible(kind: &HotspotKind, current_time: f64, edit_mode: bool) -> bool {
    if edit_mode {
        return true;
    }
    match active_window(kind) {
        None => true,
        Some((start, end)) => start <= current_time && current_time <= end,
    }
}
