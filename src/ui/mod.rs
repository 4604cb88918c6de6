// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the hotspot editor.

pub mod canvas;
pub mod dialogs;
pub mod properties;
pub mod toolbar;

use crate::models::hotspot::HotspotId;

/// Per-hotspot command issued from the canvas or the properties panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotspotAction {
    /// Open the hotspot's URL.
    Activate(HotspotId),
    Edit(HotspotId),
    Publish(HotspotId),
    Unlock(HotspotId),
    Delete(HotspotId),
}
