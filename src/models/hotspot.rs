// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hotspot data structures.
//!
//! A hotspot is a rotatable rectangle over the video that links to a URL.
//! Geometry is always stored as a percentage of the video container so it
//! survives container resizes; pixels only appear at the pointer boundary.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::util::geometry::Rect;

/// Stable, collision-free hotspot identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HotspotId(Uuid);

impl HotspotId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HotspotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HotspotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for HotspotId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// When a hotspot is shown during playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HotspotKind {
    /// Visible for the whole video.
    Static,
    /// Visible from `activation_time` for `duration` whole seconds.
    Dynamic { activation_time: f64, duration: u32 },
}

impl HotspotKind {
    pub fn is_dynamic(&self) -> bool {
        matches!(self, HotspotKind::Dynamic { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            HotspotKind::Static => "static",
            HotspotKind::Dynamic { .. } => "dynamic",
        }
    }
}

/// A clickable region of the video.
#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    pub id: HotspotId,
    /// Origin and size in percent of the container.
    pub rect: Rect,
    /// Degrees, clockwise-positive.
    pub rotation: f64,
    pub kind: HotspotKind,
    pub url: String,
    /// Committed to storage and locked for editing.
    pub published: bool,
}

impl Hotspot {
    /// Create an unpublished, unrotated hotspot.
    pub fn new(rect: Rect, kind: HotspotKind, url: impl Into<String>) -> Self {
        Self {
            id: HotspotId::new(),
            rect,
            rotation: 0.0,
            kind,
            url: url.into(),
            published: false,
        }
    }

    /// Apply the non-empty fields of `patch`.
    ///
    /// A duration only applies to dynamic hotspots.
    pub fn apply(&mut self, patch: &HotspotPatch) {
        if let Some(rect) = patch.rect {
            self.rect = rect;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(url) = &patch.url {
            self.url = url.clone();
        }
        if let (Some(new_duration), HotspotKind::Dynamic { duration, .. }) =
            (patch.duration, &mut self.kind)
        {
            *duration = new_duration;
        }
    }
}

/// Partial update for [`Hotspot`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotspotPatch {
    pub rect: Option<Rect>,
    pub rotation: Option<f64>,
    pub url: Option<String>,
    pub duration: Option<u32>,
}

impl HotspotPatch {
    pub fn rect(rect: Rect) -> Self {
        Self {
            rect: Some(rect),
            ..Default::default()
        }
    }

    pub fn rotation(degrees: f64) -> Self {
        Self {
            rotation: Some(degrees),
            ..Default::default()
        }
    }
}
