// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O: persisted hotspots, playback and poster frames.

pub mod media;
pub mod persistence;
pub mod playback;
