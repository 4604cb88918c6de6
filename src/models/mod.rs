// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data models for hotspots and their store.

pub mod hotspot;
pub mod store;
