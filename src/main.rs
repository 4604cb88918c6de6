// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hotspot Editor
//!
//! A cross-platform desktop application for placing clickable, rotatable,
//! optionally time-limited hotspots over a video and linking them to URLs.

mod app;
mod config;
mod error;
mod io;
mod models;
mod session;
mod ui;
mod util;

use anyhow::Result;
use app::HotspotApp;
use config::EditorConfig;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = EditorConfig::from_env()?;
    log::info!("Starting with {:?}", config);

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Hotspot Editor"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Hotspot Editor",
        options,
        Box::new(|cc| Ok(Box::new(HotspotApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
