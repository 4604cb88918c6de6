// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hotspot properties panel.
//!
//! Lists every hotspot with its type, time window, URL and state, and
//! offers the same edit/save/delete commands as the canvas controls.

use super::HotspotAction;
use crate::session::{EditorSession, Mode};
use crate::util::visibility;

pub fn show(ui: &mut egui::Ui, session: &EditorSession) -> Option<HotspotAction> {
    let mut action = None;

    ui.heading("Hotspots");
    ui.separator();

    if session.hotspots().is_empty() {
        let hint = match session.mode() {
            Mode::Edit => "Click the video to place a hotspot",
            Mode::View => "Switch to edit mode to place hotspots",
        };
        ui.label(egui::RichText::new(hint).italics().weak());
        return None;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for (i, hotspot) in session.hotspots().iter().enumerate() {
            let id = hotspot.id;
            ui.horizontal(|ui| {
                ui.strong(format!("#{}", i + 1));
                ui.label(hotspot.kind.label());
                if hotspot.published {
                    ui.label(egui::RichText::new("saved").color(egui::Color32::LIGHT_GREEN));
                }
                if !session.is_visible(hotspot) {
                    ui.label(egui::RichText::new("hidden").weak());
                }
            });

            if let Some((start, end)) = visibility::active_window(&hotspot.kind) {
                ui.label(format!("{:.2}s – {:.2}s", start, end));
            }
            let url = if hotspot.url.is_empty() {
                "(no URL)"
            } else {
                hotspot.url.as_str()
            };
            if ui.link(url).clicked() {
                action = Some(HotspotAction::Activate(id));
            }

            if session.mode() == Mode::Edit {
                ui.horizontal(|ui| {
                    if hotspot.published {
                        if ui.small_button("Unlock").clicked() {
                            action = Some(HotspotAction::Unlock(id));
                        }
                    } else {
                        if ui.small_button("Edit").clicked() {
                            action = Some(HotspotAction::Edit(id));
                        }
                        if ui.small_button("Save").clicked() {
                            action = Some(HotspotAction::Publish(id));
                        }
                    }
                    if ui.small_button("Delete").clicked() {
                        action = Some(HotspotAction::Delete(id));
                    }
                });
            }
            ui.separator();
        }
    });

    action
}
