// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar: mode selection and playback controls.

use crate::session::Mode;

pub enum ToolbarAction {
    None,
    SetMode(Mode),
    TogglePlayback,
    Seek(f64),
}

/// Display the toolbar with mode buttons and the playback clock.
pub fn show(
    ui: &mut egui::Ui,
    mode: Mode,
    paused: bool,
    current_time: f64,
    duration: Option<f64>,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.selectable_label(mode == Mode::View, "👁 View Mode").clicked() {
            action = ToolbarAction::SetMode(Mode::View);
        }
        if ui.selectable_label(mode == Mode::Edit, "🔧 Edit Mode").clicked() {
            action = ToolbarAction::SetMode(Mode::Edit);
        }

        ui.separator();

        let play_label = if paused { "▶" } else { "⏸" };
        if ui.button(play_label).clicked() {
            action = ToolbarAction::TogglePlayback;
        }
        ui.label(format!("{:.2}", current_time));

        if let Some(duration) = duration {
            let mut position = current_time;
            let slider = egui::Slider::new(&mut position, 0.0..=duration).show_value(false);
            if ui.add(slider).changed() {
                action = ToolbarAction::Seek(position);
            }
        }

        ui.separator();

        let mode_text = match mode {
            Mode::Edit => "Click the video to add a hotspot, drag to move, use the handles to resize and rotate",
            Mode::View => "Click a hotspot to open its link",
        };

        ui.label(egui::RichText::new(mode_text).italics().weak());
    });

    action
}
