// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Modal dialogs: hotspot type selection, URL/duration editing and delete
//! confirmation.
//!
//! Dialogs only collect input; the app hands the result to the session.

use crate::models::hotspot::HotspotId;
use crate::session::KindChoice;

/// State of the "new hotspot" dialog.
#[derive(Debug, Default)]
pub struct CreateDialog {
    pub choice: Option<KindChoice>,
    pub url: String,
    pub duration: String,
    pub error: Option<String>,
}

/// State of the URL/duration edit dialog.
#[derive(Debug)]
pub struct EditDialog {
    pub id: HotspotId,
    pub dynamic: bool,
    pub url: String,
    pub duration: String,
    pub error: Option<String>,
}

pub enum DialogAction {
    None,
    Confirm,
    Cancel,
}

fn modal(title: &str, id: &str) -> egui::Window<'static> {
    egui::Window::new(title.to_string())
        .id(egui::Id::new(id))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
}

fn error_label(ui: &mut egui::Ui, error: &Option<String>) {
    if let Some(message) = error {
        ui.colored_label(egui::Color32::from_rgb(230, 80, 80), message);
    }
}

/// Type selection, then URL (and duration for dynamic hotspots).
pub fn show_create(ctx: &egui::Context, state: &mut CreateDialog) -> DialogAction {
    let title = match state.choice {
        None => "Select Hotspot Type",
        Some(KindChoice::Static) => "Create Your Static Hotspot",
        Some(KindChoice::Dynamic) => "Create Your Dynamic Hotspot",
    };
    let mut action = DialogAction::None;

    modal(title, "create_dialog").show(ctx, |ui| {
        match state.choice {
            None => {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        if ui.button("Dynamic").clicked() {
                            state.choice = Some(KindChoice::Dynamic);
                        }
                        ui.label(
                            egui::RichText::new(
                                "Available for a set duration from the current playback time.",
                            )
                            .small()
                            .weak(),
                        );
                    });
                    ui.separator();
                    ui.vertical(|ui| {
                        if ui.button("Static").clicked() {
                            state.choice = Some(KindChoice::Static);
                        }
                        ui.label(
                            egui::RichText::new("Available throughout the whole video.")
                                .small()
                                .weak(),
                        );
                    });
                });
                ui.add_space(8.0);
                if ui.button("Cancel").clicked() {
                    action = DialogAction::Cancel;
                }
            }
            Some(choice) => {
                ui.label("URL");
                ui.add(egui::TextEdit::singleline(&mut state.url).hint_text("Enter URL here..."));
                if choice == KindChoice::Dynamic {
                    ui.label("Duration (seconds)");
                    ui.add(egui::TextEdit::singleline(&mut state.duration).hint_text("0"));
                }
                error_label(ui, &state.error);
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Back").clicked() {
                        state.choice = None;
                        state.error = None;
                    }
                    if ui.button("Create").clicked() {
                        action = DialogAction::Confirm;
                    }
                    if ui.button("Cancel").clicked() {
                        action = DialogAction::Cancel;
                    }
                });
            }
        }
    });

    action
}

pub fn show_edit(ctx: &egui::Context, state: &mut EditDialog) -> DialogAction {
    let mut action = DialogAction::None;

    modal("Edit Hotspot", "edit_dialog").show(ctx, |ui| {
        ui.label("URL");
        ui.add(egui::TextEdit::singleline(&mut state.url));
        if state.dynamic {
            ui.label("Duration (seconds)");
            ui.add(egui::TextEdit::singleline(&mut state.duration));
        }
        error_label(ui, &state.error);
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                action = DialogAction::Confirm;
            }
            if ui.button("Cancel").clicked() {
                action = DialogAction::Cancel;
            }
        });
    });

    action
}

pub fn show_confirm_delete(ctx: &egui::Context) -> DialogAction {
    let mut action = DialogAction::None;

    modal("Delete Hotspot", "delete_dialog").show(ctx, |ui| {
        ui.label("Are you sure you want to delete this hotspot?");
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Yes").clicked() {
                action = DialogAction::Confirm;
            }
            if ui.button("No").clicked() {
                action = DialogAction::Cancel;
            }
        });
    });

    action
}
