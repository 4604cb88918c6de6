// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the eframe::App trait. It owns the editor session and forwards canvas,
//! toolbar, panel and dialog input to it.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

use crate::config::EditorConfig;
use crate::io::media::{self, LoadedImage};
use crate::io::persistence::MemoryStore;
use crate::io::playback::ClockPlayback;
use crate::models::hotspot::HotspotKind;
use crate::models::store::HotspotStore;
use crate::session::{EditorSession, Gesture, KindChoice, Notice, NoticeLevel};
use crate::ui::canvas::{self, CanvasAction};
use crate::ui::dialogs::{self, CreateDialog, DialogAction, EditDialog};
use crate::ui::{properties, toolbar, HotspotAction};

/// Main application state.
pub struct HotspotApp {
    config: EditorConfig,

    /// Editing state and hotspot store
    session: EditorSession,

    /// Shared handle to the key-value store the hotspot store writes to
    storage: MemoryStore,

    /// Poster frame texture drawn behind the hotspots
    poster_texture: Option<egui::TextureHandle>,

    /// Poster aspect ratio, once loaded
    poster_aspect: Option<f32>,

    /// Receiver for background poster loading
    poster_loader: Option<Receiver<Result<LoadedImage, String>>>,

    /// Loading state message
    loading_message: Option<String>,

    create_dialog: CreateDialog,
    edit_dialog: Option<EditDialog>,

    /// Latest notice for the status bar
    status: Option<Notice>,
}

impl HotspotApp {
    /// Create the application, restoring saved hotspots from `eframe` storage.
    pub fn new(cc: &eframe::CreationContext<'_>, config: EditorConfig) -> Self {
        let storage = MemoryStore::from_eframe(cc.storage);
        let store = HotspotStore::load(Box::new(storage.clone()));
        let playback = ClockPlayback::new(
            config.video_duration,
            config.loop_playback,
            config.time_update_interval(),
        );
        let session = EditorSession::new(store, Box::new(playback), &config);

        let mut app = Self {
            config,
            session,
            storage,
            poster_texture: None,
            poster_aspect: None,
            poster_loader: None,
            loading_message: None,
            create_dialog: CreateDialog::default(),
            edit_dialog: None,
            status: None,
        };
        if let Some(path) = app.config.poster_image.clone() {
            app.load_poster(path);
        }
        app
    }

    /// Load a poster frame on a background thread.
    pub fn load_poster(&mut self, path: PathBuf) {
        let (sender, receiver) = channel();
        self.poster_loader = Some(receiver);
        self.loading_message = Some("Loading poster image...".to_string());

        std::thread::spawn(move || {
            let result = media::load_image(&path).map_err(|e| format!("{:#}", e));
            if let Ok(img) = &result {
                log::info!("Loaded poster: {} ({}x{})", path.display(), img.width, img.height);
            }
            let _ = sender.send(result);
        });
    }

    fn receive_poster(&mut self, ctx: &egui::Context) {
        let Some(receiver) = &self.poster_loader else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };
        self.poster_loader = None;
        self.loading_message = None;

        match result {
            Ok(img) => {
                let size = [img.width as usize, img.height as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &img.pixels);
                self.poster_texture =
                    Some(ctx.load_texture("poster", color_image, egui::TextureOptions::LINEAR));
                self.poster_aspect = Some(img.aspect_ratio());
            }
            Err(e) => {
                log::error!("Failed to load poster: {}", e);
                self.status = Some(Notice {
                    level: NoticeLevel::Error,
                    message: e,
                });
            }
        }
    }

    fn handle_hotspot_action(&mut self, ctx: &egui::Context, action: HotspotAction) {
        match action {
            HotspotAction::Activate(id) => {
                if let Some(url) = self.session.activate(id) {
                    ctx.open_url(egui::OpenUrl::new_tab(url));
                }
            }
            HotspotAction::Edit(id) => {
                if let Some(hotspot) = self.session.hotspot(id) {
                    let duration = match hotspot.kind {
                        HotspotKind::Dynamic { duration, .. } => duration.to_string(),
                        HotspotKind::Static => String::new(),
                    };
                    self.edit_dialog = Some(EditDialog {
                        id,
                        dynamic: hotspot.kind.is_dynamic(),
                        url: hotspot.url.clone(),
                        duration,
                        error: None,
                    });
                }
            }
            HotspotAction::Publish(id) => self.session.publish(id),
            HotspotAction::Unlock(id) => self.session.unlock(id),
            HotspotAction::Delete(id) => self.session.request_delete(id),
        }
    }

    fn show_dialogs(&mut self, ctx: &egui::Context) {
        if self.session.draft().is_some() {
            match dialogs::show_create(ctx, &mut self.create_dialog) {
                DialogAction::Confirm => {
                    let choice = self.create_dialog.choice.unwrap_or(KindChoice::Static);
                    match self.session.confirm_draft(
                        choice,
                        &self.create_dialog.url,
                        &self.create_dialog.duration,
                    ) {
                        Ok(_) => self.create_dialog = CreateDialog::default(),
                        Err(e) => self.create_dialog.error = Some(e.to_string()),
                    }
                }
                DialogAction::Cancel => {
                    self.session.cancel_draft();
                    self.create_dialog = CreateDialog::default();
                }
                DialogAction::None => {}
            }
        }

        if let Some(state) = self.edit_dialog.as_mut() {
            match dialogs::show_edit(ctx, state) {
                DialogAction::Confirm => {
                    match self.session.edit(state.id, &state.url, &state.duration) {
                        Ok(()) => self.edit_dialog = None,
                        Err(e) => state.error = Some(e.to_string()),
                    }
                }
                DialogAction::Cancel => self.edit_dialog = None,
                DialogAction::None => {}
            }
        }

        if self.session.pending_delete().is_some() {
            match dialogs::show_confirm_delete(ctx) {
                DialogAction::Confirm => self.session.confirm_delete(),
                DialogAction::Cancel => self.session.cancel_delete(),
                DialogAction::None => {}
            }
        }
    }

    /// Feed pointer moves and releases to an active gesture.
    fn track_gesture(&mut self, ctx: &egui::Context) {
        if self.session.gesture() == Gesture::Idle {
            return;
        }
        let (pos, down, focused) = ctx.input(|i| {
            (
                i.pointer.latest_pos(),
                i.pointer.primary_down(),
                i.viewport().focused,
            )
        });
        if focused == Some(false) {
            self.session.focus_lost();
        } else if !down {
            self.session.pointer_up();
        } else if let Some(pos) = pos {
            self.session.pointer_move(canvas::to_point(pos));
        }
    }
}

impl eframe::App for HotspotApp {
    /// Called by the framework to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.storage.flush_into(storage);
    }

    fn auto_save_interval(&self) -> Duration {
        Duration::from_secs(5)
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.receive_poster(ctx);
        self.session.tick();
        if let Some(notice) = self.session.take_notices().pop() {
            self.status = Some(notice);
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Poster Image...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "tiff", "tif"])
                            .pick_file()
                        {
                            self.load_poster(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(
                    ui,
                    self.session.mode(),
                    self.session.is_paused(),
                    self.session.current_time(),
                    self.session.duration(),
                )
            })
            .inner;
        match toolbar_action {
            toolbar::ToolbarAction::SetMode(mode) => {
                self.edit_dialog = None;
                self.create_dialog = CreateDialog::default();
                self.session.set_mode(mode);
            }
            toolbar::ToolbarAction::TogglePlayback => self.session.toggle_playback(),
            toolbar::ToolbarAction::Seek(t) => self.session.seek(t),
            toolbar::ToolbarAction::None => {}
        }

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Mode: {:?}", self.session.mode()));
                ui.separator();
                ui.label(format!("{} hotspots", self.session.hotspots().len()));
                if let Some(notice) = &self.status {
                    ui.separator();
                    let color = match notice.level {
                        NoticeLevel::Info => egui::Color32::from_gray(180),
                        NoticeLevel::Warning => egui::Color32::YELLOW,
                        NoticeLevel::Error => egui::Color32::from_rgb(230, 80, 80),
                    };
                    ui.colored_label(color, notice.message.as_str());
                }
            });
        });

        // Properties panel (right side)
        let properties_action = egui::SidePanel::right("properties")
            .default_width(250.0)
            .show(ctx, |ui| properties::show(ui, &self.session))
            .inner;
        if let Some(action) = properties_action {
            self.handle_hotspot_action(ctx, action);
        }

        // Handle keyboard events
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.session.pointer_up();
            if self.session.draft().is_some() {
                self.session.cancel_draft();
                self.create_dialog = CreateDialog::default();
            }
        }

        // Main canvas (center)
        let aspect = self.poster_aspect.unwrap_or(self.config.aspect_ratio);
        let output = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(ref message) = self.loading_message {
                    ui.vertical_centered(|ui| {
                        ui.spinner();
                        ui.label(
                            egui::RichText::new(message)
                                .size(14.0)
                                .color(egui::Color32::from_gray(200)),
                        );
                    });
                }
                canvas::show(ui, &self.session, self.poster_texture.as_ref(), aspect)
            })
            .inner;
        self.session.set_container(output.container);

        // Handle canvas actions
        match output.action {
            CanvasAction::PointerDown(id, handle, pos) => {
                self.session.pointer_down(id, handle, pos);
            }
            CanvasAction::ClickContainer(pos) => {
                if self.session.click_container(pos) {
                    self.create_dialog = CreateDialog::default();
                }
            }
            CanvasAction::Hotspot(action) => self.handle_hotspot_action(ctx, action),
            CanvasAction::None => {}
        }

        self.track_gesture(ctx);
        self.show_dialogs(ctx);

        if !self.session.is_paused() || self.loading_message.is_some() {
            ctx.request_repaint_after(self.config.time_update_interval());
        }
    }
}
