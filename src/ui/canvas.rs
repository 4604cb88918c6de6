// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video canvas with the hotspot overlay.
//!
//! This module lays out the video container, draws the poster frame and
//! every visible hotspot, and turns clicks and handle drags into
//! [`CanvasAction`]s. Pointer moves and releases during a gesture are
//! read globally by the app so a drag keeps tracking outside the handle.

use super::HotspotAction;
use crate::models::hotspot::{Hotspot, HotspotId};
use crate::session::{EditorSession, Handle, Mode};
use crate::util::geometry::{ContainerBounds, Point, Rect};

const HANDLE_RADIUS: f32 = 9.0;
const BUTTON_SIZE: egui::Vec2 = egui::vec2(30.0, 24.0);
const HOTSPOT_RED: egui::Color32 = egui::Color32::from_rgb(220, 30, 30);

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    PointerDown(HotspotId, Handle, Point),
    ClickContainer(Point),
    Hotspot(HotspotAction),
}

pub struct CanvasOutput {
    pub container: ContainerBounds,
    pub action: CanvasAction,
}

pub fn to_point(pos: egui::Pos2) -> Point {
    Point::new(pos.x as f64, pos.y as f64)
}

fn to_egui_rect(rect: &Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(rect.x as f32, rect.y as f32),
        egui::vec2(rect.width as f32, rect.height as f32),
    )
}

/// Fit a box of the given aspect ratio into `available`, centred.
fn fit_container(available: egui::Rect, aspect: f32) -> egui::Rect {
    let available_aspect = available.width() / available.height().max(1.0);
    let size = if aspect > available_aspect {
        // Video is wider - fit to width
        egui::vec2(available.width(), available.width() / aspect)
    } else {
        // Video is taller - fit to height
        egui::vec2(available.height() * aspect, available.height())
    };
    egui::Rect::from_center_size(available.center(), size)
}

/// Corners of `rect` rotated by `degrees` about its center, clockwise from
/// top-left.
fn rotated_corners(rect: egui::Rect, degrees: f64) -> [egui::Pos2; 4] {
    let rot = egui::emath::Rot2::from_angle((degrees as f32).to_radians());
    let c = rect.center();
    let half = rect.size() / 2.0;
    [
        c + rot * egui::vec2(-half.x, -half.y),
        c + rot * egui::vec2(half.x, -half.y),
        c + rot * egui::vec2(half.x, half.y),
        c + rot * egui::vec2(-half.x, half.y),
    ]
}

/// Rotate a point of the unrotated `rect` about its center.
fn rotate_about_center(rect: egui::Rect, degrees: f64, point: egui::Pos2) -> egui::Pos2 {
    let rot = egui::emath::Rot2::from_angle((degrees as f32).to_radians());
    rect.center() + rot * (point - rect.center())
}

/// Display the video container and its hotspots.
pub fn show(
    ui: &mut egui::Ui,
    session: &EditorSession,
    poster: Option<&egui::TextureHandle>,
    aspect: f32,
) -> CanvasOutput {
    let mut action = CanvasAction::None;
    // Set background color
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available = ui.available_rect_before_wrap();
    let video_rect = fit_container(available, aspect);
    let container = ContainerBounds::new(
        video_rect.min.x as f64,
        video_rect.min.y as f64,
        video_rect.width() as f64,
        video_rect.height() as f64,
    );

    let container_response = ui.allocate_rect(video_rect, egui::Sense::click());
    let painter = ui.painter_at(available);

    if let Some(texture) = poster {
        painter.image(
            texture.id(),
            video_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    } else {
        painter.rect_filled(video_rect, 0.0, egui::Color32::from_gray(20));
        painter.text(
            video_rect.center(),
            egui::Align2::CENTER_CENTER,
            "File → Open Poster Image...",
            egui::FontId::proportional(16.0),
            egui::Color32::from_gray(130),
        );
    }

    for hotspot in session.hotspots() {
        if !session.is_visible(hotspot) {
            continue;
        }
        let rect = to_egui_rect(&container.rect_to_pixels(&hotspot.rect));
        if let Some(hotspot_action) = show_hotspot(ui, &painter, session, hotspot, rect) {
            action = hotspot_action;
        }
    }

    if let Some(draft) = session.draft() {
        let rect = to_egui_rect(&container.rect_to_pixels(&draft.rect));
        painter.rect_stroke(rect, 0.0, egui::Stroke::new(2.0, egui::Color32::LIGHT_BLUE));
    }

    if matches!(action, CanvasAction::None) && container_response.clicked() {
        if let Some(pos) = container_response.interact_pointer_pos() {
            action = CanvasAction::ClickContainer(to_point(pos));
        }
    }

    CanvasOutput { container, action }
}

/// Draw one hotspot and its controls.
fn show_hotspot(
    ui: &mut egui::Ui,
    painter: &egui::Painter,
    session: &EditorSession,
    hotspot: &Hotspot,
    rect: egui::Rect,
) -> Option<CanvasAction> {
    let id = hotspot.id;
    let editable = session.is_editable(hotspot);
    let mut action = None;

    let body = ui.interact(
        rect,
        egui::Id::new(("hotspot-body", id)),
        egui::Sense::click_and_drag(),
    );

    let fill = if editable {
        if body.hovered() {
            egui::Color32::TRANSPARENT
        } else {
            egui::Color32::from_rgba_unmultiplied(220, 30, 30, 90)
        }
    } else {
        HOTSPOT_RED
    };
    let stroke = if editable {
        egui::Stroke::new(2.0, HOTSPOT_RED)
    } else {
        egui::Stroke::NONE
    };
    painter.add(egui::Shape::convex_polygon(
        rotated_corners(rect, hotspot.rotation).to_vec(),
        fill,
        stroke,
    ));

    if !editable {
        let body = body.on_hover_cursor(egui::CursorIcon::PointingHand);
        if body.clicked() {
            action = Some(CanvasAction::Hotspot(HotspotAction::Activate(id)));
        }
        if session.mode() == Mode::Edit {
            let below = egui::Rect::from_center_size(
                egui::pos2(rect.center().x, rect.bottom() + 22.0),
                egui::vec2(60.0, BUTTON_SIZE.y),
            );
            if ui
                .put(below, egui::Button::new("Unlock"))
                .on_hover_text("Make this hotspot editable again")
                .clicked()
            {
                action = Some(CanvasAction::Hotspot(HotspotAction::Unlock(id)));
            }
        }
        return action;
    }

    let press = ui.input(|i| i.pointer.press_origin());

    // Move: drag anywhere on the body
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        "✥",
        egui::FontId::proportional(24.0),
        egui::Color32::WHITE,
    );
    let body = body.on_hover_cursor(egui::CursorIcon::Move);
    if body.drag_started() {
        if let Some(pos) = press.or(body.interact_pointer_pos()) {
            action = Some(CanvasAction::PointerDown(id, Handle::Move, to_point(pos)));
        }
    }

    // Resize: bottom-right corner; rotate: middle of the right edge
    let handles = [
        (Handle::Resize, rect.right_bottom(), "⤡", egui::CursorIcon::ResizeSouthEast),
        (Handle::Rotate, rect.right_center(), "⟳", egui::CursorIcon::Grab),
    ];
    for (handle, anchor, glyph, cursor) in handles {
        let center = rotate_about_center(rect, hotspot.rotation, anchor);
        let hit = egui::Rect::from_center_size(center, egui::Vec2::splat(HANDLE_RADIUS * 2.0));
        let response = ui
            .interact(hit, egui::Id::new(("hotspot-handle", id, glyph)), egui::Sense::drag())
            .on_hover_cursor(cursor);
        painter.circle_filled(center, HANDLE_RADIUS, egui::Color32::from_gray(30));
        painter.text(
            center,
            egui::Align2::CENTER_CENTER,
            glyph,
            egui::FontId::proportional(14.0),
            egui::Color32::WHITE,
        );
        if response.drag_started() {
            if let Some(pos) = press.or(response.interact_pointer_pos()) {
                action = Some(CanvasAction::PointerDown(id, handle, to_point(pos)));
            }
        }
    }

    // Edit / save / delete row below the hotspot
    let row_center = egui::pos2(rect.center().x, rect.bottom() + 22.0);
    let buttons = [
        ("✏", "Edit URL and duration", HotspotAction::Edit(id)),
        ("💾", "Save and lock", HotspotAction::Publish(id)),
        ("🗑", "Delete", HotspotAction::Delete(id)),
    ];
    for (i, (label, hint, button_action)) in buttons.into_iter().enumerate() {
        let offset = (i as f32 - 1.0) * (BUTTON_SIZE.x + 6.0);
        let slot = egui::Rect::from_center_size(row_center + egui::vec2(offset, 0.0), BUTTON_SIZE);
        if ui.put(slot, egui::Button::new(label)).on_hover_text(hint).clicked() {
            action = Some(CanvasAction::Hotspot(button_action));
        }
    }

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_container_letterboxes() {
        let available = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(1000.0, 1000.0));
        let fitted = fit_container(available, 2.0);
        assert_eq!(fitted.size(), egui::vec2(1000.0, 500.0));
        assert_eq!(fitted.center(), available.center());

        let fitted = fit_container(available, 0.5);
        assert_eq!(fitted.size(), egui::vec2(500.0, 1000.0));
    }

    #[test]
    fn test_unrotated_corners_match_rect() {
        let rect = egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(100.0, 50.0));
        let corners = rotated_corners(rect, 0.0);
        assert_eq!(corners[0], rect.left_top());
        assert_eq!(corners[2], rect.right_bottom());
    }

    #[test]
    fn test_quarter_turn_moves_right_edge_below_center() {
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        let p = rotate_about_center(rect, 90.0, rect.right_center());
        assert!((p.x - 50.0).abs() < 1e-3);
        assert!((p.y - 100.0).abs() < 1e-3);
    }
}
