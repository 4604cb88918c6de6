// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Move, resize and rotate math for hotspot gestures.
//!
//! Every function here works in absolute screen pixels and is a pure
//! function of the current geometry and pointer position, so replaying the
//! same pointer events always yields the same result. Out-of-range results
//! are clamped to the container instead of being reported as errors.

use super::geometry::{ContainerBounds, Point, Rect, Size};

/// Offset between the pointer and the box origin at pointer-down.
///
/// Keeping this offset fixed during a drag keeps the grab point under the
/// cursor.
pub fn grab_offset(rect: &Rect, pointer: Point) -> Point {
    Point::new(pointer.x - rect.x, pointer.y - rect.y)
}

/// Keep the origin of `rect` inside `bounds` without changing its size.
///
/// When the box is larger than the container on an axis the upper bound
/// cannot be met and the origin is pinned to the container's left/top edge.
pub fn clamp_origin(rect: &Rect, bounds: &ContainerBounds) -> Rect {
    let x = rect.x.min(bounds.right() - rect.width).max(bounds.left);
    let y = rect.y.min(bounds.bottom() - rect.height).max(bounds.top);
    Rect { x, y, ..*rect }
}

/// Shrink `rect` to fit inside `bounds` and clamp its origin.
pub fn clamp_into(rect: &Rect, bounds: &ContainerBounds) -> Rect {
    let sized = Rect {
        width: rect.width.clamp(0.0, bounds.width.max(0.0)),
        height: rect.height.clamp(0.0, bounds.height.max(0.0)),
        ..*rect
    };
    clamp_origin(&sized, bounds)
}

/// Move the box so its origin sits at `pointer - offset`, clamped to `bounds`.
pub fn move_to(rect: &Rect, pointer: Point, offset: Point, bounds: &ContainerBounds) -> Rect {
    let moved = Rect {
        x: pointer.x - offset.x,
        y: pointer.y - offset.y,
        ..*rect
    };
    clamp_origin(&moved, bounds)
}

/// Resize the box by dragging its bottom-right corner to `pointer`.
///
/// The top-left corner is the anchor. The size is raised to `min` first and
/// then capped at the container extent remaining from the origin, so a box
/// pushed against the far edge may end up smaller than `min`.
///
/// Rotation is ignored: the delta is computed on the unrotated box even when
/// the hotspot is rotated. This is a known approximation.
pub fn resize_to(rect: &Rect, pointer: Point, min: Size, bounds: &ContainerBounds) -> Rect {
    let max_width = (bounds.right() - rect.x).max(0.0);
    let max_height = (bounds.bottom() - rect.y).max(0.0);

    let width = (pointer.x - rect.x).max(min.width).min(max_width);
    let height = (pointer.y - rect.y).max(min.height).min(max_height);

    Rect {
        width,
        height,
        ..*rect
    }
}

/// Angle in degrees from the box center to `pointer`.
///
/// Screen coordinates grow downward, so positive angles are clockwise.
/// There is no start-angle correction: the box snaps to the direct angle
/// under the cursor on every move.
pub fn rotate_to(rect: &Rect, pointer: Point) -> f64 {
    let center = rect.center();
    (pointer.y - center.y).atan2(pointer.x - center.x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn container() -> ContainerBounds {
        ContainerBounds::new(0.0, 0.0, 400.0, 300.0)
    }

    #[test]
    fn test_drag_clamps_to_top_left() {
        let rect = Rect::new(50.0, 50.0, 200.0, 100.0);
        let down = Point::new(150.0, 100.0);
        let offset = grab_offset(&rect, down);

        let moved = move_to(&rect, Point::new(50.0, 0.0), offset, &container());
        assert_eq!(moved.origin(), Point::new(0.0, 0.0));
        assert_eq!(moved.size(), rect.size());
    }

    #[test]
    fn test_drag_keeps_grab_point_under_cursor() {
        let rect = Rect::new(50.0, 50.0, 100.0, 50.0);
        let offset = grab_offset(&rect, Point::new(60.0, 70.0));

        let moved = move_to(&rect, Point::new(110.0, 120.0), offset, &container());
        assert_eq!(moved.origin(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_drag_stays_inside_container() {
        let bounds = ContainerBounds::new(20.0, 10.0, 400.0, 300.0);
        let rect = Rect::new(100.0, 100.0, 120.0, 80.0);
        let offset = Point::new(10.0, 10.0);

        for px in (-200..=800).step_by(37) {
            for py in (-200..=600).step_by(41) {
                let moved = move_to(&rect, Point::new(px as f64, py as f64), offset, &bounds);
                assert!(moved.x >= bounds.left - EPS);
                assert!(moved.x <= bounds.right() - moved.width + EPS);
                assert!(moved.y >= bounds.top - EPS);
                assert!(moved.y <= bounds.bottom() - moved.height + EPS);
            }
        }
    }

    #[test]
    fn test_oversized_box_pins_to_origin() {
        let rect = Rect::new(30.0, 30.0, 500.0, 400.0);
        let moved = move_to(&rect, Point::new(300.0, 300.0), Point::default(), &container());
        assert_eq!(moved.origin(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_resize_respects_minimum_and_container() {
        let min = Size::new(60.0, 40.0);
        let bounds = container();
        let rect = Rect::new(100.0, 100.0, 100.0, 100.0);

        for px in (-100..=700).step_by(23) {
            for py in (-100..=500).step_by(29) {
                let resized = resize_to(&rect, Point::new(px as f64, py as f64), min, &bounds);
                assert_eq!(resized.origin(), rect.origin());
                assert!(resized.width >= min.width);
                assert!(resized.height >= min.height);
                assert!(resized.right() <= bounds.right() + EPS);
                assert!(resized.bottom() <= bounds.bottom() + EPS);
            }
        }
    }

    #[test]
    fn test_resize_tracks_pointer() {
        let rect = Rect::new(100.0, 100.0, 100.0, 100.0);
        let resized = resize_to(&rect, Point::new(250.0, 180.0), Size::new(60.0, 40.0), &container());
        assert_eq!(resized.size(), Size::new(150.0, 80.0));
    }

    #[test]
    fn test_resize_container_cap_wins_over_minimum() {
        let rect = Rect::new(370.0, 280.0, 30.0, 20.0);
        let resized = resize_to(&rect, Point::new(500.0, 500.0), Size::new(60.0, 40.0), &container());
        assert_eq!(resized.size(), Size::new(30.0, 20.0));
    }

    #[test]
    fn test_rotate_angles() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!((rotate_to(&rect, Point::new(100.0, 50.0)) - 0.0).abs() < EPS);
        assert!((rotate_to(&rect, Point::new(50.0, 100.0)) - 90.0).abs() < EPS);
        assert!((rotate_to(&rect, Point::new(0.0, 50.0)) - 180.0).abs() < EPS);
        assert!((rotate_to(&rect, Point::new(50.0, 0.0)) + 90.0).abs() < EPS);
    }

    #[test]
    fn test_operations_are_replayable() {
        let bounds = container();
        let rect = Rect::new(10.0, 20.0, 80.0, 60.0);
        let pointer = Point::new(123.0, 77.0);
        let offset = Point::new(5.0, 5.0);
        let min = Size::new(60.0, 40.0);

        assert_eq!(move_to(&rect, pointer, offset, &bounds), move_to(&rect, pointer, offset, &bounds));
        assert_eq!(resize_to(&rect, pointer, min, &bounds), resize_to(&rect, pointer, min, &bounds));
        assert_eq!(rotate_to(&rect, pointer), rotate_to(&rect, pointer));
    }

    #[test]
    fn test_clamp_into_shrinks_and_moves() {
        let clamped = clamp_into(&Rect::new(350.0, -20.0, 600.0, 100.0), &container());
        assert_eq!(clamped, Rect::new(0.0, 0.0, 400.0, 100.0));

        let clamped = clamp_into(&Rect::new(350.0, 250.0, 200.0, 100.0), &container());
        assert_eq!(clamped, Rect::new(200.0, 200.0, 200.0, 100.0));
    }
}
