// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the coordinate types used by the editor and the
//! transformations between absolute pixel coordinates and coordinates
//! expressed as a percentage of the video container.

use crate::error::{EditorError, Result};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned box given by its top-left origin and its size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Screen-space bounding box of the video container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ContainerBounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// A container with a zero extent has not been laid out yet.
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// Convert a percentage rect to absolute screen pixels.
    pub fn rect_to_pixels(&self, rect: &Rect) -> Rect {
        Rect {
            x: self.left + to_pixels(rect.x, self.width),
            y: self.top + to_pixels(rect.y, self.height),
            width: to_pixels(rect.width, self.width),
            height: to_pixels(rect.height, self.height),
        }
    }

    /// Convert an absolute pixel rect to percentages of this container.
    pub fn rect_to_percent(&self, rect: &Rect) -> Result<Rect> {
        Ok(Rect {
            x: to_percent(rect.x - self.left, self.width)?,
            y: to_percent(rect.y - self.top, self.height)?,
            width: to_percent(rect.width, self.width)?,
            height: to_percent(rect.height, self.height)?,
        })
    }
}

/// Convert a pixel distance to a percentage of `extent`.
///
/// A non-positive extent means the container has not been measured and the
/// conversion must be retried once layout has happened.
pub fn to_percent(pixel_value: f64, extent: f64) -> Result<f64> {
    if extent <= 0.0 {
        return Err(EditorError::ContainerNotMeasured);
    }
    Ok(pixel_value / extent * 100.0)
}

/// Convert a percentage of `extent` back to pixels.
pub fn to_pixels(percent: f64, extent: f64) -> f64 {
    percent / 100.0 * extent
}
