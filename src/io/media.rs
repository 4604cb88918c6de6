// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Poster frame loading.
//!
//! The canvas shows a still frame of the video as the container backdrop.
//! This module decodes it into RGBA pixels suitable for an egui texture.

use anyhow::{Context, Result};
use std::path::Path;

/// Decoded RGBA8 image.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl LoadedImage {
    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Load an image file and convert it to RGBA8.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to open image {}", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(LoadedImage {
        width,
        height,
        pixels: img.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reports_path() {
        let err = match load_image(Path::new("does/not/exist.png")) {
            Ok(_) => panic!("expected an error"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("does/not/exist.png"));
    }

    #[test]
    fn test_aspect_ratio() {
        let img = LoadedImage {
            width: 1920,
            height: 1080,
            pixels: Vec::new(),
        };
        assert!((img.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }
}
