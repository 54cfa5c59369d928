// Copyright (c) 2025, Pinpoly developers
// SPDX-License-Identifier: BSD-3-Clause

//! Image file loading.
//!
//! Decodes an image to RGBA for display and annotation. Decoding is
//! expensive for large files, so the caller runs this on a background
//! thread and receives the result over a channel.

use anyhow::{Context, Result};
use std::path::Path;

/// A decoded image: dimensions plus RGBA pixel data.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Load and decode an image file to RGBA8.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to decode image {}", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(LoadedImage {
        width,
        height,
        pixels: img.into_raw(),
    })
}
