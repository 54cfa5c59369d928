// Copyright (c) 2025, Pinpoly developers
// SPDX-License-Identifier: BSD-3-Clause

//! Pinpoly - Point & polygon image annotator
//!
//! A desktop application for annotating raster images with point markers
//! and polygons, with draggable labels, linear undo/redo, and export of
//! both the annotated image and the raw annotation data.

mod app;
mod interaction;
mod io;
mod models;
mod ui;
mod util;

use anyhow::Result;
use app::PinpolyApp;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Pinpoly - Image Annotator"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Pinpoly",
        options,
        Box::new(|_cc| Ok(Box::new(PinpolyApp::new()))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
