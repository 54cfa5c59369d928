// Copyright (c) 2025, Pinpoly developers
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module wires the pieces together: it owns the annotation history,
//! the transient polygon buffer, the labels, and the gesture machine, and
//! routes every committed mutation through the history so each user
//! action is one undoable step.

use crate::interaction;
use crate::interaction::gesture::GestureMachine;
use crate::models::annotation::{Annotation, Point};
use crate::models::history::History;
use crate::models::label::{self, Label};
use crate::ui::sidebar::{self, LabelEdit, SidebarAction};
use crate::ui::canvas;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};

/// Active annotation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Point,
    Polygon,
}

impl Tool {
    /// Display name for the status line.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Point => "Point",
            Tool::Polygon => "Polygon",
        }
    }
}

/// Main application state.
pub struct PinpolyApp {
    /// Current annotation mode
    tool: Tool,

    /// Committed annotations, wrapped in undo/redo history
    history: History<Vec<Annotation>>,

    /// In-progress polygon vertices; transient, never part of history
    current_points: Vec<Point>,

    /// Available labels
    labels: Vec<Label>,

    /// Name of the active label
    active_label: String,

    /// In-flight label rename, if any
    label_edit: Option<LabelEdit>,

    /// Drag/click/hover state for the canvas
    gesture: GestureMachine,

    /// Loaded image texture for display
    image_texture: Option<egui::TextureHandle>,

    /// Decoded image pixels, kept for raster export
    image_pixels: Option<image::RgbaImage>,

    /// Image dimensions (width, height)
    image_size: Option<(u32, u32)>,

    /// Receiver for background image loading
    image_loader: Option<Receiver<Result<crate::io::media::LoadedImage, String>>>,

    /// Loading state message
    loading_message: Option<String>,
}

/// Keyboard shortcut actions. Escape cancels the in-progress polygon,
/// Ctrl+Z / Ctrl+Shift+Z (or Ctrl+Y) drive the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shortcut {
    CancelDraw,
    Undo,
    Redo,
}

/// Map raw key state to a shortcut.
///
/// All shortcuts, Escape included, are suppressed while a widget owns the
/// keyboard, so typing in a label rename field never reaches the canvas.
fn resolve_shortcut(
    wants_keyboard: bool,
    escape: bool,
    undo: bool,
    redo: bool,
) -> Option<Shortcut> {
    if wants_keyboard {
        return None;
    }
    if escape {
        Some(Shortcut::CancelDraw)
    } else if redo {
        Some(Shortcut::Redo)
    } else if undo {
        Some(Shortcut::Undo)
    } else {
        None
    }
}

fn default_labels() -> Vec<Label> {
    vec![
        Label::new("object 1", "rgba(239, 68, 68, 0.5)"),
        Label::new("object 2", "rgba(59, 130, 246, 0.5)"),
        Label::new("object 3", "rgba(34, 197, 94, 0.5)"),
        Label::new("object 4", "rgba(234, 179, 8, 0.5)"),
    ]
}

impl Default for PinpolyApp {
    fn default() -> Self {
        Self::new()
    }
}

impl PinpolyApp {
    /// Create a new Pinpoly application instance.
    pub fn new() -> Self {
        let labels = default_labels();
        let active_label = labels[0].name.clone();
        Self {
            tool: Tool::Point,
            history: History::new(Vec::new()),
            current_points: Vec::new(),
            labels,
            active_label,
            label_edit: None,
            gesture: GestureMachine::new(),
            image_texture: None,
            image_pixels: None,
            image_size: None,
            image_loader: None,
            loading_message: None,
        }
    }

    fn active_label(&self) -> Label {
        self.labels
            .iter()
            .find(|l| l.name == self.active_label)
            .cloned()
            .unwrap_or_else(|| Label::new(self.active_label.clone(), "rgba(255, 255, 255, 0.7)"))
    }

    /// Load an image file and create a texture for display (asynchronously).
    pub fn load_image_file(&mut self, path: PathBuf) {
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some("Loading image...".to_string());

        // Spawn background thread for decoding
        std::thread::spawn(move || {
            let result = crate::io::media::load_image(&path)
                .map(|img| {
                    log::info!(
                        "Loaded image: {} ({}x{})",
                        path.display(),
                        img.width,
                        img.height
                    );
                    img
                })
                .map_err(|e| e.to_string());
            let _ = sender.send(result);
        });
    }

    /// Import annotation data into the current session as one undoable commit.
    fn import_annotations(&mut self, path: PathBuf) {
        let extension = path.extension().and_then(|s| s.to_str());
        let result = match extension {
            Some("yaml") | Some("yml") => crate::io::serialization::import_yaml(&path),
            _ => crate::io::serialization::import_json(&path),
        };
        match result {
            Ok(annotations) => {
                log::info!(
                    "Imported {} annotations from {}",
                    annotations.len(),
                    path.display()
                );
                self.history.set_state(annotations);
            }
            Err(e) => log::error!("Failed to import annotations: {e}"),
        }
    }

    /// Export the annotation list to a data file.
    fn export_annotations(&self, path: PathBuf) {
        let annotations = self.history.present();
        let extension = path.extension().and_then(|s| s.to_str());
        let result = match extension {
            Some("yaml") | Some("yml") => {
                crate::io::serialization::export_yaml(annotations, &path)
            }
            _ => crate::io::serialization::export_json(annotations, &path),
        };
        match result {
            Ok(()) => log::info!("Exported annotations to {}", path.display()),
            Err(e) => log::error!("Failed to export annotations: {e}"),
        }
    }

    /// Export the image with annotations burned in.
    fn export_image(&self, path: PathBuf) {
        let Some(pixels) = &self.image_pixels else {
            return;
        };
        let fonts = egui::FontDefinitions::default();
        let Some(font) = fonts
            .font_data
            .get("Hack")
            .or_else(|| fonts.font_data.values().next())
        else {
            log::error!("No font available for raster export");
            return;
        };

        let result = crate::io::export::render_annotated(
            pixels,
            self.history.present(),
            font.font.as_ref(),
        )
        .and_then(|out| {
            let extension = path.extension().and_then(|s| s.to_str());
            match extension {
                Some("jpg") | Some("jpeg") => {
                    image::DynamicImage::ImageRgba8(out).to_rgb8().save(&path)?
                }
                _ => out.save(&path)?,
            }
            Ok(())
        });
        match result {
            Ok(()) => log::info!("Exported annotated image to {}", path.display()),
            Err(e) => log::error!("Failed to export annotated image: {e}"),
        }
    }

    fn rename_label(&mut self, old: &str, new: &str) {
        if !label::rename_label(&mut self.labels, old, new) {
            log::info!("Rejected label rename '{old}' -> '{new}'");
            return;
        }
        self.history
            .set_state_with(|anns| label::rename_annotations(anns, old, new));
        if self.active_label == old {
            self.active_label = new.trim().to_string();
        }
        log::info!("Renamed label '{old}' -> '{new}'");
    }

    fn clear_all(&mut self) {
        self.history.set_state(Vec::new());
        self.current_points.clear();
        log::info!("Cleared all annotations");
    }

    fn handle_sidebar_action(&mut self, action: SidebarAction) {
        match action {
            SidebarAction::None => {}
            SidebarAction::SelectLabel(name) => self.active_label = name,
            SidebarAction::RenameLabel { old, new } => self.rename_label(&old, &new),
            SidebarAction::CompletePolygon => {
                let active = self.active_label();
                interaction::apply(
                    interaction::gesture::Intent::CompletePolygon,
                    &mut self.history,
                    &mut self.current_points,
                    &active,
                );
            }
            SidebarAction::UndoPoint => {
                self.current_points.pop();
            }
            SidebarAction::ClearCurrent => self.current_points.clear(),
            SidebarAction::Undo => self.history.undo(),
            SidebarAction::Redo => self.history.redo(),
            SidebarAction::ClearAll => self.clear_all(),
            SidebarAction::SaveImage => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("PNG", &["png"])
                    .add_filter("JPEG", &["jpg", "jpeg"])
                    .set_file_name("annotated.png")
                    .save_file()
                {
                    self.export_image(path);
                }
            }
            SidebarAction::SaveData => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("JSON", &["json"])
                    .add_filter("YAML", &["yaml", "yml"])
                    .set_file_name("annotations.json")
                    .save_file()
                {
                    self.export_annotations(path);
                }
            }
        }
    }

    fn poll_image_loader(&mut self, ctx: &egui::Context) {
        let Some(receiver) = &self.image_loader else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };
        self.image_loader = None;
        self.loading_message = None;

        match result {
            Ok(loaded) => {
                let size = [loaded.width as usize, loaded.height as usize];
                let color_image =
                    egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
                let texture =
                    ctx.load_texture("loaded_image", color_image, egui::TextureOptions::LINEAR);

                self.image_texture = Some(texture);
                self.image_size = Some((loaded.width, loaded.height));
                self.image_pixels =
                    image::RgbaImage::from_raw(loaded.width, loaded.height, loaded.pixels);

                // Fresh history per image: no cross-image undo.
                self.history.reset(Vec::new());
                self.current_points.clear();
                self.gesture.cancel();
                log::info!("Image loaded successfully");
            }
            Err(e) => {
                log::error!("Failed to load image: {e}");
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (escape, undo, redo) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.modifiers.command && !i.modifiers.shift && i.key_pressed(egui::Key::Z),
                (i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z))
                    || (i.modifiers.command && i.key_pressed(egui::Key::Y)),
            )
        });

        match resolve_shortcut(ctx.wants_keyboard_input(), escape, undo, redo) {
            Some(Shortcut::CancelDraw) => {
                // Cancel the in-progress polygon
                self.current_points.clear();
            }
            Some(Shortcut::Undo) => {
                self.history.undo();
                log::info!("Undo");
            }
            Some(Shortcut::Redo) => {
                self.history.redo();
                log::info!("Redo");
            }
            None => {}
        }
    }

    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Image...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "tiff", "tif"])
                            .pick_file()
                        {
                            self.load_image_file(path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Load Annotations...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Annotations", &["json", "yaml", "yml"])
                            .pick_file()
                        {
                            self.import_annotations(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    ui.menu_button("Export", |ui| {
                        if ui.button("Annotated Image...").clicked() {
                            self.handle_sidebar_action(SidebarAction::SaveImage);
                            ui.close_menu();
                        }
                        if ui.button("Annotation Data...").clicked() {
                            self.handle_sidebar_action(SidebarAction::SaveData);
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    if ui
                        .add_enabled(self.history.can_undo(), egui::Button::new("Undo (Ctrl+Z)"))
                        .clicked()
                    {
                        self.history.undo();
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(
                            self.history.can_redo(),
                            egui::Button::new("Redo (Ctrl+Shift+Z)"),
                        )
                        .clicked()
                    {
                        self.history.redo();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Clear All").clicked() {
                        self.clear_all();
                        ui.close_menu();
                    }
                });

                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        ui.close_menu();
                    }
                });
            });
        });
    }
}

impl eframe::App for PinpolyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_image_loader(ctx);

        // Request repaint while loading (to update spinner)
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        self.show_menu_bar(ctx);

        let sidebar_action = egui::SidePanel::left("sidebar")
            .default_width(220.0)
            .show(ctx, |ui| {
                sidebar::show(
                    ui,
                    &mut self.tool,
                    &self.labels,
                    &self.active_label,
                    &mut self.label_edit,
                    !self.current_points.is_empty(),
                    self.image_texture.is_some(),
                    self.history.present().len(),
                    self.history.can_undo(),
                    self.history.can_redo(),
                )
            })
            .inner;
        self.handle_sidebar_action(sidebar_action);

        self.handle_shortcuts(ctx);

        let intents = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(message) = &self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    Vec::new()
                } else {
                    let active = self.active_label();
                    canvas::show(
                        ui,
                        &self.image_texture,
                        self.image_size,
                        self.history.present(),
                        &self.current_points,
                        &active.color,
                        self.tool,
                        &mut self.gesture,
                    )
                }
            })
            .inner;

        let active = self.active_label();
        for intent in intents {
            interaction::apply(
                intent,
                &mut self.history,
                &mut self.current_points,
                &active,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focused_text_field_swallows_all_shortcuts() {
        // Escape while renaming a label must not clear the polygon buffer.
        assert_eq!(resolve_shortcut(true, true, false, false), None);
        assert_eq!(resolve_shortcut(true, false, true, false), None);
        assert_eq!(resolve_shortcut(true, false, false, true), None);
    }

    #[test]
    fn test_shortcut_mapping() {
        assert_eq!(
            resolve_shortcut(false, true, false, false),
            Some(Shortcut::CancelDraw)
        );
        assert_eq!(
            resolve_shortcut(false, false, true, false),
            Some(Shortcut::Undo)
        );
        assert_eq!(
            resolve_shortcut(false, false, false, true),
            Some(Shortcut::Redo)
        );
        assert_eq!(resolve_shortcut(false, false, false, false), None);
    }
}
