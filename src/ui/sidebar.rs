// Copyright (c) 2025, Pinpoly developers
// SPDX-License-Identifier: BSD-3-Clause

//! Side panel: annotation mode, label selection and rename, actions.
//!
//! Pure presentation: every button press is reported back to the app as a
//! [`SidebarAction`] and applied there, so all mutations stay on the
//! app's single dispatch path.

use crate::app::Tool;
use crate::models::label::Label;
use crate::util::color;

/// In-flight label rename: which label, and the edited text.
#[derive(Debug, Clone)]
pub struct LabelEdit {
    pub name: String,
    pub text: String,
}

/// Result of side panel interaction.
pub enum SidebarAction {
    None,
    SelectLabel(String),
    RenameLabel { old: String, new: String },
    CompletePolygon,
    UndoPoint,
    ClearCurrent,
    Undo,
    Redo,
    ClearAll,
    SaveImage,
    SaveData,
}

/// Display the side panel and report the requested action.
#[allow(clippy::too_many_arguments)]
pub fn show(
    ui: &mut egui::Ui,
    tool: &mut Tool,
    labels: &[Label],
    active_label: &str,
    editing: &mut Option<LabelEdit>,
    is_drawing: bool,
    has_image: bool,
    annotation_count: usize,
    can_undo: bool,
    can_redo: bool,
) -> SidebarAction {
    let mut action = SidebarAction::None;

    ui.heading("Mode");
    ui.horizontal(|ui| {
        if ui
            .selectable_label(*tool == Tool::Point, "⊙ Point")
            .clicked()
        {
            *tool = Tool::Point;
        }
        if ui
            .selectable_label(*tool == Tool::Polygon, "▱ Polygon")
            .clicked()
        {
            *tool = Tool::Polygon;
        }
    });
    let tool_text = match tool {
        Tool::Point => "Click to place a point marker",
        Tool::Polygon => "Click to add vertices, double-click to close",
    };
    ui.label(egui::RichText::new(tool_text).italics().weak());

    ui.separator();
    ui.heading("Labels");
    for label in labels {
        let is_active = label.name == active_label;
        let is_editing = editing.as_ref().is_some_and(|e| e.name == label.name);

        ui.horizontal(|ui| {
            let swatch = color::parse_or_fallback(&label.color).solid();
            let (rect, _) =
                ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
            ui.painter().rect_filled(
                rect,
                2.0,
                egui::Color32::from_rgb(swatch.r, swatch.g, swatch.b),
            );

            if is_editing {
                let edit = editing.as_mut().unwrap();
                let response = ui.text_edit_singleline(&mut edit.text);
                let commit = response.lost_focus()
                    && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let cancel = ui.input(|i| i.key_pressed(egui::Key::Escape));
                if commit {
                    action = SidebarAction::RenameLabel {
                        old: edit.name.clone(),
                        new: edit.text.trim().to_string(),
                    };
                    *editing = None;
                } else if cancel || (response.lost_focus() && !commit) {
                    *editing = None;
                }
            } else {
                if ui.selectable_label(is_active, &label.name).clicked() {
                    action = SidebarAction::SelectLabel(label.name.clone());
                }
                if ui.small_button("✏").clicked() {
                    *editing = Some(LabelEdit {
                        name: label.name.clone(),
                        text: label.name.clone(),
                    });
                }
            }
        });
    }

    ui.separator();
    ui.heading("Actions");

    if *tool == Tool::Polygon {
        if ui
            .add_enabled(is_drawing, egui::Button::new("Complete Polygon"))
            .clicked()
        {
            action = SidebarAction::CompletePolygon;
        }
        ui.horizontal(|ui| {
            if ui
                .add_enabled(is_drawing, egui::Button::new("Undo Point"))
                .clicked()
            {
                action = SidebarAction::UndoPoint;
            }
            if ui
                .add_enabled(is_drawing, egui::Button::new("Clear Current"))
                .clicked()
            {
                action = SidebarAction::ClearCurrent;
            }
        });
    }

    ui.horizontal(|ui| {
        if ui
            .add_enabled(can_undo, egui::Button::new("⟲ Undo"))
            .clicked()
        {
            action = SidebarAction::Undo;
        }
        if ui
            .add_enabled(can_redo, egui::Button::new("⟳ Redo"))
            .clicked()
        {
            action = SidebarAction::Redo;
        }
    });

    if ui
        .add_enabled(annotation_count > 0 || is_drawing, egui::Button::new("Clear All"))
        .clicked()
    {
        action = SidebarAction::ClearAll;
    }

    ui.separator();
    ui.heading("Export");
    if ui
        .add_enabled(
            has_image && annotation_count > 0,
            egui::Button::new("Save Annotated Image…"),
        )
        .clicked()
    {
        action = SidebarAction::SaveImage;
    }
    if ui
        .add_enabled(annotation_count > 0, egui::Button::new("Save Annotation Data…"))
        .clicked()
    {
        action = SidebarAction::SaveData;
    }

    action
}
