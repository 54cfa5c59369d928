// Copyright (c) 2025, Pinpoly developers
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and annotation.
//!
//! Owns the screen/image coordinate mapping (the image is fitted and
//! centered at `scale = min(fit, 1)`), translates egui pointer state into
//! the gesture machine's input events, and renders the image, committed
//! annotations, and the in-progress polygon. All stroke widths, marker
//! radii, and label boxes are constant in screen pixels regardless of the
//! display scale.

use crate::app::Tool;
use crate::interaction::gesture::{GestureMachine, InputEvent, Intent};
use crate::interaction::hittest::{self, TextMeasure, LABEL_FONT_SIZE};
use crate::models::annotation::{Annotation, Point};
use crate::util::{color, geometry};

const POINT_MARKER_RADIUS: f32 = 6.0;
const DRAFT_VERTEX_RADIUS: f32 = 4.0;
const ARROW_HEAD_SIZE: f32 = 8.0;
const LABEL_TEXT_PADDING: f32 = 8.0;

/// Text measurement backed by the egui font system.
struct PainterMeasure {
    painter: egui::Painter,
}

impl TextMeasure for PainterMeasure {
    fn label_width(&self, text: &str) -> f32 {
        self.painter
            .layout_no_wrap(
                text.to_owned(),
                egui::FontId::proportional(LABEL_FONT_SIZE),
                egui::Color32::WHITE,
            )
            .size()
            .x
    }
}

fn color32(c: color::Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.alpha_u8())
}

/// Display the canvas, feed input through the gesture machine, and return
/// the intents it produced this frame.
#[allow(clippy::too_many_arguments)]
pub fn show(
    ui: &mut egui::Ui,
    texture: &Option<egui::TextureHandle>,
    image_size: Option<(u32, u32)>,
    annotations: &[Annotation],
    current_points: &[Point],
    active_color: &str,
    tool: Tool,
    gesture: &mut GestureMachine,
) -> Vec<Intent> {
    let mut intents = Vec::new();
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let (Some(texture), Some((img_width, img_height))) = (texture.as_ref(), image_size) else {
            show_welcome(ui);
            return;
        };

        let available = ui.available_size();
        let scale = (available.x / img_width as f32)
            .min(available.y / img_height as f32)
            .min(1.0);
        let display = egui::vec2(img_width as f32 * scale, img_height as f32 * scale);
        let offset = (available - display) / 2.0;
        let image_rect = egui::Rect::from_min_size(ui.min_rect().min + offset, display);

        let painter = ui.painter().clone();
        painter.image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        let response = ui.allocate_rect(image_rect, egui::Sense::click_and_drag());
        let measure = PainterMeasure {
            painter: painter.clone(),
        };

        // Synthesize toolkit-independent events from raw pointer state.
        let (pressed, released, double_clicked, pointer_pos) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.button_double_clicked(egui::PointerButton::Primary),
                i.pointer.latest_pos(),
            )
        });

        let mut events = Vec::new();
        match pointer_pos {
            Some(pos) if response.hovered() && image_rect.contains(pos) => {
                let p = screen_to_image(pos, image_rect, scale);
                if pressed {
                    events.push(InputEvent::Down(p));
                }
                events.push(InputEvent::Move(p));
                if released {
                    events.push(InputEvent::Up(p));
                }
                if double_clicked {
                    events.push(InputEvent::DoubleClick);
                }
            }
            _ => events.push(InputEvent::Leave),
        }

        for event in events {
            if let Some(intent) = gesture.handle(event, tool, annotations, scale, &measure) {
                intents.push(intent);
            }
        }

        // Hover affordance: move cursor over draggable targets.
        let on_draggable = gesture.is_dragging()
            || gesture
                .hover()
                .is_some_and(|p| hittest::resolve(p, annotations, scale, &measure).is_some());
        if response.hovered() {
            ui.ctx().output_mut(|o| {
                o.cursor_icon = if on_draggable {
                    egui::CursorIcon::Move
                } else {
                    egui::CursorIcon::Crosshair
                };
            });
        }

        for ann in annotations {
            draw_annotation(&painter, ann, &measure, image_rect, scale);
        }
        draw_current_points(
            &painter,
            current_points,
            gesture.hover(),
            active_color,
            image_rect,
            scale,
        );
    });

    ui.separator();
    ui.horizontal(|ui| {
        ui.label(format!("Mode: {}", tool.name()));
        ui.separator();
        if image_size.is_some() {
            ui.label(format!("{} annotations", annotations.len()));
        } else {
            ui.label("No image loaded");
        }
    });

    intents
}

fn screen_to_image(pos: egui::Pos2, image_rect: egui::Rect, scale: f32) -> Point {
    Point::new(
        f64::from((pos.x - image_rect.min.x) / scale),
        f64::from((pos.y - image_rect.min.y) / scale),
    )
}

fn image_to_screen(p: Point, image_rect: egui::Rect, scale: f32) -> egui::Pos2 {
    egui::pos2(
        image_rect.min.x + p.x as f32 * scale,
        image_rect.min.y + p.y as f32 * scale,
    )
}

/// Draw one committed annotation: shape, then label box, then arrow.
fn draw_annotation(
    painter: &egui::Painter,
    ann: &Annotation,
    measure: &dyn TextMeasure,
    image_rect: egui::Rect,
    scale: f32,
) {
    let fill = color::parse_or_fallback(ann.color());

    match ann {
        Annotation::Polygon { points, .. } => {
            // Concave polygons need real triangulation; a convex fill
            // would not match the hit-tester or the raster export.
            let mut mesh = egui::Mesh::default();
            for p in points {
                mesh.vertices.push(egui::epaint::Vertex {
                    pos: image_to_screen(*p, image_rect, scale),
                    uv: egui::epaint::WHITE_UV,
                    color: color32(fill),
                });
            }
            for tri in geometry::triangulate(points) {
                mesh.indices.extend(tri.iter().map(|&i| i as u32));
            }
            painter.add(egui::Shape::mesh(mesh));
        }
        Annotation::Point { point, .. } => {
            let center = image_to_screen(*point, image_rect, scale);
            painter.circle_filled(center, POINT_MARKER_RADIUS, color32(fill));
            painter.circle_stroke(
                center,
                POINT_MARKER_RADIUS,
                egui::Stroke::new(2.0, color32(fill.solid())),
            );
        }
    }

    // Label box (image-space geometry shared with the hit-test resolver).
    let label_box = hittest::label_box(ann, measure, scale);
    let box_rect = egui::Rect::from_min_size(
        image_to_screen(Point::new(label_box.x, label_box.y), image_rect, scale),
        egui::vec2(
            (label_box.width * f64::from(scale)) as f32,
            (label_box.height * f64::from(scale)) as f32,
        ),
    );
    painter.rect_filled(
        box_rect,
        0.0,
        egui::Color32::from_rgba_unmultiplied(40, 40, 40, 230),
    );
    painter.rect_stroke(
        box_rect,
        0.0,
        egui::Stroke::new(1.0, egui::Color32::from_rgb(10, 10, 10)),
    );
    painter.text(
        egui::pos2(box_rect.min.x + LABEL_TEXT_PADDING, box_rect.center().y),
        egui::Align2::LEFT_CENTER,
        ann.label(),
        egui::FontId::proportional(LABEL_FONT_SIZE),
        egui::Color32::WHITE,
    );

    // Arrow from the box's bottom-center to the shape anchor.
    let start = box_rect.center_bottom();
    let end = image_to_screen(ann.anchor(), image_rect, scale);
    painter.line_segment([start, end], egui::Stroke::new(2.0, egui::Color32::BLACK));
    draw_arrow_head(painter, start, end);
}

fn draw_arrow_head(painter: &egui::Painter, start: egui::Pos2, end: egui::Pos2) {
    let dir = end - start;
    if dir.length() < f32::EPSILON {
        return;
    }
    let angle = dir.y.atan2(dir.x);
    let wing = |a: f32| {
        egui::pos2(
            end.x - ARROW_HEAD_SIZE * a.cos(),
            end.y - ARROW_HEAD_SIZE * a.sin(),
        )
    };
    painter.add(egui::Shape::convex_polygon(
        vec![
            end,
            wing(angle - std::f32::consts::FRAC_PI_6),
            wing(angle + std::f32::consts::FRAC_PI_6),
        ],
        egui::Color32::BLACK,
        egui::Stroke::NONE,
    ));
}

/// Draw the in-progress polygon: committed vertices, connecting polyline,
/// and a live segment to the hover position.
fn draw_current_points(
    painter: &egui::Painter,
    current_points: &[Point],
    hover: Option<Point>,
    active_color: &str,
    image_rect: egui::Rect,
    scale: f32,
) {
    if current_points.is_empty() {
        return;
    }
    let solid = color32(color::parse_or_fallback(active_color).solid());

    let mut line: Vec<egui::Pos2> = current_points
        .iter()
        .map(|p| image_to_screen(*p, image_rect, scale))
        .collect();
    if let Some(hover) = hover {
        line.push(image_to_screen(hover, image_rect, scale));
    }
    if line.len() >= 2 {
        painter.add(egui::Shape::line(line, egui::Stroke::new(2.0, solid)));
    }

    for p in current_points {
        painter.circle_filled(
            image_to_screen(*p, image_rect, scale),
            DRAFT_VERTEX_RADIUS,
            solid,
        );
    }
}

fn show_welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("Pinpoly")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.label(
                egui::RichText::new("Point & polygon image annotator")
                    .size(14.0)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Open an image to begin annotating")
                    .color(egui::Color32::from_gray(180)),
            );
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new("Point mode: click to place a marker")
                    .weak()
                    .color(egui::Color32::from_gray(130)),
            );
            ui.label(
                egui::RichText::new("Polygon mode: click vertices, double-click to close")
                    .weak()
                    .color(egui::Color32::from_gray(130)),
            );
            ui.label(
                egui::RichText::new("Drag shapes or their labels to move them")
                    .weak()
                    .color(egui::Color32::from_gray(130)),
            );
        });
    });
}
