// Copyright (c) 2025, Pinpoly developers
// SPDX-License-Identifier: BSD-3-Clause

//! Raster export of the annotated image.
//!
//! Reproduces the canvas draw order (shape, label box, label text, arrow)
//! on a CPU image at the source resolution, independent of the on-screen
//! display scale. Annotation chrome is scaled by `max(1, height / 720)` so
//! labels stay legible on high-resolution images.
//!
//! Each annotation is drawn on its own transparent layer and composited
//! with `image::imageops::overlay`, so semi-transparent fills blend over
//! the photo and over each other the way the on-screen painter does.

use crate::models::annotation::{Annotation, Point};
use crate::util::color;
use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use anyhow::{Context, Result};
use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut, draw_hollow_rect_mut,
    draw_line_segment_mut, draw_polygon_mut, draw_text_mut,
};
use imageproc::point::Point as PixelPoint;
use imageproc::rect::Rect as PixelRect;

const FONT_SIZE: f32 = 18.0;
const BOX_HEIGHT: f32 = 24.0;
const BOX_PADDING: f32 = 10.0;
const POINT_RADIUS: f32 = 7.0;
const ARROW_HEAD: f32 = 9.0;

const BOX_FILL: Rgba<u8> = Rgba([40, 40, 40, 230]);
const BOX_STROKE: Rgba<u8> = Rgba([10, 10, 10, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Render the image with all committed annotations burned in.
pub fn render_annotated(
    image: &RgbaImage,
    annotations: &[Annotation],
    font_data: &[u8],
) -> Result<RgbaImage> {
    let font = FontRef::try_from_slice(font_data).context("Failed to parse export font")?;
    let (width, height) = image.dimensions();
    let sf = (height as f32 / 720.0).max(1.0);

    let mut out = image.clone();
    for ann in annotations {
        let mut layer = RgbaImage::new(width, height);
        draw_shape(&mut layer, ann, sf);
        draw_label(&mut layer, ann, &font, sf);
        imageops::overlay(&mut out, &layer, 0, 0);
    }
    Ok(out)
}

fn to_rgba(c: color::Rgba) -> Rgba<u8> {
    Rgba([c.r, c.g, c.b, c.alpha_u8()])
}

fn draw_shape(layer: &mut RgbaImage, ann: &Annotation, sf: f32) {
    let fill = color::parse_or_fallback(ann.color());
    match ann {
        Annotation::Polygon { points, .. } => {
            let mut poly: Vec<PixelPoint<i32>> = Vec::with_capacity(points.len());
            for p in points {
                let pp = PixelPoint::new(p.x.round() as i32, p.y.round() as i32);
                if poly.last() != Some(&pp) {
                    poly.push(pp);
                }
            }
            // draw_polygon_mut requires an open ring with distinct endpoints.
            if poly.len() > 1 && poly.first() == poly.last() {
                poly.pop();
            }
            if poly.len() >= 3 {
                draw_polygon_mut(layer, &poly, to_rgba(fill));
            }
        }
        Annotation::Point { point, .. } => {
            let center = (point.x.round() as i32, point.y.round() as i32);
            let radius = (POINT_RADIUS * sf).round() as i32;
            draw_filled_circle_mut(layer, center, radius, to_rgba(fill));
            let stroke = (2.0 * sf).round().max(1.0) as i32;
            for w in 0..stroke {
                draw_hollow_circle_mut(layer, center, radius + w, to_rgba(fill.solid()));
            }
        }
    }
}

fn draw_label(layer: &mut RgbaImage, ann: &Annotation, font: &FontRef<'_>, sf: f32) {
    let scale = PxScale::from(FONT_SIZE * sf);
    let pos = ann.label_position();
    let box_height = BOX_HEIGHT * sf;
    let padding = BOX_PADDING * sf;
    let box_width = text_width(font, scale, ann.label()) + padding * 2.0;
    let box_x = pos.x as f32;
    let box_y = pos.y as f32 - box_height;

    fill_rect(layer, box_x, box_y, box_width, box_height, BOX_FILL);
    stroke_rect(layer, box_x, box_y, box_width, box_height, sf.round().max(1.0) as i32, BOX_STROKE);

    let text_y = box_y + (box_height - FONT_SIZE * sf) / 2.0;
    draw_text_mut(
        layer,
        WHITE,
        (box_x + padding).round() as i32,
        text_y.round() as i32,
        scale,
        font,
        ann.label(),
    );

    // Arrow from the box's bottom-center to the shape anchor.
    let start = (box_x + box_width / 2.0, box_y + box_height);
    let anchor = ann.anchor();
    let end = (anchor.x as f32, anchor.y as f32);
    draw_thick_line(layer, start, end, 2.0 * sf, BLACK);
    draw_arrow_head(layer, start, end, ARROW_HEAD * sf);
}

fn text_width(font: &FontRef<'_>, scale: PxScale, text: &str) -> f32 {
    let scaled = font.as_scaled(scale);
    text.chars().map(|c| scaled.h_advance(scaled.glyph_id(c))).sum()
}

fn fill_rect(layer: &mut RgbaImage, x: f32, y: f32, w: f32, h: f32, color: Rgba<u8>) {
    let (w, h) = (w.round() as u32, h.round() as u32);
    if w == 0 || h == 0 {
        return;
    }
    draw_filled_rect_mut(
        layer,
        PixelRect::at(x.round() as i32, y.round() as i32).of_size(w, h),
        color,
    );
}

fn stroke_rect(layer: &mut RgbaImage, x: f32, y: f32, w: f32, h: f32, width: i32, color: Rgba<u8>) {
    let (x, y) = (x.round() as i32, y.round() as i32);
    let (w, h) = (w.round() as i32, h.round() as i32);
    for i in 0..width {
        let (iw, ih) = (w - 2 * i, h - 2 * i);
        if iw <= 0 || ih <= 0 {
            break;
        }
        draw_hollow_rect_mut(
            layer,
            PixelRect::at(x + i, y + i).of_size(iw as u32, ih as u32),
            color,
        );
    }
}

/// Approximate a thick line with parallel one-pixel segments.
fn draw_thick_line(
    layer: &mut RgbaImage,
    start: (f32, f32),
    end: (f32, f32),
    width: f32,
    color: Rgba<u8>,
) {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let len = (dx * dx + dy * dy).sqrt();
    if len < f32::EPSILON {
        return;
    }
    let (nx, ny) = (-dy / len, dx / len);
    let n = width.round().max(1.0) as i32;
    for k in 0..n {
        let off = k as f32 - (n - 1) as f32 / 2.0;
        draw_line_segment_mut(
            layer,
            (start.0 + nx * off, start.1 + ny * off),
            (end.0 + nx * off, end.1 + ny * off),
            color,
        );
    }
}

fn draw_arrow_head(layer: &mut RgbaImage, start: (f32, f32), end: (f32, f32), size: f32) {
    let angle = (end.1 - start.1).atan2(end.0 - start.0);
    let left = (
        end.0 - size * (angle - std::f32::consts::FRAC_PI_6).cos(),
        end.1 - size * (angle - std::f32::consts::FRAC_PI_6).sin(),
    );
    let right = (
        end.0 - size * (angle + std::f32::consts::FRAC_PI_6).cos(),
        end.1 - size * (angle + std::f32::consts::FRAC_PI_6).sin(),
    );
    let tri = [
        PixelPoint::new(end.0.round() as i32, end.1.round() as i32),
        PixelPoint::new(left.0.round() as i32, left.1.round() as i32),
        PixelPoint::new(right.0.round() as i32, right.1.round() as i32),
    ];
    // Degenerate (coincident) heads would trip draw_polygon_mut.
    if tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2] {
        draw_polygon_mut(layer, &tri, BLACK);
    }
}
