// Copyright (c) 2025, Pinpoly developers
// SPDX-License-Identifier: BSD-3-Clause

//! Hit-testing of annotations under a cursor position.
//!
//! Given an image-space point, the resolver finds the highest-priority
//! interactive target. It makes two reverse-order passes over the
//! committed list: first every label box (labels always win, even a lower
//! annotation's label over a higher annotation's shape), then every shape.
//! Within a pass, the most recently added annotation wins ties.
//!
//! Label boxes and point hit radii are constant in screen pixels, so their
//! image-space extents divide by the current render scale.

use crate::models::annotation::{Annotation, Point};
use crate::util::geometry::{self, Rect};

/// On-screen font size for label text, in pixels.
pub const LABEL_FONT_SIZE: f32 = 14.0;
/// Horizontal padding added around the label text, in screen pixels.
pub const LABEL_BOX_PADDING: f64 = 16.0;
/// Label box height in screen pixels.
pub const LABEL_BOX_HEIGHT: f64 = 20.0;
/// Hit radius for point annotations, in screen pixels.
pub const POINT_HIT_RADIUS: f64 = 12.0;

/// Source of text widths for label-box sizing.
///
/// The UI measures through the egui font system; tests and headless code
/// supply a fixed-width stand-in.
pub trait TextMeasure {
    /// Width of `text` at the label font size, in screen pixels.
    fn label_width(&self, text: &str) -> f32;
}

/// Fixed per-character measure for tests and non-UI callers.
pub struct FixedMeasure(pub f32);

impl TextMeasure for FixedMeasure {
    fn label_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.0
    }
}

/// Which part of an annotation a hit landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Label,
    Shape,
}

/// A resolved hit: the annotation's index plus the part that was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub index: usize,
    pub target: HitTarget,
}

/// The label's bounding box in image space.
///
/// The box hangs above its anchor: `labelPosition` is the bottom-left
/// corner. Width and height are constant on screen, so they scale
/// inversely with the render scale.
pub fn label_box(ann: &Annotation, measure: &dyn TextMeasure, scale: f32) -> Rect {
    let pos = ann.label_position();
    let scale = f64::from(scale);
    let width = (f64::from(measure.label_width(ann.label())) + LABEL_BOX_PADDING) / scale;
    let height = LABEL_BOX_HEIGHT / scale;
    Rect {
        x: pos.x,
        y: pos.y - height,
        width,
        height,
    }
}

/// Resolve the interactive target under `p`, if any.
pub fn resolve(
    p: Point,
    annotations: &[Annotation],
    scale: f32,
    measure: &dyn TextMeasure,
) -> Option<Hit> {
    // Labels first, topmost annotation first.
    for (index, ann) in annotations.iter().enumerate().rev() {
        if label_box(ann, measure, scale).contains(p) {
            return Some(Hit {
                index,
                target: HitTarget::Label,
            });
        }
    }

    for (index, ann) in annotations.iter().enumerate().rev() {
        let hit = match ann {
            Annotation::Polygon { points, .. } => geometry::point_in_polygon(p, points),
            Annotation::Point { point, .. } => {
                geometry::distance(p, *point) <= POINT_HIT_RADIUS / f64::from(scale)
            }
        };
        if hit {
            return Some(Hit {
                index,
                target: HitTarget::Shape,
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEASURE: FixedMeasure = FixedMeasure(7.0);

    fn point_ann(x: f64, y: f64) -> Annotation {
        Annotation::Point {
            label: "dog".to_string(),
            point: Point::new(x, y),
            color: "rgba(239, 68, 68, 0.5)".to_string(),
            label_position: Some(Point::new(x + 20.0, y - 20.0)),
        }
    }

    fn polygon_ann(origin: f64, size: f64) -> Annotation {
        Annotation::Polygon {
            label: "car".to_string(),
            points: vec![
                Point::new(origin, origin),
                Point::new(origin + size, origin),
                Point::new(origin + size, origin + size),
                Point::new(origin, origin + size),
            ],
            color: "rgba(59, 130, 246, 0.5)".to_string(),
            label_position: Some(Point::new(origin + 20.0, origin - 20.0)),
        }
    }

    #[test]
    fn test_miss_resolves_to_none() {
        let anns = vec![point_ann(100.0, 100.0)];
        assert_eq!(resolve(Point::new(500.0, 500.0), &anns, 1.0, &MEASURE), None);
        assert_eq!(resolve(Point::new(0.0, 0.0), &[], 1.0, &MEASURE), None);
    }

    #[test]
    fn test_shape_hit_inside_polygon() {
        let anns = vec![polygon_ann(0.0, 50.0)];
        let hit = resolve(Point::new(25.0, 25.0), &anns, 1.0, &MEASURE).unwrap();
        assert_eq!(hit, Hit { index: 0, target: HitTarget::Shape });
    }

    #[test]
    fn test_point_hit_within_radius() {
        let anns = vec![point_ann(100.0, 100.0)];
        let hit = resolve(Point::new(110.0, 100.0), &anns, 1.0, &MEASURE);
        assert_eq!(hit.map(|h| h.target), Some(HitTarget::Shape));
        assert_eq!(resolve(Point::new(113.0, 100.0), &anns, 1.0, &MEASURE), None);
    }

    #[test]
    fn test_point_hit_radius_is_screen_scale_invariant() {
        let anns = vec![point_ann(100.0, 100.0)];
        // 10 screen px from the marker: 20 image px at scale 0.5, 5 at scale 2.
        let hit = resolve(Point::new(120.0, 100.0), &anns, 0.5, &MEASURE);
        assert_eq!(hit.map(|h| h.target), Some(HitTarget::Shape));
        let hit = resolve(Point::new(105.0, 100.0), &anns, 2.0, &MEASURE);
        assert_eq!(hit.map(|h| h.target), Some(HitTarget::Shape));
        // 20 image px at scale 2 is 40 screen px: a miss.
        assert_eq!(resolve(Point::new(120.0, 100.0), &anns, 2.0, &MEASURE), None);
    }

    #[test]
    fn test_label_hit() {
        let anns = vec![point_ann(100.0, 100.0)];
        // Label box spans x 120..~157, y 60..80 at scale 1.
        let hit = resolve(Point::new(125.0, 70.0), &anns, 1.0, &MEASURE).unwrap();
        assert_eq!(hit, Hit { index: 0, target: HitTarget::Label });
    }

    #[test]
    fn test_topmost_annotation_wins_shape_ties() {
        let anns = vec![polygon_ann(0.0, 50.0), polygon_ann(10.0, 50.0)];
        let hit = resolve(Point::new(30.0, 30.0), &anns, 1.0, &MEASURE).unwrap();
        assert_eq!(hit.index, 1);
    }

    #[test]
    fn test_label_beats_shape_across_annotations() {
        // Annotation 1's polygon covers annotation 0's label box; the label
        // still wins because all labels are checked before any shape.
        let mut lower = point_ann(100.0, 100.0);
        if let Annotation::Point { label_position, .. } = &mut lower {
            *label_position = Some(Point::new(100.0, 100.0));
        }
        let cover = polygon_ann(50.0, 100.0);
        let anns = vec![lower, cover];
        let hit = resolve(Point::new(110.0, 90.0), &anns, 1.0, &MEASURE).unwrap();
        assert_eq!(hit, Hit { index: 0, target: HitTarget::Label });
    }

    #[test]
    fn test_overlapping_label_boxes_resolve_to_later_annotation() {
        let a = point_ann(100.0, 100.0);
        let b = point_ann(102.0, 102.0);
        let anns = vec![a, b];
        let hit = resolve(Point::new(125.0, 75.0), &anns, 1.0, &MEASURE).unwrap();
        assert_eq!(hit, Hit { index: 1, target: HitTarget::Label });
    }
}
