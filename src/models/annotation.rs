// Copyright (c) 2025, Pinpoly developers
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the core data model: image-space points and the
//! point/polygon annotation union. All geometry is stored in image-space
//! pixel coordinates, independent of the on-screen display scale, so
//! exported data and redraws are resolution-independent.

use serde::{Deserialize, Serialize};

/// A 2D point in image-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The point translated by a delta.
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Offset from the shape anchor to the default label position.
pub const LABEL_OFFSET: (f64, f64) = (20.0, -20.0);

/// An annotation: a single point or a closed polygon, tagged with a label
/// name and a color.
///
/// Serializes to the interchange format consumed by downstream tooling:
/// externally tagged with `"type": "point" | "polygon"`, `labelPosition`
/// omitted when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Annotation {
    Point {
        label: String,
        point: Point,
        color: String,
        #[serde(rename = "labelPosition", skip_serializing_if = "Option::is_none")]
        label_position: Option<Point>,
    },
    Polygon {
        label: String,
        points: Vec<Point>,
        color: String,
        #[serde(rename = "labelPosition", skip_serializing_if = "Option::is_none")]
        label_position: Option<Point>,
    },
}

impl Annotation {
    /// The label name this annotation is tagged with.
    pub fn label(&self) -> &str {
        match self {
            Annotation::Point { label, .. } | Annotation::Polygon { label, .. } => label,
        }
    }

    /// Rewrite the label name (used by label rename propagation).
    pub fn set_label(&mut self, name: &str) {
        match self {
            Annotation::Point { label, .. } | Annotation::Polygon { label, .. } => {
                name.clone_into(label);
            }
        }
    }

    /// The color string captured from the label at creation time.
    pub fn color(&self) -> &str {
        match self {
            Annotation::Point { color, .. } | Annotation::Polygon { color, .. } => color,
        }
    }

    /// The anchor point: the point itself, or the polygon's first vertex.
    pub fn anchor(&self) -> Point {
        match self {
            Annotation::Point { point, .. } => *point,
            Annotation::Polygon { points, .. } => points[0],
        }
    }

    /// Default label position for a given anchor.
    pub fn default_label_position(anchor: Point) -> Point {
        anchor.translated(LABEL_OFFSET.0, LABEL_OFFSET.1)
    }

    /// The effective label position: explicit if the user has dragged the
    /// label, otherwise derived from the anchor.
    pub fn label_position(&self) -> Point {
        let explicit = match self {
            Annotation::Point { label_position, .. }
            | Annotation::Polygon { label_position, .. } => *label_position,
        };
        explicit.unwrap_or_else(|| Self::default_label_position(self.anchor()))
    }

    /// The annotation with its shape translated by a delta.
    ///
    /// The label position moves by the same delta so a user-chosen offset
    /// from the shape is preserved; it becomes explicit in the process.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let label_position = Some(self.label_position().translated(dx, dy));
        match self {
            Annotation::Point {
                label,
                point,
                color,
                ..
            } => Annotation::Point {
                label: label.clone(),
                point: point.translated(dx, dy),
                color: color.clone(),
                label_position,
            },
            Annotation::Polygon {
                label,
                points,
                color,
                ..
            } => Annotation::Polygon {
                label: label.clone(),
                points: points.iter().map(|p| p.translated(dx, dy)).collect(),
                color: color.clone(),
                label_position,
            },
        }
    }

    /// The annotation with only its label position translated by a delta.
    pub fn with_label_translated(&self, dx: f64, dy: f64) -> Self {
        let mut ann = self.clone();
        let moved = Some(self.label_position().translated(dx, dy));
        match &mut ann {
            Annotation::Point { label_position, .. }
            | Annotation::Polygon { label_position, .. } => *label_position = moved,
        }
        ann
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_ann() -> Annotation {
        Annotation::Point {
            label: "dog".to_string(),
            point: Point::new(100.0, 100.0),
            color: "rgba(239, 68, 68, 0.5)".to_string(),
            label_position: None,
        }
    }

    fn polygon_ann() -> Annotation {
        Annotation::Polygon {
            label: "car".to_string(),
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
            ],
            color: "rgba(59, 130, 246, 0.5)".to_string(),
            label_position: None,
        }
    }

    #[test]
    fn test_default_label_position_from_anchor() {
        assert_eq!(point_ann().label_position(), Point::new(120.0, 80.0));
        // Polygon anchors at its first vertex.
        assert_eq!(polygon_ann().label_position(), Point::new(20.0, -20.0));
    }

    #[test]
    fn test_explicit_label_position_wins() {
        let mut ann = point_ann();
        if let Annotation::Point { label_position, .. } = &mut ann {
            *label_position = Some(Point::new(5.0, 5.0));
        }
        assert_eq!(ann.label_position(), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_translate_moves_shape_and_label_together() {
        let moved = point_ann().translated(10.0, 5.0);
        assert_eq!(moved.anchor(), Point::new(110.0, 105.0));
        assert_eq!(moved.label_position(), Point::new(130.0, 85.0));
    }

    #[test]
    fn test_translate_polygon_moves_all_vertices() {
        let moved = polygon_ann().translated(-1.0, 2.0);
        match &moved {
            Annotation::Polygon { points, .. } => {
                assert_eq!(points[0], Point::new(-1.0, 2.0));
                assert_eq!(points[2], Point::new(9.0, 12.0));
            }
            _ => panic!("expected polygon"),
        }
        assert_eq!(moved.label_position(), Point::new(19.0, -18.0));
    }

    #[test]
    fn test_label_translate_leaves_shape_alone() {
        let moved = point_ann().with_label_translated(3.0, -4.0);
        assert_eq!(moved.anchor(), Point::new(100.0, 100.0));
        assert_eq!(moved.label_position(), Point::new(123.0, 76.0));
    }

    #[test]
    fn test_json_interchange_shape() {
        let json = serde_json::to_value(point_ann().translated(0.0, 0.0)).unwrap();
        assert_eq!(json["type"], "point");
        assert_eq!(json["label"], "dog");
        assert_eq!(json["labelPosition"]["x"], 120.0);

        // Absent label position is omitted entirely.
        let json = serde_json::to_value(point_ann()).unwrap();
        assert!(json.get("labelPosition").is_none());
    }

    #[test]
    fn test_json_roundtrip() {
        let anns = vec![point_ann(), polygon_ann().translated(1.0, 1.0)];
        let text = serde_json::to_string(&anns).unwrap();
        let back: Vec<Annotation> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, anns);
    }
}
