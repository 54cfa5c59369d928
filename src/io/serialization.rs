// Copyright (c) 2025, Pinpoly developers
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data serialization and deserialization.
//!
//! Exports the committed annotation list in JSON (the interchange format
//! for downstream ML pipelines) or YAML, and reads either back. The
//! round-trip is lossless: deserializing an export reproduces an equal
//! annotation list.

use crate::models::annotation::Annotation;
use anyhow::Result;
use std::path::Path;

/// Export annotations to pretty-printed JSON.
pub fn export_json(annotations: &[Annotation], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(annotations)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Export annotations to YAML.
pub fn export_yaml(annotations: &[Annotation], path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(annotations)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Import annotations from a JSON file.
pub fn import_json(path: &Path) -> Result<Vec<Annotation>> {
    let json = std::fs::read_to_string(path)?;
    validate(serde_json::from_str(&json)?)
}

/// Import annotations from a YAML file.
pub fn import_yaml(path: &Path) -> Result<Vec<Annotation>> {
    let yaml = std::fs::read_to_string(path)?;
    validate(serde_yaml::from_str(&yaml)?)
}

/// Check the committed-annotation invariants on imported data.
///
/// A committed polygon always has at least 3 vertices; files that break
/// this are rejected whole so a bad import never reaches the history.
fn validate(annotations: Vec<Annotation>) -> Result<Vec<Annotation>> {
    for ann in &annotations {
        if let Annotation::Polygon { label, points, .. } = ann {
            if points.len() < 3 {
                anyhow::bail!(
                    "polygon annotation '{}' has {} vertices, at least 3 required",
                    label,
                    points.len()
                );
            }
        }
    }
    Ok(annotations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::Point;

    fn sample() -> Vec<Annotation> {
        vec![
            Annotation::Point {
                label: "dog".to_string(),
                point: Point::new(100.0, 100.0),
                color: "rgba(239, 68, 68, 0.5)".to_string(),
                label_position: Some(Point::new(120.0, 80.0)),
            },
            Annotation::Polygon {
                label: "car".to_string(),
                points: vec![
                    Point::new(0.0, 0.0),
                    Point::new(10.0, 0.0),
                    Point::new(10.0, 10.0),
                ],
                color: "rgba(59, 130, 246, 0.5)".to_string(),
                label_position: None,
            },
        ]
    }

    #[test]
    fn test_json_file_roundtrip() {
        let dir = std::env::temp_dir().join("pinpoly_test_json");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("annotations.json");

        export_json(&sample(), &path).unwrap();
        let back = import_json(&path).unwrap();
        assert_eq!(back, sample());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let dir = std::env::temp_dir().join("pinpoly_test_yaml");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("annotations.yaml");

        export_yaml(&sample(), &path).unwrap();
        let back = import_yaml(&path).unwrap();
        assert_eq!(back, sample());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_import_rejects_polygon_with_too_few_vertices() {
        let dir = std::env::temp_dir().join("pinpoly_test_invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("annotations.json");

        // An empty vertex list would panic downstream the first time the
        // annotation's anchor is read.
        let text = r#"[
            {"type": "polygon", "label": "a", "points": [],
             "color": "rgba(239, 68, 68, 0.5)"}
        ]"#;
        std::fs::write(&path, text).unwrap();
        assert!(import_json(&path).is_err());

        let text = r#"[
            {"type": "polygon", "label": "a",
             "points": [{"x": 0.0, "y": 0.0}, {"x": 1.0, "y": 0.0}],
             "color": "rgba(239, 68, 68, 0.5)"}
        ]"#;
        std::fs::write(&path, text).unwrap();
        assert!(import_json(&path).is_err());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_import_accepts_hand_written_interchange_json() {
        let text = r#"[
            {"type": "point", "label": "dog", "point": {"x": 1.0, "y": 2.0},
             "color": "rgba(239, 68, 68, 0.5)"}
        ]"#;
        let anns: Vec<Annotation> = serde_json::from_str(text).unwrap();
        assert_eq!(anns.len(), 1);
        assert_eq!(anns[0].label(), "dog");
        // Missing labelPosition falls back to the anchor-derived default.
        assert_eq!(anns[0].label_position(), Point::new(21.0, -18.0));
    }
}
