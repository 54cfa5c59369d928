// Copyright (c) 2025, Pinpoly developers
// SPDX-License-Identifier: BSD-3-Clause

//! Label definitions and rename propagation.
//!
//! Annotations reference labels by name, not by id, so a rename rewrites
//! the `label` field of every matching annotation. Renames to an empty
//! name or to another existing label's name are rejected as no-ops.

use super::annotation::Annotation;
use serde::{Deserialize, Serialize};

/// A label: a unique name plus the color applied to its annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub color: String,
}

impl Label {
    /// Create a new label.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Validate and apply a rename to the label list.
///
/// Returns `false` (leaving the list untouched) when the trimmed new name
/// is empty or collides with a different existing label.
pub fn rename_label(labels: &mut [Label], old_name: &str, new_name: &str) -> bool {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return false;
    }
    if labels
        .iter()
        .any(|l| l.name == new_name && l.name != old_name)
    {
        return false;
    }
    for label in labels.iter_mut() {
        if label.name == old_name {
            new_name.clone_into(&mut label.name);
        }
    }
    true
}

/// Rewrite every annotation tagged with `old_name` to `new_name`.
pub fn rename_annotations(annotations: &[Annotation], old_name: &str, new_name: &str) -> Vec<Annotation> {
    annotations
        .iter()
        .map(|ann| {
            if ann.label() == old_name {
                let mut ann = ann.clone();
                ann.set_label(new_name.trim());
                ann
            } else {
                ann.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::Point;

    fn labels() -> Vec<Label> {
        vec![
            Label::new("car", "rgba(239, 68, 68, 0.5)"),
            Label::new("tree", "rgba(34, 197, 94, 0.5)"),
        ]
    }

    fn ann(label: &str) -> Annotation {
        Annotation::Point {
            label: label.to_string(),
            point: Point::new(1.0, 2.0),
            color: "rgba(239, 68, 68, 0.5)".to_string(),
            label_position: None,
        }
    }

    #[test]
    fn test_rename_propagates_to_matching_annotations() {
        let mut ls = labels();
        assert!(rename_label(&mut ls, "car", "vehicle"));
        assert_eq!(ls[0].name, "vehicle");
        assert_eq!(ls[1].name, "tree");

        let anns = vec![ann("car"), ann("tree"), ann("car"), ann("car")];
        let renamed = rename_annotations(&anns, "car", "vehicle");
        let count = renamed.iter().filter(|a| a.label() == "vehicle").count();
        assert_eq!(count, 3);
        assert_eq!(renamed[1].label(), "tree");
    }

    #[test]
    fn test_rename_to_empty_is_rejected() {
        let mut ls = labels();
        assert!(!rename_label(&mut ls, "car", ""));
        assert!(!rename_label(&mut ls, "car", "   "));
        assert_eq!(ls, labels());
    }

    #[test]
    fn test_rename_to_existing_other_name_is_rejected() {
        let mut ls = labels();
        assert!(!rename_label(&mut ls, "car", "tree"));
        assert_eq!(ls, labels());
    }

    #[test]
    fn test_rename_to_own_name_is_allowed() {
        let mut ls = labels();
        assert!(rename_label(&mut ls, "car", "car"));
        assert_eq!(ls, labels());
    }

    #[test]
    fn test_rename_trims_whitespace() {
        let mut ls = labels();
        assert!(rename_label(&mut ls, "car", "  vehicle "));
        assert_eq!(ls[0].name, "vehicle");
    }
}
