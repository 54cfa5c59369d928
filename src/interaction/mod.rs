// Copyright (c) 2025, Pinpoly developers
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation interaction engine.
//!
//! Raw input events flow through the [`gesture::GestureMachine`], which
//! queries the [`hittest`] resolver and emits [`gesture::Intent`]s. This
//! module applies those intents: committed mutations go through the
//! history (one atomic entry each), in-progress polygon vertices go into
//! the transient draw buffer that lives outside undo/redo.

pub mod gesture;
pub mod hittest;

use crate::models::annotation::{Annotation, Point};
use crate::models::history::History;
use crate::models::label::Label;
use gesture::Intent;

/// Apply one intent to the annotation state.
///
/// Every failure state is a no-op with the prior state preserved: a
/// completion request with too few vertices keeps the buffer, a move with
/// a stale index leaves the list untouched.
pub fn apply(
    intent: Intent,
    history: &mut History<Vec<Annotation>>,
    current_points: &mut Vec<Point>,
    active_label: &Label,
) {
    match intent {
        Intent::PlacePoint(point) => {
            let annotation = Annotation::Point {
                label: active_label.name.clone(),
                point,
                color: active_label.color.clone(),
                label_position: Some(Annotation::default_label_position(point)),
            };
            history.set_state_with(|anns| {
                let mut anns = anns.clone();
                anns.push(annotation);
                anns
            });
            log::info!("Placed point at ({:.1}, {:.1})", point.x, point.y);
        }
        Intent::AppendVertex(point) => {
            current_points.push(point);
        }
        Intent::CompletePolygon => {
            if current_points.len() < 3 {
                return;
            }
            let points = std::mem::take(current_points);
            let anchor = points[0];
            let annotation = Annotation::Polygon {
                label: active_label.name.clone(),
                points,
                color: active_label.color.clone(),
                label_position: Some(Annotation::default_label_position(anchor)),
            };
            history.set_state_with(|anns| {
                let mut anns = anns.clone();
                anns.push(annotation);
                anns
            });
            log::info!("Completed polygon, total: {}", history.present().len());
        }
        Intent::MoveShape { index, dx, dy } => {
            history.set_state_with(|anns| {
                let mut anns = anns.clone();
                if let Some(ann) = anns.get_mut(index) {
                    *ann = ann.translated(dx, dy);
                }
                anns
            });
        }
        Intent::MoveLabel { index, dx, dy } => {
            history.set_state_with(|anns| {
                let mut anns = anns.clone();
                if let Some(ann) = anns.get_mut(index) {
                    *ann = ann.with_label_translated(dx, dy);
                }
                anns
            });
        }
    }
}
