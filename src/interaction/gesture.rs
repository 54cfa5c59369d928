// Copyright (c) 2025, Pinpoly developers
// SPDX-License-Identifier: BSD-3-Clause

//! Gesture state machine.
//!
//! Consumes toolkit-independent input events (press, move, release,
//! double-click, leave) in image-space coordinates and turns them into
//! annotation intents. One machine instance tracks the active drag
//! session, the did-drag flag that disambiguates clicks from drags, and
//! the hover position used for the live polygon segment.
//!
//! A drag emits one move intent per move event; each becomes its own
//! history entry downstream. Undoing a long drag therefore takes several
//! steps. Delta-zero moves are absorbed by the history's no-op detection.

use crate::app::Tool;
use crate::interaction::hittest::{self, HitTarget, TextMeasure};
use crate::models::annotation::{Annotation, Point};

/// A unified pointer/touch event, already mapped to image space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button press or touch-down.
    Down(Point),
    /// Pointer motion (with or without the button held).
    Move(Point),
    /// Primary button release or touch-up.
    Up(Point),
    /// Double click / double tap.
    DoubleClick,
    /// Pointer left the drawable area.
    Leave,
}

/// A requested mutation of the annotation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Commit a new point annotation at this position.
    PlacePoint(Point),
    /// Append a vertex to the in-progress polygon buffer.
    AppendVertex(Point),
    /// Commit the in-progress polygon (requires at least 3 vertices).
    CompletePolygon,
    /// Translate an annotation's shape (and its label) by a delta.
    MoveShape { index: usize, dx: f64, dy: f64 },
    /// Translate only an annotation's label box by a delta.
    MoveLabel { index: usize, dx: f64, dy: f64 },
}

#[derive(Debug, Clone, Copy)]
struct DragSession {
    index: usize,
    target: HitTarget,
    last: Point,
}

/// Drag/click/hover state for the annotation canvas.
#[derive(Debug, Default)]
pub struct GestureMachine {
    drag: Option<DragSession>,
    did_drag: bool,
    hover: Option<Point>,
}

impl GestureMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last known pointer position over the canvas, if any.
    pub fn hover(&self) -> Option<Point> {
        self.hover
    }

    /// Whether a drag session is active.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Cancel any in-flight drag and clear hover state.
    ///
    /// Moves already committed during the drag stay committed; there is no
    /// rollback.
    pub fn cancel(&mut self) {
        self.drag = None;
        self.hover = None;
    }

    /// Feed one event through the machine, producing at most one intent.
    pub fn handle(
        &mut self,
        event: InputEvent,
        tool: Tool,
        annotations: &[Annotation],
        scale: f32,
        measure: &dyn TextMeasure,
    ) -> Option<Intent> {
        match event {
            InputEvent::Down(p) => {
                self.did_drag = false;
                if let Some(hit) = hittest::resolve(p, annotations, scale, measure) {
                    self.drag = Some(DragSession {
                        index: hit.index,
                        target: hit.target,
                        last: p,
                    });
                }
                None
            }
            InputEvent::Move(p) => {
                self.hover = Some(p);
                let session = self.drag.as_mut()?;
                self.did_drag = true;
                let dx = p.x - session.last.x;
                let dy = p.y - session.last.y;
                session.last = p;
                let index = session.index;
                Some(match session.target {
                    HitTarget::Label => Intent::MoveLabel { index, dx, dy },
                    HitTarget::Shape => Intent::MoveShape { index, dx, dy },
                })
            }
            InputEvent::Up(p) => {
                let intent = if !self.did_drag && self.drag.is_none() {
                    Some(match tool {
                        Tool::Point => Intent::PlacePoint(p),
                        Tool::Polygon => Intent::AppendVertex(p),
                    })
                } else {
                    None
                };
                self.drag = None;
                intent
            }
            InputEvent::DoubleClick => {
                if self.drag.is_none() {
                    Some(Intent::CompletePolygon)
                } else {
                    None
                }
            }
            InputEvent::Leave => {
                self.cancel();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::hittest::FixedMeasure;

    const MEASURE: FixedMeasure = FixedMeasure(7.0);

    fn point_ann(x: f64, y: f64) -> Annotation {
        Annotation::Point {
            label: "dog".to_string(),
            point: Point::new(x, y),
            color: "rgba(239, 68, 68, 0.5)".to_string(),
            label_position: Some(Point::new(x + 20.0, y - 20.0)),
        }
    }

    fn handle(
        machine: &mut GestureMachine,
        event: InputEvent,
        tool: Tool,
        anns: &[Annotation],
    ) -> Option<Intent> {
        machine.handle(event, tool, anns, 1.0, &MEASURE)
    }

    #[test]
    fn test_click_on_empty_canvas_places_point() {
        let mut m = GestureMachine::new();
        let p = Point::new(100.0, 100.0);
        assert_eq!(handle(&mut m, InputEvent::Down(p), Tool::Point, &[]), None);
        assert_eq!(
            handle(&mut m, InputEvent::Up(p), Tool::Point, &[]),
            Some(Intent::PlacePoint(p))
        );
    }

    #[test]
    fn test_click_in_polygon_mode_appends_vertex() {
        let mut m = GestureMachine::new();
        let p = Point::new(10.0, 20.0);
        handle(&mut m, InputEvent::Down(p), Tool::Polygon, &[]);
        assert_eq!(
            handle(&mut m, InputEvent::Up(p), Tool::Polygon, &[]),
            Some(Intent::AppendVertex(p))
        );
    }

    #[test]
    fn test_drag_shape_emits_move_per_event() {
        let anns = vec![point_ann(100.0, 100.0)];
        let mut m = GestureMachine::new();
        handle(&mut m, InputEvent::Down(Point::new(100.0, 100.0)), Tool::Point, &anns);
        assert!(m.is_dragging());

        let i1 = handle(&mut m, InputEvent::Move(Point::new(104.0, 102.0)), Tool::Point, &anns);
        assert_eq!(i1, Some(Intent::MoveShape { index: 0, dx: 4.0, dy: 2.0 }));
        // Deltas chain from the last observed position.
        let i2 = handle(&mut m, InputEvent::Move(Point::new(110.0, 105.0)), Tool::Point, &anns);
        assert_eq!(i2, Some(Intent::MoveShape { index: 0, dx: 6.0, dy: 3.0 }));

        // Release after a drag is not a click.
        assert_eq!(
            handle(&mut m, InputEvent::Up(Point::new(110.0, 105.0)), Tool::Point, &anns),
            None
        );
        assert!(!m.is_dragging());
    }

    #[test]
    fn test_drag_label_targets_label_only() {
        let anns = vec![point_ann(100.0, 100.0)];
        let mut m = GestureMachine::new();
        // Inside the label box (x 120.., y 60..80).
        handle(&mut m, InputEvent::Down(Point::new(125.0, 70.0)), Tool::Point, &anns);
        let intent = handle(&mut m, InputEvent::Move(Point::new(130.0, 72.0)), Tool::Point, &anns);
        assert_eq!(intent, Some(Intent::MoveLabel { index: 0, dx: 5.0, dy: 2.0 }));
    }

    #[test]
    fn test_click_on_shape_without_motion_is_not_a_placement() {
        let anns = vec![point_ann(100.0, 100.0)];
        let mut m = GestureMachine::new();
        handle(&mut m, InputEvent::Down(Point::new(100.0, 100.0)), Tool::Point, &anns);
        assert_eq!(
            handle(&mut m, InputEvent::Up(Point::new(100.0, 100.0)), Tool::Point, &anns),
            None
        );
    }

    #[test]
    fn test_double_click_requests_completion_unless_dragging() {
        let mut m = GestureMachine::new();
        assert_eq!(
            handle(&mut m, InputEvent::DoubleClick, Tool::Polygon, &[]),
            Some(Intent::CompletePolygon)
        );

        let anns = vec![point_ann(100.0, 100.0)];
        handle(&mut m, InputEvent::Down(Point::new(100.0, 100.0)), Tool::Polygon, &anns);
        assert_eq!(handle(&mut m, InputEvent::DoubleClick, Tool::Polygon, &anns), None);
    }

    #[test]
    fn test_leave_cancels_drag_and_hover() {
        let anns = vec![point_ann(100.0, 100.0)];
        let mut m = GestureMachine::new();
        handle(&mut m, InputEvent::Down(Point::new(100.0, 100.0)), Tool::Point, &anns);
        handle(&mut m, InputEvent::Move(Point::new(105.0, 100.0)), Tool::Point, &anns);
        handle(&mut m, InputEvent::Leave, Tool::Point, &anns);
        assert!(!m.is_dragging());
        assert_eq!(m.hover(), None);

        // A release arriving after the leave is not a click either: the
        // did-drag flag survives until the next press.
        assert_eq!(
            handle(&mut m, InputEvent::Up(Point::new(105.0, 100.0)), Tool::Point, &anns),
            None
        );
    }

    #[test]
    fn test_hover_tracks_moves_without_drag() {
        let mut m = GestureMachine::new();
        handle(&mut m, InputEvent::Move(Point::new(5.0, 6.0)), Tool::Polygon, &[]);
        assert_eq!(m.hover(), Some(Point::new(5.0, 6.0)));
        assert!(!m.is_dragging());
    }
}
