// Copyright (c) 2025, Pinpoly developers
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the hit-testing primitives: point-in-polygon,
//! point-to-point distance, and axis-aligned box containment. All
//! coordinates are in image space.

use crate::models::annotation::Point;

/// Axis-aligned rectangle in image space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Check whether a point lies inside the rectangle (edges inclusive).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Tolerance for on-edge classification.
const EDGE_EPSILON: f64 = 1e-9;

/// Check whether `p` lies on the segment from `a` to `b`.
fn point_on_segment(p: Point, a: Point, b: Point) -> bool {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    if cross.abs() > EDGE_EPSILON * (1.0 + distance(a, b)) {
        return false;
    }
    p.x >= a.x.min(b.x) - EDGE_EPSILON
        && p.x <= a.x.max(b.x) + EDGE_EPSILON
        && p.y >= a.y.min(b.y) - EDGE_EPSILON
        && p.y <= a.y.max(b.y) + EDGE_EPSILON
}

/// Point-in-polygon test using even-odd ray casting.
///
/// A point exactly on an edge (or vertex) counts as inside. Polygons with
/// fewer than 3 vertices contain nothing.
pub fn point_in_polygon(p: Point, vertices: &[Point]) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        if point_on_segment(p, vertices[j], vertices[i]) {
            return true;
        }
        j = i;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > p.y) != (vj.y > p.y)
            && p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn cross(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn signed_area(vertices: &[Point]) -> f64 {
    let mut sum = 0.0;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        sum += vertices[j].x * vertices[i].y - vertices[i].x * vertices[j].y;
        j = i;
    }
    sum / 2.0
}

fn point_in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let d1 = cross(a, b, p);
    let d2 = cross(b, c, p);
    let d3 = cross(c, a, p);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Triangulate a simple polygon by ear clipping.
///
/// Returns index triples into `vertices`. Handles concave polygons; the
/// triangles tile the interior without overlap, which a convex fan does
/// not. Fewer than 3 vertices yields no triangles.
pub fn triangulate(vertices: &[Point]) -> Vec<[usize; 3]> {
    let n = vertices.len();
    if n < 3 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..n).collect();
    if signed_area(vertices) < 0.0 {
        order.reverse();
    }

    let mut triangles = Vec::with_capacity(n - 2);
    while order.len() > 3 {
        let m = order.len();
        let mut clipped = false;
        for i in 0..m {
            let prev = order[(i + m - 1) % m];
            let curr = order[i];
            let next = order[(i + 1) % m];
            let (a, b, c) = (vertices[prev], vertices[curr], vertices[next]);
            // Reflex corners are not ears.
            if cross(a, b, c) <= 0.0 {
                continue;
            }
            let blocked = order.iter().any(|&j| {
                j != prev && j != curr && j != next && point_in_triangle(vertices[j], a, b, c)
            });
            if blocked {
                continue;
            }
            triangles.push([prev, curr, next]);
            order.remove(i);
            clipped = true;
            break;
        }
        if !clipped {
            // Degenerate input (collinear runs, self-intersection): fall
            // back to a fan over whatever remains.
            for i in 1..order.len() - 1 {
                triangles.push([order[0], order[i], order[i + 1]]);
            }
            return triangles;
        }
    }
    triangles.push([order[0], order[1], order[2]]);
    triangles
}
