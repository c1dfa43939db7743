// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Planar geometry for document boundaries — points, the ordered document
// quadrilateral, and the integer point format exchanged with UI clients.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanwerkError};

/// Two corners closer than this (in pixels) are considered the same point.
const COINCIDENT_EPSILON: f32 = 1e-3;

/// Minimum `|sin|` of the angle at a vertex before three corners count as
/// collinear.
const COLLINEAR_SINE: f32 = 1e-6;

/// Corner names in storage order, used in validation messages.
const CORNER_NAMES: [&str; 4] = ["top-left", "top-right", "bottom-right", "bottom-left"];

const TRIPLES: [[usize; 3]; 4] = [[1, 2, 3], [0, 2, 3], [0, 1, 3], [0, 1, 2]];

/// A pixel position in some image's coordinate frame (x right, y down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Integer point as rendered by a UI for a draggable corner handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientPoint {
    pub x: i32,
    pub y: i32,
}

impl ClientPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The four corners of a document boundary, ordered top-left, top-right,
/// bottom-right, bottom-left.
///
/// Every constructor that accepts outside input validates that the corners
/// are finite, pairwise distinct, contain no collinear triple, enclose a
/// non-zero area, and form a simple (non-self-intersecting) polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[Point; 4]", into = "[Point; 4]")]
pub struct Quadrilateral {
    corners: [Point; 4],
}

impl Quadrilateral {
    // -- Construction ---------------------------------------------------------

    /// Build a quadrilateral from corners already in TL/TR/BR/BL order.
    pub fn new(top_left: Point, top_right: Point, bottom_right: Point, bottom_left: Point) -> Result<Self> {
        Self::from_corners([top_left, top_right, bottom_right, bottom_left])
    }

    /// Build a quadrilateral from an array already in TL/TR/BR/BL order.
    pub fn from_corners(corners: [Point; 4]) -> Result<Self> {
        validate_corners(&corners)?;
        Ok(Self { corners })
    }

    /// Order four arbitrary corners with [`order_corners`] and validate them.
    pub fn from_unordered(points: [Point; 4]) -> Result<Self> {
        Self::from_corners(order_corners(points))
    }

    /// The placeholder boundary covering a whole `width` x `height` frame.
    ///
    /// Rectifying an image with its own full frame is the identity. Zero
    /// dimensions are treated as 1 so the result is always a valid shape.
    pub fn full_frame(width: u32, height: u32) -> Self {
        let w = width.max(1) as f32;
        let h = height.max(1) as f32;
        Self {
            corners: [
                Point::new(0.0, 0.0),
                Point::new(w, 0.0),
                Point::new(w, h),
                Point::new(0.0, h),
            ],
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn corners(&self) -> [Point; 4] {
        self.corners
    }

    pub fn top_left(&self) -> Point {
        self.corners[0]
    }

    pub fn top_right(&self) -> Point {
        self.corners[1]
    }

    pub fn bottom_right(&self) -> Point {
        self.corners[2]
    }

    pub fn bottom_left(&self) -> Point {
        self.corners[3]
    }

    /// Length of the top edge (TL to TR).
    pub fn top_width(&self) -> f32 {
        self.top_left().distance(&self.top_right())
    }

    /// Length of the bottom edge (BL to BR).
    pub fn bottom_width(&self) -> f32 {
        self.bottom_left().distance(&self.bottom_right())
    }

    /// Length of the left edge (TL to BL).
    pub fn left_height(&self) -> f32 {
        self.top_left().distance(&self.bottom_left())
    }

    /// Length of the right edge (TR to BR).
    pub fn right_height(&self) -> f32 {
        self.top_right().distance(&self.bottom_right())
    }

    /// Enclosed area (shoelace formula).
    pub fn area(&self) -> f32 {
        shoelace_area(&self.corners)
    }

    /// Whether the corners coincide exactly with the `width` x `height` frame.
    pub fn is_full_frame(&self, width: u32, height: u32) -> bool {
        width > 0 && height > 0 && *self == Self::full_frame(width, height)
    }

    /// Scale every corner by independent positive factors along x and y.
    ///
    /// Used to map corners found on a downscaled working copy back into the
    /// original image's coordinate frame. Positive scaling preserves every
    /// invariant, so no re-validation happens.
    pub fn scaled(&self, scale_x: f32, scale_y: f32) -> Self {
        debug_assert!(scale_x > 0.0 && scale_y > 0.0);
        Self {
            corners: self
                .corners
                .map(|p| Point::new(p.x * scale_x, p.y * scale_y)),
        }
    }
}

impl TryFrom<[Point; 4]> for Quadrilateral {
    type Error = ScanwerkError;

    fn try_from(corners: [Point; 4]) -> Result<Self> {
        Self::from_corners(corners)
    }
}

impl From<Quadrilateral> for [Point; 4] {
    fn from(quad: Quadrilateral) -> Self {
        quad.corners
    }
}

// -- Corner ordering ----------------------------------------------------------

/// Order four points as top-left, top-right, bottom-right, bottom-left.
///
/// TL has the smallest `x + y`, BR the largest; TR has the smallest `y - x`,
/// BL the largest. Equal keys go to the point with the smaller y, then the
/// smaller x, so the result does not depend on input order. If the rule picks
/// the same point for two roles (a square rotated by 45 degrees), the points
/// are instead ordered clockwise around their centroid, starting at the TL
/// pick.
pub fn order_corners(points: [Point; 4]) -> [Point; 4] {
    let tl = extreme_index(&points, |p| p.x + p.y, false);
    let br = extreme_index(&points, |p| p.x + p.y, true);
    let tr = extreme_index(&points, |p| p.y - p.x, false);
    let bl = extreme_index(&points, |p| p.y - p.x, true);

    let picks = [tl, tr, br, bl];
    let distinct = (0..4).all(|i| (i + 1..4).all(|j| picks[i] != picks[j]));
    if distinct {
        return picks.map(|i| points[i]);
    }

    clockwise_from(&points, tl)
}

fn extreme_index(points: &[Point; 4], key: impl Fn(&Point) -> f32, largest: bool) -> usize {
    let mut best = 0;
    for i in 1..points.len() {
        let (candidate, current) = (key(&points[i]), key(&points[best]));
        let ordering = if largest {
            candidate.partial_cmp(&current)
        } else {
            current.partial_cmp(&candidate)
        }
        .unwrap_or(Ordering::Equal);

        let better = match ordering {
            Ordering::Greater => true,
            Ordering::Equal => tie_break(&points[i], &points[best]) == Ordering::Less,
            Ordering::Less => false,
        };
        if better {
            best = i;
        }
    }
    best
}

fn tie_break(a: &Point, b: &Point) -> Ordering {
    a.y.partial_cmp(&b.y)
        .unwrap_or(Ordering::Equal)
        .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
}

/// Sort by angle around the centroid. With y pointing down, increasing
/// `atan2` runs clockwise on screen.
fn clockwise_from(points: &[Point; 4], start: usize) -> [Point; 4] {
    let cx = points.iter().map(|p| p.x).sum::<f32>() / 4.0;
    let cy = points.iter().map(|p| p.y).sum::<f32>() / 4.0;
    let angle = |p: &Point| (p.y - cy).atan2(p.x - cx);

    let mut order = [0usize, 1, 2, 3];
    order.sort_by(|&a, &b| {
        angle(&points[a])
            .partial_cmp(&angle(&points[b]))
            .unwrap_or(Ordering::Equal)
            .then(tie_break(&points[a], &points[b]))
    });

    let offset = order.iter().position(|&i| i == start).unwrap_or(0);
    order.rotate_left(offset);
    order.map(|i| points[i])
}

// -- Validation ---------------------------------------------------------------

fn validate_corners(corners: &[Point; 4]) -> Result<()> {
    if let Some(i) = corners.iter().position(|p| !p.is_finite()) {
        return Err(ScanwerkError::InvalidShape(format!(
            "{} corner has a non-finite coordinate",
            CORNER_NAMES[i]
        )));
    }

    for i in 0..4 {
        for j in i + 1..4 {
            if corners[i].distance(&corners[j]) < COINCIDENT_EPSILON {
                return Err(ScanwerkError::InvalidShape(format!(
                    "{} and {} corners coincide",
                    CORNER_NAMES[i], CORNER_NAMES[j]
                )));
            }
        }
    }

    // Each triple leaves out one corner.
    for (skip, [a, b, c]) in TRIPLES.iter().enumerate() {
        let (a, b, c) = (corners[*a], corners[*b], corners[*c]);
        if cross(&a, &b, &c).abs() <= COLLINEAR_SINE * a.distance(&b) * a.distance(&c) {
            return Err(ScanwerkError::InvalidShape(format!(
                "three corners are collinear (all but the {})",
                CORNER_NAMES[skip]
            )));
        }
    }

    let [p0, p1, p2, p3] = *corners;
    if segments_cross(&p0, &p1, &p2, &p3) || segments_cross(&p1, &p2, &p3, &p0) {
        return Err(ScanwerkError::InvalidShape(
            "edges cross each other; corners must follow the document outline".into(),
        ));
    }

    if shoelace_area(corners) < COINCIDENT_EPSILON {
        return Err(ScanwerkError::InvalidShape("enclosed area is zero".into()));
    }

    Ok(())
}

/// Z component of `(b - a) x (c - a)`.
fn cross(a: &Point, b: &Point, c: &Point) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Proper intersection of segments `ab` and `cd`. Collinear configurations
/// are rejected earlier, so touching cases never reach here.
fn segments_cross(a: &Point, b: &Point, c: &Point, d: &Point) -> bool {
    let d1 = cross(a, b, c);
    let d2 = cross(a, b, d);
    let d3 = cross(c, d, a);
    let d4 = cross(c, d, b);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

/// Area of a polygon given by its vertices in order (CW or CCW).
pub fn shoelace_area(vertices: &[Point]) -> f32 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0f64;
    for i in 0..n {
        let j = (i + 1) % n;
        twice_area += vertices[i].x as f64 * vertices[j].y as f64;
        twice_area -= vertices[j].x as f64 * vertices[i].y as f64;
    }
    (twice_area.abs() / 2.0) as f32
}

// -- Tests --------------------------------------------------------------------
