// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document boundary detection — finds the four corners of a page in a photo
// using edge detection, contour tracing, and polygon approximation.

use std::cmp::Ordering;

use image::{DynamicImage, GrayImage};
use imageproc::contours::find_contours;
use imageproc::contrast::otsu_level;
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::morphology::dilate;
use imageproc::point::Point as PixelPoint;
use scanwerk_core::config::DetectionConfig;
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::geometry::shoelace_area;
use scanwerk_core::{Point, Quadrilateral};
use tracing::{debug, instrument, trace};

use crate::image::processor::ImageProcessor;

/// Half-width, in working pixels, of the window a traced corner may move in
/// when snapped to the page.
const CORNER_SNAP_RADIUS: i32 = 4;

/// Locates the most plausible document quadrilateral in a photo.
///
/// ## Pipeline
///
/// 1. Convert to grayscale, downscaling to `max_working_dimension` if needed
/// 2. Gaussian blur for noise reduction
/// 3. Canny edge detection, then a one-pixel dilation to close small gaps
/// 4. Trace contours and keep the `max_candidates` largest by enclosed area
/// 5. Approximate each with Douglas-Peucker and accept the first polygon that
///    has exactly four vertices, covers at least `min_area_fraction` of the
///    frame, and forms a valid [`Quadrilateral`]
/// 6. Snap each corner to the outermost page pixel within
///    [`CORNER_SNAP_RADIUS`], which undoes the drift the blur and dilation
///    add to the traced outline
///
/// Corners are reported in the original image's pixel coordinates. Detection
/// is deterministic: the same image and configuration always give the same
/// corners.
#[derive(Debug, Clone, Default)]
pub struct GeometryDetector {
    config: DetectionConfig,
}

impl GeometryDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Find the document boundary in `image`.
    ///
    /// Returns [`ScanwerkError::DocumentNotFound`] carrying the full-frame
    /// fallback when no candidate qualifies, and
    /// [`ScanwerkError::ImageError`] for an image with no pixels.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn detect(&self, image: &DynamicImage) -> Result<Quadrilateral> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(ScanwerkError::ImageError(format!(
                "cannot detect a document in an empty {width}x{height} image"
            )));
        }

        let gray = ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(image.to_luma8()))
            .fit_within(self.config.max_working_dimension)
            .into_dynamic()
            .into_luma8();
        let scale_x = width as f32 / gray.width() as f32;
        let scale_y = height as f32 / gray.height() as f32;

        let edges = self.edge_map(&gray);
        let candidates = self.largest_contours(&edges);
        debug!(
            candidates = candidates.len(),
            working_w = gray.width(),
            working_h = gray.height(),
            "Contour candidates collected"
        );

        let min_area = self.config.min_area_fraction * gray.width() as f32 * gray.height() as f32;

        for (rank, contour) in candidates.iter().enumerate() {
            let perimeter = arc_length(contour, true);
            let epsilon = self.config.approx_epsilon_fraction * perimeter;
            if epsilon <= 0.0 {
                continue;
            }

            let polygon = approximate_closed(contour, epsilon);
            if polygon.len() != 4 {
                trace!(rank, vertices = polygon.len(), "Candidate is not a quadrilateral");
                continue;
            }

            let corners = [0, 1, 2, 3].map(|i| Point::new(polygon[i].x as f32, polygon[i].y as f32));
            let area = shoelace_area(&corners);
            if area < min_area {
                trace!(rank, area, min_area, "Candidate quadrilateral too small");
                continue;
            }

            match Quadrilateral::from_unordered(corners) {
                Ok(quad) => {
                    let quad = snap_to_page(&gray, &quad).scaled(scale_x, scale_y);
                    debug!(rank, area, corners = ?quad.corners(), "Document boundary found");
                    return Ok(quad);
                }
                Err(err) => trace!(rank, %err, "Candidate rejected"),
            }
        }

        debug!("No document boundary found; offering full frame");
        Err(ScanwerkError::DocumentNotFound {
            fallback: Quadrilateral::full_frame(width, height),
        })
    }

    /// Blur, Canny, and a 1-pixel L-infinity dilation.
    fn edge_map(&self, gray: &GrayImage) -> GrayImage {
        let blurred = gaussian_blur_f32(gray, self.config.blur_sigma);
        let edges = canny(&blurred, self.config.canny_low, self.config.canny_high);
        dilate(&edges, Norm::LInf, 1)
    }

    /// Traced contours sorted by enclosed area, largest first.
    ///
    /// The sort is stable, so equal areas keep tracing order.
    fn largest_contours(&self, edges: &GrayImage) -> Vec<Vec<PixelPoint<i32>>> {
        let mut scored: Vec<(f32, Vec<PixelPoint<i32>>)> = find_contours::<i32>(edges)
            .into_iter()
            .filter(|contour| contour.points.len() >= 4)
            .map(|contour| {
                let outline: Vec<Point> = contour
                    .points
                    .iter()
                    .map(|p| Point::new(p.x as f32, p.y as f32))
                    .collect();
                (shoelace_area(&outline), contour.points)
            })
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.truncate(self.config.max_candidates);
        scored.into_iter().map(|(_, points)| points).collect()
    }
}

// -- Corner snapping -----------------------------------------------------------

/// Move each corner of `quad` onto the page region of `gray`.
///
/// The page is whichever Otsu class dominates a handful of samples inside
/// the quad, so both light-on-dark and dark-on-light pages work. Within the
/// window around a traced corner, the page pixel farthest along the
/// centroid-to-corner direction wins. If the snapped corners no longer form
/// a valid quadrilateral, `quad` is returned unchanged.
fn snap_to_page(gray: &GrayImage, quad: &Quadrilateral) -> Quadrilateral {
    let level = otsu_level(gray);
    let corners = quad.corners();
    let centroid = Point::new(
        corners.iter().map(|p| p.x).sum::<f32>() / 4.0,
        corners.iter().map(|p| p.y).sum::<f32>() / 4.0,
    );

    let is_bright = |p: Point| -> Option<bool> {
        let (x, y) = (p.x.round() as i64, p.y.round() as i64);
        if x < 0 || y < 0 || x >= i64::from(gray.width()) || y >= i64::from(gray.height()) {
            return None;
        }
        Some(gray.get_pixel(x as u32, y as u32).0[0] > level)
    };
    let samples: Vec<bool> = std::iter::once(centroid)
        .chain(corners.iter().flat_map(|c| {
            [0.25f32, 0.5].map(|t| {
                Point::new(
                    centroid.x + t * (c.x - centroid.x),
                    centroid.y + t * (c.y - centroid.y),
                )
            })
        }))
        .filter_map(is_bright)
        .collect();
    let page_is_bright = samples.iter().filter(|&&b| b).count() * 2 > samples.len();

    let snapped = corners.map(|corner| {
        snap_corner(gray, level, page_is_bright, corner, centroid).unwrap_or(corner)
    });
    match Quadrilateral::from_corners(snapped) {
        Ok(refined) => {
            trace!(before = ?corners, after = ?snapped, "Corners snapped to page");
            refined
        }
        Err(err) => {
            trace!(%err, "Snapped corners rejected; keeping traced corners");
            *quad
        }
    }
}

fn snap_corner(
    gray: &GrayImage,
    level: u8,
    page_is_bright: bool,
    corner: Point,
    centroid: Point,
) -> Option<Point> {
    let (dx, dy) = (corner.x - centroid.x, corner.y - centroid.y);
    let (cx, cy) = (corner.x.round() as i32, corner.y.round() as i32);
    let (w, h) = (gray.width() as i32, gray.height() as i32);

    let mut best: Option<(f32, Point)> = None;
    for y in (cy - CORNER_SNAP_RADIUS).max(0)..=(cy + CORNER_SNAP_RADIUS).min(h - 1) {
        for x in (cx - CORNER_SNAP_RADIUS).max(0)..=(cx + CORNER_SNAP_RADIUS).min(w - 1) {
            let bright = gray.get_pixel(x as u32, y as u32).0[0] > level;
            if bright != page_is_bright {
                continue;
            }
            let score = dx * x as f32 + dy * y as f32;
            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, Point::new(x as f32, y as f32)));
            }
        }
    }
    best.map(|(_, point)| point)
}

/// Douglas-Peucker over a closed outline.
///
/// The outline is split into two open chains between the point with the
/// smallest `x + y` and the point farthest from it; each chain is simplified
/// and the results are joined without repeating the shared endpoints.
fn approximate_closed(contour: &[PixelPoint<i32>], epsilon: f64) -> Vec<PixelPoint<i32>> {
    let Some(anchor) = contour
        .iter()
        .enumerate()
        .min_by_key(|(_, p)| (p.x + p.y, p.y, p.x))
        .map(|(i, _)| i)
    else {
        return Vec::new();
    };

    let mut ring = contour.to_vec();
    ring.rotate_left(anchor);
    let start = ring[0];

    let far = ring
        .iter()
        .enumerate()
        .max_by_key(|(_, p)| {
            let dx = i64::from(p.x - start.x);
            let dy = i64::from(p.y - start.y);
            dx * dx + dy * dy
        })
        .map(|(i, _)| i)
        .unwrap_or(0);
    if far == 0 {
        return vec![start];
    }

    let mut forward = approximate_polygon_dp(&ring[..=far], epsilon, false);
    let mut closing = ring[far..].to_vec();
    closing.push(start);
    let mut backward = approximate_polygon_dp(&closing, epsilon, false);

    forward.pop();
    backward.pop();
    forward.append(&mut backward);
    forward
}
