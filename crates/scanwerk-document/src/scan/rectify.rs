// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification — warps the region inside four corners to a flat,
// top-down rectangle at the document's own aspect ratio.

use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use scanwerk_core::config::{RectifyConfig, Resampling};
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::Quadrilateral;
use tracing::{debug, instrument};

/// A flattened document page.
#[derive(Debug, Clone)]
pub struct RectifiedImage {
    pub image: DynamicImage,
    pub width: u32,
    pub height: u32,
}

impl RectifiedImage {
    fn from_rgba(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            image: DynamicImage::ImageRgba8(image),
            width,
            height,
        }
    }
}

/// Maps a quadrilateral region of a photo onto an upright rectangle.
///
/// The output is `max(top, bottom)` wide and `max(left, right)` tall, so the
/// page is never shrunk along its better-resolved edge. Every output pixel is
/// inverse-mapped into the source and resampled; pixels that land outside the
/// source take `border_fill`.
#[derive(Debug, Clone, Default)]
pub struct PerspectiveRectifier {
    config: RectifyConfig,
}

impl PerspectiveRectifier {
    pub fn new(config: RectifyConfig) -> Self {
        Self { config }
    }

    /// Output dimensions for `quad`, validated against `max_output_dimension`.
    pub fn output_size(&self, quad: &Quadrilateral) -> Result<(u32, u32)> {
        let width = quad.top_width().max(quad.bottom_width()).round().max(1.0);
        let height = quad.left_height().max(quad.right_height()).round().max(1.0);
        let limit = self.config.max_output_dimension as f32;
        if width > limit || height > limit {
            return Err(ScanwerkError::InvalidShape(format!(
                "rectified page would be {width}x{height} pixels, above the {limit} pixel limit"
            )));
        }
        Ok((width as u32, height as u32))
    }

    /// Flatten the region of `image` bounded by `quad`.
    ///
    /// A quad that matches the image bounds exactly returns the image
    /// unchanged (converted to RGBA8).
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn rectify(&self, image: DynamicImage, quad: &Quadrilateral) -> Result<RectifiedImage> {
        if quad.is_full_frame(image.width(), image.height()) {
            debug!("Full-frame corners; skipping warp");
            return Ok(RectifiedImage::from_rgba(image.into_rgba8()));
        }

        let (out_w, out_h) = self.output_size(quad)?;
        let source = quad.corners().map(|p| (p.x, p.y));
        let target = [
            (0.0, 0.0),
            (out_w as f32, 0.0),
            (out_w as f32, out_h as f32),
            (0.0, out_h as f32),
        ];

        let projection = Projection::from_control_points(source, target).ok_or_else(|| {
            ScanwerkError::InvalidShape("corners do not define a perspective mapping".into())
        })?;

        let interpolation = match self.config.interpolation {
            Resampling::Nearest => Interpolation::Nearest,
            Resampling::Bilinear => Interpolation::Bilinear,
        };

        let rgba = image.into_rgba8();
        let mut output = RgbaImage::new(out_w, out_h);
        warp_into(
            &rgba,
            &projection,
            interpolation,
            Rgba(self.config.border_fill),
            &mut output,
        );

        debug!(out_w, out_h, "Perspective warp applied");
        Ok(RectifiedImage::from_rgba(output))
    }
}
