// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decoding, working-copy downscaling, grayscale, tone
// adjustment, and encoding for captured document photos.

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use scanwerk_core::error::{Result, ScanwerkError};
use tracing::{debug, instrument};

/// Chainable operations on a single in-memory photo.
///
/// Each transformation consumes `self` and returns a new `ImageProcessor`, so
/// callers can write:
///
/// ```ignore
/// let png = ImageProcessor::open("page.jpg")?
///     .fit_within(1024)
///     .adjust_contrast(1.3)
///     .to_png_bytes()?;
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Decode an image file (format from content, then extension).
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let image = image::open(path.as_ref()).map_err(|err| {
            ScanwerkError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        debug!(width = image.width(), height = image.height(), "Photo loaded");
        Ok(Self { image })
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Shrink so the longest side is at most `max_dimension`, keeping the
    /// aspect ratio. Images already small enough pass through untouched.
    ///
    /// Uses triangle (linear) filtering.
    #[instrument(skip(self), fields(width = self.image.width(), height = self.image.height()))]
    pub fn fit_within(self, max_dimension: u32) -> Self {
        let longest = self.image.width().max(self.image.height());
        if longest <= max_dimension || max_dimension == 0 {
            return self;
        }
        let resized = self
            .image
            .resize(max_dimension, max_dimension, FilterType::Triangle);
        debug!(
            new_w = resized.width(),
            new_h = resized.height(),
            "Working copy downscaled"
        );
        Self { image: resized }
    }

    pub fn grayscale(self) -> Self {
        Self {
            image: self.image.grayscale(),
        }
    }

    /// Shift every colour channel by `value`, clamped to -255..=255.
    pub fn adjust_brightness(self, value: i32) -> Self {
        let delta = value.clamp(-255, 255);
        self.map_channels(|channel| (channel as i32 + delta).clamp(0, 255) as u8)
    }

    /// Scale every colour channel's distance from mid-grey by `factor`.
    /// 1.0 is a no-op; above 1.0 increases contrast.
    pub fn adjust_contrast(self, factor: f32) -> Self {
        self.map_channels(|channel| {
            (factor * (channel as f32 - 128.0) + 128.0).clamp(0.0, 255.0) as u8
        })
    }

    /// Apply `f` to R, G, and B of every pixel, leaving alpha untouched.
    fn map_channels(self, f: impl Fn(u8) -> u8) -> Self {
        let rgba = self.image.to_rgba8();
        let adjusted = RgbaImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
            Rgba([f(r), f(g), f(b), a])
        });
        Self {
            image: DynamicImage::ImageRgba8(adjusted),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode as PNG, the lossless format used for stored artifacts.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.image
            .write_to(&mut std::io::Cursor::new(&mut buffer), ImageFormat::Png)
            .map_err(|err| ScanwerkError::ImageError(format!("PNG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Write to a file; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        self.image.save(path.as_ref()).map_err(|err| {
            ScanwerkError::ImageError(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}
