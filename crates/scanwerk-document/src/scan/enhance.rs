// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Post-rectification enhancement — magic colour, grayscale, adaptive and Otsu
// binarization of flattened pages.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::otsu_level;
use scanwerk_core::config::{EnhanceConfig, EnhanceMode};
use tracing::{debug, instrument};

use crate::image::processor::ImageProcessor;

/// Contrast factor and brightness lift used by [`EnhanceMode::MagicColor`].
const MAGIC_CONTRAST: f32 = 1.35;
const MAGIC_BRIGHTNESS: i32 = 12;

/// Cleans up a rectified page for reading or OCR.
pub struct ScanEnhancer {
    image: DynamicImage,
}

impl ScanEnhancer {
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    /// Run whichever enhancement `config.mode` selects.
    #[instrument(skip_all, fields(mode = ?config.mode))]
    pub fn apply(self, config: &EnhanceConfig) -> Self {
        match config.mode {
            EnhanceMode::None => self,
            EnhanceMode::MagicColor => self.magic_color(),
            EnhanceMode::Grayscale => self.grayscale(),
            EnhanceMode::BlackWhite => {
                let offset = config.threshold_offset.round() as i32;
                self.binarize(config.block_size / 2, offset)
            }
            EnhanceMode::Otsu => self.binarize_otsu(),
        }
    }

    /// Brighter, punchier colour: a contrast stretch plus a small lift.
    pub fn magic_color(self) -> Self {
        let image = ImageProcessor::from_dynamic(self.image)
            .adjust_contrast(MAGIC_CONTRAST)
            .adjust_brightness(MAGIC_BRIGHTNESS)
            .into_dynamic();
        Self { image }
    }

    pub fn grayscale(self) -> Self {
        Self {
            image: ImageProcessor::from_dynamic(self.image).grayscale().into_dynamic(),
        }
    }

    /// Local-mean adaptive threshold.
    ///
    /// A pixel turns black when it is darker than the mean of its
    /// `(2 * block_radius + 1)`-square neighbourhood minus `offset`.
    pub fn binarize(self, block_radius: u32, offset: i32) -> Self {
        let gray = self.image.to_luma8();
        let integral = IntegralImage::new(&gray);

        let output = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
            let threshold = integral.mean(x, y, block_radius) - offset as f64;
            ink_or_paper(f64::from(gray.get_pixel(x, y).0[0]) < threshold)
        });

        debug!(block_radius, offset, "Adaptive binarization complete");
        Self {
            image: DynamicImage::ImageLuma8(output),
        }
    }

    /// Global threshold chosen by Otsu's method.
    pub fn binarize_otsu(self) -> Self {
        let gray = self.image.to_luma8();
        let level = otsu_level(&gray);
        debug!(level, "Otsu level computed");

        let output = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
            ink_or_paper(gray.get_pixel(x, y).0[0] <= level)
        });
        Self {
            image: DynamicImage::ImageLuma8(output),
        }
    }
}

fn ink_or_paper(is_ink: bool) -> Luma<u8> {
    if is_ink { Luma([0]) } else { Luma([255]) }
}

// -- Summed-area table ---------------------------------------------------------

/// Summed-area table over a grayscale image with a zero top row and left
/// column, so `sums[y * stride + x]` covers pixels `[0, x) x [0, y)`.
struct IntegralImage {
    sums: Vec<u64>,
    width: u32,
    height: u32,
}

impl IntegralImage {
    fn new(gray: &GrayImage) -> Self {
        let (width, height) = gray.dimensions();
        let stride = width as usize + 1;
        let mut sums = vec![0u64; stride * (height as usize + 1)];
        for y in 0..height as usize {
            let mut row = 0u64;
            for x in 0..width as usize {
                row += u64::from(gray.get_pixel(x as u32, y as u32).0[0]);
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row;
            }
        }
        Self { sums, width, height }
    }

    /// Mean over the square of `radius` around `(cx, cy)`, clipped to the image.
    fn mean(&self, cx: u32, cy: u32, radius: u32) -> f64 {
        let stride = self.width as usize + 1;
        let x0 = cx.saturating_sub(radius) as usize;
        let y0 = cy.saturating_sub(radius) as usize;
        let x1 = (cx.saturating_add(radius).saturating_add(1)).min(self.width) as usize;
        let y1 = (cy.saturating_add(radius).saturating_add(1)).min(self.height) as usize;

        let count = (x1 - x0) * (y1 - y0);
        if count == 0 {
            return 128.0;
        }
        let total = self.sums[y1 * stride + x1] + self.sums[y0 * stride + x0]
            - self.sums[y0 * stride + x1]
            - self.sums[y1 * stride + x0];
        total as f64 / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn two_tone() -> GrayImage {
        GrayImage::from_fn(40, 20, |x, _| if x < 20 { Luma([40]) } else { Luma([210]) })
    }

    #[test]
    fn otsu_splits_two_tone_image() {
        let level = otsu_level(&two_tone());
        assert!((40..210).contains(&level), "level {level}");

        let out = ScanEnhancer::from_dynamic(DynamicImage::ImageLuma8(two_tone()))
            .binarize_otsu()
            .into_dynamic()
            .into_luma8();
        assert_eq!(out.get_pixel(5, 5).0, [0]);
        assert_eq!(out.get_pixel(35, 5).0, [255]);
    }

    /// Text on a shadowed half of the page still comes out black-on-white.
    #[test]
    fn adaptive_threshold_handles_uneven_light() {
        let mut gray = GrayImage::from_fn(60, 30, |x, _| if x < 30 { Luma([120]) } else { Luma([230]) });
        gray.put_pixel(10, 15, Luma([60]));
        gray.put_pixel(45, 15, Luma([150]));

        let out = ScanEnhancer::from_dynamic(DynamicImage::ImageLuma8(gray))
            .binarize(7, 10)
            .into_dynamic()
            .into_luma8();
        assert_eq!(out.get_pixel(10, 15).0, [0]);
        assert_eq!(out.get_pixel(45, 15).0, [0]);
        assert_eq!(out.get_pixel(5, 5).0, [255]);
        assert_eq!(out.get_pixel(50, 5).0, [255]);
    }

    #[test]
    fn integral_mean_matches_direct_average() {
        let gray = GrayImage::from_fn(5, 5, |x, y| Luma([(x * 10 + y) as u8]));
        let integral = IntegralImage::new(&gray);
        // 3x3 around the centre: x in 1..=3, y in 1..=3.
        let direct: f64 = (1..=3)
            .flat_map(|x| (1..=3).map(move |y| f64::from(x * 10 + y)))
            .sum::<f64>()
            / 9.0;
        assert!((integral.mean(2, 2, 1) - direct).abs() < 1e-9);
        // Clipped at the corner: 2x2 block.
        assert!((integral.mean(0, 0, 1) - (0.0 + 1.0 + 10.0 + 11.0) / 4.0).abs() < 1e-9);
    }

    #[test]
    fn none_mode_is_untouched_and_magic_keeps_colour() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([100, 150, 200, 255])));
        let config = EnhanceConfig::default();
        let same = ScanEnhancer::from_dynamic(img.clone()).apply(&config).into_dynamic();
        assert_eq!(same.to_rgba8().as_raw(), img.to_rgba8().as_raw());

        let magic = ScanEnhancer::from_dynamic(img)
            .apply(&EnhanceConfig {
                mode: EnhanceMode::MagicColor,
                ..EnhanceConfig::default()
            })
            .into_dynamic()
            .to_rgba8();
        let [r, g, b, _] = magic.get_pixel(0, 0).0;
        assert!(i32::from(b) - i32::from(r) > 100, "got {r} {g} {b}");
        assert!(g > 150 && g < b);
    }
}
