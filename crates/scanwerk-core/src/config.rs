// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanwerkError};
use crate::types::{Locale, PaperSize};

/// Tunable settings for every pipeline stage.
///
/// Every section is `#[serde(default)]`, so a config file only needs to name
/// the values it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub detection: DetectionConfig,
    pub rectification: RectifyConfig,
    pub enhancement: EnhanceConfig,
    pub mrz: MrzConfig,
    pub report: ReportConfig,
}

/// Boundary detection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Standard deviation of the Gaussian blur applied before edge detection.
    pub blur_sigma: f32,
    /// Canny hysteresis thresholds.
    pub canny_low: f32,
    pub canny_high: f32,
    /// Douglas-Peucker tolerance as a fraction of the contour perimeter.
    pub approx_epsilon_fraction: f64,
    /// Smallest accepted quadrilateral, as a fraction of the frame area.
    pub min_area_fraction: f32,
    /// How many of the largest contours are considered.
    pub max_candidates: usize,
    /// Images whose longest side exceeds this are downscaled before detection.
    pub max_working_dimension: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 2.0,
            canny_low: 50.0,
            canny_high: 150.0,
            approx_epsilon_fraction: 0.02,
            min_area_fraction: 0.10,
            max_candidates: 10,
            max_working_dimension: 1024,
        }
    }
}

/// Resampling filter used when warping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resampling {
    Nearest,
    #[default]
    Bilinear,
}

/// Perspective rectification parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectifyConfig {
    pub interpolation: Resampling,
    /// RGBA colour written where the inverse mapping falls outside the source.
    pub border_fill: [u8; 4],
    /// Upper bound on either output side, in pixels.
    pub max_output_dimension: u32,
}

impl Default for RectifyConfig {
    fn default() -> Self {
        Self {
            interpolation: Resampling::Bilinear,
            border_fill: [255, 255, 255, 255],
            max_output_dimension: 10_000,
        }
    }
}

/// Post-rectification clean-up applied to the flattened page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnhanceMode {
    /// Leave the rectified image untouched.
    #[default]
    None,
    /// Contrast stretch with a slight brightness lift, keeping colour.
    MagicColor,
    Grayscale,
    /// Adaptive (local mean) threshold.
    BlackWhite,
    /// Global Otsu threshold.
    Otsu,
}

impl std::str::FromStr for EnhanceMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "none" | "original" => Ok(Self::None),
            "magic_color" | "magic" => Ok(Self::MagicColor),
            "grayscale" | "gray" | "grey" => Ok(Self::Grayscale),
            "black_white" | "bw" => Ok(Self::BlackWhite),
            "otsu" => Ok(Self::Otsu),
            other => Err(format!("unknown enhance mode `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    pub mode: EnhanceMode,
    /// Neighbourhood size for the adaptive threshold (odd, >= 3).
    pub block_size: u32,
    /// Offset subtracted from the local mean before thresholding.
    pub threshold_offset: f32,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            mode: EnhanceMode::None,
            block_size: 31,
            threshold_offset: 10.0,
        }
    }
}

/// Which OCR look-alike substitutions to apply before MRZ extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfusionTable {
    /// Only Cyrillic `О` and `М`.
    Minimal,
    /// Every Cyrillic letter that renders like an MRZ Latin letter, plus
    /// angle-quote look-alikes of `<`.
    #[default]
    Extended,
}

/// MRZ extraction and parsing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MrzConfig {
    pub locale: Locale,
    /// Two-digit years below the pivot are read as 20yy, the rest as 19yy.
    pub century_pivot: u32,
    /// Passport validity used to estimate the issue date from the expiry.
    pub validity_years: u32,
    pub confusion_table: ConfusionTable,
}

impl Default for MrzConfig {
    fn default() -> Self {
        Self {
            locale: Locale::English,
            century_pivot: 69,
            validity_years: 10,
            confusion_table: ConfusionTable::Extended,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub paper_size: PaperSize,
}

impl ScanConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject values outside the range the pipeline can work with.
    pub fn validate(&self) -> Result<()> {
        let d = &self.detection;
        if !(d.blur_sigma.is_finite() && d.blur_sigma > 0.0) {
            return Err(invalid("detection.blur_sigma must be a positive number"));
        }
        if !(d.canny_low >= 0.0 && d.canny_low <= d.canny_high) {
            return Err(invalid(
                "detection.canny_low must be non-negative and not exceed canny_high",
            ));
        }
        if !(d.approx_epsilon_fraction > 0.0 && d.approx_epsilon_fraction < 1.0) {
            return Err(invalid(
                "detection.approx_epsilon_fraction must be between 0 and 1",
            ));
        }
        if !(0.0..1.0).contains(&d.min_area_fraction) {
            return Err(invalid("detection.min_area_fraction must be in [0, 1)"));
        }
        if d.max_candidates == 0 {
            return Err(invalid("detection.max_candidates must be at least 1"));
        }
        if d.max_working_dimension < 64 {
            return Err(invalid("detection.max_working_dimension must be at least 64"));
        }

        if self.rectification.max_output_dimension == 0 {
            return Err(invalid(
                "rectification.max_output_dimension must be at least 1",
            ));
        }

        let e = &self.enhancement;
        if e.block_size < 3 || e.block_size % 2 == 0 {
            return Err(invalid("enhancement.block_size must be odd and at least 3"));
        }

        let m = &self.mrz;
        if m.century_pivot > 99 {
            return Err(invalid("mrz.century_pivot must be between 0 and 99"));
        }
        if m.validity_years == 0 || m.validity_years > 50 {
            return Err(invalid("mrz.validity_years must be between 1 and 50"));
        }

        let (w, h) = self.report.paper_size.dimensions_mm();
        if w == 0 || h == 0 {
            return Err(invalid("report.paper_size must have non-zero dimensions"));
        }
        Ok(())
    }
}

fn invalid(detail: &str) -> ScanwerkError {
    ScanwerkError::Config(detail.to_string())
}
