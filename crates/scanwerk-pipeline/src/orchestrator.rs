// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline orchestrator — drives detect → points → rectify for the scan stage
// and extract → parse for the extraction stage.

use image::DynamicImage;
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::{ClientPoint, EnhanceMode, Quadrilateral, ScanConfig, ScanMode};
use scanwerk_document::{
    GeometryDetector, PerspectiveRectifier, PointFormatConverter, RectifiedImage, ScanEnhancer,
};
use scanwerk_mrz::{MrzExtractor, MrzParser, PassportRecord, extract_authority};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::recognizer::TextRecognizer;

/// Result of locating a document in a photo.
///
/// `points` always holds four handles for the client to show: the detected
/// corners, or the full frame when nothing was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub quad: Quadrilateral,
    pub points: [ClientPoint; 4],
    pub located: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericDocument {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassportExtraction {
    pub record: PassportRecord,
    /// Four-digit issuing authority code printed on the data page, if any.
    pub authority: Option<String>,
}

/// Structured output of the extraction stage, one variant per [`ScanMode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Extraction {
    Generic(GenericDocument),
    Passport(PassportExtraction),
}

/// Runs both pipeline stages with one validated configuration.
///
/// The stages are separate calls because the client usually edits the
/// corner points between them.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: ScanConfig,
    detector: GeometryDetector,
    rectifier: PerspectiveRectifier,
    extractor: MrzExtractor,
    parser: MrzParser,
}

impl Pipeline {
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            detector: GeometryDetector::new(config.detection.clone()),
            rectifier: PerspectiveRectifier::new(config.rectification.clone()),
            extractor: MrzExtractor::new(config.mrz.confusion_table),
            parser: MrzParser::new(config.mrz.clone()),
            config,
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    // -- Scan stage -------------------------------------------------------------

    /// Find the document and return handles for the client. A missing
    /// boundary is reported in the outcome rather than as an error.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn locate(&self, image: &DynamicImage) -> Result<ScanOutcome> {
        let (quad, located, message) = match self.detector.detect(image) {
            Ok(quad) => (quad, true, "Document located".to_string()),
            Err(ScanwerkError::DocumentNotFound { fallback }) => (
                fallback,
                false,
                "Document edges not found; adjust the corners manually".to_string(),
            ),
            Err(err) => return Err(err),
        };
        info!(located, "Scan stage: locate finished");
        Ok(ScanOutcome {
            points: PointFormatConverter::to_client_format(&quad),
            quad,
            located,
            message,
        })
    }

    /// Flatten the region inside the client's points, then apply the
    /// configured enhancement.
    #[instrument(skip(self, image), fields(enhance = ?self.config.enhancement.mode))]
    pub fn rectify(&self, image: DynamicImage, points: &[ClientPoint]) -> Result<RectifiedImage> {
        let quad = PointFormatConverter::from_client_format(points)?;
        let rectified = self.rectifier.rectify(image, &quad)?;
        let page = self.enhance(rectified);
        info!(width = page.width, height = page.height, "Scan stage: rectify finished");
        Ok(page)
    }

    /// Locate, then rectify with whatever corners were found, falling back
    /// to the whole frame.
    pub fn scan(&self, image: DynamicImage) -> Result<(ScanOutcome, RectifiedImage)> {
        let outcome = self.locate(&image)?;
        let page = self.rectify(image, &outcome.points)?;
        Ok((outcome, page))
    }

    fn enhance(&self, page: RectifiedImage) -> RectifiedImage {
        if self.config.enhancement.mode == EnhanceMode::None {
            return page;
        }
        let RectifiedImage { image, width, height } = page;
        let image = ScanEnhancer::from_dynamic(image)
            .apply(&self.config.enhancement)
            .into_dynamic();
        RectifiedImage { image, width, height }
    }

    // -- Extraction stage -------------------------------------------------------

    /// Recognise the page text and extract it along the path `mode` selects.
    #[instrument(skip(self, page, recognizer))]
    pub fn extract(
        &self,
        mode: ScanMode,
        page: &RectifiedImage,
        recognizer: &dyn TextRecognizer,
    ) -> Result<Extraction> {
        let text = recognizer.recognize(&page.image)?;
        self.extract_from_text(mode, &text)
    }

    /// Extraction for callers that already hold recognised text.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn extract_from_text(&self, mode: ScanMode, text: &str) -> Result<Extraction> {
        let extraction = match mode {
            ScanMode::GenericScan => Extraction::Generic(GenericDocument {
                text: text.trim().to_string(),
            }),
            ScanMode::PassportScan => Extraction::Passport(self.extract_passport(text)?),
        };
        info!(?mode, "Extraction stage finished");
        Ok(extraction)
    }

    /// Find, validate, and parse the MRZ in `text`.
    pub fn extract_passport(&self, text: &str) -> Result<PassportExtraction> {
        let mrz = self.extractor.extract(text)?;
        let record = self.parser.parse(&mrz)?;
        Ok(PassportExtraction {
            record,
            authority: extract_authority(text),
        })
    }
}
