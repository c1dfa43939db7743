// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwerk-document — Image-side processing for the Scanwerk capture pipeline.
//
// Provides document boundary detection, perspective rectification, conversion
// between corner quadrilaterals and UI handle points, post-scan enhancement
// (magic colour, grayscale, adaptive and Otsu binarization), and PDF creation
// for reports.

pub mod image;
pub mod pdf;
pub mod scan;

// Re-export the primary structs so callers can use `scanwerk_document::GeometryDetector` etc.
pub use crate::image::processor::ImageProcessor;
pub use pdf::writer::{FormText, PdfWriter};
pub use scan::detect::GeometryDetector;
pub use scan::enhance::ScanEnhancer;
pub use scan::points::PointFormatConverter;
pub use scan::rectify::{PerspectiveRectifier, RectifiedImage};
