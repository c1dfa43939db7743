// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwerk-pipeline — Sequences the scan and extraction stages.
//
// The scan stage locates and flattens a document photo; the extraction stage
// turns recognised text into a generic document or a passport record. Text
// recognition and report rendering sit behind traits, and artifacts are kept
// in a content-addressed store rooted at a caller-chosen directory.

pub mod orchestrator;
pub mod recognizer;
pub mod report;
pub mod store;

pub use orchestrator::{Extraction, GenericDocument, PassportExtraction, Pipeline, ScanOutcome};
pub use recognizer::{PrecomputedText, TextRecognizer};
pub use report::{PdfReportRenderer, ReportRenderer};
pub use store::ArtifactStore;
