// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Scanwerk.

use thiserror::Error;

use crate::geometry::Quadrilateral;
use crate::types::MrzField;

/// Top-level error type for all Scanwerk operations.
///
/// The first four variants are expected outcomes the caller recovers from
/// (re-prompt, manual correction, fallback shape). Everything else is a fault
/// that propagates unchanged.
#[derive(Debug, Error)]
pub enum ScanwerkError {
    // -- Recoverable outcomes --
    /// No document boundary was found. `fallback` is the full-frame
    /// placeholder the caller should offer for manual adjustment.
    #[error("could not locate the document boundary")]
    DocumentNotFound { fallback: Quadrilateral },

    #[error("no machine-readable zone found: {reason}")]
    MrzNotFound { reason: String },

    #[error("invalid corner shape: {0}")]
    InvalidShape(String),

    #[error("malformed MRZ: {field} {detail}")]
    MalformedMrz { field: MrzField, detail: String },

    // -- Faults --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("text recognition failed: {0}")]
    Recognition(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScanwerkError {
    /// Whether the caller is expected to recover (fallback, re-prompt, or
    /// manual correction) rather than abort the request.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DocumentNotFound { .. }
                | Self::MrzNotFound { .. }
                | Self::InvalidShape(_)
                | Self::MalformedMrz { .. }
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanwerkError>;
