// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for people holding a phone over a document.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The taxonomy uses three severity levels that drive presentation.

use crate::error::ScanwerkError;
use crate::types::MrzField;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Worth trying again as-is (flaky OCR service, busy disk).
    Transient,
    /// User must do something (retake the photo, drag a corner).
    ActionRequired,
    /// Cannot be fixed by retrying: corrupt file, bad configuration.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the system should auto-retry.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `ScanwerkError` into a `HumanError` anyone can act on.
pub fn humanize_error(err: &ScanwerkError) -> HumanError {
    match err {
        // -- Scan outcomes --
        ScanwerkError::DocumentNotFound { .. } => HumanError {
            message: "We couldn't find the edges of your document.".into(),
            suggestion: "Drag the corners to the edges of the page, or retake the photo on a darker, plain background.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanwerkError::InvalidShape(detail) => HumanError {
            message: "Those corners don't make a page shape.".into(),
            suggestion: format!("Move the corners so they sit on the four corners of the page, without crossing. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Passport outcomes --
        ScanwerkError::MrzNotFound { .. } => HumanError {
            message: "We couldn't read the two lines at the bottom of the passport.".into(),
            suggestion: "Retake the photo of the photo page with the whole bottom strip in view, in good light and without glare.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanwerkError::MalformedMrz { field, .. } => humanize_mrz_field(*field),

        // -- Faults --
        ScanwerkError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanwerkError::PdfError(_) => HumanError {
            message: "We couldn't create the PDF report.".into(),
            suggestion: "The report layout doesn't fit the chosen paper size. Try A4 or Letter.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanwerkError::Recognition(_) => HumanError {
            message: "Text recognition didn't work on this scan.".into(),
            suggestion: "Try scanning the document again with better lighting, making sure the text is clear and in focus.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanwerkError::Config(detail) => HumanError {
            message: "The scanner settings are not valid.".into(),
            suggestion: format!("Fix the configuration file and try again. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanwerkError::IntegrityMismatch { .. } => HumanError {
            message: "This file has been changed since it was stored.".into(),
            suggestion: "The stored copy doesn't match the original. Scan the document again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "We don't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or try copying the file to a different location first.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        ScanwerkError::Serialization(_) => HumanError {
            message: "Some data couldn't be read.".into(),
            suggestion: "Check that the file is valid JSON. If this keeps happening, please report it.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

/// Point the user at the part of the passport strip that failed.
fn humanize_mrz_field(field: MrzField) -> HumanError {
    let suggestion = match field {
        MrzField::Layout | MrzField::DocumentCode | MrzField::DocumentSubtype => {
            "Make sure you are scanning the photo page of a passport, then try again.".to_string()
        }
        MrzField::BirthDate | MrzField::ExpiryDate => format!(
            "The {field} in the bottom strip was unreadable. Retake the photo so the numbers are sharp."
        ),
        _ => format!(
            "The {field} in the bottom strip was unreadable. Retake the photo in better light."
        ),
    };
    HumanError {
        message: "Part of the passport strip didn't read correctly.".into(),
        suggestion,
        retriable: false,
        severity: Severity::ActionRequired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Quadrilateral;

    #[test]
    fn missing_document_asks_for_adjustment() {
        let err = ScanwerkError::DocumentNotFound {
            fallback: Quadrilateral::full_frame(640, 480),
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
        assert!(human.suggestion.contains("corners"));
    }

    #[test]
    fn malformed_mrz_names_field() {
        let err = ScanwerkError::MalformedMrz {
            field: MrzField::ExpiryDate,
            detail: "must be 6 digits".into(),
        };
        let human = humanize_error(&err);
        assert!(human.suggestion.contains("expiry date"));
    }

    /// Recognition failures come from an outside service and are retried.
    #[test]
    fn recognition_is_transient() {
        let human = humanize_error(&ScanwerkError::Recognition("timeout".into()));
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn missing_file_is_action_required() {
        let err = ScanwerkError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }

    #[test]
    fn bad_config_is_permanent() {
        let human = humanize_error(&ScanwerkError::Config("mrz.century_pivot".into()));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(human.suggestion.contains("mrz.century_pivot"));
    }
}
