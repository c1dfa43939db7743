// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text recognition boundary. OCR runs outside this workspace; the pipeline
// only sees the text it returns.

use image::DynamicImage;
use scanwerk_core::error::Result;

/// Turns a rectified page into plain text.
///
/// Implementations wrap whatever OCR service the deployment uses and report
/// its failures as `ScanwerkError::Recognition`.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &DynamicImage) -> Result<String>;
}

/// Returns text the caller already recognised, ignoring the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecomputedText(pub String);

impl PrecomputedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl TextRecognizer for PrecomputedText {
    fn recognize(&self, _image: &DynamicImage) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precomputed_text_ignores_image() {
        let recognizer = PrecomputedText::new("hello");
        let image = DynamicImage::new_luma8(2, 2);
        assert_eq!(recognizer.recognize(&image).unwrap(), "hello");
    }

    #[test]
    fn usable_as_trait_object() {
        let boxed: Box<dyn TextRecognizer> = Box::new(PrecomputedText::new("x"));
        assert_eq!(boxed.recognize(&DynamicImage::new_luma8(1, 1)).unwrap(), "x");
    }
}
