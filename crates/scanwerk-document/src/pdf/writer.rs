// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — report pages from flowing text or absolutely positioned form
// fields, using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, TextItem,
};
use scanwerk_core::PaperSize;
use scanwerk_core::error::{Result, ScanwerkError};
use tracing::{debug, instrument};

const FONT: BuiltinFont = BuiltinFont::Helvetica;

/// One piece of text placed at a fixed position on a form page.
///
/// Coordinates are PDF points from the page's bottom-left corner to the
/// start of the text baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct FormText {
    pub x_pt: f32,
    pub y_pt: f32,
    pub size_pt: f32,
    pub text: String,
}

impl FormText {
    pub fn new(x_pt: f32, y_pt: f32, size_pt: f32, text: impl Into<String>) -> Self {
        Self {
            x_pt,
            y_pt,
            size_pt,
            text: text.into(),
        }
    }
}

/// Creates report PDFs with the built-in Helvetica font.
///
/// Built-in fonts only cover a Latin code page, so every string is folded to
/// ASCII look-alikes first (see [`fold_to_ascii`]).
pub struct PdfWriter {
    paper_size: PaperSize,
    title: Option<String>,
}

impl PdfWriter {
    pub fn new(paper_size: PaperSize) -> Self {
        Self {
            paper_size,
            title: None,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    fn page_dimensions(&self) -> (Mm, Mm) {
        let (w_mm, h_mm) = self.paper_size.dimensions_mm();
        (Mm(w_mm as f32), Mm(h_mm as f32))
    }

    // -- Flowing text ---------------------------------------------------------

    /// Lay `text` out top-to-bottom at 11 pt, wrapping long lines and breaking
    /// pages as needed. Empty text still produces one blank page.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn create_from_text(&self, text: &str) -> Vec<u8> {
        let (page_w, page_h) = self.page_dimensions();
        let font_size_pt = 11.0f32;
        let line_height_pt = 14.0f32;
        let margin_mm = 20.0f32;
        let margin_pt = Mm(margin_mm).into_pt().0;

        // Helvetica averages about half an em per glyph; 1 pt = 0.3528 mm.
        let avg_char_width_mm = 0.50 * font_size_pt * 0.3528;
        let max_chars = (((page_w.0 - 2.0 * margin_mm) / avg_char_width_mm) as usize).max(1);
        let page_h_pt = page_h.into_pt().0;
        let lines_per_page = (((page_h_pt - 2.0 * margin_pt) / line_height_pt) as usize).max(1);

        let lines = wrap_text(&fold_to_ascii(text), max_chars);
        let mut pages: Vec<PdfPage> = lines
            .chunks(lines_per_page)
            .map(|chunk| {
                let mut ops = Vec::with_capacity(chunk.len() * 5);
                for (row, line) in chunk.iter().enumerate() {
                    let y_pt = page_h_pt - margin_pt - row as f32 * line_height_pt;
                    push_text(&mut ops, margin_pt, y_pt, font_size_pt, line.clone());
                }
                PdfPage::new(page_w, page_h, ops)
            })
            .collect();
        if pages.is_empty() {
            pages.push(PdfPage::new(page_w, page_h, Vec::new()));
        }

        debug!(lines = lines.len(), pages = pages.len(), "Text layout complete");
        self.save(pages)
    }

    // -- Positioned form ------------------------------------------------------

    /// Render a single page with every field at its own position.
    ///
    /// Fails with [`ScanwerkError::PdfError`] when a field's baseline start
    /// lies outside the page or its font size is not a positive number.
    #[instrument(skip_all, fields(fields = fields.len()))]
    pub fn create_form(&self, fields: &[FormText]) -> Result<Vec<u8>> {
        let (page_w, page_h) = self.page_dimensions();
        let (page_w_pt, page_h_pt) = (page_w.into_pt().0, page_h.into_pt().0);

        if let Some(field) = fields.iter().find(|f| {
            !(0.0..=page_w_pt).contains(&f.x_pt)
                || !(0.0..=page_h_pt).contains(&f.y_pt)
                || !(f.size_pt > 0.0 && f.size_pt.is_finite())
        }) {
            return Err(ScanwerkError::PdfError(format!(
                "field {:?} at ({}, {}) size {} does not fit a {:.0}x{:.0} pt page",
                field.text, field.x_pt, field.y_pt, field.size_pt, page_w_pt, page_h_pt
            )));
        }

        let mut ops = Vec::with_capacity(fields.len() * 5);
        for field in fields.iter().filter(|f| !f.text.is_empty()) {
            push_text(&mut ops, field.x_pt, field.y_pt, field.size_pt, fold_to_ascii(&field.text));
        }

        Ok(self.save(vec![PdfPage::new(page_w, page_h, ops)]))
    }

    fn save(&self, pages: Vec<PdfPage>) -> Vec<u8> {
        let mut doc = PdfDocument::new(self.title.as_deref().unwrap_or("Scanwerk Report"));
        doc.with_pages(pages);
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(warnings = warnings.len(), "printpdf reported warnings");
        }
        bytes
    }
}

fn push_text(ops: &mut Vec<Op>, x_pt: f32, y_pt: f32, size_pt: f32, text: String) {
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point {
            x: Pt(x_pt),
            y: Pt(y_pt),
        },
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(size_pt),
        font: FONT,
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(text)],
        font: FONT,
    });
    ops.push(Op::EndTextSection);
}

// -- Text helpers -------------------------------------------------------------

/// Replace characters the built-in fonts cannot show with ASCII look-alikes.
///
/// Turkish and common Western European letters lose their diacritics;
/// anything else outside ASCII becomes `?`.
pub fn fold_to_ascii(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            c if c.is_ascii() => c,
            'Ç' => 'C',
            'ç' => 'c',
            'Ğ' => 'G',
            'ğ' => 'g',
            'İ' => 'I',
            'ı' => 'i',
            'Ö' | 'Ó' | 'Ò' | 'Ô' => 'O',
            'ö' | 'ó' | 'ò' | 'ô' => 'o',
            'Ş' => 'S',
            'ş' => 's',
            'Ü' | 'Ú' | 'Ù' | 'Û' => 'U',
            'ü' | 'ú' | 'ù' | 'û' => 'u',
            'Â' | 'Á' | 'À' | 'Ä' => 'A',
            'â' | 'á' | 'à' | 'ä' => 'a',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'Î' | 'Í' => 'I',
            'î' | 'í' => 'i',
            _ => '?',
        })
        .collect()
}

/// Word-wrap to at most `max_width` characters per line, keeping blank
/// lines and force-breaking words that are longer than a line.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word;
            while word.len() > max_width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let (head, tail) = word.split_at(max_width);
                lines.push(head.to_string());
                word = tail;
            }
            if word.is_empty() {
                continue;
            }
            if current.is_empty() {
                current.push_str(word);
            } else if current.len() + 1 + word.len() <= max_width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }
    lines
}
