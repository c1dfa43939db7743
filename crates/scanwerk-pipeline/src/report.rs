// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report rendering — turns an extraction into a printable document.

use scanwerk_core::error::Result;
use scanwerk_core::{Locale, PaperSize, ScanConfig};
use scanwerk_document::{FormText, PdfWriter};
use tracing::{debug, instrument};

use crate::orchestrator::{GenericDocument, PassportExtraction};

/// Renders extraction results into report bytes.
pub trait ReportRenderer: Send + Sync {
    fn render_passport(&self, passport: &PassportExtraction) -> Result<Vec<u8>>;

    fn render_document(&self, document: &GenericDocument) -> Result<Vec<u8>>;
}

// -- Form labels ---------------------------------------------------------------

struct Labels {
    document: &'static str,
    kind: &'static str,
    surname: &'static str,
    given_names: &'static str,
    nationality: &'static str,
    birth_date: &'static str,
    sex: &'static str,
    issue_date: &'static str,
    expiry_date: &'static str,
    country_code: &'static str,
    birth_place: &'static str,
    passport_number: &'static str,
    record_number: &'static str,
    authority: &'static str,
}

const ENGLISH: Labels = Labels {
    document: "PASSPORT",
    kind: "TYPE:",
    surname: "SURNAME:",
    given_names: "GIVEN NAMES:",
    nationality: "NATIONALITY:",
    birth_date: "DATE OF BIRTH:",
    sex: "SEX:",
    issue_date: "DATE OF ISSUE:",
    expiry_date: "DATE OF EXPIRY:",
    country_code: "COUNTRY CODE:",
    birth_place: "PLACE OF BIRTH:",
    passport_number: "PASSPORT NO.:",
    record_number: "RECORD NO.:",
    authority: "AUTHORITY:",
};

const TURKISH: Labels = Labels {
    document: "PASAPORT",
    kind: "TÜRÜ:",
    surname: "SOYADI:",
    given_names: "ADI:",
    nationality: "UYRUĞU:",
    birth_date: "DOĞUM TARİHİ:",
    sex: "CİNSİYETİ:",
    issue_date: "DÜZENLENME TARİHİ:",
    expiry_date: "GEÇERLİLİK TARİHİ:",
    country_code: "ÜLKE KODU:",
    birth_place: "DOĞUM YERİ:",
    passport_number: "PASAPORT NO.:",
    record_number: "KAYIT NO.:",
    authority: "DÜZENLEYEN MAKAM:",
};

fn labels(locale: Locale) -> &'static Labels {
    match locale {
        Locale::English => &ENGLISH,
        Locale::Turkish => &TURKISH,
    }
}

// -- PDF renderer ---------------------------------------------------------------

const TITLE_PT: f32 = 14.0;
const FIELD_PT: f32 = 10.0;
const MRZ_PT: f32 = 7.0;

/// PDF reports: a single-page passport form, or flowing text for generic
/// documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReportRenderer {
    paper_size: PaperSize,
    locale: Locale,
}

impl PdfReportRenderer {
    pub fn new(paper_size: PaperSize, locale: Locale) -> Self {
        Self { paper_size, locale }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.report.paper_size, config.mrz.locale)
    }

    /// Every positioned string on the passport form. The record's localised
    /// fields are expected to be in the renderer's locale.
    pub fn passport_form(&self, passport: &PassportExtraction) -> Vec<FormText> {
        let l = labels(self.locale);
        let r = &passport.record;
        let loc = &r.localized;
        let (line1, line2) = r.mrz.lines();

        vec![
            FormText::new(270.0, 750.0, TITLE_PT, loc.issuing_country.as_str()),
            FormText::new(50.0, 700.0, FIELD_PT, l.document),
            FormText::new(170.0, 700.0, FIELD_PT, r.document_code.as_str()),
            FormText::new(130.0, 700.0, FIELD_PT, l.kind),
            FormText::new(
                250.0,
                700.0,
                FIELD_PT,
                format!("{} {}", l.country_code, r.issuing_country),
            ),
            FormText::new(370.0, 700.0, FIELD_PT, l.passport_number),
            FormText::new(450.0, 700.0, FIELD_PT, r.passport_number.as_str()),
            FormText::new(130.0, 670.0, FIELD_PT, l.surname),
            FormText::new(250.0, 670.0, FIELD_PT, r.surname.as_str()),
            FormText::new(130.0, 640.0, FIELD_PT, l.given_names),
            FormText::new(250.0, 640.0, FIELD_PT, r.given_names.as_str()),
            FormText::new(130.0, 610.0, FIELD_PT, l.nationality),
            FormText::new(250.0, 610.0, FIELD_PT, loc.nationality.as_str()),
            FormText::new(130.0, 580.0, FIELD_PT, l.birth_date),
            FormText::new(250.0, 580.0, FIELD_PT, loc.birth_date.as_str()),
            FormText::new(
                370.0,
                580.0,
                FIELD_PT,
                format!(
                    "{} {}",
                    l.record_number,
                    r.record_number.as_deref().unwrap_or_default()
                ),
            ),
            FormText::new(130.0, 550.0, FIELD_PT, l.sex),
            FormText::new(190.0, 550.0, FIELD_PT, loc.sex.as_str()),
            FormText::new(250.0, 550.0, FIELD_PT, l.birth_place),
            // The MRZ carries no birthplace; the issuing country stands in.
            FormText::new(370.0, 550.0, FIELD_PT, loc.issuing_country.as_str()),
            FormText::new(130.0, 520.0, FIELD_PT, l.issue_date),
            FormText::new(250.0, 520.0, FIELD_PT, loc.issue_date.as_str()),
            FormText::new(370.0, 520.0, FIELD_PT, l.authority),
            FormText::new(
                490.0,
                520.0,
                FIELD_PT,
                passport.authority.as_deref().unwrap_or_default(),
            ),
            FormText::new(130.0, 490.0, FIELD_PT, l.expiry_date),
            FormText::new(250.0, 490.0, FIELD_PT, loc.expiry_date.as_str()),
            FormText::new(50.0, 470.0, MRZ_PT, line1),
            FormText::new(50.0, 450.0, MRZ_PT, line2),
        ]
    }
}

impl ReportRenderer for PdfReportRenderer {
    #[instrument(skip_all, fields(locale = ?self.locale))]
    fn render_passport(&self, passport: &PassportExtraction) -> Result<Vec<u8>> {
        let fields = self.passport_form(passport);
        let mut writer = PdfWriter::new(self.paper_size);
        writer.set_title(format!(
            "{} {}",
            labels(self.locale).document,
            passport.record.passport_number
        ));
        let bytes = writer.create_form(&fields)?;
        debug!(fields = fields.len(), bytes = bytes.len(), "Passport report rendered");
        Ok(bytes)
    }

    #[instrument(skip_all, fields(text_len = document.text.len()))]
    fn render_document(&self, document: &GenericDocument) -> Result<Vec<u8>> {
        let mut writer = PdfWriter::new(self.paper_size);
        writer.set_title("Scanned Document");
        let bytes = writer.create_from_text(&document.text);
        debug!(bytes = bytes.len(), "Document report rendered");
        Ok(bytes)
    }
}
