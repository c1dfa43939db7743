// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Scanwerk capture pipeline.

use serde::{Deserialize, Serialize};

/// Which extraction path the caller wants after a page has been rectified.
///
/// Scanwerk never classifies documents itself; the caller decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Any page: recognised text is returned as-is.
    GenericScan,
    /// Passport data page: the TD3 machine-readable zone is extracted and parsed.
    PassportScan,
}

impl std::str::FromStr for ScanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generic" | "generic_scan" | "document" => Ok(Self::GenericScan),
            "passport" | "passport_scan" => Ok(Self::PassportScan),
            other => Err(format!("unknown scan mode `{other}` (expected generic or passport)")),
        }
    }
}

/// A positional field of the TD3 machine-readable zone.
///
/// Carried by [`crate::ScanwerkError::MalformedMrz`] so callers can point the
/// user at the exact field that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MrzField {
    /// Overall shape: total length and character alphabet.
    Layout,
    DocumentCode,
    DocumentSubtype,
    IssuingCountry,
    Surname,
    GivenNames,
    PassportNumber,
    PassportNumberCheck,
    Nationality,
    BirthDate,
    BirthDateCheck,
    Sex,
    ExpiryDate,
    ExpiryDateCheck,
    PersonalNumber,
    PersonalNumberCheck,
    CompositeCheck,
}

impl MrzField {
    /// Human-readable field name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::DocumentCode => "document code",
            Self::DocumentSubtype => "document subtype",
            Self::IssuingCountry => "issuing country",
            Self::Surname => "surname",
            Self::GivenNames => "given names",
            Self::PassportNumber => "passport number",
            Self::PassportNumberCheck => "passport number check digit",
            Self::Nationality => "nationality",
            Self::BirthDate => "birth date",
            Self::BirthDateCheck => "birth date check digit",
            Self::Sex => "sex",
            Self::ExpiryDate => "expiry date",
            Self::ExpiryDateCheck => "expiry date check digit",
            Self::PersonalNumber => "personal number",
            Self::PersonalNumberCheck => "personal number check digit",
            Self::CompositeCheck => "composite check digit",
        }
    }
}

impl std::fmt::Display for MrzField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Display locale for derived passport fields and report labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    English,
    Turkish,
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "tr" | "turkish" => Ok(Self::Turkish),
            other => Err(format!("unsupported locale `{other}` (expected en or tr)")),
        }
    }
}

/// Standard paper sizes for rendered reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_mode_parses_aliases() {
        assert_eq!("passport".parse::<ScanMode>().unwrap(), ScanMode::PassportScan);
        assert_eq!("Generic".parse::<ScanMode>().unwrap(), ScanMode::GenericScan);
        assert!("invoice".parse::<ScanMode>().is_err());
    }

    #[test]
    fn locale_parses_codes() {
        assert_eq!("tr".parse::<Locale>().unwrap(), Locale::Turkish);
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::English);
    }

    #[test]
    fn scan_mode_serializes_snake_case() {
        let json = serde_json::to_string(&ScanMode::PassportScan).unwrap();
        assert_eq!(json, "\"passport_scan\"");
    }
}
