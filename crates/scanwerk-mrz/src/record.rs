// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Structured passport data decoded from a TD3 machine-readable zone.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::string::MrzString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    /// `<` in the MRZ.
    Unspecified,
}

impl Sex {
    pub(crate) fn from_mrz(c: char) -> Option<Self> {
        match c {
            'M' => Some(Self::Male),
            'F' => Some(Self::Female),
            '<' => Some(Self::Unspecified),
            _ => None,
        }
    }

    /// The single MRZ letter.
    pub fn code(&self) -> char {
        match self {
            Self::Male => 'M',
            Self::Female => 'F',
            Self::Unspecified => '<',
        }
    }
}

/// Result of each ICAO 9303 check digit. A `false` entry means the printed
/// digit disagrees with the data it guards, which usually points at an OCR
/// misread in that field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDigits {
    pub passport_number: bool,
    pub birth_date: bool,
    pub expiry_date: bool,
    pub personal_number: bool,
    pub composite: bool,
}

impl CheckDigits {
    pub fn all_valid(&self) -> bool {
        self.passport_number
            && self.birth_date
            && self.expiry_date
            && self.personal_number
            && self.composite
    }
}

/// Display strings in the configured locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedFields {
    pub issuing_country: String,
    pub nationality: String,
    pub birth_date: String,
    pub expiry_date: String,
    pub issue_date: String,
    pub sex: String,
}

/// A parsed passport data page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassportRecord {
    /// `P`, plus the subtype letter when present.
    pub document_code: String,
    pub issuing_country: String,
    pub surname: String,
    /// Given names separated by single spaces; may be empty.
    pub given_names: String,
    pub passport_number: String,
    pub nationality: String,
    pub birth_date: NaiveDate,
    pub sex: Sex,
    pub expiry_date: NaiveDate,
    /// Optional personal number with fillers removed; may be empty.
    pub personal_number: String,
    /// Personal number shown as `XXXXXXXX-YYYYY`, when there is one.
    pub record_number: Option<String>,
    /// Expiry minus the configured validity period. Passports do not carry
    /// their issue date in the MRZ, so this is an estimate.
    pub issue_date_estimated: NaiveDate,
    pub check_digits: CheckDigits,
    pub localized: LocalizedFields,
    pub mrz: MrzString,
}
