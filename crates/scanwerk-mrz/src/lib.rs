// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwerk-mrz — Passport machine-readable zone handling.
//
// Pulls a TD3 MRZ out of noisy recognised text, parses it positionally into a
// `PassportRecord`, verifies ICAO 9303 check digits, and renders localised
// display strings.

pub mod check_digit;
pub mod extract;
pub mod locale;
pub mod parse;
pub mod record;
pub mod string;

pub use extract::{MrzExtractor, extract_authority};
pub use parse::MrzParser;
pub use record::{CheckDigits, LocalizedFields, PassportRecord, Sex};
pub use string::MrzString;
