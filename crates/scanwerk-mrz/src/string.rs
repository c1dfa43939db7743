// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Validated two-line TD3 machine-readable zone text.

use std::fmt;

use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::MrzField;
use serde::{Deserialize, Serialize};

/// Characters per TD3 line.
pub const LINE_LEN: usize = 44;
/// Characters in a complete TD3 zone.
pub const MRZ_LEN: usize = 2 * LINE_LEN;

/// Both MRZ lines concatenated: exactly 88 characters from `[A-Z0-9<]`,
/// starting with the passport document code `P`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MrzString(String);

impl MrzString {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();

        let length = text.chars().count();
        if length != MRZ_LEN {
            return Err(layout(format!("must be {MRZ_LEN} characters, got {length}")));
        }
        if let Some((position, c)) = text.chars().enumerate().find(|(_, c)| !is_mrz_char(*c)) {
            return Err(layout(format!("has invalid character {c:?} at position {position}")));
        }
        if !text.starts_with('P') {
            return Err(ScanwerkError::MalformedMrz {
                field: MrzField::DocumentCode,
                detail: "must be P for a passport".into(),
            });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The two 44-character lines.
    pub fn lines(&self) -> (&str, &str) {
        self.0.split_at(LINE_LEN)
    }
}

/// Whether `c` belongs to the MRZ alphabet.
pub fn is_mrz_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '<'
}

fn layout(detail: String) -> ScanwerkError {
    ScanwerkError::MalformedMrz {
        field: MrzField::Layout,
        detail,
    }
}

impl TryFrom<String> for MrzString {
    type Error = ScanwerkError;

    fn try_from(text: String) -> Result<Self> {
        Self::new(text)
    }
}

impl From<MrzString> for String {
    fn from(mrz: MrzString) -> Self {
        mrz.0
    }
}

impl AsRef<str> for MrzString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MrzString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (first, second) = self.lines();
        write!(f, "{first}\n{second}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECIMEN: &str = concat!(
        "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<",
        "L898902C36UTO7408122F1204159ZE184226B<<<<<10",
    );

    #[test]
    fn accepts_icao_specimen() {
        let mrz = MrzString::new(SPECIMEN).unwrap();
        let (first, second) = mrz.lines();
        assert_eq!(first.len(), LINE_LEN);
        assert!(second.starts_with("L898902C3"));
    }

    #[test]
    fn rejects_wrong_length() {
        let err = MrzString::new(&SPECIMEN[..87]).unwrap_err();
        assert!(matches!(
            err,
            ScanwerkError::MalformedMrz {
                field: MrzField::Layout,
                ..
            }
        ));
        assert!(err.to_string().contains("got 87"));
    }

    #[test]
    fn rejects_lowercase_and_symbols() {
        let lower = SPECIMEN.replacen("ERIKSSON", "Eriksson", 1);
        let err = MrzString::new(lower).unwrap_err();
        assert!(err.to_string().contains("position 6"));
    }

    #[test]
    fn rejects_non_passport_code() {
        let visa = SPECIMEN.replacen('P', "V", 1);
        let err = MrzString::new(visa).unwrap_err();
        assert!(matches!(
            err,
            ScanwerkError::MalformedMrz {
                field: MrzField::DocumentCode,
                ..
            }
        ));
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<MrzString>("\"P<UTO\"").is_err());
        let json = serde_json::to_string(&MrzString::new(SPECIMEN).unwrap()).unwrap();
        assert_eq!(json, format!("\"{SPECIMEN}\""));
    }
}
