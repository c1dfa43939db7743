// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Positional TD3 parser: MrzString -> PassportRecord.

use chrono::{Months, NaiveDate};
use scanwerk_core::config::MrzConfig;
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::MrzField;
use tracing::{debug, instrument};

use crate::check_digit;
use crate::locale;
use crate::record::{CheckDigits, LocalizedFields, PassportRecord, Sex};
use crate::string::MrzString;

/// Character class a positional field must match.
#[derive(Debug, Clone, Copy)]
enum Class {
    /// `[A-Z<]`
    Alpha,
    /// `[A-Z0-9<]`
    AlphaNum,
    /// `[0-9]`
    Digits,
    /// `[0-9<]`
    Check,
}

impl Class {
    fn accepts(self, c: char) -> bool {
        match self {
            Self::Alpha => c.is_ascii_uppercase() || c == '<',
            Self::AlphaNum => c.is_ascii_uppercase() || c.is_ascii_digit() || c == '<',
            Self::Digits => c.is_ascii_digit(),
            Self::Check => c.is_ascii_digit() || c == '<',
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Alpha => "letters or <",
            Self::AlphaNum => "letters, digits, or <",
            Self::Digits => "digits",
            Self::Check => "a digit or <",
        }
    }
}

/// Parses a validated [`MrzString`] into a [`PassportRecord`].
///
/// Parsing is pure: the same zone and configuration always give the same
/// record. Check digits are verified and reported on the record; a wrong
/// check digit never fails the parse.
#[derive(Debug, Clone, Default)]
pub struct MrzParser {
    config: MrzConfig,
}

impl MrzParser {
    pub fn new(config: MrzConfig) -> Self {
        Self { config }
    }

    /// Validate `text` as an [`MrzString`], then parse it.
    pub fn parse_str(&self, text: &str) -> Result<PassportRecord> {
        self.parse(&MrzString::new(text)?)
    }

    #[instrument(skip_all)]
    pub fn parse(&self, mrz: &MrzString) -> Result<PassportRecord> {
        let (line1, line2) = mrz.lines();

        // -- Line 1 -----------------------------------------------------------
        let subtype = field(line1, 1..2, Class::Alpha, MrzField::DocumentSubtype)?;
        let issuing_country = field(line1, 2..5, Class::Alpha, MrzField::IssuingCountry)?;
        let (surname, given_names) = split_names(&line1[5..])?;

        // -- Line 2 -----------------------------------------------------------
        let number = field(line2, 0..9, Class::AlphaNum, MrzField::PassportNumber)?;
        let number_check = field(line2, 9..10, Class::Check, MrzField::PassportNumberCheck)?;
        let nationality = field(line2, 10..13, Class::Alpha, MrzField::Nationality)?;
        let birth = field(line2, 13..19, Class::Digits, MrzField::BirthDate)?;
        let birth_check = field(line2, 19..20, Class::Check, MrzField::BirthDateCheck)?;
        let sex_code = field(line2, 20..21, Class::Alpha, MrzField::Sex)?;
        let expiry = field(line2, 21..27, Class::Digits, MrzField::ExpiryDate)?;
        let expiry_check = field(line2, 27..28, Class::Check, MrzField::ExpiryDateCheck)?;
        let personal = field(line2, 28..42, Class::AlphaNum, MrzField::PersonalNumber)?;
        let personal_check = field(line2, 42..43, Class::Check, MrzField::PersonalNumberCheck)?;
        let composite_check = field(line2, 43..44, Class::Check, MrzField::CompositeCheck)?;

        let passport_number = trim_filler(number);
        if passport_number.is_empty() {
            return Err(malformed(MrzField::PassportNumber, "is blank"));
        }
        let sex = first_char(sex_code)
            .and_then(Sex::from_mrz)
            .ok_or_else(|| malformed(MrzField::Sex, "must be M, F, or <"))?;

        let expiry_date = self
            .two_digit_date(expiry)
            .ok_or_else(|| malformed(MrzField::ExpiryDate, "is not a calendar date"))?;
        let mut birth_date = self
            .two_digit_date(birth)
            .ok_or_else(|| malformed(MrzField::BirthDate, "is not a calendar date"))?;
        if birth_date >= expiry_date {
            birth_date = birth_date
                .checked_sub_months(Months::new(1200))
                .ok_or_else(|| malformed(MrzField::BirthDate, "is out of range"))?;
        }
        let issue_date_estimated = expiry_date
            .checked_sub_months(Months::new(self.config.validity_years * 12))
            .ok_or_else(|| malformed(MrzField::ExpiryDate, "is too early to estimate an issue date"))?;

        let composite_data = [&line2[0..10], &line2[13..20], &line2[21..43]].concat();
        let check_digits = CheckDigits {
            passport_number: verify(number, number_check),
            birth_date: verify(birth, birth_check),
            expiry_date: verify(expiry, expiry_check),
            personal_number: verify(personal, personal_check),
            composite: verify(&composite_data, composite_check),
        };
        if !check_digits.all_valid() {
            debug!(?check_digits, "MRZ check digit mismatch");
        }

        let personal_number = trim_filler(personal).to_string();
        let record_number = record_number(&personal_number);
        let issuing_country = trim_filler(issuing_country).to_string();
        let nationality = trim_filler(nationality).to_string();

        let locale = self.config.locale;
        let localized = LocalizedFields {
            issuing_country: locale::country_name(&issuing_country, locale),
            nationality: locale::country_name(&nationality, locale),
            birth_date: locale::format_date(birth_date, locale),
            expiry_date: locale::format_date(expiry_date, locale),
            issue_date: locale::format_date(issue_date_estimated, locale),
            sex: locale::sex_label(sex, locale).to_string(),
        };

        debug!(%issuing_country, %birth_date, %expiry_date, "MRZ parsed");
        Ok(PassportRecord {
            document_code: format!("P{}", trim_filler(subtype)),
            issuing_country,
            surname,
            given_names,
            passport_number: passport_number.to_string(),
            nationality,
            birth_date,
            sex,
            expiry_date,
            personal_number,
            record_number,
            issue_date_estimated,
            check_digits,
            localized,
            mrz: mrz.clone(),
        })
    }

    /// `YYMMDD` with the century chosen by the configured pivot.
    fn two_digit_date(&self, digits: &str) -> Option<NaiveDate> {
        let yy: u32 = digits.get(0..2)?.parse().ok()?;
        let month: u32 = digits.get(2..4)?.parse().ok()?;
        let day: u32 = digits.get(4..6)?.parse().ok()?;
        let century = if yy < self.config.century_pivot { 2000 } else { 1900 };
        NaiveDate::from_ymd_opt((century + yy) as i32, month, day)
    }
}

/// Slice `range` out of `line` and check every character against `class`.
fn field<'a>(
    line: &'a str,
    range: std::ops::Range<usize>,
    class: Class,
    name: MrzField,
) -> Result<&'a str> {
    let value = &line[range];
    match value.chars().position(|c| !class.accepts(c)) {
        None => Ok(value),
        Some(offset) => Err(malformed(
            name,
            &format!("must be {} (found {value:?}, bad character at offset {offset})", class.describe()),
        )),
    }
}

/// `SURNAME<<GIVEN<NAMES<<<` into `("SURNAME", "GIVEN NAMES")`.
fn split_names(names: &str) -> Result<(String, String)> {
    if let Some(offset) = names.chars().position(|c| !Class::Alpha.accepts(c)) {
        return Err(malformed(
            MrzField::Surname,
            &format!("name field may only contain letters or < (found a digit at offset {offset})"),
        ));
    }
    let (surname, given) = names.split_once("<<").unwrap_or((names, ""));
    let surname = words(surname);
    if surname.is_empty() {
        return Err(malformed(MrzField::Surname, "is empty"));
    }
    Ok((surname, words(given)))
}

fn words(field: &str) -> String {
    field.split('<').filter(|w| !w.is_empty()).collect::<Vec<_>>().join(" ")
}

fn trim_filler(value: &str) -> &str {
    value.trim_end_matches('<')
}

fn first_char(value: &str) -> Option<char> {
    value.chars().next()
}

fn verify(data: &str, check: &str) -> bool {
    first_char(check).is_some_and(|c| check_digit::verify(data, c))
}

/// First eight characters, a hyphen, then the rest.
fn record_number(personal: &str) -> Option<String> {
    match personal.len() {
        0 => None,
        1..=8 => Some(personal.to_string()),
        _ => Some(format!("{}-{}", &personal[..8], &personal[8..])),
    }
}

fn malformed(field: MrzField, detail: &str) -> ScanwerkError {
    ScanwerkError::MalformedMrz {
        field,
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanwerk_core::Locale;

    const SPECIMEN: &str = concat!(
        "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<",
        "L898902C36UTO7408122F1204159ZE184226B<<<<<10",
    );

    /// Line 1 of the Ukrainian sample, repaired to 44 characters.
    const UKR_SAMPLE: &str = concat!(
        "P<UKRDOE<<JOHN<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<",
        "1234567890UKR9001017M3001012<<<<<<<<<<<<<<02",
    );

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn with_line2(line2: &str) -> String {
        format!("{}{}", &SPECIMEN[..44], line2)
    }

    fn field_error(text: &str) -> MrzField {
        match MrzParser::default().parse_str(text) {
            Err(ScanwerkError::MalformedMrz { field, .. }) => field,
            other => panic!("expected MalformedMrz, got {other:?}"),
        }
    }

    #[test]
    fn parses_icao_specimen() {
        let record = MrzParser::default().parse_str(SPECIMEN).unwrap();
        assert_eq!(record.document_code, "P");
        assert_eq!(record.issuing_country, "UTO");
        assert_eq!(record.surname, "ERIKSSON");
        assert_eq!(record.given_names, "ANNA MARIA");
        assert_eq!(record.passport_number, "L898902C3");
        assert_eq!(record.nationality, "UTO");
        assert_eq!(record.birth_date, date(1974, 8, 12));
        assert_eq!(record.sex, Sex::Female);
        assert_eq!(record.expiry_date, date(2012, 4, 15));
        assert_eq!(record.personal_number, "ZE184226B");
        assert_eq!(record.record_number.as_deref(), Some("ZE184226-B"));
        assert_eq!(record.issue_date_estimated, date(2002, 4, 15));
        assert!(record.check_digits.all_valid());
    }

    #[test]
    fn parses_ukrainian_sample_and_reports_bad_checks() {
        let record = MrzParser::default().parse_str(UKR_SAMPLE).unwrap();
        assert_eq!(record.issuing_country, "UKR");
        assert_eq!(record.surname, "DOE");
        assert_eq!(record.given_names, "JOHN");
        assert_eq!(record.passport_number, "123456789");
        assert_eq!(record.sex, Sex::Male);
        assert_eq!(record.birth_date, date(1990, 1, 1));
        assert_eq!(record.expiry_date, date(2030, 1, 1));
        assert_eq!(record.record_number, None);

        assert!(!record.check_digits.passport_number);
        assert!(!record.check_digits.birth_date);
        assert!(!record.check_digits.expiry_date);
        assert!(record.check_digits.personal_number);
        assert!(!record.check_digits.composite);
    }

    #[test]
    fn localises_in_turkish() {
        let parser = MrzParser::new(MrzConfig {
            locale: Locale::Turkish,
            ..MrzConfig::default()
        });
        let record = parser.parse_str(UKR_SAMPLE).unwrap();
        assert_eq!(record.localized.issuing_country, "UKRAYNA");
        assert_eq!(record.localized.birth_date, "01 OCAK 1990");
        assert_eq!(record.localized.expiry_date, "01 OCAK 2030");
        assert_eq!(record.localized.issue_date, "01 OCAK 2020");
        assert_eq!(record.localized.sex, "ADAM");
    }

    #[test]
    fn letter_in_birth_date_is_malformed() {
        let text = with_line2("L898902C36UTO74O8122F1204159ZE184226B<<<<<10");
        assert_eq!(field_error(&text), MrzField::BirthDate);
    }

    #[test]
    fn impossible_date_is_malformed() {
        let text = with_line2("L898902C36UTO7413122F1204159ZE184226B<<<<<10");
        assert_eq!(field_error(&text), MrzField::BirthDate);
    }

    #[test]
    fn invalid_sex_is_malformed() {
        let text = with_line2("L898902C36UTO7408122X1204159ZE184226B<<<<<10");
        assert_eq!(field_error(&text), MrzField::Sex);
    }

    #[test]
    fn blank_passport_number_is_malformed() {
        let text = with_line2("<<<<<<<<<0UTO7408122F1204159ZE184226B<<<<<10");
        assert_eq!(field_error(&text), MrzField::PassportNumber);
    }

    #[test]
    fn empty_surname_is_malformed() {
        let text = format!("P<UTO<<ANNA{}{}", "<".repeat(33), &SPECIMEN[44..]);
        assert_eq!(field_error(&text), MrzField::Surname);
    }

    #[test]
    fn digit_in_country_is_malformed() {
        let text = SPECIMEN.replacen("P<UTO", "P<U1O", 1);
        assert_eq!(field_error(&text), MrzField::IssuingCountry);
    }

    /// A birth year that would land after the expiry belongs to the
    /// previous century.
    #[test]
    fn birth_after_expiry_moves_back_a_century() {
        let text = with_line2("L898902C36UTO1508122F1204159ZE184226B<<<<<10");
        let record = MrzParser::default().parse_str(&text).unwrap();
        assert_eq!(record.birth_date, date(1915, 8, 12));
    }

    #[test]
    fn pivot_is_configurable() {
        let text = with_line2("L898902C36UTO6001012F7001019ZE184226B<<<<<10");

        let default = MrzParser::default().parse_str(&text).unwrap();
        assert_eq!(default.expiry_date, date(1970, 1, 1));
        assert_eq!(default.birth_date, date(1960, 1, 1));

        let late_pivot = MrzParser::new(MrzConfig {
            century_pivot: 75,
            ..MrzConfig::default()
        });
        let record = late_pivot.parse_str(&text).unwrap();
        assert_eq!(record.expiry_date, date(2070, 1, 1));
        assert_eq!(record.birth_date, date(2060, 1, 1));
    }

    #[test]
    fn leap_day_issue_date_clamps() {
        let text = with_line2("L898902C36UTO7408122F2402299ZE184226B<<<<<10");
        let record = MrzParser::new(MrzConfig {
            validity_years: 5,
            ..MrzConfig::default()
        })
        .parse_str(&text)
        .unwrap();
        assert_eq!(record.expiry_date, date(2024, 2, 29));
        assert_eq!(record.issue_date_estimated, date(2019, 2, 28));
    }

    #[test]
    fn record_number_splits_after_eight() {
        assert_eq!(record_number("1990010112345").as_deref(), Some("19900101-12345"));
        assert_eq!(record_number("ABC").as_deref(), Some("ABC"));
        assert_eq!(record_number(""), None);
    }
}
