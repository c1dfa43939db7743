// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Static display tables for passport fields in English and Turkish.

use chrono::{Datelike, NaiveDate};
use scanwerk_core::Locale;

use crate::record::Sex;

/// (ICAO code, English name, Turkish name).
const COUNTRIES: &[(&str, &str, &str)] = &[
    ("AZE", "AZERBAIJAN", "AZERBAYCAN"),
    ("BLR", "BELARUS", "BELARUS"),
    ("BGR", "BULGARIA", "BULGARİSTAN"),
    ("D", "GERMANY", "ALMANYA"),
    ("DEU", "GERMANY", "ALMANYA"),
    ("ESP", "SPAIN", "İSPANYA"),
    ("FRA", "FRANCE", "FRANSA"),
    ("GBR", "UNITED KINGDOM", "BİRLEŞİK KRALLIK"),
    ("GEO", "GEORGIA", "GÜRCİSTAN"),
    ("GRC", "GREECE", "YUNANİSTAN"),
    ("ITA", "ITALY", "İTALYA"),
    ("KAZ", "KAZAKHSTAN", "KAZAKİSTAN"),
    ("MDA", "MOLDOVA", "MOLDOVA"),
    ("NLD", "NETHERLANDS", "HOLLANDA"),
    ("POL", "POLAND", "POLONYA"),
    ("ROU", "ROMANIA", "ROMANYA"),
    ("RUS", "RUSSIA", "RUSYA"),
    ("TUR", "TURKEY", "TÜRKİYE"),
    ("UKR", "UKRAINE", "UKRAYNA"),
    ("USA", "UNITED STATES OF AMERICA", "AMERİKA BİRLEŞİK DEVLETLERİ"),
    ("UTO", "UTOPIA", "ÜTOPYA"),
];

const MONTHS_EN: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

const MONTHS_TR: [&str; 12] = [
    "OCAK", "ŞUBAT", "MART", "NİSAN", "MAYIS", "HAZİRAN", "TEMMUZ", "AĞUSTOS", "EYLÜL", "EKİM",
    "KASIM", "ARALIK",
];

/// Display name for an ICAO country code; unknown codes come back unchanged.
pub fn country_name(code: &str, locale: Locale) -> String {
    COUNTRIES
        .iter()
        .find(|(known, _, _)| *known == code)
        .map(|(_, english, turkish)| match locale {
            Locale::English => *english,
            Locale::Turkish => *turkish,
        })
        .unwrap_or(code)
        .to_string()
}

/// Upper-case month name, `month` in 1..=12.
pub fn month_name(month: u32, locale: Locale) -> Option<&'static str> {
    let table = match locale {
        Locale::English => &MONTHS_EN,
        Locale::Turkish => &MONTHS_TR,
    };
    table.get(month.checked_sub(1)? as usize).copied()
}

/// `DD MON YYYY`, e.g. `01 JAN 1990` or `01 OCAK 1990`.
pub fn format_date(date: NaiveDate, locale: Locale) -> String {
    let month = month_name(date.month(), locale).unwrap_or("???");
    format!("{:02} {} {}", date.day(), month, date.year())
}

pub fn sex_label(sex: Sex, locale: Locale) -> &'static str {
    match (sex, locale) {
        (Sex::Male, Locale::English) => "MALE",
        (Sex::Female, Locale::English) => "FEMALE",
        (Sex::Unspecified, Locale::English) => "UNSPECIFIED",
        (Sex::Male, Locale::Turkish) => "ADAM",
        (Sex::Female, Locale::Turkish) => "KADIN",
        (Sex::Unspecified, Locale::Turkish) => "BELİRTİLMEMİŞ",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_countries_are_translated() {
        assert_eq!(country_name("UKR", Locale::Turkish), "UKRAYNA");
        assert_eq!(country_name("UKR", Locale::English), "UKRAINE");
        assert_eq!(country_name("TUR", Locale::Turkish), "TÜRKİYE");
    }

    #[test]
    fn unknown_country_passes_through() {
        assert_eq!(country_name("XYZ", Locale::Turkish), "XYZ");
    }

    #[test]
    fn dates_use_localised_months() {
        let date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        assert_eq!(format_date(date, Locale::English), "01 JAN 1990");
        assert_eq!(format_date(date, Locale::Turkish), "01 OCAK 1990");

        let august = NaiveDate::from_ymd_opt(2031, 8, 9).unwrap();
        assert_eq!(format_date(august, Locale::Turkish), "09 AĞUSTOS 2031");
    }

    #[test]
    fn month_out_of_range_is_none() {
        assert_eq!(month_name(0, Locale::English), None);
        assert_eq!(month_name(13, Locale::Turkish), None);
    }
}
