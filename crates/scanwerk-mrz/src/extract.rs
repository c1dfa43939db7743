// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// MRZ extraction — finds a plausible TD3 zone in noisy recognised text.

use scanwerk_core::config::ConfusionTable;
use scanwerk_core::error::{Result, ScanwerkError};
use tracing::{debug, instrument, trace};

use crate::string::{LINE_LEN, MrzString, is_mrz_char};

/// Shortest first line that still holds `P<`, a country code, and a name.
const MIN_LINE1_LEN: usize = 6;

/// Pulls the machine-readable zone out of a page's recognised text.
///
/// OCR output is messy: whitespace lands anywhere, Cyrillic look-alikes
/// replace Latin letters on bilingual pages, and the run of `<` fillers at
/// the end of line 1 is routinely miscounted. The extractor normalises all
/// three before validating the result as an [`MrzString`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MrzExtractor {
    table: ConfusionTable,
}

impl MrzExtractor {
    pub fn new(table: ConfusionTable) -> Self {
        Self { table }
    }

    /// Find the first plausible MRZ in `text`.
    ///
    /// Returns [`ScanwerkError::MrzNotFound`] with the reason the most
    /// promising candidate was rejected when nothing plausible is found.
    #[instrument(skip_all, fields(text_len = text.len()))]
    pub fn extract(&self, text: &str) -> Result<MrzString> {
        let normalized: Vec<char> = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| self.substitute(c).to_ascii_uppercase())
            .collect();

        let mut best: Option<Rejection> = None;
        let starts = (0..normalized.len().saturating_sub(1))
            .filter(|&i| normalized[i] == 'P' && normalized[i + 1] == '<');

        for start in starts {
            match candidate_at(&normalized, start) {
                Ok(mrz) => {
                    debug!(start, "MRZ candidate accepted");
                    return Ok(mrz);
                }
                Err(rejection) => {
                    trace!(start, stage = rejection.stage, reason = %rejection.reason, "MRZ candidate rejected");
                    if best.as_ref().is_none_or(|b| rejection.stage > b.stage) {
                        best = Some(rejection);
                    }
                }
            }
        }

        let reason = best
            .map(|b| b.reason)
            .unwrap_or_else(|| "no `P<` marker in the recognised text".to_string());
        Err(ScanwerkError::MrzNotFound { reason })
    }

    fn substitute(&self, c: char) -> char {
        match self.table {
            ConfusionTable::Minimal => minimal_substitute(c),
            ConfusionTable::Extended => extended_substitute(c),
        }
    }
}

/// Why one `P<` occurrence was not usable, and how far it got.
struct Rejection {
    stage: u8,
    reason: String,
}

impl Rejection {
    fn new(stage: u8, reason: impl Into<String>) -> Self {
        Self {
            stage,
            reason: reason.into(),
        }
    }
}

/// Try to build an MRZ from the span starting at `start`.
///
/// The zone ends with the composite check digit right after the
/// personal-number check digit, so every digit pair in the run is a possible
/// end. Text recognised after the zone (page numbers, serials) can add later
/// pairs, so ends are tried from the right and the first one that yields a
/// repairable line 1 and a line 2 with the TD3 layout wins.
fn candidate_at(chars: &[char], start: usize) -> std::result::Result<MrzString, Rejection> {
    let end = chars[start..]
        .iter()
        .position(|&c| !is_mrz_char(c))
        .map_or(chars.len(), |offset| start + offset);
    let run = &chars[start..end];

    let mut best = Rejection::new(1, "zone does not end with two check digits");
    let cuts = (2..=run.len())
        .rev()
        .filter(|&cut| run[cut - 2].is_ascii_digit() && run[cut - 1].is_ascii_digit());
    for cut in cuts {
        match zone_from_span(&run[..cut]) {
            Ok(mrz) => return Ok(mrz),
            Err(rejection) => {
                if rejection.stage > best.stage {
                    best = rejection;
                }
            }
        }
    }
    Err(best)
}

/// Split `span` into a repaired line 1 and a 44-character line 2.
fn zone_from_span(span: &[char]) -> std::result::Result<MrzString, Rejection> {
    if span.len() < LINE_LEN + MIN_LINE1_LEN {
        return Err(Rejection::new(
            2,
            format!("zone is too short ({} characters)", span.len()),
        ));
    }

    let (line1, line2) = span.split_at(span.len() - LINE_LEN);
    let line1 = repair_filler(line1).ok_or_else(|| {
        Rejection::new(
            3,
            format!(
                "first line has {} characters beyond its {LINE_LEN} that are not filler",
                line1.len() - LINE_LEN
            ),
        )
    })?;
    if !has_td3_layout(line2) {
        return Err(Rejection::new(
            4,
            "second line does not have nationality, dates, and sex where expected",
        ));
    }

    let text: String = line1.into_iter().chain(line2.iter().copied()).collect();
    MrzString::new(text).map_err(|err| Rejection::new(5, err.to_string()))
}

/// Whether the fixed-format fields of line 2 hold the right character
/// classes. Check digits are not verified here; a bad check digit is
/// reported by the parser, not treated as a missing zone.
fn has_td3_layout(line2: &[char]) -> bool {
    let letters = |range: std::ops::Range<usize>| {
        line2[range].iter().all(|&c| c.is_ascii_uppercase() || c == '<')
    };
    let digits = |range: std::ops::Range<usize>| line2[range].iter().all(char::is_ascii_digit);
    line2.len() == LINE_LEN
        && letters(10..13)
        && digits(13..19)
        && matches!(line2[20], 'M' | 'F' | 'X' | '<')
        && digits(21..27)
}

/// Pad or trim trailing `<` so the line is exactly [`LINE_LEN`] long.
/// Returns `None` if trimming would remove anything but filler.
fn repair_filler(line: &[char]) -> Option<Vec<char>> {
    if line.len() <= LINE_LEN {
        let mut repaired = line.to_vec();
        repaired.resize(LINE_LEN, '<');
        return Some(repaired);
    }
    let (kept, excess) = line.split_at(LINE_LEN);
    excess.iter().all(|&c| c == '<').then(|| kept.to_vec())
}

// -- Confusion tables ----------------------------------------------------------

fn minimal_substitute(c: char) -> char {
    match c {
        'О' => 'O',
        'М' => 'M',
        other => other,
    }
}

/// Cyrillic letters that render like MRZ Latin letters, plus angle quotes
/// that OCR returns for `<`.
fn extended_substitute(c: char) -> char {
    match c {
        'А' | 'а' => 'A',
        'В' | 'в' => 'B',
        'С' | 'с' => 'C',
        'Е' | 'е' | 'Ё' | 'ё' => 'E',
        'Н' | 'н' => 'H',
        'І' | 'і' | 'Ӏ' => 'I',
        'Ј' | 'ј' => 'J',
        'К' | 'к' => 'K',
        'М' | 'м' => 'M',
        'О' | 'о' => 'O',
        'Р' | 'р' => 'P',
        'Ѕ' | 'ѕ' => 'S',
        'Т' | 'т' => 'T',
        'Х' | 'х' => 'X',
        'У' | 'у' | 'Ү' | 'ү' => 'Y',
        '«' | '‹' | '＜' => '<',
        other => other,
    }
}

// -- Issuing authority -----------------------------------------------------------

/// The first standalone four-digit group in `text`.
///
/// Ukrainian passports print the issuing authority as a four-digit code on
/// the data page. Digits that are part of a longer number or attached to
/// letters (as inside the MRZ) are skipped.
pub fn extract_authority(text: &str) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let run_end = chars[i..]
            .iter()
            .position(|c| !c.is_ascii_digit())
            .map_or(chars.len(), |offset| i + offset);
        let detached_before = i == 0 || !chars[i - 1].is_alphanumeric() && chars[i - 1] != '<';
        let detached_after =
            run_end == chars.len() || !chars[run_end].is_alphanumeric() && chars[run_end] != '<';
        if run_end - i == 4 && detached_before && detached_after {
            return Some(chars[i..run_end].iter().collect());
        }
        i = run_end;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// OCR output for a Ukrainian data page: the first MRZ line is two
    /// fillers short and the lines are split by a space.
    const UKR_TEXT: &str = "УКРАЇНА / UKRAINE Орган що видав/ Authority 4021 \
        P<UKRDOE<<JOHN<<<<<<<<<<<<<<<<<<<<<<<<<<<< 1234567890UKR9001017M3001012<<<<<<<<<<<<<<02";

    #[test]
    fn extracts_sample_and_repairs_first_line() {
        let mrz = MrzExtractor::default().extract(UKR_TEXT).unwrap();
        assert_eq!(mrz.as_str().len(), 88);
        let (line1, line2) = mrz.lines();
        assert_eq!(line1, format!("P<UKRDOE<<JOHN{}", "<".repeat(30)));
        assert_eq!(line2, "1234567890UKR9001017M3001012<<<<<<<<<<<<<<02");
    }

    #[test]
    fn trims_extra_trailing_filler() {
        let text = format!(
            "P<UTOERIKSSON<<ANNA<MARIA{} L898902C36UTO7408122F1204159ZE184226B<<<<<10",
            "<".repeat(23)
        );
        let mrz = MrzExtractor::default().extract(&text).unwrap();
        assert!(mrz.as_str().starts_with("P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<L898"));
    }

    #[test]
    fn maps_cyrillic_look_alikes() {
        // Cyrillic О and М in the surname, lower-case latin elsewhere.
        let text = "p<utoЕRIKSSОN<<АNNА<МАRIА<<<<<<<<<<<<<<<<<<<\n\
            L898902C36UTO7408122F1204159ZE184226B<<<<<10";
        let mrz = MrzExtractor::default().extract(text).unwrap();
        assert!(mrz.as_str().starts_with("P<UTOERIKSSON<<ANNA<MARIA"));
    }

    #[test]
    fn minimal_table_only_maps_o_and_m() {
        assert_eq!(minimal_substitute('О'), 'O');
        assert_eq!(minimal_substitute('М'), 'M');
        assert_eq!(minimal_substitute('А'), 'А');
        assert_eq!(extended_substitute('А'), 'A');
        assert_eq!(extended_substitute('«'), '<');
    }

    #[test]
    fn text_without_marker_is_not_found() {
        let err = MrzExtractor::default()
            .extract("INVOICE 2024 TOTAL 100")
            .unwrap_err();
        match err {
            ScanwerkError::MrzNotFound { reason } => assert!(reason.contains("P<")),
            other => panic!("expected MrzNotFound, got {other:?}"),
        }
    }

    #[test]
    fn truncated_zone_is_not_found() {
        let err = MrzExtractor::default()
            .extract("P<UKRDOE<<JOHN<<<<< 1234567890UKR90")
            .unwrap_err();
        match err {
            ScanwerkError::MrzNotFound { reason } => assert!(reason.contains("too short"), "{reason}"),
            other => panic!("expected MrzNotFound, got {other:?}"),
        }
    }

    /// Digits recognised below the zone do not shift where it is cut.
    #[test]
    fn ignores_digits_after_zone() {
        for trailer in ["\nPage 12", "\nNo. 4711 2024-05-17", "\n01\n"] {
            let text = format!("{UKR_TEXT}{trailer}");
            let mrz = MrzExtractor::default()
                .extract(&text)
                .unwrap_or_else(|err| panic!("{trailer:?}: {err}"));
            let (line1, line2) = mrz.lines();
            assert!(line1.starts_with("P<UKRDOE<<JOHN<"), "{trailer:?}");
            assert_eq!(line2, "1234567890UKR9001017M3001012<<<<<<<<<<<<<<02");
        }
    }

    /// A stray `P<` earlier in the text does not hide the real zone.
    #[test]
    fn skips_implausible_earlier_marker() {
        let text = format!("NOTE P<12 {UKR_TEXT}");
        let mrz = MrzExtractor::default().extract(&text).unwrap();
        assert!(mrz.as_str().starts_with("P<UKRDOE"));
    }

    #[test]
    fn excess_non_filler_is_rejected() {
        assert!(repair_filler(&['A'; 45]).is_none());
        let mut line = vec!['A'; 44];
        line.push('<');
        assert_eq!(repair_filler(&line).map(|l| l.len()), Some(44));
    }

    #[test]
    fn layout_check_rejects_shifted_second_line() {
        let line2: Vec<char> = "1234567890UKR9001017M3001012<<<<<<<<<<<<<<02".chars().collect();
        assert!(has_td3_layout(&line2));
        let shifted: Vec<char> = "34567890UKR9001017M3001012<<<<<<<<<<<<<<0201".chars().collect();
        assert!(!has_td3_layout(&shifted));
    }

    #[test]
    fn authority_is_first_standalone_group() {
        assert_eq!(extract_authority(UKR_TEXT).as_deref(), Some("4021"));
        assert_eq!(extract_authority("No. 123456 then 7788.").as_deref(), Some("7788"));
        assert_eq!(extract_authority("P<UKR1234<<"), None);
    }
}
