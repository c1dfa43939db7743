// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ICAO 9303 check digits.

const WEIGHTS: [u32; 3] = [7, 3, 1];

/// Numeric value of an MRZ character: digits as themselves, `A`..`Z` as
/// 10..35, filler (and anything else) as 0.
fn char_value(c: char) -> u32 {
    match c {
        '0'..='9' => c as u32 - '0' as u32,
        'A'..='Z' => c as u32 - 'A' as u32 + 10,
        _ => 0,
    }
}

/// Weighted (7-3-1) sum of `field` modulo 10.
pub fn check_digit(field: &str) -> u8 {
    let sum: u32 = field
        .chars()
        .zip(WEIGHTS.iter().cycle())
        .map(|(c, weight)| char_value(c) * weight)
        .sum();
    (sum % 10) as u8
}

/// Whether `check` is the correct check digit for `field`. A filler check
/// character counts as 0.
pub fn verify(field: &str, check: char) -> bool {
    let expected = match check {
        '<' => 0,
        '0'..='9' => check as u8 - b'0',
        _ => return false,
    };
    check_digit(field) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icao_specimen_digits() {
        assert_eq!(check_digit("L898902C3"), 6);
        assert_eq!(check_digit("740812"), 2);
        assert_eq!(check_digit("120415"), 9);
        assert_eq!(check_digit("ZE184226B<<<<<"), 1);
    }

    #[test]
    fn filler_check_means_zero() {
        assert!(verify("<<<<<<<<<<<<<<", '<'));
        assert!(verify("<<<<<<<<<<<<<<", '0'));
        assert!(!verify("740812", '<'));
    }

    #[test]
    fn letters_are_not_check_digits() {
        assert!(!verify("740812", 'A'));
    }
}
