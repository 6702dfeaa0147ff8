//! Comparing student answers with expected answers.
//!
//! The comparison rule depends on the step's [`AnswerKind`]:
//!
//! - integer and text steps: exact match after trimming, case-folding and
//!   collapsing inner whitespace;
//! - decimal steps: numeric match within a tolerance (comma or point);
//! - fraction steps: equal rational values, so `2/4` matches `1/2`;
//! - reduced fraction steps: equal values and the answer in lowest terms;
//! - yes/no steps: `yes`, `y`, `sí`, `si` against `no`, `n`;
//! - pair steps: the same two integers in order, whatever separates them.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::number::{Decimal, Fraction};
use crate::step::AnswerKind;

static INTEGER: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"-?[0-9]+").ok());

/// Phrases that ask for a hint instead of answering.
const HELP_PHRASES: [&str; 9] = [
    "help",
    "hint",
    "i don't know",
    "i dont know",
    "idk",
    "no idea",
    "ayuda",
    "no sé",
    "no se",
];

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Returns `true` when the student asked for help rather than answering.
///
/// An empty answer, a help phrase, or an answer made only of `?` and `.`
/// counts as a request.
///
/// # Examples
///
/// ```
/// use abacus_core::answer::is_help_request;
///
/// assert!(is_help_request("I don't know"));
/// assert!(is_help_request("?"));
/// assert!(is_help_request("..."));
/// assert!(!is_help_request("42"));
/// ```
#[must_use]
pub fn is_help_request(answer: &str) -> bool {
    let text = normalize(answer);
    let text = text.trim_end_matches(['!', '?', '.']).trim();
    text.is_empty() || HELP_PHRASES.contains(&text)
}

fn yes_no(text: &str) -> Option<bool> {
    match normalize(text).trim_end_matches(['!', '.']) {
        "yes" | "y" | "sí" | "si" => Some(true),
        "no" | "n" => Some(false),
        _ => None,
    }
}

fn integers(text: &str) -> Vec<i64> {
    INTEGER.as_ref().map_or_else(Vec::new, |re| {
        re.find_iter(text)
            .filter_map(|m| m.as_str().parse().ok())
            .collect()
    })
}

/// Compares a student answer with the expected answer.
///
/// `tolerance` applies to [`AnswerKind::Decimal`] only.
#[must_use]
pub fn answers_match(kind: AnswerKind, expected: &str, given: &str, tolerance: f64) -> bool {
    match kind {
        AnswerKind::Integer | AnswerKind::Text => normalize(expected) == normalize(given),
        AnswerKind::Decimal => match (Decimal::parse(expected), Decimal::parse(given)) {
            (Some(expected), Some(given)) => {
                expected.same_value(&given)
                    || (expected.to_f64() - given.to_f64()).abs() <= tolerance + f64::EPSILON
            }
            _ => false,
        },
        AnswerKind::Fraction => match (Fraction::parse(expected), Fraction::parse(given)) {
            (Some(expected), Some(given)) => expected.same_value(&given),
            _ => false,
        },
        AnswerKind::ReducedFraction => match (Fraction::parse(expected), Fraction::parse(given)) {
            (Some(expected), Some(given)) => given.is_reduced() && expected.same_value(&given),
            _ => false,
        },
        AnswerKind::YesNo => match (yes_no(expected), yes_no(given)) {
            (Some(expected), Some(given)) => expected == given,
            _ => false,
        },
        AnswerKind::Pair => {
            let expected = integers(expected);
            expected.len() == 2 && expected == integers(given)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 0.01;

    fn check(kind: AnswerKind, expected: &str, given: &str) -> bool {
        answers_match(kind, expected, given, TOLERANCE)
    }

    #[test]
    fn test_integer_exact_after_trim() {
        assert!(check(AnswerKind::Integer, "5", " 5 "));
        assert!(!check(AnswerKind::Integer, "5", "6"));
        assert!(!check(AnswerKind::Integer, "15", "1 5"));
    }

    #[test]
    fn test_text_folds_case_and_spaces() {
        assert!(check(AnswerKind::Text, "3 r 2", "3  R 2"));
        assert!(!check(AnswerKind::Text, "3 r 2", "3"));
    }

    #[test]
    fn test_decimal_tolerance() {
        assert!(check(AnswerKind::Decimal, "7.5", "7.50"));
        assert!(check(AnswerKind::Decimal, "7.5", "7,5"));
        assert!(check(AnswerKind::Decimal, "3.333", "3.33"));
        assert!(check(AnswerKind::Decimal, "0.06", "0.065"));
        assert!(!check(AnswerKind::Decimal, "7.5", "7.6"));
        assert!(!check(AnswerKind::Decimal, "7.5", "seven"));
    }

    #[test]
    fn test_fraction_compares_values() {
        assert!(check(AnswerKind::Fraction, "5/4", "10/8"));
        assert!(check(AnswerKind::Fraction, "2", "4/2"));
        assert!(!check(AnswerKind::Fraction, "5/4", "4/5"));
    }

    #[test]
    fn test_reduced_fraction_requires_lowest_terms() {
        assert!(check(AnswerKind::ReducedFraction, "1/2", "1/2"));
        assert!(check(AnswerKind::ReducedFraction, "1/2", " 1 / 2 "));
        assert!(!check(AnswerKind::ReducedFraction, "1/2", "2/4"));
        assert!(check(AnswerKind::ReducedFraction, "2", "2"));
        assert!(check(AnswerKind::ReducedFraction, "2", "2/1"));
    }

    #[test]
    fn test_yes_no_variants() {
        for given in ["yes", "Y", "sí", "Si", "yes!"] {
            assert!(check(AnswerKind::YesNo, "yes", given), "{given}");
        }
        assert!(check(AnswerKind::YesNo, "no", "N"));
        assert!(!check(AnswerKind::YesNo, "no", "yes"));
        assert!(!check(AnswerKind::YesNo, "no", "maybe"));
    }

    #[test]
    fn test_pair_ignores_separator() {
        for given in ["3 and 2", "3, 2", "3 2", "3 y 2"] {
            assert!(check(AnswerKind::Pair, "3 and 2", given), "{given}");
        }
        assert!(check(AnswerKind::Pair, "25 3", "25 and 3"));
        assert!(!check(AnswerKind::Pair, "3 and 2", "2 and 3"));
        assert!(!check(AnswerKind::Pair, "3 and 2", "3"));
        assert!(!check(AnswerKind::Pair, "3 and 2", "3 2 1"));
    }

    #[test]
    fn test_help_requests() {
        for text in ["help", "Hint?", "  I don't know ", "?", "...", "", "idk!"] {
            assert!(is_help_request(text), "{text:?}");
        }
        for text in ["0", "yes", "3 and 2", "helpful"] {
            assert!(!is_help_request(text), "{text:?}");
        }
    }
}
