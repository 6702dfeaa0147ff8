//! Exercise classifier.
//!
//! Raw exercise text is matched against an ordered table of rules, most
//! specific first. The first rule whose pattern matches decides the
//! operation and operand domain; later rules are never consulted. Decimal
//! rules come before every integer rule, so `2.5 * 3` can never be read as
//! the integer product `5 * 3`.
//!
//! Every pattern is anchored to the whole exercise. An exercise embedded in
//! a sentence such as `What is 47 + 28?` is first cut down to the span from
//! its first digit to its last; the words around that span must not hold an
//! operator or a sign. Chains like `12 + 3 + 4` and signed operands like
//! `-3 + 5` are therefore not recognized.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::{Result, TutorError};
use crate::exercise::{Exercise, Operands, Operation};
use crate::number::{Decimal, Fraction};

/// Builds an exercise from the captures of a matching rule.
type Builder = fn(&str, &'static str, &Captures<'_>) -> Result<Exercise>;

/// One row of the classifier table.
struct Rule {
    name: &'static str,
    pattern: Regex,
    build: Builder,
}

/// The rule table in priority order.
const RULE_TABLE: [(&str, &str, Builder); 9] = [
    (
        "fraction",
        r"^\s*([0-9]+)\s*/\s*([0-9]+)\s*([+\-])\s*([0-9]+)\s*/\s*([0-9]+)\s*$",
        build_fraction,
    ),
    (
        "decimal_both",
        r"^\s*([0-9]+\.[0-9]+)\s*([+\-*xX×·/:÷])\s*([0-9]+\.[0-9]+)\s*$",
        build_decimal,
    ),
    (
        "decimal_left",
        r"^\s*([0-9]+\.[0-9]+)\s*([+\-*xX×·/:÷])\s*([0-9]+)\s*$",
        build_decimal,
    ),
    (
        "decimal_right",
        r"^\s*([0-9]+)\s*([+\-*xX×·/:÷])\s*([0-9]+\.[0-9]+)\s*$",
        build_decimal,
    ),
    (
        "percentage",
        r"^\s*([0-9]+)\s*%\s*(?:(?i:de|of)\s*)?([0-9]+)\s*$",
        build_percentage,
    ),
    (
        "integer_division",
        r"^\s*([0-9]+)\s*([/:÷])\s*([0-9]+)\s*$",
        build_integer,
    ),
    (
        "integer_multiplication",
        r"^\s*([0-9]+)\s*([*xX×·])\s*([0-9]+)\s*$",
        build_integer,
    ),
    (
        "integer_addition",
        r"^\s*([0-9]+)\s*(\+)\s*([0-9]+)\s*$",
        build_integer,
    ),
    (
        "integer_subtraction",
        r"^\s*([0-9]+)\s*(-)\s*([0-9]+)\s*$",
        build_integer,
    ),
];

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    RULE_TABLE
        .iter()
        .filter_map(|&(name, pattern, build)| {
            let Ok(pattern) = Regex::new(pattern) else {
                tracing::error!(rule = name, "classifier pattern failed to compile");
                return None;
            };
            Some(Rule {
                name,
                pattern,
                build,
            })
        })
        .collect()
});

/// `20 por ciento de 50` and `20 percent of 50` read as `20% ...`.
static PERCENT_WORDS: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)\s*\b(?:por\s+ciento|per\s?cent)\b").ok());

/// Operators and signs that may not appear in the words before an exercise.
const LEADING_SIGNS: &[char] = &['+', '-', '*', '×', '·', '/', '÷', '%', '='];

/// Operators and signs that may not appear in the words after an exercise.
const TRAILING_SIGNS: &[char] = &['+', '-', '*', '×', '·', '/', '÷', '%', ':'];

/// Classifies raw exercise text.
///
/// # Errors
///
/// Returns `TutorError::NotRecognized` when no rule matches the whole
/// exercise and `TutorError::DegenerateInput` when the exercise matches but
/// is undefined (zero denominator, zero divisor, numbers out of range).
///
/// # Examples
///
/// ```
/// use abacus_core::{classify, Operation, Operands};
///
/// let exercise = classify("What is 47 + 28?").unwrap();
/// assert_eq!(exercise.operation, Operation::Addition);
/// assert_eq!(exercise.operands, Operands::Integers(47, 28));
///
/// assert!(classify("12 + 3 + 4").is_err());
/// ```
pub fn classify(text: &str) -> Result<Exercise> {
    let trimmed = text.trim();
    let normalized = normalize(trimmed);

    if let Some(core) = sentence_core(&normalized) {
        for rule in RULES.iter() {
            if let Some(captures) = rule.pattern.captures(core) {
                tracing::debug!(rule = rule.name, text = trimmed, "exercise classified");
                return (rule.build)(trimmed, rule.name, &captures);
            }
        }
    }

    tracing::debug!(text = trimmed, "no classifier rule matched");
    Err(TutorError::not_recognized(trimmed))
}

/// Names of the classifier rules in the order they are tried.
pub fn rule_names() -> Vec<&'static str> {
    RULES.iter().map(|rule| rule.name).collect()
}

/// Folds dash variants to `-`, decimal commas to `.` and percent words to `%`.
fn normalize(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let folded: String = chars
        .iter()
        .enumerate()
        .map(|(i, &c)| match c {
            '−' | '–' | '—' => '-',
            ',' if is_digit_at(&chars, i.checked_sub(1)) && is_digit_at(&chars, Some(i + 1)) => {
                '.'
            }
            _ => c,
        })
        .collect();
    match PERCENT_WORDS.as_ref() {
        Some(words) => words.replace_all(&folded, "%").into_owned(),
        None => folded,
    }
}

/// The span from the first digit to the last one.
///
/// Returns `None` when there is no digit, when the leading words run into
/// the first number without a space, or when the words around the span
/// hold an operator or a sign.
fn sentence_core(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let end = text.rfind(|c: char| c.is_ascii_digit())? + 1;
    let (prefix, suffix) = (&text[..start], &text[end..]);

    if !prefix.is_empty()
        && (!prefix.ends_with(char::is_whitespace) || prefix.contains(LEADING_SIGNS))
    {
        return None;
    }
    if suffix.contains(TRAILING_SIGNS) {
        return None;
    }
    Some(&text[start..end])
}

fn is_digit_at(chars: &[char], index: Option<usize>) -> bool {
    index
        .and_then(|i| chars.get(i))
        .is_some_and(char::is_ascii_digit)
}

fn capture<'t>(captures: &Captures<'t>, index: usize) -> &'t str {
    captures.get(index).map_or("", |m| m.as_str())
}

fn operation_at(text: &str, captures: &Captures<'_>, index: usize) -> Result<Operation> {
    capture(captures, index)
        .chars()
        .next()
        .and_then(Operation::from_symbol)
        .ok_or_else(|| TutorError::not_recognized(text))
}

fn build_fraction(text: &str, rule: &'static str, captures: &Captures<'_>) -> Result<Exercise> {
    let part = |index: usize| -> Result<i64> {
        capture(captures, index)
            .parse()
            .map_err(|_| TutorError::too_large(text))
    };
    let zero_denominator = || {
        TutorError::degenerate(
            text,
            "a fraction has a zero denominator",
            "The number under the fraction bar must not be 0",
        )
    };

    let first = Fraction::new(part(1)?, part(2)?).ok_or_else(zero_denominator)?;
    let second = Fraction::new(part(4)?, part(5)?).ok_or_else(zero_denominator)?;
    let operation = operation_at(text, captures, 3)?;

    Ok(Exercise::new(
        text,
        operation,
        Operands::Fractions(first, second),
        rule,
    ))
}

fn build_decimal(text: &str, rule: &'static str, captures: &Captures<'_>) -> Result<Exercise> {
    let left = Decimal::parse(capture(captures, 1)).ok_or_else(|| TutorError::too_large(text))?;
    let right = Decimal::parse(capture(captures, 3)).ok_or_else(|| TutorError::too_large(text))?;
    let operation = operation_at(text, captures, 2)?;

    if operation == Operation::Division && right.is_zero() {
        return Err(division_by_zero(text));
    }

    Ok(Exercise::new(
        text,
        operation,
        Operands::Decimals(left, right),
        rule,
    ))
}

fn build_integer(text: &str, rule: &'static str, captures: &Captures<'_>) -> Result<Exercise> {
    let operand = |index: usize| -> Result<u64> {
        capture(captures, index)
            .parse()
            .map_err(|_| TutorError::too_large(text))
    };
    let left = operand(1)?;
    let right = operand(3)?;
    let operation = operation_at(text, captures, 2)?;

    if operation == Operation::Division && right == 0 {
        return Err(division_by_zero(text));
    }

    Ok(Exercise::new(
        text,
        operation,
        Operands::Integers(left, right),
        rule,
    ))
}

fn build_percentage(text: &str, rule: &'static str, captures: &Captures<'_>) -> Result<Exercise> {
    let operand = |index: usize| -> Result<u64> {
        capture(captures, index)
            .parse()
            .map_err(|_| TutorError::too_large(text))
    };
    Ok(Exercise::new(
        text,
        Operation::Percentage,
        Operands::Integers(operand(1)?, operand(2)?),
        rule,
    ))
}

fn division_by_zero(text: &str) -> TutorError {
    TutorError::degenerate(
        text,
        "the divisor is zero",
        "Nothing can be shared into 0 groups; pick a divisor greater than 0",
    )
}
