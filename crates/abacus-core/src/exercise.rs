//! The exercise model produced by the classifier.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::number::{Decimal, Fraction};

/// The arithmetic operation of an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// `a + b`
    Addition,
    /// `a - b`
    Subtraction,
    /// `a × b`
    Multiplication,
    /// `a ÷ b`
    Division,
    /// `p% of b`
    Percentage,
}

impl Operation {
    /// Maps an operator character (any accepted alias) to an operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use abacus_core::Operation;
    ///
    /// assert_eq!(Operation::from_symbol('×'), Some(Operation::Multiplication));
    /// assert_eq!(Operation::from_symbol(':'), Some(Operation::Division));
    /// assert_eq!(Operation::from_symbol('?'), None);
    /// ```
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Self::Addition),
            '-' | '−' | '–' | '—' => Some(Self::Subtraction),
            '*' | 'x' | 'X' | '×' | '·' => Some(Self::Multiplication),
            '/' | ':' | '÷' => Some(Self::Division),
            '%' => Some(Self::Percentage),
            _ => None,
        }
    }

    /// The canonical symbol used when rendering prompts.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Addition => '+',
            Self::Subtraction => '-',
            Self::Multiplication => '×',
            Self::Division => '÷',
            Self::Percentage => '%',
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Addition => write!(f, "addition"),
            Self::Subtraction => write!(f, "subtraction"),
            Self::Multiplication => write!(f, "multiplication"),
            Self::Division => write!(f, "division"),
            Self::Percentage => write!(f, "percentage"),
        }
    }
}

/// The two operands of an exercise, all from the same number domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "domain", content = "values", rename_all = "snake_case")]
pub enum Operands {
    /// Two non-negative integers.
    Integers(u64, u64),
    /// Two decimals; at least one was written with a decimal point.
    Decimals(Decimal, Decimal),
    /// Two fractions.
    Fractions(Fraction, Fraction),
}

/// The subject area a step belongs to, used to pick hint generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Column addition.
    Addition,
    /// Column subtraction with borrowing.
    Subtraction,
    /// Long multiplication.
    Multiplication,
    /// Long division.
    Division,
    /// Fraction addition and subtraction.
    Fractions,
    /// Decimal operations.
    Decimals,
    /// A percentage of a whole number.
    Percentages,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Addition => "addition",
            Self::Subtraction => "subtraction",
            Self::Multiplication => "multiplication",
            Self::Division => "division",
            Self::Fractions => "fractions",
            Self::Decimals => "decimals",
            Self::Percentages => "percentages",
        };
        write!(f, "{name}")
    }
}

/// A classified exercise: one operation applied to two operands.
///
/// Exercises are immutable and cheap to rebuild; callers classify the raw
/// text again on every step instead of keeping a partially solved value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// The exercise text as given by the caller, trimmed.
    pub text: String,
    /// The operation to perform.
    pub operation: Operation,
    /// The operands.
    pub operands: Operands,
    /// Name of the classifier rule that matched.
    pub rule: String,
}

impl Exercise {
    /// Creates an exercise.
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        operation: Operation,
        operands: Operands,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            operation,
            operands,
            rule: rule.into(),
        }
    }

    /// The topic that drives engine and hint selection.
    #[must_use]
    pub const fn topic(&self) -> Topic {
        match (self.operands, self.operation) {
            (Operands::Fractions(..), _) => Topic::Fractions,
            (Operands::Decimals(..), _) => Topic::Decimals,
            (Operands::Integers(..), Operation::Addition) => Topic::Addition,
            (Operands::Integers(..), Operation::Subtraction) => Topic::Subtraction,
            (Operands::Integers(..), Operation::Multiplication) => Topic::Multiplication,
            (Operands::Integers(..), Operation::Division) => Topic::Division,
            (Operands::Integers(..), Operation::Percentage) => Topic::Percentages,
        }
    }

    /// Renders the exercise in canonical form, e.g. `47 + 28`.
    #[must_use]
    pub fn canonical(&self) -> String {
        let symbol = self.operation.symbol();
        match self.operands {
            Operands::Integers(percent, base) if self.operation == Operation::Percentage => {
                format!("{percent}% of {base}")
            }
            Operands::Integers(a, b) => format!("{a} {symbol} {b}"),
            Operands::Decimals(a, b) => format!("{a} {symbol} {b}"),
            Operands::Fractions(a, b) => format!("{a} {symbol} {b}"),
        }
    }
}
