//! The step-machine contract shared by every engine.
//!
//! An engine turns an exercise into a [`StepPlan`]: the full, ordered list of
//! sub-steps plus the final answer. [`StepPlan::result_at`] then answers the
//! caller's question "what is step `n`?" without any stored state, so the
//! same `(exercise, step_index)` pair always yields the same [`StepResult`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Cycle;
use crate::exercise::Topic;
use crate::number::Fraction;

// ============================================================================
// StepStatus
// ============================================================================

/// Status of a step result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// The engine is asking the student for an answer.
    Ask,
    /// The exercise is finished; `expected_answer` holds the final answer.
    Done,
    /// The exercise could not be processed.
    Error,
}

impl StepStatus {
    /// Returns `true` if the caller should stop asking.
    ///
    /// # Examples
    ///
    /// ```
    /// use abacus_core::StepStatus;
    ///
    /// assert!(StepStatus::Done.is_terminal());
    /// assert!(StepStatus::Error.is_terminal());
    /// assert!(!StepStatus::Ask.is_terminal());
    /// ```
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ask => write!(f, "ask"),
            Self::Done => write!(f, "done"),
            Self::Error => write!(f, "error"),
        }
    }
}

// ============================================================================
// AnswerKind
// ============================================================================

/// How a student answer must be compared against the expected answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// Whole number, exact match after trimming.
    Integer,
    /// Decimal number, compared within the configured tolerance.
    Decimal,
    /// Fraction or whole number, compared as reduced rational values.
    Fraction,
    /// Like [`AnswerKind::Fraction`], but the answer must be in lowest terms.
    ReducedFraction,
    /// `yes` or `no`.
    YesNo,
    /// Two whole numbers in order, such as `3 and 2`.
    Pair,
    /// Free text, exact match after trimming and case-folding.
    Text,
}

// ============================================================================
// HintKind
// ============================================================================

/// Identifies the kind of sub-step, and with it the hint generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintKind {
    /// Single-digit addition collapsed into one step.
    AddSimple,
    /// One addition column.
    AddColumn,
    /// The carry left over after the last addition column.
    AddCarry,
    /// Addition finished.
    AddResult,
    /// Single-digit subtraction collapsed into one step.
    SubSimple,
    /// One subtraction column without borrowing.
    SubColumn,
    /// One subtraction column that borrows from the next column.
    SubBorrow,
    /// Subtraction finished.
    SubResult,
    /// One digit of a partial product row.
    MulPartial,
    /// Summing the shifted partial product rows.
    MulSum,
    /// Multiplication finished.
    MulResult,
    /// Do the fractions share a denominator?
    FracSameDenominator,
    /// Least common multiple of the denominators.
    FracLcm,
    /// Numerators scaled to the common denominator.
    FracEquivalent,
    /// Combined, unsimplified fraction.
    FracCombine,
    /// Simplified fraction.
    FracSimplify,
    /// Fraction exercise finished.
    FracResult,
    /// First group of dividend digits.
    DivGroup,
    /// One quotient digit.
    DivQuotientDigit,
    /// Remainder after subtracting `digit × divisor`.
    DivSubtract,
    /// Bring down the next dividend digit.
    DivBringDown,
    /// Division finished.
    DivResult,
    /// Decimal addition.
    DecAdd,
    /// Decimal subtraction.
    DecSubtract,
    /// Write both factors without the decimal point.
    DecConvert,
    /// Multiply the factors as whole numbers.
    DecMultiply,
    /// Put the decimal point back into the product.
    DecPlacePoint,
    /// Count the decimal places of the divisor.
    DecDivisorPlaces,
    /// Compute the decimal quotient.
    DecDivide,
    /// Decimal exercise finished.
    DecResult,
    /// Write the percentage as a fraction over 100.
    PercFraction,
    /// Multiply the base by the percentage.
    PercMultiply,
    /// Divide the product by 100.
    PercDivide,
    /// Percentage exercise finished.
    PercResult,
    /// The exercise was not recognized.
    Unrecognized,
}

impl HintKind {
    /// Returns `true` for the kinds that close an exercise.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::AddResult
                | Self::SubResult
                | Self::MulResult
                | Self::FracResult
                | Self::DivResult
                | Self::DecResult
                | Self::PercResult
                | Self::Unrecognized
        )
    }

    /// The wire name, e.g. `add_column`.
    #[must_use]
    pub fn as_str(&self) -> String {
        serde_json::to_value(self)
            .ok()
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_default()
    }
}

impl fmt::Display for HintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Focus
// ============================================================================

/// One column of an addition or subtraction.
///
/// For subtraction `carry_in`/`carry_out` hold the borrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column index, `0` = units.
    pub place_index: usize,
    /// Digit of the first operand.
    pub digit_a: u8,
    /// Digit of the second operand (`0` past its last digit).
    pub digit_b: u8,
    /// Carry (or borrow) coming from the previous column.
    pub carry_in: u8,
    /// Digit written in this column.
    pub result_digit: u8,
    /// Carry (or borrow) passed to the next column.
    pub carry_out: u8,
    /// Human name of the column, e.g. `tens`.
    pub place_name: String,
}

/// One single-digit multiplication inside a partial product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCell {
    /// Row index, equal to the multiplier digit's place (`0` = units).
    pub row: usize,
    /// Position of the multiplicand digit, `0` = units.
    pub place_index: usize,
    /// The multiplicand digit.
    pub multiplicand_digit: u8,
    /// The multiplier digit of this row.
    pub multiplier_digit: u8,
    /// Carry from the previous cell of the row.
    pub carry_in: u64,
    /// `multiplicand_digit × multiplier_digit + carry_in`.
    pub product: u64,
    /// `product mod 10`.
    pub write_digit: u8,
    /// `product div 10`.
    pub carry_out: u64,
    /// Whether this is the row's last cell, which writes the full product.
    pub is_last_in_row: bool,
}

/// Every quantity the fraction pipeline derives from the two fractions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FractionWork {
    /// First fraction as written.
    pub first: Fraction,
    /// Second fraction as written.
    pub second: Fraction,
    /// `'+'` or `'-'`.
    pub operator: char,
    /// Least common multiple of the denominators.
    pub lcm: i64,
    /// `lcm / first.denominator`.
    pub first_factor: i64,
    /// `lcm / second.denominator`.
    pub second_factor: i64,
    /// First numerator scaled to `lcm`.
    pub first_scaled: i64,
    /// Second numerator scaled to `lcm`.
    pub second_scaled: i64,
    /// The combined numerator over `lcm`.
    pub combined: i64,
    /// GCD of `|combined|` and `lcm`.
    pub gcd: i64,
    /// The reduced result.
    pub simplified: Fraction,
}

/// One stage of a long division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionWork {
    /// The current group being divided.
    pub group: u64,
    /// The divisor.
    pub divisor: u64,
    /// `group div divisor`.
    pub quotient_digit: u64,
    /// `group - quotient_digit × divisor`.
    pub remainder: u64,
    /// The dividend digit brought down next, if any.
    pub next_digit: Option<u8>,
}

/// Typed numeric context of a sub-step, consumed by the hint generators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Focus {
    /// No extra context.
    #[default]
    None,
    /// An addition or subtraction column.
    Column(Column),
    /// The final addition carry.
    Carry {
        /// The carry value.
        carry: u8,
        /// Name of the new leading column.
        place_name: String,
    },
    /// A multiplication cell.
    Product(ProductCell),
    /// The partial product rows to sum.
    Rows {
        /// Rows already shifted by their place value.
        rows: Vec<u64>,
        /// Their sum.
        total: u64,
    },
    /// A fraction pipeline stage.
    Fraction(FractionWork),
    /// A long-division stage.
    Division(DivisionWork),
    /// A decimal operation, rendered as text operands.
    Decimal {
        /// First operand as written.
        left: String,
        /// Second operand as written.
        right: String,
        /// Operator symbol.
        operator: char,
        /// Decimal places of the first operand.
        left_places: u32,
        /// Decimal places of the second operand.
        right_places: u32,
    },
    /// A whole single-step operation such as `7 + 2`.
    Operation {
        /// First operand.
        left: u64,
        /// Second operand.
        right: u64,
        /// Operator symbol.
        operator: char,
    },
}

impl Focus {
    /// Returns `true` for [`Focus::None`].
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

// ============================================================================
// StepPlan
// ============================================================================

/// One planned `ask` step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    /// Sub-step kind.
    pub kind: HintKind,
    /// Expected answer, rendered as the student should write it.
    pub expected: String,
    /// Comparison rule for the answer.
    pub answer_kind: AnswerKind,
    /// Plain-text question shown to the student.
    pub prompt: String,
    /// Numeric context for hints.
    pub focus: Focus,
}

impl PlannedStep {
    /// Creates a planned step with no focus.
    #[must_use]
    pub fn new(
        kind: HintKind,
        expected: impl Into<String>,
        answer_kind: AnswerKind,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            expected: expected.into(),
            answer_kind,
            prompt: prompt.into(),
            focus: Focus::None,
        }
    }

    /// Attaches the hint context.
    #[must_use]
    pub fn with_focus(mut self, focus: Focus) -> Self {
        self.focus = focus;
        self
    }
}

/// The complete step sequence of one exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPlan {
    /// Topic of the exercise.
    pub topic: Topic,
    /// The `ask` steps, in order.
    pub steps: Vec<PlannedStep>,
    /// Kind reported by the terminal `done` result.
    pub final_kind: HintKind,
    /// The final answer.
    pub final_answer: String,
    /// Comparison rule for the final answer.
    pub final_answer_kind: AnswerKind,
    /// Closing message for the `done` result.
    pub summary: String,
    /// Whether the operands were swapped to keep the difference non-negative.
    pub operands_swapped: bool,
}

impl StepPlan {
    /// Creates a plan.
    #[must_use]
    pub fn new(
        topic: Topic,
        steps: Vec<PlannedStep>,
        final_kind: HintKind,
        final_answer: impl Into<String>,
        final_answer_kind: AnswerKind,
    ) -> Self {
        let final_answer = final_answer.into();
        Self {
            topic,
            summary: format!("Well done! The answer is {final_answer}."),
            steps,
            final_kind,
            final_answer,
            final_answer_kind,
            operands_swapped: false,
        }
    }

    /// Marks the plan as built from swapped operands.
    #[must_use]
    pub const fn swapped(mut self, swapped: bool) -> Self {
        self.operands_swapped = swapped;
        self
    }

    /// Number of `ask` steps before the terminal result.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Expected answers of every `ask` step, in order.
    #[must_use]
    pub fn expected_answers(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.expected.as_str()).collect()
    }

    /// One line per step (index, status, kind, expected answer), ending
    /// with the terminal result.
    #[must_use]
    pub fn transcript(&self) -> String {
        (0..=self.step_count())
            .map(|index| {
                let result = self.result_at(index, Cycle::default());
                format!(
                    "{index} {} {} {}",
                    result.status,
                    result.hint_kind,
                    result.expected_answer.unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders the result for `step_index`.
    ///
    /// Indices at or past [`step_count`](Self::step_count) yield the terminal
    /// `done` result.
    #[must_use]
    pub fn result_at(&self, step_index: usize, cycle: Cycle) -> StepResult {
        let step_count = self.step_count();
        match self.steps.get(step_index) {
            Some(step) => {
                let mut message = step.prompt.clone();
                if step_index == 0 && self.operands_swapped {
                    message = format!(
                        "We put the larger number on top so the difference is not negative. {message}"
                    );
                }
                StepResult {
                    status: StepStatus::Ask,
                    expected_answer: Some(step.expected.clone()),
                    next_step: step_index + 1,
                    step_index,
                    step_count,
                    hint_kind: step.kind,
                    answer_kind: Some(step.answer_kind),
                    topic: Some(self.topic),
                    message,
                    hint: None,
                    focus: step.focus.clone(),
                    operands_swapped: self.operands_swapped,
                    cycle,
                }
            }
            None => StepResult {
                status: StepStatus::Done,
                expected_answer: Some(self.final_answer.clone()),
                next_step: step_index,
                step_index,
                step_count,
                hint_kind: self.final_kind,
                answer_kind: Some(self.final_answer_kind),
                topic: Some(self.topic),
                message: self.summary.clone(),
                hint: None,
                focus: Focus::None,
                operands_swapped: self.operands_swapped,
                cycle,
            },
        }
    }
}

// ============================================================================
// StepRequest / StepResult
// ============================================================================

/// The caller-owned state threaded through each step call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRequest {
    /// Current step pointer.
    pub step_index: usize,
    /// Consecutive wrong answers on the current step.
    pub error_count: u32,
    /// The student's most recent free-text answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_answer: Option<String>,
}

impl StepRequest {
    /// Request for `step_index` with no errors.
    #[must_use]
    pub const fn at(step_index: usize) -> Self {
        Self {
            step_index,
            error_count: 0,
            last_answer: None,
        }
    }

    /// Sets the error counter.
    #[must_use]
    pub const fn with_errors(mut self, error_count: u32) -> Self {
        self.error_count = error_count;
        self
    }

    /// Sets the last answer.
    #[must_use]
    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.last_answer = Some(answer.into());
        self
    }
}

/// The engine's answer to one step call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// `ask`, `done` or `error`.
    pub status: StepStatus,
    /// Answer the caller should expect, `None` on error.
    pub expected_answer: Option<String>,
    /// Step pointer to use after a correct answer.
    pub next_step: usize,
    /// The step this result describes.
    pub step_index: usize,
    /// Number of `ask` steps in the exercise.
    pub step_count: usize,
    /// Kind of sub-step.
    pub hint_kind: HintKind,
    /// Comparison rule for the expected answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_kind: Option<AnswerKind>,
    /// Topic of the exercise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<Topic>,
    /// Plain-text prompt or closing message.
    pub message: String,
    /// Hint text, present after mistakes or a help request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Numeric context of the step.
    #[serde(default, skip_serializing_if = "Focus::is_none")]
    pub focus: Focus,
    /// Whether the subtraction operands were swapped.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub operands_swapped: bool,
    /// Educational cycle tag echoed from the request.
    #[serde(default)]
    pub cycle: Cycle,
}

impl StepResult {
    /// An `error` result that leaves the step pointer where it is.
    #[must_use]
    pub fn error(step_index: usize, message: impl Into<String>, cycle: Cycle) -> Self {
        Self {
            status: StepStatus::Error,
            expected_answer: None,
            next_step: step_index,
            step_index,
            step_count: 0,
            hint_kind: HintKind::Unrecognized,
            answer_kind: None,
            topic: None,
            message: message.into(),
            hint: None,
            focus: Focus::None,
            operands_swapped: false,
            cycle,
        }
    }

    /// Serializes the result as pretty JSON.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
