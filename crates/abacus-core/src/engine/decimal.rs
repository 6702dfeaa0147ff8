//! Decimal addition, subtraction, multiplication and division.

use std::cmp::Ordering;

use crate::error::{Result, TutorError};
use crate::exercise::{Operation, Topic};
use crate::number::{Decimal, DIVISION_PLACES};
use crate::step::{AnswerKind, Focus, HintKind, PlannedStep, StepPlan};

use super::StepEngine;

/// Works an exercise with at least one decimal operand.
///
/// Addition and subtraction are a single aligned-point step. Multiplication
/// removes the points, multiplies whole numbers and places the point back.
/// Division counts the divisor's decimal places and computes the quotient,
/// rounded to three places when it does not terminate.
#[derive(Debug, Clone, Copy)]
pub struct DecimalEngine<'a> {
    text: &'a str,
    operation: Operation,
    left: Decimal,
    right: Decimal,
    swap_when_negative: bool,
}

impl<'a> DecimalEngine<'a> {
    /// Creates the engine for `left op right`.
    #[must_use]
    pub const fn new(
        text: &'a str,
        operation: Operation,
        left: Decimal,
        right: Decimal,
        swap_when_negative: bool,
    ) -> Self {
        Self {
            text,
            operation,
            left,
            right,
            swap_when_negative,
        }
    }

    fn focus(&self, left: Decimal, right: Decimal) -> Focus {
        Focus::Decimal {
            left: left.to_string(),
            right: right.to_string(),
            operator: self.operation.symbol(),
            left_places: left.scale(),
            right_places: right.scale(),
        }
    }

    fn too_large(&self) -> TutorError {
        TutorError::too_large(self.text)
    }

    fn plan_addition(&self) -> Result<(Vec<PlannedStep>, Decimal, bool)> {
        let (a, b) = (self.left, self.right);
        let sum = a.checked_add(&b).ok_or_else(|| self.too_large())?.normalized();
        let step = PlannedStep::new(
            HintKind::DecAdd,
            sum.to_string(),
            AnswerKind::Decimal,
            format!("Line up the decimal points and add: {a} + {b} = ?"),
        )
        .with_focus(self.focus(a, b));
        Ok((vec![step], sum, false))
    }

    fn plan_subtraction(&self) -> Result<(Vec<PlannedStep>, Decimal, bool)> {
        let (a, b, swapped) = match self.left.cmp_value(&self.right) {
            Ordering::Less if self.swap_when_negative => (self.right, self.left, true),
            Ordering::Less => {
                return Err(TutorError::degenerate(
                    self.text,
                    "the first number is smaller than the second, so the difference would be negative",
                    "Write the larger number first, or set subtraction.swapWhenNegative to true in abacus.json",
                ));
            }
            Ordering::Equal | Ordering::Greater => (self.left, self.right, false),
        };
        let difference = a.checked_sub(&b).ok_or_else(|| self.too_large())?.normalized();
        let step = PlannedStep::new(
            HintKind::DecSubtract,
            difference.to_string(),
            AnswerKind::Decimal,
            format!("Line up the decimal points and subtract: {a} - {b} = ?"),
        )
        .with_focus(self.focus(a, b));
        Ok((vec![step], difference, swapped))
    }

    fn plan_multiplication(&self) -> Result<(Vec<PlannedStep>, Decimal, bool)> {
        let (a, b) = (self.left, self.right);
        let (ma, mb) = (a.mantissa(), b.mantissa());
        let whole_product = ma.checked_mul(mb).ok_or_else(|| self.too_large())?;
        let product = a.checked_mul(&b).ok_or_else(|| self.too_large())?;
        let places = a.scale() + b.scale();
        let focus = self.focus(a, b);

        let steps = vec![
            PlannedStep::new(
                HintKind::DecConvert,
                format!("{ma} {mb}"),
                AnswerKind::Pair,
                format!(
                    "Write {a} and {b} without the decimal point, separated by a space."
                ),
            ),
            PlannedStep::new(
                HintKind::DecMultiply,
                whole_product.to_string(),
                AnswerKind::Integer,
                format!("Multiply them as whole numbers: {ma} × {mb} = ?"),
            ),
            PlannedStep::new(
                HintKind::DecPlacePoint,
                product.normalized().to_string(),
                AnswerKind::Decimal,
                format!(
                    "The factors have {places} decimal places together. Put the point back into {whole_product}: what is {a} × {b}?"
                ),
            ),
        ]
        .into_iter()
        .map(|step| step.with_focus(focus.clone()))
        .collect();
        Ok((steps, product.normalized(), false))
    }

    fn plan_division(&self) -> Result<(Vec<PlannedStep>, Decimal, bool)> {
        let (a, b) = (self.left, self.right);
        let quotient = a
            .checked_div_rounded(&b)
            .ok_or_else(|| {
                if b.is_zero() {
                    TutorError::degenerate(self.text, "the divisor is zero", "Pick a divisor greater than 0")
                } else {
                    self.too_large()
                }
            })?
            .normalized();
        let focus = self.focus(a, b);

        let steps = vec![
            PlannedStep::new(
                HintKind::DecDivisorPlaces,
                b.scale().to_string(),
                AnswerKind::Integer,
                format!("How many decimal places does the divisor {b} have?"),
            ),
            PlannedStep::new(
                HintKind::DecDivide,
                quotient.to_string(),
                AnswerKind::Decimal,
                format!(
                    "Now divide: {a} ÷ {b} = ? (round to {DIVISION_PLACES} decimal places if it does not end)"
                ),
            ),
        ]
        .into_iter()
        .map(|step| step.with_focus(focus.clone()))
        .collect();
        Ok((steps, quotient, false))
    }
}

impl StepEngine for DecimalEngine<'_> {
    fn topic(&self) -> Topic {
        Topic::Decimals
    }

    fn plan(&self) -> Result<StepPlan> {
        let (steps, result, swapped) = match self.operation {
            Operation::Addition => self.plan_addition()?,
            Operation::Subtraction => self.plan_subtraction()?,
            Operation::Multiplication => self.plan_multiplication()?,
            Operation::Division => self.plan_division()?,
            Operation::Percentage => {
                return Err(TutorError::degenerate(
                    self.text,
                    "a percentage must be a whole number of a whole number",
                    "Write the exercise as '20% of 50'",
                ));
            }
        };
        Ok(StepPlan::new(
            Topic::Decimals,
            steps,
            HintKind::DecResult,
            result.to_string(),
            AnswerKind::Decimal,
        )
        .swapped(swapped))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(text: &str) -> Decimal {
        Decimal::parse(text).unwrap()
    }

    fn plan(a: &str, op: Operation, b: &str) -> StepPlan {
        DecimalEngine::new("test", op, dec(a), dec(b), true).plan().unwrap()
    }

    #[test]
    fn test_addition_single_step() {
        let plan = plan("2.5", Operation::Addition, "1.25");
        assert_eq!(plan.expected_answers(), vec!["3.75"]);
        assert_eq!(plan.final_answer, "3.75");
        assert_eq!(plan.final_kind, HintKind::DecResult);
    }

    #[test]
    fn test_addition_drops_trailing_zeros() {
        let plan = plan("2.5", Operation::Addition, "2.5");
        assert_eq!(plan.final_answer, "5");
    }

    #[test]
    fn test_subtraction_swaps_when_negative() {
        let plan = plan("0.5", Operation::Subtraction, "2");
        assert!(plan.operands_swapped);
        assert_eq!(plan.final_answer, "1.5");
    }

    #[test]
    fn test_subtraction_rejected_without_swap() {
        let err = DecimalEngine::new("0.5 - 2", Operation::Subtraction, dec("0.5"), dec("2"), false)
            .plan()
            .unwrap_err();
        assert!(matches!(err, TutorError::DegenerateInput { .. }));
    }

    #[test]
    fn test_multiplication_pipeline() {
        let plan = plan("2.5", Operation::Multiplication, "3");
        assert_eq!(plan.expected_answers(), vec!["25 3", "75", "7.5"]);
        assert_eq!(plan.steps[0].kind, HintKind::DecConvert);
        assert_eq!(plan.steps[1].kind, HintKind::DecMultiply);
        assert_eq!(plan.steps[2].kind, HintKind::DecPlacePoint);
        assert!(plan.steps[2].prompt.contains("1 decimal places"));
        assert_eq!(plan.final_answer, "7.5");
    }

    #[test]
    fn test_multiplication_of_two_decimals() {
        let plan = plan("0.2", Operation::Multiplication, "0.3");
        assert_eq!(plan.expected_answers(), vec!["2 3", "6", "0.06"]);
    }

    #[test]
    fn test_division_pipeline() {
        let plan = plan("7.5", Operation::Division, "2.5");
        assert_eq!(plan.expected_answers(), vec!["1", "3"]);
        assert_eq!(plan.final_answer, "3");
    }

    #[test]
    fn test_division_rounds() {
        let plan = plan("1", Operation::Division, "0.3");
        assert_eq!(plan.final_answer, "3.333");
    }

    #[test]
    fn test_division_by_zero_is_degenerate() {
        let err = DecimalEngine::new("1.5 / 0.0", Operation::Division, dec("1.5"), dec("0.0"), true)
            .plan()
            .unwrap_err();
        assert!(err.to_string().contains("divisor is zero"));
    }

    #[test]
    fn test_transcript() {
        insta::assert_snapshot!(plan("1.2", Operation::Multiplication, "0.4").transcript(), @r"
        0 ask dec_convert 12 4
        1 ask dec_multiply 48
        2 ask dec_place_point 0.48
        3 done dec_result 0.48
        ");
    }
}
