//! Column subtraction with cascading borrows.

use crate::error::{Result, TutorError};
use crate::exercise::Topic;
use crate::number::{digits_lsb, place_name};
use crate::step::{AnswerKind, Column, Focus, HintKind, PlannedStep, StepPlan};

use super::StepEngine;

/// Subtracts two whole numbers column by column, right to left.
///
/// The minuend must not be smaller than the subtrahend. When it is, the
/// operands are swapped if `swap_when_negative` is set and the exercise is
/// rejected otherwise.
#[derive(Debug, Clone, Copy)]
pub struct SubtractionEngine<'a> {
    text: &'a str,
    a: u64,
    b: u64,
    swap_when_negative: bool,
}

impl<'a> SubtractionEngine<'a> {
    /// Creates the engine for `a - b`.
    #[must_use]
    pub const fn new(text: &'a str, a: u64, b: u64, swap_when_negative: bool) -> Self {
        Self {
            text,
            a,
            b,
            swap_when_negative,
        }
    }

    /// The operands in working order and whether they were swapped.
    fn ordered(&self) -> Result<(u64, u64, bool)> {
        if self.a >= self.b {
            Ok((self.a, self.b, false))
        } else if self.swap_when_negative {
            tracing::debug!(a = self.a, b = self.b, "swapping subtraction operands");
            Ok((self.b, self.a, true))
        } else {
            Err(TutorError::degenerate(
                self.text,
                "the first number is smaller than the second, so the difference would be negative",
                "Write the larger number first, or set subtraction.swapWhenNegative to true in abacus.json",
            ))
        }
    }

    /// The column descriptors of `larger - smaller`, units first.
    ///
    /// `carry_in`/`carry_out` hold the borrow.
    #[must_use]
    pub fn columns(larger: u64, smaller: u64) -> Vec<Column> {
        let digits_a = digits_lsb(larger);
        let digits_b = digits_lsb(smaller);

        let mut borrow = 0u8;
        digits_a
            .iter()
            .enumerate()
            .map(|(place_index, &digit_a)| {
                let digit_b = digits_b.get(place_index).copied().unwrap_or(0);
                let adjusted = i16::from(digit_a) - i16::from(borrow);
                let (result, borrow_out) = if adjusted < i16::from(digit_b) {
                    (adjusted + 10 - i16::from(digit_b), 1)
                } else {
                    (adjusted - i16::from(digit_b), 0)
                };
                let column = Column {
                    place_index,
                    digit_a,
                    digit_b,
                    carry_in: borrow,
                    result_digit: u8::try_from(result).unwrap_or_default(),
                    carry_out: borrow_out,
                    place_name: place_name(place_index),
                };
                borrow = borrow_out;
                column
            })
            .collect()
    }
}

impl StepEngine for SubtractionEngine<'_> {
    fn topic(&self) -> Topic {
        Topic::Subtraction
    }

    fn plan(&self) -> Result<StepPlan> {
        let (a, b, swapped) = self.ordered()?;
        let difference = a - b;

        let steps = if a < 10 && b < 10 {
            vec![PlannedStep::new(
                HintKind::SubSimple,
                difference.to_string(),
                AnswerKind::Integer,
                format!("What is {a} - {b}?"),
            )
            .with_focus(Focus::Operation {
                left: a,
                right: b,
                operator: '-',
            })]
        } else {
            Self::columns(a, b).into_iter().map(column_step).collect()
        };

        Ok(StepPlan::new(
            Topic::Subtraction,
            steps,
            HintKind::SubResult,
            difference.to_string(),
            AnswerKind::Integer,
        )
        .swapped(swapped))
    }
}

fn column_step(column: Column) -> PlannedStep {
    let top = if column.carry_in > 0 {
        format!("{} - 1 (lent to the previous column)", column.digit_a)
    } else {
        column.digit_a.to_string()
    };
    let (kind, prompt) = if column.carry_out > 0 {
        (
            HintKind::SubBorrow,
            format!(
                "In the {place} column: {top} - {bottom}. The top is too small, so borrow 1 from the {next} column. Which digit do you write in the {place} column?",
                place = column.place_name,
                bottom = column.digit_b,
                next = place_name(column.place_index + 1),
            ),
        )
    } else {
        (
            HintKind::SubColumn,
            format!(
                "In the {place} column: {top} - {bottom}. Which digit do you write in the {place} column?",
                place = column.place_name,
                bottom = column.digit_b,
            ),
        )
    };
    PlannedStep::new(
        kind,
        column.result_digit.to_string(),
        AnswerKind::Integer,
        prompt,
    )
    .with_focus(Focus::Column(column))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn plan(a: u64, b: u64) -> StepPlan {
        SubtractionEngine::new("test", a, b, true).plan().unwrap()
    }

    #[test]
    fn test_borrow_then_reduced_column() {
        let plan = plan(52, 38);
        assert_eq!(plan.expected_answers(), vec!["4", "1"]);
        assert_eq!(plan.steps[0].kind, HintKind::SubBorrow);
        assert_eq!(plan.steps[1].kind, HintKind::SubColumn);
        assert!(plan.steps[1].prompt.contains("5 - 1 (lent to the previous column) - 3"));
        assert_eq!(plan.final_answer, "14");
    }

    #[test]
    fn test_cascading_borrow_through_zeros() {
        let plan = plan(1000, 1);
        assert_eq!(plan.expected_answers(), vec!["9", "9", "9", "0"]);
        assert_eq!(
            plan.steps.iter().map(|s| s.kind).collect::<Vec<_>>(),
            vec![
                HintKind::SubBorrow,
                HintKind::SubBorrow,
                HintKind::SubBorrow,
                HintKind::SubColumn
            ]
        );
        assert_eq!(plan.final_answer, "999");
    }

    #[test]
    fn test_no_final_borrow_step() {
        let plan = plan(100, 99);
        assert_eq!(plan.step_count(), 3);
        assert_eq!(plan.final_answer, "1");
    }

    #[test]
    fn test_single_digits_collapse() {
        let plan = plan(9, 4);
        assert_eq!(plan.step_count(), 1);
        assert_eq!(plan.steps[0].kind, HintKind::SubSimple);
        assert_eq!(plan.steps[0].expected, "5");
    }

    #[test]
    fn test_smaller_first_is_swapped() {
        let plan = plan(38, 52);
        assert!(plan.operands_swapped);
        assert_eq!(plan.expected_answers(), vec!["4", "1"]);
        assert_eq!(plan.final_answer, "14");
    }

    #[test]
    fn test_smaller_first_rejected_without_swap() {
        let err = SubtractionEngine::new("3 - 8", 3, 8, false).plan().unwrap_err();
        assert!(matches!(err, TutorError::DegenerateInput { .. }));
        assert!(err.to_string().contains("negative"));
    }

    #[test]
    fn test_transcript() {
        insta::assert_snapshot!(plan(503, 278).transcript(), @r"
        0 ask sub_borrow 5
        1 ask sub_borrow 2
        2 ask sub_column 2
        3 done sub_result 225
        ");
    }

    proptest! {
        #[test]
        fn prop_digits_reconstruct_difference(a in 10u64..10_000_000_000, b in 0u64..10_000_000_000) {
            prop_assume!(a >= b);
            let plan = plan(a, b);
            let reconstructed = plan
                .expected_answers()
                .iter()
                .enumerate()
                .map(|(k, digit)| digit.parse::<u64>().unwrap() * 10u64.pow(u32::try_from(k).unwrap()))
                .sum::<u64>();
            prop_assert_eq!(reconstructed, a - b);
        }

        #[test]
        fn prop_swap_matches_pre_swapped(a in 0u64..1_000_000, b in 0u64..1_000_000) {
            prop_assume!(a < b);
            let swapped = plan(a, b);
            let pre_swapped = plan(b, a);
            prop_assert!(swapped.operands_swapped);
            prop_assert_eq!(swapped.steps, pre_swapped.steps);
            prop_assert_eq!(swapped.final_answer, pre_swapped.final_answer);
        }
    }
}
