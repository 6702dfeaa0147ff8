//! Column addition with carry propagation.

use crate::error::{Result, TutorError};
use crate::exercise::Topic;
use crate::number::{digits_lsb, place_name};
use crate::step::{AnswerKind, Column, Focus, HintKind, PlannedStep, StepPlan};

use super::StepEngine;

/// Adds two whole numbers column by column, right to left.
///
/// Two single-digit operands collapse into one step. Otherwise every column
/// asks for its result digit, a final carry gets one extra step, and the
/// terminal result carries the full sum.
#[derive(Debug, Clone, Copy)]
pub struct AdditionEngine<'a> {
    text: &'a str,
    a: u64,
    b: u64,
}

impl<'a> AdditionEngine<'a> {
    /// Creates the engine for `a + b`.
    #[must_use]
    pub const fn new(text: &'a str, a: u64, b: u64) -> Self {
        Self { text, a, b }
    }

    /// The column descriptors, units first.
    #[must_use]
    pub fn columns(&self) -> Vec<Column> {
        let digits_a = digits_lsb(self.a);
        let digits_b = digits_lsb(self.b);
        let width = digits_a.len().max(digits_b.len());

        let mut carry = 0u8;
        (0..width)
            .map(|place_index| {
                let digit_a = digits_a.get(place_index).copied().unwrap_or(0);
                let digit_b = digits_b.get(place_index).copied().unwrap_or(0);
                let total = digit_a + digit_b + carry;
                let column = Column {
                    place_index,
                    digit_a,
                    digit_b,
                    carry_in: carry,
                    result_digit: total % 10,
                    carry_out: total / 10,
                    place_name: place_name(place_index),
                };
                carry = column.carry_out;
                column
            })
            .collect()
    }
}

impl StepEngine for AdditionEngine<'_> {
    fn topic(&self) -> Topic {
        Topic::Addition
    }

    fn plan(&self) -> Result<StepPlan> {
        let sum = self
            .a
            .checked_add(self.b)
            .ok_or_else(|| TutorError::too_large(self.text))?;

        let steps = if self.a < 10 && self.b < 10 {
            vec![PlannedStep::new(
                HintKind::AddSimple,
                sum.to_string(),
                AnswerKind::Integer,
                format!("What is {} + {}?", self.a, self.b),
            )
            .with_focus(Focus::Operation {
                left: self.a,
                right: self.b,
                operator: '+',
            })]
        } else {
            column_steps(&self.columns())
        };

        Ok(StepPlan::new(
            Topic::Addition,
            steps,
            HintKind::AddResult,
            sum.to_string(),
            AnswerKind::Integer,
        ))
    }
}

fn column_steps(columns: &[Column]) -> Vec<PlannedStep> {
    let mut steps: Vec<PlannedStep> = columns
        .iter()
        .map(|column| {
            let sum = if column.carry_in > 0 {
                format!(
                    "{} + {} + {} (carried)",
                    column.digit_a, column.digit_b, column.carry_in
                )
            } else {
                format!("{} + {}", column.digit_a, column.digit_b)
            };
            PlannedStep::new(
                HintKind::AddColumn,
                column.result_digit.to_string(),
                AnswerKind::Integer,
                format!(
                    "In the {place} column: {sum}. Which digit do you write in the {place} column?",
                    place = column.place_name
                ),
            )
            .with_focus(Focus::Column(column.clone()))
        })
        .collect();

    if let Some(last) = columns.last().filter(|c| c.carry_out > 0) {
        let next_place = place_name(last.place_index + 1);
        steps.push(
            PlannedStep::new(
                HintKind::AddCarry,
                last.carry_out.to_string(),
                AnswerKind::Integer,
                format!(
                    "The {} column left a carry. What do you write in the {next_place} column?",
                    last.place_name
                ),
            )
            .with_focus(Focus::Carry {
                carry: last.carry_out,
                place_name: next_place,
            }),
        );
    }

    steps
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::TutorError;

    fn plan(a: u64, b: u64) -> StepPlan {
        AdditionEngine::new("test", a, b).plan().unwrap()
    }

    #[test]
    fn test_two_columns_with_inner_carry() {
        let plan = plan(47, 28);
        assert_eq!(plan.expected_answers(), vec!["5", "7"]);
        assert!(plan.steps.iter().all(|s| s.kind == HintKind::AddColumn));
        assert_eq!(plan.final_answer, "75");
        assert_eq!(plan.final_kind, HintKind::AddResult);
    }

    #[test]
    fn test_carry_column_prompt_mentions_carry() {
        let plan = plan(47, 28);
        assert!(plan.steps[1].prompt.contains("4 + 2 + 1 (carried)"));
        assert!(plan.steps[0].prompt.contains("units"));
    }

    #[test]
    fn test_final_carry_adds_one_step() {
        let plan = plan(95, 17);
        assert_eq!(plan.expected_answers(), vec!["2", "1", "1"]);
        assert_eq!(plan.steps[2].kind, HintKind::AddCarry);
        assert!(plan.steps[2].prompt.contains("hundreds"));
        assert_eq!(plan.final_answer, "112");
    }

    #[test]
    fn test_single_digits_collapse_to_one_step() {
        let plan = plan(7, 8);
        assert_eq!(plan.step_count(), 1);
        assert_eq!(plan.steps[0].kind, HintKind::AddSimple);
        assert_eq!(plan.steps[0].expected, "15");
        assert_eq!(plan.final_answer, "15");
    }

    #[test]
    fn test_shorter_operand_is_padded() {
        let plan = plan(100, 5);
        assert_eq!(plan.expected_answers(), vec!["5", "0", "1"]);
        assert_eq!(plan.final_answer, "105");
    }

    #[test]
    fn test_zero_plus_zero() {
        let plan = plan(0, 0);
        assert_eq!(plan.expected_answers(), vec!["0"]);
        assert_eq!(plan.final_answer, "0");
    }

    #[test]
    fn test_overflow_is_degenerate() {
        let err = AdditionEngine::new("huge", u64::MAX, 1).plan().unwrap_err();
        assert!(matches!(err, TutorError::DegenerateInput { .. }));
    }

    #[test]
    fn test_transcript() {
        insta::assert_snapshot!(plan(347, 185).transcript(), @r"
        0 ask add_column 2
        1 ask add_column 3
        2 ask add_column 5
        3 done add_result 532
        ");
    }

    proptest! {
        #[test]
        fn prop_step_count_matches_columns_and_carry(
            a in 0u64..10_000_000_000,
            b in 10u64..10_000_000_000,
        ) {
            let engine = AdditionEngine::new("p", a, b);
            let columns = engine.columns();
            let width = crate::number::digit_count(a.max(b));
            let final_carry = columns.last().map_or(0, |c| c.carry_out);
            let plan = engine.plan().unwrap();

            prop_assert_eq!(columns.len(), width);
            prop_assert_eq!(plan.step_count(), width + usize::from(final_carry > 0));
        }

        #[test]
        fn prop_digits_reconstruct_sum(a in 0u64..10_000_000_000, b in 10u64..10_000_000_000) {
            let plan = AdditionEngine::new("p", a, b).plan().unwrap();
            let reconstructed = plan
                .expected_answers()
                .iter()
                .enumerate()
                .map(|(k, digit)| digit.parse::<u128>().unwrap() * 10u128.pow(u32::try_from(k).unwrap()))
                .sum::<u128>();
            prop_assert_eq!(reconstructed, u128::from(a) + u128::from(b));
            prop_assert_eq!(plan.final_answer, (a + b).to_string());
        }
    }
}
