//! Long division of whole numbers.

use crate::error::{Result, TutorError};
use crate::exercise::Topic;
use crate::number::digits_lsb;
use crate::step::{AnswerKind, DivisionWork, Focus, HintKind, PlannedStep, StepPlan};

use super::StepEngine;

/// Divides digit group by digit group, left to right.
///
/// The first group is the shortest prefix of the dividend that is at least
/// the divisor (the whole dividend when none is). Each group asks for its
/// quotient digit and remainder; while dividend digits remain, the next one
/// is brought down to form the new group.
#[derive(Debug, Clone, Copy)]
pub struct DivisionEngine<'a> {
    text: &'a str,
    dividend: u64,
    divisor: u64,
}

impl<'a> DivisionEngine<'a> {
    /// Creates the engine for `dividend ÷ divisor`.
    #[must_use]
    pub const fn new(text: &'a str, dividend: u64, divisor: u64) -> Self {
        Self {
            text,
            dividend,
            divisor,
        }
    }

    /// The division stages in order, starting with the first group.
    ///
    /// # Errors
    ///
    /// Returns `TutorError::DegenerateInput` for a zero divisor.
    pub fn stages(&self) -> Result<Vec<DivisionWork>> {
        if self.divisor == 0 {
            return Err(TutorError::degenerate(
                self.text,
                "the divisor is zero",
                "Pick a divisor greater than 0",
            ));
        }

        let mut digits = digits_lsb(self.dividend);
        digits.reverse();

        let mut taken = 0;
        let mut group = 0u64;
        for &digit in &digits {
            group = group * 10 + u64::from(digit);
            taken += 1;
            if group >= self.divisor {
                break;
            }
        }

        let mut stages = Vec::new();
        loop {
            let quotient_digit = group / self.divisor;
            let remainder = group - quotient_digit * self.divisor;
            let next_digit = digits.get(taken).copied();
            stages.push(DivisionWork {
                group,
                divisor: self.divisor,
                quotient_digit,
                remainder,
                next_digit,
            });
            let Some(digit) = next_digit else {
                break;
            };
            // remainder < divisor, so remainder * 10 + digit < 10 * divisor
            group = remainder
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(digit)))
                .ok_or_else(|| TutorError::too_large(self.text))?;
            taken += 1;
        }
        Ok(stages)
    }
}

impl StepEngine for DivisionEngine<'_> {
    fn topic(&self) -> Topic {
        Topic::Division
    }

    fn plan(&self) -> Result<StepPlan> {
        let stages = self.stages()?;
        let quotient = self.dividend / self.divisor;
        let remainder = self.dividend % self.divisor;

        let mut steps = Vec::with_capacity(stages.len() * 3 + 1);
        if let Some(first) = stages.first() {
            steps.push(
                PlannedStep::new(
                    HintKind::DivGroup,
                    first.group.to_string(),
                    AnswerKind::Integer,
                    format!(
                        "Take the first digits of {} that make a number at least {} (or the whole number if it is smaller). Which number do you start with?",
                        self.dividend, self.divisor
                    ),
                )
                .with_focus(Focus::Division(first.clone())),
            );
        }

        for stage in stages {
            let focus = Focus::Division(stage.clone());
            steps.push(
                PlannedStep::new(
                    HintKind::DivQuotientDigit,
                    stage.quotient_digit.to_string(),
                    AnswerKind::Integer,
                    format!(
                        "How many times does {} fit into {}?",
                        stage.divisor, stage.group
                    ),
                )
                .with_focus(focus.clone()),
            );
            steps.push(
                PlannedStep::new(
                    HintKind::DivSubtract,
                    stage.remainder.to_string(),
                    AnswerKind::Integer,
                    format!(
                        "{} - {} × {} = ? That is what is left over.",
                        stage.group, stage.quotient_digit, stage.divisor
                    ),
                )
                .with_focus(focus.clone()),
            );
            if let Some(digit) = stage.next_digit {
                steps.push(
                    PlannedStep::new(
                        HintKind::DivBringDown,
                        (stage.remainder * 10 + u64::from(digit)).to_string(),
                        AnswerKind::Integer,
                        format!("Bring down the next digit, {digit}. Which number do you get?"),
                    )
                    .with_focus(focus),
                );
            }
        }

        let final_answer = if remainder == 0 {
            quotient.to_string()
        } else {
            format!("{quotient} r {remainder}")
        };
        Ok(StepPlan::new(
            Topic::Division,
            steps,
            HintKind::DivResult,
            final_answer,
            AnswerKind::Text,
        ))
    }
}
