//! Percentage of a whole number in three stages.

use crate::error::{Result, TutorError};
use crate::exercise::Topic;
use crate::number::Decimal;
use crate::step::{AnswerKind, Focus, HintKind, PlannedStep, StepPlan};

use super::StepEngine;

/// Works `percent% of base`.
///
/// The percentage is first written as a fraction over 100, then the base is
/// multiplied by the percentage and the product divided by 100.
#[derive(Debug, Clone, Copy)]
pub struct PercentageEngine<'a> {
    text: &'a str,
    percent: u64,
    base: u64,
}

impl<'a> PercentageEngine<'a> {
    /// Creates the engine for `percent% of base`.
    #[must_use]
    pub const fn new(text: &'a str, percent: u64, base: u64) -> Self {
        Self {
            text,
            percent,
            base,
        }
    }
}

impl StepEngine for PercentageEngine<'_> {
    fn topic(&self) -> Topic {
        Topic::Percentages
    }

    fn plan(&self) -> Result<StepPlan> {
        let (percent, base) = (self.percent, self.base);
        let product = percent
            .checked_mul(base)
            .ok_or_else(|| TutorError::too_large(self.text))?;
        let result = Decimal::new(i128::from(product), 2).normalized();
        let focus = Focus::Operation {
            left: percent,
            right: base,
            operator: '%',
        };

        let steps = vec![
            PlannedStep::new(
                HintKind::PercFraction,
                format!("{percent}/100"),
                AnswerKind::Text,
                format!("The % sign means \"out of every 100\". Write {percent}% as a fraction."),
            ),
            PlannedStep::new(
                HintKind::PercMultiply,
                product.to_string(),
                AnswerKind::Integer,
                format!("Multiply the amount by the percentage: {base} × {percent} = ?"),
            ),
            PlannedStep::new(
                HintKind::PercDivide,
                result.to_string(),
                AnswerKind::Decimal,
                format!("Now divide by 100: {product} ÷ 100 = ?"),
            ),
        ]
        .into_iter()
        .map(|step| step.with_focus(focus.clone()))
        .collect();

        Ok(StepPlan::new(
            Topic::Percentages,
            steps,
            HintKind::PercResult,
            result.to_string(),
            AnswerKind::Decimal,
        ))
    }
}
