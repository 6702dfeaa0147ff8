//! Fraction addition and subtraction through a common denominator.

use crate::error::{Result, TutorError};
use crate::exercise::{Operation, Topic};
use crate::number::{gcd, lcm, Fraction};
use crate::step::{AnswerKind, Focus, FractionWork, HintKind, PlannedStep, StepPlan};

use super::StepEngine;

/// Adds or subtracts two fractions in a fixed six-stage pipeline.
///
/// The stages do not depend on the size of the numbers: same denominator?,
/// LCM, scaled numerators, combined fraction, simplified fraction, done.
/// Every expected answer is derived from the two original fractions.
#[derive(Debug, Clone, Copy)]
pub struct FractionEngine<'a> {
    text: &'a str,
    operation: Operation,
    first: Fraction,
    second: Fraction,
}

impl<'a> FractionEngine<'a> {
    /// Creates the engine for `first ± second`.
    #[must_use]
    pub const fn new(text: &'a str, operation: Operation, first: Fraction, second: Fraction) -> Self {
        Self {
            text,
            operation,
            first,
            second,
        }
    }

    /// Computes every derived quantity of the pipeline.
    ///
    /// # Errors
    ///
    /// Returns `TutorError::DegenerateInput` for operations other than
    /// addition and subtraction, or when an intermediate value overflows.
    pub fn work(&self) -> Result<FractionWork> {
        let operator = match self.operation {
            Operation::Addition => '+',
            Operation::Subtraction => '-',
            Operation::Multiplication | Operation::Division | Operation::Percentage => {
                return Err(TutorError::degenerate(
                    self.text,
                    "only addition and subtraction of fractions can be worked step by step",
                    "Write the exercise as 'a/b + c/d' or 'a/b - c/d'",
                ));
            }
        };
        let too_large = || TutorError::too_large(self.text);

        let (d1, d2) = (self.first.denominator(), self.second.denominator());
        let common = lcm(d1.unsigned_abs(), d2.unsigned_abs()).ok_or_else(too_large)?;
        let common = i64::try_from(common).map_err(|_| too_large())?;

        let first_factor = common / d1;
        let second_factor = common / d2;
        let first_scaled = self
            .first
            .numerator()
            .checked_mul(first_factor)
            .ok_or_else(too_large)?;
        let second_scaled = self
            .second
            .numerator()
            .checked_mul(second_factor)
            .ok_or_else(too_large)?;
        let combined = if operator == '+' {
            first_scaled.checked_add(second_scaled)
        } else {
            first_scaled.checked_sub(second_scaled)
        }
        .ok_or_else(too_large)?;

        let divisor = gcd(combined.unsigned_abs(), common.unsigned_abs());
        let divisor = i64::try_from(divisor).map_err(|_| too_large())?;
        let simplified =
            Fraction::new(combined / divisor, common / divisor).ok_or_else(too_large)?;

        Ok(FractionWork {
            first: self.first,
            second: self.second,
            operator,
            lcm: common,
            first_factor,
            second_factor,
            first_scaled,
            second_scaled,
            combined,
            gcd: divisor,
            simplified,
        })
    }
}

impl StepEngine for FractionEngine<'_> {
    fn topic(&self) -> Topic {
        Topic::Fractions
    }

    fn plan(&self) -> Result<StepPlan> {
        let work = self.work()?;
        let same = work.first.denominator() == work.second.denominator();
        let op = work.operator;
        let focus = Focus::Fraction(work.clone());

        let steps = vec![
            PlannedStep::new(
                HintKind::FracSameDenominator,
                if same { "yes" } else { "no" },
                AnswerKind::YesNo,
                format!(
                    "Do {} and {} have the same denominator? (yes/no)",
                    work.first, work.second
                ),
            ),
            PlannedStep::new(
                HintKind::FracLcm,
                work.lcm.to_string(),
                AnswerKind::Integer,
                format!(
                    "What is the least common multiple of {} and {}?",
                    work.first.denominator(),
                    work.second.denominator()
                ),
            ),
            PlannedStep::new(
                HintKind::FracEquivalent,
                format!("{} and {}", work.first_scaled, work.second_scaled),
                AnswerKind::Pair,
                format!(
                    "Rewrite both fractions with denominator {}. What are the two new numerators?",
                    work.lcm
                ),
            ),
            PlannedStep::new(
                HintKind::FracCombine,
                format!("{}/{}", work.combined, work.lcm),
                AnswerKind::Fraction,
                format!(
                    "Now {} the numerators: {}/{} {op} {}/{} = ?",
                    if op == '+' { "add" } else { "subtract" },
                    work.first_scaled,
                    work.lcm,
                    work.second_scaled,
                    work.lcm
                ),
            ),
            PlannedStep::new(
                HintKind::FracSimplify,
                work.simplified.display_simplified(),
                AnswerKind::ReducedFraction,
                format!(
                    "Simplify {}/{}. What is its simplest form?",
                    work.combined, work.lcm
                ),
            ),
        ]
        .into_iter()
        .map(|step| step.with_focus(focus.clone()))
        .collect();

        Ok(StepPlan::new(
            Topic::Fractions,
            steps,
            HintKind::FracResult,
            work.simplified.display_simplified(),
            AnswerKind::ReducedFraction,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn frac(n: i64, d: i64) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    fn plan(a: Fraction, op: Operation, b: Fraction) -> StepPlan {
        FractionEngine::new("test", op, a, b).plan().unwrap()
    }

    #[test]
    fn test_different_denominators() {
        let plan = plan(frac(3, 4), Operation::Addition, frac(1, 2));
        assert_eq!(
            plan.expected_answers(),
            vec!["no", "4", "3 and 2", "5/4", "5/4"]
        );
        assert_eq!(plan.final_answer, "5/4");
        assert_eq!(plan.final_kind, HintKind::FracResult);
    }

    #[test]
    fn test_same_denominator_still_runs_full_pipeline() {
        let plan = plan(frac(1, 4), Operation::Addition, frac(1, 4));
        assert_eq!(
            plan.expected_answers(),
            vec!["yes", "4", "1 and 1", "2/4", "1/2"]
        );
    }

    #[test]
    fn test_subtraction_with_simplification() {
        let plan = plan(frac(5, 6), Operation::Subtraction, frac(1, 3));
        assert_eq!(
            plan.expected_answers(),
            vec!["no", "6", "5 and 2", "3/6", "1/2"]
        );
    }

    #[test]
    fn test_whole_number_result() {
        let whole = plan(frac(3, 2), Operation::Addition, frac(1, 2));
        assert_eq!(whole.final_answer, "2");
        let zero = plan(frac(1, 3), Operation::Subtraction, frac(2, 6));
        assert_eq!(zero.expected_answers()[3], "0/6");
        assert_eq!(zero.final_answer, "0");
    }

    #[test]
    fn test_negative_difference_keeps_sign() {
        let plan = plan(frac(1, 4), Operation::Subtraction, frac(1, 2));
        assert_eq!(plan.steps[3].expected, "-1/4");
        assert_eq!(plan.final_answer, "-1/4");
    }

    #[test]
    fn test_pipeline_length_is_fixed() {
        for (a, b) in [(frac(1, 2), frac(1, 3)), (frac(123, 456), frac(789, 1011))] {
            assert_eq!(plan(a, Operation::Addition, b).step_count(), 5);
        }
    }

    #[test]
    fn test_multiplication_is_rejected() {
        let err = FractionEngine::new("1/2 × 1/3", Operation::Multiplication, frac(1, 2), frac(1, 3))
            .plan()
            .unwrap_err();
        assert!(matches!(err, TutorError::DegenerateInput { .. }));
    }

    #[test]
    fn test_transcript() {
        insta::assert_snapshot!(plan(frac(2, 3), Operation::Addition, frac(1, 6)).transcript(), @r"
        0 ask frac_same_denominator no
        1 ask frac_lcm 6
        2 ask frac_equivalent 4 and 1
        3 ask frac_combine 5/6
        4 ask frac_simplify 5/6
        5 done frac_result 5/6
        ");
    }

    proptest! {
        #[test]
        fn prop_result_equals_exact_value(
            n1 in 0i64..500, d1 in 1i64..500,
            n2 in 0i64..500, d2 in 1i64..500,
            subtract in any::<bool>(),
        ) {
            let op = if subtract { Operation::Subtraction } else { Operation::Addition };
            let work = FractionEngine::new("p", op, frac(n1, d1), frac(n2, d2)).work().unwrap();

            // n1/d1 ± n2/d2 == (n1*d2 ± n2*d1) / (d1*d2)
            let exact_num = if subtract { n1 * d2 - n2 * d1 } else { n1 * d2 + n2 * d1 };
            let exact = frac(exact_num, d1 * d2);
            prop_assert!(work.simplified.same_value(&exact));
            prop_assert!(work.simplified.is_reduced());
        }

        #[test]
        fn prop_simplification_is_idempotent(
            n1 in 0i64..500, d1 in 1i64..500,
            n2 in 0i64..500, d2 in 1i64..500,
        ) {
            let work = FractionEngine::new("p", Operation::Addition, frac(n1, d1), frac(n2, d2)).work().unwrap();
            let again = work.simplified.reduced();
            prop_assert_eq!(again, work.simplified);
            prop_assert_eq!(
                gcd(work.simplified.numerator().unsigned_abs(), work.simplified.denominator().unsigned_abs()),
                1
            );
        }
    }
}
