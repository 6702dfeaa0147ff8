//! Per-operation step engines.
//!
//! Each engine implements [`StepEngine`] and builds the complete
//! [`StepPlan`] for one exercise from scratch. Engines are pure: no engine
//! keeps state between calls.

pub mod addition;
pub mod decimal;
pub mod division;
pub mod fraction;
pub mod multiplication;
pub mod percentage;
pub mod subtraction;

use crate::classifier::classify;
use crate::config::{Cycle, EngineOptions};
use crate::error::Result;
use crate::exercise::{Exercise, Operands, Operation, Topic};
use crate::step::{StepPlan, StepRequest, StepResult};

pub use addition::AdditionEngine;
pub use decimal::DecimalEngine;
pub use division::DivisionEngine;
pub use fraction::FractionEngine;
pub use multiplication::MultiplicationEngine;
pub use percentage::PercentageEngine;
pub use subtraction::SubtractionEngine;

/// A decomposition algorithm for one kind of exercise.
pub trait StepEngine {
    /// The topic this engine teaches.
    fn topic(&self) -> Topic;

    /// Builds the full step sequence.
    ///
    /// # Errors
    ///
    /// Returns `TutorError::DegenerateInput` when the exercise cannot be
    /// computed exactly. No partial plan is ever returned.
    fn plan(&self) -> Result<StepPlan>;
}

/// Selects the engine for a classified exercise.
#[must_use]
pub fn engine_for(exercise: &Exercise, options: EngineOptions) -> Box<dyn StepEngine + '_> {
    let text = exercise.text.as_str();
    match (exercise.operation, exercise.operands) {
        (Operation::Addition, Operands::Integers(a, b)) => Box::new(AdditionEngine::new(text, a, b)),
        (Operation::Subtraction, Operands::Integers(a, b)) => {
            Box::new(SubtractionEngine::new(text, a, b, options.swap_when_negative))
        }
        (Operation::Multiplication, Operands::Integers(a, b)) => {
            Box::new(MultiplicationEngine::new(text, a, b))
        }
        (Operation::Division, Operands::Integers(a, b)) => Box::new(DivisionEngine::new(text, a, b)),
        (Operation::Percentage, Operands::Integers(percent, base)) => {
            Box::new(PercentageEngine::new(text, percent, base))
        }
        (operation, Operands::Decimals(a, b)) => Box::new(DecimalEngine::new(
            text,
            operation,
            a,
            b,
            options.swap_when_negative,
        )),
        (operation, Operands::Fractions(a, b)) => {
            Box::new(FractionEngine::new(text, operation, a, b))
        }
    }
}

/// Plans a classified exercise.
pub fn plan(exercise: &Exercise, options: EngineOptions) -> Result<StepPlan> {
    let engine = engine_for(exercise, options);
    let plan = engine.plan()?;
    tracing::debug!(
        topic = %engine.topic(),
        steps = plan.step_count(),
        final_answer = %plan.final_answer,
        "exercise planned"
    );
    Ok(plan)
}

/// Computes the result for one step of raw exercise text.
///
/// This is the pure core contract: the text is classified again, the plan
/// rebuilt and the requested step rendered. Classification and degenerate
/// input failures become an `error` result with no expected answer and the
/// step pointer left unchanged. No hint is attached here.
///
/// `request.last_answer` is carried for the caller and never read: the
/// result for a step is the same whatever was answered. Comparing an answer
/// with `expected_answer` belongs to the caller, see [`Tutor::submit`] and
/// [`answers_match`].
///
/// [`Tutor::submit`]: crate::Tutor::submit
/// [`answers_match`]: crate::answer::answers_match
///
/// # Examples
///
/// ```
/// use abacus_core::{engine, Cycle, EngineOptions, StepRequest, StepStatus};
///
/// let result = engine::step("47 + 28", &StepRequest::at(0), EngineOptions::default(), Cycle::C2);
/// assert_eq!(result.status, StepStatus::Ask);
/// assert_eq!(result.expected_answer.as_deref(), Some("5"));
/// ```
#[must_use]
pub fn step(text: &str, request: &StepRequest, options: EngineOptions, cycle: Cycle) -> StepResult {
    match classify(text).and_then(|exercise| plan(&exercise, options)) {
        Ok(plan) => plan.result_at(request.step_index, cycle),
        Err(err) => {
            tracing::debug!(error = %err.headline(), "step request rejected");
            StepResult::error(request.step_index, err.to_string(), cycle)
        }
    }
}
