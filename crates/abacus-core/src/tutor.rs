//! The tutor: engines, answer checking and hints behind one API.

use serde::{Deserialize, Serialize};

use crate::answer::{answers_match, is_help_request};
use crate::classifier::classify;
use crate::config::Config;
use crate::engine;
use crate::error::Result;
use crate::hints::{HintChain, HintRequest};
use crate::session::{Attempt, PracticeSession};
use crate::step::{AnswerKind, StepPlan, StepRequest, StepResult, StepStatus};

/// What happened to a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The answer matched; the session moved on.
    Correct,
    /// The answer did not match; the same step is shown with a hint.
    Incorrect,
    /// The student asked for help; the same step is shown with a hint.
    HelpShown,
    /// The session was already finished; nothing changed.
    AlreadyFinished,
}

/// The verdict on one answer plus the result to show next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    /// What happened to the answer.
    pub verdict: Verdict,
    /// The step result to display now.
    pub result: StepResult,
}

impl SubmitOutcome {
    /// Returns `true` if this outcome closed the exercise.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.result.status.is_terminal()
    }
}

/// Runs exercises for one configuration.
///
/// The tutor holds no per-exercise state: every call classifies and plans
/// the exercise text again. [`PracticeSession`] carries the caller's state.
#[derive(Debug)]
pub struct Tutor {
    config: Config,
    hints: HintChain,
}

impl Tutor {
    /// Creates a tutor with the hint chain described by `config.hints`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let hints = HintChain::from_config(&config.hints);
        Self { config, hints }
    }

    /// Replaces the hint chain.
    #[must_use]
    pub fn with_hints(mut self, hints: HintChain) -> Self {
        self.hints = hints;
        self
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Classifies and plans an exercise.
    ///
    /// # Errors
    ///
    /// Returns `TutorError::NotRecognized` or `TutorError::DegenerateInput`.
    pub fn plan(&self, text: &str) -> Result<StepPlan> {
        let exercise = classify(text)?;
        engine::plan(&exercise, self.config.engine_options())
    }

    /// Computes one step and attaches a hint when one is due.
    ///
    /// A hint is due on an `ask` step once the student has made a mistake
    /// (`error_count > 0`) or when `last_answer` is a help request.
    pub async fn step(&self, text: &str, request: &StepRequest) -> StepResult {
        let mut result = engine::step(
            text,
            request,
            self.config.engine_options(),
            self.config.cycle,
        );
        let help = request.last_answer.as_deref().is_some_and(is_help_request);
        if self.config.hints.enabled && (request.error_count > 0 || help) {
            if let Some(hint_request) = HintRequest::from_result(&result, request.error_count) {
                result.hint = Some(self.hints.hint(&hint_request).await);
            }
        }
        result
    }

    /// Starts a practice session on the first step of `text`.
    ///
    /// # Errors
    ///
    /// Returns the classification or planning error when the exercise
    /// cannot be practiced.
    pub async fn start(&self, text: &str) -> Result<PracticeSession> {
        let exercise = classify(text)?;
        engine::plan(&exercise, self.config.engine_options())?;
        let first = self.step(text, &StepRequest::at(0)).await;
        tracing::info!(exercise = %exercise.canonical(), topic = %exercise.topic(), "practice started");
        Ok(PracticeSession::new(text.trim(), exercise.topic(), first))
    }

    /// Checks an answer and moves the session accordingly.
    pub async fn submit(&self, session: &mut PracticeSession, answer: &str) -> SubmitOutcome {
        let current = session.current().clone();
        if session.is_finished() || current.status != StepStatus::Ask {
            return SubmitOutcome {
                verdict: Verdict::AlreadyFinished,
                result: current,
            };
        }

        let text = session.text.clone();
        let step_index = session.step_index;

        if is_help_request(answer) {
            session.record(Attempt::new(step_index, answer, false, true));
            let request = session.request().with_answer(answer);
            let result = self.step(&text, &request).await;
            session.show(result.clone());
            tracing::debug!(step = step_index, "help requested");
            return SubmitOutcome {
                verdict: Verdict::HelpShown,
                result,
            };
        }

        let expected = current.expected_answer.as_deref().unwrap_or_default();
        let kind = current.answer_kind.unwrap_or(AnswerKind::Text);
        let correct = answers_match(kind, expected, answer, self.config.decimal_tolerance);
        session.record(Attempt::new(step_index, answer, correct, false));

        if correct {
            let result = self.step(&text, &StepRequest::at(current.next_step)).await;
            session.advance(result.clone());
            tracing::debug!(step = step_index, next = current.next_step, "correct answer");
            if session.is_finished() {
                tracing::info!(
                    mistakes = session.mistake_count(),
                    elapsed_secs = session.elapsed().num_seconds(),
                    "practice completed"
                );
            }
            SubmitOutcome {
                verdict: Verdict::Correct,
                result,
            }
        } else {
            let request = StepRequest::at(step_index)
                .with_errors(session.error_count.saturating_add(1))
                .with_answer(answer);
            let result = self.step(&text, &request).await;
            session.retry(result.clone());
            tracing::debug!(step = step_index, errors = session.error_count, "wrong answer");
            SubmitOutcome {
                verdict: Verdict::Incorrect,
                result,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::HintConfig;
    use crate::error::TutorError;
    use crate::hints::HintTier;

    fn tutor() -> Tutor {
        Tutor::new(Config::default())
    }

    #[tokio::test]
    async fn test_step_without_errors_has_no_hint() {
        let result = tutor().step("47 + 28", &StepRequest::at(0)).await;
        assert_eq!(result.expected_answer.as_deref(), Some("5"));
        assert!(result.hint.is_none());
    }

    #[tokio::test]
    async fn test_step_with_errors_has_hint() {
        let result = tutor()
            .step("47 + 28", &StepRequest::at(0).with_errors(4))
            .await;
        assert!(result.hint.unwrap().contains("The answer is 5."));
    }

    #[tokio::test]
    async fn test_help_request_gets_first_tier() {
        let result = tutor()
            .step("47 + 28", &StepRequest::at(0).with_answer("help"))
            .await;
        let hint = result.hint.unwrap();
        assert!(hint.contains("units column"));
        assert!(!hint.contains("7 and 8"));
        assert_eq!(HintTier::for_errors(result.topic.unwrap(), 0), HintTier::Rule);
    }

    #[tokio::test]
    async fn test_disabled_hints() {
        let config = Config {
            hints: HintConfig {
                enabled: false,
                ..HintConfig::default()
            },
            ..Config::default()
        };
        let result = Tutor::new(config)
            .step("47 + 28", &StepRequest::at(0).with_errors(3))
            .await;
        assert!(result.hint.is_none());
    }

    #[tokio::test]
    async fn test_done_step_never_has_hint() {
        let result = tutor()
            .step("47 + 28", &StepRequest::at(2).with_errors(3))
            .await;
        assert_eq!(result.status, StepStatus::Done);
        assert!(result.hint.is_none());
    }

    #[tokio::test]
    async fn test_start_rejects_unknown_text() {
        let err = tutor().start("what is the capital of France").await.unwrap_err();
        assert!(matches!(err, TutorError::NotRecognized { .. }));
    }

    #[tokio::test]
    async fn test_submit_flow() {
        let tutor = tutor();
        let mut session = tutor.start("47 + 28").await.unwrap();

        let wrong = tutor.submit(&mut session, "4").await;
        assert_eq!(wrong.verdict, Verdict::Incorrect);
        assert_eq!(session.error_count, 1);
        assert!(wrong.result.hint.is_some());

        let right = tutor.submit(&mut session, "5").await;
        assert_eq!(right.verdict, Verdict::Correct);
        assert_eq!(session.step_index, 1);
        assert_eq!(session.error_count, 0);

        let last = tutor.submit(&mut session, "7").await;
        assert!(last.is_finished());
        assert_eq!(last.result.expected_answer.as_deref(), Some("75"));

        let after = tutor.submit(&mut session, "75").await;
        assert_eq!(after.verdict, Verdict::AlreadyFinished);
        assert_eq!(session.correct_count(), 2);
        assert_eq!(session.mistake_count(), 1);
    }

    #[tokio::test]
    async fn test_help_does_not_count_as_mistake() {
        let tutor = tutor();
        let mut session = tutor.start("3/4 + 1/2").await.unwrap();
        let outcome = tutor.submit(&mut session, "I don't know").await;
        assert_eq!(outcome.verdict, Verdict::HelpShown);
        assert_eq!(session.error_count, 0);
        assert!(outcome.result.hint.is_some());

        let outcome = tutor.submit(&mut session, "No").await;
        assert_eq!(outcome.verdict, Verdict::Correct);
    }
}
