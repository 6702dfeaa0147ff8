//! In-memory practice session state.
//!
//! A [`PracticeSession`] threads the two integers the engines need
//! (`step_index` and `error_count`) between calls and keeps a history of
//! every answer. It lives only as long as the process; nothing is written
//! to disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::exercise::Topic;
use crate::step::{StepRequest, StepResult};

// ============================================================================
// SessionStatus
// ============================================================================

/// Whether the student is still working on the exercise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// At least one `ask` step remains.
    #[default]
    InProgress,
    /// The engine returned its terminal result.
    Completed,
}

impl SessionStatus {
    /// Returns `true` once the exercise is finished.
    ///
    /// # Examples
    ///
    /// ```
    /// use abacus_core::SessionStatus;
    ///
    /// assert!(SessionStatus::Completed.is_terminal());
    /// assert!(!SessionStatus::InProgress.is_terminal());
    /// ```
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

// ============================================================================
// Attempt
// ============================================================================

/// One answer given by the student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    /// The step the answer was given for.
    pub step_index: usize,

    /// The raw answer text.
    pub answer: String,

    /// Whether the answer matched.
    pub correct: bool,

    /// Whether the answer was a request for help.
    pub help: bool,

    /// When the answer was given.
    pub at: DateTime<Utc>,
}

impl Attempt {
    /// Creates an attempt stamped with the current time.
    #[must_use]
    pub fn new(step_index: usize, answer: impl Into<String>, correct: bool, help: bool) -> Self {
        Self {
            step_index,
            answer: answer.into(),
            correct,
            help,
            at: Utc::now(),
        }
    }
}

// ============================================================================
// PracticeSession
// ============================================================================

/// The caller-side state of one exercise being practiced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeSession {
    /// Exercise text as entered.
    pub text: String,

    /// Topic of the exercise.
    pub topic: Topic,

    /// Current step pointer.
    pub step_index: usize,

    /// Consecutive wrong answers on the current step.
    pub error_count: u32,

    /// Whether the exercise is finished.
    pub status: SessionStatus,

    /// Every answer given so far.
    pub attempts: Vec<Attempt>,

    /// When the session started.
    pub started_at: DateTime<Utc>,

    /// When the session last changed.
    pub updated_at: DateTime<Utc>,

    current: StepResult,
}

impl PracticeSession {
    /// Creates a session positioned on `first`.
    #[must_use]
    pub fn new(text: impl Into<String>, topic: Topic, first: StepResult) -> Self {
        let now = Utc::now();
        let status = if first.status.is_terminal() {
            SessionStatus::Completed
        } else {
            SessionStatus::InProgress
        };
        Self {
            text: text.into(),
            topic,
            step_index: first.step_index,
            error_count: 0,
            status,
            attempts: Vec::new(),
            started_at: now,
            updated_at: now,
            current: first,
        }
    }

    /// The result the student is currently looking at.
    #[must_use]
    pub const fn current(&self) -> &StepResult {
        &self.current
    }

    /// Returns `true` once the exercise is finished.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// The request that re-renders the current step.
    #[must_use]
    pub fn request(&self) -> StepRequest {
        StepRequest::at(self.step_index).with_errors(self.error_count)
    }

    /// Number of correct answers.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.attempts.iter().filter(|a| a.correct).count()
    }

    /// Number of wrong answers, help requests excluded.
    #[must_use]
    pub fn mistake_count(&self) -> usize {
        self.attempts.iter().filter(|a| !a.correct && !a.help).count()
    }

    /// Records an answer.
    pub fn record(&mut self, attempt: Attempt) {
        self.attempts.push(attempt);
        self.touch();
    }

    /// Moves to `next` after a correct answer and resets the error counter.
    pub fn advance(&mut self, next: StepResult) {
        self.step_index = next.step_index;
        self.error_count = 0;
        if next.status.is_terminal() {
            self.status = SessionStatus::Completed;
        }
        self.current = next;
        self.touch();
    }

    /// Counts a mistake and shows `again`, the same step with its hint.
    pub fn retry(&mut self, again: StepResult) {
        self.error_count = self.error_count.saturating_add(1);
        self.show(again);
    }

    /// Replaces the current result without touching the counters.
    pub fn show(&mut self, result: StepResult) {
        self.current = result;
        self.touch();
    }

    /// Updates the `updated_at` timestamp to the current time.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Returns the duration since the session started.
    #[must_use]
    pub fn elapsed(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }
}
