//! Abacus tutor core
//!
//! Decomposes grade-school arithmetic exercises into the atomic sub-steps of
//! the written column method, checks answers and escalates hints.
//!
//! ```
//! use abacus_core::{engine, Cycle, EngineOptions, StepRequest, StepStatus};
//!
//! let options = EngineOptions::default();
//! let units = engine::step("47 + 28", &StepRequest::at(0), options, Cycle::C2);
//! assert_eq!(units.expected_answer.as_deref(), Some("5"));
//!
//! let done = engine::step("47 + 28", &StepRequest::at(units.next_step + 1), options, Cycle::C2);
//! assert_eq!(done.status, StepStatus::Done);
//! assert_eq!(done.expected_answer.as_deref(), Some("75"));
//! ```

pub mod answer;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod exercise;
pub mod hints;
pub mod number;
pub mod session;
pub mod step;
pub mod tutor;

pub use classifier::classify;
pub use config::{Config, Cycle, EngineOptions, HintConfig, LlmProvider, SubtractionConfig};
pub use error::{Result, TutorError};
pub use exercise::{Exercise, Operands, Operation, Topic};
pub use hints::{HintChain, HintRequest, HintStrategy, HintTier, StaticHints};
pub use session::{Attempt, PracticeSession, SessionStatus};
pub use step::{
    AnswerKind, Column, DivisionWork, Focus, FractionWork, HintKind, PlannedStep, ProductCell,
    StepPlan, StepRequest, StepResult, StepStatus,
};
pub use tutor::{SubmitOutcome, Tutor, Verdict};
