//! Hint tier escalation.
//!
//! A hint is chosen in two stages. First the consecutive error count is
//! clamped and mapped onto a [`HintTier`]; then a [`HintChain`] asks its
//! strategies in order and keeps the first non-empty text:
//!
//! 1. [`StaticHints`]: built-in generators per sub-step kind,
//! 2. [`ProviderHints`]: an optional external provider, such as an LLM
//!    command line tool,
//! 3. the configured fallback message.
//!
//! The chain never fails. A strategy that errors, times out or has nothing
//! to say simply yields `None` and the next one is asked.

pub mod provider;
mod templates;

use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};

use crate::config::{Cycle, HintConfig, LlmProvider};
use crate::exercise::Topic;
use crate::step::{Focus, HintKind, StepResult, StepStatus};

pub use provider::{CliHintProvider, HintProvider, ProviderHints};

// ============================================================================
// HintTier
// ============================================================================

/// How much of the solution a hint discloses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintTier {
    /// The rule only, with no numbers beyond those in the exercise.
    Rule,
    /// A partial concrete computation without the final digit.
    Partial,
    /// The full computation; the student states the conclusion.
    Worked,
    /// The literal expected answer.
    Answer,
}

impl HintTier {
    /// Upper bound of the error counter before tier lookup.
    #[must_use]
    pub const fn error_ceiling(topic: Topic) -> u32 {
        match topic {
            Topic::Addition | Topic::Subtraction => 9,
            Topic::Multiplication
            | Topic::Division
            | Topic::Fractions
            | Topic::Decimals
            | Topic::Percentages => 4,
        }
    }

    /// Clamps an error counter into `1..=error_ceiling(topic)`.
    ///
    /// Zero errors clamp to 1, so a help request before any mistake gets
    /// the first tier.
    #[must_use]
    pub fn clamp_errors(topic: Topic, error_count: u32) -> u32 {
        error_count.clamp(1, Self::error_ceiling(topic))
    }

    /// The tier for a number of consecutive wrong answers.
    ///
    /// # Examples
    ///
    /// ```
    /// use abacus_core::hints::HintTier;
    /// use abacus_core::Topic;
    ///
    /// assert_eq!(HintTier::for_errors(Topic::Addition, 0), HintTier::Rule);
    /// assert_eq!(HintTier::for_errors(Topic::Fractions, 3), HintTier::Worked);
    /// assert_eq!(HintTier::for_errors(Topic::Subtraction, 9), HintTier::Answer);
    /// ```
    #[must_use]
    pub fn for_errors(topic: Topic, error_count: u32) -> Self {
        match Self::clamp_errors(topic, error_count) {
            1 => Self::Rule,
            2 => Self::Partial,
            3 => Self::Worked,
            _ => Self::Answer,
        }
    }

    /// Numeric level, `1` to `4`.
    #[must_use]
    pub const fn level(&self) -> u8 {
        match self {
            Self::Rule => 1,
            Self::Partial => 2,
            Self::Worked => 3,
            Self::Answer => 4,
        }
    }
}

// ============================================================================
// HintRequest
// ============================================================================

/// Everything a strategy may use to build a hint for one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintRequest {
    /// Topic of the exercise.
    pub topic: Topic,
    /// Kind of sub-step.
    pub kind: HintKind,
    /// Expected answer of the step.
    pub expected: String,
    /// Numeric context of the step.
    pub focus: Focus,
    /// The question shown to the student.
    pub prompt: String,
    /// Consecutive wrong answers, before clamping.
    pub error_count: u32,
    /// Educational cycle tag.
    pub cycle: Cycle,
}

impl HintRequest {
    /// Builds a request from an `ask` result.
    ///
    /// Returns `None` for terminal results, which never carry hints.
    #[must_use]
    pub fn from_result(result: &StepResult, error_count: u32) -> Option<Self> {
        if result.status != StepStatus::Ask {
            return None;
        }
        Some(Self {
            topic: result.topic?,
            kind: result.hint_kind,
            expected: result.expected_answer.clone()?,
            focus: result.focus.clone(),
            prompt: result.message.clone(),
            error_count,
            cycle: result.cycle,
        })
    }

    /// The disclosure tier for this request.
    #[must_use]
    pub fn tier(&self) -> HintTier {
        HintTier::for_errors(self.topic, self.error_count)
    }
}

// ============================================================================
// Strategies
// ============================================================================

/// One link of the fallback chain.
pub trait HintStrategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Produces a hint, or `None` to let the next strategy try.
    fn hint<'a>(&'a self, request: &'a HintRequest) -> BoxFuture<'a, Option<String>>;
}

/// The built-in hint generators.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticHints;

impl StaticHints {
    /// Generates the static hint synchronously.
    #[must_use]
    pub fn generate(request: &HintRequest) -> Option<String> {
        templates::static_hint(request)
    }
}

impl HintStrategy for StaticHints {
    fn name(&self) -> &'static str {
        "static"
    }

    fn hint<'a>(&'a self, request: &'a HintRequest) -> BoxFuture<'a, Option<String>> {
        let hint = Self::generate(request);
        async move { hint }.boxed()
    }
}

/// An ordered list of strategies ending in a fixed fallback text.
pub struct HintChain {
    strategies: Vec<Box<dyn HintStrategy>>,
    fallback: String,
}

impl std::fmt::Debug for HintChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HintChain")
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl HintChain {
    /// A chain with no strategies; every request gets `fallback`.
    #[must_use]
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            strategies: Vec::new(),
            fallback: fallback.into(),
        }
    }

    /// Appends a strategy at the lowest priority so far.
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl HintStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Builds the standard chain: static hints, then the configured LLM
    /// provider if any, then the fallback message.
    #[must_use]
    pub fn from_config(config: &HintConfig) -> Self {
        let chain = Self::new(config.fallback_message.clone()).with_strategy(StaticHints);
        match config.llm_provider {
            LlmProvider::None => chain,
            provider => chain.with_strategy(ProviderHints::new(CliHintProvider::new(
                provider,
                config.timeout(),
            ))),
        }
    }

    /// Names of the strategies in order.
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Returns the first non-empty hint, or the fallback text.
    pub async fn hint(&self, request: &HintRequest) -> String {
        for strategy in &self.strategies {
            match strategy.hint(request).await {
                Some(text) if !text.trim().is_empty() => {
                    tracing::debug!(
                        strategy = strategy.name(),
                        kind = %request.kind,
                        tier = request.tier().level(),
                        "hint selected"
                    );
                    return text;
                }
                _ => {
                    tracing::debug!(strategy = strategy.name(), kind = %request.kind, "no hint, trying next");
                }
            }
        }
        self.fallback.clone()
    }
}
