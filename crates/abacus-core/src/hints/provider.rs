//! Generic hint providers.
//!
//! A [`HintProvider`] answers `(topic, step kind, context, error count)`
//! with an optional hint and never returns an error. [`CliHintProvider`]
//! runs one of the supported LLM command line tools as a child process.

use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::LlmProvider;
use crate::exercise::Topic;
use crate::step::HintKind;

use super::{HintRequest, HintStrategy};

/// A collaborator that may produce a hint for any step.
pub trait HintProvider: Send + Sync {
    /// Returns a hint, or `None` when none is available.
    ///
    /// Implementations swallow their own failures.
    fn get_hint<'a>(
        &'a self,
        topic: Topic,
        kind: HintKind,
        context: &'a str,
        error_count: u32,
    ) -> BoxFuture<'a, Option<String>>;
}

/// Asks an LLM command line tool for a short hint.
#[derive(Debug, Clone)]
pub struct CliHintProvider {
    provider: LlmProvider,
    timeout: Duration,
}

impl CliHintProvider {
    /// Creates a provider that gives each call at most `timeout`.
    #[must_use]
    pub const fn new(provider: LlmProvider, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// The program and arguments for a prompt, `None` without a provider.
    #[must_use]
    pub fn command_line(&self, prompt: &str) -> Option<(&'static str, Vec<String>)> {
        let (program, flag) = match self.provider {
            LlmProvider::None => return None,
            LlmProvider::Claude => ("claude", "-p"),
            LlmProvider::Codex => ("codex", "exec"),
            LlmProvider::Gemini => ("gemini", "-p"),
        };
        Some((program, vec![flag.to_string(), prompt.to_string()]))
    }

    /// The instruction sent to the tool.
    #[must_use]
    pub fn prompt(topic: Topic, kind: HintKind, context: &str, error_count: u32) -> String {
        format!(
            "You are a patient primary school maths teacher. A child is practicing {topic} \
             and is stuck on a step of kind '{kind}'. The question was: \"{context}\". \
             They have answered wrong {error_count} time(s). Give ONE short, encouraging hint \
             in plain text that helps them think, without giving the answer."
        )
    }

    async fn run(&self, prompt: String) -> Option<String> {
        let (program, args) = self.command_line(&prompt)?;
        let mut command = Command::new(program);
        command.args(&args).kill_on_drop(true);

        let output = match timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                tracing::warn!(provider = program, error = %e, "hint provider failed to start");
                return None;
            }
            Err(_) => {
                tracing::warn!(
                    provider = program,
                    timeout_secs = self.timeout.as_secs(),
                    "hint provider timed out"
                );
                return None;
            }
        };

        if !output.status.success() {
            tracing::warn!(
                provider = program,
                status = ?output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "hint provider exited with an error"
            );
            return None;
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            tracing::warn!(provider = program, "hint provider returned no text");
            return None;
        }
        Some(text)
    }
}

impl HintProvider for CliHintProvider {
    fn get_hint<'a>(
        &'a self,
        topic: Topic,
        kind: HintKind,
        context: &'a str,
        error_count: u32,
    ) -> BoxFuture<'a, Option<String>> {
        let prompt = Self::prompt(topic, kind, context, error_count);
        self.run(prompt).boxed()
    }
}

/// Adapts a [`HintProvider`] into a chain strategy.
#[derive(Debug, Clone)]
pub struct ProviderHints<P> {
    provider: P,
}

impl<P: HintProvider> ProviderHints<P> {
    /// Wraps a provider.
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: HintProvider> HintStrategy for ProviderHints<P> {
    fn name(&self) -> &'static str {
        "provider"
    }

    fn hint<'a>(&'a self, request: &'a HintRequest) -> BoxFuture<'a, Option<String>> {
        self.provider
            .get_hint(request.topic, request.kind, &request.prompt, request.error_count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::Cycle;
    use crate::hints::HintChain;
    use crate::step::Focus;

    struct Slow;

    impl HintProvider for Slow {
        fn get_hint<'a>(
            &'a self,
            _topic: Topic,
            _kind: HintKind,
            _context: &'a str,
            _error_count: u32,
        ) -> BoxFuture<'a, Option<String>> {
            async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Some("too late".to_string())
            }
            .boxed()
        }
    }

    struct Echo;

    impl HintProvider for Echo {
        fn get_hint<'a>(
            &'a self,
            topic: Topic,
            kind: HintKind,
            context: &'a str,
            error_count: u32,
        ) -> BoxFuture<'a, Option<String>> {
            let text = format!("{topic}/{kind}/{context}/{error_count}");
            async move { Some(text) }.boxed()
        }
    }

    fn request() -> HintRequest {
        HintRequest {
            topic: Topic::Division,
            kind: HintKind::DivGroup,
            expected: "15".to_string(),
            focus: Focus::None,
            prompt: "Which number do you start with?".to_string(),
            error_count: 2,
            cycle: Cycle::C2,
        }
    }

    #[test]
    fn test_command_lines() {
        let timeout = Duration::from_secs(1);
        let claude = CliHintProvider::new(LlmProvider::Claude, timeout);
        assert_eq!(
            claude.command_line("hi"),
            Some(("claude", vec!["-p".to_string(), "hi".to_string()]))
        );
        let codex = CliHintProvider::new(LlmProvider::Codex, timeout);
        assert_eq!(codex.command_line("hi").unwrap().1[0], "exec");
        let gemini = CliHintProvider::new(LlmProvider::Gemini, timeout);
        assert_eq!(gemini.command_line("hi").unwrap().0, "gemini");
        assert!(CliHintProvider::new(LlmProvider::None, timeout)
            .command_line("hi")
            .is_none());
    }

    #[test]
    fn test_prompt_keeps_answer_out() {
        let prompt = CliHintProvider::prompt(Topic::Addition, HintKind::AddColumn, "7 + 8?", 3);
        assert!(prompt.contains("addition"));
        assert!(prompt.contains("add_column"));
        assert!(prompt.contains("7 + 8?"));
        assert!(prompt.contains("without giving the answer"));
    }

    #[tokio::test]
    async fn test_no_provider_yields_none() {
        let provider = CliHintProvider::new(LlmProvider::None, Duration::from_secs(1));
        let hint = provider
            .get_hint(Topic::Addition, HintKind::AddColumn, "context", 1)
            .await;
        assert!(hint.is_none());
    }

    #[tokio::test]
    async fn test_provider_strategy_forwards_request() {
        let strategy = ProviderHints::new(Echo);
        let hint = strategy.hint(&request()).await.unwrap();
        assert_eq!(hint, "division/div_group/Which number do you start with?/2");
    }

    #[tokio::test]
    async fn test_slow_provider_falls_through_under_timeout() {
        struct Bounded<P>(P, Duration);

        impl<P: HintProvider> HintProvider for Bounded<P> {
            fn get_hint<'a>(
                &'a self,
                topic: Topic,
                kind: HintKind,
                context: &'a str,
                error_count: u32,
            ) -> BoxFuture<'a, Option<String>> {
                async move {
                    timeout(self.1, self.0.get_hint(topic, kind, context, error_count))
                        .await
                        .ok()
                        .flatten()
                }
                .boxed()
            }
        }

        let chain = HintChain::new("fallback")
            .with_strategy(ProviderHints::new(Bounded(Slow, Duration::from_millis(10))));
        assert_eq!(chain.hint(&request()).await, "fallback");
    }
}
