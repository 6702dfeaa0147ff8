//! Configuration types for the Abacus tutor.
//!
//! Configuration lives in an optional `abacus.json` file. A missing file
//! yields defaults; a present file must be valid JSON and pass
//! [`Config::validate`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TutorError};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "abacus.json";

/// Default numeric tolerance for decimal answers.
const fn default_decimal_tolerance() -> f64 {
    0.01
}

/// Default timeout in seconds for one hint provider call.
const fn default_hint_timeout() -> u32 {
    10
}

/// Default text shown when no hint strategy produced anything.
fn default_fallback_message() -> String {
    "Sorry, I don't have a hint for this step right now. Read the question again and try once more."
        .to_string()
}

/// Default value for boolean options that default to true.
const fn default_true() -> bool {
    true
}

/// Main configuration for the tutor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Educational cycle tag echoed in every step result.
    #[serde(default)]
    pub cycle: Cycle,

    /// Maximum absolute difference accepted for decimal answers.
    #[serde(default = "default_decimal_tolerance")]
    pub decimal_tolerance: f64,

    /// Subtraction behavior.
    #[serde(default)]
    pub subtraction: SubtractionConfig,

    /// Hint escalation settings.
    #[serde(default)]
    pub hints: HintConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cycle: Cycle::default(),
            decimal_tolerance: default_decimal_tolerance(),
            subtraction: SubtractionConfig::default(),
            hints: HintConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// Looks for `abacus.json` in the current directory and falls back to
    /// defaults when it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            TutorError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from `abacus.json` in a specific directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns `TutorError::ConfigParseError` if the file exists but contains
    /// invalid JSON or invalid enum values.
    ///
    /// Returns `TutorError::ConfigValidationError` if the configuration values
    /// are invalid (e.g., a zero tolerance or an empty fallback message).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(TutorError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| TutorError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// - `decimal_tolerance` must be a finite number in `(0, 1)`
    /// - `hints.timeout_seconds` must be greater than 0
    /// - `hints.fallback_message` must not be empty
    ///
    /// # Errors
    ///
    /// Returns `TutorError::ConfigValidationError` if any validation check fails.
    pub fn validate(&self) -> Result<()> {
        if !self.decimal_tolerance.is_finite()
            || self.decimal_tolerance <= 0.0
            || self.decimal_tolerance >= 1.0
        {
            return Err(TutorError::config_validation(
                format!(
                    "decimalTolerance must be between 0 and 1 (exclusive), got {}",
                    self.decimal_tolerance
                ),
                "Set decimalTolerance to a small positive number such as 0.01 in your abacus.json",
            ));
        }

        if self.hints.timeout_seconds == 0 {
            return Err(TutorError::config_validation(
                "hints.timeoutSeconds must be greater than 0",
                "Set hints.timeoutSeconds to at least 1 second in your abacus.json",
            ));
        }

        if self.hints.fallback_message.trim().is_empty() {
            return Err(TutorError::config_validation(
                "hints.fallbackMessage must not be empty",
                "Provide a short apology text in hints.fallbackMessage or remove the field to use the default",
            ));
        }

        Ok(())
    }

    /// Options passed to the step engines.
    #[must_use]
    pub const fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            swap_when_negative: self.subtraction.swap_when_negative,
        }
    }
}

/// Options that change how engines plan an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Swap subtraction operands when the first is smaller.
    pub swap_when_negative: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            swap_when_negative: default_true(),
        }
    }
}

/// Subtraction behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtractionConfig {
    /// When the first operand is smaller, swap the operands instead of
    /// rejecting the exercise.
    #[serde(default = "default_true")]
    pub swap_when_negative: bool,
}

impl Default for SubtractionConfig {
    fn default() -> Self {
        Self {
            swap_when_negative: default_true(),
        }
    }
}

/// Hint escalation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintConfig {
    /// Whether hints are attached to step results at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// External LLM command line tool consulted after the built-in hints.
    #[serde(default)]
    pub llm_provider: LlmProvider,

    /// Timeout for one provider call in seconds.
    #[serde(default = "default_hint_timeout")]
    pub timeout_seconds: u32,

    /// Text used when no strategy produced a hint.
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            llm_provider: LlmProvider::default(),
            timeout_seconds: default_hint_timeout(),
            fallback_message: default_fallback_message(),
        }
    }
}

impl HintConfig {
    /// The provider timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_seconds))
    }
}

// ============================================================================
// LlmProvider
// ============================================================================

/// Supported LLM command line tools for generic hints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LlmProvider {
    /// No provider; only built-in hints and the fallback text (default).
    #[default]
    None,
    /// Anthropic Claude CLI.
    Claude,
    /// `OpenAI` `Codex` CLI.
    Codex,
    /// Google Gemini CLI.
    Gemini,
}

impl LlmProvider {
    /// Parses a string into an `LlmProvider`, case-insensitively.
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" | "off" => Some(Self::None),
            "claude" => Some(Self::Claude),
            "codex" => Some(Self::Codex),
            "gemini" => Some(Self::Gemini),
            _ => None,
        }
    }

    /// Lowercase name used in config files and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Claude => "claude",
            Self::Codex => "codex",
            Self::Gemini => "gemini",
        }
    }
}

impl<'de> Deserialize<'de> for LlmProvider {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid LLM provider '{s}': expected one of 'none', 'claude', 'codex', 'gemini'"
            ))
        })
    }
}

impl Serialize for LlmProvider {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// Cycle
// ============================================================================

/// Educational cycle (grade band) tag.
///
/// Informational only: it is echoed in results and given to the hint
/// provider, but never changes the computed steps. Unknown tags fall back to
/// the default `c2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Cycle {
    /// First cycle, ages 6-8.
    C1,
    /// Second cycle, ages 8-10 (default).
    #[default]
    C2,
    /// Third cycle, ages 10-12.
    C3,
}

impl Cycle {
    /// Parses a cycle tag, case-insensitively, falling back to `c2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use abacus_core::Cycle;
    ///
    /// assert_eq!(Cycle::from_tag("C1"), Cycle::C1);
    /// assert_eq!(Cycle::from_tag("sixth grade"), Cycle::C2);
    /// ```
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "c1" => Self::C1,
            "c3" => Self::C3,
            _ => Self::C2,
        }
    }

    /// Lowercase tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::C1 => "c1",
            Self::C2 => "c2",
            Self::C3 => "c3",
        }
    }
}

impl std::fmt::Display for Cycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for Cycle {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&s))
    }
}

impl Serialize for Cycle {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
