//! Error types for the Abacus tutor core.
//!
//! Exercise problems (unrecognized text, undefined computations) and
//! configuration problems share one error enum. Every message ends with an
//! actionable suggestion the caller can show as-is.

use std::path::PathBuf;

/// A specialized `Result` type for tutor operations.
pub type Result<T> = std::result::Result<T, TutorError>;

/// Errors that can occur while classifying, planning or configuring.
#[derive(Debug, thiserror::Error)]
pub enum TutorError {
    // ========================================================================
    // Exercise Errors
    // ========================================================================
    /// No classifier rule matched the exercise text.
    #[error("Exercise not recognized: '{input}'\n\nSuggestion: Write the exercise as 'number operator number', for example '47 + 28' or '3/4 + 1/2'")]
    NotRecognized {
        /// The raw exercise text.
        input: String,
    },

    /// The exercise was recognized but its computation is undefined.
    ///
    /// Covers zero denominators, zero divisors, numbers too large for exact
    /// arithmetic and negative differences when swapping is disabled.
    #[error("Exercise cannot be solved step by step: '{input}': {reason}\n\nSuggestion: {suggestion}")]
    DegenerateInput {
        /// The raw exercise text.
        input: String,
        /// What makes the computation undefined.
        reason: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your abacus.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TutorError {
    /// Creates a new `NotRecognized` error for the given exercise text.
    #[must_use]
    pub fn not_recognized(input: impl Into<String>) -> Self {
        Self::NotRecognized {
            input: input.into(),
        }
    }

    /// Creates a new `DegenerateInput` error.
    #[must_use]
    pub fn degenerate(
        input: impl Into<String>,
        reason: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::DegenerateInput {
            input: input.into(),
            reason: reason.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a `DegenerateInput` error for arithmetic that leaves the exact range.
    #[must_use]
    pub fn too_large(input: impl Into<String>) -> Self {
        Self::degenerate(
            input,
            "the numbers are too large to work through exactly",
            "Use smaller numbers (up to 18 digits)",
        )
    }

    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Returns `true` if the error was caused by the exercise text itself.
    ///
    /// Input errors are rendered as a step result with `error` status; they
    /// never abort a session.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::NotRecognized { .. } | Self::DegenerateInput { .. }
        )
    }

    /// Returns `true` if this error should stop the process.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigParseError { .. } | Self::ConfigValidationError { .. }
        )
    }

    /// Returns the user-facing headline without the suggestion paragraph.
    #[must_use]
    pub fn headline(&self) -> String {
        let message = self.to_string();
        message
            .split("\n\nSuggestion:")
            .next()
            .unwrap_or_default()
            .to_string()
    }
}
