//! Structured error types shared across stylefit crates.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`StyleFitError`] variant.
///
/// Every failure in this system is about at most one thing (a source file,
/// a tool binary, an option), so the payload carries a single optional
/// `subject` rather than a general context map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// The path, tool or option name the error is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            subject: None,
            hint: None,
        }
    }

    /// Names the path, tool or option this error is about.
    pub fn about(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Attaches a remediation hint for the caller.
    pub fn suggest(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(subject) = &self.subject {
            write!(f, ": {subject}")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " ({hint})")?;
        }
        Ok(())
    }
}

/// Canonical error type for the stylefit engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum StyleFitError {
    /// Formatter adapter errors (tool missing, bad invocation, bad output).
    #[error("formatter error: {0}")]
    Formatter(ErrorInfo),
    /// Diff metric errors (backend missing, backend miscounting).
    #[error("metric error: {0}")]
    Metric(ErrorInfo),
    /// Evaluation cache and persistent store errors.
    #[error("cache error: {0}")]
    Cache(ErrorInfo),
    /// Search engine errors (no baseline, invalid request).
    #[error("search error: {0}")]
    Search(ErrorInfo),
    /// Source corpus errors (unreadable or empty inputs).
    #[error("corpus error: {0}")]
    Corpus(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl StyleFitError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            StyleFitError::Formatter(info)
            | StyleFitError::Metric(info)
            | StyleFitError::Cache(info)
            | StyleFitError::Search(info)
            | StyleFitError::Corpus(info)
            | StyleFitError::Serde(info) => info,
        }
    }

    /// Returns true when the error carries the given stable code.
    pub fn has_code(&self, code: &str) -> bool {
        self.info().code == code
    }
}

/// Stable code for a formatter whose tool cannot be located or run.
pub const CODE_FORMATTER_UNAVAILABLE: &str = "formatter-unavailable";
/// Stable code for a search where every base style failed on every file.
pub const CODE_NO_BASELINE: &str = "no-baseline";
/// Stable code for a pair on which every diff backend failed.
pub const CODE_METRIC_UNAVAILABLE: &str = "metric-unavailable";
/// Stable code for a subprocess exceeding its wall-clock timeout.
pub const CODE_EVALUATION_TIMEOUT: &str = "evaluation-timeout";
/// Stable code for a search hitting its iteration bound.
pub const CODE_SEARCH_DID_NOT_CONVERGE: &str = "search-did-not-converge";
/// Stable code for a search interrupted by external cancellation.
pub const CODE_CANCELLED: &str = "cancelled";
