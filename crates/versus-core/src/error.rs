//! Error types shared by the comparison pipeline.
//!
//! Every failure of a comparison request ends in the same user-visible state;
//! the variants exist so logs can tell the causes apart.

use std::path::PathBuf;

/// The user supplied too few subjects; raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputValidationError {
    #[error("Please enter at least 2 items to compare.")]
    TooFewItems { filled: usize },
}

/// The raw response cannot be read as a comparison at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("response is missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("response names {found} item(s), at least 2 are required")]
    TooFewItems { found: usize },
}

/// The external comparison generator failed or produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    #[error("unknown provider: {provider}")]
    UnknownProvider { provider: String },

    #[error("could not build LLM client: {message}")]
    Build { message: String },

    #[error("LLM request failed: {message}")]
    Transport { message: String },

    #[error("LLM provider rejected the request: {message}")]
    Rejected { message: String },

    #[error("LLM request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("LLM returned an empty response")]
    EmptyResponse,

    #[error("LLM response is not JSON: {message}")]
    Malformed { message: String },
}

impl CollaboratorError {
    /// Transient failures that a fresh attempt may fix.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("could not load settings from {path}: {message}")]
    Load { path: PathBuf, message: String },

    #[error("could not write settings to {path}: {message}")]
    Write { path: PathBuf, message: String },
}
