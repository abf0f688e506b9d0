//! State of one comparison session, changed only through named transitions.
//!
//! ```text
//! Idle ──submit──▶ Analyzing ──begin_generating──▶ Generating
//!                      │                              │
//!                      └──────receive_result/error────┴──▶ Complete | Error ──submit──▶ Analyzing
//! ```

use serde_json::Value;

use crate::error::{CollaboratorError, InputValidationError};
use crate::normalize::normalize;
use crate::{ComparisonResult, MAX_ITEMS, MIN_ITEMS};

/// Shown for every failed request, whatever the cause.
pub const FAILURE_MESSAGE: &str =
    "Failed to generate comparison. Please try again or check your API key.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Analyzing,
    Generating,
    Complete,
    Error,
}

impl Phase {
    pub fn is_pending(self) -> bool {
        matches!(self, Phase::Analyzing | Phase::Generating)
    }

    /// Status line while a request is in flight.
    pub fn status(self) -> Option<&'static str> {
        match self {
            Phase::Analyzing => Some("Understanding Context..."),
            Phase::Generating => Some("Comparing Attributes..."),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Input(#[from] InputValidationError),

    #[error("a comparison is already in progress")]
    Pending,
}

#[derive(Debug, Clone)]
pub struct Session {
    items: Vec<String>,
    phase: Phase,
    result: Option<ComparisonResult>,
    error: Option<String>,
    submitted: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh session with two empty input fields.
    pub fn new() -> Self {
        Self {
            items: vec![String::new(); MIN_ITEMS],
            phase: Phase::Idle,
            result: None,
            error: None,
            submitted: 0,
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn result(&self) -> Option<&ComparisonResult> {
        self.result.as_ref()
    }

    /// The user-visible error of the last action, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.phase.is_pending()
    }

    pub fn can_submit(&self) -> bool {
        !self.is_pending()
    }

    pub fn set_item(&mut self, index: usize, text: impl Into<String>) {
        if let Some(slot) = self.items.get_mut(index) {
            *slot = text.into();
        }
    }

    /// Append an empty field. Returns false when the form is already full.
    pub fn add_item(&mut self) -> bool {
        if self.items.len() >= MAX_ITEMS {
            return false;
        }
        self.items.push(String::new());
        true
    }

    /// Remove a field. Returns false when only the minimum remain or `index` is out of range.
    pub fn remove_item(&mut self, index: usize) -> bool {
        if self.items.len() <= MIN_ITEMS || index >= self.items.len() {
            return false;
        }
        self.items.remove(index);
        true
    }

    /// Validate the form and start a request, returning the trimmed labels to send.
    pub fn submit_comparison(&mut self) -> Result<Vec<String>, SubmitError> {
        if self.is_pending() {
            return Err(SubmitError::Pending);
        }

        let filled: Vec<String> = self
            .items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if filled.len() < MIN_ITEMS {
            let err = InputValidationError::TooFewItems {
                filled: filled.len(),
            };
            self.error = Some(err.to_string());
            return Err(err.into());
        }

        tracing::info!(items = ?filled, "submitting comparison");
        self.phase = Phase::Analyzing;
        self.error = None;
        self.result = None;
        self.submitted = filled.len();
        Ok(filled)
    }

    pub fn begin_generating(&mut self) {
        if self.phase == Phase::Analyzing {
            self.phase = Phase::Generating;
        }
    }

    /// Accept the generator's payload. Unusable payloads end the request in `Error`.
    pub fn receive_result(&mut self, raw: &Value) {
        if !self.is_pending() {
            tracing::warn!(phase = ?self.phase, "ignoring result with no request in flight");
            return;
        }
        match normalize(raw, self.submitted) {
            Ok(result) => {
                tracing::info!(
                    criteria = result.criteria.len(),
                    "comparison complete"
                );
                self.result = Some(result);
                self.phase = Phase::Complete;
            }
            Err(e) => {
                tracing::error!(kind = "schema", error = %e, "comparison response rejected");
                self.fail();
            }
        }
    }

    pub fn receive_error(&mut self, err: &CollaboratorError) {
        if !self.is_pending() {
            tracing::warn!(phase = ?self.phase, "ignoring error with no request in flight");
            return;
        }
        tracing::error!(kind = "collaborator", error = %err, "comparison request failed");
        self.fail();
    }

    fn fail(&mut self) {
        self.result = None;
        self.error = Some(FAILURE_MESSAGE.to_string());
        self.phase = Phase::Error;
    }
}
