//! Suggestion request/result types and the text generation seam.

use serde::{Deserialize, Serialize};

use crate::error::{LcmuseError, Result};

/// A single generation request built from the user's description.
///
/// The shell rejects blank input before one of these is created; the generator
/// does not re-validate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub prompt_text: String,
}

impl SuggestionRequest {
    pub fn new(prompt_text: impl Into<String>) -> Self {
        Self {
            prompt_text: prompt_text.into(),
        }
    }
}

/// Outcome of one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SuggestionResult {
    Success { raw_text: String },
    Failure { message: String },
}

impl SuggestionResult {
    pub fn success(raw_text: impl Into<String>) -> Self {
        Self::Success {
            raw_text: raw_text.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::Success { raw_text } => Some(raw_text),
            Self::Failure { .. } => None,
        }
    }
}

impl From<Result<String>> for SuggestionResult {
    fn from(result: Result<String>) -> Self {
        match result {
            Ok(text) => Self::success(text),
            Err(err) => Self::from(err),
        }
    }
}

impl From<LcmuseError> for SuggestionResult {
    fn from(err: LcmuseError) -> Self {
        Self::failure(err.to_string())
    }
}

/// Remote text generation endpoint.
///
/// Implementations compose the instruction preamble with the user's text and
/// return the first candidate's text.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &SuggestionRequest) -> Result<String>;
}
