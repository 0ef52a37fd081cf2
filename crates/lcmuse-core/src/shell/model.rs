//! Presentation shell state.
//!
//! Pure state; the front-end owns the event loop, timers and rendering.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::script::ExtractedScript;
use crate::suggestion::{SuggestionRequest, SuggestionResult};

/// How long a send status stays on screen.
pub const STATUS_DISPLAY: Duration = Duration::from_secs(5);

pub const EMPTY_PROMPT_MESSAGE: &str = "Please describe what you are playing in SuperCollider.";
pub const NOTHING_TO_SEND_MESSAGE: &str = "There is no code to send to SuperCollider.";
pub const SENDING_STATUS: &str = "Sending code to SuperCollider...";
pub const UNEXPECTED_REPLY_MESSAGE: &str = "Unexpected AI response.";

/// Derived phase of the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShellPhase {
    Idle,
    Loading,
    ShownSuccess,
    ShownError,
}

/// Identifies one status message so its timer only clears that message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusLine {
    text: String,
    ticket: StatusTicket,
}

/// Everything the shell displays.
#[derive(Debug, Clone, Default)]
pub struct ShellModel {
    prompt: String,
    response: String,
    error: String,
    status: Option<StatusLine>,
    user_id: String,
    loading: bool,
    next_ticket: u64,
}

impl ShellModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ShellPhase {
        if self.loading {
            ShellPhase::Loading
        } else if !self.response.is_empty() {
            ShellPhase::ShownSuccess
        } else if !self.error.is_empty() {
            ShellPhase::ShownError
        } else {
            ShellPhase::Idle
        }
    }

    /// The submit control is disabled while a request is in flight.
    pub fn can_submit(&self) -> bool {
        !self.loading
    }

    /// Starts a generation for `text`.
    ///
    /// Blank text sets the error message and returns `None`. Otherwise the
    /// previous response, error and status are cleared and the shell enters
    /// `Loading`.
    pub fn submit(&mut self, text: &str) -> Option<SuggestionRequest> {
        if !self.can_submit() {
            return None;
        }
        self.prompt = text.to_string();
        if text.trim().is_empty() {
            self.error = EMPTY_PROMPT_MESSAGE.to_string();
            return None;
        }
        self.loading = true;
        self.error.clear();
        self.response.clear();
        self.status = None;
        Some(SuggestionRequest::new(text))
    }

    /// Leaves `Loading` with the generator's outcome.
    pub fn apply_result(&mut self, result: SuggestionResult) {
        self.loading = false;
        match result {
            SuggestionResult::Success { raw_text } if !raw_text.is_empty() => {
                self.response = raw_text;
            }
            SuggestionResult::Success { .. } => {
                self.error = UNEXPECTED_REPLY_MESSAGE.to_string();
            }
            SuggestionResult::Failure { message } => {
                self.error = message;
            }
        }
    }

    /// Returns the response text to hand to the background process.
    ///
    /// The state does not change apart from the error being cleared and a
    /// "sending" status being shown.
    pub fn prepare_send(&mut self) -> Option<(String, StatusTicket)> {
        if self.response.trim().is_empty() {
            self.error = NOTHING_TO_SEND_MESSAGE.to_string();
            return None;
        }
        self.error.clear();
        let ticket = self.set_status(SENDING_STATUS);
        Some((self.response.clone(), ticket))
    }

    /// Back to `Idle`, discarding prompt, response, error and status.
    pub fn clear(&mut self) {
        self.prompt.clear();
        self.response.clear();
        self.error.clear();
        self.status = None;
    }

    /// Shows `text` as the status line and returns the ticket its timer
    /// must present to clear it.
    pub fn set_status(&mut self, text: impl Into<String>) -> StatusTicket {
        self.next_ticket += 1;
        let ticket = StatusTicket(self.next_ticket);
        self.status = Some(StatusLine {
            text: text.into(),
            ticket,
        });
        ticket
    }

    /// Clears the status if it is still the one `ticket` was issued for.
    ///
    /// Returns whether anything was cleared.
    pub fn expire_status(&mut self, ticket: StatusTicket) -> bool {
        match &self.status {
            Some(line) if line.ticket == ticket => {
                self.status = None;
                true
            }
            _ => false,
        }
    }

    pub fn set_user_id(&mut self, user_id: impl Into<String>) {
        self.user_id = user_id.into();
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|line| line.text.as_str())
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The code as it is displayed: the fenced block body, or the whole
    /// response trimmed.
    pub fn display_code(&self) -> String {
        ExtractedScript::from_response(&self.response).into_string()
    }
}
