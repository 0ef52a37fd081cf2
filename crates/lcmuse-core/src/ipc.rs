//! Channels between the presentation shell and the background process.
//!
//! Only whitelisted channel names may be used, and each only in its own
//! direction.

use serde::{Deserialize, Serialize};

use crate::error::{LcmuseError, Result};
use crate::suggestion::SuggestionResult;

pub const GENERATE_MUSICAL_RESPONSE: &str = "generate-musical-response";
pub const SEND_SC_CODE: &str = "send-sc-code";
pub const REQUEST_USER_ID: &str = "request-user-id";
pub const SET_USER_ID: &str = "set-user-id";
pub const SEND_STATUS: &str = "send-status";

/// How a channel is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Shell → background, awaits a reply
    Invoke,
    /// Shell → background, fire-and-forget
    Send,
    /// Background → shell, fire-and-forget
    On,
}

/// Every channel the shell and background process share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpcChannel {
    GenerateMusicalResponse,
    SendScCode,
    RequestUserId,
    SetUserId,
    SendStatus,
}

impl IpcChannel {
    pub const ALL: [IpcChannel; 5] = [
        IpcChannel::GenerateMusicalResponse,
        IpcChannel::SendScCode,
        IpcChannel::RequestUserId,
        IpcChannel::SetUserId,
        IpcChannel::SendStatus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IpcChannel::GenerateMusicalResponse => GENERATE_MUSICAL_RESPONSE,
            IpcChannel::SendScCode => SEND_SC_CODE,
            IpcChannel::RequestUserId => REQUEST_USER_ID,
            IpcChannel::SetUserId => SET_USER_ID,
            IpcChannel::SendStatus => SEND_STATUS,
        }
    }

    pub fn kind(self) -> ChannelKind {
        match self {
            IpcChannel::GenerateMusicalResponse => ChannelKind::Invoke,
            IpcChannel::SendScCode | IpcChannel::RequestUserId => ChannelKind::Send,
            IpcChannel::SetUserId | IpcChannel::SendStatus => ChannelKind::On,
        }
    }

    /// Resolves `name` for use as `kind`, rejecting unknown names and
    /// channels used in the wrong direction.
    pub fn resolve(name: &str, kind: ChannelKind) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|channel| channel.name() == name && channel.kind() == kind)
            .ok_or_else(|| LcmuseError::InvalidChannel(name.to_string()))
    }
}

/// Fire-and-forget requests from the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellRequest {
    /// Archive and send the response text last shown to the user
    SendScCode(String),
    RequestUserId,
}

impl ShellRequest {
    pub fn channel(&self) -> IpcChannel {
        match self {
            ShellRequest::SendScCode(_) => IpcChannel::SendScCode,
            ShellRequest::RequestUserId => IpcChannel::RequestUserId,
        }
    }
}

/// Notifications pushed to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellNotification {
    SetUserId(String),
    SendStatus(String),
}

impl ShellNotification {
    pub fn channel(&self) -> IpcChannel {
        match self {
            ShellNotification::SetUserId(_) => IpcChannel::SetUserId,
            ShellNotification::SendStatus(_) => IpcChannel::SendStatus,
        }
    }
}

/// Reply of `generate-musical-response`: `{code}` or `{error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerateReply {
    Code { code: String },
    Error { error: String },
}

impl From<SuggestionResult> for GenerateReply {
    fn from(result: SuggestionResult) -> Self {
        match result {
            SuggestionResult::Success { raw_text } => GenerateReply::Code { code: raw_text },
            SuggestionResult::Failure { message } => GenerateReply::Error { error: message },
        }
    }
}

impl From<GenerateReply> for SuggestionResult {
    fn from(reply: GenerateReply) -> Self {
        match reply {
            GenerateReply::Code { code } => SuggestionResult::success(code),
            GenerateReply::Error { error } => SuggestionResult::failure(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_whitelisted_channels() {
        assert_eq!(
            IpcChannel::resolve("generate-musical-response", ChannelKind::Invoke).unwrap(),
            IpcChannel::GenerateMusicalResponse
        );
        assert_eq!(
            IpcChannel::resolve("send-sc-code", ChannelKind::Send).unwrap(),
            IpcChannel::SendScCode
        );
        assert_eq!(
            IpcChannel::resolve("send-status", ChannelKind::On).unwrap(),
            IpcChannel::SendStatus
        );
    }

    #[test]
    fn test_resolve_rejects_wrong_direction() {
        let err = IpcChannel::resolve("send-sc-code", ChannelKind::Invoke).unwrap_err();
        assert!(matches!(err, LcmuseError::InvalidChannel(ref name) if name == "send-sc-code"));
        assert!(IpcChannel::resolve("set-user-id", ChannelKind::Send).is_err());
    }

    #[test]
    fn test_resolve_rejects_unknown_channel() {
        assert!(IpcChannel::resolve("open-devtools", ChannelKind::Send).is_err());
    }

    #[test]
    fn test_generate_reply_json_shape() {
        let code = GenerateReply::from(SuggestionResult::success("x"));
        assert_eq!(serde_json::to_string(&code).unwrap(), r#"{"code":"x"}"#);

        let error = GenerateReply::from(SuggestionResult::failure("boom"));
        assert_eq!(serde_json::to_string(&error).unwrap(), r#"{"error":"boom"}"#);

        let parsed: GenerateReply = serde_json::from_str(r#"{"error":"nope"}"#).unwrap();
        assert_eq!(parsed, GenerateReply::Error { error: "nope".into() });
    }
}
