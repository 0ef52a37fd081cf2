//! Shell side of the IPC channels.

use lcmuse_core::ipc::{ChannelKind, GenerateReply, IpcChannel, ShellRequest};
use lcmuse_core::{LcmuseError, Result};
use tokio::sync::{mpsc, oneshot};

/// A message travelling from the shell to the background process.
#[derive(Debug)]
pub enum BackgroundCommand {
    /// `generate-musical-response`
    Generate {
        prompt: String,
        reply: oneshot::Sender<GenerateReply>,
    },
    Request(ShellRequest),
}

/// Handle the shell uses to reach the background process.
///
/// Only whitelisted channel names are accepted by the name-based entry points.
#[derive(Debug, Clone)]
pub struct ShellBridge {
    commands: mpsc::UnboundedSender<BackgroundCommand>,
}

impl ShellBridge {
    pub(crate) fn new(commands: mpsc::UnboundedSender<BackgroundCommand>) -> Self {
        Self { commands }
    }

    /// Invokes `generate-musical-response` and waits for the reply.
    pub async fn generate_musical_response(&self, prompt: impl Into<String>) -> GenerateReply {
        let (reply, response) = oneshot::channel();
        let command = BackgroundCommand::Generate {
            prompt: prompt.into(),
            reply,
        };
        if self.commands.send(command).is_err() {
            return GenerateReply::Error {
                error: "The background process is not running.".to_string(),
            };
        }
        response.await.unwrap_or_else(|_| GenerateReply::Error {
            error: "The background process stopped before replying.".to_string(),
        })
    }

    /// Invokes a request/response channel by name.
    pub async fn invoke(&self, channel: &str, payload: impl Into<String>) -> Result<GenerateReply> {
        match IpcChannel::resolve(channel, ChannelKind::Invoke)? {
            IpcChannel::GenerateMusicalResponse => {
                Ok(self.generate_musical_response(payload).await)
            }
            other => Err(LcmuseError::InvalidChannel(other.name().to_string())),
        }
    }

    /// Fires a shell-to-background message.
    pub fn send(&self, request: ShellRequest) -> Result<()> {
        tracing::debug!("[IPC] -> {}", request.channel().name());
        self.commands
            .send(BackgroundCommand::Request(request))
            .map_err(|_| LcmuseError::io("background process is not running"))
    }

    /// Fires a shell-to-background message by channel name.
    pub fn send_named(&self, channel: &str, payload: Option<String>) -> Result<()> {
        let request = match IpcChannel::resolve(channel, ChannelKind::Send)? {
            IpcChannel::SendScCode => ShellRequest::SendScCode(payload.unwrap_or_default()),
            IpcChannel::RequestUserId => ShellRequest::RequestUserId,
            other => return Err(LcmuseError::InvalidChannel(other.name().to_string())),
        };
        self.send(request)
    }

    pub fn send_sc_code(&self, response_text: impl Into<String>) -> Result<()> {
        self.send(ShellRequest::SendScCode(response_text.into()))
    }

    pub fn request_user_id(&self) -> Result<()> {
        self.send(ShellRequest::RequestUserId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_named_maps_whitelisted_channels() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let bridge = ShellBridge::new(tx);

        bridge.send_named("request-user-id", None).unwrap();
        bridge
            .send_named("send-sc-code", Some("x = 1;".to_string()))
            .unwrap();

        assert!(matches!(
            rx.try_recv().unwrap(),
            BackgroundCommand::Request(ShellRequest::RequestUserId)
        ));
        match rx.try_recv().unwrap() {
            BackgroundCommand::Request(ShellRequest::SendScCode(text)) => {
                assert_eq!(text, "x = 1;")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unknown_or_wrong_direction_channel_is_rejected() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let bridge = ShellBridge::new(tx);

        for name in ["delete-everything", "set-user-id", "generate-musical-response"] {
            let err = bridge.send_named(name, None).unwrap_err();
            assert!(matches!(err, LcmuseError::InvalidChannel(_)), "{name}");
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_invoke_rejects_send_channel() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let bridge = ShellBridge::new(tx);
        let err = bridge.invoke("send-sc-code", "x").await.unwrap_err();
        assert!(matches!(err, LcmuseError::InvalidChannel(_)));
    }

    #[tokio::test]
    async fn test_generate_without_background_is_error_reply() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let bridge = ShellBridge::new(tx);
        let reply = bridge.generate_musical_response("pad").await;
        assert!(matches!(reply, GenerateReply::Error { .. }));
    }
}
