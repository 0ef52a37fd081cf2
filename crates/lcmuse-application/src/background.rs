//! Background process: the IPC handlers.
//!
//! Every handler converts errors to strings here, so nothing reaches the shell
//! as a fault.

use lcmuse_core::ipc::{GenerateReply, ShellNotification, ShellRequest};
use lcmuse_core::suggestion::SuggestionRequest;
use tokio::sync::mpsc;

use crate::bridge::{BackgroundCommand, ShellBridge};
use crate::context::AppContext;

pub struct BackgroundProcess {
    context: AppContext,
    commands: mpsc::UnboundedReceiver<BackgroundCommand>,
    notifier: mpsc::UnboundedSender<ShellNotification>,
}

impl BackgroundProcess {
    /// Wires a background process to a new shell bridge.
    ///
    /// Returns the process, the bridge for the shell and the receiver of
    /// notifications pushed to the shell.
    pub fn new(
        context: AppContext,
    ) -> (Self, ShellBridge, mpsc::UnboundedReceiver<ShellNotification>) {
        let (command_tx, commands) = mpsc::unbounded_channel();
        let (notifier, notifications) = mpsc::unbounded_channel();
        let process = Self {
            context,
            commands,
            notifier,
        };
        (process, ShellBridge::new(command_tx), notifications)
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Handler for `generate-musical-response`.
    pub async fn generate_musical_response(&self, prompt: &str) -> GenerateReply {
        tracing::info!("[Background] Generating a suggestion");
        let result = self
            .context
            .suggestions
            .suggest(&SuggestionRequest::new(prompt))
            .await;
        GenerateReply::from(result)
    }

    /// Handler for the fire-and-forget shell channels.
    pub async fn handle(&self, request: ShellRequest) {
        match request {
            ShellRequest::SendScCode(response_text) => {
                let status = self.context.send_script.execute(&response_text).await;
                self.notify(ShellNotification::SendStatus(status));
            }
            ShellRequest::RequestUserId => {
                let user_id = self.context.identity.user_id.to_string();
                self.notify(ShellNotification::SetUserId(user_id));
            }
        }
    }

    fn notify(&self, notification: ShellNotification) {
        tracing::debug!("[IPC] <- {}", notification.channel().name());
        if self.notifier.send(notification).is_err() {
            tracing::warn!("[IPC] Shell is gone, notification dropped");
        }
    }

    /// Serves the shell until every bridge is dropped, then closes the OSC
    /// channels.
    pub async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            match command {
                BackgroundCommand::Generate { prompt, reply } => {
                    let result = self.generate_musical_response(&prompt).await;
                    if reply.send(result).is_err() {
                        tracing::warn!("[IPC] Shell stopped waiting for the suggestion");
                    }
                }
                BackgroundCommand::Request(request) => self.handle(request).await,
            }
        }
        tracing::info!("[Background] Shell disconnected");
        self.context.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history_recorder::HistoryRecorder;
    use crate::send_script::{OSC_NOT_INITIALIZED_STATUS, SendScriptUseCase};
    use crate::suggestion_service::SuggestionService;
    use crate::suggestion_service::tests::CannedGenerator;
    use lcmuse_core::LcmuseError;
    use lcmuse_core::config::AppConfig;
    use lcmuse_core::identity::{ResolvedIdentity, UserIdentity};
    use lcmuse_infrastructure::FileScriptArchiver;
    use lcmuse_interaction::OscChannels;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::net::UdpSocket;

    fn context(
        dir: &TempDir,
        generated: lcmuse_core::Result<String>,
        osc: Option<OscChannels>,
    ) -> AppContext {
        let config = AppConfig::with_app_dir(dir.path());
        let identity = ResolvedIdentity::remote(UserIdentity::new("uid-42"), "tok");
        let suggestions = SuggestionService::new(
            Arc::new(CannedGenerator(generated)),
            Arc::new(HistoryRecorder::disabled()),
        );
        let send_script = SendScriptUseCase::new(
            Arc::new(FileScriptArchiver::new(&config.scripts_dir)),
            osc.as_ref().map(|channels| channels.transport()),
        );
        AppContext::new(config, identity, suggestions, send_script, osc)
    }

    #[tokio::test]
    async fn test_generate_reply_shapes() {
        let dir = TempDir::new().unwrap();
        let (process, _bridge, _notifications) =
            BackgroundProcess::new(context(&dir, Ok("code".to_string()), None));
        assert_eq!(
            process.generate_musical_response("pad").await,
            GenerateReply::Code {
                code: "code".to_string()
            }
        );

        let (process, _bridge, _notifications) = BackgroundProcess::new(context(
            &dir,
            Err(LcmuseError::configuration_missing(
                "Gemini API key is not configured.",
            )),
            None,
        ));
        assert_eq!(
            process.generate_musical_response("pad").await,
            GenerateReply::Error {
                error: "Gemini API key is not configured.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_request_user_id_notifies_identity() {
        let dir = TempDir::new().unwrap();
        let (process, _bridge, mut notifications) =
            BackgroundProcess::new(context(&dir, Ok(String::new()), None));

        process.handle(ShellRequest::RequestUserId).await;

        assert_eq!(
            notifications.recv().await,
            Some(ShellNotification::SetUserId("uid-42".to_string()))
        );
    }

    #[tokio::test]
    async fn test_send_without_osc_reports_not_initialized() {
        let dir = TempDir::new().unwrap();
        let (process, _bridge, mut notifications) =
            BackgroundProcess::new(context(&dir, Ok(String::new()), None));

        process
            .handle(ShellRequest::SendScCode("x = 1;".to_string()))
            .await;

        assert_eq!(
            notifications.recv().await,
            Some(ShellNotification::SendStatus(
                OSC_NOT_INITIALIZED_STATUS.to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_run_serves_bridge_and_closes_channels() {
        let dir = TempDir::new().unwrap();
        let engine = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let settings = lcmuse_core::config::OscSettings {
            engine_host: "127.0.0.1".to_string(),
            engine_port: engine.local_addr().unwrap().port(),
            listen_host: "127.0.0.1".to_string(),
            listen_port: 0,
        };
        let channels = OscChannels::open(&settings).await.unwrap();
        let listen_addr = channels.listener().local_addr();
        let response = "```supercollider\n{ SinOsc.ar(440) * 0.1 }.play;\n```";
        let (process, bridge, mut notifications) = BackgroundProcess::new(context(
            &dir,
            Ok(response.to_string()),
            Some(channels),
        ));
        let task = tokio::spawn(process.run());

        let reply = bridge.generate_musical_response("a sine").await;
        let GenerateReply::Code { code } = reply else {
            panic!("expected code, got {reply:?}");
        };
        bridge.send_sc_code(code).unwrap();

        let Some(ShellNotification::SendStatus(status)) = notifications.recv().await else {
            panic!("expected a status");
        };
        assert!(status.starts_with("Code saved to suggestion_"), "{status}");

        let mut buf = vec![0u8; 4096];
        let (len, _) = engine.recv_from(&mut buf).await.unwrap();
        assert!(len > 0);

        drop(bridge);
        task.await.unwrap();
        UdpSocket::bind(listen_addr)
            .await
            .expect("listener port released on shutdown");
    }
}
