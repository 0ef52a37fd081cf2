//! Archive-then-send use case.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use lcmuse_core::Result;
use lcmuse_core::network::{NetworkMessage, ScriptTransport};
use lcmuse_core::script::{ArchivedScript, ExtractedScript, ScriptArchive};

pub const OSC_NOT_INITIALIZED_STATUS: &str = "Error: OSC client not initialized.";

/// Writes the script to the archive and then sends the same text to the
/// synthesis engine.
#[derive(Clone)]
pub struct SendScriptUseCase {
    archive: Arc<dyn ScriptArchive>,
    transport: Option<Arc<dyn ScriptTransport>>,
}

impl SendScriptUseCase {
    pub fn new(
        archive: Arc<dyn ScriptArchive>,
        transport: Option<Arc<dyn ScriptTransport>>,
    ) -> Self {
        Self { archive, transport }
    }

    pub fn has_transport(&self) -> bool {
        self.transport.is_some()
    }

    /// Runs the send flow for `response_text` and returns the status line for
    /// the shell.
    pub async fn execute(&self, response_text: &str) -> String {
        let Some(transport) = &self.transport else {
            tracing::error!("[Send] OSC client not initialized");
            return OSC_NOT_INITIALIZED_STATUS.to_string();
        };

        match archive_and_send(
            self.archive.as_ref(),
            transport.as_ref(),
            response_text,
            Utc::now(),
        )
        .await
        {
            Ok(archived) => format!(
                "Code saved to {} and sent to SuperCollider.",
                archived.file_name
            ),
            Err(e) => {
                tracing::error!("[Send] {}", e);
                e.to_string()
            }
        }
    }
}

/// The engine is only contacted once the archive write has succeeded, and
/// both receive the same bytes.
pub async fn archive_and_send(
    archive: &dyn ScriptArchive,
    transport: &dyn ScriptTransport,
    response_text: &str,
    at: DateTime<Utc>,
) -> Result<ArchivedScript> {
    let script = ExtractedScript::from_response(response_text);
    if !script.from_fenced_block() {
        tracing::debug!("[Send] No supercollider block found, sending the whole response");
    }

    let archived = archive.archive(&script, at).await?;
    transport.send(&NetworkMessage::execute(&script)).await?;
    Ok(archived)
}
