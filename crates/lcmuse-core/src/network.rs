//! Messages exchanged with the synthesis engine.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::error::Result;
use crate::script::ExtractedScript;

/// OSC address the SuperCollider side listens on for code to evaluate.
pub const EXECUTE_SC_CODE_ADDRESS: &str = "/execute_sc_code";

/// Fire-and-forget message to the synthesis engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkMessage {
    pub address: String,
    pub payload: String,
}

impl NetworkMessage {
    /// Builds the `/execute_sc_code` message carrying exactly the script text.
    pub fn execute(script: &ExtractedScript) -> Self {
        Self {
            address: EXECUTE_SC_CODE_ADDRESS.to_string(),
            payload: script.as_str().to_string(),
        }
    }
}

/// A message received from the synthesis engine.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub address: String,
    /// Arguments rendered as text for logging
    pub args: Vec<String>,
    pub from: SocketAddr,
}

/// Outbound channel to the synthesis engine.
///
/// Success means the transport accepted the datagram; the engine never acknowledges.
#[async_trait::async_trait]
pub trait ScriptTransport: Send + Sync {
    async fn send(&self, message: &NetworkMessage) -> Result<()>;
}

/// Hook for messages arriving from the synthesis engine.
///
/// Nothing is forwarded to the shell today; implementations decide what, if
/// anything, to do with each message.
pub trait InboundHandler: Send + Sync {
    fn on_message(&self, message: InboundMessage);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_message_carries_script_bytes() {
        let script = ExtractedScript::from_response(
            "```supercollider\n{ LPF.ar(Saw.ar(80), 400) }.play;\n```",
        );
        let message = NetworkMessage::execute(&script);
        assert_eq!(message.address, "/execute_sc_code");
        assert_eq!(message.payload.as_bytes(), script.as_bytes());
    }
}
