//! Outbound OSC sender.

use std::net::SocketAddr;

use lcmuse_core::network::{NetworkMessage, ScriptTransport};
use lcmuse_core::{LcmuseError, Result};
use rosc::{OscMessage, OscPacket, OscType};
use tokio::net::UdpSocket;

/// Largest payload a single IPv4 UDP datagram can carry.
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

/// Sends OSC messages to the synthesis engine from an ephemeral local port.
#[derive(Debug)]
pub struct OscClient {
    socket: UdpSocket,
    target: SocketAddr,
}

impl OscClient {
    /// Binds an ephemeral port on the same address family as `target`.
    pub async fn bind(target: SocketAddr) -> Result<Self> {
        let local: SocketAddr = if target.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        tracing::info!(
            "[OSC] Client ready on {} -> {}",
            socket.local_addr()?,
            target
        );
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

/// Encodes `message` as one OSC message with a single string argument.
pub fn encode_message(message: &NetworkMessage) -> Result<Vec<u8>> {
    let packet = OscPacket::Message(OscMessage {
        addr: message.address.clone(),
        args: vec![OscType::String(message.payload.clone())],
    });
    let bytes = rosc::encoder::encode(&packet)
        .map_err(|e| LcmuseError::network_send(format!("encode failed: {e:?}")))?;
    if bytes.len() > MAX_DATAGRAM_SIZE {
        return Err(LcmuseError::network_send(format!(
            "message is {} bytes, larger than a UDP datagram ({MAX_DATAGRAM_SIZE})",
            bytes.len()
        )));
    }
    Ok(bytes)
}

#[async_trait::async_trait]
impl ScriptTransport for OscClient {
    async fn send(&self, message: &NetworkMessage) -> Result<()> {
        let bytes = encode_message(message)?;
        self.socket
            .send_to(&bytes, self.target)
            .await
            .map_err(|e| LcmuseError::network_send(e.to_string()))?;
        tracing::info!(
            "[OSC] Sent {} ({} bytes) to {}",
            message.address,
            bytes.len(),
            self.target
        );
        Ok(())
    }
}
