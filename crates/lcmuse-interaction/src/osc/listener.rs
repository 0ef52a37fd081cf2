//! Inbound OSC listener.

use std::net::SocketAddr;
use std::sync::Arc;

use lcmuse_core::Result;
use lcmuse_core::network::{InboundHandler, InboundMessage};
use rosc::{OscPacket, OscType};
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const RECV_BUFFER_SIZE: usize = 65_536;

/// Handler that only logs what arrives.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingInboundHandler;

impl InboundHandler for LoggingInboundHandler {
    fn on_message(&self, message: InboundMessage) {
        tracing::info!(
            "[OSC] Message from SuperCollider {} {:?} ({})",
            message.address,
            message.args,
            message.from
        );
    }
}

/// Receive loop bound to the listen port.
pub struct OscListener {
    local_addr: SocketAddr,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl OscListener {
    /// Binds `addr` and starts dispatching decoded messages to `handler`.
    pub async fn spawn(addr: SocketAddr, handler: Arc<dyn InboundHandler>) -> Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        let local_addr = socket.local_addr()?;
        let cancel = CancellationToken::new();
        let task = tokio::spawn(receive_loop(socket, handler, cancel.clone()));
        tracing::info!("[OSC] Listening on {}", local_addr);
        Ok(Self {
            local_addr,
            cancel,
            task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops the loop and waits for the socket to be released.
    pub async fn close(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            tracing::warn!("[OSC] Listener task ended abnormally: {}", e);
        }
        tracing::info!("[OSC] Listener on {} closed", self.local_addr);
    }
}

async fn receive_loop(
    socket: UdpSocket,
    handler: Arc<dyn InboundHandler>,
    cancel: CancellationToken,
) {
    let mut buf = vec![0u8; RECV_BUFFER_SIZE];
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            received = socket.recv_from(&mut buf) => match received {
                Ok((len, from)) => dispatch(&buf[..len], from, handler.as_ref()),
                Err(e) => tracing::warn!("[OSC] Receive error: {}", e),
            },
        }
    }
}

fn dispatch(datagram: &[u8], from: SocketAddr, handler: &dyn InboundHandler) {
    match rosc::decoder::decode_udp(datagram) {
        Ok((_, packet)) => {
            for message in flatten(packet, from) {
                handler.on_message(message);
            }
        }
        Err(e) => tracing::warn!("[OSC] Dropped undecodable datagram from {}: {:?}", from, e),
    }
}

/// Unpacks bundles recursively into their messages.
fn flatten(packet: OscPacket, from: SocketAddr) -> Vec<InboundMessage> {
    match packet {
        OscPacket::Message(msg) => vec![InboundMessage {
            address: msg.addr,
            args: msg.args.iter().map(render_arg).collect(),
            from,
        }],
        OscPacket::Bundle(bundle) => bundle
            .content
            .into_iter()
            .flat_map(|inner| flatten(inner, from))
            .collect(),
    }
}

fn render_arg(arg: &OscType) -> String {
    match arg {
        OscType::String(s) => s.clone(),
        OscType::Int(i) => i.to_string(),
        OscType::Long(l) => l.to_string(),
        OscType::Float(f) => f.to_string(),
        OscType::Double(d) => d.to_string(),
        OscType::Bool(b) => b.to_string(),
        other => format!("{other:?}"),
    }
}
