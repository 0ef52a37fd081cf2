//! OSC link to SuperCollider.
//!
//! # Module Structure
//!
//! - `client`: outbound sender to the engine port
//! - `listener`: inbound receive loop on the listen port
//! - this module: the pair opened and closed together

mod client;
mod listener;

use std::sync::Arc;

use lcmuse_core::Result;
use lcmuse_core::config::OscSettings;
use lcmuse_core::network::{InboundHandler, ScriptTransport};

pub use client::{MAX_DATAGRAM_SIZE, OscClient, encode_message};
pub use listener::{LoggingInboundHandler, OscListener};

/// The outbound client and inbound listener, owned for the process lifetime.
pub struct OscChannels {
    client: Arc<OscClient>,
    listener: OscListener,
}

impl OscChannels {
    /// Opens both channels with the logging inbound handler.
    pub async fn open(settings: &OscSettings) -> Result<Self> {
        Self::open_with_handler(settings, Arc::new(LoggingInboundHandler)).await
    }

    pub async fn open_with_handler(
        settings: &OscSettings,
        handler: Arc<dyn InboundHandler>,
    ) -> Result<Self> {
        let client = OscClient::bind(settings.engine_addr()?).await?;
        let listener = OscListener::spawn(settings.listen_addr()?, handler).await?;
        Ok(Self {
            client: Arc::new(client),
            listener,
        })
    }

    pub fn transport(&self) -> Arc<dyn ScriptTransport> {
        self.client.clone()
    }

    pub fn client(&self) -> &OscClient {
        &self.client
    }

    pub fn listener(&self) -> &OscListener {
        &self.listener
    }

    /// Stops the listener. The client socket is released with its last handle.
    pub async fn close(self) {
        self.listener.close().await;
        tracing::info!("[OSC] Channels closed");
    }
}
