//! Remote interaction layer: the Gemini text generator and the OSC link.

pub mod gemini_api_client;
pub mod osc;
pub mod prompt;

pub use gemini_api_client::GeminiApiClient;
pub use osc::{LoggingInboundHandler, OscChannels, OscClient, OscListener};
