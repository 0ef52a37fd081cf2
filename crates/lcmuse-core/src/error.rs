//! Error types for the lcmuse application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire lcmuse application.
///
/// The `Display` output of every variant is the message shown to the user,
/// so handlers at an IPC boundary can call `to_string()` and forward it.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum LcmuseError {
    /// A required setting (API key, service config) is missing
    #[error("{0}")]
    ConfigurationMissing(String),

    /// The remote endpoint answered with a non-success status
    #[error("API error: {diagnostic}")]
    RemoteStatus { status: u16, diagnostic: String },

    /// The remote call itself failed (connect, timeout, body encoding)
    #[error("Communication error with the AI: {0}")]
    RemoteTransport(String),

    /// The remote endpoint answered with an unexpected body shape
    #[error("Unexpected AI response. Please try again.")]
    MalformedRemoteResponse,

    /// Writing an archived script to disk failed
    #[error("Error saving the SC file: {0}")]
    FilesystemWriteFailed(String),

    /// Sending an OSC message to the synthesis engine failed
    #[error("Error sending OSC: {0}")]
    NetworkSendFailed(String),

    /// The identity service is unavailable or rejected sign-in
    #[error("Identity provider unavailable: {0}")]
    IdentityProviderUnavailable(String),

    /// The remote record store rejected or failed a write
    #[error("Record store error: {0}")]
    RecordStore(String),

    /// An IPC channel name that is not whitelisted for the requested direction
    #[error("Invalid IPC channel: {0}")]
    InvalidChannel(String),

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system or socket operations)
    #[error("IO error: {message}")]
    Io { message: String },
}

impl LcmuseError {
    /// Creates a ConfigurationMissing error
    pub fn configuration_missing(message: impl Into<String>) -> Self {
        Self::ConfigurationMissing(message.into())
    }

    /// Creates a RemoteTransport error
    pub fn remote_transport(message: impl Into<String>) -> Self {
        Self::RemoteTransport(message.into())
    }

    /// Creates a FilesystemWriteFailed error
    pub fn filesystem_write(message: impl Into<String>) -> Self {
        Self::FilesystemWriteFailed(message.into())
    }

    /// Creates a NetworkSendFailed error
    pub fn network_send(message: impl Into<String>) -> Self {
        Self::NetworkSendFailed(message.into())
    }

    /// Creates an IdentityProviderUnavailable error
    pub fn identity_unavailable(message: impl Into<String>) -> Self {
        Self::IdentityProviderUnavailable(message.into())
    }

    /// Creates a RecordStore error
    pub fn record_store(message: impl Into<String>) -> Self {
        Self::RecordStore(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Check if this is a configuration error of either kind
    pub fn is_config(&self) -> bool {
        matches!(self, Self::ConfigurationMissing(_) | Self::Config(_))
    }
}

impl From<std::io::Error> for LcmuseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

/// A type alias for `Result<T, LcmuseError>`.
pub type Result<T> = std::result::Result<T, LcmuseError>;
