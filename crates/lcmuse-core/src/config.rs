//! Resolved application configuration.
//!
//! Built once at startup by the infrastructure config service and shared
//! read-only afterwards.

use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use crate::error::{LcmuseError, Result};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_APP_ID: &str = "default-app-id";
pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// SuperCollider's default language port.
pub const DEFAULT_ENGINE_PORT: u16 = 57120;
/// Port this application listens on for engine feedback.
pub const DEFAULT_LISTEN_PORT: u16 = 57121;
pub const LOOPBACK_HOST: &str = "127.0.0.1";

/// Generation endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    /// `None` when unset or blank
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

/// Web SDK style Firebase configuration object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub project_id: String,
}

impl FirebaseConfig {
    /// Both the API key and project id are needed for sign-in and record writes.
    pub fn is_complete(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.project_id.trim().is_empty()
    }
}

/// OSC endpoints on both sides of the link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OscSettings {
    pub engine_host: String,
    pub engine_port: u16,
    pub listen_host: String,
    pub listen_port: u16,
}

impl Default for OscSettings {
    fn default() -> Self {
        Self {
            engine_host: LOOPBACK_HOST.to_string(),
            engine_port: DEFAULT_ENGINE_PORT,
            listen_host: LOOPBACK_HOST.to_string(),
            listen_port: DEFAULT_LISTEN_PORT,
        }
    }
}

impl OscSettings {
    pub fn engine_addr(&self) -> Result<SocketAddr> {
        resolve_addr(&self.engine_host, self.engine_port)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        resolve_addr(&self.listen_host, self.listen_port)
    }
}

fn resolve_addr(host: &str, port: u16) -> Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .map_err(|e| LcmuseError::config(format!("Invalid address {host}:{port}: {e}")))?
        .next()
        .ok_or_else(|| LcmuseError::config(format!("Address {host}:{port} did not resolve")))
}

/// Base URLs of the remote identity and record services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    pub identity_base_url: String,
    pub firestore_base_url: String,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            identity_base_url: DEFAULT_IDENTITY_BASE_URL.to_string(),
            firestore_base_url: DEFAULT_FIRESTORE_BASE_URL.to_string(),
        }
    }
}

/// Everything the application reads from its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub gemini: GeminiSettings,
    /// Namespace of history records in the record store
    pub app_id: String,
    /// `None` when missing, empty or unparseable
    pub firebase: Option<FirebaseConfig>,
    pub initial_auth_token: Option<String>,
    pub services: ServiceEndpoints,
    pub osc: OscSettings,
    pub scripts_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub log_filter: String,
    /// Problems found while loading, reported once logging is up
    pub diagnostics: Vec<String>,
}

impl AppConfig {
    /// Defaults rooted at `app_dir`.
    pub fn with_app_dir(app_dir: impl Into<PathBuf>) -> Self {
        let app_dir = app_dir.into();
        Self {
            gemini: GeminiSettings::default(),
            app_id: DEFAULT_APP_ID.to_string(),
            firebase: None,
            initial_auth_token: None,
            services: ServiceEndpoints::default(),
            osc: OscSettings::default(),
            scripts_dir: app_dir.join("supercollider_scripts").join("generated"),
            logs_dir: app_dir.join("logs"),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            diagnostics: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_loopback() {
        let osc = OscSettings::default();
        assert_eq!(osc.engine_addr().unwrap(), "127.0.0.1:57120".parse().unwrap());
        assert_eq!(osc.listen_addr().unwrap(), "127.0.0.1:57121".parse().unwrap());
    }

    #[test]
    fn test_scripts_dir_under_app_dir() {
        let config = AppConfig::with_app_dir("/tmp/lcmuse");
        assert_eq!(
            config.scripts_dir,
            PathBuf::from("/tmp/lcmuse/supercollider_scripts/generated")
        );
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.app_id, "default-app-id");
    }

    #[test]
    fn test_firebase_config_completeness() {
        let parsed: FirebaseConfig =
            serde_json::from_str(r#"{"apiKey":"k","projectId":"p","authDomain":"d","appId":"x"}"#)
                .unwrap();
        assert!(parsed.is_complete());
        assert!(!FirebaseConfig::default().is_complete());
    }
}
