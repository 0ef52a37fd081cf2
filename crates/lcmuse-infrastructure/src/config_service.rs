//! Configuration service implementation.
//!
//! Resolves `AppConfig` from built-in defaults, the optional
//! `~/.config/lcmuse/config.toml`, and the process environment, in that
//! order of precedence (environment wins).

use lcmuse_core::config::{AppConfig, FirebaseConfig};
use lcmuse_core::{LcmuseError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::paths::{HOME_ENV, LcmusePaths};

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const GEMINI_MODEL_ENV: &str = "GEMINI_MODEL";
pub const APP_ID_ENV: &str = "__APP_ID";
pub const FIREBASE_CONFIG_ENV: &str = "__FIREBASE_CONFIG";
pub const INITIAL_AUTH_TOKEN_ENV: &str = "__INITIAL_AUTH_TOKEN";
pub const LOG_ENV: &str = "LCMUSE_LOG";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub gemini: GeminiSection,
    pub osc: OscSection,
    pub paths: PathsSection,
    pub services: ServicesSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeminiSection {
    pub model: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OscSection {
    pub engine_host: Option<String>,
    pub engine_port: Option<u16>,
    pub listen_host: Option<String>,
    pub listen_port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    pub scripts_dir: Option<PathBuf>,
    pub logs_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServicesSection {
    pub identity_base_url: Option<String>,
    pub firestore_base_url: Option<String>,
}

/// Loads the application configuration.
pub struct ConfigService;

impl ConfigService {
    /// Resolves the configuration from the real file system and environment.
    pub fn load() -> Result<AppConfig> {
        let env = |key: &str| std::env::var(key).ok();

        let app_dir = LcmusePaths::app_dir(env(HOME_ENV).as_deref())
            .map_err(|e| LcmuseError::config(e.to_string()))?;

        let (file, missing_dir) = match LcmusePaths::config_file() {
            Ok(path) => (Self::read_file(&path)?.unwrap_or_default(), None),
            Err(e) => (
                FileConfig::default(),
                Some(format!("No config directory, using defaults: {e}")),
            ),
        };

        let mut config = Self::from_sources(app_dir, file, env);
        config.diagnostics.extend(missing_dir);
        Ok(config)
    }

    /// Reads and parses `path`. A missing file is not an error.
    pub fn read_file(path: &Path) -> Result<Option<FileConfig>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            LcmuseError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let parsed: FileConfig = toml::from_str(&content).map_err(|e| {
            LcmuseError::config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        tracing::debug!("[Config] Loaded {}", path.display());
        Ok(Some(parsed))
    }

    /// Merges defaults, file values and environment values.
    pub fn from_sources<F>(app_dir: PathBuf, file: FileConfig, env: F) -> AppConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| env(key).filter(|value| !value.trim().is_empty());
        let mut config = AppConfig::with_app_dir(app_dir);

        // Generation endpoint
        config.gemini.api_key = non_blank(GEMINI_API_KEY_ENV).map(|key| key.trim().to_string());
        if let Some(model) = non_blank(GEMINI_MODEL_ENV).or(file.gemini.model) {
            config.gemini.model = model;
        }
        if let Some(base_url) = file.gemini.base_url {
            config.gemini.base_url = base_url.trim_end_matches('/').to_string();
        }

        // Record store and identity
        if let Some(app_id) = non_blank(APP_ID_ENV) {
            config.app_id = app_id;
        }
        if let Some(raw) = non_blank(FIREBASE_CONFIG_ENV) {
            match parse_firebase_config(&raw) {
                Ok(firebase) => config.firebase = Some(firebase),
                Err(diagnostic) => config.diagnostics.push(diagnostic),
            }
        }
        config.initial_auth_token = non_blank(INITIAL_AUTH_TOKEN_ENV);
        if let Some(url) = file.services.identity_base_url {
            config.services.identity_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = file.services.firestore_base_url {
            config.services.firestore_base_url = url.trim_end_matches('/').to_string();
        }

        // OSC link
        if let Some(host) = file.osc.engine_host {
            config.osc.engine_host = host;
        }
        if let Some(port) = file.osc.engine_port {
            config.osc.engine_port = port;
        }
        if let Some(host) = file.osc.listen_host {
            config.osc.listen_host = host;
        }
        if let Some(port) = file.osc.listen_port {
            config.osc.listen_port = port;
        }

        // Paths and logging
        if let Some(dir) = file.paths.scripts_dir {
            config.scripts_dir = dir;
        }
        if let Some(dir) = file.paths.logs_dir {
            config.logs_dir = dir;
        }
        if let Some(filter) = non_blank(LOG_ENV) {
            config.log_filter = filter;
        }

        config
    }
}

/// Logging is not set up while the config loads, so problems come back as
/// diagnostics instead of log lines.
fn parse_firebase_config(raw: &str) -> std::result::Result<FirebaseConfig, String> {
    match serde_json::from_str::<FirebaseConfig>(raw) {
        Ok(config) if config.is_complete() => Ok(config),
        Ok(_) => Err(format!("{FIREBASE_CONFIG_ENV} is missing apiKey or projectId")),
        Err(e) => Err(format!("{FIREBASE_CONFIG_ENV} is not valid JSON: {e}")),
    }
}
