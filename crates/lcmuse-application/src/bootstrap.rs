//! Composition root.
//!
//! Builds the [`AppContext`] from configuration. Only a broken HTTP client is
//! fatal; a missing identity service, record store or OSC port degrades the
//! features that depend on it.

use std::sync::Arc;

use anyhow::{Context, Result};
use lcmuse_core::config::{AppConfig, FirebaseConfig};
use lcmuse_core::history::HistoryStore;
use lcmuse_core::identity::{IdentityProvider, ResolvedIdentity};
use lcmuse_infrastructure::{FileScriptArchiver, FirebaseIdentityProvider, FirestoreHistoryStore};
use lcmuse_interaction::{GeminiApiClient, OscChannels};

use crate::context::AppContext;
use crate::history_recorder::HistoryRecorder;
use crate::identity::resolve_identity;
use crate::send_script::SendScriptUseCase;
use crate::suggestion_service::SuggestionService;

pub async fn bootstrap(config: AppConfig) -> Result<AppContext> {
    let client = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;

    let firebase = config.firebase.as_ref().filter(|fb| fb.is_complete());
    if firebase.is_none() {
        tracing::error!("[Bootstrap] Firebase configuration is missing or incomplete");
    }

    let provider = firebase.map(|fb| {
        FirebaseIdentityProvider::new(
            client.clone(),
            config.services.identity_base_url.clone(),
            fb,
            config.initial_auth_token.clone(),
        )
    });
    let identity = resolve_identity(
        provider
            .as_ref()
            .map(|provider| provider as &dyn IdentityProvider),
    )
    .await;

    let store = history_store(&client, &config, firebase, &identity);
    let recorder = Arc::new(HistoryRecorder::new(store, identity.user_id.clone()));
    let generator = GeminiApiClient::from_settings(client, &config.gemini);
    let suggestions = SuggestionService::new(Arc::new(generator), recorder);

    let osc = match OscChannels::open(&config.osc).await {
        Ok(channels) => Some(channels),
        Err(e) => {
            tracing::error!("[Bootstrap] Failed to open OSC channels: {}", e);
            None
        }
    };
    let send_script = SendScriptUseCase::new(
        Arc::new(FileScriptArchiver::new(&config.scripts_dir)),
        osc.as_ref().map(OscChannels::transport),
    );

    tracing::info!(
        "[Bootstrap] Ready (user {}, scripts in {})",
        identity.user_id,
        config.scripts_dir.display()
    );
    Ok(AppContext::new(config, identity, suggestions, send_script, osc))
}

/// A Firestore store when the record store is configured. Local identities
/// carry no token and still get a store, whose writes the rules may reject.
fn history_store(
    client: &reqwest::Client,
    config: &AppConfig,
    firebase: Option<&FirebaseConfig>,
    identity: &ResolvedIdentity,
) -> Option<Arc<dyn HistoryStore>> {
    let firebase = firebase?;
    let store = FirestoreHistoryStore::new(
        client.clone(),
        config.services.firestore_base_url.clone(),
        firebase.project_id.clone(),
        config.app_id.clone(),
        identity.id_token.clone(),
    );
    Some(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcmuse_core::config::OscSettings;
    use lcmuse_core::identity::IdentitySource;
    use tempfile::TempDir;
    use tokio::net::UdpSocket;

    fn free_settings() -> OscSettings {
        OscSettings {
            listen_port: 0,
            ..OscSettings::default()
        }
    }

    #[tokio::test]
    async fn test_unconfigured_services_degrade() {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::with_app_dir(dir.path());
        config.osc = free_settings();

        let context = bootstrap(config).await.unwrap();

        assert_eq!(context.identity.source, IdentitySource::LocalFallback);
        assert!(context.osc().is_some());
        assert!(context.send_script.has_transport());
        context.shutdown().await;
    }

    #[tokio::test]
    async fn test_busy_listen_port_leaves_osc_unavailable() {
        let dir = TempDir::new().unwrap();
        let occupied = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let mut config = AppConfig::with_app_dir(dir.path());
        config.osc.listen_port = occupied.local_addr().unwrap().port();

        let context = bootstrap(config).await.unwrap();

        assert!(context.osc().is_none());
        assert!(!context.send_script.has_transport());
    }
}
