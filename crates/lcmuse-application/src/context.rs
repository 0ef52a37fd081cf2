//! Process-wide application context.

use lcmuse_core::config::AppConfig;
use lcmuse_core::identity::ResolvedIdentity;
use lcmuse_interaction::OscChannels;

use crate::send_script::SendScriptUseCase;
use crate::suggestion_service::SuggestionService;

/// Everything the background process needs, built once at startup.
///
/// The identity and OSC channels are written here and only read afterwards.
pub struct AppContext {
    pub config: AppConfig,
    pub identity: ResolvedIdentity,
    pub suggestions: SuggestionService,
    pub send_script: SendScriptUseCase,
    osc: Option<OscChannels>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        identity: ResolvedIdentity,
        suggestions: SuggestionService,
        send_script: SendScriptUseCase,
        osc: Option<OscChannels>,
    ) -> Self {
        Self {
            config,
            identity,
            suggestions,
            send_script,
            osc,
        }
    }

    pub fn osc(&self) -> Option<&OscChannels> {
        self.osc.as_ref()
    }

    /// Closes the OSC channels if they were opened.
    pub async fn shutdown(self) {
        if let Some(osc) = self.osc {
            osc.close().await;
        }
        tracing::info!("[App] Shutdown complete");
    }
}
