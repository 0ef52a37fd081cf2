//! Suggestion generation use case.

use std::sync::Arc;

use lcmuse_core::suggestion::{SuggestionRequest, SuggestionResult, TextGenerator};

use crate::history_recorder::HistoryRecorder;

/// Calls the text generator and records successful responses in the
/// background.
#[derive(Clone)]
pub struct SuggestionService {
    generator: Arc<dyn TextGenerator>,
    recorder: Arc<HistoryRecorder>,
}

impl SuggestionService {
    pub fn new(generator: Arc<dyn TextGenerator>, recorder: Arc<HistoryRecorder>) -> Self {
        Self {
            generator,
            recorder,
        }
    }

    /// Generates a suggestion for `request`.
    ///
    /// The history write runs on its own task, so the result is returned
    /// without waiting for the record store.
    pub async fn suggest(&self, request: &SuggestionRequest) -> SuggestionResult {
        match self.generator.generate(request).await {
            Ok(text) => {
                let recorder = self.recorder.clone();
                let prompt = request.prompt_text.clone();
                let response = text.clone();
                tokio::spawn(async move {
                    recorder.record(&prompt, &response).await;
                });
                SuggestionResult::success(text)
            }
            Err(e) => {
                tracing::error!("[Suggestion] Generation failed: {}", e);
                SuggestionResult::from(e)
            }
        }
    }
}
