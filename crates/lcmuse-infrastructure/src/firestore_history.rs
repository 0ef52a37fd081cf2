//! History records in Cloud Firestore over the REST API.

use lcmuse_core::history::{HistoryRecord, HistoryStore, record_path};
use lcmuse_core::{LcmuseError, Result};
use reqwest::Client;
use serde_json::{Value, json};

/// Writes each record as one Firestore document.
#[derive(Clone)]
pub struct FirestoreHistoryStore {
    client: Client,
    base_url: String,
    project_id: String,
    app_id: String,
    id_token: Option<String>,
}

impl FirestoreHistoryStore {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        app_id: impl Into<String>,
        id_token: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            project_id: project_id.into(),
            app_id: app_id.into(),
            id_token,
        }
    }

    fn document_url(&self, record: &HistoryRecord) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}",
            self.base_url,
            self.project_id,
            record_path(&self.app_id, &record.user_id, &record.record_id)
        )
    }
}

/// Firestore typed-value document body for a record.
fn document_body(record: &HistoryRecord) -> Value {
    json!({
        "fields": {
            "timestamp": { "timestampValue": record.timestamp.to_rfc3339() },
            "userPrompt": { "stringValue": record.user_prompt },
            "aiResponse": { "stringValue": record.ai_response },
        }
    })
}

#[async_trait::async_trait]
impl HistoryStore for FirestoreHistoryStore {
    async fn append(&self, record: &HistoryRecord) -> Result<()> {
        let mut request = self
            .client
            .patch(self.document_url(record))
            .json(&document_body(record));
        if let Some(token) = &self.id_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                LcmuseError::record_store(format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LcmuseError::record_store(format!(
                "status {}: {}",
                status.as_u16(),
                body
            )));
        }

        tracing::info!("[History] Response saved as record {}", record.record_id);
        Ok(())
    }
}
