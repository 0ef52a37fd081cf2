//! GeminiApiClient - Direct REST API implementation for Gemini.
//!
//! Sends the live-coding preamble plus the user's description as a single
//! user turn and returns the first candidate's text.

use lcmuse_core::config::GeminiSettings;
use lcmuse_core::suggestion::{SuggestionRequest, TextGenerator};
use lcmuse_core::{LcmuseError, Result};
use reqwest::{Client, Response, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::prompt::compose_prompt;

/// Text generator that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiApiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiApiClient {
    /// Creates a client for `model`. A `None` or blank key is reported at
    /// generation time, before any network call.
    pub fn new(client: Client, api_key: Option<String>, model: impl Into<String>) -> Self {
        let settings = GeminiSettings::default();
        Self {
            client,
            api_key,
            model: model.into(),
            base_url: settings.base_url,
        }
    }

    pub fn from_settings(client: Client, settings: &GeminiSettings) -> Self {
        Self::new(client, settings.api_key.clone(), settings.model.clone())
            .with_base_url(settings.base_url.clone())
    }

    /// Overrides the models endpoint root (e.g. for a proxy).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                tracing::error!("[Gemini] GEMINI_API_KEY is not set");
                LcmuseError::configuration_missing("Gemini API key is not configured.")
            })
    }

    async fn send_request(&self, api_key: &str, body: &GenerateContentRequest) -> Result<String> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url,
            model = self.model,
        );

        tracing::info!("[Gemini] Calling the Gemini API (model: {})", self.model);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let diagnostic = describe_error_response(response).await;
            tracing::error!("[Gemini] Gemini API error: {}", diagnostic);
            return Err(LcmuseError::RemoteStatus { status, diagnostic });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(transport_error)?;

        let text = extract_text_response(parsed)?;
        tracing::info!("[Gemini] Response received ({} chars)", text.len());
        Ok(text)
    }
}

#[async_trait::async_trait]
impl TextGenerator for GeminiApiClient {
    async fn generate(&self, request: &SuggestionRequest) -> Result<String> {
        let api_key = self.api_key()?;
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: compose_prompt(&request.prompt_text),
                }],
            }],
        };
        self.send_request(api_key, &body).await
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

/// The request URL carries the API key, so it is stripped from the message.
fn transport_error(err: reqwest::Error) -> LcmuseError {
    LcmuseError::remote_transport(err.without_url().to_string())
}

/// Takes `candidates[0].content.parts[0].text`.
fn extract_text_response(response: GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or(LcmuseError::MalformedRemoteResponse)
}

/// Builds `Status: <code>` followed by the error details the body offers.
async fn describe_error_response(response: Response) -> String {
    let status = response.status().as_u16();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));
    let body = response.text().await;

    let mut details = format!("Status: {status}");
    match (is_json, body) {
        (true, Ok(text)) => match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(value) => {
                let message = value
                    .get("error")
                    .and_then(|error| error.get("message"))
                    .and_then(|message| message.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| value.to_string());
                details.push_str(&format!(", Details: {message}"));
            }
            Err(e) => details.push_str(&format!(", JSON parse error: {e}")),
        },
        (true, Err(e)) => details.push_str(&format!(", JSON parse error: {e}")),
        (false, Ok(text)) => details.push_str(&format!(", Raw Text: {text}")),
        (false, Err(_)) => details.push_str(", Raw Text: No body"),
    }
    details
}
