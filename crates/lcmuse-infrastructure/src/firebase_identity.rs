//! Firebase Authentication over the Identity Toolkit REST API.
//!
//! Signs in with a custom token when one is configured, otherwise
//! anonymously, and returns the remote user id with its ID token.

use lcmuse_core::config::FirebaseConfig;
use lcmuse_core::identity::{IdentityProvider, ResolvedIdentity, UserIdentity};
use lcmuse_core::{LcmuseError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Identity provider backed by Firebase Authentication.
#[derive(Clone)]
pub struct FirebaseIdentityProvider {
    client: Client,
    base_url: String,
    api_key: String,
    custom_token: Option<String>,
}

impl FirebaseIdentityProvider {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        firebase: &FirebaseConfig,
        custom_token: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: firebase.api_key.clone(),
            custom_token,
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/v1/accounts:{method}?key={key}",
            self.base_url,
            key = self.api_key
        )
    }

    async fn post<B, R>(&self, method: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(method))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                LcmuseError::identity_unavailable(format!("{method} request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorWrapper>(&body_text)
                .ok()
                .and_then(|wrapper| wrapper.error.message)
                .unwrap_or(body_text);
            return Err(LcmuseError::identity_unavailable(format!(
                "{method} returned {}: {message}",
                status.as_u16()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| {
                let e = e.without_url();
                LcmuseError::identity_unavailable(format!("{method} response: {e}"))
            })
    }

    async fn sign_in_anonymously(&self) -> Result<ResolvedIdentity> {
        let response: SignUpResponse = self
            .post(
                "signUp",
                &SignUpRequest {
                    return_secure_token: true,
                },
            )
            .await?;
        Ok(ResolvedIdentity::remote(
            UserIdentity::new(response.local_id),
            response.id_token,
        ))
    }

    async fn sign_in_with_custom_token(&self, token: &str) -> Result<ResolvedIdentity> {
        let signed_in: CustomTokenResponse = self
            .post(
                "signInWithCustomToken",
                &CustomTokenRequest {
                    token,
                    return_secure_token: true,
                },
            )
            .await?;

        // The custom token exchange does not return the uid
        let lookup: LookupResponse = self
            .post(
                "lookup",
                &LookupRequest {
                    id_token: &signed_in.id_token,
                },
            )
            .await?;
        let local_id = lookup
            .users
            .into_iter()
            .next()
            .map(|user| user.local_id)
            .ok_or_else(|| LcmuseError::identity_unavailable("lookup returned no user"))?;

        Ok(ResolvedIdentity::remote(
            UserIdentity::new(local_id),
            signed_in.id_token,
        ))
    }
}

#[async_trait::async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn sign_in(&self) -> Result<ResolvedIdentity> {
        match self.custom_token.as_deref() {
            Some(token) => self.sign_in_with_custom_token(token).await,
            None => self.sign_in_anonymously().await,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest {
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    local_id: String,
    id_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomTokenRequest<'a> {
    token: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomTokenResponse {
    id_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}
