//! Startup identity resolution.

use lcmuse_core::identity::{IdentityProvider, ResolvedIdentity};

/// Signs in with `provider`, falling back to a random local identity when
/// there is no provider or sign-in fails. Never fails.
pub async fn resolve_identity(provider: Option<&dyn IdentityProvider>) -> ResolvedIdentity {
    let Some(provider) = provider else {
        tracing::warn!("[Identity] Identity service is not configured, using a local identity");
        return ResolvedIdentity::local_fallback();
    };

    match provider.sign_in().await {
        Ok(identity) => {
            tracing::info!("[Identity] Signed in as {}", identity.user_id);
            identity
        }
        Err(e) => {
            tracing::error!("[Identity] Sign-in failed: {}", e);
            let fallback = ResolvedIdentity::local_fallback();
            tracing::warn!("[Identity] Using local identity {}", fallback.user_id);
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcmuse_core::identity::{IdentitySource, UserIdentity};
    use lcmuse_core::{LcmuseError, Result};

    struct FixedProvider(Result<ResolvedIdentity>);

    #[async_trait::async_trait]
    impl IdentityProvider for FixedProvider {
        async fn sign_in(&self) -> Result<ResolvedIdentity> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_remote_identity_is_used() {
        let provider = FixedProvider(Ok(ResolvedIdentity::remote(
            UserIdentity::new("uid-9"),
            "tok",
        )));
        let identity = resolve_identity(Some(&provider)).await;
        assert_eq!(identity.user_id.as_str(), "uid-9");
        assert_eq!(identity.source, IdentitySource::Remote);
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_random_local_identity() {
        let provider = FixedProvider(Err(LcmuseError::identity_unavailable("offline")));
        let identity = resolve_identity(Some(&provider)).await;
        assert_eq!(identity.source, IdentitySource::LocalFallback);
        assert!(!identity.user_id.is_empty());
        assert!(identity.id_token.is_none());
    }

    #[tokio::test]
    async fn test_missing_provider_falls_back() {
        let a = resolve_identity(None).await;
        let b = resolve_identity(None).await;
        assert_eq!(a.source, IdentitySource::LocalFallback);
        assert_ne!(a.user_id, b.user_id);
    }
}
