//! User identity domain module.
//!
//! An identity is established once per process at startup, either by the
//! remote identity service or by a locally generated fallback, and is read-only
//! afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Opaque user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserIdentity(String);

impl UserIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a random local identity (UUID v4).
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the resolved identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    /// Issued by the remote identity service
    Remote,
    /// Generated locally because the remote service was unavailable
    LocalFallback,
}

/// The identity resolved at startup together with its credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub user_id: UserIdentity,
    /// Bearer token for the record store. Only present for remote identities.
    pub id_token: Option<String>,
    pub source: IdentitySource,
}

impl ResolvedIdentity {
    pub fn remote(user_id: UserIdentity, id_token: impl Into<String>) -> Self {
        Self {
            user_id,
            id_token: Some(id_token.into()),
            source: IdentitySource::Remote,
        }
    }

    pub fn local_fallback() -> Self {
        Self {
            user_id: UserIdentity::random(),
            id_token: None,
            source: IdentitySource::LocalFallback,
        }
    }
}

/// Remote sign-in service.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Signs in and returns the remote-issued identity.
    async fn sign_in(&self) -> Result<ResolvedIdentity>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_identities_are_distinct() {
        let a = UserIdentity::random();
        let b = UserIdentity::random();
        assert_ne!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn test_local_fallback_has_no_token() {
        let identity = ResolvedIdentity::local_fallback();
        assert_eq!(identity.source, IdentitySource::LocalFallback);
        assert!(identity.id_token.is_none());
        assert!(!identity.user_id.is_empty());
    }

    #[test]
    fn test_default_identity_is_empty() {
        assert!(UserIdentity::default().is_empty());
        assert!(UserIdentity::new("   ").is_empty());
    }
}
