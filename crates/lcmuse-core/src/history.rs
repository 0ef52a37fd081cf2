//! History record domain model.
//!
//! Each accepted generation is written once to the remote record store and
//! never read back, updated or deleted by this application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

use crate::error::Result;
use crate::identity::UserIdentity;

/// Collection holding generated responses under each user.
pub const HISTORY_COLLECTION: &str = "ai_musical_responses";

/// One accepted generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    #[serde(skip)]
    pub record_id: String,
    #[serde(skip)]
    pub user_id: UserIdentity,
    pub timestamp: DateTime<Utc>,
    pub user_prompt: String,
    pub ai_response: String,
}

/// Path of a record, namespaced by application id and user identity.
pub fn record_path(app_id: &str, user_id: &UserIdentity, record_id: &str) -> String {
    format!("artifacts/{app_id}/users/{user_id}/{HISTORY_COLLECTION}/{record_id}")
}

/// Produces record ids from the creation time in epoch milliseconds.
///
/// Ids are strictly increasing within one generator, so two records created
/// in the same millisecond still get distinct ids.
#[derive(Debug, Default)]
pub struct RecordIdGenerator {
    last: AtomicI64,
}

impl RecordIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self, at: DateTime<Utc>) -> String {
        let candidate = at.timestamp_millis();
        let mut previous = self.last.load(Ordering::Relaxed);
        loop {
            let next = candidate.max(previous + 1);
            match self
                .last
                .compare_exchange_weak(previous, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next.to_string(),
                Err(actual) => previous = actual,
            }
        }
    }
}

/// Write-only remote record store.
#[async_trait::async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, record: &HistoryRecord) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_path_layout() {
        let path = record_path("my-app", &UserIdentity::new("u1"), "1700000000000");
        assert_eq!(
            path,
            "artifacts/my-app/users/u1/ai_musical_responses/1700000000000"
        );
    }

    #[test]
    fn test_ids_follow_creation_time() {
        let generator = RecordIdGenerator::new();
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(generator.next_id(at), "1700000000123");
    }

    #[test]
    fn test_ids_are_unique_within_same_millisecond() {
        let generator = RecordIdGenerator::new();
        let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let first = generator.next_id(at);
        let second = generator.next_id(at);
        let third = generator.next_id(at);
        assert_eq!(first, "1700000000000");
        assert_eq!(second, "1700000000001");
        assert_eq!(third, "1700000000002");
    }
}
