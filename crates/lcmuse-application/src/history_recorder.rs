//! Best-effort history recording.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use lcmuse_core::history::{HistoryRecord, HistoryStore, RecordIdGenerator};
use lcmuse_core::identity::UserIdentity;

/// Writes accepted generations to the record store when one is available.
///
/// Failures are logged and never returned to the caller.
pub struct HistoryRecorder {
    store: Option<Arc<dyn HistoryStore>>,
    user_id: UserIdentity,
    ids: RecordIdGenerator,
}

impl HistoryRecorder {
    pub fn new(store: Option<Arc<dyn HistoryStore>>, user_id: UserIdentity) -> Self {
        Self {
            store,
            user_id,
            ids: RecordIdGenerator::new(),
        }
    }

    /// A recorder that never writes anything.
    pub fn disabled() -> Self {
        Self::new(None, UserIdentity::default())
    }

    pub fn user_id(&self) -> &UserIdentity {
        &self.user_id
    }

    /// Returns whether the record was stored.
    pub async fn record(&self, user_prompt: &str, ai_response: &str) -> bool {
        self.record_at(user_prompt, ai_response, Utc::now()).await
    }

    pub async fn record_at(&self, user_prompt: &str, ai_response: &str, at: DateTime<Utc>) -> bool {
        let Some(store) = &self.store else {
            tracing::warn!("[History] Record store not initialized, response not saved");
            return false;
        };
        if self.user_id.is_empty() {
            tracing::warn!("[History] No user identity, response not saved");
            return false;
        }

        let record = HistoryRecord {
            record_id: self.ids.next_id(at),
            user_id: self.user_id.clone(),
            timestamp: at,
            user_prompt: user_prompt.to_string(),
            ai_response: ai_response.to_string(),
        };

        match store.append(&record).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("[History] Failed to save response: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lcmuse_core::{LcmuseError, Result};
    use std::sync::Mutex;

    /// Record store that keeps everything in memory.
    #[derive(Default)]
    pub(crate) struct MemoryHistoryStore {
        pub records: Mutex<Vec<HistoryRecord>>,
        pub fail: bool,
    }

    #[async_trait::async_trait]
    impl HistoryStore for MemoryHistoryStore {
        async fn append(&self, record: &HistoryRecord) -> Result<()> {
            if self.fail {
                return Err(LcmuseError::record_store("unavailable"));
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_record_is_written_with_identity() {
        let store = Arc::new(MemoryHistoryStore::default());
        let recorder = HistoryRecorder::new(Some(store.clone()), UserIdentity::new("uid-1"));

        assert!(recorder.record("warm pad", "```supercollider\nx\n```").await);

        let records = store.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id.as_str(), "uid-1");
        assert_eq!(records[0].user_prompt, "warm pad");
    }

    #[tokio::test]
    async fn test_same_millisecond_gets_distinct_ids() {
        let store = Arc::new(MemoryHistoryStore::default());
        let recorder = HistoryRecorder::new(Some(store.clone()), UserIdentity::new("uid-1"));
        let at = Utc::now();

        recorder.record_at("a", "1", at).await;
        recorder.record_at("b", "2", at).await;

        let records = store.records.lock().unwrap();
        assert_ne!(records[0].record_id, records[1].record_id);
    }

    #[tokio::test]
    async fn test_missing_store_or_identity_is_skipped() {
        assert!(!HistoryRecorder::disabled().record("a", "b").await);

        let store = Arc::new(MemoryHistoryStore::default());
        let recorder = HistoryRecorder::new(Some(store.clone()), UserIdentity::default());
        assert!(!recorder.record("a", "b").await);
        assert!(store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_swallowed() {
        let store = Arc::new(MemoryHistoryStore {
            fail: true,
            ..Default::default()
        });
        let recorder = HistoryRecorder::new(Some(store), UserIdentity::new("uid-1"));
        assert!(!recorder.record("a", "b").await);
    }

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_store_failure_logs_a_warning() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let store = Arc::new(MemoryHistoryStore {
            fail: true,
            ..Default::default()
        });
        let recorder = HistoryRecorder::new(Some(store), UserIdentity::new("uid-1"));
        assert!(!recorder.record("a", "b").await);

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("Failed to save response"), "{output}");
        assert!(!output.contains("ERROR"), "{output}");
    }
}
