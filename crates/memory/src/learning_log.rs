use crate::store::{KeyValueStore, MemoryError};
use crate::types::{Learning, LearningResult, LearningStats};
use std::collections::VecDeque;
use std::sync::Arc;

pub const MAX_LEARNINGS: usize = 100;
pub const LEARNINGS_KEY: &str = "lucy_learnings";

/// Capped, persisted record of executed actions.
///
/// Every append rewrites the whole list under [`LEARNINGS_KEY`]. Storage
/// failures are logged and never interrupt the caller; the in-memory log
/// stays authoritative for the running process.
pub struct LearningLog {
    entries: VecDeque<Learning>,
    store: Arc<dyn KeyValueStore>,
}

impl LearningLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            entries: VecDeque::new(),
            store,
        }
    }

    /// Replace the in-memory log with the persisted one. Missing or
    /// malformed data yields an empty log.
    pub async fn load_at_startup(&mut self) -> usize {
        self.entries = match self.read_persisted().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Discarding unreadable learning log: {}", e);
                VecDeque::new()
            }
        };

        while self.entries.len() > MAX_LEARNINGS {
            self.entries.pop_front();
        }

        tracing::info!("Loaded {} learnings", self.entries.len());
        self.entries.len()
    }

    async fn read_persisted(&self) -> Result<VecDeque<Learning>, MemoryError> {
        let Some(raw) = self.store.get(LEARNINGS_KEY).await? else {
            return Ok(VecDeque::new());
        };
        Ok(serde_json::from_str(&raw)?)
    }

    pub async fn record(&mut self, action: &str, result: LearningResult, feedback: &str) {
        self.entries.push_back(Learning::new(action, result, feedback));
        while self.entries.len() > MAX_LEARNINGS {
            self.entries.pop_front();
        }

        if let Err(e) = self.persist().await {
            tracing::warn!("Failed to persist learnings: {}", e);
        }
    }

    pub async fn persist(&self) -> Result<(), MemoryError> {
        let content = serde_json::to_string(&self.entries)?;
        self.store.set(LEARNINGS_KEY, &content).await
    }

    pub async fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.store.remove(LEARNINGS_KEY).await {
            tracing::warn!("Failed to remove persisted learnings: {}", e);
        }
    }

    /// Most recent entry recorded for `action`.
    pub fn latest_for(&self, action: &str) -> Option<&Learning> {
        self.entries.iter().rev().find(|l| l.action == action)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Learning> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> LearningStats {
        let total = self.entries.len();
        let successes = self
            .entries
            .iter()
            .filter(|l| l.result == LearningResult::Success)
            .count();
        let failures = total - successes;
        let success_rate = if total > 0 {
            successes as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        LearningStats {
            total,
            successes,
            failures,
            success_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, JsonFileStore};
    use proptest::prelude::*;

    #[tokio::test]
    async fn test_record_and_stats() {
        let mut log = LearningLog::new(Arc::new(InMemoryStore::new()));
        log.record("create_file", LearningResult::Success, "ok").await;
        log.record("read_file", LearningResult::Failure, "missing").await;
        log.record("create_file", LearningResult::Success, "ok").await;

        let stats = log.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.successes, 2);
        assert_eq!(stats.failures, 1);
        assert!((stats.success_rate - 66.666).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_empty_stats() {
        let log = LearningLog::new(Arc::new(InMemoryStore::new()));
        let stats = log.stats();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.success_rate, 0.0);
    }

    #[tokio::test]
    async fn test_eviction_keeps_newest() {
        let mut log = LearningLog::new(Arc::new(InMemoryStore::new()));
        for i in 0..(MAX_LEARNINGS + 5) {
            log.record(&format!("action_{}", i), LearningResult::Success, "")
                .await;
        }

        assert_eq!(log.len(), MAX_LEARNINGS);
        let first = log.entries().next().unwrap();
        assert_eq!(first.action, "action_5");
    }

    #[tokio::test]
    async fn test_roundtrip_through_file_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonFileStore::new(temp_dir.path()));
        store.initialize().await.unwrap();

        let mut log = LearningLog::new(store.clone());
        log.record("open_application", LearningResult::Success, "opened")
            .await;
        log.record("execute_command", LearningResult::Failure, "exit 1")
            .await;
        log.persist().await.unwrap();

        let mut reloaded = LearningLog::new(store);
        assert_eq!(reloaded.load_at_startup().await, 2);
        assert_eq!(
            reloaded.entries().collect::<Vec<_>>(),
            log.entries().collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_malformed_storage_starts_empty() {
        let store = Arc::new(InMemoryStore::new());
        store.set(LEARNINGS_KEY, "{not json").await.unwrap();

        let mut log = LearningLog::new(store);
        assert_eq!(log.load_at_startup().await, 0);
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn test_legacy_situation_field_is_accepted() {
        let store = Arc::new(InMemoryStore::new());
        store
            .set(
                LEARNINGS_KEY,
                r#"[{"situation":"create_file","action":"create_file","result":"success","feedback":"ok","timestamp":1700000000000}]"#,
            )
            .await
            .unwrap();

        let mut log = LearningLog::new(store);
        assert_eq!(log.load_at_startup().await, 1);
        assert_eq!(log.latest_for("create_file").unwrap().feedback, "ok");
    }

    #[tokio::test]
    async fn test_latest_for_prefers_newest() {
        let mut log = LearningLog::new(Arc::new(InMemoryStore::new()));
        log.record("read_file", LearningResult::Failure, "first").await;
        log.record("read_file", LearningResult::Success, "second").await;

        assert_eq!(log.latest_for("read_file").unwrap().feedback, "second");
        assert!(log.latest_for("chat").is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_persisted_copy() {
        let store = Arc::new(InMemoryStore::new());
        let mut log = LearningLog::new(store.clone());
        log.record("chat", LearningResult::Success, "hi").await;
        assert!(store.get(LEARNINGS_KEY).await.unwrap().is_some());

        log.clear().await;
        assert!(log.is_empty());
        assert!(store.get(LEARNINGS_KEY).await.unwrap().is_none());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_log_never_exceeds_cap(count in 0usize..260) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            runtime.block_on(async {
                let mut log = LearningLog::new(Arc::new(InMemoryStore::new()));
                for i in 0..count {
                    log.record(&i.to_string(), LearningResult::Success, "").await;
                }

                assert!(log.len() <= MAX_LEARNINGS);
                let expected_first = count.saturating_sub(MAX_LEARNINGS);
                if let Some(first) = log.entries().next() {
                    assert_eq!(first.action, expected_first.to_string());
                };
            });
        }
    }
}
