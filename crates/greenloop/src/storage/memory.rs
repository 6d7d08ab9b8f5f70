use crate::error::GameError;
use crate::gateway::KvGateway;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::BTreeMap;

/// In-memory [`KvGateway`] backed by a sorted map.
///
/// Used by every test and by hosts that want an ephemeral store. The sorted
/// map makes prefix scans a contiguous range walk.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    inner: Mutex<BTreeMap<String, Value>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Snapshot of every (key, value) pair in key order. Test helper.
    pub fn dump(&self) -> Vec<(String, Value)> {
        self.inner
            .lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[async_trait]
impl KvGateway for MemoryKvStore {
    async fn set(&self, key: &str, value: Value) -> Result<(), GameError> {
        self.inner.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, GameError> {
        Ok(self.inner.lock().get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<bool, GameError> {
        Ok(self.inner.lock().remove(key).is_some())
    }

    async fn set_many(&self, entries: &[(String, Value)]) -> Result<(), GameError> {
        let mut inner = self.inner.lock();
        for (key, value) in entries {
            inner.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<Value>>, GameError> {
        let inner = self.inner.lock();
        Ok(keys.iter().map(|key| inner.get(key).cloned()).collect())
    }

    async fn delete_many(&self, keys: &[String]) -> Result<usize, GameError> {
        let mut inner = self.inner.lock();
        Ok(keys.iter().filter(|key| inner.remove(*key).is_some()).count())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<Value>, GameError> {
        let inner = self.inner.lock();
        Ok(inner
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(_, value)| value.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn set_then_get() {
        let store = MemoryKvStore::new();
        store.set("profile:f1:p1", json!({"name": "Ana"})).await.unwrap();

        let value = store.get("profile:f1:p1").await.unwrap();
        assert_eq!(value, Some(json!({"name": "Ana"})));
        assert_eq!(store.get("profile:f1:p2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_overwrites() {
        let store = MemoryKvStore::new();
        store.set("k", json!(1)).await.unwrap();
        store.set("k", json!(2)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!(2)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let store = MemoryKvStore::new();
        store.set("k", json!(true)).await.unwrap();
        assert!(store.delete("k").await.unwrap());
        assert!(!store.delete("k").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn set_many_writes_all_entries() {
        let store = MemoryKvStore::new();
        let entries = vec![
            ("a:1".to_string(), json!(1)),
            ("a:2".to_string(), json!(2)),
            ("b:1".to_string(), json!(3)),
        ];
        store.set_many(&entries).await.unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("a:2").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn get_many_preserves_key_order() {
        let store = MemoryKvStore::new();
        store.set("x", json!("x")).await.unwrap();
        store.set("z", json!("z")).await.unwrap();

        let keys = vec!["z".to_string(), "missing".to_string(), "x".to_string()];
        let values = store.get_many(&keys).await.unwrap();
        assert_eq!(values, vec![Some(json!("z")), None, Some(json!("x"))]);
    }

    #[tokio::test]
    async fn delete_many_counts_removed() {
        let store = MemoryKvStore::new();
        store.set("a", json!(1)).await.unwrap();
        store.set("b", json!(2)).await.unwrap();

        let keys = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(store.delete_many(&keys).await.unwrap(), 2);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn scan_prefix_is_isolated() {
        let store = MemoryKvStore::new();
        store.set("move:p1:quiz:3:a", json!(1)).await.unwrap();
        store.set("move:p1:quiz:3:b", json!(2)).await.unwrap();
        store.set("move:p10:quiz:3:c", json!(3)).await.unwrap();
        store.set("profile:f1:p1", json!(4)).await.unwrap();

        let values = store.scan_prefix("move:p1:").await.unwrap();
        assert_eq!(values.len(), 2);

        let values = store.scan_prefix("move:").await.unwrap();
        assert_eq!(values.len(), 3);

        let values = store.scan_prefix("route:").await.unwrap();
        assert!(values.is_empty());
    }
}
