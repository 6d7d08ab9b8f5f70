//! Test fixtures: an instrumented gateway and ready-made content pools.
//!
//! Everything here is plain library code so integration tests can use it
//! too; none of it reaches a real backend.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GameError;
use crate::games::quiz::QuizQuestion;
use crate::games::sorting::{BinColor, WasteItem};
use crate::gateway::KvGateway;
use crate::profile::Profile;
use crate::shell::AVATARS;
use crate::storage::MemoryKvStore;
use crate::types::{Difficulty, PlayerId};

/// An instrumented [`KvGateway`] for tests.
///
/// Wraps a [`MemoryKvStore`], counts write calls, and can be told to fail
/// writes so flush-failure paths can be exercised.
///
/// # Example
///
/// ```ignore
/// let gateway = Arc::new(TestGateway::new());
/// let pool = quiz_pool(ctx.difficulty, 10);
/// let mut quiz = QuizSession::new(&ctx, gateway.clone(), config, pool)?;
/// // ... play the round ...
/// assert_eq!(gateway.set_many_calls(), 1);
/// ```
#[derive(Default)]
pub struct TestGateway {
    store: MemoryKvStore,
    set_calls: AtomicUsize,
    set_many_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    fail_writes: AtomicBool,
}

impl TestGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// The wrapped store, for direct inspection.
    pub fn store(&self) -> &MemoryKvStore {
        &self.store
    }

    /// Entries currently stored.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// How many single-key writes happened.
    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    /// How many batched writes happened.
    pub fn set_many_calls(&self) -> usize {
        self.set_many_calls.load(Ordering::SeqCst)
    }

    /// How many single-key deletes happened.
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent write fail with [`GameError::Persistence`].
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), GameError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GameError::Persistence {
                reason: "injected write failure".to_string(),
                source: None,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl KvGateway for TestGateway {
    async fn set(&self, key: &str, value: Value) -> Result<(), GameError> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        self.check_writable()?;
        self.store.set(key, value).await
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, GameError> {
        self.store.get(key).await
    }

    async fn delete(&self, key: &str) -> Result<bool, GameError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check_writable()?;
        self.store.delete(key).await
    }

    async fn set_many(&self, entries: &[(String, Value)]) -> Result<(), GameError> {
        self.set_many_calls.fetch_add(1, Ordering::SeqCst);
        self.check_writable()?;
        self.store.set_many(entries).await
    }

    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<Value>>, GameError> {
        self.store.get_many(keys).await
    }

    async fn delete_many(&self, keys: &[String]) -> Result<usize, GameError> {
        self.check_writable()?;
        self.store.delete_many(keys).await
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<Value>, GameError> {
        self.store.scan_prefix(prefix).await
    }
}

/// A quiz pool of `count` questions at `level`.
///
/// Question `q-{i}` keeps its correct option at index `i % 4`, so tests can
/// answer rounds right or wrong deterministically.
pub fn quiz_pool(level: Difficulty, count: usize) -> Vec<QuizQuestion> {
    (0..count)
        .map(|i| QuizQuestion {
            id: format!("q-{i}"),
            prompt: format!("Which bin takes item {i}?"),
            options: vec![
                "Glass".to_string(),
                "Paper".to_string(),
                "Metal".to_string(),
                "Plastic".to_string(),
            ],
            correct_index: i % 4,
            difficulty: level,
            explanation: "Sort by material, not by shape.".to_string(),
        })
        .collect()
}

/// A sorting pool of `count` items at `level`, cycling through the bins.
pub fn waste_pool(level: Difficulty, count: usize) -> Vec<WasteItem> {
    (0..count)
        .map(|i| WasteItem {
            id: format!("w-{i}"),
            name: format!("waste item {i}"),
            bin: BinColor::ALL[i % BinColor::ALL.len()],
            difficulty: level,
        })
        .collect()
}

/// A profile with the given stats and a fixture avatar.
pub fn profile(id: &str, points: u64, plays: u32) -> Profile {
    Profile {
        id: PlayerId::new(id),
        name: format!("member {id}"),
        avatar: AVATARS[0].to_string(),
        points,
        plays,
        accuracy_pct: 0.0,
    }
}
