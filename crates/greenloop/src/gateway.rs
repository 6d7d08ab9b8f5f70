//! Persistence gateway contract.
//!
//! The core never talks to a concrete backend. Everything it persists or
//! reads goes through [`KvGateway`], a namespaced-key JSON document store
//! the host implements. [`crate::storage::MemoryKvStore`] is the in-memory
//! implementation used by tests.

use crate::error::GameError;
use async_trait::async_trait;
use serde_json::Value;

/// Async key/value gateway to the backing store.
///
/// Keys are namespaced strings (`profile:{family}:{player}`,
/// `move:{player}:{game}:{level}:{id}`); values are JSON documents. The
/// core wraps backend failures in [`GameError::Persistence`] and never
/// interprets backend error subtypes.
#[async_trait]
pub trait KvGateway: Send + Sync {
    /// Store a single value.
    async fn set(&self, key: &str, value: Value) -> Result<(), GameError>;

    /// Fetch a single value, `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<Value>, GameError>;

    /// Remove a single key. Returns whether it existed.
    async fn delete(&self, key: &str) -> Result<bool, GameError>;

    /// Store a batch of entries as one write. The game-over flush relies on
    /// this being a single backend round trip.
    async fn set_many(&self, entries: &[(String, Value)]) -> Result<(), GameError>;

    /// Fetch a batch of values, order-preserving with respect to `keys`.
    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<Value>>, GameError>;

    /// Remove a batch of keys. Returns how many existed.
    async fn delete_many(&self, keys: &[String]) -> Result<usize, GameError>;

    /// Fetch every value whose key starts with `prefix`. Order is
    /// unspecified.
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<Value>, GameError>;
}
