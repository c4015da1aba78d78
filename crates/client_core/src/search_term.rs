use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use storage::Storage;
use tokio::sync::Mutex;
use tracing::debug;

pub const SEARCH_TERM_KEY: &str = "search";
pub const DEFAULT_SEARCH_TERM: &str = "React";

/// Durable string storage used for client preferences.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[async_trait]
impl KeyValueStore for Storage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_value(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value).await
    }
}

#[derive(Default, Clone)]
pub struct MemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A string value mirrored into a [`KeyValueStore`] under a fixed key.
///
/// The stored value is read once on [`PersistedSearchTerm::load`]; an absent or empty entry
/// falls back to the provided default. Every [`PersistedSearchTerm::set`] writes through.
pub struct PersistedSearchTerm {
    store: Arc<dyn KeyValueStore>,
    key: String,
    value: String,
}

impl PersistedSearchTerm {
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        default: impl Into<String>,
    ) -> Result<Self> {
        let key = key.into();
        let value = match store.get(&key).await? {
            Some(stored) if !stored.is_empty() => stored,
            _ => default.into(),
        };
        debug!(key = %key, value = %value, "loaded persisted search term");
        Ok(Self { store, key, value })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Updates the held value, then writes it back. The in-memory value is kept even when
    /// the write fails.
    pub async fn set(&mut self, value: impl Into<String>) -> Result<()> {
        self.value = value.into();
        self.store.set(&self.key, &self.value).await?;
        debug!(key = %self.key, value = %self.value, "persisted search term");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/search_term_tests.rs"]
mod tests;
