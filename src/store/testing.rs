//! Fault injection for engine tests

use super::{KeyValueStore, MemoryStore, StoreError, StoreResult, StoreValue};
use async_trait::async_trait;

/// Memory store that fails operations on keys with a given prefix
#[derive(Default)]
pub(crate) struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_get: Option<&'static str>,
    pub fail_set: Option<&'static str>,
    pub fail_remove: Option<&'static str>,
}

fn check(rule: Option<&'static str>, key: &str) -> StoreResult<()> {
    match rule {
        Some(prefix) if key.starts_with(prefix) => {
            Err(StoreError::Backend(format!("injected failure on {}", key)))
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> StoreResult<Option<StoreValue>> {
        check(self.fail_get, key)?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: StoreValue) -> StoreResult<()> {
        check(self.fail_set, key)?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        check(self.fail_remove, key)?;
        self.inner.remove(key).await
    }

    fn backend_name(&self) -> &'static str {
        "flaky"
    }
}
