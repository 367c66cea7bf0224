use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;

pub struct MokaCacheWrapper {
    inner: Cache<String, String>,
}

impl Default for MokaCacheWrapper {
    fn default() -> Self {
        let config = AppConfig::get();
        Self::with_settings(config.cache.memory.max_capacity, config.cache.default_ttl)
    }
}

impl MokaCacheWrapper {
    pub fn with_settings(max_capacity: u64, ttl_secs: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        debug!(
            "Moka cache initialized (capacity: {}, ttl: {}s)",
            max_capacity, ttl_secs
        );
        Self { inner }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(value) => CacheResult::Found(value),
            None => CacheResult::NotFound,
        }
    }

    async fn insert_raw(&self, key: String, value: String) {
        self.inner.insert(key, value).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{get_json, insert_json, user_key};

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = MokaCacheWrapper::with_settings(16, 60);
        let key = user_key("abc");
        insert_json(&cache, key.clone(), &vec![1, 2, 3]).await;
        assert_eq!(get_json::<Vec<i32>>(&cache, &key).await, Some(vec![1, 2, 3]));

        cache.remove(&key).await;
        assert_eq!(cache.get_raw(&key).await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_bad_entry_is_dropped() {
        let cache = MokaCacheWrapper::with_settings(16, 60);
        cache.insert_raw("k".into(), "not json".into()).await;
        assert_eq!(get_json::<Vec<i32>>(&cache, "k").await, None);
        assert_eq!(cache.get_raw("k").await, CacheResult::NotFound);
    }
}
