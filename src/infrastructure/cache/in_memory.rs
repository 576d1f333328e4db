use crate::core::errors::NexusError;
use crate::core::models::account::AccountSnapshot;
use crate::infrastructure::cache::Cache;
use crate::infrastructure::cache::cache_keys::user_accounts_key;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type Entry = (Vec<AccountSnapshot>, DateTime<Utc>);

#[derive(Clone, Default)]
pub struct InMemoryCache {
    cache: Arc<RwLock<HashMap<String, Entry>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        InMemoryCache {
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_accounts(&self, user_id: &str) -> Result<Option<Vec<AccountSnapshot>>, NexusError> {
        let cache = self.cache.read().await;
        let key = user_accounts_key(user_id);
        Ok(cache
            .get(&key)
            .filter(|(_, expiry)| *expiry > Utc::now())
            .map(|(accounts, _)| accounts.clone()))
    }

    async fn save_accounts(
        &self,
        user_id: &str,
        accounts: &[AccountSnapshot],
        ttl: std::time::Duration,
    ) -> Result<(), NexusError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| NexusError::CacheError(format!("Failed to convert TTL: {}", e)))?;
        let mut cache = self.cache.write().await;
        // Expired entries are dropped on write.
        let now = Utc::now();
        cache.retain(|_, (_, expiry)| *expiry > now);
        cache.insert(user_accounts_key(user_id), (accounts.to_vec(), now + ttl));
        Ok(())
    }

    async fn invalidate_accounts(&self, user_id: &str) -> Result<(), NexusError> {
        let mut cache = self.cache.write().await;
        cache.remove(&user_accounts_key(user_id));
        Ok(())
    }
}
