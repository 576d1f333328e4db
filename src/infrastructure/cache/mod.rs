pub mod cache_keys;
pub mod in_memory;

use crate::core::errors::NexusError;
use crate::core::models::account::AccountSnapshot;
use async_trait::async_trait;

#[async_trait]
pub trait Cache: Send + Sync {
    async fn get_accounts(&self, user_id: &str) -> Result<Option<Vec<AccountSnapshot>>, NexusError>;
    async fn save_accounts(
        &self,
        user_id: &str,
        accounts: &[AccountSnapshot],
        ttl: std::time::Duration,
    ) -> Result<(), NexusError>;
    async fn invalidate_accounts(&self, user_id: &str) -> Result<(), NexusError>;
}
