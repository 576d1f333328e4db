use crate::core::errors::NexusError;
use crate::core::models::account::{AccountSnapshot, TransactionSnapshot};
use crate::core::models::payment::PaymentRecord;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Linked account data plus the record of payments made through the app.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_accounts(&self, user_id: &str) -> Result<Vec<AccountSnapshot>, NexusError>;
    /// Transactions dated on or after `since`.
    async fn get_recent_transactions(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> Result<Vec<TransactionSnapshot>, NexusError>;
    async fn save_payment(&self, payment: PaymentRecord) -> Result<(), NexusError>;
    async fn get_payments(&self, user_id: &str) -> Result<Vec<PaymentRecord>, NexusError>;
}

pub mod in_memory;
