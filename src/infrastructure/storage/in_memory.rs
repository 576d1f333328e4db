use crate::core::errors::NexusError;
use crate::core::models::account::{AccountSnapshot, TransactionSnapshot};
use crate::core::models::payment::PaymentRecord;
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    accounts: Arc<RwLock<HashMap<String, Vec<AccountSnapshot>>>>,
    transactions: Arc<RwLock<HashMap<String, Vec<TransactionSnapshot>>>>,
    payments: Arc<RwLock<HashMap<String, Vec<PaymentRecord>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            accounts: Arc::new(RwLock::new(HashMap::new())),
            transactions: Arc::new(RwLock::new(HashMap::new())),
            payments: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Replaces the linked accounts of a user, as an aggregator sync would.
    pub async fn set_accounts(&self, user_id: &str, accounts: Vec<AccountSnapshot>) {
        self.accounts.write().await.insert(user_id.to_string(), accounts);
    }

    pub async fn add_transactions(&self, user_id: &str, transactions: Vec<TransactionSnapshot>) {
        self.transactions
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .extend(transactions);
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn get_accounts(&self, user_id: &str) -> Result<Vec<AccountSnapshot>, NexusError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(user_id).cloned().unwrap_or_default())
    }

    async fn get_recent_transactions(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> Result<Vec<TransactionSnapshot>, NexusError> {
        let transactions = self.transactions.read().await;
        Ok(transactions
            .get(user_id)
            .map(|txs| txs.iter().filter(|tx| tx.date >= since).cloned().collect())
            .unwrap_or_default())
    }

    async fn save_payment(&self, payment: PaymentRecord) -> Result<(), NexusError> {
        if payment.user_id.is_empty() {
            return Err(NexusError::StorageError("Payment has no user".to_string()));
        }
        let mut payments = self.payments.write().await;
        payments.entry(payment.user_id.clone()).or_default().push(payment);
        Ok(())
    }

    async fn get_payments(&self, user_id: &str) -> Result<Vec<PaymentRecord>, NexusError> {
        let payments = self.payments.read().await;
        Ok(payments.get(user_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn tx(on: &str) -> TransactionSnapshot {
        TransactionSnapshot {
            date: on.parse().unwrap(),
            amount: Decimal::TEN,
            merchant: None,
            category: None,
            is_recurring: true,
        }
    }

    #[tokio::test]
    async fn test_recent_transactions_filter_by_date() {
        let storage = InMemoryStorage::new();
        storage
            .add_transactions("u1", vec![tx("2025-01-01"), tx("2025-03-01"), tx("2025-03-05")])
            .await;

        let recent = storage
            .get_recent_transactions("u1", "2025-03-01".parse().unwrap())
            .await
            .unwrap();

        assert_eq!(recent.len(), 2);
        assert!(storage.get_recent_transactions("u2", NaiveDate::MIN).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user_has_no_accounts_or_payments() {
        let storage = InMemoryStorage::new();
        assert!(storage.get_accounts("nobody").await.unwrap().is_empty());
        assert!(storage.get_payments("nobody").await.unwrap().is_empty());
    }
}
