mod split_tests;

use crate::core::errors::NexusError;
use crate::core::models::account::{AccountSnapshot, AccountType, TransactionSnapshot};
use crate::core::models::payment::PaymentRecord;
use crate::core::models::recommendation::{
    Narrative, PaymentPlan, PlanSplitItem, ReExplainRequest, RecommendationRequest, RecommendationResponse,
};
use crate::core::services::NexusService;
use crate::infrastructure::cache::in_memory::InMemoryCache;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::optimizer::Optimizer;
use crate::infrastructure::storage::Storage;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const USER: &str = "user-1";
pub const TEST_SECRET: &str = "test-secret";

pub type TestService<S> = NexusService<InMemoryLogging, S, InMemoryCache, StubOptimizer>;

pub fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn as_of() -> NaiveDate {
    "2025-03-10".parse().unwrap()
}

/// Optimizer double. Recommends `plan` when set, fails otherwise. Re-explains after
/// the delay named by `optimal_plan.delay_ms`, echoing the first custom amount.
#[derive(Clone, Default)]
pub struct StubOptimizer {
    pub plans: Option<RecommendationResponse>,
    pub re_explain_calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Optimizer for StubOptimizer {
    async fn recommend(&self, _request: &RecommendationRequest) -> Result<RecommendationResponse, NexusError> {
        self.plans
            .clone()
            .ok_or_else(|| NexusError::OptimizerError("connection refused".to_string()))
    }

    async fn re_explain(&self, request: &ReExplainRequest) -> Result<Narrative, NexusError> {
        self.re_explain_calls.fetch_add(1, Ordering::SeqCst);
        let delay = request.optimal_plan["delay_ms"].as_u64().unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        let first = request.custom_split.first().map(|item| item.amount).unwrap_or_default();
        Ok(Narrative {
            explanation: Some(format!("First card gets {}", first)),
            projected_outcome: None,
        })
    }
}

/// Storage whose transaction history is unavailable.
pub struct FailingTransactions(pub InMemoryStorage);

#[async_trait]
impl Storage for FailingTransactions {
    async fn get_accounts(&self, user_id: &str) -> Result<Vec<AccountSnapshot>, NexusError> {
        self.0.get_accounts(user_id).await
    }

    async fn get_recent_transactions(
        &self,
        _user_id: &str,
        _since: NaiveDate,
    ) -> Result<Vec<TransactionSnapshot>, NexusError> {
        Err(NexusError::StorageError("aggregator timeout".to_string()))
    }

    async fn save_payment(&self, payment: PaymentRecord) -> Result<(), NexusError> {
        self.0.save_payment(payment).await
    }

    async fn get_payments(&self, user_id: &str) -> Result<Vec<PaymentRecord>, NexusError> {
        self.0.get_payments(user_id).await
    }
}

fn account(id: &str, balance: &str, account_type: AccountType) -> AccountSnapshot {
    AccountSnapshot {
        id: id.to_string(),
        name: id.to_uppercase(),
        institution: Some("Test Bank".to_string()),
        balance: d(balance),
        account_type,
        apr: None,
        credit_limit: None,
        minimum_payment: None,
    }
}

fn card(id: &str, balance: &str, apr: &str, limit: &str) -> AccountSnapshot {
    AccountSnapshot {
        apr: Some(d(apr)),
        credit_limit: Some(d(limit)),
        ..account(id, balance, AccountType::Credit)
    }
}

fn tx(on: &str, amount: &str, merchant: Option<&str>, category: Option<&str>, recurring: bool) -> TransactionSnapshot {
    TransactionSnapshot {
        date: on.parse().unwrap(),
        amount: d(amount),
        merchant: merchant.map(String::from),
        category: category.map(String::from),
        is_recurring: recurring,
    }
}

/// 5000 cash, 800 of monthly bills, two cards.
pub async fn seeded_storage() -> InMemoryStorage {
    let storage = InMemoryStorage::new();
    storage
        .set_accounts(
            USER,
            vec![
                account("chk", "3000", AccountType::Checking),
                account("sav", "2000", AccountType::Savings),
                card("visa", "1500", "24.99", "5000"),
                card("amex", "800", "18.99", "4000"),
            ],
        )
        .await;
    storage
        .add_transactions(
            USER,
            vec![
                tx("2025-03-01", "500", Some("Landlord"), Some("Rent"), true),
                tx("2025-02-01", "500", Some("Landlord"), Some("Rent"), true),
                tx("2025-03-05", "300", None, Some("Utility Bills"), false),
                tx("2025-03-06", "42.17", Some("Grocer"), Some("Food"), false),
                tx("2024-11-01", "999", Some("Old Lease"), None, true),
            ],
        )
        .await;
    storage
}

pub fn plan(name: &str, split: &[(&str, &str)]) -> PaymentPlan {
    PaymentPlan {
        name: name.to_string(),
        split: split
            .iter()
            .map(|(card_id, amount)| PlanSplitItem {
                card_id: card_id.to_string(),
                card_name: None,
                amount: d(amount),
                split_type: None,
            })
            .collect(),
        explanation: Some(format!("{} explanation", name)),
        projected_outcome: None,
    }
}

pub fn optimizer_plans() -> RecommendationResponse {
    RecommendationResponse {
        nexus_recommendation: Some("Avalanche Method".to_string()),
        minimize_interest_plan: plan("Avalanche Method", &[("visa", "275"), ("amex", "25")]),
        maximize_score_plan: plan("Credit Score Booster", &[("visa", "25"), ("amex", "275")]),
        fallback: false,
    }
}

pub fn create_test_service<S: Storage>(storage: S, optimizer: StubOptimizer) -> TestService<S> {
    let _ = env_logger::try_init();
    NexusService::new(storage, InMemoryLogging::new(), InMemoryCache::new(), optimizer, TEST_SECRET)
}
