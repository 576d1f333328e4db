use crate::auth::jwt::{Claims, JwtService};
use crate::constants::{
    ACCOUNT_CACHE_TTL_SECS, BILL_LOOKBACK_DAYS, PAYMENT_CONTEXT_COMPUTED, PAYMENT_EXECUTED,
    RECOMMENDATION_FALLBACK, RECOMMENDATION_REQUESTED, SPLIT_CREATED, SPLIT_REDISTRIBUTED,
    SPLIT_RESET, SPLIT_RE_EXPLAINED,
};
use crate::core::analytics::SplitSummary;
use crate::core::ceiling::{compute_safe_context, compute_safe_context_degraded};
use crate::core::errors::NexusError;
use crate::core::explain::{ExplainCoordinator, SequencedNarrative};
use crate::core::fallback::fallback_recommendation;
use crate::core::models::{
    account::AccountSnapshot,
    audit::AppLog,
    payment::{PaymentLine, PaymentRecord, PaymentResult},
    payment_context::{PaymentWarning, SafePaymentContext},
    recommendation::{CardAccount, PaymentPlan, ReExplainRequest, RecommendationRequest, RecommendationResponse, UserContext},
    split::PaymentSplit,
};
use crate::core::money::{AmountInput, check_amount, round_cents, sum_amounts};
use crate::infrastructure::cache::Cache;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::optimizer::Optimizer;
use crate::infrastructure::storage::Storage;
use chrono::{Days, NaiveDate, Utc};
use log::{info, warn};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use utoipa::ToSchema;
use uuid::Uuid;

const SANDBOX_STATUS: &str = "success";
const SANDBOX_MESSAGE: &str = "Sandbox payment simulated";

/// A split together with the figures shown next to it.
#[derive(Serialize, Debug, ToSchema, Clone)]
pub struct SplitView {
    pub split: PaymentSplit,
    pub summary: SplitSummary,
}

#[derive(Serialize, Debug, ToSchema, Clone)]
pub struct ExecutePaymentResponse {
    pub payment_id: String,
    pub payments: Vec<PaymentResult>,
    /// Present when the total went past the safe ceiling. The payment still goes through.
    pub warning: Option<PaymentWarning>,
}

#[derive(Serialize, Debug, ToSchema, Clone)]
pub struct ReExplainOutcome {
    pub sequence: u64,
    /// False when a newer re-explain for the same user finished first or this one failed.
    pub latest: bool,
    pub current: Option<SequencedNarrative>,
}

pub struct NexusService<L: LoggingService, S: Storage, C: Cache, O: Optimizer> {
    storage: S,
    logging: L,
    cache: C,
    optimizer: Arc<O>,
    explainers: RwLock<HashMap<String, Arc<ExplainCoordinator<O>>>>,
    jwt_service: JwtService,
    account_cache_ttl: Duration,
}

impl<L: LoggingService, S: Storage, C: Cache, O: Optimizer + 'static> NexusService<L, S, C, O> {
    pub fn new(storage: S, logging: L, cache: C, optimizer: O, jwt_secret: &str) -> Self {
        NexusService {
            storage,
            logging,
            cache,
            optimizer: Arc::new(optimizer),
            explainers: RwLock::new(HashMap::new()),
            jwt_service: JwtService::new(jwt_secret),
            account_cache_ttl: Duration::from_secs(ACCOUNT_CACHE_TTL_SECS),
        }
    }

    pub fn with_account_cache_ttl(mut self, ttl: Duration) -> Self {
        self.account_cache_ttl = ttl;
        self
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, NexusError> {
        self.jwt_service.validate_token(token)
    }

    async fn log_action(&self, action: &str, details: serde_json::Value, user_id: &str) -> Result<(), NexusError> {
        self.logging.log_action(action, details, Some(user_id)).await
    }

    /// Linked accounts of a user, served from cache while the snapshot is fresh.
    pub async fn get_accounts(&self, user_id: &str) -> Result<Vec<AccountSnapshot>, NexusError> {
        if let Some(accounts) = self.cache.get_accounts(user_id).await? {
            return Ok(accounts);
        }
        let accounts = self.storage.get_accounts(user_id).await?;
        self.cache
            .save_accounts(user_id, &accounts, self.account_cache_ttl)
            .await?;
        Ok(accounts)
    }

    async fn compute_context(&self, user_id: &str, as_of: NaiveDate) -> Result<SafePaymentContext, NexusError> {
        let since = as_of
            .checked_sub_days(Days::new(BILL_LOOKBACK_DAYS))
            .unwrap_or(NaiveDate::MIN);
        let (accounts, transactions) = futures::join!(
            self.get_accounts(user_id),
            self.storage.get_recent_transactions(user_id, since)
        );
        let accounts = accounts?;
        Ok(match transactions {
            Ok(transactions) => compute_safe_context(&accounts, &transactions, as_of),
            Err(e) => compute_safe_context_degraded(&accounts, &e.to_string()),
        })
    }

    pub async fn payment_context(&self, user_id: &str, as_of: NaiveDate) -> Result<SafePaymentContext, NexusError> {
        let context = self.compute_context(user_id, as_of).await?;
        self.log_action(
            PAYMENT_CONTEXT_COMPUTED,
            json!({
                "as_of": as_of.to_string(),
                "max_safe_payment": context.max_safe_payment,
                "degraded": !context.warnings.is_empty()
            }),
            user_id,
        )
        .await?;
        Ok(context)
    }

    /// Credit cards to optimize over: the posted ones, or the user's linked cards when
    /// none were posted. Gaps in APR and limit are filled with defaults.
    pub async fn resolve_cards(&self, user_id: &str, posted: Vec<CardAccount>) -> Result<Vec<CardAccount>, NexusError> {
        let cards: Vec<CardAccount> = if posted.is_empty() {
            self.get_accounts(user_id)
                .await?
                .iter()
                .filter(|account| account.account_type.is_credit())
                .map(CardAccount::from_snapshot)
                .collect()
        } else {
            posted.into_iter().filter(|card| card.card_type == "credit").collect()
        };
        let cards: Vec<CardAccount> = cards
            .into_iter()
            .filter(|card| !card.id.trim().is_empty())
            .map(|card| card.check_bounds().map(|_| card.normalized()))
            .collect::<Result<_, _>>()?;
        if cards.is_empty() {
            return Err(NexusError::invalid_input(
                "accounts",
                "No Credit Cards",
                "No valid credit cards found for this user",
            ));
        }
        Ok(cards)
    }

    /// Asks the optimizer for plans, answering locally when it fails.
    pub async fn recommend(
        &self,
        user_id: &str,
        cards: Vec<CardAccount>,
        payment_amount: Decimal,
        user_context: Option<UserContext>,
    ) -> Result<RecommendationResponse, NexusError> {
        if payment_amount <= Decimal::ZERO {
            return Err(NexusError::invalid_input(
                "payment_amount",
                "Invalid Amount",
                "Please enter a valid payment amount",
            ));
        }
        check_amount("payment_amount", "Payment amount", payment_amount)?;
        let request = RecommendationRequest {
            accounts: self.resolve_cards(user_id, cards).await?,
            payment_amount: round_cents(payment_amount),
            user_context: user_context.unwrap_or_default(),
        };

        let response = match self.optimizer.recommend(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Optimizer unavailable for user {}: {}", user_id, e);
                self.log_action(
                    RECOMMENDATION_FALLBACK,
                    json!({ "reason": e.to_string(), "payment_amount": request.payment_amount }),
                    user_id,
                )
                .await?;
                fallback_recommendation(&request.accounts, request.payment_amount, &request.user_context)
            }
        };

        self.log_action(
            RECOMMENDATION_REQUESTED,
            json!({
                "payment_amount": request.payment_amount,
                "cards": request.accounts.len(),
                "fallback": response.fallback
            }),
            user_id,
        )
        .await?;
        Ok(response)
    }

    /// Starts an editable split from one of the recommended plans.
    pub async fn build_split(&self, user_id: &str, plan: &PaymentPlan, cards: &[CardAccount]) -> Result<SplitView, NexusError> {
        let split = PaymentSplit::from_recommendation(&plan.split, cards)?;
        self.explainer(user_id).await.supersede().await;
        self.log_action(
            SPLIT_CREATED,
            json!({ "plan": plan.name, "total": split.original_total(), "cards": split.len() }),
            user_id,
        )
        .await?;
        Ok(view(split, cards))
    }

    pub async fn redistribute_split(
        &self,
        user_id: &str,
        mut split: PaymentSplit,
        edited_index: usize,
        amount: &AmountInput,
        cards: &[CardAccount],
    ) -> Result<SplitView, NexusError> {
        split.validate()?;
        let requested = amount.to_amount();
        split.redistribute(edited_index, requested)?;
        // Narratives still in flight describe the amounts before this edit.
        self.explainer(user_id).await.supersede().await;
        info!(
            "User {} set split entry {} to {}, total stays {}",
            user_id,
            edited_index,
            requested,
            split.original_total()
        );
        self.log_action(
            SPLIT_REDISTRIBUTED,
            json!({
                "edited_index": edited_index,
                "requested": requested,
                "amounts": split.entries().iter().map(|e| e.amount).collect::<Vec<_>>()
            }),
            user_id,
        )
        .await?;
        Ok(view(split, cards))
    }

    pub async fn reset_split(&self, user_id: &str, mut split: PaymentSplit, cards: &[CardAccount]) -> Result<SplitView, NexusError> {
        split.validate()?;
        split.reset();
        self.explainer(user_id).await.supersede().await;
        self.log_action(SPLIT_RESET, json!({ "total": split.original_total() }), user_id)
            .await?;
        Ok(view(split, cards))
    }

    async fn explainer(&self, user_id: &str) -> Arc<ExplainCoordinator<O>> {
        if let Some(explainer) = self.explainers.read().await.get(user_id) {
            return Arc::clone(explainer);
        }
        let mut explainers = self.explainers.write().await;
        Arc::clone(
            explainers
                .entry(user_id.to_string())
                .or_insert_with(|| Arc::new(ExplainCoordinator::new(Arc::clone(&self.optimizer)))),
        )
    }

    /// Starts a re-explain without waiting for it. Returns its sequence number.
    pub async fn dispatch_re_explain(&self, user_id: &str, request: ReExplainRequest) -> Result<u64, NexusError> {
        let (sequence, _) = self.explainer(user_id).await.dispatch(request);
        self.log_action(SPLIT_RE_EXPLAINED, json!({ "sequence": sequence }), user_id)
            .await?;
        Ok(sequence)
    }

    /// Runs a re-explain and reports the narrative that is current once it settles.
    pub async fn re_explain(&self, user_id: &str, request: ReExplainRequest) -> Result<ReExplainOutcome, NexusError> {
        let explainer = self.explainer(user_id).await;
        let (sequence, handle) = explainer.dispatch(request);
        handle
            .await
            .map_err(|e| NexusError::InternalServerError(format!("Re-explain task failed: {}", e)))?;
        let current = explainer.current().await;
        let latest = current.as_ref().is_some_and(|c| c.sequence == sequence);
        self.log_action(
            SPLIT_RE_EXPLAINED,
            json!({ "sequence": sequence, "latest": latest }),
            user_id,
        )
        .await?;
        Ok(ReExplainOutcome { sequence, latest, current })
    }

    pub async fn current_narrative(&self, user_id: &str) -> Option<SequencedNarrative> {
        self.explainer(user_id).await.current().await
    }

    /// Simulated sandbox payment. Exceeding the safe ceiling only attaches a warning.
    pub async fn execute_payment(
        &self,
        user_id: &str,
        funding_account_id: &str,
        lines: Vec<PaymentLine>,
        as_of: NaiveDate,
    ) -> Result<ExecutePaymentResponse, NexusError> {
        if lines.is_empty() {
            return Err(NexusError::EmptySplit);
        }
        if let Some(line) = lines.iter().find(|l| l.card_id.trim().is_empty() || l.amount < Decimal::ZERO) {
            return Err(NexusError::invalid_input(
                "split",
                "Invalid Payment",
                format!("Invalid payment line for card '{}'", line.card_id),
            ));
        }
        for line in &lines {
            check_amount("split", &format!("Payment to card {}", line.card_id), line.amount)?;
        }

        let context = self.compute_context(user_id, as_of).await?;
        if !context.funding_accounts.iter().any(|acc| acc.id == funding_account_id) {
            return Err(NexusError::FundingAccountNotFound(funding_account_id.to_string()));
        }

        let lines: Vec<PaymentLine> = lines
            .into_iter()
            .map(|line| PaymentLine {
                amount: round_cents(line.amount),
                ..line
            })
            .collect();
        let total = sum_amounts(lines.iter().map(|l| &l.amount));
        let warning = context.check_payment(total);
        if let Some(warning) = &warning {
            warn!("User {}: {}", user_id, warning.message);
        }

        let payments = lines
            .iter()
            .map(|line| PaymentResult {
                card_id: line.card_id.clone(),
                amount: line.amount,
                status: SANDBOX_STATUS.to_string(),
                message: SANDBOX_MESSAGE.to_string(),
            })
            .collect();

        let record = PaymentRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            funding_account_id: funding_account_id.to_string(),
            amount: total,
            status: SANDBOX_STATUS.to_string(),
            cards: lines,
            created_at: Utc::now(),
        };
        let payment_id = record.id.clone();
        self.storage.save_payment(record).await?;
        // Balances moved, the cached snapshot is stale.
        self.cache.invalidate_accounts(user_id).await?;

        self.log_action(
            PAYMENT_EXECUTED,
            json!({
                "payment_id": payment_id,
                "funding_account_id": funding_account_id,
                "amount": total,
                "exceeds_safe_ceiling": warning.is_some()
            }),
            user_id,
        )
        .await?;

        Ok(ExecutePaymentResponse {
            payment_id,
            payments,
            warning,
        })
    }

    pub async fn payment_history(&self, user_id: &str) -> Result<Vec<PaymentRecord>, NexusError> {
        self.storage.get_payments(user_id).await
    }

    pub async fn get_app_logs(&self) -> Result<Vec<AppLog>, NexusError> {
        self.logging.get_logs().await
    }
}

fn view(split: PaymentSplit, cards: &[CardAccount]) -> SplitView {
    SplitView {
        summary: SplitSummary::new(split.entries(), cards),
        split,
    }
}
