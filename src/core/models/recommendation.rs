use super::account::AccountSnapshot;
use crate::constants::{DEFAULT_APR, DEFAULT_CREDIT_LIMIT};
use crate::core::errors::NexusError;
use crate::core::money::{ONE_MINOR_UNIT, check_amount, check_apr};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Credit card as the optimizer sees it.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CardAccount {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub balance: Decimal,
    #[serde(default)]
    pub apr: Option<Decimal>,
    #[serde(rename = "creditLimit", alias = "credit_limit", default)]
    pub credit_limit: Option<Decimal>,
    #[serde(rename = "minimumPayment", alias = "minimum_payment", default)]
    pub minimum_payment: Option<Decimal>,
    #[serde(default)]
    pub promo_apr_expiry_date: Option<String>,
    #[serde(rename = "type", default = "default_card_type")]
    pub card_type: String,
}

pub(crate) fn default_card_type() -> String {
    "credit".to_string()
}

impl CardAccount {
    pub fn from_snapshot(account: &AccountSnapshot) -> Self {
        CardAccount {
            id: account.id.clone(),
            name: account.name.clone(),
            balance: account.balance,
            apr: account.apr,
            credit_limit: account.credit_limit,
            minimum_payment: account.minimum_payment,
            promo_apr_expiry_date: None,
            card_type: account.account_type.to_string(),
        }
    }

    pub fn apr_or_default(&self) -> Decimal {
        self.apr.unwrap_or(DEFAULT_APR)
    }

    pub fn credit_limit_or_default(&self) -> Decimal {
        match self.credit_limit {
            Some(limit) if limit >= ONE_MINOR_UNIT => limit,
            _ => DEFAULT_CREDIT_LIMIT,
        }
    }

    /// Rejects figures too large to compute with.
    pub fn check_bounds(&self) -> Result<(), NexusError> {
        check_amount("balance", &format!("Balance of card {}", self.id), self.balance)?;
        for (field, value) in [("credit_limit", self.credit_limit), ("minimum_payment", self.minimum_payment)] {
            if let Some(value) = value {
                check_amount(field, &format!("{} of card {}", field, self.id), value)?;
            }
        }
        if let Some(apr) = self.apr {
            check_apr("apr", &format!("card {}", self.id), apr)?;
        }
        Ok(())
    }

    /// Fills the gaps the optimizer cannot work with.
    pub fn normalized(mut self) -> Self {
        self.apr = Some(self.apr_or_default());
        self.credit_limit = Some(self.credit_limit_or_default());
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserContext {
    pub primary_goal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_debt_last_month: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_plan_chosen: Option<String>,
}

impl Default for UserContext {
    fn default() -> Self {
        UserContext {
            primary_goal: "MINIMIZE_INTEREST_COST".to_string(),
            total_debt_last_month: None,
            last_plan_chosen: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RecommendationRequest {
    pub accounts: Vec<CardAccount>,
    pub payment_amount: Decimal,
    pub user_context: UserContext,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PlanSplitItem {
    pub card_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_name: Option<String>,
    pub amount: Decimal,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub split_type: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PaymentPlan {
    #[serde(default)]
    pub name: String,
    pub split: Vec<PlanSplitItem>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub projected_outcome: Option<String>,
}

impl PaymentPlan {
    pub fn total(&self) -> Decimal {
        self.split.iter().map(|item| item.amount).sum()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RecommendationResponse {
    #[serde(default)]
    pub nexus_recommendation: Option<String>,
    pub minimize_interest_plan: PaymentPlan,
    pub maximize_score_plan: PaymentPlan,
    /// Set when the optimizer was unreachable and the local fallback answered.
    #[serde(default)]
    pub fallback: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CustomSplitItem {
    pub card_id: String,
    pub card_name: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub split_type: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ReExplainRequest {
    pub accounts: Vec<CardAccount>,
    #[schema(value_type = Object)]
    pub optimal_plan: serde_json::Value,
    pub custom_split: Vec<CustomSplitItem>,
    pub user_context: UserContext,
}

/// Narrative text attached to a split.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Narrative {
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub projected_outcome: Option<String>,
}

impl From<&PaymentPlan> for Narrative {
    fn from(plan: &PaymentPlan) -> Self {
        Narrative {
            explanation: plan.explanation.clone(),
            projected_outcome: plan.projected_outcome.clone(),
        }
    }
}
