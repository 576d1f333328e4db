use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
    Depository,
    Credit,
    Loan,
    #[serde(other)]
    Other,
}

impl AccountType {
    /// Cash-bearing accounts that can fund a card payment.
    pub fn is_funding_eligible(&self) -> bool {
        matches!(self, AccountType::Checking | AccountType::Savings | AccountType::Depository)
    }

    pub fn is_credit(&self) -> bool {
        *self == AccountType::Credit
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
            AccountType::Depository => "depository",
            AccountType::Credit => "credit",
            AccountType::Loan => "loan",
            AccountType::Other => "other",
        };
        write!(f, "{}", s)
    }
}

/// Read-only view of a linked account as delivered by the aggregator.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub balance: Decimal,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    #[serde(default)]
    pub apr: Option<Decimal>,
    #[serde(default)]
    pub credit_limit: Option<Decimal>,
    #[serde(default)]
    pub minimum_payment: Option<Decimal>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSnapshot {
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub merchant: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
}
