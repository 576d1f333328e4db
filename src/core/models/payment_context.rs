use super::account::AccountSnapshot;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UpcomingBill {
    pub name: String,
    pub estimated_amount: Decimal,
}

/// Advisory cash-flow picture used to cap what a user should put toward cards.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SafePaymentContext {
    pub max_safe_payment: Decimal,
    pub recommended_funding_account_id: Option<String>,
    pub funding_accounts: Vec<AccountSnapshot>,
    pub total_cash: Decimal,
    pub total_upcoming_bills: Decimal,
    pub upcoming_bills: Vec<UpcomingBill>,
    pub safety_buffer: Decimal,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentWarning {
    pub requested: Decimal,
    pub max_safe_payment: Decimal,
    pub message: String,
}

impl SafePaymentContext {
    /// Returns a warning when `amount` goes past the safe ceiling. Never a hard stop.
    pub fn check_payment(&self, amount: Decimal) -> Option<PaymentWarning> {
        if amount <= self.max_safe_payment {
            return None;
        }
        Some(PaymentWarning {
            requested: amount,
            max_safe_payment: self.max_safe_payment,
            message: format!(
                "Payment amount exceeds your safe maximum of ${:.2}.",
                self.max_safe_payment
            ),
        })
    }
}
