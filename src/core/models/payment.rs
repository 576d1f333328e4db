use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PaymentLine {
    pub card_id: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PaymentResult {
    pub card_id: String,
    pub amount: Decimal,
    pub status: String,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentRecord {
    pub id: String,
    pub user_id: String,
    pub funding_account_id: String,
    pub amount: Decimal,
    pub status: String,
    pub cards: Vec<PaymentLine>,
    #[serde(with = "chrono::serde::ts_seconds")]
    #[schema(value_type = i64, example = 1717245296)]
    pub created_at: chrono::DateTime<chrono::Utc>,
}
