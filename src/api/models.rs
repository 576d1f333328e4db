use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::errors::NexusError;
use crate::core::models::payment::PaymentLine;
use crate::core::models::recommendation::{CardAccount, PaymentPlan, UserContext};
use crate::core::models::split::PaymentSplit;
use crate::core::money::AmountInput;
use crate::core::services::SplitView;
use rust_decimal::Decimal;

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct RecommendationPayload {
    /// Cards to optimize over. Empty means the user's linked credit cards.
    #[serde(default)]
    pub accounts: Vec<CardAccount>,
    pub payment_amount: Decimal,
    #[serde(default)]
    pub user_context: Option<UserContext>,
}

#[derive(Deserialize, ToSchema)]
pub struct BuildSplitRequest {
    pub plan: PaymentPlan,
    #[serde(default)]
    pub accounts: Vec<CardAccount>,
}

/// Optimizer context needed to re-explain an edited split.
#[derive(Deserialize, ToSchema)]
pub struct ExplainContext {
    #[schema(value_type = Object)]
    pub optimal_plan: serde_json::Value,
    #[serde(default)]
    pub user_context: UserContext,
}

#[derive(Deserialize, ToSchema)]
pub struct RedistributeRequest {
    pub split: PaymentSplit,
    pub edited_index: usize,
    /// JSON number or the raw text typed into the field.
    pub amount: AmountInput,
    #[serde(default)]
    pub accounts: Vec<CardAccount>,
    /// When present a re-explain is started in the background for the new split.
    #[serde(default)]
    pub explain: Option<ExplainContext>,
}

#[derive(Serialize, ToSchema)]
pub struct RedistributeResponse {
    #[serde(flatten)]
    pub view: SplitView,
    pub explain_sequence: Option<u64>,
}

#[derive(Deserialize, ToSchema)]
pub struct ResetSplitRequest {
    pub split: PaymentSplit,
    #[serde(default)]
    pub accounts: Vec<CardAccount>,
}

#[derive(Deserialize, ToSchema)]
pub struct ExecutePaymentRequest {
    pub funding_account_id: String,
    pub split: Vec<PaymentLine>,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for NexusError to implement IntoResponse
pub struct ApiError(pub NexusError);

impl From<NexusError> for ApiError {
    fn from(err: NexusError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            NexusError::InvalidInput(..)
            | NexusError::EmptySplit
            | NexusError::InvalidSplitIndex { .. }
            | NexusError::DuplicateCard(_) => StatusCode::BAD_REQUEST,
            NexusError::SplitOutOfBalance { .. } | NexusError::NoActiveSplit => StatusCode::CONFLICT,
            NexusError::FundingAccountNotFound(_) => StatusCode::NOT_FOUND,
            NexusError::OptimizerError(_) => StatusCode::BAD_GATEWAY,
            NexusError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            NexusError::InternalServerError(_)
            | NexusError::StorageError(_)
            | NexusError::LoggingError(_)
            | NexusError::CacheError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let error_message = match self.0 {
            NexusError::InvalidInput(_, field) => format!("{}: {}", field.title, field.description),
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error: error_message })).into_response()
    }
}
