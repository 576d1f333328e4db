use crate::{
    api::models::*,
    auth::jwt::Claims,
    core::{
        errors::NexusError,
        explain::SequencedNarrative,
        models::{
            audit::AppLog,
            payment::PaymentRecord,
            payment_context::SafePaymentContext,
            recommendation::{ReExplainRequest, RecommendationResponse},
        },
        services::{ExecutePaymentResponse, NexusService, ReExplainOutcome, SplitView},
    },
    infrastructure::{
        cache::in_memory::InMemoryCache, logging::in_memory::InMemoryLogging, optimizer::http::HttpOptimizer,
        storage::in_memory::InMemoryStorage,
    },
};
use axum::{
    Extension, Json, Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use http::header;

use std::sync::Arc;

pub type AppService = NexusService<InMemoryLogging, InMemoryStorage, InMemoryCache, HttpOptimizer>;

// Middleware to validate JWT
async fn auth_middleware(
    State(service): State<Arc<AppService>>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| NexusError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| NexusError::Unauthorized("Invalid Authorization header".to_string()))?;

    let claims = service.validate_token(token)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

// Define API routes
pub fn api_routes(service: Arc<AppService>) -> Router {
    Router::new()
        .route("/payment-context", get(get_payment_context))
        .route("/pay/ai-recommendation", post(ai_recommendation))
        .route("/pay/split", post(build_split))
        .route("/pay/split/redistribute", post(redistribute_split))
        .route("/pay/split/reset", post(reset_split))
        .route("/pay/re-explain", post(re_explain))
        .route("/pay/re-explain/latest", get(latest_narrative))
        .route("/pay/execute", post(execute_payment))
        .route("/pay/history", get(payment_history))
        .route("/logs", get(get_app_logs))
        .route_layer(middleware::from_fn_with_state(service.clone(), auth_middleware))
        .with_state(service)
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/payment-context",
    responses(
        (status = 200, description = "Safe payment ceiling for today", body = SafePaymentContext),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn get_payment_context(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<SafePaymentContext>, ApiError> {
    let context = service.payment_context(&claims.sub, Utc::now().date_naive()).await?;
    Ok(Json(context))
}

#[utoipa::path(
    post,
    path = "/api/pay/ai-recommendation",
    request_body = RecommendationPayload,
    responses(
        (status = 200, description = "Recommended plans, from the optimizer or the local fallback", body = RecommendationResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn ai_recommendation(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<RecommendationPayload>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let response = service
        .recommend(&claims.sub, req.accounts, req.payment_amount, req.user_context)
        .await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/pay/split",
    request_body = BuildSplitRequest,
    responses(
        (status = 200, description = "Editable split built from the plan", body = SplitView),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn build_split(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<BuildSplitRequest>,
) -> Result<Json<SplitView>, ApiError> {
    let cards = service.resolve_cards(&claims.sub, req.accounts).await?;
    let view = service.build_split(&claims.sub, &req.plan, &cards).await?;
    Ok(Json(view))
}

#[utoipa::path(
    post,
    path = "/api/pay/split/redistribute",
    request_body = RedistributeRequest,
    responses(
        (status = 200, description = "Split rebalanced around the edited card", body = RedistributeResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Posted split does not add up to its total", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn redistribute_split(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<RedistributeRequest>,
) -> Result<Json<RedistributeResponse>, ApiError> {
    let cards = service.resolve_cards(&claims.sub, req.accounts).await?;
    let view = service
        .redistribute_split(&claims.sub, req.split, req.edited_index, &req.amount, &cards)
        .await?;

    let explain_sequence = match req.explain {
        Some(explain) => {
            let request = ReExplainRequest {
                custom_split: view.split.custom_split(&cards),
                accounts: cards,
                optimal_plan: explain.optimal_plan,
                user_context: explain.user_context,
            };
            Some(service.dispatch_re_explain(&claims.sub, request).await?)
        }
        None => None,
    };
    Ok(Json(RedistributeResponse { view, explain_sequence }))
}

#[utoipa::path(
    post,
    path = "/api/pay/split/reset",
    request_body = ResetSplitRequest,
    responses(
        (status = 200, description = "Split restored to the recommended amounts", body = SplitView),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn reset_split(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ResetSplitRequest>,
) -> Result<Json<SplitView>, ApiError> {
    let cards = service.resolve_cards(&claims.sub, req.accounts).await?;
    let view = service.reset_split(&claims.sub, req.split, &cards).await?;
    Ok(Json(view))
}

#[utoipa::path(
    post,
    path = "/api/pay/re-explain",
    request_body = ReExplainRequest,
    responses(
        (status = 200, description = "Narrative current after this request settled", body = ReExplainOutcome),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn re_explain(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ReExplainRequest>,
) -> Result<Json<ReExplainOutcome>, ApiError> {
    let outcome = service.re_explain(&claims.sub, req).await?;
    Ok(Json(outcome))
}

#[utoipa::path(
    get,
    path = "/api/pay/re-explain/latest",
    responses(
        (status = 200, description = "Newest narrative, null until one has arrived", body = SequencedNarrative),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn latest_narrative(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
) -> Json<Option<SequencedNarrative>> {
    Json(service.current_narrative(&claims.sub).await)
}

#[utoipa::path(
    post,
    path = "/api/pay/execute",
    request_body = ExecutePaymentRequest,
    responses(
        (status = 200, description = "Sandbox payment simulated", body = ExecutePaymentResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Funding account not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn execute_payment(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ExecutePaymentRequest>,
) -> Result<Json<ExecutePaymentResponse>, ApiError> {
    let response = service
        .execute_payment(&claims.sub, &req.funding_account_id, req.split, Utc::now().date_naive())
        .await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/pay/history",
    responses(
        (status = 200, description = "Payments made by the user", body = Vec<PaymentRecord>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn payment_history(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<PaymentRecord>>, ApiError> {
    let history = service.payment_history(&claims.sub).await?;
    Ok(Json(history))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "Application logs retrieved successfully", body = Vec<AppLog>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn get_app_logs(State(service): State<Arc<AppService>>) -> Result<Json<Vec<AppLog>>, ApiError> {
    let logs = service.get_app_logs().await?;
    Ok(Json(logs))
}
