use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::{
    api::models::{
        BuildSplitRequest, ErrorResponse, ExecutePaymentRequest, ExplainContext, HealthResponse,
        RecommendationPayload, RedistributeRequest, RedistributeResponse, ResetSplitRequest,
    },
    core::{
        analytics::{SplitSummary, UtilizationChange},
        explain::SequencedNarrative,
        models::{
            account::{AccountSnapshot, AccountType},
            audit::AppLog,
            payment::{PaymentLine, PaymentRecord, PaymentResult},
            payment_context::{PaymentWarning, SafePaymentContext, UpcomingBill},
            recommendation::{
                CardAccount, CustomSplitItem, Narrative, PaymentPlan, PlanSplitItem, ReExplainRequest,
                RecommendationResponse, UserContext,
            },
            split::{PaymentSplit, PaymentSplitEntry},
        },
        services::{ExecutePaymentResponse, ReExplainOutcome, SplitView},
    },
};

struct BearerAuth;

impl utoipa::Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme("Bearer", SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)));
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::health,
        super::handlers::get_payment_context,
        super::handlers::ai_recommendation,
        super::handlers::build_split,
        super::handlers::redistribute_split,
        super::handlers::reset_split,
        super::handlers::re_explain,
        super::handlers::latest_narrative,
        super::handlers::execute_payment,
        super::handlers::payment_history,
        super::handlers::get_app_logs
    ),
    components(schemas(
        RecommendationPayload,
        BuildSplitRequest,
        ExplainContext,
        RedistributeRequest,
        RedistributeResponse,
        ResetSplitRequest,
        ExecutePaymentRequest,
        HealthResponse,
        ErrorResponse,
        AccountSnapshot,
        AccountType,
        SafePaymentContext,
        UpcomingBill,
        PaymentWarning,
        CardAccount,
        UserContext,
        PlanSplitItem,
        PaymentPlan,
        RecommendationResponse,
        CustomSplitItem,
        ReExplainRequest,
        Narrative,
        SequencedNarrative,
        PaymentSplitEntry,
        PaymentSplit,
        SplitSummary,
        UtilizationChange,
        SplitView,
        ReExplainOutcome,
        PaymentLine,
        PaymentResult,
        PaymentRecord,
        ExecutePaymentResponse,
        AppLog
    )),
    modifiers(&BearerAuth),
    info(
        title = "Nexus API",
        description = "Card payment planning: safe payment ceiling, split recommendations and redistribution",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
