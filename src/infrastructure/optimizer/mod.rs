pub mod http;

use crate::core::errors::NexusError;
use crate::core::models::recommendation::{
    Narrative, ReExplainRequest, RecommendationRequest, RecommendationResponse,
};
use async_trait::async_trait;

/// Remote service that proposes payment plans and writes the text explaining them.
#[async_trait]
pub trait Optimizer: Send + Sync {
    async fn recommend(&self, request: &RecommendationRequest) -> Result<RecommendationResponse, NexusError>;
    async fn re_explain(&self, request: &ReExplainRequest) -> Result<Narrative, NexusError>;
}
