use crate::core::errors::NexusError;
use crate::core::models::recommendation::{
    Narrative, ReExplainRequest, RecommendationRequest, RecommendationResponse,
};
use crate::infrastructure::optimizer::Optimizer;
use async_trait::async_trait;
use log::{error, info};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

const RECOMMEND_PATH: &str = "/v2/interestkiller";
const RE_EXPLAIN_PATH: &str = "/v2/interestkiller/re-explain";

/// Optimizer reached over JSON/HTTP.
#[derive(Clone)]
pub struct HttpOptimizer {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOptimizer {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, NexusError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| NexusError::OptimizerError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(HttpOptimizer {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, NexusError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        info!("POST {}", url);
        let resp = self.client.post(&url).json(body).send().await.map_err(|e| {
            error!("Optimizer request to {} failed: {}", url, e);
            NexusError::OptimizerError(format!("Request to {} failed: {}", path, e))
        })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            error!("Optimizer returned {} for {}: {}", status, url, text);
            return Err(NexusError::OptimizerError(format!(
                "{} returned {}: {}",
                path, status, text
            )));
        }

        resp.json::<R>().await.map_err(|e| {
            error!("Optimizer response from {} was malformed: {}", url, e);
            NexusError::OptimizerError(format!("Malformed response from {}: {}", path, e))
        })
    }
}

#[async_trait]
impl Optimizer for HttpOptimizer {
    async fn recommend(&self, request: &RecommendationRequest) -> Result<RecommendationResponse, NexusError> {
        self.post(RECOMMEND_PATH, request).await
    }

    async fn re_explain(&self, request: &ReExplainRequest) -> Result<Narrative, NexusError> {
        self.post(RE_EXPLAIN_PATH, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let optimizer = HttpOptimizer::new("http://127.0.0.1:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(optimizer.base_url, "http://127.0.0.1:8000");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_optimizer_error() {
        // Port 9 (discard) is not served in test environments.
        let optimizer = HttpOptimizer::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let request = RecommendationRequest {
            accounts: vec![],
            payment_amount: rust_decimal::Decimal::ONE_HUNDRED,
            user_context: Default::default(),
        };
        let result = optimizer.recommend(&request).await;
        assert!(matches!(result, Err(NexusError::OptimizerError(_))));
    }
}
