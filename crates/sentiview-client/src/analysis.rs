//! `/analysis` endpoint group: single, batch, predict and the smoke test.

use crate::client::ApiClient;
use crate::error::ApiClientError;
use crate::types::{
    AnalyzeRequest, AnalysisResponse, BatchAnalyzeRequest, BatchAnalysisResponse, HealthStatus,
};

const DEFAULT_BATCH_SIZE: usize = 100;

impl ApiClient {
    /// Classifies a single comment.
    ///
    /// Results are cached per input text for the configured TTL, so repeating
    /// an analysis within the window costs no HTTP round trip.
    ///
    /// # Errors
    ///
    /// - [`ApiClientError::Http`] on network failure or non-2xx status.
    /// - [`ApiClientError::Api`] if the model reports a failed analysis.
    /// - [`ApiClientError::Deserialize`] if the response shape is unexpected.
    pub async fn analyze_single(&self, text: &str) -> Result<AnalysisResponse, ApiClientError> {
        let cache_key = format!("single:{text}");
        if let Some(cached) = self.analysis_cache.get(&cache_key) {
            tracing::debug!(text_len = text.len(), "analysis served from cache");
            return Ok(cached);
        }

        let request = AnalyzeRequest {
            text: text.to_string(),
            include_details: true,
            include_suggestions: true,
        };
        let response: AnalysisResponse = self
            .post_typed("analysis/single", &request, self.api_timeout())
            .await?;
        Self::check_success(&response)?;

        tracing::info!(sentiment = %response.sentiment, confidence = response.confidence, "analysis completed");
        self.analysis_cache.insert(cache_key, response.clone());
        Ok(response)
    }

    /// Classifies a batch of comments in one request.
    ///
    /// Batch calls get double the analysis timeout.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ApiClient::analyze_single`].
    pub async fn analyze_batch(
        &self,
        texts: &[String],
        batch_size: Option<usize>,
    ) -> Result<BatchAnalysisResponse, ApiClientError> {
        let request = BatchAnalyzeRequest {
            texts: texts.to_vec(),
            batch_size: batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
            include_details: true,
        };
        let response: BatchAnalysisResponse = self
            .post_typed("analysis/batch", &request, self.api_timeout() * 2)
            .await?;
        tracing::info!(total = response.total_analyzed, "batch analysis completed");
        Ok(response)
    }

    /// Fast-path prediction; skips details, suggestions and the cache.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ApiClient::analyze_single`].
    pub async fn predict(&self, text: &str) -> Result<AnalysisResponse, ApiClientError> {
        let request = AnalyzeRequest {
            text: text.to_string(),
            include_details: false,
            include_suggestions: false,
        };
        let response: AnalysisResponse = self
            .post_typed("analysis/predict", &request, self.api_timeout())
            .await?;
        Self::check_success(&response)?;
        Ok(response)
    }

    /// Runs the service's built-in test battery.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Http`] or [`ApiClientError::Deserialize`] on
    /// failure; the payload is service-defined, so it stays untyped.
    pub async fn test_analysis(&self) -> Result<serde_json::Value, ApiClientError> {
        self.get_typed("analysis/test", self.api_timeout()).await
    }

    /// Probes `/health` on the API root.
    ///
    /// A dead backend is an expected condition for this call, so failures
    /// map to an offline [`HealthStatus`] instead of an error.
    pub async fn check_health(&self) -> HealthStatus {
        let url = match self.root_endpoint("/health") {
            Ok(url) => url,
            Err(e) => return HealthStatus::offline(e.to_string()),
        };
        let result = self
            .request::<()>(reqwest::Method::GET, url, None, self.default_timeout())
            .await
            .and_then(|value| Self::parse::<HealthStatus>("/health", value));
        match result {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(error = %e, "backend health probe failed");
                HealthStatus::offline(e.user_message())
            }
        }
    }

    fn check_success(response: &AnalysisResponse) -> Result<(), ApiClientError> {
        if response.success {
            return Ok(());
        }
        let message = response
            .error
            .clone()
            .unwrap_or_else(|| "analysis failed".to_string());
        Err(ApiClientError::Api(message))
    }
}
