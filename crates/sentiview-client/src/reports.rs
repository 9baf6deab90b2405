//! `/reports` endpoint group: generation, latest, and raw export.

use crate::client::ApiClient;
use crate::error::ApiClientError;
use crate::types::{ExportFormat, ReportRequest, ReportResponse};

impl ApiClient {
    /// Generates an executive report for the given period.
    ///
    /// Report generation walks the whole corpus server-side, so it gets
    /// double the default timeout.
    ///
    /// # Errors
    ///
    /// - [`ApiClientError::Http`] on network failure or non-2xx status.
    /// - [`ApiClientError::Deserialize`] if the response shape is unexpected.
    pub async fn generate_report(
        &self,
        period: &str,
        format: &str,
    ) -> Result<ReportResponse, ApiClientError> {
        let request = ReportRequest {
            period: period.to_string(),
            format: format.to_string(),
        };
        let report: ReportResponse = self
            .post_typed("reports/generate", &request, self.default_timeout() * 2)
            .await?;
        tracing::info!(title = %report.title, period = %report.period, "report generated");
        Ok(report)
    }

    /// Fetches the most recently generated report.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ApiClient::generate_report`].
    pub async fn latest_report(&self) -> Result<ReportResponse, ApiClientError> {
        self.get_typed("reports/latest", self.default_timeout())
            .await
    }

    /// Exports the current report in the requested format.
    ///
    /// Returns the raw file bytes; writing them to disk is the caller's
    /// concern. Exports get triple the default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Http`] on network failure or non-2xx status.
    pub async fn export_report(&self, format: ExportFormat) -> Result<Vec<u8>, ApiClientError> {
        let request = serde_json::json!({ "format": format });
        let bytes = self
            .post_bytes("reports/export", &request, self.default_timeout() * 3)
            .await?;
        tracing::info!(format = %format, size = bytes.len(), "report exported");
        Ok(bytes)
    }
}
