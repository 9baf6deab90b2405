//! `/dataset` endpoint group.

use crate::client::ApiClient;
use crate::error::ApiClientError;
use crate::types::{DatasetInfo, TrainingResponse, UploadResponse};

impl ApiClient {
    /// Fetches metadata about the loaded comment dataset.
    ///
    /// # Errors
    ///
    /// - [`ApiClientError::Http`] on network failure or non-2xx status.
    /// - [`ApiClientError::Deserialize`] if the response shape is unexpected.
    pub async fn dataset_info(&self) -> Result<DatasetInfo, ApiClientError> {
        self.get_typed("dataset/info", self.default_timeout()).await
    }

    /// Uploads a CSV file to replace the loaded dataset.
    ///
    /// The file is sent as a multipart form under the `file` field, matching
    /// what the service expects. Uploads get triple the default timeout.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ApiClient::dataset_info`]; the service answers
    /// 400 for anything that is not a CSV.
    pub async fn upload_dataset(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<UploadResponse, ApiClientError> {
        let response: UploadResponse = self
            .post_file(
                "dataset/upload",
                file_name,
                contents,
                self.default_timeout() * 3,
            )
            .await?;
        tracing::info!(
            filename = %response.filename,
            records = response.records,
            "dataset uploaded"
        );
        Ok(response)
    }

    /// Triggers a model training run and returns its metrics.
    ///
    /// Training is by far the slowest operation the API offers; it gets six
    /// times the default timeout.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ApiClient::dataset_info`].
    pub async fn train_model(&self) -> Result<TrainingResponse, ApiClientError> {
        let response: TrainingResponse = self
            .post_typed(
                "dataset/train-model",
                &serde_json::json!({}),
                self.default_timeout() * 6,
            )
            .await?;
        tracing::info!(
            accuracy = response.accuracy,
            f1 = response.f1_weighted,
            "model training finished"
        );
        Ok(response)
    }
}
