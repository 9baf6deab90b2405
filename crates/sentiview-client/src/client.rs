//! Core HTTP plumbing shared by the analysis, statistics, report and dataset
//! calls. Endpoint groups live in their own modules as further `impl` blocks.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sentiview_core::AppConfig;

use crate::cache::TtlCache;
use crate::error::ApiClientError;
use crate::retry::retry_once;
use crate::types::AnalysisResponse;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "sentiview/0.1 (dashboard)";

/// Client for the external sentiment inference API.
///
/// Holds the HTTP client, base URL, the two timeout tiers (analysis calls get
/// the long one, everything else the short one) and the TTL cache for
/// single-comment results. Use [`ApiClient::from_app_config`] in production
/// or [`ApiClient::with_base_url`] to point at a mock server in tests.
pub struct ApiClient {
    client: Client,
    base_url: Url,
    api_timeout: Duration,
    default_timeout: Duration,
    pub(crate) analysis_cache: TtlCache<AnalysisResponse>,
}

impl ApiClient {
    /// Creates a client from the loaded application configuration,
    /// pointed at whichever inference URL the environment selects.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ApiClientError::Api`] if the configured
    /// URL does not parse.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ApiClientError> {
        Self::with_base_url(
            config.inference_url(),
            config.api_timeout_secs,
            config.default_timeout_secs,
            Duration::from_secs(config.cache_ttl_secs),
        )
    }

    /// Creates a client with an explicit base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ApiClientError::Api`] if `base_url` is not
    /// a valid URL.
    pub fn with_base_url(
        base_url: &str,
        api_timeout_secs: u64,
        default_timeout_secs: u64,
        cache_ttl: Duration,
    ) -> Result<Self, ApiClientError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        // Normalise: exactly one trailing slash so Url::join treats the last
        // segment as a directory instead of replacing it.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| ApiClientError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_timeout: Duration::from_secs(api_timeout_secs),
            default_timeout: Duration::from_secs(default_timeout_secs),
            analysis_cache: TtlCache::new(cache_ttl),
        })
    }

    /// Timeout for ML-heavy analysis calls.
    pub(crate) fn api_timeout(&self) -> Duration {
        self.api_timeout
    }

    /// Timeout for everything that is not an analysis call.
    pub(crate) fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Drops every cached analysis result.
    pub fn clear_cache(&self) {
        self.analysis_cache.clear();
    }

    /// Resolves a relative endpoint path against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiClientError::Api(format!("invalid endpoint '{path}': {e}")))
    }

    /// The API root with the base path stripped, for the `/health` probe
    /// which lives outside the `/api` prefix.
    pub(crate) fn root_endpoint(&self, path: &str) -> Result<Url, ApiClientError> {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url.set_query(None);
        Ok(url)
    }

    /// GET `path`, retry once on transient failure, parse into `T`.
    pub(crate) async fn get_typed<T: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Duration,
    ) -> Result<T, ApiClientError> {
        let url = self.endpoint(path)?;
        let body =
            retry_once(|| self.request::<()>(Method::GET, url.clone(), None, timeout)).await?;
        Self::parse(path, body)
    }

    /// POST `body` as JSON to `path`, retry once, parse into `T`.
    pub(crate) async fn post_typed<T, B>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let url = self.endpoint(path)?;
        let value =
            retry_once(|| self.request(Method::POST, url.clone(), Some(body), timeout)).await?;
        Self::parse(path, value)
    }

    /// POST a single-file multipart form to `path`, retry once, parse into `T`.
    ///
    /// The form is rebuilt per attempt since multipart bodies are consumed
    /// on send.
    pub(crate) async fn post_file<T: DeserializeOwned>(
        &self,
        path: &str,
        file_name: &str,
        contents: Vec<u8>,
        timeout: Duration,
    ) -> Result<T, ApiClientError> {
        let url = self.endpoint(path)?;
        let value = retry_once(|| async {
            let part = reqwest::multipart::Part::bytes(contents.clone())
                .file_name(file_name.to_string());
            let form = reqwest::multipart::Form::new().part("file", part);
            let response = self
                .client
                .post(url.clone())
                .timeout(timeout)
                .header(ACCEPT, "application/json")
                .multipart(form)
                .send()
                .await?;
            let response = response.error_for_status()?;
            let text = response.text().await?;
            serde_json::from_str(&text).map_err(|e| ApiClientError::Deserialize {
                context: url.to_string(),
                source: e,
            })
        })
        .await?;
        Self::parse(path, value)
    }

    /// POST returning the raw response body, for file exports.
    pub(crate) async fn post_bytes<B>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<Vec<u8>, ApiClientError>
    where
        B: Serialize + Sync,
    {
        let url = self.endpoint(path)?;
        retry_once(|| async {
            let response = self
                .client
                .post(url.clone())
                .timeout(timeout)
                .json(body)
                .send()
                .await?;
            let response = response.error_for_status()?;
            Ok(response.bytes().await?.to_vec())
        })
        .await
    }

    /// Sends one request with standard JSON headers, asserts a 2xx status and
    /// parses the body as JSON.
    pub(crate) async fn request<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        timeout: Duration,
    ) -> Result<serde_json::Value, ApiClientError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self
            .client
            .request(method, url.clone())
            .timeout(timeout)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let response = response.error_for_status()?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiClientError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    pub(crate) fn parse<T: DeserializeOwned>(
        context: &str,
        value: serde_json::Value,
    ) -> Result<T, ApiClientError> {
        serde_json::from_value(value).map_err(|e| ApiClientError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}
