use thiserror::Error;

/// Errors returned by the inference API client.
#[derive(Debug, Error)]
pub enum ApiClientError {
    /// Network or TLS failure, timeout, or non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an application-level error payload.
    #[error("API error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiClientError {
    /// Normalized user-facing message keyed by HTTP status code.
    ///
    /// Everything a dashboard user should ever see about a failed call comes
    /// out of here; the `Display` impl stays technical for logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ApiClientError::Http(e) => {
                if e.is_connect() {
                    return "Cannot connect to the server. Check that the backend is running."
                        .to_string();
                }
                if e.is_timeout() {
                    return "The request timed out. Try again in a moment.".to_string();
                }
                match e.status().map(|s| s.as_u16()) {
                    Some(400) => "Invalid request".to_string(),
                    Some(404) => "Endpoint not found".to_string(),
                    Some(500) => "Internal server error".to_string(),
                    Some(503) => "Service unavailable".to_string(),
                    Some(504) => "Server timed out".to_string(),
                    Some(code) => format!("Server error: {code}"),
                    None => "Network error".to_string(),
                }
            }
            ApiClientError::Api(msg) => msg.clone(),
            ApiClientError::Deserialize { .. } => {
                "The server returned an unexpected response".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_message_passes_through() {
        let err = ApiClientError::Api("dataset not loaded".to_string());
        assert_eq!(err.user_message(), "dataset not loaded");
    }

    #[test]
    fn deserialize_error_is_masked_for_users() {
        let source = serde_json::from_str::<()>("not json").unwrap_err();
        let err = ApiClientError::Deserialize {
            context: "GET /statistics/".to_string(),
            source,
        };
        assert_eq!(
            err.user_message(),
            "The server returned an unexpected response"
        );
        // Logs keep the context.
        assert!(err.to_string().contains("GET /statistics/"));
    }
}
