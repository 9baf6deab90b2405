//! Retry-once policy for the inference API client.
//!
//! [`retry_once`] wraps a fallible async operation and repeats it exactly one
//! time when the first attempt fails with a transient error (network failure,
//! timeout, 5xx). Application-level and deserialization errors are returned
//! immediately since retrying cannot fix them.

use std::future::Future;
use std::time::Duration;

use crate::error::ApiClientError;

const RETRY_DELAY_MS: u64 = 250;

/// Returns `true` for errors worth one more attempt.
pub(crate) fn is_retriable(err: &ApiClientError) -> bool {
    match err {
        ApiClientError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ApiClientError::Api(_) | ApiClientError::Deserialize { .. } => false,
    }
}

/// Runs `operation`, retrying at most once on a transient error.
pub(crate) async fn retry_once<T, F, Fut>(mut operation: F) -> Result<T, ApiClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiClientError>>,
{
    match operation().await {
        Ok(value) => Ok(value),
        Err(err) if is_retriable(&err) => {
            tracing::warn!(error = %err, "transient API error, retrying once");
            tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS)).await;
            operation().await
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn deserialize_err() -> ApiClientError {
        let source = serde_json::from_str::<()>("invalid").unwrap_err();
        ApiClientError::Deserialize {
            context: "test".to_owned(),
            source,
        }
    }

    async fn connect_err() -> ApiClientError {
        // Port 1 on 0.0.0.0 refuses connections, producing a retriable error.
        let err = reqwest::Client::new()
            .get("http://0.0.0.0:1")
            .send()
            .await
            .unwrap_err();
        ApiClientError::Http(err)
    }

    #[test]
    fn api_error_is_not_retriable() {
        assert!(!is_retriable(&ApiClientError::Api("bad".to_owned())));
    }

    #[test]
    fn deserialize_error_is_not_retriable() {
        assert!(!is_retriable(&deserialize_err()));
    }

    #[tokio::test]
    async fn connect_failure_is_retriable() {
        assert!(is_retriable(&connect_err().await));
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_once(|| {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ApiClientError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_exactly_once_then_gives_up() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_once(|| {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(connect_err().await)
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(
            calls.load(Ordering::SeqCst),
            2,
            "transient errors get exactly one extra attempt"
        );
    }

    #[tokio::test]
    async fn does_not_retry_api_errors() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_once(|| {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(ApiClientError::Api("dataset empty".to_owned()))
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1, "API errors must not retry");
        assert!(matches!(result, Err(ApiClientError::Api(_))));
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_once(|| {
            let c = Arc::clone(&c);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err::<u32, _>(connect_err().await)
                } else {
                    Ok(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
