use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use sentiview_core::AppConfig;

use crate::middleware::{request_id, RequestId};

const SERVICE_NAME: &str = "Sentiview Gateway";
const SERVICE_DESCRIPTION: &str =
    "Gateway for the university social-media sentiment analysis dashboard";

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    service: &'static str,
    timestamp: DateTime<Utc>,
    environment: String,
}

#[derive(Debug, Serialize)]
struct InfoBody {
    name: &'static str,
    version: &'static str,
    description: &'static str,
    endpoints: EndpointMap,
}

/// Route groups of interest to a dashboard client. The inference groups are
/// served by the external ML API, not by this process; they are listed here
/// so the front-end can discover them from one place.
#[derive(Debug, Serialize)]
struct EndpointMap {
    health: &'static str,
    info: &'static str,
    analysis: &'static str,
    statistics: &'static str,
    reports: &'static str,
    dataset: &'static str,
}

#[derive(Debug, Serialize)]
struct WelcomeBody {
    message: &'static str,
    documentation: &'static str,
    health_check: &'static str,
}

fn build_cors(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-request-id"),
        ])
}

/// Builds the gateway router: the three JSON endpoints plus static file
/// serving from the configured public directory.
pub fn build_app(config: Arc<AppConfig>) -> Router {
    let cors = build_cors(&config.allowed_origins);
    let static_files = ServeDir::new(&config.public_dir);

    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/info", get(info))
        .fallback_service(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(config)
}

async fn health(
    State(config): State<Arc<AppConfig>>,
    Extension(request_id): Extension<RequestId>,
) -> impl IntoResponse {
    tracing::debug!(request_id = %request_id.0, "health check");
    Json(HealthBody {
        status: "healthy",
        service: SERVICE_NAME,
        timestamp: Utc::now(),
        environment: config.env.to_string(),
    })
}

async fn info() -> impl IntoResponse {
    Json(InfoBody {
        name: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        description: SERVICE_DESCRIPTION,
        endpoints: EndpointMap {
            health: "/api/health",
            info: "/api/info",
            analysis: "/analysis",
            statistics: "/statistics",
            reports: "/reports",
            dataset: "/dataset",
        },
    })
}

async fn root() -> impl IntoResponse {
    Json(WelcomeBody {
        message: "Welcome to the university sentiment analysis gateway",
        documentation: "/api/info",
        health_check: "/api/health",
    })
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::path::PathBuf;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use sentiview_core::Environment;
    use tower::ServiceExt;

    use super::*;

    fn test_config(public_dir: PathBuf) -> Arc<AppConfig> {
        Arc::new(AppConfig {
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse::<SocketAddr>().expect("addr"),
            log_level: "info".to_string(),
            public_dir,
            backend_url: "http://localhost:8000/api".to_string(),
            ml_api_url: "https://inference.example.com/api".to_string(),
            use_local_backend: true,
            allowed_origins: vec![],
            api_timeout_secs: 30,
            default_timeout_secs: 10,
            cache_ttl_secs: 300,
            history_path: PathBuf::from("./analysis-history.json"),
        })
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).expect("json parse");
        (status, json)
    }

    #[tokio::test]
    async fn health_reports_status_and_environment() {
        let app = build_app(test_config(PathBuf::from("./public")));
        let (status, json) = get_json(app, "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["environment"], "test");
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn info_lists_route_groups() {
        let app = build_app(test_config(PathBuf::from("./public")));
        let (status, json) = get_json(app, "/api/info").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["endpoints"]["health"], "/api/health");
        assert_eq!(json["endpoints"]["analysis"], "/analysis");
        assert_eq!(json["endpoints"]["reports"], "/reports");
        assert!(json["version"].is_string());
    }

    #[tokio::test]
    async fn root_returns_welcome_json() {
        let app = build_app(test_config(PathBuf::from("./public")));
        let (status, json) = get_json(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["health_check"], "/api/health");
    }

    #[tokio::test]
    async fn request_id_header_is_echoed_back() {
        let app = build_app(test_config(PathBuf::from("./public")));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header("x-request-id", "req-test-1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .map(|v| v.to_str().map_err(|_| ())),
            Some(Ok("req-test-1"))
        );
    }

    #[tokio::test]
    async fn request_id_is_generated_when_absent() {
        let app = build_app(test_config(PathBuf::from("./public")));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        let header = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .expect("generated request id");
        assert!(!header.is_empty());
    }

    #[tokio::test]
    async fn unknown_paths_fall_through_to_static_files() {
        let public = tempfile::tempdir().expect("tempdir");
        std::fs::write(public.path().join("index.html"), "<html>dash</html>")
            .expect("write static file");

        let app = build_app(test_config(public.path().to_path_buf()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/index.html")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        assert_eq!(body.as_ref(), b"<html>dash</html>");
    }

    #[tokio::test]
    async fn missing_static_file_is_not_found() {
        let public = tempfile::tempdir().expect("tempdir");
        let app = build_app(test_config(public.path().to_path_buf()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/nope.html")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
