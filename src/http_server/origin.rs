//! Cross-Origin Policy
//!
//! Requests carrying an `Origin` header outside the allow-list are
//! rejected with 403 before routing, which also covers WebSocket
//! upgrades. Requests without an `Origin` header pass.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::observability::{Event, MetricsRegistry};
use crate::rest_api::RestError;

/// Origin allow-list
#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl OriginPolicy {
    /// An empty list allows any origin
    pub fn new(origins: &[String]) -> Self {
        Self {
            allowed: origins
                .iter()
                .map(|o| o.trim().trim_end_matches('/').to_string())
                .filter(|o| !o.is_empty())
                .collect(),
        }
    }

    pub fn allows_any(&self) -> bool {
        self.allowed.is_empty()
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.allows_any() || self.allowed.iter().any(|o| o == origin)
    }

    /// CORS headers for allowed origins
    pub fn cors_layer(&self) -> CorsLayer {
        let origin = if self.allows_any() {
            AllowOrigin::mirror_request()
        } else {
            let origins: Vec<HeaderValue> = self
                .allowed
                .iter()
                .filter_map(|o| o.parse().ok())
                .collect();
            AllowOrigin::list(origins)
        };

        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
    }
}

struct OriginGuard {
    policy: OriginPolicy,
    metrics: Arc<MetricsRegistry>,
}

async fn check_origin(
    State(guard): State<Arc<OriginGuard>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        let origin = origin.to_str().unwrap_or_default();
        if !guard.policy.allows(origin) {
            guard.metrics.increment_origin_rejections();
            warn!(
                event = %Event::OriginRejected,
                origin,
                path = %request.uri().path(),
                "rejected request from disallowed origin"
            );
            return RestError::OriginNotAllowed(origin.to_string()).into_response();
        }
    }

    next.run(request).await
}

/// Wrap a router with the origin check and CORS headers
pub fn apply_origin_policy(
    router: Router,
    policy: OriginPolicy,
    metrics: Arc<MetricsRegistry>,
) -> Router {
    let cors = policy.cors_layer();
    let guard = Arc::new(OriginGuard { policy, metrics });

    router
        .layer(cors)
        .layer(middleware::from_fn_with_state(guard, check_origin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        routing::get,
    };
    use tower::ServiceExt;

    fn app(origins: &[&str], metrics: Arc<MetricsRegistry>) -> Router {
        let origins: Vec<String> = origins.iter().map(|s| s.to_string()).collect();
        apply_origin_policy(
            Router::new().route("/ping", get(|| async { "pong" })),
            OriginPolicy::new(&origins),
            metrics,
        )
    }

    fn request(origin: Option<&str>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder().uri("/ping");
        if let Some(origin) = origin {
            builder = builder.header(header::ORIGIN, origin);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_policy_matching() {
        let policy = OriginPolicy::new(&["http://localhost:4200/".to_string()]);
        assert!(policy.allows("http://localhost:4200"));
        assert!(!policy.allows("http://evil.example"));
        assert!(OriginPolicy::new(&[]).allows("http://anything"));
    }

    #[tokio::test]
    async fn test_listed_origin_passes() {
        let response = app(&["http://localhost:4200"], Arc::new(MetricsRegistry::new()))
            .oneshot(request(Some("http://localhost:4200")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:4200"
        );
    }

    #[tokio::test]
    async fn test_unlisted_origin_rejected() {
        let metrics = Arc::new(MetricsRegistry::new());
        let response = app(&["http://localhost:4200"], Arc::clone(&metrics))
            .oneshot(request(Some("http://evil.example")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(metrics.snapshot().origin_rejections, 1);
    }

    #[tokio::test]
    async fn test_missing_origin_passes() {
        let response = app(&["http://localhost:4200"], Arc::new(MetricsRegistry::new()))
            .oneshot(request(None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_empty_list_allows_any() {
        let response = app(&[], Arc::new(MetricsRegistry::new()))
            .oneshot(request(Some("http://anywhere.example")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
