//! Router builder for the storefront HTTP server

use axum::{
    error_handling::HandleErrorLayer,
    http::{HeaderValue, Request},
    BoxError, Router,
};
use std::{path::PathBuf, time::Duration};
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use uuid::Uuid;

use crate::error::AppError;

/// Builder for constructing the main HTTP router.
///
/// Middleware is applied in [`RouterBuilder::build`] so it wraps every route
/// regardless of the order the builder methods were called in.
pub struct RouterBuilder {
    router: Router,
    tracing: bool,
    request_id: bool,
    timeout: Option<Duration>,
    static_dir: Option<PathBuf>,
}

impl RouterBuilder {
    /// Create a new router builder
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            tracing: false,
            request_id: false,
            timeout: None,
            static_dir: None,
        }
    }

    /// Add a route to the router
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Mount a module's router. `"/"` merges it at the root, anything else nests it.
    pub fn mount_module(mut self, mount_path: &str, module_router: Router) -> Self {
        let mount_path = mount_path.trim_end_matches('/');
        self.router = if mount_path.is_empty() {
            self.router.merge(module_router)
        } else {
            self.router.nest(mount_path, module_router)
        };
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.tracing = true;
        self
    }

    /// Add request ID middleware
    pub fn with_request_id(mut self) -> Self {
        self.request_id = true;
        self
    }

    /// Add timeout middleware
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(Duration::from_millis(timeout_ms));
        self
    }

    /// Serve files from `dir` for any path no route matched
    pub fn with_static_files(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Build the final router
    pub fn build(self) -> Router {
        let mut router = match self.static_dir {
            Some(dir) => self.router.fallback_service(
                ServeDir::new(dir).fallback(axum::routing::get(not_found)),
            ),
            None => self.router.fallback(not_found),
        };

        if let Some(timeout) = self.timeout {
            router = router.layer(
                ServiceBuilder::new()
                    .layer(HandleErrorLayer::new(handle_timeout))
                    .layer(TimeoutLayer::new(timeout)),
            );
        }

        if self.tracing {
            router = router.layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                    .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
            );
        }

        if self.request_id {
            router = router
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7));
        }

        router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub const TIMED_OUT: &str = "The page took too long to load. Please try again later.";

async fn not_found() -> AppError {
    AppError::not_found("Page not found.")
}

/// Render an expired deadline as the error page instead of a bare status.
async fn handle_timeout(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        AppError::timeout(TIMED_OUT)
    } else {
        AppError::Internal(anyhow::anyhow!("request middleware failed: {}", err))
    }
}

/// Time-ordered request ids
#[derive(Clone, Copy)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let request_id = Uuid::now_v7().to_string().parse::<HeaderValue>().ok()?;
        Some(RequestId::new(request_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::StatusCode,
        routing::get,
    };
    use tower::ServiceExt;

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_router_builder_basic() {
        let router = RouterBuilder::new()
            .route("/test", get(|| async { "test" }))
            .build();

        let response = router.oneshot(get_request("/test")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_module_mounting() {
        let module_router = Router::new().route("/{id}", get(|| async { "module" }));

        let router = RouterBuilder::new()
            .mount_module("/products", module_router)
            .build();

        let response = router
            .clone()
            .oneshot(get_request("/products/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router.oneshot(get_request("/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_root_mount_merges() {
        let module_router = Router::new().route("/", get(|| async { "catalog" }));

        let router = RouterBuilder::new().mount_module("/", module_router).build();

        let response = router.oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_middleware_chain_sets_request_id() {
        let router = RouterBuilder::new()
            .with_tracing()
            .with_request_id()
            .with_timeout(5000)
            .route("/health", get(|| async { "ok" }))
            .build();

        let response = router.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_timeout_renders_error_page() {
        let router = RouterBuilder::new()
            .with_timeout(50)
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            )
            .build();

        let response = router.oneshot(get_request("/slow")).await.unwrap();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains(TIMED_OUT));
        assert!(body.contains("data-code=\"timeout\""));
    }

    #[tokio::test]
    async fn test_unknown_path_renders_not_found_page() {
        let router = RouterBuilder::new()
            .with_static_files("does-not-exist")
            .build();

        let response = router.oneshot(get_request("/missing.jpg")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
