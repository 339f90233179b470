use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{Path, Query},
    http::{Request, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use storefront_app::{build_registry, Services};
use storefront_kernel::Settings;

pub const TOKEN: &str = "TEST";

/// Product API and `getFile` lookups on one server. `good-*` file ids
/// resolve, anything else is rejected.
pub fn upstream(products: Value, detail: Value) -> Router {
    let detail = Arc::new(detail);
    Router::new()
        .route("/api/products", get(move || async move { Json(products) }))
        .route(
            "/api/products/{id}",
            get(move |Path(id): Path<String>| {
                let detail = detail.clone();
                async move {
                    if detail.get("_id").and_then(Value::as_str) == Some(id.as_str()) {
                        Ok(Json((*detail).clone()))
                    } else {
                        Err(StatusCode::NOT_FOUND)
                    }
                }
            }),
        )
        .route(
            "/{bot}/getFile",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let file_id = params.get("file_id").cloned().unwrap_or_default();
                match file_id.strip_prefix("good-") {
                    Some(name) => Json(json!({
                        "ok": true,
                        "result": { "file_path": format!("photos/{name}.jpg") }
                    })),
                    None => Json(json!({ "ok": false, "description": "Bad Request" })),
                }
            }),
        )
}

pub async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn settings_for(base: &str) -> Settings {
    let mut settings = Settings::default();
    settings.api.base_url = base.to_string();
    settings.media.api_base = base.to_string();
    settings.media.bot_token = TOKEN.to_string();
    settings.server.static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/public").to_string();
    settings
}

pub fn storefront(settings: &Settings) -> Router {
    let services = Services::from_settings(settings, CancellationToken::new()).unwrap();
    let registry = build_registry(&services);
    storefront_http::build_router(&registry, settings)
}

pub async fn get_page(router: &Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}
