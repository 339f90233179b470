pub mod carousel;
pub mod view;

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;

use storefront_http::AppError;
use storefront_kernel::{InitCtx, Module};

use crate::services::Services;
use crate::view_state::ViewState;

/// Product detail pages under `/products/{id}`
pub struct ProductModule {
    services: Services,
}

impl ProductModule {
    pub fn new(services: Services) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Module for ProductModule {
    fn name(&self) -> &'static str {
        "product"
    }

    fn mount_path(&self) -> &'static str {
        "/products"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            media_api = %ctx.settings.media.api_base,
            "product module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(missing_product))
            .route("/{id}", get(product_page))
            .with_state(self.services.clone())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    /// Carousel slot; anything unparseable shows the first image.
    #[serde(default)]
    pub image: Option<String>,
}

impl ProductQuery {
    fn slot(&self) -> usize {
        self.image
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }
}

/// `GET /products/{id}?image=`
async fn product_page(
    State(services): State<Services>,
    Path(id): Path<String>,
    Query(query): Query<ProductQuery>,
) -> Result<Html<String>, AppError> {
    if view::route_id(Some(id.as_str())).is_none() {
        return Err(AppError::not_found(view::NOT_FOUND));
    }

    let cancel = services.page_token();
    let _guard = cancel.clone().drop_guard();

    let state = view::mount(
        &services.api,
        services.media.as_ref(),
        Some(id.as_str()),
        &cancel,
    )
    .await;

    match &state {
        ViewState::Ready(page) => Ok(Html(view::render_html(page, page.carousel(query.slot())))),
        ViewState::Failed(message) => Err(AppError::upstream(message.clone())),
        ViewState::Idle | ViewState::Loading => Ok(Html(storefront_http::html::message_page(
            "Loading",
            "loading",
            "Loading...",
        ))),
    }
}

/// `GET /products` with no identifier
async fn missing_product() -> AppError {
    AppError::not_found(view::NOT_FOUND)
}

/// Create a new instance of the product module
pub fn create_module(services: Services) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(ProductModule::new(services))
}
