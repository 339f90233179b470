pub mod filter;
pub mod view;

use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;

use storefront_http::AppError;
use storefront_kernel::{InitCtx, Module};

use crate::services::Services;
use crate::view_state::ViewState;
use filter::CatalogFilter;
use view::CatalogDisplay;

/// Product grid at the site root
pub struct CatalogModule {
    services: Services,
}

impl CatalogModule {
    pub fn new(services: Services) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Module for CatalogModule {
    fn name(&self) -> &'static str {
        "catalog"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            api = %self.services.api.base_url(),
            resolve_images = ctx.settings.catalog.resolve_images,
            "catalog module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(catalog_page))
            .with_state(self.services.clone())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub max_price: Option<String>,
}

/// `GET /?q=&max_price=`
async fn catalog_page(
    State(services): State<Services>,
    Query(query): Query<CatalogQuery>,
) -> Result<Html<String>, AppError> {
    let filter = CatalogFilter::parse(query.q.as_deref(), query.max_price.as_deref())
        .map_err(AppError::bad_request)?;

    let cancel = services.page_token();
    let _guard = cancel.clone().drop_guard();

    let state = view::mount(&services.api, services.catalog_images.as_ref(), &cancel).await;

    if let ViewState::Failed(message) = &state {
        return Err(AppError::upstream(message.clone()));
    }

    let display = CatalogDisplay::from_state(&state, &filter);
    Ok(Html(view::render_html(&display, &filter)))
}

/// Create a new instance of the catalog module
pub fn create_module(services: Services) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(CatalogModule::new(services))
}
