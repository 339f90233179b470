use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use storefront_client::{ImageResolver, ProductApi, StaticPathResolver, TelegramResolver};
use storefront_kernel::Settings;

/// Upstream clients shared by both views. Cheap to clone.
#[derive(Clone)]
pub struct Services {
    pub api: ProductApi,
    /// Resolver for product detail images; always performs a lookup.
    pub media: Arc<dyn ImageResolver>,
    /// Resolver for catalog thumbnails, chosen by `catalog.resolve_images`.
    pub catalog_images: Arc<dyn ImageResolver>,
    /// Parent of every page-load token; cancelled on shutdown.
    pub shutdown: CancellationToken,
}

impl Services {
    pub fn from_settings(settings: &Settings, shutdown: CancellationToken) -> anyhow::Result<Self> {
        let api = ProductApi::from_settings(&settings.api)
            .with_context(|| "failed to build product API client")?;
        let media: Arc<dyn ImageResolver> = Arc::new(
            TelegramResolver::from_settings(&settings.media)
                .with_context(|| "failed to build image resolver")?,
        );
        let catalog_images: Arc<dyn ImageResolver> = if settings.catalog.resolve_images {
            media.clone()
        } else {
            Arc::new(StaticPathResolver::new())
        };

        Ok(Self {
            api,
            media,
            catalog_images,
            shutdown,
        })
    }

    /// Token scoped to one page load.
    pub fn page_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}
