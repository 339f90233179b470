use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::Url;
use serde::de::DeserializeOwned;

use storefront_kernel::settings::ApiSettings;

use crate::error::{ClientError, Result};
use crate::models::{Product, ProductDetail};

/// Client for the upstream product API.
#[derive(Debug, Clone)]
pub struct ProductApi {
    http: reqwest::Client,
    base_url: Url,
}

impl ProductApi {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Builder)?;

        Ok(Self { http, base_url })
    }

    pub fn from_settings(settings: &ApiSettings) -> Result<Self> {
        Self::new(
            &settings.base_url,
            settings.timeout_ms.map(Duration::from_millis),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /api/products`
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let url = self.endpoint(&["api", "products"]);
        let products: Vec<Product> = self.get_json(url, false).await?;
        tracing::debug!(count = products.len(), "fetched product list");
        Ok(products)
    }

    /// `GET /api/products/{id}`, bypassing intermediary caches.
    pub async fn get_product(&self, id: &str) -> Result<ProductDetail> {
        let url = self.endpoint(&["api", "products", id]);
        let product: ProductDetail = self.get_json(url, true).await?;
        tracing::debug!(product_id = %product.id, "fetched product detail");
        Ok(product)
    }

    /// Append path segments to the base url; segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, no_store: bool) -> Result<T> {
        let mut request = self
            .http
            .get(url.clone())
            .header(CONTENT_TYPE, "application/json");
        if no_store {
            request = request.header(CACHE_CONTROL, "no-store");
        }

        let response = request.send().await.map_err(ClientError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(ClientError::Decode)
    }
}
