use std::fmt::Write as _;

use tokio_util::sync::CancellationToken;

use storefront_client::{resolve_all, ClientError, ImageResolver, Product, ProductApi};
use storefront_http::html;

use super::filter::CatalogFilter;
use crate::utils::format_price;
use crate::view_state::ViewState;

pub const LOAD_FAILED: &str = "Failed to load products. Please try again later.";
pub const NO_PRODUCTS: &str = "No products available.";
pub const NO_MATCHES: &str = "No products match your filters.";
pub const LOADING: &str = "Loading...";

/// An active listing with its displayable image.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub product: Product,
    pub image_url: String,
}

/// Fetch the list, keep active listings and resolve their images concurrently.
pub async fn load_catalog(
    api: &ProductApi,
    resolver: &dyn ImageResolver,
) -> Result<Vec<CatalogItem>, ClientError> {
    let products: Vec<Product> = api
        .list_products()
        .await?
        .into_iter()
        .filter(|product| product.is_active)
        .collect();

    let image_urls = resolve_all(
        resolver,
        products.iter().map(|product| product.primary_image_url.as_str()),
    )
    .await;

    tracing::info!(active = products.len(), "catalog loaded");

    Ok(products
        .into_iter()
        .zip(image_urls)
        .map(|(product, image_url)| CatalogItem { product, image_url })
        .collect())
}

/// Run one catalog mount scoped to `cancel`.
pub async fn mount(
    api: &ProductApi,
    resolver: &dyn ImageResolver,
    cancel: &CancellationToken,
) -> ViewState<Vec<CatalogItem>> {
    let mut state = ViewState::Idle;
    state
        .load_scoped(cancel, load_catalog(api, resolver), LOAD_FAILED)
        .await;
    state
}

/// What the catalog page shows; the variants are mutually exclusive.
#[derive(Debug, PartialEq)]
pub enum CatalogDisplay<'a> {
    Loading,
    Error(&'a str),
    /// `filtered` is true when listings exist but none pass the filter.
    Empty { filtered: bool },
    Grid(Vec<&'a CatalogItem>),
}

impl<'a> CatalogDisplay<'a> {
    pub fn from_state(state: &'a ViewState<Vec<CatalogItem>>, filter: &CatalogFilter) -> Self {
        match state {
            ViewState::Idle | ViewState::Loading => CatalogDisplay::Loading,
            ViewState::Failed(message) => CatalogDisplay::Error(message),
            ViewState::Ready(items) if items.is_empty() => CatalogDisplay::Empty { filtered: false },
            ViewState::Ready(items) => {
                let visible: Vec<&CatalogItem> = items
                    .iter()
                    .filter(|item| filter.matches(&item.product))
                    .collect();
                if visible.is_empty() {
                    CatalogDisplay::Empty { filtered: true }
                } else {
                    CatalogDisplay::Grid(visible)
                }
            }
        }
    }
}

pub fn render_html(display: &CatalogDisplay<'_>, filter: &CatalogFilter) -> String {
    match display {
        CatalogDisplay::Loading => html::message_page("Our Products", "loading", LOADING),
        CatalogDisplay::Error(message) => html::message_page("Our Products", "error", message),
        CatalogDisplay::Empty { filtered } => {
            let message = if *filtered { NO_MATCHES } else { NO_PRODUCTS };
            let mut body = String::from("<h1>Our Products</h1>\n");
            if *filtered {
                body.push_str(&search_form(filter));
            }
            let _ = write!(body, "<p class=\"empty\">{}</p>", message);
            html::layout("Our Products", &body)
        }
        CatalogDisplay::Grid(items) => {
            let mut body = String::from("<h1>Our Products</h1>\n");
            body.push_str(&search_form(filter));
            body.push_str("<div class=\"product-list\">\n");
            for item in items {
                body.push_str(&product_card(item));
            }
            body.push_str("</div>");
            html::layout("Our Products", &body)
        }
    }
}

fn search_form(filter: &CatalogFilter) -> String {
    let search = filter.search.as_deref().unwrap_or_default();
    let max_price = filter
        .max_price
        .map(|price| price.to_string())
        .unwrap_or_default();
    format!(
        "<form class=\"filters\" method=\"get\" action=\"/\">\n\
         <input type=\"search\" name=\"q\" placeholder=\"Search products\" value=\"{}\">\n\
         <input type=\"number\" name=\"max_price\" min=\"0\" step=\"any\" placeholder=\"Max price\" value=\"{}\">\n\
         <button type=\"submit\">Filter</button>\n</form>\n",
        html::escape(search),
        html::escape(&max_price)
    )
}

fn product_card(item: &CatalogItem) -> String {
    let product = &item.product;
    let mut card = String::from("<div class=\"product-card\">\n");
    let _ = writeln!(
        card,
        "<img class=\"product-image\" src=\"{}\" alt=\"{}\" width=\"200\" height=\"200\">",
        html::escape(&item.image_url),
        html::escape(&product.name)
    );
    let _ = writeln!(card, "<h2 class=\"product-name\">{}</h2>", html::escape(&product.name));
    let _ = writeln!(
        card,
        "<p class=\"product-price\">{}</p>",
        html::escape(&format_price(product.price))
    );
    if let Some(description) = &product.short_description {
        let _ = writeln!(
            card,
            "<p class=\"product-description\">{}</p>",
            html::escape(description)
        );
    }
    if let Some(location) = &product.location {
        let _ = writeln!(
            card,
            "<p class=\"product-location\">Location: {}</p>",
            html::escape(location)
        );
    }
    let _ = writeln!(
        card,
        "<a class=\"product-button\" href=\"/products/{}\">View Details</a>",
        html::escape(&product.id)
    );
    card.push_str("</div>\n");
    card
}

/// Plain-text rendering used by the CLI.
pub fn render_text(display: &CatalogDisplay<'_>) -> String {
    match display {
        CatalogDisplay::Loading => format!("{}\n", LOADING),
        CatalogDisplay::Error(message) => format!("{}\n", message),
        CatalogDisplay::Empty { filtered: true } => format!("{}\n", NO_MATCHES),
        CatalogDisplay::Empty { filtered: false } => format!("{}\n", NO_PRODUCTS),
        CatalogDisplay::Grid(items) => {
            let mut out = String::from("Our Products\n\n");
            for item in items {
                let product = &item.product;
                let _ = writeln!(out, "[{}] {}  {}", product.id, product.name, format_price(product.price));
                if let Some(description) = &product.short_description {
                    let _ = writeln!(out, "    {}", description);
                }
                if let Some(location) = &product.location {
                    let _ = writeln!(out, "    Location: {}", location);
                }
                let _ = writeln!(out, "    Image: {}", item.image_url);
            }
            out
        }
    }
}
