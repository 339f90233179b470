use std::fmt::Write as _;
use std::num::NonZeroUsize;

use tokio_util::sync::CancellationToken;

use storefront_client::{resolve_all, ClientError, ImageResolver, ProductApi, ProductDetail};
use storefront_http::html;

use super::carousel::Carousel;
use crate::utils::format_detail_price;
use crate::view_state::ViewState;

pub const LOAD_FAILED: &str = "Failed to load product details. Please try again later.";
pub const NOT_FOUND: &str = "Product not found.";

/// A fetched product with its resolved images, primary first.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub product: ProductDetail,
    pub images: Vec<String>,
}

impl ProductPage {
    pub fn carousel(&self, start: usize) -> Option<Carousel> {
        NonZeroUsize::new(self.images.len()).map(|len| Carousel::starting_at(len, start))
    }
}

/// Fetch one product and resolve the primary and additional images
/// concurrently. Every lookup is attempted; failures become the fallback.
pub async fn load_product(
    api: &ProductApi,
    resolver: &dyn ImageResolver,
    id: &str,
) -> Result<ProductPage, ClientError> {
    let product = api.get_product(id).await?;

    let (primary, additional) = tokio::join!(
        resolver.resolve(&product.primary_image_url),
        resolve_all(resolver, &product.additional_image_urls),
    );

    let mut images = Vec::with_capacity(additional.len() + 1);
    images.push(primary);
    images.extend(additional);

    tracing::info!(product_id = %product.id, images = images.len(), "product loaded");

    Ok(ProductPage { product, images })
}

/// Normalize a route identifier; blank means absent.
pub fn route_id(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|id| !id.is_empty())
}

/// Run one detail mount scoped to `cancel`. An absent identifier fails
/// immediately without a fetch.
pub async fn mount(
    api: &ProductApi,
    resolver: &dyn ImageResolver,
    id: Option<&str>,
    cancel: &CancellationToken,
) -> ViewState<ProductPage> {
    let mut state = ViewState::Idle;
    match route_id(id) {
        None => {
            tracing::warn!("product page mounted without an identifier");
            state.fail(NOT_FOUND);
        }
        Some(id) => {
            state
                .load_scoped(cancel, load_product(api, resolver, id), LOAD_FAILED)
                .await;
        }
    }
    state
}

pub fn render_html(page: &ProductPage, carousel: Option<Carousel>) -> String {
    let product = &page.product;
    let name = html::escape(&product.name);
    let mut body = String::new();

    let _ = write!(
        body,
        "<header>\n<h1>{}</h1>\n<p>Explore the details of this unique product</p>\n</header>\n<main>\n",
        name
    );

    if let Some(carousel) = carousel {
        body.push_str(&carousel_html(page, carousel));
    }

    let phone = html::escape(&product.contact_info.phone);
    let _ = write!(
        body,
        "<section class=\"details\">\n<h2>{name}</h2>\n\
         <p class=\"description\">{description}</p>\n\
         <p class=\"price\">{price}</p>\n\
         <p><strong>Category:</strong> {general} - {specific}</p>\n\
         <p><strong>Location:</strong> {location}</p>\n\
         <p><strong>Contact:</strong> <a href=\"tel:{phone}\">{phone}</a></p>\n\
         <div class=\"actions\">\n\
         <a class=\"contact\" href=\"tel:{phone}\" aria-label=\"Call seller at {phone}\">Contact Seller</a>\n\
         <a class=\"back\" href=\"/\">Back to Products</a>\n\
         </div>\n</section>\n",
        name = name,
        description = html::escape(&product.short_description),
        price = html::escape(&format_detail_price(&product.price)),
        general = html::escape(&product.general_category),
        specific = html::escape(&product.specific_category),
        location = html::escape(&product.location),
        phone = phone,
    );

    if page.images.len() > 1 {
        body.push_str("<section class=\"thumbnails\">\n<h3>Additional Images</h3>\n");
        for (index, url) in page.images.iter().enumerate() {
            let _ = writeln!(
                body,
                "<a href=\"?image={index}\"><img src=\"{}\" alt=\"Thumbnail {}\"></a>",
                html::escape(url),
                index + 1
            );
        }
        body.push_str("</section>\n");
    }

    body.push_str("</main>\n");
    body.push_str(&html::site_footer());
    html::layout(&product.name, &body)
}

fn carousel_html(page: &ProductPage, carousel: Carousel) -> String {
    let current = carousel.index();
    let mut out = String::from("<div class=\"carousel\">\n");
    let _ = writeln!(
        out,
        "<img class=\"slide\" src=\"{}\" alt=\"{} - Image {}\">",
        html::escape(&page.images[current]),
        html::escape(&page.product.name),
        current + 1
    );

    if carousel.has_controls() {
        let _ = writeln!(
            out,
            "<a class=\"prev\" href=\"?image={}\" aria-label=\"Previous image\">&larr;</a>",
            carousel.prev_index()
        );
        let _ = writeln!(
            out,
            "<a class=\"next\" href=\"?image={}\" aria-label=\"Next image\">&rarr;</a>",
            carousel.next_index()
        );
        out.push_str("<div class=\"indicators\">\n");
        for index in 0..carousel.len() {
            let class = if index == current { "indicator active" } else { "indicator" };
            let _ = writeln!(
                out,
                "<a class=\"{class}\" href=\"?image={index}\" aria-label=\"Go to image {}\"></a>",
                index + 1
            );
        }
        out.push_str("</div>\n");
    }

    out.push_str("</div>\n");
    out
}

/// Plain-text rendering used by the CLI.
pub fn render_text(page: &ProductPage, carousel: Option<Carousel>) -> String {
    let product = &page.product;
    let mut out = String::new();
    let _ = writeln!(out, "{}", product.name);
    let _ = writeln!(out, "{}", format_detail_price(&product.price));
    if !product.short_description.is_empty() {
        let _ = writeln!(out, "{}", product.short_description);
    }
    let _ = writeln!(
        out,
        "Category: {} - {}",
        product.general_category, product.specific_category
    );
    let _ = writeln!(out, "Location: {}", product.location);
    let _ = writeln!(out, "Contact: {}", product.contact_info.phone);

    if let Some(carousel) = carousel {
        let _ = writeln!(
            out,
            "Image {}/{}: {}",
            carousel.index() + 1,
            carousel.len(),
            page.images[carousel.index()]
        );
    }
    out
}
