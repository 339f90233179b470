//! HTTP plumbing for the storefront: the upstream product API and the
//! file-location API used to turn image references into displayable URLs.

pub mod api;
pub mod error;
pub mod media;
pub mod models;

pub use api::ProductApi;
pub use error::{ClientError, Result};
pub use media::{resolve_all, ImageResolver, StaticPathResolver, TelegramResolver};
pub use models::{ContactInfo, Price, Product, ProductDetail};
