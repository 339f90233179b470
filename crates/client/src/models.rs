use std::fmt;

use serde::{Deserialize, Deserializer};

/// Catalog entry as returned by `GET /api/products`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ProductRecord")]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Absolute URL or opaque file identifier
    pub primary_image_url: String,
    pub price: f64,
    pub short_description: Option<String>,
    pub location: Option<String>,
    /// Listings without the flag are treated as inactive
    pub is_active: bool,
}

/// Full record as returned by `GET /api/products/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ProductDetailRecord")]
pub struct ProductDetail {
    pub id: String,
    pub seller_id: String,
    pub name: String,
    pub primary_image_url: String,
    pub additional_image_urls: Vec<String>,
    pub general_category: String,
    pub specific_category: String,
    pub short_description: String,
    pub price: Price,
    pub location: String,
    pub contact_info: ContactInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContactInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
}

/// Detail prices are usually numeric but some records carry text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(f64),
    Text(String),
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Amount(amount) => write!(f, "{:.2}", amount),
            Price::Text(text) => f.write_str(text),
        }
    }
}

/// Wire shape of a catalog entry. Records may carry `id`, `_id` or both.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    object_id: Option<String>,
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    primary_image_url: String,
    price: f64,
    #[serde(default)]
    short_description: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    is_active: bool,
}

impl TryFrom<ProductRecord> for Product {
    type Error = String;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: pick_id(record.id, record.object_id)?,
            name: record.name,
            primary_image_url: record.primary_image_url,
            price: record.price,
            short_description: record.short_description,
            location: record.location,
            is_active: record.is_active,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductDetailRecord {
    #[serde(default, rename = "_id")]
    object_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    seller_id: String,
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    primary_image_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    additional_image_urls: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    general_category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    specific_category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    short_description: String,
    price: Price,
    #[serde(default, deserialize_with = "null_as_default")]
    location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    contact_info: ContactInfo,
}

impl TryFrom<ProductDetailRecord> for ProductDetail {
    type Error = String;

    fn try_from(record: ProductDetailRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: pick_id(record.object_id, record.id)?,
            seller_id: record.seller_id,
            name: record.name,
            primary_image_url: record.primary_image_url,
            additional_image_urls: record.additional_image_urls,
            general_category: record.general_category,
            specific_category: record.specific_category,
            short_description: record.short_description,
            price: record.price,
            location: record.location,
            contact_info: record.contact_info,
        })
    }
}

/// First non-empty identifier wins.
fn pick_id(preferred: Option<String>, other: Option<String>) -> Result<String, String> {
    preferred
        .into_iter()
        .chain(other)
        .find(|id| !id.is_empty())
        .ok_or_else(|| "missing field `id`".to_string())
}

/// Treats an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn product_accepts_mongo_style_id() {
        let product: Product = serde_json::from_value(json!({
            "_id": "1",
            "name": "Chair",
            "price": 49.99,
            "isActive": true
        }))
        .unwrap();

        assert_eq!(product.id, "1");
        assert!(product.is_active);
        assert_eq!(product.primary_image_url, "");
        assert_eq!(product.short_description, None);
    }

    #[test]
    fn product_without_active_flag_is_inactive() {
        let product: Product = serde_json::from_value(json!({
            "id": "7",
            "name": "Lamp",
            "primaryImageUrl": "AgACAgIAAxkBAAI",
            "price": 12,
            "location": "Addis Ababa"
        }))
        .unwrap();

        assert!(!product.is_active);
        assert_eq!(product.location.as_deref(), Some("Addis Ababa"));
        assert_eq!(product.price, 12.0);
    }

    #[test]
    fn product_with_both_identifiers_prefers_id() {
        let product: Product = serde_json::from_value(json!({
            "_id": "64f0c2",
            "id": "7",
            "name": "Lamp",
            "price": 12,
            "isActive": true,
            "primaryImageUrl": null
        }))
        .unwrap();

        assert_eq!(product.id, "7");
        assert_eq!(product.primary_image_url, "");
    }

    #[test]
    fn product_without_identifier_is_rejected() {
        let result = serde_json::from_value::<Product>(json!({
            "name": "Lamp",
            "price": 12
        }));
        assert!(result.is_err());
    }

    #[test]
    fn detail_decodes_nested_contact_and_image_list() {
        let detail: ProductDetail = serde_json::from_value(json!({
            "_id": "1",
            "sellerId": "s-9",
            "name": "Chair",
            "primaryImageUrl": "file-a",
            "additionalImageUrls": ["file-b", "file-c"],
            "generalCategory": "Furniture",
            "specificCategory": "Seating",
            "shortDescription": "Oak chair",
            "price": 49.99,
            "location": "Bole",
            "contactInfo": { "phone": "+251911000000" }
        }))
        .unwrap();

        assert_eq!(detail.additional_image_urls, vec!["file-b", "file-c"]);
        assert_eq!(detail.contact_info.phone, "+251911000000");
        assert_eq!(detail.seller_id, "s-9");
        assert_eq!(detail.price, Price::Amount(49.99));
    }

    #[test]
    fn detail_with_both_identifiers_prefers_object_id() {
        let detail: ProductDetail = serde_json::from_value(json!({
            "_id": "64f0c2",
            "id": "64f0c2-virtual",
            "name": "Chair",
            "price": 1.0
        }))
        .unwrap();

        assert_eq!(detail.id, "64f0c2");
    }

    #[test]
    fn detail_null_fields_decode_as_empty() {
        let detail: ProductDetail = serde_json::from_value(json!({
            "_id": "1",
            "name": "Chair",
            "price": 1.0,
            "location": null,
            "shortDescription": null,
            "generalCategory": null,
            "specificCategory": null,
            "additionalImageUrls": null,
            "contactInfo": { "phone": null }
        }))
        .unwrap();

        assert_eq!(detail.location, "");
        assert_eq!(detail.short_description, "");
        assert_eq!(detail.general_category, "");
        assert!(detail.additional_image_urls.is_empty());
        assert_eq!(detail.contact_info.phone, "");
    }

    #[test]
    fn detail_text_price_is_kept_verbatim() {
        let detail: ProductDetail = serde_json::from_value(json!({
            "_id": "1",
            "name": "Chair",
            "price": "49.99 negotiable"
        }))
        .unwrap();

        assert_eq!(detail.price, Price::Text("49.99 negotiable".to_string()));
        assert_eq!(detail.price.to_string(), "49.99 negotiable");
        assert_eq!(Price::Amount(199.0).to_string(), "199.00");
    }

    #[test]
    fn detail_missing_price_is_rejected() {
        let result = serde_json::from_value::<ProductDetail>(json!({
            "_id": "1",
            "name": "Chair"
        }));
        assert!(result.is_err());
    }
}
