use storefront_client::Product;

/// Client-side catalog predicates, combined with AND. `None` matches all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    /// Case-insensitive substring of the product name
    pub search: Option<String>,
    /// Inclusive upper bound on price
    pub max_price: Option<f64>,
}

impl CatalogFilter {
    pub fn new(search: Option<String>, max_price: Option<f64>) -> Self {
        Self {
            search: search.filter(|query| !query.is_empty()),
            max_price,
        }
    }

    /// Parse raw query-string values. Empty values count as absent.
    pub fn parse(search: Option<&str>, max_price: Option<&str>) -> Result<Self, String> {
        let max_price = match max_price {
            Some(raw) => Self::parse_max_price(raw)?,
            None => None,
        };
        Ok(Self::new(search.map(str::to_string), max_price))
    }

    /// Blank is absent; anything else must be a finite number.
    pub fn parse_max_price(raw: &str) -> Result<Option<f64>, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Some(value)),
            _ => Err(format!("max_price must be a number, got '{}'", raw)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.max_price.is_none()
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.matches_name(&product.name) && self.matches_price(product.price)
    }

    fn matches_name(&self, name: &str) -> bool {
        match &self.search {
            Some(query) => name.to_lowercase().contains(&query.to_lowercase()),
            None => true,
        }
    }

    fn matches_price(&self, price: f64) -> bool {
        match self.max_price {
            Some(max) => price <= max,
            None => true,
        }
    }
}
