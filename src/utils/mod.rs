//! Formatting helpers shared by the views.

use storefront_client::Price;

/// Prices are shown in Ethiopian birr with two decimals.
pub fn format_price(price: f64) -> String {
    format!("Br {:.2}", price)
}

/// Numeric detail prices get two decimals; text prices are shown as sent.
pub fn format_detail_price(price: &Price) -> String {
    format!("Br {}", price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_two_decimals() {
        assert_eq!(format_price(49.99), "Br 49.99");
        assert_eq!(format_price(199.0), "Br 199.00");
    }

    #[test]
    fn detail_price_keeps_text_verbatim() {
        assert_eq!(format_detail_price(&Price::Amount(12.5)), "Br 12.50");
        assert_eq!(
            format_detail_price(&Price::Text("on request".to_string())),
            "Br on request"
        );
    }
}
