//! Catalog products.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::types::{Price, ProductId, ProductImage};

/// A sellable product and its current stock level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name (e.g. "Rice (25kg)").
    pub name: String,
    /// Free-text category used for filtering.
    pub category: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Selling price per unit.
    pub price: Price,
    /// Purchase cost per unit, used for profit figures.
    #[serde(default)]
    pub cost_price: Price,
    /// Units on hand. Stored negatives load as zero.
    #[serde(deserialize_with = "stock_from_signed")]
    pub stock: u32,
    /// Image URL or inline data URL.
    #[serde(default)]
    pub image: ProductImage,
}

impl Product {
    /// Returns true if `term` (already lowercased) occurs in the name,
    /// category or description.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(term)
            || self.category.to_lowercase().contains(term)
            || self.description.to_lowercase().contains(term)
    }
}

/// Reads a stock level that older data may have driven below zero.
fn stock_from_signed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = i64::deserialize(deserializer)?;
    Ok(u32::try_from(raw).unwrap_or_else(|_| {
        let clamped = if raw < 0 { 0 } else { u32::MAX };
        warn!(stock = raw, clamped, "Stored stock out of range");
        clamped
    }))
}

/// Input for creating a product. The ID is assigned by the catalog when
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    /// Caller-chosen ID, if any.
    #[serde(default)]
    pub id: Option<ProductId>,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub cost_price: Price,
    pub stock: u32,
    #[serde(default)]
    pub image: ProductImage,
}

impl ProductDraft {
    /// Turn the draft into a product with the given ID.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            category: self.category,
            description: self.description,
            price: self.price,
            cost_price: self.cost_price,
            stock: self.stock,
            image: self.image,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_price_defaults_to_zero() {
        let json = r#"{"id":"1","name":"Rice (25kg)","category":"Grains","price":3500,"stock":100,"image":"","description":"Premium quality rice"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.cost_price, Price::ZERO);
        assert_eq!(product.price, Price::from_rupees(3500));
    }

    #[test]
    fn test_negative_stock_loads_as_zero() {
        let json = r#"{"id":"2","name":"Oil","category":"Cooking","price":250,"stock":-2}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.stock, 0);

        let json = r#"{"id":"2","name":"Oil","category":"Cooking","price":250,"stock":7}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.stock, 7);
    }

    #[test]
    fn test_matches_is_case_insensitive_on_fields() {
        let product = ProductDraft {
            name: "Tea (500g)".to_owned(),
            category: "Beverages".to_owned(),
            description: "Premium tea leaves".to_owned(),
            ..ProductDraft::default()
        }
        .into_product(ProductId::new("6"));

        assert!(product.matches("tea"));
        assert!(product.matches("beverage"));
        assert!(product.matches("leaves"));
        assert!(!product.matches("rice"));
    }
}
