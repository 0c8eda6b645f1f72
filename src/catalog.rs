//! # Catalog Module
//!
//! The fixed set of purchasable products, known at startup and read-only
//! afterwards. Products keep their insertion order, which is also the
//! browsing order.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::path::Path;
use tracing::info;

use crate::errors::{BotError, BotResult};

/// Opaque product identifier (e.g. "p1")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Exact money amount in cents
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Price of `quantity` units
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Self {
        iter.fold(Price::default(), Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Reference to a product image, resolved by a media provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A purchasable item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(rename = "price_cents")]
    pub price: Price,
    pub description: String,
    pub category: String,
    pub image: ImageRef,
}

/// Read-only product list with lookup by id and by position
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting empty lists and duplicate ids
    pub fn new(products: Vec<Product>) -> BotResult<Self> {
        let catalog = Self { products };
        if catalog.is_empty() {
            return Err(BotError::Configuration(
                "catalog must contain at least one product".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for product in catalog.iter() {
            if !seen.insert(&product.id) {
                return Err(BotError::Configuration(format!(
                    "duplicate product id in catalog: {}",
                    product.id
                )));
            }
        }

        Ok(catalog)
    }

    /// The stock catalog shipped with the bot
    pub fn builtin() -> Self {
        let product = |id: &str, name: &str, cents, description: &str, category: &str, image: &str| {
            Product {
                id: ProductId::new(id),
                name: name.to_string(),
                price: Price::from_cents(cents),
                description: description.to_string(),
                category: category.to_string(),
                image: ImageRef::new(image),
            }
        };

        Self {
            products: vec![
                product(
                    "p1",
                    "Dummy Product A",
                    1000,
                    "A great dummy product.",
                    "Electronics",
                    "product_a.png",
                ),
                product(
                    "p2",
                    "Dummy Product B",
                    2550,
                    "Another fantastic dummy product.",
                    "Books",
                    "product_b.png",
                ),
                product(
                    "p3",
                    "Dummy Product C",
                    500,
                    "Small and useful dummy product.",
                    "Home Goods",
                    "product_c.jpg",
                ),
            ],
        }
    }

    /// Parse a catalog from a JSON array of products
    pub fn from_json(json: &str) -> BotResult<Self> {
        let products: Vec<Product> = serde_json::from_str(json)
            .map_err(|e| BotError::Configuration(format!("invalid catalog JSON: {e}")))?;
        Self::new(products)
    }

    /// Load a catalog from a JSON file
    pub fn load(path: &Path) -> BotResult<Self> {
        info!(path = %path.display(), "Loading catalog");
        let json = std::fs::read_to_string(path).map_err(|e| {
            BotError::Configuration(format!("cannot read catalog {}: {e}", path.display()))
        })?;
        let catalog = Self::from_json(&json)?;
        info!(products = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Product at the given browsing position
    pub fn at(&self, index: usize) -> Option<&Product> {
        self.products.get(index)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_cents(1000).to_string(), "$10.00");
        assert_eq!(Price::from_cents(2550).to_string(), "$25.50");
        assert_eq!(Price::from_cents(5).to_string(), "$0.05");
        assert_eq!(Price::from_cents(3550).to_string(), "$35.50");
    }

    #[test]
    fn test_price_arithmetic() {
        let total: Price = [Price::from_cents(1000).times(2), Price::from_cents(2550)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(4550));
    }

    #[test]
    fn test_builtin_catalog_order() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 3);
        let ids: Vec<&str> = catalog.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p1", "p2", "p3"]);
        assert_eq!(catalog.at(2).map(|p| p.name.as_str()), Some("Dummy Product C"));
        assert!(catalog.at(3).is_none());
        assert!(!catalog.contains(&"p9".into()));
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"[
            {"id": "tea", "name": "Green Tea", "price_cents": 450,
             "description": "Loose leaf.", "category": "Drinks", "image": "tea.png"}
        ]"#;
        let catalog = Catalog::from_json(json).unwrap();
        let tea = catalog.get(&"tea".into()).unwrap();
        assert_eq!(tea.price, Price::from_cents(450));
        assert_eq!(tea.image.as_str(), "tea.png");
    }

    #[test]
    fn test_catalog_rejects_duplicates_and_empty() {
        let mut products: Vec<Product> = Catalog::builtin().iter().cloned().collect();
        products.push(products[0].clone());
        assert!(matches!(
            Catalog::new(products),
            Err(BotError::Configuration(_))
        ));
        assert!(matches!(Catalog::from_json("[]"), Err(BotError::Configuration(_))));
        assert!(matches!(Catalog::from_json("{"), Err(BotError::Configuration(_))));
    }
}
