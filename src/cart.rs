//! # Cart Store Module
//!
//! Per-user shopping carts. A cart maps product ids to positive quantities;
//! a user without a cart entry has an empty cart, and removing the last
//! product drops the user's entry entirely.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use teloxide::types::UserId;
use tracing::debug;

use crate::catalog::{Catalog, Price, Product, ProductId};
use crate::errors::{BotError, BotResult};

/// One priced line of a cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
}

impl CartLine {
    pub fn amount(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Priced copy of a user's cart, lines in the order they were first added
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
}

impl CartView {
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::amount).sum()
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// Insertion-ordered product quantities
type Items = Vec<(ProductId, u32)>;

/// Process-lifetime cart storage keyed by user
pub struct CartStore {
    catalog: Arc<Catalog>,
    carts: Mutex<HashMap<UserId, Items>>,
}

impl CartStore {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            carts: Mutex::new(HashMap::new()),
        }
    }

    fn carts(&self) -> MutexGuard<'_, HashMap<UserId, Items>> {
        self.carts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add one unit of a product, returning the cart's new unit count
    pub fn add_item(&self, user: UserId, product_id: &ProductId) -> BotResult<u32> {
        if !self.catalog.contains(product_id) {
            return Err(BotError::NotFound(format!("product {product_id}")));
        }

        let mut carts = self.carts();
        let items = carts.entry(user).or_default();
        match items.iter_mut().find(|(id, _)| id == product_id) {
            Some((_, quantity)) => *quantity += 1,
            None => items.push((product_id.clone(), 1)),
        }
        let count: u32 = items.iter().map(|(_, quantity)| quantity).sum();
        debug!(user_id = %user, product_id = %product_id, cart_items = count, "Added item to cart");
        Ok(count)
    }

    /// Remove a product entirely, returning it if it was in the cart
    pub fn remove_item(&self, user: UserId, product_id: &ProductId) -> Option<Product> {
        let mut carts = self.carts();
        let items = carts.get_mut(&user)?;
        let position = items.iter().position(|(id, _)| id == product_id)?;
        items.remove(position);
        if items.is_empty() {
            carts.remove(&user);
        }
        debug!(user_id = %user, product_id = %product_id, "Removed item from cart");
        self.catalog.get(product_id).cloned()
    }

    /// Priced view of the user's cart, empty when the user has none
    pub fn get_cart(&self, user: UserId) -> CartView {
        let carts = self.carts();
        let Some(items) = carts.get(&user) else {
            return CartView::default();
        };

        let lines = items
            .iter()
            .filter_map(|(product_id, quantity)| {
                self.catalog.get(product_id).map(|product| CartLine {
                    product_id: product.id.clone(),
                    name: product.name.clone(),
                    unit_price: product.price,
                    quantity: *quantity,
                })
            })
            .collect();

        CartView { lines }
    }

    pub fn clear_cart(&self, user: UserId) {
        if self.carts().remove(&user).is_some() {
            debug!(user_id = %user, "Cleared cart");
        }
    }

    pub fn quantity(&self, user: UserId, product_id: &ProductId) -> u32 {
        self.carts()
            .get(&user)
            .and_then(|items| {
                items
                    .iter()
                    .find(|(id, _)| id == product_id)
                    .map(|(_, quantity)| *quantity)
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self, user: UserId) -> bool {
        !self.carts().contains_key(&user)
    }

    /// Number of users currently holding a cart
    pub fn active_carts(&self) -> usize {
        self.carts().len()
    }

    /// Drop every cart
    pub fn clear_all(&self) {
        self.carts().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CartStore {
        CartStore::new(Arc::new(Catalog::builtin()))
    }

    #[test]
    fn test_add_increments_quantity() {
        let carts = store();
        let user = UserId(1);
        assert_eq!(carts.add_item(user, &"p1".into()).unwrap(), 1);
        assert_eq!(carts.add_item(user, &"p1".into()).unwrap(), 2);
        assert_eq!(carts.add_item(user, &"p3".into()).unwrap(), 3);
        assert_eq!(carts.quantity(user, &"p1".into()), 2);
    }

    #[test]
    fn test_remove_last_product_drops_cart() {
        let carts = store();
        let user = UserId(1);
        carts.add_item(user, &"p2".into()).unwrap();
        carts.add_item(user, &"p2".into()).unwrap();

        let removed = carts.remove_item(user, &"p2".into()).unwrap();
        assert_eq!(removed.name, "Dummy Product B");
        assert!(carts.is_empty(user));
        assert_eq!(carts.active_carts(), 0);
    }

    #[test]
    fn test_cart_lines_follow_insertion_order() {
        let carts = store();
        let user = UserId(7);
        carts.add_item(user, &"p3".into()).unwrap();
        carts.add_item(user, &"p1".into()).unwrap();
        carts.add_item(user, &"p3".into()).unwrap();

        let view = carts.get_cart(user);
        let ids: Vec<&str> = view.lines.iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(ids, ["p3", "p1"]);
        assert_eq!(view.lines[0].quantity, 2);
        assert_eq!(view.total(), Price::from_cents(2000));
    }

    #[test]
    fn test_readding_removed_product_moves_it_last() {
        let carts = store();
        let user = UserId(8);
        carts.add_item(user, &"p1".into()).unwrap();
        carts.add_item(user, &"p2".into()).unwrap();
        carts.remove_item(user, &"p1".into()).unwrap();
        carts.add_item(user, &"p1".into()).unwrap();

        let view = carts.get_cart(user);
        let ids: Vec<&str> = view.lines.iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(ids, ["p2", "p1"]);
    }
}
