//! The basket aggregate.
//!
//! A basket belongs to one [`BuyerId`] and holds at most one line per
//! product. Mutations only touch in-memory state; the API's basket
//! repository persists the result.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{BasketId, BuyerId, Price, ProductId};

/// Largest quantity a single line can hold (the storage column is a
/// 32-bit signed integer).
pub const MAX_LINE_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// A line in a basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketItem {
    /// Product snapshot loaded together with the basket.
    pub product: Product,
    /// Always in `1..=MAX_LINE_QUANTITY`.
    pub quantity: u32,
}

impl BasketItem {
    /// Product this line refers to.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Price of the line (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// A shopping basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basket {
    /// `None` until the basket has been inserted.
    pub id: Option<BasketId>,
    pub buyer_id: BuyerId,
    pub items: Vec<BasketItem>,
}

impl Basket {
    /// Create an empty, unsaved basket for `buyer_id`.
    #[must_use]
    pub const fn new(buyer_id: BuyerId) -> Self {
        Self {
            id: None,
            buyer_id,
            items: Vec::new(),
        }
    }

    /// Add `quantity` units of `product`.
    ///
    /// Increments the existing line for the product, or appends a new one.
    /// A line never grows past [`MAX_LINE_QUANTITY`]. Stock levels are not
    /// checked. Adding zero units does nothing.
    pub fn add_item(&mut self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        match self.items.iter_mut().find(|i| i.product.id == product.id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(quantity).min(MAX_LINE_QUANTITY);
            }
            None => self.items.push(BasketItem {
                product: product.clone(),
                quantity: quantity.min(MAX_LINE_QUANTITY),
            }),
        }
    }

    /// Remove up to `quantity` units of the product.
    ///
    /// The line is dropped once its quantity reaches zero. Removing a
    /// product that is not in the basket does nothing.
    pub fn remove_item(&mut self, product_id: ProductId, quantity: u32) {
        let Some(pos) = self.items.iter().position(|i| i.product.id == product_id) else {
            return;
        };

        let remaining = self
            .items
            .get(pos)
            .map_or(0, |item| item.quantity.saturating_sub(quantity));
        if remaining == 0 {
            self.items.remove(pos);
        } else if let Some(item) = self.items.get_mut(pos) {
            item.quantity = remaining;
        }
    }

    /// The line for `product_id`, if any.
    #[must_use]
    pub fn item(&self, product_id: ProductId) -> Option<&BasketItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items
            .iter()
            .fold(Price::ZERO, |acc, item| acc + item.line_total())
    }

    /// Whether the basket has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::tests::product;

    fn basket() -> Basket {
        Basket::new(BuyerId::parse("bob").unwrap())
    }

    #[test]
    fn test_new_basket_is_empty_and_unsaved() {
        let b = basket();
        assert!(b.is_empty());
        assert!(b.id.is_none());
        assert_eq!(b.item_count(), 0);
    }

    #[test]
    fn test_adding_same_product_twice_accumulates_one_line() {
        let hat = product(7, "Core Blue Hat", 1000, "NetCore", "Hats");
        let mut b = basket();
        b.add_item(&hat, 2);
        b.add_item(&hat, 3);

        assert_eq!(b.items.len(), 1);
        assert_eq!(b.item(ProductId::new(7)).unwrap().quantity, 5);
    }

    #[test]
    fn test_adding_distinct_products_keeps_insertion_order() {
        let mut b = basket();
        b.add_item(&product(2, "B", 100, "X", "Y"), 1);
        b.add_item(&product(1, "A", 100, "X", "Y"), 1);
        let ids: Vec<i32> = b.items.iter().map(|i| i.product_id().as_i32()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_adding_zero_is_noop() {
        let mut b = basket();
        b.add_item(&product(1, "A", 100, "X", "Y"), 0);
        assert!(b.is_empty());
    }

    #[test]
    fn test_line_quantity_is_capped_at_storable_maximum() {
        let hat = product(7, "Core Blue Hat", 1000, "NetCore", "Hats");
        let mut b = basket();
        b.add_item(&hat, 2);
        b.add_item(&hat, 3);
        b.add_item(&hat, u32::MAX - 5);
        assert_eq!(b.item(ProductId::new(7)).unwrap().quantity, MAX_LINE_QUANTITY);

        let mut fresh = basket();
        fresh.add_item(&hat, u32::MAX);
        assert_eq!(fresh.item(ProductId::new(7)).unwrap().quantity, MAX_LINE_QUANTITY);
        assert_eq!(i32::try_from(MAX_LINE_QUANTITY), Ok(i32::MAX));
    }

    #[test]
    fn test_remove_partial_quantity() {
        let mut b = basket();
        b.add_item(&product(1, "A", 100, "X", "Y"), 5);
        b.remove_item(ProductId::new(1), 2);
        assert_eq!(b.item(ProductId::new(1)).unwrap().quantity, 3);
    }

    #[test]
    fn test_remove_at_or_beyond_quantity_drops_line() {
        let mut exact = basket();
        exact.add_item(&product(1, "A", 100, "X", "Y"), 3);
        exact.remove_item(ProductId::new(1), 3);
        assert!(exact.item(ProductId::new(1)).is_none());

        let mut beyond = basket();
        beyond.add_item(&product(1, "A", 100, "X", "Y"), 3);
        beyond.remove_item(ProductId::new(1), 10);
        assert!(beyond.is_empty());
    }

    #[test]
    fn test_remove_absent_product_is_noop() {
        let mut b = basket();
        b.add_item(&product(1, "A", 100, "X", "Y"), 1);
        let before = b.clone();
        b.remove_item(ProductId::new(99), 1);
        assert_eq!(b, before);
    }

    #[test]
    fn test_item_count_and_subtotal() {
        let mut b = basket();
        b.add_item(&product(1, "A", 1500, "X", "Y"), 2);
        b.add_item(&product(2, "B", 250, "X", "Y"), 4);
        assert_eq!(b.item_count(), 6);
        assert_eq!(b.subtotal(), Price::from_minor(4000));
    }
}
