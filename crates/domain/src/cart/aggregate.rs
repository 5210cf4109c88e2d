//! Cart aggregate implementation.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;
use crate::error::CartError;

use super::{CartEvent, LineItem, Money, Product, StockLevel};

/// Outcome of checking an add request against the stock level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddPlan {
    /// The product is already in the cart; apply these events.
    Increment(Vec<CartEvent>),

    /// The product is new to the cart; its catalog entry must be fetched
    /// and passed to [`Cart::add_new_item`].
    NeedsProduct,
}

/// Ordered collection of line items.
///
/// Insertion order is preserved and each product appears at most once.
/// Serialized as a plain JSON array of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Aggregate for Cart {
    type Event = CartEvent;
    type Error = CartError;

    fn aggregate_type() -> &'static str {
        "Cart"
    }

    fn apply(&mut self, event: Self::Event) {
        match event {
            CartEvent::ItemAdded(data) => self.items.push(data.item),
            CartEvent::ItemAmountChanged(data) => {
                if let Some(item) = self.get_mut(data.product_id) {
                    item.amount = data.new_amount;
                }
            }
            CartEvent::ItemRemoved(data) => {
                self.items.retain(|item| item.product_id() != data.product_id);
            }
            CartEvent::CartCleared => self.items.clear(),
        }
    }
}

// Query methods
impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from stored line items.
    ///
    /// Lines with a zero amount are dropped and, when a product appears
    /// more than once, only its first line is kept.
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.amount > 0 && !cart.contains(item.product_id()) {
                cart.items.push(item);
            }
        }
        cart
    }

    /// Returns the line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Consumes the cart and returns its line items.
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Returns the line item for a product.
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.product_id() == product_id)
    }

    fn get_mut(&mut self, product_id: ProductId) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|item| item.product_id() == product_id)
    }

    /// Returns the line item for a product, or `ItemNotFound`.
    pub fn require_item(&self, product_id: ProductId) -> Result<&LineItem, CartError> {
        self.get(product_id)
            .ok_or(CartError::ItemNotFound { product_id })
    }

    /// Returns true if the product has a line item.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Returns the number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the total number of units across all line items.
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |total, item| total.saturating_add(item.amount))
    }

    /// Returns the sum of all line subtotals.
    pub fn total(&self) -> Money {
        self.items.iter().map(LineItem::subtotal).sum()
    }
}

// Command methods (return events)
impl Cart {
    /// Checks an add request against the current stock level.
    ///
    /// An existing line may grow by one unit only while the stock covers
    /// the new amount. A product with no stock can never be added.
    pub fn plan_add(&self, product_id: ProductId, stock: &StockLevel) -> Result<AddPlan, CartError> {
        let current = self.get(product_id).map_or(0, |item| item.amount);
        let out_of_stock = |requested| CartError::OutOfStock {
            product_id,
            requested,
            available: stock.amount,
        };

        // A line already at u32::MAX can never grow.
        let requested = current.checked_add(1).ok_or_else(|| out_of_stock(u32::MAX))?;

        if stock.is_empty() || !stock.covers(requested) {
            return Err(out_of_stock(requested));
        }

        if current == 0 {
            Ok(AddPlan::NeedsProduct)
        } else {
            Ok(AddPlan::Increment(vec![CartEvent::item_amount_changed(
                product_id, current, requested,
            )]))
        }
    }

    /// Appends a new line item with an amount of 1.
    pub fn add_new_item(&self, product: Product) -> Result<Vec<CartEvent>, CartError> {
        if self.contains(product.id) {
            return Err(CartError::AlreadyInCart {
                product_id: product.id,
            });
        }

        Ok(vec![CartEvent::item_added(LineItem::new(product, 1))])
    }

    /// Removes the line item for a product.
    pub fn remove_product(&self, product_id: ProductId) -> Result<Vec<CartEvent>, CartError> {
        self.require_item(product_id)?;
        Ok(vec![CartEvent::item_removed(product_id)])
    }

    /// Sets the amount of an existing line item.
    ///
    /// The stock must cover the full requested amount.
    pub fn update_amount(
        &self,
        product_id: ProductId,
        amount: u32,
        stock: &StockLevel,
    ) -> Result<Vec<CartEvent>, CartError> {
        let existing = self.require_item(product_id)?;

        if amount == 0 {
            return Err(CartError::InvalidAmount { amount });
        }

        if !stock.covers(amount) {
            return Err(CartError::OutOfStock {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }

        Ok(vec![CartEvent::item_amount_changed(
            product_id,
            existing.amount,
            amount,
        )])
    }

    /// Removes every line item.
    pub fn clear(&self) -> Vec<CartEvent> {
        if self.is_empty() {
            vec![]
        } else {
            vec![CartEvent::CartCleared]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u64) -> Product {
        Product::new(
            ProductId::new(id),
            format!("Tênis {id}"),
            Money::from_cents(1000 * id as i64),
            format!("https://img/{id}.jpg"),
        )
    }

    fn stock(id: u64, amount: u32) -> StockLevel {
        StockLevel::new(ProductId::new(id), amount)
    }

    fn cart_with(entries: &[(u64, u32)]) -> Cart {
        Cart::from_items(
            entries
                .iter()
                .map(|&(id, amount)| LineItem::new(product(id), amount)),
        )
    }

    fn ids(cart: &Cart) -> Vec<u64> {
        cart.items().iter().map(|i| i.product_id().as_u64()).collect()
    }

    #[test]
    fn test_plan_add_new_product() {
        let cart = Cart::new();
        let plan = cart
            .plan_add(ProductId::new(5), &stock(5, 3))
            .unwrap();
        assert_eq!(plan, AddPlan::NeedsProduct);
    }

    #[test]
    fn test_add_new_item_appends_with_amount_one() {
        let mut cart = cart_with(&[(1, 2)]);
        let events = cart.add_new_item(product(5)).unwrap();
        cart.apply_events(events);

        assert_eq!(ids(&cart), vec![1, 5]);
        assert_eq!(cart.get(ProductId::new(5)).unwrap().amount, 1);
    }

    #[test]
    fn test_add_new_item_twice_fails() {
        let cart = cart_with(&[(5, 1)]);
        let result = cart.add_new_item(product(5));
        assert!(matches!(result, Err(CartError::AlreadyInCart { .. })));
    }

    #[test]
    fn test_plan_add_existing_increments() {
        let mut cart = cart_with(&[(1, 1)]);
        let plan = cart
            .plan_add(ProductId::new(1), &stock(1, 2))
            .unwrap();

        let AddPlan::Increment(events) = plan else {
            panic!("expected increment");
        };
        cart.apply_events(events);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 2);
    }

    #[test]
    fn test_plan_add_existing_beyond_stock_fails() {
        let cart = cart_with(&[(1, 2)]);
        let result = cart.plan_add(ProductId::new(1), &stock(1, 2));

        assert_eq!(
            result,
            Err(CartError::OutOfStock {
                product_id: ProductId::new(1),
                requested: 3,
                available: 2,
            })
        );
    }

    #[test]
    fn test_plan_add_zero_stock_fails() {
        let cart = Cart::new();
        let result = cart.plan_add(ProductId::new(3), &stock(3, 0));
        assert!(matches!(result, Err(CartError::OutOfStock { available: 0, .. })));
    }

    #[test]
    fn test_remove_product_preserves_order() {
        let mut cart = cart_with(&[(1, 1), (2, 3), (3, 1)]);
        let events = cart.remove_product(ProductId::new(2)).unwrap();
        cart.apply_events(events);

        assert_eq!(ids(&cart), vec![1, 3]);
        assert_eq!(cart.get(ProductId::new(3)).unwrap().amount, 1);
    }

    #[test]
    fn test_remove_missing_product_fails() {
        let cart = cart_with(&[(1, 1)]);
        let result = cart.remove_product(ProductId::new(9));
        assert_eq!(
            result,
            Err(CartError::ItemNotFound {
                product_id: ProductId::new(9)
            })
        );
    }

    #[test]
    fn test_update_amount_within_stock() {
        let mut cart = cart_with(&[(1, 1)]);
        let events = cart
            .update_amount(ProductId::new(1), 4, &stock(1, 4))
            .unwrap();
        cart.apply_events(events);

        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 4);
    }

    #[test]
    fn test_update_amount_beyond_stock_fails() {
        let cart = cart_with(&[(1, 2)]);
        let result = cart.update_amount(ProductId::new(1), 3, &stock(1, 2));
        assert!(matches!(result, Err(CartError::OutOfStock { requested: 3, .. })));
    }

    #[test]
    fn test_update_amount_zero_is_invalid() {
        let cart = cart_with(&[(1, 2)]);
        let result = cart.update_amount(ProductId::new(1), 0, &stock(1, 5));
        assert_eq!(result, Err(CartError::InvalidAmount { amount: 0 }));
    }

    #[test]
    fn test_update_amount_missing_product_fails() {
        let cart = Cart::new();
        let result = cart.update_amount(ProductId::new(1), 1, &stock(1, 5));
        assert!(matches!(result, Err(CartError::ItemNotFound { .. })));
    }

    #[test]
    fn test_clear() {
        let mut cart = cart_with(&[(1, 1), (2, 2)]);
        cart.apply_events(cart.clear());
        assert!(cart.is_empty());
        assert!(cart.clear().is_empty());
    }

    #[test]
    fn test_totals() {
        let cart = cart_with(&[(1, 2), (2, 3)]);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total_quantity(), 5);
        assert_eq!(cart.total().cents(), 2 * 1000 + 3 * 2000);
    }

    #[test]
    fn test_from_items_drops_zero_and_duplicate_lines() {
        let cart = Cart::from_items(vec![
            LineItem::new(product(1), 2),
            LineItem::new(product(2), 0),
            LineItem::new(product(1), 5),
            LineItem::new(product(3), 1),
        ]);

        assert_eq!(ids(&cart), vec![1, 3]);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 2);
    }

    #[test]
    fn test_serialization_round_trip_preserves_order() {
        let cart = cart_with(&[(3, 1), (1, 2), (2, 1)]);
        let json = serde_json::to_string(&cart).unwrap();
        assert!(json.starts_with('['));

        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_plan_add_at_max_amount_is_out_of_stock() {
        let cart = cart_with(&[(1, u32::MAX)]);

        let result = cart.plan_add(ProductId::new(1), &stock(1, u32::MAX));

        assert_eq!(
            result,
            Err(CartError::OutOfStock {
                product_id: ProductId::new(1),
                requested: u32::MAX,
                available: u32::MAX,
            })
        );
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, u32::MAX);
    }

    #[test]
    fn test_totals_saturate_on_huge_amounts() {
        let cart = cart_with(&[(1, u32::MAX), (2, u32::MAX)]);

        assert_eq!(cart.total_quantity(), u32::MAX);
        assert!(cart.total().cents() > 0);
    }
}
