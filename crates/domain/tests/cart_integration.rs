//! Integration tests for the cart aggregate.
//!
//! These tests drive the cart through the same decide-then-apply cycle the
//! cart store uses, with stock levels supplied by the caller.

use domain::{
    AddPlan, Aggregate, Cart, CartError, CartEvent, DomainEvent, LineItem, Money, Product,
    ProductId, StockLevel,
};

fn product(id: u64) -> Product {
    Product::new(
        ProductId::new(id),
        format!("Tênis {id}"),
        Money::from_cents(9990),
        format!("https://img/{id}.jpg"),
    )
}

/// Runs one add request the way the store does.
fn add(cart: &mut Cart, id: u64, available: u32) -> Result<Vec<CartEvent>, CartError> {
    let product_id = ProductId::new(id);
    let events = match cart.plan_add(product_id, &StockLevel::new(product_id, available))? {
        AddPlan::Increment(events) => events,
        AddPlan::NeedsProduct => cart.add_new_item(product(id))?,
    };
    cart.apply_events(events.clone());
    Ok(events)
}

mod adding {
    use super::*;

    #[test]
    fn new_product_with_stock_yields_single_line() {
        let mut cart = Cart::new();

        let events = add(&mut cart, 5, 3).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "ItemAdded");
        assert_eq!(cart.len(), 1);
        let item = cart.get(ProductId::new(5)).unwrap();
        assert_eq!(item.amount, 1);
        assert_eq!(item.product.title, "Tênis 5");
    }

    #[test]
    fn repeated_adds_stop_at_stock_level() {
        let mut cart = Cart::new();

        add(&mut cart, 1, 2).unwrap();
        add(&mut cart, 1, 2).unwrap();
        let third = add(&mut cart, 1, 2);

        assert!(matches!(third, Err(CartError::OutOfStock { requested: 3, .. })));
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 2);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn zero_stock_never_mutates() {
        let mut cart = Cart::from_items(vec![LineItem::new(product(1), 1)]);
        let before = cart.clone();

        assert!(add(&mut cart, 1, 0).is_err());
        assert!(add(&mut cart, 2, 0).is_err());
        assert_eq!(cart, before);
    }
}

mod updating {
    use super::*;

    #[test]
    fn update_beyond_stock_leaves_cart_unchanged() {
        let cart = Cart::from_items(vec![LineItem::new(product(1), 2)]);
        let product_id = ProductId::new(1);

        let result = cart.update_amount(product_id, 3, &StockLevel::new(product_id, 2));

        assert_eq!(
            result,
            Err(CartError::OutOfStock {
                product_id,
                requested: 3,
                available: 2,
            })
        );
        assert_eq!(cart.get(product_id).unwrap().amount, 2);
    }

    #[test]
    fn update_to_exact_stock_succeeds() {
        let mut cart = Cart::from_items(vec![LineItem::new(product(1), 1)]);
        let product_id = ProductId::new(1);

        let events = cart
            .update_amount(product_id, 4, &StockLevel::new(product_id, 4))
            .unwrap();
        cart.apply_events(events);

        assert_eq!(cart.get(product_id).unwrap().amount, 4);
        assert_eq!(cart.total().cents(), 4 * 9990);
    }
}

mod persistence_format {
    use super::*;

    #[test]
    fn persisted_items_reload_in_order() {
        let mut cart = Cart::new();
        for id in [3, 1, 2] {
            add(&mut cart, id, 5).unwrap();
        }
        add(&mut cart, 1, 5).unwrap();

        let json = serde_json::to_string(cart.items()).unwrap();
        let items: Vec<LineItem> = serde_json::from_str(&json).unwrap();
        let reloaded = Cart::from_items(items);

        assert_eq!(reloaded, cart);
        let order: Vec<u64> = reloaded
            .items()
            .iter()
            .map(|item| item.product_id().as_u64())
            .collect();
        assert_eq!(order, vec![3, 1, 2]);
    }
}
