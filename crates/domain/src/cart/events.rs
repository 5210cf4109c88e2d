//! Cart domain events.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::LineItem;

/// Events that can occur on a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CartEvent {
    /// A new line item was appended.
    ItemAdded(ItemAddedData),

    /// The amount of an existing line item changed.
    ItemAmountChanged(ItemAmountChangedData),

    /// A line item was removed.
    ItemRemoved(ItemRemovedData),

    /// Every line item was removed.
    CartCleared,
}

impl DomainEvent for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded(_) => "ItemAdded",
            CartEvent::ItemAmountChanged(_) => "ItemAmountChanged",
            CartEvent::ItemRemoved(_) => "ItemRemoved",
            CartEvent::CartCleared => "CartCleared",
        }
    }
}

/// Data for ItemAdded event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAddedData {
    /// The line item appended to the cart.
    pub item: LineItem,
}

/// Data for ItemAmountChanged event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAmountChangedData {
    /// The product whose amount changed.
    pub product_id: ProductId,

    /// Previous amount.
    pub old_amount: u32,

    /// New amount.
    pub new_amount: u32,
}

/// Data for ItemRemoved event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemovedData {
    /// The product that was removed.
    pub product_id: ProductId,
}

// Convenience constructors for events
impl CartEvent {
    /// Creates an ItemAdded event.
    pub fn item_added(item: LineItem) -> Self {
        CartEvent::ItemAdded(ItemAddedData { item })
    }

    /// Creates an ItemAmountChanged event.
    pub fn item_amount_changed(product_id: ProductId, old_amount: u32, new_amount: u32) -> Self {
        CartEvent::ItemAmountChanged(ItemAmountChangedData {
            product_id,
            old_amount,
            new_amount,
        })
    }

    /// Creates an ItemRemoved event.
    pub fn item_removed(product_id: ProductId) -> Self {
        CartEvent::ItemRemoved(ItemRemovedData { product_id })
    }
}
