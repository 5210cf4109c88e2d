//! Domain layer for the shopping cart.
//!
//! This crate provides the core domain abstractions including:
//! - Aggregate trait for event-driven state
//! - DomainEvent trait for domain events
//! - Cart aggregate with the stock rules for adding, removing and
//!   re-quantifying line items

pub mod aggregate;
pub mod cart;
pub mod error;

pub use aggregate::{Aggregate, DomainEvent};
pub use cart::{
    AddPlan, Cart, CartEvent, ItemAddedData, ItemAmountChangedData, ItemRemovedData, LineItem,
    Money, Product, StockLevel,
};
pub use common::ProductId;
pub use error::CartError;
