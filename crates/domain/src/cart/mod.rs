//! Cart aggregate and related types.

mod aggregate;
mod events;
mod value_objects;

pub use aggregate::{AddPlan, Cart};
pub use events::{CartEvent, ItemAddedData, ItemAmountChangedData, ItemRemovedData};
pub use value_objects::{LineItem, Money, Product, StockLevel};
