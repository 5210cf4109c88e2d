//! Value objects for the cart domain.

use common::ProductId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Money amount represented in cents to avoid floating point issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in cents (e.g., 1000 = $10.00)
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the dollar portion (whole number).
    pub fn dollars(&self) -> i64 {
        self.cents / 100
    }

    /// Returns the cents portion (remainder after dollars).
    pub fn cents_part(&self) -> i64 {
        self.cents.abs() % 100
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Multiplies by a quantity, saturating at the i64 bounds.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money {
            cents: self.cents.saturating_mul(i64::from(quantity)),
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.cents < 0 {
            write!(f, "-${}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "${}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents.saturating_add(rhs.cents),
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.cents = self.cents.saturating_add(rhs.cents);
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Catalog metadata for a product.
///
/// The cart only relies on `id`; the display fields are carried along so
/// a rendered cart needs no second catalog lookup. Any further catalog
/// fields land in `extra` and survive a persist/load round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// The product identifier.
    pub id: ProductId,

    /// Human-readable product name.
    pub title: String,

    /// Price per unit.
    pub price: Money,

    /// Product image URL.
    pub image: String,

    /// Catalog fields the cart does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Creates a product with no extra catalog fields.
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        price: Money,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            image: image.into(),
            extra: Map::new(),
        }
    }
}

/// A product entry in the cart with its selected quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// The product this line refers to.
    #[serde(flatten)]
    pub product: Product,

    /// Selected quantity, at least 1.
    pub amount: u32,
}

impl LineItem {
    /// Creates a new line item.
    pub fn new(product: Product, amount: u32) -> Self {
        Self { product, amount }
    }

    /// Returns the product identifier.
    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Returns the price for this line (amount * unit price).
    pub fn subtotal(&self) -> Money {
        self.product.price.multiply(self.amount)
    }
}

/// Units of a product available at query time.
///
/// Fetched on demand and never stored; it may be stale as soon as it
/// arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    /// The product identifier.
    pub id: ProductId,

    /// Units available.
    pub amount: u32,
}

impl StockLevel {
    /// Creates a stock level.
    pub fn new(id: ProductId, amount: u32) -> Self {
        Self { id, amount }
    }

    /// Returns true if `requested` units can be served.
    pub fn covers(&self, requested: u32) -> bool {
        requested <= self.amount
    }

    /// Returns true if nothing is available.
    pub fn is_empty(&self) -> bool {
        self.amount == 0
    }
}
