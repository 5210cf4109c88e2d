//! User-facing notification texts.
//!
//! The storefront is Brazilian Portuguese; these strings are shown to the
//! shopper verbatim.

/// Adding a product failed.
pub const ADD_FAILED: &str = "Erro na adição do produto";

/// Removing a product failed.
pub const REMOVE_FAILED: &str = "Erro na remoção do produto";

/// Changing a product amount failed.
pub const UPDATE_FAILED: &str = "Erro na alteração de quantidade do produto";

/// Emptying the cart failed.
pub const CLEAR_FAILED: &str = "Erro ao esvaziar o carrinho";

/// The requested amount exceeds the stock.
pub const OUT_OF_STOCK: &str = "Quantidade solicitada fora de estoque";

/// The cart could not be written to storage.
pub const SAVE_FAILED: &str = "Erro ao salvar o carrinho";

/// The cart operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AddProduct,
    RemoveProduct,
    UpdateAmount,
    Clear,
}

impl Operation {
    /// Returns the operation name, used in logs and metrics labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::AddProduct => "add_product",
            Operation::RemoveProduct => "remove_product",
            Operation::UpdateAmount => "update_product_amount",
            Operation::Clear => "clear",
        }
    }

    /// Returns the generic failure message for this operation.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::AddProduct => ADD_FAILED,
            Operation::RemoveProduct => REMOVE_FAILED,
            Operation::UpdateAmount => UPDATE_FAILED,
            Operation::Clear => CLEAR_FAILED,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
