//! Shared types for the shopping cart workspace.

pub mod types;

pub use types::ProductId;
