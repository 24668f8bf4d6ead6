//! Transactions: typed economic events built from line items.

pub mod error;
pub mod line_item;
#[allow(clippy::module_inception)]
pub mod transaction;
pub mod types;

pub use error::TransactionError;
pub use line_item::{LineItem, Vat};
pub use transaction::Transaction;
pub use types::TransactionType;
