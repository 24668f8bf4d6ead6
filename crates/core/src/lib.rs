//! Double-entry bookkeeping engine.
//!
//! The engine models one entity's books: a chart of accounts partitioned
//! into IFRS sections, transactions built from line items, an append-only
//! hash-chained journal, clearance of invoices and bills by receipts and
//! payments, reporting periods that gate posting, and financial
//! statements derived from the ledger.
//!
//! [`book::Book`] is the facade composing the stores; the `*Service`
//! types underneath it are stateless and can be driven directly.

pub mod account;
pub mod book;
pub mod clearing;
pub mod currency;
pub mod entity;
pub mod fiscal;
pub mod ledger;
pub mod reports;
pub mod transaction;

pub use book::{Book, BookError};
pub use entity::Entity;
