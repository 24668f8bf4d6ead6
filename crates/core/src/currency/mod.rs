//! Multi-currency handling and exchange rates.

pub mod error;
pub mod exchange;
pub mod service;

pub use error::CurrencyError;
pub use exchange::{ExchangeRate, RateTable};
pub use service::CurrencyService;
