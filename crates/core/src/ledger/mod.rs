//! The ledger: immutable hash-chained rows and the posting engine.

pub mod entry;
pub mod error;
pub mod hash;
pub mod journal;
pub mod posting;

#[cfg(test)]
mod posting_props;

pub use entry::{EntryType, Ledger};
pub use error::{LedgerError, PostingError};
pub use journal::{Journal, LedgerDraft};
pub use posting::PostingService;
