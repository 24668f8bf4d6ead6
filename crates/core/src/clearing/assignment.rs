//! Assignments: matching clearing transactions against cleared ones.

use chrono::{DateTime, Utc};
use ifrs_shared::types::{AccountId, AssignmentId, EntityId, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A forex gain or loss booked when a clearance settles at a different
/// exchange rate than the transaction it clears.
///
/// Kept on the assignment so that unassigning can append the reversing
/// entry without touching history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForexAdjustment {
    /// The entity's forex gain/loss account.
    pub account_id: AccountId,
    /// The main account the adjustment offsets.
    pub offset_account_id: AccountId,
    /// Date the adjustment posted (the clearing transaction's date).
    pub post_date: chrono::NaiveDate,
    /// Functional amount of the adjustment (strictly positive).
    pub amount: Decimal,
    /// Whether the forex account took the credit side (a gain).
    pub credited: bool,
}

/// A partial or full match of a clearing transaction against a cleared
/// one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// Unique identifier.
    pub id: AssignmentId,
    /// Entity this assignment belongs to.
    pub entity_id: EntityId,
    /// The transaction being cleared (invoice, bill, journal).
    pub cleared_id: TransactionId,
    /// The transaction doing the clearing (receipt, payment, note,
    /// journal).
    pub clearing_id: TransactionId,
    /// Amount matched, in the shared transaction currency.
    pub amount: Decimal,
    /// When the assignment was made.
    pub assigned_at: DateTime<Utc>,
    /// Forex adjustment posted alongside, if any.
    pub forex: Option<ForexAdjustment>,
}
