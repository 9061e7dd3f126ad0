//! Normalizes the raw transaction kinds sent by upstream systems.
//!
//! The history API is not consistent about vocabulary: some sources report
//! `income`/`outcome`, others `input`/`output`, with arbitrary casing. Anything
//! else is treated as [`TransactionCategory::Ignored`] so the chart can still be
//! drawn from the records it does understand.

use crate::domain::date_utils::parse_flexible_timestamp;
use crate::domain::models::transaction::{ClassifiedTransaction, Transaction, TransactionCategory};

/// Map a raw kind to its category. Never fails.
pub fn classify(raw_kind: &str) -> TransactionCategory {
    match raw_kind.trim().to_lowercase().as_str() {
        "income" | "input" => TransactionCategory::Income,
        "outcome" | "output" => TransactionCategory::Expense,
        _ => TransactionCategory::Ignored,
    }
}

/// Parse and classify a single transaction.
///
/// Returns `None` when the timestamp cannot be parsed. Non-finite amounts are
/// read as zero.
pub fn classify_transaction(transaction: &Transaction) -> Option<ClassifiedTransaction> {
    let timestamp = parse_flexible_timestamp(&transaction.timestamp)?;
    let amount = if transaction.amount.is_finite() { transaction.amount } else { 0.0 };

    Some(ClassifiedTransaction {
        timestamp,
        amount,
        category: classify(&transaction.kind),
    })
}
