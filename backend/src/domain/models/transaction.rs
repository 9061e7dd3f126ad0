//! Domain model for a transaction.
use serde::{Deserialize, Serialize};
use chrono::NaiveDateTime;

/// Normalized transaction kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionCategory {
    Income,
    Expense,
    /// Unrecognized kind, excluded from every sum
    Ignored,
}

/// Transaction as received from the data source, before any interpretation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Raw timestamp text, parsed lazily by the aggregator
    pub timestamp: String,
    pub amount: f64,
    /// Raw kind as sent upstream
    pub kind: String,
}

impl Transaction {
    pub fn new(timestamp: impl Into<String>, amount: f64, kind: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            amount,
            kind: kind.into(),
        }
    }
}

impl From<&shared::HistoryTransaction> for Transaction {
    fn from(dto: &shared::HistoryTransaction) -> Self {
        Self {
            timestamp: dto.created_at.clone(),
            amount: dto.count,
            kind: dto.transaction_type.clone(),
        }
    }
}

/// Transaction with a parsed timestamp and a normalized category
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedTransaction {
    pub timestamp: NaiveDateTime,
    pub amount: f64,
    pub category: TransactionCategory,
}
