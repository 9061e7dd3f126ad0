use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{HistoryRequest, HistoryResponse, HistoryTransaction};
use tracing::{debug, info, warn};

use crate::domain::date_utils::{parse_flexible_timestamp, parse_iso_date};
use crate::storage::traits::{HistoryError, HistoryStorage, SessionContext};

/// On-disk document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryFile {
    #[serde(default)]
    pub accounts: Vec<AccountHistory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountHistory {
    pub name: String,
    #[serde(default)]
    pub transactions: Vec<HistoryTransaction>,
}

/// Canonical wire type for a raw kind.
///
/// `input`/`income` -> `income`, `output`/`outcome` -> `outcome`
fn canonical_type(raw: &str) -> Option<&'static str> {
    match raw.trim().to_lowercase().as_str() {
        "income" | "input" => Some("income"),
        "outcome" | "output" => Some("outcome"),
        _ => None,
    }
}

/// Validated filters of a [`HistoryRequest`]
#[derive(Debug)]
struct HistoryFilter {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    transaction_type: Option<&'static str>,
}

impl HistoryFilter {
    fn from_request(request: &HistoryRequest) -> Result<Self, HistoryError> {
        let from = Self::parse_bound("from_date", request.from_date.as_deref())?;
        let to = Self::parse_bound("to_date", request.to_date.as_deref())?;

        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(HistoryError::InvalidRequest(format!(
                    "from_date {} is after to_date {}",
                    from, to
                )));
            }
        }

        let transaction_type = match request.transaction_type.as_deref() {
            None => None,
            Some(raw) => Some(canonical_type(raw).ok_or_else(|| {
                HistoryError::InvalidRequest(format!("unknown transaction type '{}'", raw))
            })?),
        };

        Ok(Self {
            from,
            to,
            transaction_type,
        })
    }

    fn parse_bound(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, HistoryError> {
        match value {
            None => Ok(None),
            Some(raw) => parse_iso_date(raw).map(Some).ok_or_else(|| {
                HistoryError::InvalidRequest(format!("{} must be YYYY-MM-DD, got '{}'", field, raw))
            }),
        }
    }

    /// Date bounds cover whole days. Records with an unreadable timestamp are
    /// kept and left for the aggregator to drop.
    fn matches(&self, transaction: &HistoryTransaction) -> bool {
        if let Some(wanted) = self.transaction_type {
            if canonical_type(&transaction.transaction_type) != Some(wanted) {
                return false;
            }
        }

        let Some(timestamp) = parse_flexible_timestamp(&transaction.created_at) else {
            return true;
        };
        let day = timestamp.date();
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }
}

/// JSON file-backed history source
#[derive(Debug, Clone)]
pub struct JsonHistoryRepository {
    path: PathBuf,
}

impl JsonHistoryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<HistoryFile, HistoryError> {
        let content = fs::read_to_string(&self.path)?;
        let file: HistoryFile = serde_json::from_str(&content)?;
        debug!(
            "📁 HISTORY: loaded {} accounts from {}",
            file.accounts.len(),
            self.path.display()
        );
        Ok(file)
    }
}

impl HistoryStorage for JsonHistoryRepository {
    fn fetch_history(
        &self,
        ctx: &SessionContext,
        request: &HistoryRequest,
    ) -> Result<HistoryResponse, HistoryError> {
        if ctx.authorization_header().is_none() {
            warn!("📁 HISTORY: rejected request for '{}' without token", request.name);
            return Err(HistoryError::Unauthorized);
        }

        let filter = HistoryFilter::from_request(request)?;
        let file = self.read_file()?;

        let account = file
            .accounts
            .into_iter()
            .find(|account| account.name == request.name)
            .ok_or_else(|| HistoryError::AccountNotFound(request.name.clone()))?;

        let mut transactions: Vec<HistoryTransaction> = account
            .transactions
            .into_iter()
            .filter(|tx| filter.matches(tx))
            .collect();
        transactions.sort_by_key(|tx| Reverse(parse_flexible_timestamp(&tx.created_at)));

        info!(
            "📁 HISTORY: {} transactions for '{}' ({:?})",
            transactions.len(),
            account.name,
            filter
        );

        Ok(HistoryResponse {
            name: account.name,
            limit_data: transactions.len() as u32,
            transaction: transactions,
        })
    }
}
