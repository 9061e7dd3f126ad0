//! # Storage Traits
//!
//! Abstraction over where account history comes from, so the analytics
//! service works the same against a file, a remote API or a test double.

use shared::{HistoryRequest, HistoryResponse};

/// Credentials for one data request, passed explicitly on every call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub auth_token: Option<String>,
}

impl SessionContext {
    pub fn new(auth_token: Option<String>) -> Self {
        Self { auth_token }
    }

    /// `Authorization` header value, `None` without a usable token.
    ///
    /// Tokens stored with or without the `Bearer ` prefix both yield `Bearer <token>`.
    pub fn authorization_header(&self) -> Option<String> {
        let raw = self.auth_token.as_deref()?.trim();
        let token = match raw.split_once(char::is_whitespace) {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
            _ if raw.eq_ignore_ascii_case("bearer") => "",
            _ => raw,
        };
        if token.is_empty() {
            None
        } else {
            Some(format!("Bearer {}", token))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Missing or empty authorization token")]
    Unauthorized,
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Invalid history request: {0}")]
    InvalidRequest(String),
    #[error("Failed to read history source: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed history data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Trait defining the interface for account history retrieval
pub trait HistoryStorage: Send + Sync {
    /// Fetch the transactions of one account matching the request filters.
    /// Returns transactions ordered by date descending (most recent first).
    fn fetch_history(
        &self,
        ctx: &SessionContext,
        request: &HistoryRequest,
    ) -> Result<HistoryResponse, HistoryError>;
}
