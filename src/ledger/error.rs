use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("ledger rejected {action}: {reason}")]
    Rejected { action: &'static str, reason: String },

    #[error("ledger unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("game {0} is not known to the ledger")]
    UnknownGame(Uuid),
}

impl LedgerError {
    /// Whether submitting the same action again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Unavailable { .. })
    }
}
