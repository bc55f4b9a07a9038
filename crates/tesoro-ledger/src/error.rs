use chrono::NaiveDate;
use rust_decimal::Decimal;
use tesoro_types::MovementId;

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid movement {id}: {reason}")]
    InvalidMovement { id: MovementId, reason: String },

    #[error("duplicate movement {id}")]
    DuplicateMovement { id: MovementId },

    #[error("invalid credit limit {limit}: must not be negative")]
    InvalidCreditLimit { limit: Decimal },

    #[error("invalid statement period: from={from}, to={to}")]
    InvalidPeriod { from: NaiveDate, to: NaiveDate },

    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("store error: {0}")]
    StoreError(String),
}
