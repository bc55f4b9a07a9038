use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("issuance on checkbook {checkbook} kept conflicting after {attempts} attempt(s)")]
    IssuanceContention {
        checkbook: tesoro_types::CheckbookId,
        attempts: u32,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] tesoro_ledger::LedgerError),

    #[error("check error: {0}")]
    Check(#[from] tesoro_checks::CheckError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;
