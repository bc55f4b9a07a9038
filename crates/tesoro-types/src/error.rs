use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid {kind} identifier: {value}")]
    InvalidId { kind: &'static str, value: String },
}
