//! Error types for check and checkbook operations.

use thiserror::Error;
use tesoro_types::{CheckId, CheckbookId};

use crate::checkbook::CheckbookKind;
use crate::status::CheckStatus;

/// Errors that can occur in the check lifecycle engine and its stores.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// The checkbook cursor is past the end of its range.
    #[error("checkbook {checkbook} exhausted: next number {next} is past range end {range_to}")]
    RangeExhausted {
        checkbook: CheckbookId,
        next: u64,
        range_to: u64,
    },

    /// The requested status change is not in the transition table.
    #[error("check {check}: transition {from} -> {to} is not allowed")]
    InvalidTransition {
        check: CheckId,
        from: CheckStatus,
        to: CheckStatus,
    },

    /// Numbering was requested on a checkbook that does not own a cursor.
    #[error("checkbook {checkbook} is {kind}; number allocation does not apply")]
    NotApplicable {
        checkbook: CheckbookId,
        kind: CheckbookKind,
    },

    #[error("checkbook {checkbook} is inactive")]
    Inactive { checkbook: CheckbookId },

    #[error("invalid checkbook {checkbook}: {reason}")]
    InvalidCheckbook { checkbook: CheckbookId, reason: String },

    #[error("invalid check: {reason}")]
    InvalidCheck { reason: String },

    /// The check does not belong to the checkbook named by the caller.
    #[error("check {check} belongs to checkbook {actual}, not {expected}")]
    WrongCheckbook {
        check: CheckId,
        expected: CheckbookId,
        actual: CheckbookId,
    },

    /// The audit trail of a check does not form a valid chain.
    #[error("broken history for check {check}: {reason}")]
    BrokenHistory { check: CheckId, reason: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    /// The checkbook changed since it was read (cursor compare-and-swap lost).
    #[error("checkbook {checkbook} version conflict: expected {expected}, found {actual}")]
    VersionConflict {
        checkbook: CheckbookId,
        expected: u64,
        actual: u64,
    },

    /// The check changed status since it was read.
    #[error("check {check} status conflict: expected {expected}, found {actual}")]
    StatusConflict {
        check: CheckId,
        expected: CheckStatus,
        actual: CheckStatus,
    },

    /// Summed check amounts left the `Decimal` range.
    #[error("checkbook {checkbook}: {what} overflows")]
    AmountOverflow {
        checkbook: CheckbookId,
        what: String,
    },

    #[error("store error: {0}")]
    Store(String),
}

/// Convenience type alias for check operations.
pub type Result<T> = std::result::Result<T, CheckError>;
