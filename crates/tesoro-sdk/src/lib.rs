//! High-level SDK for Tesoro.
//!
//! Composes the account ledger and the check lifecycle engine over their
//! stores. This is the layer that serializes issuance against the stored
//! checkbook cursor, surfaces missing entities as `NotFound`, and posts
//! ledger movements for client-linked checks.

pub mod config;
pub mod error;
pub mod tesoro;

pub use config::TesoroConfig;
pub use error::{SdkError, SdkResult};
pub use tesoro::{StatusChange, Tesoro};

// Re-export key types
pub use tesoro_checks::{
    Check, CheckDraft, CheckHistory, CheckStatus, CheckStatusEvent, Checkbook, CheckbookKind,
    CheckbookSummary, Counterparty, Intake, Issuance,
};
pub use tesoro_ledger::{
    Category, CreditExposure, LedgerSnapshot, Movement, MovementKind, NewMovement, Statement,
};
pub use tesoro_types::{CheckId, CheckbookId, ClientId, MovementId};
