//! Foundation types for Tesoro.
//!
//! Every other Tesoro crate depends on `tesoro-types`. It only carries
//! identifiers; the domain records live next to the logic that owns them.
//!
//! # Key Types
//!
//! - [`ClientId`]: Account holder whose running balance is tracked
//! - [`MovementId`]: Ledger movement (debe/haber entry)
//! - [`CheckbookId`]: Own or third-party checkbook
//! - [`CheckId`]: Individual check
//! - [`EventId`]: Check status audit event

pub mod error;
pub mod ids;

pub use error::TypeError;
pub use ids::{CheckId, CheckbookId, ClientId, EventId, MovementId};
