//! Check lifecycle engine ("chequera/cheques") for Tesoro.
//!
//! This crate provides:
//! - [`Checkbook`] with its numbering range and cursor
//! - [`NumberAllocator`]: sequential numbering for own checkbooks
//! - [`CheckLifecycle`]: the guarded status state machine
//! - [`CheckStatusEvent`] audit records and [`CheckHistory`] reconstruction
//! - [`CheckbookAggregate`]: issuance, third-party intake and status changes
//! - `CheckStore` trait boundary and [`InMemoryCheckStore`] with
//!   compare-and-swap on the checkbook cursor

pub mod aggregate;
pub mod allocator;
pub mod check;
pub mod checkbook;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod memory;
pub mod status;
pub mod summary;
pub mod traits;

pub use aggregate::{CheckbookAggregate, Intake, Issuance};
pub use allocator::{Allocation, NumberAllocator};
pub use check::{Check, CheckDraft, Counterparty};
pub use checkbook::{Checkbook, CheckbookKind};
pub use error::{CheckError, Result};
pub use event::{CheckHistory, CheckStatusEvent};
pub use lifecycle::{CheckLifecycle, Transition};
pub use memory::InMemoryCheckStore;
pub use status::CheckStatus;
pub use summary::{CheckbookSummary, StatusTotals};
pub use traits::CheckStore;
