//! Running-balance ledger ("cuenta corriente") for Tesoro.
//!
//! This crate provides:
//! - The immutable [`Movement`] record (debe/haber entry)
//! - [`BalanceEngine`]: deterministic balance timelines and period statements
//! - [`CreditExposure`]: the single credit-availability formula
//! - `MovementReader` / `MovementWriter` trait boundaries
//! - [`InMemoryMovementStore`] for tests and embedding

pub mod credit;
pub mod engine;
pub mod error;
pub mod memory;
pub mod movement;
pub mod traits;

pub use credit::CreditExposure;
pub use engine::{BalanceEngine, CategoryTotals, LedgerSnapshot, SnapshotEntry, Statement};
pub use error::LedgerError;
pub use memory::InMemoryMovementStore;
pub use movement::{Category, Movement, MovementKind, NewMovement};
pub use traits::{MovementReader, MovementWriter};
