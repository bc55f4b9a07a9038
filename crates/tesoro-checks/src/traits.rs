//! The [`CheckStore`] trait defining the checkbook/check persistence boundary.
//!
//! The backend of record owns the checkbook cursor. Every write that moves
//! the cursor or a check status is a single compare-and-swap so that
//! concurrent callers cannot both succeed from the same stale read.

use tesoro_types::{CheckId, CheckbookId};

use crate::aggregate::{Intake, Issuance};
use crate::check::Check;
use crate::checkbook::Checkbook;
use crate::error::Result;
use crate::event::CheckStatusEvent;
use crate::lifecycle::Transition;
use crate::status::CheckStatus;

/// Storage backend for checkbooks, checks and their audit events.
///
/// Implementations must be thread-safe (`Send + Sync`) and apply each
/// `commit_*` call atomically.
pub trait CheckStore: Send + Sync {
    /// Register a new checkbook. Returns it with its initial version.
    fn insert_checkbook(&self, checkbook: &Checkbook) -> Result<Checkbook>;

    fn checkbook(&self, id: &CheckbookId) -> Result<Option<Checkbook>>;

    fn checkbooks(&self) -> Result<Vec<Checkbook>>;

    /// Replace a checkbook if its stored version is still `expected_version`.
    /// Used for range reconfiguration and activation changes.
    fn update_checkbook(&self, expected_version: u64, checkbook: &Checkbook) -> Result<Checkbook>;

    /// Persist the advanced cursor, the new check and its event in one step,
    /// guarded by `expected_version`. Fails with `VersionConflict` if another
    /// issuance got there first.
    fn commit_issuance(&self, expected_version: u64, issuance: &Issuance) -> Result<Checkbook>;

    /// Persist a received third-party check and its event.
    fn commit_intake(&self, intake: &Intake) -> Result<()>;

    /// Persist a status change if the stored check is still in
    /// `expected_status`.
    fn commit_transition(
        &self,
        expected_status: CheckStatus,
        transition: &Transition,
    ) -> Result<()>;

    fn check(&self, id: &CheckId) -> Result<Option<Check>>;

    /// Checks of one checkbook, in the order they were stored.
    fn checks_in(&self, checkbook: &CheckbookId) -> Result<Vec<Check>>;

    /// Audit events of one check, in append order.
    fn events_for(&self, check: &CheckId) -> Result<Vec<CheckStatusEvent>>;

    /// All checks across checkbooks.
    fn all_checks(&self) -> Result<Vec<Check>> {
        let mut checks = Vec::new();
        for checkbook in self.checkbooks()? {
            checks.extend(self.checks_in(&checkbook.id)?);
        }
        Ok(checks)
    }
}
