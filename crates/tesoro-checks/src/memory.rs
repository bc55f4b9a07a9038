//! In-memory check store for testing and ephemeral use.
//!
//! [`InMemoryCheckStore`] keeps checkbooks, checks and the event log behind a
//! single `RwLock`, so every `commit_*` call is applied atomically.

use std::collections::HashMap;
use std::sync::RwLock;

use tesoro_types::{CheckId, CheckbookId};

use crate::aggregate::{Intake, Issuance};
use crate::check::Check;
use crate::checkbook::Checkbook;
use crate::error::{CheckError, Result};
use crate::event::CheckStatusEvent;
use crate::lifecycle::Transition;
use crate::status::CheckStatus;
use crate::traits::CheckStore;

/// An in-memory implementation of [`CheckStore`].
#[derive(Debug, Default)]
pub struct InMemoryCheckStore {
    inner: RwLock<CheckState>,
}

#[derive(Debug, Default)]
struct CheckState {
    checkbooks: HashMap<CheckbookId, Checkbook>,
    checks: HashMap<CheckId, Check>,
    order: HashMap<CheckbookId, Vec<CheckId>>,
    events: Vec<CheckStatusEvent>,
}

impl CheckState {
    fn stored_checkbook(&self, id: &CheckbookId) -> Result<&Checkbook> {
        self.checkbooks.get(id).ok_or_else(|| CheckError::NotFound {
            entity: "checkbook",
            id: id.to_string(),
        })
    }

    fn ensure_new_check(&self, check: &Check) -> Result<()> {
        if self.checks.contains_key(&check.id) {
            return Err(CheckError::AlreadyExists {
                entity: "check",
                id: check.id.to_string(),
            });
        }
        Ok(())
    }

    fn insert_check(&mut self, check: Check, event: CheckStatusEvent) {
        self.order.entry(check.checkbook_id).or_default().push(check.id);
        self.checks.insert(check.id, check);
        self.events.push(event);
    }
}

impl InMemoryCheckStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned<E: std::fmt::Display>(e: E) -> CheckError {
        CheckError::Store(format!("lock poisoned: {e}"))
    }
}

impl CheckStore for InMemoryCheckStore {
    fn insert_checkbook(&self, checkbook: &Checkbook) -> Result<Checkbook> {
        checkbook.validate()?;
        let mut state = self.inner.write().map_err(Self::poisoned)?;
        if state.checkbooks.contains_key(&checkbook.id) {
            return Err(CheckError::AlreadyExists {
                entity: "checkbook",
                id: checkbook.id.to_string(),
            });
        }
        let stored = Checkbook {
            version: 1,
            ..checkbook.clone()
        };
        state.checkbooks.insert(stored.id, stored.clone());
        tracing::info!(
            checkbook = %stored.id,
            kind = %stored.kind,
            bank = %stored.bank,
            "checkbook opened"
        );
        Ok(stored)
    }

    fn checkbook(&self, id: &CheckbookId) -> Result<Option<Checkbook>> {
        let state = self.inner.read().map_err(Self::poisoned)?;
        Ok(state.checkbooks.get(id).cloned())
    }

    fn checkbooks(&self) -> Result<Vec<Checkbook>> {
        let state = self.inner.read().map_err(Self::poisoned)?;
        let mut checkbooks: Vec<Checkbook> = state.checkbooks.values().cloned().collect();
        checkbooks.sort_by_key(|c| c.id);
        Ok(checkbooks)
    }

    fn update_checkbook(&self, expected_version: u64, checkbook: &Checkbook) -> Result<Checkbook> {
        checkbook.validate()?;
        let mut state = self.inner.write().map_err(Self::poisoned)?;
        let stored = state.stored_checkbook(&checkbook.id)?;

        if stored.version != expected_version {
            return Err(CheckError::VersionConflict {
                checkbook: checkbook.id,
                expected: expected_version,
                actual: stored.version,
            });
        }
        if stored.kind != checkbook.kind {
            return Err(CheckError::InvalidCheckbook {
                checkbook: checkbook.id,
                reason: "checkbook kind cannot change".into(),
            });
        }
        if checkbook.next_number < stored.next_number {
            return Err(CheckError::InvalidCheckbook {
                checkbook: checkbook.id,
                reason: "cursor cannot move backwards".into(),
            });
        }

        let updated = Checkbook {
            version: stored.version + 1,
            ..checkbook.clone()
        };
        state.checkbooks.insert(updated.id, updated.clone());
        Ok(updated)
    }

    fn commit_issuance(&self, expected_version: u64, issuance: &Issuance) -> Result<Checkbook> {
        let mut state = self.inner.write().map_err(Self::poisoned)?;
        let stored = state.stored_checkbook(&issuance.checkbook.id)?;

        if stored.version != expected_version {
            tracing::warn!(
                checkbook = %stored.id,
                expected = expected_version,
                actual = stored.version,
                "issuance lost cursor compare-and-swap"
            );
            return Err(CheckError::VersionConflict {
                checkbook: stored.id,
                expected: expected_version,
                actual: stored.version,
            });
        }

        let cursor = stored.next_number;
        let consistent = issuance.check.checkbook_id == stored.id
            && cursor == Some(issuance.check.number)
            && issuance.checkbook.next_number == cursor.map(|n| n + 1);
        if !consistent {
            return Err(CheckError::InvalidCheckbook {
                checkbook: stored.id,
                reason: format!(
                    "issuance of number {} does not follow stored cursor {:?}",
                    issuance.check.number, cursor
                ),
            });
        }
        state.ensure_new_check(&issuance.check)?;

        let updated = Checkbook {
            version: stored.version + 1,
            ..issuance.checkbook.clone()
        };
        state.checkbooks.insert(updated.id, updated.clone());
        state.insert_check(issuance.check.clone(), issuance.event.clone());
        Ok(updated)
    }

    fn commit_intake(&self, intake: &Intake) -> Result<()> {
        let mut state = self.inner.write().map_err(Self::poisoned)?;
        state.stored_checkbook(&intake.check.checkbook_id)?;
        state.ensure_new_check(&intake.check)?;
        state.insert_check(intake.check.clone(), intake.event.clone());
        Ok(())
    }

    fn commit_transition(
        &self,
        expected_status: CheckStatus,
        transition: &Transition,
    ) -> Result<()> {
        let mut state = self.inner.write().map_err(Self::poisoned)?;
        let stored = state
            .checks
            .get_mut(&transition.check.id)
            .ok_or_else(|| CheckError::NotFound {
                entity: "check",
                id: transition.check.id.to_string(),
            })?;

        if stored.status != expected_status {
            return Err(CheckError::StatusConflict {
                check: stored.id,
                expected: expected_status,
                actual: stored.status,
            });
        }

        *stored = transition.check.clone();
        state.events.push(transition.event.clone());
        Ok(())
    }

    fn check(&self, id: &CheckId) -> Result<Option<Check>> {
        let state = self.inner.read().map_err(Self::poisoned)?;
        Ok(state.checks.get(id).cloned())
    }

    fn checks_in(&self, checkbook: &CheckbookId) -> Result<Vec<Check>> {
        let state = self.inner.read().map_err(Self::poisoned)?;
        Ok(state
            .order
            .get(checkbook)
            .map(|ids| ids.iter().filter_map(|id| state.checks.get(id).cloned()).collect())
            .unwrap_or_default())
    }

    fn events_for(&self, check: &CheckId) -> Result<Vec<CheckStatusEvent>> {
        let state = self.inner.read().map_err(Self::poisoned)?;
        Ok(state
            .events
            .iter()
            .filter(|e| e.check_id == *check)
            .cloned()
            .collect())
    }
}
