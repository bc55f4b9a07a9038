use chrono::NaiveDate;
use rust_decimal::Decimal;
use tesoro_checks::{
    Check, CheckDraft, CheckError, CheckHistory, CheckLifecycle, CheckStatus, CheckStore,
    Checkbook, CheckbookAggregate, CheckbookKind, CheckbookSummary, InMemoryCheckStore, Intake,
    Issuance, Transition,
};
use tesoro_ledger::{
    BalanceEngine, Category, CreditExposure, InMemoryMovementStore, LedgerSnapshot, Movement,
    MovementReader, MovementWriter, NewMovement, Statement,
};
use tesoro_types::{CheckId, CheckbookId, ClientId};

use crate::config::TesoroConfig;
use crate::error::{SdkError, SdkResult};

/// Outcome of a status change requested through the SDK.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusChange {
    pub transition: Transition,
    /// Ledger movement posted for a client-linked collection, if any.
    pub movement: Option<Movement>,
}

/// High-level Tesoro API over a movement store and a check store.
pub struct Tesoro<M = InMemoryMovementStore, C = InMemoryCheckStore> {
    config: TesoroConfig,
    movements: M,
    checks: C,
}

impl Tesoro {
    /// Fresh in-memory stores, for tests and local use.
    pub fn in_memory(config: TesoroConfig) -> SdkResult<Self> {
        Self::with_stores(config, InMemoryMovementStore::new(), InMemoryCheckStore::new())
    }
}

impl<M, C> Tesoro<M, C>
where
    M: MovementReader + MovementWriter,
    C: CheckStore,
{
    pub fn with_stores(config: TesoroConfig, movements: M, checks: C) -> SdkResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            movements,
            checks,
        })
    }

    pub fn config(&self) -> &TesoroConfig {
        &self.config
    }

    // ---- Ledger ----

    pub fn post_movement(&self, movement: NewMovement) -> SdkResult<Movement> {
        Ok(self.movements.append(movement)?)
    }

    /// Mirror a movement already recorded by the backend of record.
    pub fn import_movement(&self, movement: Movement) -> SdkResult<()> {
        Ok(self.movements.import(movement)?)
    }

    pub fn snapshot(&self, client: &ClientId) -> SdkResult<LedgerSnapshot> {
        let movements = self.movements.movements_for(client)?;
        Ok(BalanceEngine::compute_snapshot(&movements)?)
    }

    pub fn statement(
        &self,
        client: &ClientId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> SdkResult<Statement> {
        let movements = self.movements.movements_for(client)?;
        Ok(BalanceEngine::statement(&movements, from, to)?)
    }

    pub fn credit_exposure(&self, client: &ClientId, limit: Decimal) -> SdkResult<CreditExposure> {
        let snapshot = self.snapshot(client)?;
        Ok(CreditExposure::evaluate(
            limit,
            &snapshot,
            self.config.credit_warning_ratio,
        )?)
    }

    // ---- Checkbooks ----

    pub fn open_checkbook(&self, checkbook: &Checkbook) -> SdkResult<Checkbook> {
        Ok(self.checks.insert_checkbook(checkbook)?)
    }

    pub fn checkbook(&self, id: &CheckbookId) -> SdkResult<Checkbook> {
        self.checks
            .checkbook(id)?
            .ok_or_else(|| SdkError::NotFound {
                entity: "checkbook",
                id: id.to_string(),
            })
    }

    pub fn checkbooks(&self) -> SdkResult<Vec<Checkbook>> {
        Ok(self.checks.checkbooks()?)
    }

    /// Give an own checkbook a new range, e.g. after `RangeExhausted`.
    pub fn reconfigure_checkbook(
        &self,
        id: &CheckbookId,
        range_from: u64,
        range_to: u64,
    ) -> SdkResult<Checkbook> {
        let current = self.checkbook(id)?;
        let updated = current.reconfigure_range(range_from, range_to)?;
        let stored = self.checks.update_checkbook(current.version, &updated)?;
        tracing::info!(checkbook = %id, range_from, range_to, "checkbook range reconfigured");
        Ok(stored)
    }

    pub fn set_checkbook_active(&self, id: &CheckbookId, active: bool) -> SdkResult<Checkbook> {
        let current = self.checkbook(id)?;
        let updated = if active {
            current.activate()
        } else {
            current.deactivate()
        };
        Ok(self.checks.update_checkbook(current.version, &updated)?)
    }

    pub fn checkbook_summary(&self, id: &CheckbookId) -> SdkResult<CheckbookSummary> {
        let checkbook = self.checkbook(id)?;
        let checks = self.checks.checks_in(id)?;
        Ok(CheckbookSummary::build(&checkbook, &checks)?)
    }

    // ---- Checks ----

    /// Issue the next own check of `checkbook_id`.
    ///
    /// Each attempt reads the stored checkbook and commits the issuance with
    /// a compare-and-swap on its version. A lost race is retried up to
    /// `issuance_attempts` times; every other failure is returned as is.
    pub fn issue_own_check(
        &self,
        checkbook_id: &CheckbookId,
        draft: CheckDraft,
    ) -> SdkResult<Issuance> {
        let attempts = self.config.issuance_attempts;
        for attempt in 1..=attempts {
            let checkbook = self.checkbook(checkbook_id)?;
            let issuance = CheckbookAggregate::issue_own_check(&checkbook, draft.clone())?;

            match self.checks.commit_issuance(checkbook.version, &issuance) {
                Ok(stored) => {
                    return Ok(Issuance {
                        checkbook: stored,
                        ..issuance
                    });
                }
                Err(CheckError::VersionConflict { .. }) => {
                    tracing::warn!(
                        checkbook = %checkbook_id,
                        attempt,
                        "issuance conflict, re-reading checkbook"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(SdkError::IssuanceContention {
            checkbook: *checkbook_id,
            attempts,
        })
    }

    pub fn receive_third_party_check(
        &self,
        checkbook_id: &CheckbookId,
        number: u64,
        draft: CheckDraft,
    ) -> SdkResult<Intake> {
        let checkbook = self.checkbook(checkbook_id)?;
        let intake = CheckbookAggregate::receive_third_party_check(&checkbook, number, draft)?;
        self.checks.commit_intake(&intake)?;
        Ok(intake)
    }

    pub fn check(&self, id: &CheckId) -> SdkResult<Check> {
        self.checks.check(id)?.ok_or_else(|| SdkError::NotFound {
            entity: "check",
            id: id.to_string(),
        })
    }

    pub fn checks_in(&self, checkbook_id: &CheckbookId) -> SdkResult<Vec<Check>> {
        self.checkbook(checkbook_id)?;
        Ok(self.checks.checks_in(checkbook_id)?)
    }

    /// Move a check to `to`. When a received (third-party) check linked to a
    /// client is collected, a `haber` movement clears the client's
    /// receivable, whichever checkbook the check is filed under.
    pub fn change_check_status(
        &self,
        checkbook_id: &CheckbookId,
        check_id: &CheckId,
        to: CheckStatus,
        reason: Option<String>,
        date: NaiveDate,
    ) -> SdkResult<StatusChange> {
        self.checkbook(checkbook_id)?;
        let check = self.check(check_id)?;
        let transition =
            CheckbookAggregate::change_status(checkbook_id, &check, to, reason, date)?;
        self.checks.commit_transition(check.status, &transition)?;

        let movement = match self.collection_movement(&transition) {
            Some(new) => Some(self.movements.append(new)?),
            None => None,
        };

        Ok(StatusChange {
            transition,
            movement,
        })
    }

    pub fn check_history(&self, check_id: &CheckId) -> SdkResult<CheckHistory> {
        self.check(check_id)?;
        let events = self.checks.events_for(check_id)?;
        Ok(CheckHistory::from_events(*check_id, &events)?)
    }

    /// Checks due for an explicit `vencido` transition as of `today`.
    pub fn expiry_candidates(&self, today: NaiveDate) -> SdkResult<Vec<Check>> {
        let checks = self.checks.all_checks()?;
        Ok(
            CheckLifecycle::expiry_candidates(&checks, today, self.config.expiry_grace_days)
                .into_iter()
                .cloned()
                .collect(),
        )
    }

    fn collection_movement(&self, transition: &Transition) -> Option<NewMovement> {
        let check = &transition.check;
        if !self.config.post_check_movements
            || check.origin != CheckbookKind::Terceros
            || check.status != CheckStatus::Cobrado
        {
            return None;
        }
        let client = check.client_id?;
        Some(
            NewMovement::haber(client, transition.event.date, check.amount, Category::Check)
                .with_reference(check.id.to_string())
                .with_notes(format!("check #{} collected", check.number)),
        )
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use tesoro_checks::Counterparty;

    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn draft(amount: Decimal) -> CheckDraft {
        CheckDraft::new(amount, date(3, 1), date(3, 31), Counterparty::named("Cliente SA"))
    }

    #[test]
    fn unknown_checkbook_is_not_found() {
        let tesoro = Tesoro::in_memory(TesoroConfig::default()).unwrap();
        let err = tesoro
            .issue_own_check(&CheckbookId::new(), draft(dec!(1)))
            .unwrap_err();
        assert!(matches!(err, SdkError::NotFound { entity: "checkbook", .. }));
    }

    #[test]
    fn own_check_collection_posts_nothing() {
        let tesoro = Tesoro::in_memory(TesoroConfig::default()).unwrap();
        let client = ClientId::new();
        let cb = tesoro
            .open_checkbook(&Checkbook::own("Banco", "ACME", 1, 10).unwrap())
            .unwrap();
        let issuance = tesoro
            .issue_own_check(&cb.id, draft(dec!(90)).for_client(client))
            .unwrap();

        let change = tesoro
            .change_check_status(
                &cb.id,
                &issuance.check.id,
                CheckStatus::Cobrado,
                None,
                date(4, 1),
            )
            .unwrap();
        assert!(change.movement.is_none());
        assert!(tesoro.snapshot(&client).unwrap().is_empty());
    }

    #[test]
    fn posting_can_be_disabled() {
        let config = TesoroConfig {
            post_check_movements: false,
            ..TesoroConfig::default()
        };
        let tesoro = Tesoro::in_memory(config).unwrap();
        let client = ClientId::new();
        let cb = tesoro
            .open_checkbook(&Checkbook::third_party("Banco", "Cartera"))
            .unwrap();
        let intake = tesoro
            .receive_third_party_check(&cb.id, 12, draft(dec!(90)).for_client(client))
            .unwrap();
        let change = tesoro
            .change_check_status(
                &cb.id,
                &intake.check.id,
                CheckStatus::Cobrado,
                None,
                date(4, 1),
            )
            .unwrap();
        assert!(change.movement.is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = TesoroConfig {
            issuance_attempts: 0,
            ..TesoroConfig::default()
        };
        assert!(matches!(Tesoro::in_memory(config), Err(SdkError::Config(_))));
    }
}
