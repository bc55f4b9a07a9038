use chrono::NaiveDate;

use crate::check::Check;
use crate::error::{CheckError, Result};
use crate::event::CheckStatusEvent;
use crate::status::CheckStatus;

/// An accepted status change: the updated check and its audit event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub check: Check,
    pub event: CheckStatusEvent,
}

/// The check status state machine.
///
/// Only the status and its audit trail are handled here. Posting ledger
/// movements for client-linked checks is left to the billing flow.
pub struct CheckLifecycle;

impl CheckLifecycle {
    /// Apply `to` to `check` if the transition table allows it.
    ///
    /// Self-transitions and anything leaving a terminal status fail with
    /// `InvalidTransition`. The input check is left untouched.
    pub fn transition(
        check: &Check,
        to: CheckStatus,
        reason: Option<String>,
        date: NaiveDate,
    ) -> Result<Transition> {
        let from = check.status;
        if !from.can_transition_to(to) {
            tracing::warn!(check = %check.id, %from, %to, "rejected check transition");
            return Err(CheckError::InvalidTransition {
                check: check.id,
                from,
                to,
            });
        }

        let updated = Check {
            status: to,
            ..check.clone()
        };
        let event = CheckStatusEvent::new(check.id, date, Some(from), to, reason);

        tracing::info!(check = %check.id, number = check.number, %from, %to, "check transition");
        Ok(Transition {
            check: updated,
            event,
        })
    }

    /// Checks in circulation whose due date has passed by more than
    /// `grace_days`. These are candidates for an explicit `vencido`
    /// transition; nothing is transitioned here.
    pub fn expiry_candidates(checks: &[Check], today: NaiveDate, grace_days: u32) -> Vec<&Check> {
        let mut candidates: Vec<&Check> = checks
            .iter()
            .filter(|c| c.status == CheckStatus::Emitido && c.is_overdue(today, grace_days))
            .collect();
        candidates.sort_by_key(|c| (c.due_date, c.number, c.id));
        candidates
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use tesoro_types::CheckbookId;

    use super::*;
    use crate::check::{CheckDraft, Counterparty};
    use crate::checkbook::CheckbookKind;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn check_in(status: CheckStatus) -> Check {
        CheckDraft::new(dec!(500), date(1, 1), date(1, 31), Counterparty::named("Cliente"))
            .into_check(CheckbookId::new(), 1, CheckbookKind::Propia, status)
    }

    #[test]
    fn collect_emitted_check() {
        let check = check_in(CheckStatus::Emitido);
        let t = CheckLifecycle::transition(&check, CheckStatus::Cobrado, None, date(2, 1)).unwrap();
        assert_eq!(t.check.status, CheckStatus::Cobrado);
        assert_eq!(t.event.from, Some(CheckStatus::Emitido));
        assert_eq!(t.event.to, CheckStatus::Cobrado);
        assert_eq!(t.event.check_id, check.id);
        assert_eq!(t.event.date, date(2, 1));
        assert_eq!(check.status, CheckStatus::Emitido);

        // terminal thereafter
        for to in CheckStatus::ALL {
            assert!(CheckLifecycle::transition(&t.check, to, None, date(2, 2)).is_err());
        }
    }

    #[test]
    fn collected_check_cannot_be_reissued() {
        let check = check_in(CheckStatus::Cobrado);
        let err =
            CheckLifecycle::transition(&check, CheckStatus::Emitido, None, date(2, 1)).unwrap_err();
        assert_eq!(
            err,
            CheckError::InvalidTransition {
                check: check.id,
                from: CheckStatus::Cobrado,
                to: CheckStatus::Emitido,
            }
        );
    }

    #[test]
    fn reason_is_recorded() {
        let check = check_in(CheckStatus::Emitido);
        let t = CheckLifecycle::transition(
            &check,
            CheckStatus::Rechazado,
            Some("sin fondos".into()),
            date(2, 3),
        )
        .unwrap();
        assert_eq!(t.event.reason.as_deref(), Some("sin fondos"));
    }

    #[test]
    fn expiry_candidates_only_lists_emitted_overdue() {
        let mut overdue = check_in(CheckStatus::Emitido);
        overdue.due_date = date(1, 10);
        let mut later = check_in(CheckStatus::Emitido);
        later.due_date = date(3, 1);
        let mut collected = check_in(CheckStatus::Cobrado);
        collected.due_date = date(1, 5);

        let checks = vec![later, collected, overdue.clone()];
        let found = CheckLifecycle::expiry_candidates(&checks, date(2, 1), 0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, overdue.id);
        // candidates stay emitted until someone transitions them
        assert_eq!(found[0].status, CheckStatus::Emitido);
    }

    fn any_status() -> impl Strategy<Value = CheckStatus> {
        prop::sample::select(CheckStatus::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_transition_matches_table(from in any_status(), to in any_status()) {
            let check = check_in(from);
            let result = CheckLifecycle::transition(&check, to, None, date(2, 1));
            if from.can_transition_to(to) {
                let t = result.unwrap();
                prop_assert_eq!(t.check.status, to);
                prop_assert_eq!(t.event.from, Some(from));
            } else {
                let is_invalid = matches!(result, Err(CheckError::InvalidTransition { .. }));
                prop_assert!(is_invalid);
            }
        }

        #[test]
        fn prop_terminal_states_absorb(to in any_status()) {
            for from in [CheckStatus::Cobrado, CheckStatus::Rechazado, CheckStatus::Anulado] {
                let result = CheckLifecycle::transition(&check_in(from), to, None, date(2, 1));
                prop_assert!(result.is_err());
            }
        }
    }
}
